//! The billing facade.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::IgnoredAny;
use serde_json::Value;

use billing_bridge::{BridgeError, NativeBridge, NativeOp, PurchaseEventHandler, invoke};
use billing_core::{Catalog, Price, Product, ProductType, Purchase, PurchaseRecord, Sku};
use billing_events::{EventBus, InMemoryEventBus, PurchaseEvent, PurchaseOutcome, Subscription, deliver};
use billing_store::KeyValueStore;

use crate::cache::SnapshotCache;
use crate::callbacks::InitCallbacks;
use crate::config::{ClientConfig, InitOptions};
use crate::error::BillingError;
use crate::state::{InitOutcome, InitState};

#[derive(Debug)]
struct Inner {
    catalog: Catalog,
    debug_product: Option<Product>,
    enable_cache: bool,
    state: InitState,
}

/// Billing facade for one app session.
///
/// Owns the catalog mirrored from the native store, the cache flag of the
/// last `init`, the debug override and the initialization state. Queries are
/// synchronous reads of that state; only `init` talks to the native side and
/// waits for it.
pub struct BillingClient<B, S> {
    bridge: B,
    store: S,
    config: ClientConfig,
    inner: Mutex<Inner>,
    outcomes: Arc<InMemoryEventBus<PurchaseOutcome>>,
}

impl<B, S> BillingClient<B, S>
where
    B: NativeBridge,
    S: KeyValueStore,
{
    pub fn new(bridge: B, store: S) -> Self {
        Self::with_config(bridge, store, ClientConfig::default())
    }

    pub fn with_config(bridge: B, store: S, config: ClientConfig) -> Self {
        Self {
            bridge,
            store,
            config,
            inner: Mutex::new(Inner {
                catalog: Catalog::new(),
                debug_product: None,
                enable_cache: false,
                state: InitState::Idle,
            }),
            outcomes: Arc::new(InMemoryEventBus::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }

    fn snapshots(&self) -> SnapshotCache<'_, S> {
        SnapshotCache::new(&self.store, &self.config.cache_key)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> InitState {
        self.lock().state
    }

    /// Whether the last `init` asked for the snapshot cache.
    pub fn cache_enabled(&self) -> bool {
        self.lock().enable_cache
    }

    /// Load the catalog from the native store.
    ///
    /// Registers the purchase-event handler, then runs native `init`,
    /// `connect`, the two product queries and the two purchase queries
    /// strictly in that order. Any failure aborts the sequence; with caching
    /// enabled the stored snapshot is then used instead and the outcome is
    /// [`InitOutcome::Degraded`].
    ///
    /// Exactly one of `on_init_success` / `on_init_fail` is invoked before
    /// this returns `Ok`. The only error is [`BillingError::InitInProgress`],
    /// in which case no callback runs and the running initialization is left
    /// untouched.
    ///
    /// Dropping the returned future before it completes leaves the client in
    /// [`InitState::Failed`] with whatever catalog it had reached (usually
    /// empty); no callback runs and a new `init` may start.
    pub async fn init(
        &self,
        options: InitOptions,
        callbacks: InitCallbacks,
    ) -> Result<InitOutcome, BillingError> {
        let guard = {
            let mut inner = self.lock();
            if !inner.state.is_settled() {
                tracing::warn!("rejecting init: another initialization is running");
                return Err(BillingError::InitInProgress);
            }
            inner.state = InitState::Initializing;
            inner.enable_cache = options.enable_cache;
            inner.catalog = Catalog::new();
            InitGuard::arm(&self.inner)
        };

        tracing::info!(
            products = options.products.len(),
            enable_cache = options.enable_cache,
            "initializing billing"
        );

        let handler = self.purchase_handler(callbacks.clone());
        let outcome = match self.fetch_catalog(&options, handler).await {
            Ok(catalog) => {
                if self.cache_enabled() {
                    if let Err(err) = self.snapshots().save(&catalog).await {
                        tracing::error!(error = %err, "failed to store catalog snapshot");
                    }
                }
                tracing::info!(products = catalog.len(), "billing ready");
                self.lock().catalog = catalog;
                InitOutcome::Ready
            }
            Err(err) => {
                tracing::warn!(error = %err, "native billing initialization failed");
                let restored = if self.cache_enabled() {
                    self.snapshots().restore().await
                } else {
                    None
                };
                match restored {
                    Some(catalog) => {
                        tracing::warn!(products = catalog.len(), "billing degraded: using cached catalog");
                        self.lock().catalog = catalog;
                        InitOutcome::Degraded
                    }
                    None => InitOutcome::Failed,
                }
            }
        };

        guard.settle(outcome);
        if outcome.is_available() {
            callbacks.init_succeeded();
        } else {
            callbacks.init_failed();
        }
        Ok(outcome)
    }

    /// Handler translating native purchase codes for `callbacks` and the
    /// outcome bus.
    fn purchase_handler(&self, callbacks: InitCallbacks) -> PurchaseEventHandler {
        let outcomes = self.outcomes.clone();
        Arc::new(move |code| {
            let event = PurchaseEvent::now(code);
            tracing::debug!(
                code,
                response = ?event.response_code(),
                received_at = %event.received_at,
                "purchase event received"
            );
            let outcome = deliver(&callbacks, event.code);
            let reached = outcomes.publish(outcome);
            tracing::debug!(?outcome, subscribers = reached, "purchase outcome published");
        })
    }

    async fn fetch_catalog(
        &self,
        options: &InitOptions,
        handler: PurchaseEventHandler,
    ) -> Result<Catalog, BridgeError> {
        self.bridge.set_purchase_event_callback(handler)?;

        invoke::<_, IgnoredAny>(&self.bridge, NativeOp::Init, Vec::new()).await?;
        invoke::<_, IgnoredAny>(&self.bridge, NativeOp::Connect, Vec::new()).await?;

        let inapp_products: Vec<Product> = invoke(
            &self.bridge,
            NativeOp::GetInappProducts,
            vec![sku_list(&options.skus_of(ProductType::Inapp))],
        )
        .await?;
        let subs_products: Vec<Product> = invoke(
            &self.bridge,
            NativeOp::GetSubsProducts,
            vec![sku_list(&options.skus_of(ProductType::Subs))],
        )
        .await?;
        let inapp_purchases: Vec<PurchaseRecord> =
            invoke(&self.bridge, NativeOp::GetInappPurchases, Vec::new()).await?;
        let subs_purchases: Vec<PurchaseRecord> =
            invoke(&self.bridge, NativeOp::GetSubsPurchases, Vec::new()).await?;

        tracing::debug!(
            inapp_products = inapp_products.len(),
            subs_products = subs_products.len(),
            inapp_purchases = inapp_purchases.len(),
            subs_purchases = subs_purchases.len(),
            "native catalog fetched"
        );

        let mut catalog = Catalog::new();
        catalog.extend_with(inapp_products, &inapp_purchases);
        catalog.extend_with(subs_products, &subs_purchases);
        Ok(catalog)
    }

    /// Whether `sku` is owned.
    ///
    /// A matching debug override wins; otherwise the catalog decides. Unknown
    /// skus are not owned.
    pub fn is_owned(&self, sku: &str) -> bool {
        let inner = self.lock();
        if inner
            .debug_product
            .as_ref()
            .is_some_and(|debug| debug.sku.as_str() == sku)
        {
            return true;
        }
        inner.catalog.get(sku).is_some_and(Product::is_owned)
    }

    /// Price of `sku`, `None` when the sku is unknown.
    ///
    /// Ignores the debug override.
    pub fn price(&self, sku: &str) -> Option<Price> {
        self.lock().catalog.get(sku).map(|p| p.price.clone())
    }

    /// Purchase owning `sku`.
    ///
    /// While a debug override is set, only the override is consulted: a
    /// matching override yields its own purchase (possibly none), any other
    /// sku yields none.
    pub fn purchase(&self, sku: &str) -> Option<Purchase> {
        let inner = self.lock();
        match &inner.debug_product {
            Some(debug) if debug.sku.as_str() == sku => debug.purchase.clone(),
            Some(_) => None,
            None => inner.catalog.get(sku).and_then(|p| p.purchase.clone()),
        }
    }

    /// Start the native purchase flow for `sku`.
    ///
    /// Does nothing for unknown skus. The result is only ever reported through
    /// the purchase callbacks and [`subscribe_purchases`](Self::subscribe_purchases).
    /// Returns whether the request was handed to the native side.
    pub fn buy(&self, sku: &str) -> bool {
        let product_type = match self.lock().catalog.get(sku) {
            Some(product) => product.product_type,
            None => {
                tracing::debug!(sku, "ignoring buy for unknown sku");
                return false;
            }
        };

        let params = vec![
            Value::String(sku.to_string()),
            Value::Bool(product_type.is_inapp()),
        ];
        match self.bridge.dispatch(NativeOp::Buy, params) {
            Ok(()) => {
                tracing::info!(sku, %product_type, "purchase flow started");
                true
            }
            Err(err) => {
                tracing::warn!(sku, error = %err, "failed to start purchase flow");
                false
            }
        }
    }

    /// Replace the debug override. `None` clears it.
    pub fn set_debug_owned_product(&self, product: Option<Product>) {
        if let Some(product) = &product {
            tracing::debug!(sku = %product.sku, "debug override set");
        }
        self.lock().debug_product = product;
    }

    /// Products currently in the catalog, ordered by sku.
    pub fn products(&self) -> Vec<Product> {
        self.lock().catalog.products().cloned().collect()
    }

    pub fn catalog(&self) -> Catalog {
        self.lock().catalog.clone()
    }

    /// Subscribe to every purchase outcome reported from now on.
    pub fn subscribe_purchases(&self) -> Subscription<PurchaseOutcome> {
        self.outcomes.subscribe()
    }

    /// Delete the stored snapshot.
    pub async fn clear_cache(&self) -> Result<(), BillingError> {
        self.snapshots().clear().await
    }
}

/// Settles the state of an `init` that never finished.
///
/// Armed once the state is `Initializing`; if the `init` future is dropped
/// before [`settle`](Self::settle), the state becomes `Failed`.
struct InitGuard<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl<'a> InitGuard<'a> {
    fn arm(inner: &'a Mutex<Inner>) -> Self {
        Self { inner, armed: true }
    }

    fn settle(mut self, outcome: InitOutcome) {
        self.armed = false;
        lock_inner(self.inner).state = outcome.into();
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock_inner(self.inner);
        if inner.state == InitState::Initializing {
            tracing::warn!("billing initialization abandoned before completing");
            inner.state = InitState::Failed;
        }
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<B, S> core::fmt::Debug for BillingClient<B, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BillingClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn sku_list(skus: &[&Sku]) -> Value {
    Value::Array(skus.iter().map(|s| Value::String(s.to_string())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_bridge::InMemoryBridge;
    use billing_store::InMemoryStore;

    fn sku(s: &str) -> Sku {
        s.parse().unwrap()
    }

    fn owned(product: Product) -> Product {
        product.with_purchase(Purchase {
            signature: "sig".into(),
            receipt: "rcpt".into(),
            order_id: Some("GPA.1".into()),
        })
    }

    fn client_with(catalog: Catalog) -> BillingClient<InMemoryBridge, InMemoryStore> {
        let client = BillingClient::new(InMemoryBridge::new(), InMemoryStore::new());
        client.lock().catalog = catalog;
        client
    }

    #[test]
    fn fresh_client_knows_nothing() {
        let client = BillingClient::new(InMemoryBridge::new(), InMemoryStore::new());
        assert_eq!(client.state(), InitState::Idle);
        assert!(!client.is_owned("remove_ads"));
        assert!(client.price("remove_ads").is_none());
        assert!(client.purchase("remove_ads").is_none());
    }

    #[test]
    fn ownership_follows_attached_purchase() {
        let client = client_with(
            vec![
                owned(Product::inapp(sku("remove_ads"), "$1")),
                Product::subscription(sku("gold"), ["$5"]),
            ]
            .into_iter()
            .collect(),
        );

        assert!(client.is_owned("remove_ads"));
        assert!(!client.is_owned("gold"));
        assert!(!client.is_owned("silver"));
    }

    #[test]
    fn debug_override_only_affects_its_own_sku_for_ownership() {
        let client = client_with(
            vec![owned(Product::inapp(sku("remove_ads"), "$1"))]
                .into_iter()
                .collect(),
        );
        client.set_debug_owned_product(Some(Product::subscription(sku("gold"), ["$5"])));

        assert!(client.is_owned("gold"));
        assert!(client.is_owned("remove_ads"));
        assert!(!client.is_owned("coins"));
    }

    #[test]
    fn debug_override_shadows_purchases() {
        let client = client_with(
            vec![owned(Product::inapp(sku("remove_ads"), "$1"))]
                .into_iter()
                .collect(),
        );
        assert!(client.purchase("remove_ads").is_some());

        client.set_debug_owned_product(Some(owned(Product::inapp(sku("gold"), "$5"))));
        assert_eq!(client.purchase("gold").unwrap().order_id.as_deref(), Some("GPA.1"));
        assert!(client.purchase("remove_ads").is_none());

        client.set_debug_owned_product(Some(Product::inapp(sku("gold"), "$5")));
        assert!(client.purchase("gold").is_none());
        assert!(client.is_owned("gold"));

        client.set_debug_owned_product(None);
        assert!(client.purchase("remove_ads").is_some());
        assert!(!client.is_owned("gold"));
    }

    #[test]
    fn price_ignores_override_and_follows_type() {
        let client = client_with(
            vec![
                Product::inapp(sku("remove_ads"), "$1"),
                Product::subscription(sku("gold"), ["Free", "$5"]),
            ]
            .into_iter()
            .collect(),
        );
        client.set_debug_owned_product(Some(Product::inapp(sku("coins"), "$9")));

        assert_eq!(client.price("remove_ads"), Some(Price::single("$1")));
        assert_eq!(client.price("gold"), Some(Price::tiers(["Free", "$5"])));
        assert_eq!(client.price("coins"), None);
    }
}
