//! JS-facing billing API.
//!
//! ```js
//! const billing = new WebBilling();
//! billing.onPurchase((ok, reason) => console.log(ok, reason));
//! const outcome = await billing.init([{ sku: "remove_ads", type: "inapp" }], true);
//! if (!billing.isOwned("remove_ads")) billing.buy("remove_ads");
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use billing_client::{
    BillingClient, ClientConfig, InitCallbacks, InitOptions, Price, Product,
    ProductDescriptor, PurchaseOutcome,
};

use crate::listeners::ListenerRegistry;

use super::bridge::{DEFAULT_PLUGIN, TauriBridge};
use super::storage::LocalStorageStore;

thread_local! {
    static PURCHASE_LISTENERS: ListenerRegistry<js_sys::Function> = ListenerRegistry::new();
}

/// Hand `outcome` to the listener of instance `id`, if it has one.
fn notify_purchase(id: u32, outcome: PurchaseOutcome) {
    let listener = PURCHASE_LISTENERS.with(|l| l.get(id));
    let Some(listener) = listener else {
        return;
    };

    let (ok, reason) = match outcome {
        PurchaseOutcome::Success => (true, JsValue::UNDEFINED),
        PurchaseOutcome::Failed(reason) => (false, JsValue::from_str(reason.as_str())),
    };
    if let Err(err) = listener.call2(&JsValue::NULL, &JsValue::from_bool(ok), &reason) {
        tracing::warn!(?err, "purchase listener threw");
    }
}

fn js_error(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Billing client bound to the Tauri plugin and `localStorage`.
#[wasm_bindgen]
pub struct WebBilling {
    id: u32,
    client: Rc<BillingClient<TauriBridge, LocalStorageStore>>,
}

impl Drop for WebBilling {
    fn drop(&mut self) {
        PURCHASE_LISTENERS.with(|l| l.release(self.id));
    }
}

#[wasm_bindgen]
impl WebBilling {
    /// `plugin` defaults to `billing`; `cacheKey` to `BILLING_cache`.
    #[wasm_bindgen(constructor)]
    pub fn new(plugin: Option<String>, cache_key: Option<String>) -> WebBilling {
        let bridge = TauriBridge::new(plugin.unwrap_or_else(|| DEFAULT_PLUGIN.to_string()));
        let config = match cache_key {
            Some(key) => ClientConfig::default().with_cache_key(key),
            None => ClientConfig::default(),
        };
        WebBilling {
            id: PURCHASE_LISTENERS.with(|l| l.allocate()),
            client: Rc::new(BillingClient::with_config(bridge, LocalStorageStore::new(), config)),
        }
    }

    /// Set (or clear, with `null`) the function receiving purchase results as
    /// `(ok, reason)`.
    #[wasm_bindgen(js_name = onPurchase)]
    pub fn on_purchase(&self, listener: Option<js_sys::Function>) {
        PURCHASE_LISTENERS.with(|l| l.set(self.id, listener));
    }

    /// Load the catalog. Resolves with `"ready"`, `"degraded"` or `"failed"`;
    /// rejects when an initialization is already running.
    pub fn init(&self, products: JsValue, enable_cache: bool) -> js_sys::Promise {
        let client = self.client.clone();
        let id = self.id;
        wasm_bindgen_futures::future_to_promise(async move {
            let products: Vec<ProductDescriptor> =
                serde_wasm_bindgen::from_value(products).map_err(js_error)?;
            let options = InitOptions::new().products(products).enable_cache(enable_cache);
            let callbacks = InitCallbacks::new()
                .on_purchase_success(move || notify_purchase(id, PurchaseOutcome::Success))
                .on_purchase_fail(move |reason| notify_purchase(id, PurchaseOutcome::Failed(reason)));

            let outcome = client.init(options, callbacks).await.map_err(js_error)?;
            serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
        })
    }

    #[wasm_bindgen(js_name = isOwned)]
    pub fn is_owned(&self, sku: &str) -> bool {
        self.client.is_owned(sku)
    }

    /// A string for one-time products, an array for subscriptions,
    /// `null` for unknown skus.
    pub fn price(&self, sku: &str) -> JsValue {
        match self.client.price(sku) {
            Some(Price::Single { price }) => JsValue::from_str(&price),
            Some(Price::Tiers { prices }) => prices
                .iter()
                .map(|p| JsValue::from_str(p))
                .collect::<js_sys::Array>()
                .into(),
            None => JsValue::NULL,
        }
    }

    /// `{ signature, receipt, orderId }` or `null`.
    pub fn purchase(&self, sku: &str) -> Result<JsValue, JsValue> {
        match self.client.purchase(sku) {
            Some(purchase) => super::js::to_js(&purchase).map_err(|e| js_error(format!("{e:?}"))),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn buy(&self, sku: &str) -> bool {
        self.client.buy(sku)
    }

    /// Product JSON to force ownership of, or `null` to clear.
    #[wasm_bindgen(js_name = setDebugOwnedProduct)]
    pub fn set_debug_owned_product(&self, product: JsValue) -> Result<(), JsValue> {
        let product: Option<Product> = if product.is_null() || product.is_undefined() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(product).map_err(js_error)?)
        };
        self.client.set_debug_owned_product(product);
        Ok(())
    }

    /// `"idle"`, `"initializing"`, `"ready"`, `"degraded"` or `"failed"`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.client.state()).map_err(js_error)
    }
}
