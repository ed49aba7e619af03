//! Native (non-webview) sessions.
//!
//! Desktop and headless hosts have no store to talk to; they run the client
//! on [`UnsupportedBridge`] so that initialization always falls back to the
//! SQLite snapshot, or fails when caching is off.

use billing_bridge::{NativeBridge, UnsupportedBridge};
use billing_client::{BillingClient, InitCallbacks};
use billing_store::SqliteStore;

use crate::config::ShellConfig;
use crate::error::ShellError;

pub type NativeClient<B = UnsupportedBridge> = BillingClient<B, SqliteStore>;

/// Snapshot store at `BILLING_CACHE_DB`, or the platform default.
pub fn open_store(config: &ShellConfig) -> Result<SqliteStore, ShellError> {
    let store = match &config.cache_db {
        Some(path) => SqliteStore::new(path.clone()),
        None => SqliteStore::open_default()?,
    };
    tracing::debug!(path = ?store.path(), "using SQLite snapshot store");
    Ok(store)
}

/// Client over `bridge` with the configured snapshot store.
pub fn client<B>(bridge: B, config: &ShellConfig) -> Result<NativeClient<B>, ShellError>
where
    B: NativeBridge,
{
    let store = open_store(config)?;
    Ok(BillingClient::with_config(bridge, store, config.client.clone()))
}

/// Client for hosts without native billing.
pub fn fallback_client(config: &ShellConfig) -> Result<NativeClient, ShellError> {
    client(UnsupportedBridge::new(), config)
}

/// Callbacks that only log.
pub fn logging_callbacks() -> InitCallbacks {
    InitCallbacks::new()
        .on_init_success(|| tracing::info!("billing available"))
        .on_init_fail(|| tracing::warn!("billing unavailable"))
        .on_purchase_success(|| tracing::info!("purchase succeeded"))
        .on_purchase_fail(|reason| tracing::warn!(%reason, "purchase failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_bridge::{InMemoryBridge, NativeOp};
    use billing_client::{InitOutcome, InitState};
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_config(products: &str, enable_cache: bool) -> (ShellConfig, PathBuf) {
        let mut dir = std::env::temp_dir();
        dir.push(format!("billing-shell-{}", uuid::Uuid::new_v4()));
        let mut config = ShellConfig::from_lookup(|_| None).unwrap();
        config.products = crate::config::parse_products(products).unwrap();
        config.enable_cache = enable_cache;
        config.cache_db = Some(dir.join("cache.db"));
        (config, dir)
    }

    #[tokio::test]
    async fn fallback_session_uses_previous_snapshot() {
        let (config, dir) = temp_config("remove_ads:inapp", true);

        let online = InMemoryBridge::new();
        online
            .respond(
                NativeOp::GetInappProducts,
                json!([{ "sku": "remove_ads", "type": "inapp", "price": "$1" }]),
            )
            .respond(
                NativeOp::GetInappPurchases,
                json!([{ "productIds": ["remove_ads"], "signature": "s", "receipt": "r" }]),
            );
        let first = client(online, &config).unwrap();
        assert_eq!(
            first.init(config.init_options(), logging_callbacks()).await.unwrap(),
            InitOutcome::Ready
        );

        let offline = fallback_client(&config).unwrap();
        let outcome = offline
            .init(config.init_options(), logging_callbacks())
            .await
            .unwrap();

        assert_eq!(outcome, InitOutcome::Degraded);
        assert_eq!(offline.state(), InitState::Degraded);
        assert!(offline.is_owned("remove_ads"));
        assert!(!offline.buy("remove_ads"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn fallback_session_without_cache_fails() {
        let (config, dir) = temp_config("gold:subs", false);

        let offline = fallback_client(&config).unwrap();
        let outcome = offline
            .init(config.init_options(), logging_callbacks())
            .await
            .unwrap();

        assert_eq!(outcome, InitOutcome::Failed);
        assert!(offline.products().is_empty());

        let _ = std::fs::remove_dir_all(dir);
    }
}
