use thiserror::Error;

use billing_bridge::BridgeError;
use billing_store::StoreError;

#[derive(Debug, Error)]
pub enum BillingError {
    /// `init` was called while a previous initialization is still running.
    #[error("billing initialization already in progress")]
    InitInProgress,
    #[error("native bridge error: {0}")]
    Bridge(#[from] BridgeError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
