//! Bridge for hosts without native billing (desktop builds, headless tools).

use async_trait::async_trait;
use serde_json::Value;

use crate::bridge::{NativeBridge, PurchaseEventHandler};
use crate::error::BridgeError;
use crate::op::NativeOp;

/// Rejects every operation with [`BridgeError::Unsupported`].
///
/// A client initialized on top of this bridge falls back to its cached
/// snapshot, which keeps previously seen ownership available on platforms
/// that cannot talk to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBridge;

impl UnsupportedBridge {
    pub fn new() -> Self {
        Self
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NativeBridge for UnsupportedBridge {
    async fn call(&self, op: NativeOp, _params: Vec<Value>) -> Result<Value, BridgeError> {
        Err(BridgeError::Unsupported(op))
    }

    fn dispatch(&self, op: NativeOp, _params: Vec<Value>) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported(op))
    }

    fn set_purchase_event_callback(&self, _handler: PurchaseEventHandler) -> Result<(), BridgeError> {
        // Nothing will ever be reported; accepting keeps init on its normal path.
        tracing::debug!("purchase events are not available on this platform");
        Ok(())
    }
}
