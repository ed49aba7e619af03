//! Request/response contract with the native billing plugin.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::BridgeError;
use crate::op::NativeOp;

/// Persistent receiver of native purchase result codes.
pub type PurchaseEventHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Executes named native operations.
///
/// Each `call` is one request with one eventual reply; the bridge never
/// batches or reorders, so callers sequence dependent calls by awaiting.
/// Purchase results are not replies: they arrive through the handler given to
/// `set_purchase_event_callback`, as many times as the native side reports them.
///
/// On `wasm32` hosts the futures are not `Send` (they wrap JS promises).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NativeBridge: Send + Sync {
    /// Run `op` with positional `params` and wait for its reply.
    async fn call(&self, op: NativeOp, params: Vec<Value>) -> Result<Value, BridgeError>;

    /// Send `op` without waiting for, or ever observing, its reply.
    ///
    /// An error here means the request could not be sent at all.
    fn dispatch(&self, op: NativeOp, params: Vec<Value>) -> Result<(), BridgeError>;

    /// Register the handler receiving purchase result codes, replacing any
    /// previously registered one.
    fn set_purchase_event_callback(&self, handler: PurchaseEventHandler) -> Result<(), BridgeError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<B> NativeBridge for Arc<B>
where
    B: NativeBridge + ?Sized,
{
    async fn call(&self, op: NativeOp, params: Vec<Value>) -> Result<Value, BridgeError> {
        (**self).call(op, params).await
    }

    fn dispatch(&self, op: NativeOp, params: Vec<Value>) -> Result<(), BridgeError> {
        (**self).dispatch(op, params)
    }

    fn set_purchase_event_callback(&self, handler: PurchaseEventHandler) -> Result<(), BridgeError> {
        (**self).set_purchase_event_callback(handler)
    }
}

/// Call `op` and decode its reply into `T`.
///
/// Every invocation runs in its own `native_call` span tagged with a fresh
/// time-ordered call id, so interleaved logs from the host can be matched up.
pub async fn invoke<B, T>(bridge: &B, op: NativeOp, params: Vec<Value>) -> Result<T, BridgeError>
where
    B: NativeBridge + ?Sized,
    T: DeserializeOwned,
{
    let call_id = Uuid::now_v7();
    let span = tracing::debug_span!("native_call", %call_id, op = op.as_str());

    async move {
        tracing::debug!(params = params.len(), "invoking native operation");
        let payload = match bridge.call(op, params).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "native operation failed");
                return Err(err);
            }
        };
        serde_json::from_value(payload).map_err(|e| BridgeError::payload(op, e))
    }
    .instrument(span)
    .await
}
