//! Native bridge over the Tauri billing plugin.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::JsValue;

use billing_bridge::{BridgeError, NativeBridge, NativeOp, PurchaseEventHandler};

use super::js::{self, JsError};

/// Plugin name used when none is given.
pub const DEFAULT_PLUGIN: &str = "billing";

/// Purchase event payload: a bare code, or an object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PurchaseEventPayload {
    Code(i32),
    Object { code: i32 },
}

impl PurchaseEventPayload {
    fn code(&self) -> i32 {
        match self {
            Self::Code(code) | Self::Object { code } => *code,
        }
    }
}

type SharedHandler = Arc<Mutex<Option<PurchaseEventHandler>>>;

/// Calls `plugin:<plugin>|<op>` with `{ params }` and listens for
/// `<plugin>://purchase-event`.
///
/// The JS listener is registered once; later registrations only swap the
/// handler it forwards to.
#[derive(Debug, Clone)]
pub struct TauriBridge {
    plugin: String,
    handler: SharedHandler,
    listening: Arc<AtomicBool>,
}

impl TauriBridge {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            handler: Arc::new(Mutex::new(None)),
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    fn command(&self, op: NativeOp) -> String {
        format!("plugin:{}|{}", self.plugin, op.as_str())
    }

    fn event(&self) -> String {
        format!("{}://purchase-event", self.plugin)
    }
}

impl Default for TauriBridge {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN)
    }
}

fn bridge_error(op: NativeOp, err: JsError) -> BridgeError {
    match err {
        JsError::Missing(reason) => BridgeError::unavailable(reason),
        JsError::Rejected(payload) => BridgeError::rejected(op, payload),
    }
}

async fn invoke_command(command: String, op: NativeOp, params: Vec<Value>) -> Result<Value, BridgeError> {
    let args = js::to_js(&serde_json::json!({ "params": params })).map_err(|e| bridge_error(op, e))?;
    js::invoke(&command, &args).await.map_err(|e| bridge_error(op, e))
}

fn forward(handler: &SharedHandler, event: JsValue) {
    let payload = js_sys::Reflect::get(&event, &JsValue::from_str("payload")).unwrap_or(JsValue::UNDEFINED);
    let code = match serde_wasm_bindgen::from_value::<PurchaseEventPayload>(payload) {
        Ok(payload) => payload.code(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed purchase event");
            return;
        }
    };

    let current = handler
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    if let Some(handler) = current {
        handler(code);
    }
}

#[async_trait(?Send)]
impl NativeBridge for TauriBridge {
    async fn call(&self, op: NativeOp, params: Vec<Value>) -> Result<Value, BridgeError> {
        invoke_command(self.command(op), op, params).await
    }

    fn dispatch(&self, op: NativeOp, params: Vec<Value>) -> Result<(), BridgeError> {
        let command = self.command(op);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = invoke_command(command, op, params).await {
                tracing::debug!(error = %err, "dispatched native operation failed");
            }
        });
        Ok(())
    }

    fn set_purchase_event_callback(&self, handler: PurchaseEventHandler) -> Result<(), BridgeError> {
        *self.handler.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handler);

        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let event = self.event();
        let shared = self.handler.clone();
        let listening = self.listening.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = js::listen(&event, move |e| forward(&shared, e)).await {
                listening.store(false, Ordering::SeqCst);
                tracing::warn!(?err, %event, "failed to listen for purchase events");
            }
        });
        Ok(())
    }
}
