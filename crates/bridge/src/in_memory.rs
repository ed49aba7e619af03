//! Scripted in-memory bridge for tests/dev.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::bridge::{NativeBridge, PurchaseEventHandler};
use crate::error::BridgeError;
use crate::op::NativeOp;

/// One request seen by the bridge, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub op: NativeOp,
    pub params: Vec<Value>,
    /// `true` for fire-and-forget dispatches.
    pub dispatched: bool,
}

#[derive(Debug, Clone)]
enum Script {
    Resolve(Value),
    Reject(Value),
}

#[derive(Default)]
struct State {
    scripts: HashMap<NativeOp, Script>,
    gates: HashMap<NativeOp, Arc<Notify>>,
    calls: Vec<RecordedCall>,
    handler: Option<PurchaseEventHandler>,
}

/// In-memory native bridge.
///
/// - Unscripted list operations resolve with `[]`, everything else with `null`
/// - Operations can be scripted to resolve or reject
/// - An operation can be paused until the returned gate is released
/// - Purchase event codes are pushed with `emit_purchase_event`
#[derive(Default)]
pub struct InMemoryBridge {
    state: Mutex<State>,
}

impl InMemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `op` resolve with `payload`.
    pub fn respond(&self, op: NativeOp, payload: Value) -> &Self {
        self.lock().scripts.insert(op, Script::Resolve(payload));
        self
    }

    /// Make `op` reject with the given native response code.
    pub fn reject(&self, op: NativeOp, code: i32) -> &Self {
        self.lock().scripts.insert(op, Script::Reject(json!(code)));
        self
    }

    /// Drop any script for `op`, restoring the default reply.
    pub fn reset(&self, op: NativeOp) -> &Self {
        self.lock().scripts.remove(&op);
        self
    }

    /// Hold every subsequent `op` call until the returned gate is notified.
    pub fn pause(&self, op: NativeOp) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn ops(&self) -> Vec<NativeOp> {
        self.lock().calls.iter().map(|c| c.op).collect()
    }

    pub fn calls_to(&self, op: NativeOp) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    pub fn has_purchase_handler(&self) -> bool {
        self.lock().handler.is_some()
    }

    /// Deliver a purchase result code to the registered handler.
    ///
    /// Returns `false` when no handler is registered.
    pub fn emit_purchase_event(&self, code: i32) -> bool {
        let handler = self.lock().handler.clone();
        match handler {
            Some(handler) => {
                handler(code);
                true
            }
            None => false,
        }
    }

    fn record(&self, op: NativeOp, params: Vec<Value>, dispatched: bool) {
        self.lock().calls.push(RecordedCall {
            op,
            params,
            dispatched,
        });
    }
}

impl core::fmt::Debug for InMemoryBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        f.debug_struct("InMemoryBridge")
            .field("calls", &state.calls.len())
            .field("scripts", &state.scripts.len())
            .field("handler", &state.handler.is_some())
            .finish()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NativeBridge for InMemoryBridge {
    async fn call(&self, op: NativeOp, params: Vec<Value>) -> Result<Value, BridgeError> {
        self.record(op, params, false);

        let gate = self.lock().gates.get(&op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let script = self.lock().scripts.get(&op).cloned();
        match script {
            Some(Script::Resolve(payload)) => Ok(payload),
            Some(Script::Reject(payload)) => Err(BridgeError::rejected(op, payload)),
            None if op.returns_list() => Ok(json!([])),
            None => Ok(Value::Null),
        }
    }

    fn dispatch(&self, op: NativeOp, params: Vec<Value>) -> Result<(), BridgeError> {
        self.record(op, params, true);
        Ok(())
    }

    fn set_purchase_event_callback(&self, handler: PurchaseEventHandler) -> Result<(), BridgeError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            op: NativeOp::SetPurchaseEventCallback,
            params: Vec::new(),
            dispatched: false,
        });
        state.handler = Some(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[tokio::test]
    async fn unscripted_defaults_depend_on_op() {
        let bridge = InMemoryBridge::new();
        assert_eq!(bridge.call(NativeOp::Init, vec![]).await.unwrap(), Value::Null);
        assert_eq!(
            bridge.call(NativeOp::GetSubsPurchases, vec![]).await.unwrap(),
            json!([])
        );
        assert_eq!(bridge.ops(), vec![NativeOp::Init, NativeOp::GetSubsPurchases]);
    }

    #[tokio::test]
    async fn scripted_rejection_carries_code() {
        let bridge = InMemoryBridge::new();
        bridge.reject(NativeOp::Connect, 3);

        let err = bridge.call(NativeOp::Connect, vec![]).await.unwrap_err();
        assert_eq!(err.code(), Some(3));

        bridge.reset(NativeOp::Connect);
        assert!(bridge.call(NativeOp::Connect, vec![]).await.is_ok());
    }

    #[test]
    fn purchase_events_reach_latest_handler() {
        let bridge = InMemoryBridge::new();
        assert!(!bridge.emit_purchase_event(0));

        let seen = Arc::new(AtomicI32::new(-100));
        let sink = seen.clone();
        bridge
            .set_purchase_event_callback(Arc::new(move |code| sink.store(code, Ordering::SeqCst)))
            .unwrap();

        assert!(bridge.emit_purchase_event(7));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn paused_call_waits_for_gate() {
        let bridge = Arc::new(InMemoryBridge::new());
        let gate = bridge.pause(NativeOp::Connect);

        let worker = bridge.clone();
        let task = tokio::spawn(async move { worker.call(NativeOp::Connect, vec![]).await });

        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        assert!(task.await.unwrap().is_ok());
    }
}
