//! Access to the Tauri JavaScript API via `window.__TAURI__`.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

/// Why a JS call failed.
#[derive(Debug)]
pub(crate) enum JsError {
    /// The Tauri API (or a piece of it) is missing.
    Missing(String),
    /// The promise rejected; carries the rejection value.
    Rejected(Value),
}

fn tauri_namespace(name: &str) -> Result<JsValue, JsError> {
    let window = window().ok_or_else(|| JsError::Missing("no window object".into()))?;
    let tauri = js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__"))
        .ok()
        .filter(|v| !v.is_undefined())
        .ok_or_else(|| JsError::Missing("window.__TAURI__ is not defined".into()))?;
    js_sys::Reflect::get(&tauri, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined())
        .ok_or_else(|| JsError::Missing(format!("window.__TAURI__.{name} is not defined")))
}

fn function(namespace: &JsValue, name: &str) -> Result<js_sys::Function, JsError> {
    js_sys::Reflect::get(namespace, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| JsError::Missing(format!("{name} is not a function")))
}

/// Convert a JS value into JSON, falling back to its debug rendering.
pub(crate) fn to_json(value: JsValue) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    serde_wasm_bindgen::from_value(value.clone()).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::Missing(format!("failed to serialize arguments: {e}")))
}

async fn settle(promise: JsValue) -> Result<Value, JsError> {
    JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map(to_json)
        .map_err(|e| JsError::Rejected(to_json(e)))
}

/// `window.__TAURI__.core.invoke(cmd, args)`.
pub(crate) async fn invoke(cmd: &str, args: &JsValue) -> Result<Value, JsError> {
    let core = tauri_namespace("core")?;
    let invoke = function(&core, "invoke")?;
    let promise = invoke
        .call2(&core, &JsValue::from_str(cmd), args)
        .map_err(|e| JsError::Rejected(to_json(e)))?;
    settle(promise).await
}

/// `window.__TAURI__.event.listen(event, handler)`.
///
/// The handler closure is leaked: listeners live for the rest of the page.
pub(crate) async fn listen<F>(event: &str, handler: F) -> Result<(), JsError>
where
    F: FnMut(JsValue) + 'static,
{
    let namespace = tauri_namespace("event")?;
    let listen = function(&namespace, "listen")?;
    let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
    let promise = listen
        .call2(&namespace, &JsValue::from_str(event), closure.as_ref().unchecked_ref())
        .map_err(|e| JsError::Rejected(to_json(e)))?;
    closure.forget();
    settle(promise).await.map(|_| ())
}
