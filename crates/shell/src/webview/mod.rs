//! Webview host: the client running inside a Tauri webview.
//!
//! Native operations go through the billing plugin's invoke commands, purchase
//! codes arrive as plugin events and the snapshot lives in `localStorage`.

pub mod bridge;
pub mod facade;
mod js;
pub mod storage;

pub use bridge::{DEFAULT_PLUGIN, TauriBridge};
pub use facade::WebBilling;
pub use storage::LocalStorageStore;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
