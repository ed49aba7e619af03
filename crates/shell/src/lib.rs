//! `billing-shell`
//!
//! **Responsibility:** wiring the billing client into a concrete host.
//!
//! This crate provides:
//! - Environment-driven shell configuration
//! - A webview host (wasm32): Tauri invoke bridge, `localStorage` store and
//!   the JS-facing `WebBilling` facade
//! - A native fallback session (no store access; SQLite snapshot) used by the
//!   demo binary
//!
//! The shell only wires things together; the billing rules live in
//! `billing-client`.

pub mod config;
pub mod error;
pub mod listeners;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod webview;

pub use config::ShellConfig;
pub use error::ShellError;
