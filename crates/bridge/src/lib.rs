//! `billing-bridge`
//!
//! **Responsibility:** the seam between the billing client and whatever
//! executes native billing operations.
//!
//! This crate provides:
//! - The `NativeBridge` request/response contract plus the persistent
//!   purchase-event registration
//! - Typed invocation with per-call tracing
//! - `InMemoryBridge`, a scripted fake for tests/dev
//! - `UnsupportedBridge`, for hosts that have no native billing at all

pub mod bridge;
pub mod error;
pub mod in_memory;
pub mod op;
pub mod unsupported;

pub use bridge::{NativeBridge, PurchaseEventHandler, invoke};
pub use error::BridgeError;
pub use in_memory::{InMemoryBridge, RecordedCall};
pub use op::NativeOp;
pub use unsupported::UnsupportedBridge;
