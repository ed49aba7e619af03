//! Purchase events: native result codes and their translation.
//!
//! The native store reports the end of every purchase flow as a bare integer
//! response code, delivered asynchronously and possibly many times over the
//! lifetime of a client. This crate names those codes, maps them onto the two
//! application-level outcomes and fans outcomes out to subscribers.

pub mod bus;
pub mod in_memory_bus;
pub mod listener;
pub mod purchase;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{DEFAULT_CAPACITY, InMemoryEventBus};
pub use listener::{PurchaseListener, deliver};
pub use purchase::{BillingResponseCode, PurchaseEvent, PurchaseFailure, PurchaseOutcome};
