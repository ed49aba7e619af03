//! `billing-client`
//!
//! **Responsibility:** the billing facade a hybrid app talks to.
//!
//! This crate provides:
//! - `BillingClient`, holding the catalog, cache flag, debug override and
//!   initialization state for one app session
//! - The initialization sequence with snapshot fallback
//! - Ownership, price and purchase queries, and fire-and-forget `buy`
//!
//! The native store stays the authority; the client only mirrors what it
//! last reported (or what was last cached).

pub mod cache;
pub mod callbacks;
pub mod client;
pub mod config;
pub mod error;
pub mod state;

pub use callbacks::InitCallbacks;
pub use client::BillingClient;
pub use config::{ClientConfig, InitOptions};
pub use error::BillingError;
pub use state::{InitOutcome, InitState};

pub use billing_core::{Catalog, Price, Product, ProductDescriptor, ProductType, Purchase, Sku};
pub use billing_events::{PurchaseFailure, PurchaseOutcome, Subscription};
