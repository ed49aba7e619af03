//! `billing-core`: catalog building blocks.
//!
//! This crate contains **pure domain** types (no bridge, storage or logging
//! concerns): skus, product definitions, purchases and the catalog mapping
//! built from native query results.

pub mod catalog;
pub mod error;
pub mod product;
pub mod purchase;
pub mod sku;

pub use catalog::Catalog;
pub use error::DomainError;
pub use product::{Price, Product, ProductDescriptor, ProductType};
pub use purchase::{Purchase, PurchaseRecord, find_purchase};
pub use sku::Sku;
