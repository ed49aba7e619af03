use thiserror::Error;

use billing_client::BillingError;
use billing_core::DomainError;
use billing_store::StoreError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid product list in {var}: {source}")]
    InvalidProducts {
        var: &'static str,
        #[source]
        source: DomainError,
    },
    #[error("invalid boolean {value:?} in {var}")]
    InvalidFlag { var: &'static str, value: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Billing(#[from] BillingError),
}
