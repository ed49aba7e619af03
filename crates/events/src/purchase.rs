use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response codes of the native billing library.
///
/// Unknown values are preserved in `Other` so they can still be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingResponseCode {
    ServiceTimeout,
    FeatureNotSupported,
    ServiceDisconnected,
    Ok,
    UserCanceled,
    ServiceUnavailable,
    BillingUnavailable,
    ItemUnavailable,
    DeveloperError,
    Error,
    ItemAlreadyOwned,
    ItemNotOwned,
    NetworkError,
    Other(i32),
}

impl BillingResponseCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            -3 => Self::ServiceTimeout,
            -2 => Self::FeatureNotSupported,
            -1 => Self::ServiceDisconnected,
            0 => Self::Ok,
            1 => Self::UserCanceled,
            2 => Self::ServiceUnavailable,
            3 => Self::BillingUnavailable,
            4 => Self::ItemUnavailable,
            5 => Self::DeveloperError,
            6 => Self::Error,
            7 => Self::ItemAlreadyOwned,
            8 => Self::ItemNotOwned,
            12 => Self::NetworkError,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ServiceTimeout => -3,
            Self::FeatureNotSupported => -2,
            Self::ServiceDisconnected => -1,
            Self::Ok => 0,
            Self::UserCanceled => 1,
            Self::ServiceUnavailable => 2,
            Self::BillingUnavailable => 3,
            Self::ItemUnavailable => 4,
            Self::DeveloperError => 5,
            Self::Error => 6,
            Self::ItemAlreadyOwned => 7,
            Self::ItemNotOwned => 8,
            Self::NetworkError => 12,
            Self::Other(code) => *code,
        }
    }
}

/// Why a purchase flow did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseFailure {
    UserCanceled,
    ItemAlreadyOwned,
    UnableToCharge,
    /// Catch-all for every other code, including ones we do not know.
    Network,
}

impl PurchaseFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseFailure::UserCanceled => "USER_CANCELED",
            PurchaseFailure::ItemAlreadyOwned => "ITEM_ALREADY_OWNED",
            PurchaseFailure::UnableToCharge => "UNABLE_TO_CHARGE",
            PurchaseFailure::Network => "NETWORK",
        }
    }
}

impl core::fmt::Display for PurchaseFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-level result of a purchase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum PurchaseOutcome {
    Success,
    Failed(PurchaseFailure),
}

impl PurchaseOutcome {
    /// Translate a native response code. Total over all inputs.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PurchaseOutcome::Success,
            1 => PurchaseOutcome::Failed(PurchaseFailure::UserCanceled),
            7 => PurchaseOutcome::Failed(PurchaseFailure::ItemAlreadyOwned),
            3 => PurchaseOutcome::Failed(PurchaseFailure::UnableToCharge),
            _ => PurchaseOutcome::Failed(PurchaseFailure::Network),
        }
    }
}

/// A purchase notification as received from the native side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseEvent {
    pub code: i32,
    pub received_at: DateTime<Utc>,
}

impl PurchaseEvent {
    pub fn now(code: i32) -> Self {
        Self {
            code,
            received_at: Utc::now(),
        }
    }

    pub fn response_code(&self) -> BillingResponseCode {
        BillingResponseCode::from_code(self.code)
    }
}
