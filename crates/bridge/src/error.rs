use serde_json::Value;
use thiserror::Error;

use crate::op::NativeOp;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    /// The native side rejected the call.
    ///
    /// `code` is the native response code when the failure payload was numeric.
    #[error("native {op} rejected (code {code:?}): {message}")]
    Rejected {
        op: NativeOp,
        code: Option<i32>,
        message: String,
    },
    /// The call succeeded but its payload had an unexpected shape.
    #[error("unexpected payload from native {op}: {reason}")]
    Payload { op: NativeOp, reason: String },
    /// The host has no native billing implementation.
    #[error("native {0} is not supported on this platform")]
    Unsupported(NativeOp),
    /// The host bridge itself could not be reached.
    #[error("native bridge unavailable: {0}")]
    Unavailable(String),
}

impl BridgeError {
    /// Build a rejection from whatever the native side passed to its error
    /// callback: usually a response code, sometimes a message.
    pub fn rejected(op: NativeOp, payload: Value) -> Self {
        let code = payload.as_i64().and_then(|c| i32::try_from(c).ok());
        let message = match &payload {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Self::Rejected { op, code, message }
    }

    pub fn payload(op: NativeOp, reason: impl core::fmt::Display) -> Self {
        Self::Payload {
            op,
            reason: reason.to_string(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Native response code carried by a rejection, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Rejected { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_rejection_keeps_code() {
        let err = BridgeError::rejected(NativeOp::Connect, json!(3));
        assert_eq!(err.code(), Some(3));
    }

    #[test]
    fn message_rejection_has_no_code() {
        let err = BridgeError::rejected(NativeOp::Init, json!("activity gone"));
        assert_eq!(err.code(), None);
        assert!(err.to_string().contains("activity gone"));
    }
}
