use crate::purchase::{PurchaseFailure, PurchaseOutcome};

/// Receives translated purchase outcomes.
///
/// Implementations are invoked from whatever context the native side
/// delivers purchase notifications on, possibly while an initialization is
/// still running. They must not assume anything about catalog state.
pub trait PurchaseListener: Send + Sync {
    fn on_purchase_success(&self);

    fn on_purchase_fail(&self, reason: PurchaseFailure);
}

/// Translate a native response code and hand it to `listener`.
///
/// Returns the outcome so callers can fan it out further.
pub fn deliver<L>(listener: &L, code: i32) -> PurchaseOutcome
where
    L: PurchaseListener + ?Sized,
{
    let outcome = PurchaseOutcome::from_code(code);
    match outcome {
        PurchaseOutcome::Success => {
            tracing::info!(code, "purchase completed");
            listener.on_purchase_success();
        }
        PurchaseOutcome::Failed(reason) => {
            tracing::info!(code, %reason, "purchase failed");
            listener.on_purchase_fail(reason);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Option<PurchaseFailure>>>,
    }

    impl PurchaseListener for Recorder {
        fn on_purchase_success(&self) {
            self.seen.lock().unwrap().push(None);
        }

        fn on_purchase_fail(&self, reason: PurchaseFailure) {
            self.seen.lock().unwrap().push(Some(reason));
        }
    }

    #[test]
    fn each_code_reaches_exactly_one_callback() {
        let rec = Recorder::default();
        for code in [0, 1, 7, 3, 99] {
            deliver(&rec, code);
        }

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                None,
                Some(PurchaseFailure::UserCanceled),
                Some(PurchaseFailure::ItemAlreadyOwned),
                Some(PurchaseFailure::UnableToCharge),
                Some(PurchaseFailure::Network),
            ]
        );
    }
}
