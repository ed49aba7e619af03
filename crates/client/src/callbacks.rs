//! Application callbacks supplied with `init`.

use std::sync::Arc;

use billing_events::{PurchaseFailure, PurchaseListener};

type Callback = Arc<dyn Fn() + Send + Sync>;
type FailureCallback = Arc<dyn Fn(PurchaseFailure) + Send + Sync>;

/// The four application callbacks. Unset callbacks are no-ops.
///
/// The purchase callbacks outlive the `init` call: they are kept by the
/// purchase-event handler until the next `init` replaces it.
#[derive(Clone, Default)]
pub struct InitCallbacks {
    on_init_success: Option<Callback>,
    on_init_fail: Option<Callback>,
    on_purchase_success: Option<Callback>,
    on_purchase_fail: Option<FailureCallback>,
}

impl InitCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init_success(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_init_success = Some(Arc::new(f));
        self
    }

    pub fn on_init_fail(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_init_fail = Some(Arc::new(f));
        self
    }

    pub fn on_purchase_success(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_purchase_success = Some(Arc::new(f));
        self
    }

    pub fn on_purchase_fail(mut self, f: impl Fn(PurchaseFailure) + Send + Sync + 'static) -> Self {
        self.on_purchase_fail = Some(Arc::new(f));
        self
    }

    pub(crate) fn init_succeeded(&self) {
        if let Some(f) = &self.on_init_success {
            f();
        }
    }

    pub(crate) fn init_failed(&self) {
        if let Some(f) = &self.on_init_fail {
            f();
        }
    }
}

impl PurchaseListener for InitCallbacks {
    fn on_purchase_success(&self) {
        if let Some(f) = &self.on_purchase_success {
            f();
        }
    }

    fn on_purchase_fail(&self, reason: PurchaseFailure) {
        if let Some(f) = &self.on_purchase_fail {
            f(reason);
        }
    }
}

impl core::fmt::Debug for InitCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InitCallbacks")
            .field("on_init_success", &self.on_init_success.is_some())
            .field("on_init_fail", &self.on_init_fail.is_some())
            .field("on_purchase_success", &self.on_purchase_success.is_some())
            .field("on_purchase_fail", &self.on_purchase_fail.is_some())
            .finish()
    }
}
