//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::OrderMailer;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the mailer used by both the JSON
/// endpoint and the order page.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    mailer: Box<dyn OrderMailer>,
}

impl AppState {
    /// Create a new application state around an order mailer.
    #[must_use]
    pub fn new(mailer: impl OrderMailer + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                mailer: Box::new(mailer),
            }),
        }
    }

    /// Get the order mailer.
    #[must_use]
    pub fn mailer(&self) -> &dyn OrderMailer {
        self.inner.mailer.as_ref()
    }
}
