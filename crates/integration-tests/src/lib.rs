//! Integration test harness for Cookies by Coffey.
//!
//! Starts the storefront router in-process on an ephemeral port with a mock
//! mailer in place of Gmail, so the full HTTP path can be exercised without
//! credentials.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coffey-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use coffey_core::OrderRequest;
use coffey_storefront::services::{MailError, OrderMailer};
use coffey_storefront::state::AppState;

/// Mailer that records every order and fails the first `failures` sends.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OrderRequest>>>,
    attempts: Arc<AtomicUsize>,
    failures: usize,
}

impl MockMailer {
    /// Mailer that always delivers.
    #[must_use]
    pub fn delivering() -> Self {
        Self::default()
    }

    /// Mailer that fails the first `failures` sends, then delivers.
    #[must_use]
    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    /// Orders that were delivered.
    #[must_use]
    pub fn sent(&self) -> Vec<OrderRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of sends attempted, delivered or not.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderMailer for MockMailer {
    async fn send_order(&self, order: &OrderRequest) -> Result<(), MailError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(MailError::InvalidAddress("mock relay refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order.clone());
        Ok(())
    }
}

/// A storefront running on `127.0.0.1` for the duration of a test.
pub struct TestServer {
    pub addr: SocketAddr,
    pub mailer: MockMailer,
}

impl TestServer {
    /// Spawn the storefront with `mailer` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(mailer: MockMailer) -> Self {
        let app = coffey_storefront::app(AppState::new(mailer.clone()), None);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, mailer }
    }

    /// Base URL, e.g. `http://127.0.0.1:49152`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
