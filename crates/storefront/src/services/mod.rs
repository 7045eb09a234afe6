//! Services used by the storefront handlers.
//!
//! - `email` - Order email rendering and Gmail delivery
//! - `oauth` - Google OAuth2 token refresh

pub mod email;
pub mod oauth;

pub use email::{GmailMailer, MailError, OrderEmail, OrderMailer, compose_order_email};
