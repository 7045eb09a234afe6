//! Cookies by Coffey Core - Order domain library.
//!
//! This crate provides the types and logic shared by every Cookies by Coffey
//! component:
//! - `storefront` - Public site and order intake endpoint
//! - `cli` - Command-line order client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no mail transport. Time is always passed in by the caller, which
//! keeps validation and the submission state machine deterministic in tests.
//!
//! # Modules
//!
//! - [`types`] - Order payload, email and phone wrappers, date formatting
//! - [`validation`] - The order rule set and field-addressed errors
//! - [`form`] - Order form working state and submission state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod types;
pub mod validation;

pub use form::{OrderForm, SubmissionState, SubmitButton, SubmitRejected};
pub use types::*;
pub use validation::{FieldPath, OrderInput, CookieItemInput, ValidationErrors, validate};
