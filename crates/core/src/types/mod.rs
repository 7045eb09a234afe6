//! Core types for Cookies by Coffey.
//!
//! This module provides type-safe wrappers for the order domain.

pub mod date;
pub mod email;
pub mod order;
pub mod phone;

pub use date::{format_truncated_date, parse_delivery_date};
pub use email::{Email, EmailError};
pub use order::{CookieItem, OrderRequest};
pub use phone::{PhoneError, PhoneNumber, apply_mask, strip_mask};
