//! Cookies by Coffey command-line client.
//!
//! [`client`] talks to the storefront's order endpoint and drives an
//! [`OrderForm`](coffey_core::OrderForm) through a submission the same way
//! the order page does.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;

pub use client::{HttpError, HttpResponse, MessageBody, OrderClient, http_post, submit_form};
