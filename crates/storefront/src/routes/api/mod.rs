//! JSON API routes.

pub mod send_email;

use axum::{Router, routing::post};

use crate::middleware::RateLimiterLayer;
use crate::state::AppState;

/// Create the API routes router, nested under `/api`.
pub fn routes(order_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let send = match order_limiter {
        Some(limiter) => post(send_email::send_email).layer(limiter),
        None => post(send_email::send_email),
    };

    Router::new().route("/sendEmail", send.fallback(send_email::only_post))
}
