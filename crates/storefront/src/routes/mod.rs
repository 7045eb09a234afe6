//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Home page
//! GET  /health             - Health check
//! GET  /about              - About page
//! GET  /gallery            - Gallery grid
//! GET  /gallery/{index}    - Single gallery post with prev/next
//!
//! # Order form (server-rendered)
//! GET  /order              - Empty order form
//! POST /order              - Submit (also accepts add/remove)
//! POST /order/items        - Add/remove line item, never sends
//!
//! # API
//! POST /api/sendEmail      - Mail an order (any other method: 405)
//! ```

pub mod api;
pub mod gallery;
pub mod home;
pub mod order;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::RateLimiterLayer;
use crate::state::AppState;

/// Create the order page router.
///
/// Only `POST /order` is rate limited; line item edits on `/order/items` are not.
pub fn order_routes(order_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let page = get(order::show);
    let page = match order_limiter {
        Some(limiter) => page.merge(post(order::submit).layer(limiter)),
        None => page.post(order::submit),
    };
    Router::new()
        .route("/order", page)
        .route("/order/items", post(order::edit))
}

/// Create all routes for the storefront.
///
/// `order_limiter` is applied to the two routes that send mail.
pub fn routes(order_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/gallery", get(gallery::index))
        .route("/gallery/{index}", get(gallery::show))
        .merge(order_routes(order_limiter.clone()))
        .nest("/api", api::routes(order_limiter))
}
