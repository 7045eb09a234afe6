//! Order intake endpoint.
//!
//! Receives a validated order as JSON and mails it to the bakery inbox.
//! The order is not re-validated here.

use axum::{Json, extract::State};
use coffey_core::OrderRequest;
use tracing::instrument;

use crate::error::{AppError, MessageResponse, Result};
use crate::state::AppState;

/// Message returned once the order email was accepted by the relay.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";

/// Send the order email.
///
/// # Errors
///
/// Returns `AppError::Mail` (500) if the token exchange or SMTP send fails.
#[instrument(
    skip(state, order),
    fields(email = %order.email, items = order.cookie_list.len())
)]
pub async fn send_email(
    State(state): State<AppState>,
    Json(order): Json<OrderRequest>,
) -> Result<Json<MessageResponse>> {
    state.mailer().send_order(&order).await?;

    tracing::info!(total_cookies = order.total_cookies(), "Order placed");
    Ok(Json(MessageResponse {
        message: ORDER_PLACED_MESSAGE,
    }))
}

/// Any method other than POST.
///
/// # Errors
///
/// Always returns `AppError::MethodNotAllowed`.
pub async fn only_post() -> Result<Json<MessageResponse>> {
    Err(AppError::MethodNotAllowed)
}
