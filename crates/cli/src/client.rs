//! HTTP client for the order intake endpoint.

use chrono::{DateTime, Utc};
use coffey_core::{OrderForm, OrderRequest, SubmissionState, SubmitRejected};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Path of the order endpoint, relative to the storefront base URL.
pub const SEND_EMAIL_PATH: &str = "/api/sendEmail";

/// Errors from a JSON POST.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered outside 2xx.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request could not be encoded, or a 2xx body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decoded 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse<T> {
    pub body: T,
    pub status: u16,
}

/// `{ "message": ... }` body returned by the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// POST `body` as JSON and decode a JSON response.
///
/// # Errors
///
/// Returns `HttpError::Status` (with the raw body) for non-2xx responses,
/// `HttpError::Transport` when the request fails, and `HttpError::Json`
/// when a 2xx body is not valid JSON for `R`.
pub async fn http_post<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<HttpResponse<R>, HttpError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let payload = serde_json::to_vec(body)?;
    let response = client
        .post(url)
        .headers(json_headers())
        .body(payload)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(HttpResponse {
        body: serde_json::from_str(&text)?,
        status: status.as_u16(),
    })
}

/// Client for a running storefront.
#[derive(Debug, Clone)]
pub struct OrderClient {
    http: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    /// `base_url` is the storefront origin, e.g. `http://127.0.0.1:3000`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of the order endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{SEND_EMAIL_PATH}", self.base_url)
    }

    /// Send one order to the intake endpoint.
    ///
    /// # Errors
    ///
    /// See [`http_post`].
    #[tracing::instrument(skip_all, fields(url = %self.endpoint()))]
    pub async fn place_order(
        &self,
        order: &OrderRequest,
    ) -> Result<HttpResponse<MessageBody>, HttpError> {
        http_post(&self.http, &self.endpoint(), order).await
    }
}

/// Submit the form once: validate, POST, and record the outcome.
///
/// Returns the state the form ended in, `Success` or `Error`. Transport and
/// server failure detail is logged, never returned.
///
/// # Errors
///
/// Returns [`SubmitRejected`] when the form is invalid or not accepting
/// submissions; no request is made in that case.
pub async fn submit_form(
    form: &mut OrderForm,
    client: &OrderClient,
    now: DateTime<Utc>,
) -> Result<SubmissionState, SubmitRejected> {
    let order = form.begin_submit(now)?;

    let delivered = match client.place_order(&order).await {
        Ok(response) => {
            tracing::info!(
                status = response.status,
                message = %response.body.message,
                "Order accepted"
            );
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "Order submission failed");
            false
        }
    };

    form.finish_submit(delivered, Utc::now());
    Ok(form.state())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use chrono::TimeDelta;

    use super::*;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    async fn echo(Json(value): Json<serde_json::Value>) -> Json<serde_json::Value> {
        Json(value)
    }

    async fn accept(Json(_): Json<serde_json::Value>) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "message": "Order placed successfully" }))
    }

    async fn reject(Json(_): Json<serde_json::Value>) -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Order failed to send" })),
        )
    }

    fn filled_form() -> OrderForm {
        let mut form = OrderForm::new();
        form.set_name("Avery");
        form.set_email("avery@example.com");
        form.set_delivery_date("2099-06-01");
        form.add_flavor();
        form.set_flavor(0, "Sugar");
        form.set_count(0, "12");
        form.set_message("Thanks");
        form
    }

    #[tokio::test]
    async fn test_http_post_round_trips_json() {
        let addr = serve(Router::new().route("/echo", post(echo))).await;
        let client = reqwest::Client::new();

        let response: HttpResponse<serde_json::Value> = http_post(
            &client,
            &format!("http://{addr}/echo"),
            &serde_json::json!({ "hello": "world" }),
        )
        .await
        .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["hello"], "world");
    }

    #[tokio::test]
    async fn test_http_post_non_2xx_is_status_error() {
        let addr = serve(Router::new().route(SEND_EMAIL_PATH, post(reject))).await;
        let client = OrderClient::new(format!("http://{addr}/"));

        let mut form = filled_form();
        let order = form.begin_submit(Utc::now()).unwrap();
        let err = client.place_order(&order).await.unwrap_err();

        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Order failed to send"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_post_unreachable_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result: Result<HttpResponse<MessageBody>, _> = http_post(
            &reqwest::Client::new(),
            &format!("http://{addr}/api/sendEmail"),
            &serde_json::json!({}),
        )
        .await;

        assert!(matches!(result, Err(HttpError::Transport(_))));
    }

    #[tokio::test]
    async fn test_submit_form_success_then_resets() {
        let addr = serve(Router::new().route(SEND_EMAIL_PATH, post(accept))).await;
        let client = OrderClient::new(format!("http://{addr}"));
        let mut form = filled_form();

        let state = submit_form(&mut form, &client, Utc::now()).await.unwrap();
        let SubmissionState::Success { at } = state else {
            panic!("expected success, got {state:?}");
        };
        assert_eq!(form.button().label, "Order Received!");
        assert!(form.button().disabled);

        assert!(!form.tick(at + TimeDelta::milliseconds(2999)));
        assert!(form.tick(at + TimeDelta::milliseconds(3000)));
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(form.cookie_list().is_empty());
    }

    #[tokio::test]
    async fn test_submit_form_failure_keeps_data_and_allows_retry() {
        let addr = serve(Router::new().route(SEND_EMAIL_PATH, post(reject))).await;
        let client = OrderClient::new(format!("http://{addr}"));
        let mut form = filled_form();

        let state = submit_form(&mut form, &client, Utc::now()).await.unwrap();
        assert_eq!(state, SubmissionState::Error);
        assert_eq!(form.button().label, "Please Try Again.");
        assert!(form.can_submit());
        assert_eq!(form.input().name, "Avery");
        assert_eq!(form.cookie_list().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_form_invalid_makes_no_request() {
        // Nothing is listening here; an attempted request would be a transport error.
        let client = OrderClient::new("http://127.0.0.1:9");
        let mut form = OrderForm::new();

        let result = submit_form(&mut form, &client, Utc::now()).await;
        assert!(matches!(result, Err(SubmitRejected::Invalid(_))));
        assert_eq!(form.state(), SubmissionState::Idle);
    }
}
