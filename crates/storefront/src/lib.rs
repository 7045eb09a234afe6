//! Cookies by Coffey storefront library.
//!
//! Public site pages, the server-rendered order form and the order intake
//! endpoint. Exposed as a library so the router can be tested in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{RateLimiterLayer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Static assets directory.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront router.
///
/// Pass `Some(order_rate_limiter())` in production. The limiter keys on the
/// client IP, so the server must run with connect info or behind a proxy
/// that sets forwarding headers.
pub fn app(state: AppState, order_limiter: Option<RateLimiterLayer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(order_limiter))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use coffey_core::OrderRequest;
    use tower::ServiceExt;

    use super::*;
    use crate::services::{MailError, OrderMailer};

    #[derive(Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<OrderRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl OrderMailer for RecordingMailer {
        async fn send_order(&self, order: &OrderRequest) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::InvalidAddress("relay unavailable".to_string()));
            }
            self.sent.lock().unwrap().push(order.clone());
            Ok(())
        }
    }

    fn router(mailer: RecordingMailer) -> Router {
        app(AppState::new(mailer), None)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn order_json() -> String {
        serde_json::json!({
            "name": "Avery",
            "email": "avery@example.com",
            "deliveryDate": "2099-06-01T00:00:00Z",
            "cookieList": [{ "flavor": "Sugar", "count": 12 }],
            "message": "Blue frosting"
        })
        .to_string()
    }

    fn post_json(body: String) -> Request<Body> {
        Request::post("/api/sendEmail")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::post("/order")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(RecordingMailer::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_send_email_success() {
        let mailer = RecordingMailer::default();
        let response = router(mailer.clone())
            .oneshot(post_json(order_json()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["message"], "Order placed successfully");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "Avery");
        assert!(sent[0].phone.is_none());
    }

    #[tokio::test]
    async fn test_send_email_accepts_date_only_delivery() {
        let mailer = RecordingMailer::default();
        let body = order_json().replace("2099-06-01T00:00:00Z", "2099-06-01");
        let response = router(mailer.clone()).oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].delivery_date.to_rfc3339(), "2099-06-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_send_email_failure_is_500() {
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let response = router(mailer).oneshot(post_json(order_json())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["message"], "Order failed to send");
    }

    #[tokio::test]
    async fn test_send_email_rejects_other_methods() {
        for method in ["GET", "PUT", "DELETE"] {
            let mailer = RecordingMailer::default();
            let request = Request::builder()
                .method(method)
                .uri("/api/sendEmail")
                .body(Body::from(order_json()))
                .unwrap();
            let response = router(mailer.clone()).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            let body: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            assert_eq!(body["message"], "Only POST requests allowed");
            assert!(mailer.sent.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_send_email_malformed_body_never_mails() {
        let mailer = RecordingMailer::default();
        let response = router(mailer.clone())
            .oneshot(post_json("{\"name\":".to_string()))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pages_render() {
        for (path, needle) in [
            ("/", "Cookies by Coffey"),
            ("/about", "Coming soon..."),
            ("/gallery", "/static/images/posts/potter3.svg"),
            ("/gallery/0", "/gallery/1"),
            ("/order", "Send Order"),
        ] {
            let response = router(RecordingMailer::default())
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert!(response.headers().contains_key("content-security-policy"));
            assert!(body_text(response).await.contains(needle), "{path}");
        }
    }

    #[tokio::test]
    async fn test_gallery_post_out_of_range() {
        let response = router(RecordingMailer::default())
            .oneshot(Request::get("/gallery/9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn post_form_from(path: &str, body: &str, client_ip: &str) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", client_ip)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_line_item_edits_are_not_rate_limited() {
        let router = app(
            AppState::new(RecordingMailer::default()),
            Some(crate::middleware::order_rate_limiter()),
        );

        for _ in 0..8 {
            let response = router
                .clone()
                .oneshot(post_form_from("/order/items", "action=add", "198.51.100.20"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_order_submissions_are_rate_limited() {
        let mailer = RecordingMailer::default();
        let router = app(
            AppState::new(mailer.clone()),
            Some(crate::middleware::order_rate_limiter()),
        );

        let mut statuses = Vec::new();
        for _ in 0..6 {
            let response = router
                .clone()
                .oneshot(post_form_from("/order", "action=submit", "198.51.100.21"))
                .await
                .unwrap();
            statuses.push(response.status());
        }

        assert!(
            statuses
                .iter()
                .take(5)
                .all(|status| *status == StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(statuses.last(), Some(&StatusCode::TOO_MANY_REQUESTS));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_route_never_sends() {
        let mailer = RecordingMailer::default();
        let body = "name=Avery&email=avery%40example.com&deliveryDate=2099-06-01\
                    &flavor=Sugar&count=12&message=Hi&action=submit";
        let response = router(mailer.clone())
            .oneshot(post_form_from("/order/items", body, "198.51.100.22"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Send Order"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_icons_render() {
        let gallery = router(RecordingMailer::default())
            .oneshot(Request::get("/gallery/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_text(gallery).await;
        assert!(body.contains(">chevron_left<"));
        assert!(body.contains(">chevron_right<"));

        let order = router(RecordingMailer::default())
            .oneshot(post_form_from("/order/items", "flavor=Sugar&count=1&action=add", "198.51.100.23"))
            .await
            .unwrap();
        let body = body_text(order).await;
        assert!(body.contains(">close<"));
        assert!(body.contains(">add<"));
    }

    #[tokio::test]
    async fn test_order_form_add_line_item() {
        let response = router(RecordingMailer::default())
            .oneshot(post_form("name=Avery&action=add"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("id=\"flavor-0\""));
        assert!(html.contains("value=\"Avery\""));
    }

    #[tokio::test]
    async fn test_order_form_invalid_submit_shows_errors() {
        let mailer = RecordingMailer::default();
        let response = router(mailer.clone())
            .oneshot(post_form("name=&email=nope&action=submit"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Please enter your name."));
        assert!(html.contains("Please enter a valid email."));
        assert!(html.contains("Please add at least one cookie flavor."));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_form_submit_sends_and_refreshes() {
        let mailer = RecordingMailer::default();
        let body = "name=Avery&email=avery%40example.com&phone=5551234567\
                    &deliveryDate=2099-06-01&flavor=Sugar&count=12\
                    &flavor=Lemon&count=6&message=Thanks&action=submit";
        let response = router(mailer.clone()).oneshot(post_form(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Order Received!"));
        assert!(html.contains("http-equiv=\"refresh\""));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone.as_deref(), Some("(555)123-4567"));
        assert_eq!(sent[0].cookie_list.len(), 2);
        assert_eq!(sent[0].total_cookies(), 18);
    }

    #[tokio::test]
    async fn test_order_form_mail_failure_keeps_data() {
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let body = "name=Avery&email=avery%40example.com&deliveryDate=2099-06-01\
                    &flavor=Sugar&count=12&message=Thanks&action=submit";
        let response = router(mailer).oneshot(post_form(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Please Try Again."));
        assert!(html.contains("value=\"Sugar\""));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }
}
