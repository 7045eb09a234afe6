//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;

/// Simple titled page with a short body.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub title: &'static str,
    pub body: &'static str,
}

/// Display the About page.
#[instrument]
pub async fn about() -> impl IntoResponse {
    ContentPageTemplate {
        title: "About Me",
        body: "Coming soon...",
    }
}
