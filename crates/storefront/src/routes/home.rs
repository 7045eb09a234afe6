//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::content::{GALLERY_POSTS, GalleryPost};
use crate::filters;

/// Number of gallery posts previewed on the home page.
const GALLERY_PREVIEW_LEN: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub gallery_preview: &'static [GalleryPost],
}

/// Display the home page: logo header, about blurb, gallery preview and a
/// link to the order form.
#[instrument]
pub async fn home() -> impl IntoResponse {
    HomeTemplate {
        gallery_preview: GALLERY_POSTS
            .get(..GALLERY_PREVIEW_LEN)
            .unwrap_or(GALLERY_POSTS),
    }
}
