//! Gallery route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Path, response::IntoResponse};
use tracing::instrument;

use crate::content::{GALLERY_POSTS, GalleryPost, GalleryPosition, gallery_position};
use crate::components::Icon;
use crate::error::{AppError, Result};
use crate::filters;

/// Gallery grid template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/gallery.html")]
pub struct GalleryTemplate {
    pub posts: &'static [GalleryPost],
}

/// Single gallery post template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/gallery_post.html")]
pub struct GalleryPostTemplate {
    pub position: GalleryPosition,
    pub total: usize,
    pub prev_icon: Icon,
    pub next_icon: Icon,
}

/// Display every gallery post.
#[instrument]
pub async fn index() -> impl IntoResponse {
    GalleryTemplate {
        posts: GALLERY_POSTS,
    }
}

/// Display one post with previous/next navigation.
///
/// # Errors
///
/// Returns 404 if the index is past the last post.
#[instrument]
pub async fn show(Path(index): Path<usize>) -> Result<impl IntoResponse> {
    let position = gallery_position(index)
        .ok_or_else(|| AppError::NotFound(format!("gallery post {index}")))?;
    Ok(GalleryPostTemplate {
        position,
        total: GALLERY_POSTS.len(),
        prev_icon: Icon::ChevronLeft,
        next_icon: Icon::ChevronRight,
    })
}
