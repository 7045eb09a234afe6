//! Static site content: the gallery of past orders.

/// A single photo in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryPost {
    /// File stem under `static/images/posts/`
    pub slug: &'static str,
    /// Alt text
    pub alt: &'static str,
}

impl GalleryPost {
    /// Public URL of the photo.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/static/images/posts/{}.svg", self.slug)
    }
}

/// Gallery posts in display order.
pub const GALLERY_POSTS: &[GalleryPost] = &[
    GalleryPost { slug: "baby", alt: "Baby shower cookies" },
    GalleryPost { slug: "baby2", alt: "Baby shower cookies" },
    GalleryPost { slug: "birthday", alt: "Birthday cookies" },
    GalleryPost { slug: "cars", alt: "Race car cookies" },
    GalleryPost { slug: "cars2", alt: "Race car cookies" },
    GalleryPost { slug: "marvel", alt: "Superhero cookies" },
    GalleryPost { slug: "potter", alt: "Wizard school cookies" },
    GalleryPost { slug: "potter2", alt: "Wizard school cookies" },
    GalleryPost { slug: "potter3", alt: "Wizard school cookies" },
];

/// A post together with its neighbours, for the single-post view.
#[derive(Debug, Clone, Copy)]
pub struct GalleryPosition {
    pub index: usize,
    pub post: GalleryPost,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// Look up the post at `index`. Navigation stops at the first and last posts.
#[must_use]
pub fn gallery_position(index: usize) -> Option<GalleryPosition> {
    let post = *GALLERY_POSTS.get(index)?;
    Some(GalleryPosition {
        index,
        post,
        prev: index.checked_sub(1),
        next: Some(index + 1).filter(|next| *next < GALLERY_POSTS.len()),
    })
}
