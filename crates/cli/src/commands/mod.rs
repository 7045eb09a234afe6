pub mod oauth_url;
pub mod order;
pub mod preview;
