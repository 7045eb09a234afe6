//! View models shared by page templates.

pub mod icon;
pub mod input;

pub use icon::Icon;
pub use input::{FormInput, InputKind};
