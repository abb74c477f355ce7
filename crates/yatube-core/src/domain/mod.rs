//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::{GROUP_SLUG_MAX_LENGTH, GROUP_TITLE_MAX_LENGTH, Group};
pub use post::{POST_PREVIEW_CHARS, Post, PostView};
pub use user::{Actor, Author, User};
