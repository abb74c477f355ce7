//! Application services - orchestrate the ports on behalf of page controllers.

mod groups;
mod posts;

pub use groups::GroupService;
pub use posts::PostService;
