use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationErrors;
use crate::validation::{validate_max_length, validate_not_empty, validate_slug};

pub const GROUP_TITLE_MAX_LENGTH: usize = 200;
pub const GROUP_SLUG_MAX_LENGTH: usize = 50;

/// A named community posts can be published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Build a validated group. Title and slug are trimmed first.
    pub fn new(title: &str, slug: &str, description: &str) -> Result<Self, ValidationErrors> {
        let title = title.trim();
        let slug = slug.trim();

        let mut errors = ValidationErrors::new();
        errors.check(validate_not_empty("title", title));
        errors.check(validate_max_length("title", title, GROUP_TITLE_MAX_LENGTH));
        errors.check(validate_slug("slug", slug));
        errors.check(validate_max_length("slug", slug, GROUP_SLUG_MAX_LENGTH));
        errors.into_result()?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.trim().to_string(),
        })
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
