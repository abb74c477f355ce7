//! Field-level validation rules shared by the post and group forms.

use crate::error::{ValidationError, ValidationErrorKind};

/// Reject values that are empty once surrounding whitespace is removed.
pub fn validate_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, ValidationErrorKind::EmptyField));
    }
    Ok(())
}

/// Length is counted in characters, not bytes.
pub fn validate_max_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            ValidationErrorKind::TooLong { max },
        ));
    }
    Ok(())
}

/// Slugs are ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(ValidationError::new(field, ValidationErrorKind::InvalidSlug));
    }
    Ok(())
}
