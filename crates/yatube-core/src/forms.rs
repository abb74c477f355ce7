//! Post form: the static field schema and the cleaning of submitted values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Post;
use crate::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use crate::validation::validate_not_empty;

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Textarea,
    Select,
}

impl Widget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Widget::Textarea => "textarea",
            Widget::Select => "select",
        }
    }
}

/// Rendering hints for one form field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub widget: Widget,
    pub required: bool,
}

/// Ordered list of the fields a form exposes.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Fields of the create/edit post form.
pub const POST_FORM: FormSchema = FormSchema {
    fields: &[
        FieldSpec {
            name: "text",
            label: "Post text",
            help_text: "Text of the new post",
            widget: Widget::Textarea,
            required: true,
        },
        FieldSpec {
            name: "group",
            label: "Group",
            help_text: "Group the post belongs to",
            widget: Widget::Select,
            required: false,
        },
    ],
};

/// Values submitted through the post form.
///
/// `group` holds the raw group id; an empty value means "no group".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// A post form that passed field-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPostForm {
    pub text: String,
    pub group_id: Option<Uuid>,
}

impl PostForm {
    /// Initial values of the edit form.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
        }
    }

    /// Raw submitted value of a schema field.
    pub fn value(&self, field: &str) -> Option<&str> {
        match field {
            "text" => Some(self.text.as_str()),
            "group" => self.group.as_deref(),
            _ => None,
        }
    }

    /// Parse the submitted group id. Blank means no group.
    pub fn group_id(&self) -> Result<Option<Uuid>, ValidationError> {
        match self.group.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| ValidationError::new("group", ValidationErrorKind::InvalidChoice)),
        }
    }

    /// Validate field syntax. Whether the group exists is checked by the service.
    pub fn clean(&self) -> Result<CleanedPostForm, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_not_empty("text", &self.text));

        let group_id = match self.group_id() {
            Ok(id) => id,
            Err(error) => {
                errors.push(error);
                None
            }
        };

        errors.into_result()?;

        Ok(CleanedPostForm {
            text: self.text.trim().to_string(),
            group_id,
        })
    }
}
