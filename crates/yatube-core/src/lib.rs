//! # Yatube Core
//!
//! The domain layer of Yatube: posts, groups, the post form, pagination and
//! the services page controllers call.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, ValidationError, ValidationErrorKind, ValidationErrors};
