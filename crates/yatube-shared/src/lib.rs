//! # Yatube Shared
//!
//! Wire types shared between the server and whatever renders its pages:
//! request bodies, view contexts and error bodies.

pub mod dto;
pub mod response;
pub mod view;

pub use response::{ErrorResponse, ViewResponse};
