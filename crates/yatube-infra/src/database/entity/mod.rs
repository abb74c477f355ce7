//! SeaORM entities mirroring the migration schema.

pub mod group;
pub mod post;
pub mod user;
