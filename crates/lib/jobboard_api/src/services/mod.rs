//! Business logic behind the handlers.

pub mod applications;
pub mod auth;
pub mod jobs;
pub mod validation;
