//! Domain models.
//!
//! These are storage-agnostic domain types; API response shapes live in
//! `jobboard_api::models`.

pub mod account;
pub mod application;
pub mod job;

pub use account::{Account, NewAccount, Role};
pub use application::{Application, ApplicationStatus};
pub use job::{Job, JobChanges, JobStatus, JobType, NewJob};

use thiserror::Error;

/// A string did not name a variant of one of the closed domain enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
