//! Persistence interface.
//!
//! [`Store`] is the only way the rest of the system touches accounts, jobs
//! and applications. Two implementations exist:
//!
//! - [`PgStore`]: PostgreSQL via sqlx; uniqueness is enforced by unique
//!   indexes and surfaced as [`StoreError::Conflict`].
//! - [`MemoryStore`]: in-process tables behind a `tokio::sync::RwLock`;
//!   uniqueness is checked inside the write lock.
//!
//! Every read excludes soft-deleted rows.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlx::Error as DatabaseError;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Account, Application, ApplicationStatus, Job, JobChanges, NewAccount, NewJob,
    ParseEnumError,
};
use crate::search::JobQuery;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced record does not exist (or is tombstoned).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// A stored value no longer parses into its domain type.
    #[error("corrupt row: {0}")]
    Corrupt(#[from] ParseEnumError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) const EMAIL_TAKEN: &str = "Email already registered";
pub(crate) const ALREADY_APPLIED: &str = "You have already applied to this job";

/// Persistence operations used by the API and the seeder.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap reachability check for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    // -- accounts ----------------------------------------------------------

    /// Insert an account. `Conflict` if the email is taken, including by a
    /// soft-deleted account.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>>;

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Fetch several accounts at once; missing ids are skipped.
    async fn find_accounts(&self, ids: &[Uuid]) -> StoreResult<Vec<Account>>;

    /// Whether any account (deleted or not) holds this email.
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    // -- jobs --------------------------------------------------------------

    /// Insert a posting with status `open`.
    async fn create_job(&self, job: NewJob) -> StoreResult<Job>;

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>>;

    /// Fetch several jobs at once; missing ids are skipped.
    async fn find_jobs(&self, ids: &[Uuid]) -> StoreResult<Vec<Job>>;

    /// Run a search: the requested page plus the total match count.
    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<(Vec<Job>, i64)>;

    /// All postings of one recruiter, newest first.
    async fn jobs_by_recruiter(&self, recruiter_id: Uuid) -> StoreResult<Vec<Job>>;

    /// Apply a partial update and bump `updated_at`.
    async fn update_job(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job>;

    /// Tombstone a posting.
    async fn delete_job(&self, id: Uuid) -> StoreResult<()>;

    // -- applications ------------------------------------------------------

    /// Insert a `pending` application. `Conflict` if the candidate already
    /// has a live application for the job.
    async fn create_application(&self, job_id: Uuid, candidate_id: Uuid)
    -> StoreResult<Application>;

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    async fn application_exists(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<bool>;

    /// A candidate's applications, newest first.
    async fn applications_by_candidate(&self, candidate_id: Uuid)
    -> StoreResult<Vec<Application>>;

    /// Applications to one posting, newest first.
    async fn applications_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Application>;
}
