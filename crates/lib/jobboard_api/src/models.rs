//! Request and response bodies.
//!
//! JSON field names are snake_case. Domain enums serialize as their
//! lowercase wire values.

use chrono::{DateTime, Utc};
use jobboard_core::models::{
    Account, Application, ApplicationStatus, Job, JobStatus, JobType, Role,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Parsed by the service so a missing or unknown role is a validation
    /// error with a readable message.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            role: a.role,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AccountResponse,
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub salary: Option<f64>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

/// Every field is optional; empty strings leave the field unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub salary: Option<f64>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub status: Option<String>,
}

/// Query string of `GET /api/jobs`. Values stay raw strings so that bad
/// input becomes a validation error naming the parameter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListJobsParams {
    pub search: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// Alias of `page_size`.
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiter: Option<AccountResponse>,
}

impl JobResponse {
    pub fn new(job: &Job, recruiter: Option<&Account>) -> Self {
        Self {
            id: job.id,
            recruiter_id: job.recruiter_id,
            title: job.title.clone(),
            description: job.description.clone(),
            salary: job.salary,
            location: job.location.clone(),
            job_type: job.job_type,
            status: job.status,
            created_at: job.created_at,
            updated_at: job.updated_at,
            recruiter: recruiter.map(AccountResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub jobs: Vec<JobResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

/// An application with at most one embedded side: the job (candidate
/// views) or the candidate (recruiter views).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<AccountResponse>,
}

impl ApplicationResponse {
    fn bare(app: &Application) -> Self {
        Self {
            id: app.id,
            job_id: app.job_id,
            candidate_id: app.candidate_id,
            status: app.status,
            created_at: app.created_at,
            updated_at: app.updated_at,
            job: None,
            candidate: None,
        }
    }

    /// Candidate view.
    pub fn with_job(app: &Application, job: Option<&Job>) -> Self {
        Self {
            job: job.map(|j| JobResponse::new(j, None)),
            ..Self::bare(app)
        }
    }

    /// Recruiter view.
    pub fn with_candidate(app: &Application, candidate: Option<&Account>) -> Self {
        Self {
            candidate: candidate.map(AccountResponse::from),
            ..Self::bare(app)
        }
    }
}
