//! Application service: candidates apply, recruiters review.

use std::collections::{BTreeSet, HashMap};

use jobboard_core::auth::{Claims, ensure_owner};
use jobboard_core::models::{Account, ApplicationStatus, Job};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ApplicationResponse, CreateApplicationRequest, UpdateApplicationStatusRequest};
use crate::services::jobs::{find_job, owned_job};
use crate::services::validation;

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Apply to an open posting as the authenticated candidate.
pub async fn apply(
    state: &AppState,
    claims: &Claims,
    req: CreateApplicationRequest,
) -> AppResult<ApplicationResponse> {
    let job = find_job(state, req.job_id).await?;
    if !job.accepts_applications() {
        return Err(AppError::Validation(
            "Job is not accepting applications".into(),
        ));
    }

    // Fast path; the unique index still decides races.
    if state.store.application_exists(job.id, claims.sub).await? {
        return Err(AppError::Conflict(
            "You have already applied to this job".into(),
        ));
    }

    let app = state.store.create_application(job.id, claims.sub).await?;
    info!(application_id = %app.id, job_id = %job.id, candidate_id = %claims.sub, "application created");
    Ok(ApplicationResponse::with_job(&app, Some(&job)))
}

/// The candidate's applications, each with its posting.
pub async fn my_applications(
    state: &AppState,
    claims: &Claims,
) -> AppResult<Vec<ApplicationResponse>> {
    let apps = state.store.applications_by_candidate(claims.sub).await?;
    let job_ids = unique(apps.iter().map(|a| a.job_id));
    let jobs: HashMap<Uuid, Job> = state
        .store
        .find_jobs(&job_ids)
        .await?
        .into_iter()
        .map(|j| (j.id, j))
        .collect();

    Ok(apps
        .iter()
        .map(|a| ApplicationResponse::with_job(a, jobs.get(&a.job_id)))
        .collect())
}

/// Applications to one of the recruiter's postings, each with its candidate.
pub async fn job_applications(
    state: &AppState,
    claims: &Claims,
    job_id: Uuid,
) -> AppResult<Vec<ApplicationResponse>> {
    owned_job(
        state,
        claims,
        job_id,
        "You can only view applications for your own jobs",
    )
    .await?;

    let apps = state.store.applications_by_job(job_id).await?;
    let candidate_ids = unique(apps.iter().map(|a| a.candidate_id));
    let candidates: HashMap<Uuid, Account> = state
        .store
        .find_accounts(&candidate_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(apps
        .iter()
        .map(|a| ApplicationResponse::with_candidate(a, candidates.get(&a.candidate_id)))
        .collect())
}

/// Move an application to a new review state. Only the owner of the
/// application's posting may do this.
pub async fn update_status(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    req: UpdateApplicationStatusRequest,
) -> AppResult<ApplicationResponse> {
    let status: ApplicationStatus = validation::parse("status", &req.status)?;

    let app = state
        .store
        .find_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;
    let job = find_job(state, app.job_id).await?;
    ensure_owner(&job, claims).map_err(|_| {
        AppError::Forbidden("You can only update applications for your own jobs".into())
    })?;

    let updated = state.store.update_application_status(id, status).await?;
    info!(application_id = %id, %status, "application status updated");

    let candidate = state.store.find_account(updated.candidate_id).await?;
    Ok(ApplicationResponse::with_candidate(&updated, candidate.as_ref()))
}
