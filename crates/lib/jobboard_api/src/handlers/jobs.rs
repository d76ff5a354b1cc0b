//! Job posting handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    CreateJobRequest, ErrorResponse, JobListResponse, JobResponse, ListJobsParams, MessageResponse,
    UpdateJobRequest,
};
use crate::services::jobs;

/// `GET /api/jobs`: search open postings (see `ListJobsParams`).
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(ListJobsParams),
    responses(
        (status = 200, description = "One page of matching postings", body = JobListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse)
    ),
    tag = "jobs"
)]
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    params: Result<Query<ListJobsParams>, QueryRejection>,
) -> AppResult<Json<JobListResponse>> {
    let Query(params) = params?;
    Ok(Json(jobs::list(&state, &params).await?))
}

/// `GET /api/jobs/{id}`
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Posting with its recruiter", body = JobResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "jobs"
)]
pub async fn get_job_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<JobResponse>> {
    let Path(id) = id?;
    Ok(Json(jobs::get(&state, id).await?))
}

/// `POST /api/jobs`: recruiters only.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Posting created", body = JobResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not a recruiter", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn create_job_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    let Json(body) = body?;
    let job = jobs::create(&state, &claims, body).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// `PUT /api/jobs/{id}`: owning recruiter only.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Posting updated", body = JobResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn update_job_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> AppResult<Json<JobResponse>> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(jobs::update(&state, &claims, id, body).await?))
}

/// `DELETE /api/jobs/{id}`: owning recruiter only; soft delete.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Posting deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn delete_job_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    Ok(Json(jobs::delete(&state, &claims, id).await?))
}

/// `GET /api/jobs/my-jobs`
#[utoipa::path(
    get,
    path = "/api/jobs/my-jobs",
    responses(
        (status = 200, description = "The caller's postings, any status", body = Vec<JobResponse>),
        (status = 403, description = "Not a recruiter", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn my_jobs_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<JobResponse>>> {
    Ok(Json(jobs::my_jobs(&state, &claims).await?))
}
