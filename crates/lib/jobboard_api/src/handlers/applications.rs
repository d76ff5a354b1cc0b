//! Application handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ApplicationResponse, CreateApplicationRequest, ErrorResponse, UpdateApplicationStatusRequest,
};
use crate::services::applications;

/// `POST /api/applications`: candidates only.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application created", body = ApplicationResponse),
        (status = 400, description = "Job is not accepting applications", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 409, description = "Already applied", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn apply_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    body: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    let Json(body) = body?;
    let app = applications::apply(&state, &claims, body).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

/// `GET /api/applications/my-applications`
#[utoipa::path(
    get,
    path = "/api/applications/my-applications",
    responses(
        (status = 200, description = "The candidate's applications with their jobs", body = Vec<ApplicationResponse>),
        (status = 403, description = "Not a candidate", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn my_applications_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ApplicationResponse>>> {
    Ok(Json(applications::my_applications(&state, &claims).await?))
}

/// `GET /api/jobs/{id}/applications`: owning recruiter only.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applications",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Applications with their candidates", body = Vec<ApplicationResponse>),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn job_applications_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<ApplicationResponse>>> {
    let Path(id) = id?;
    Ok(Json(applications::job_applications(&state, &claims, id).await?))
}

/// `PUT /api/applications/{id}`: owner of the application's posting only.
#[utoipa::path(
    put,
    path = "/api/applications/{id}",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 403, description = "Not the owner of the job", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn update_status_handler(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateApplicationStatusRequest>, JsonRejection>,
) -> AppResult<Json<ApplicationResponse>> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(
        applications::update_status(&state, &claims, id, body).await?,
    ))
}
