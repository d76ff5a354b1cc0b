//! OpenAPI document and Swagger UI.
//!
//! The document is generated by utoipa from the `#[utoipa::path]`
//! annotations on the handlers and the `ToSchema` derives on the request
//! and response bodies. Swagger UI is served at `/docs`, the raw JSON at
//! [`OPENAPI_JSON_PATH`].
//!
//! A new endpoint needs:
//!
//! 1. `ToSchema` on its request/response types
//! 2. `#[utoipa::path(...)]` on its handler
//! 3. an entry in `paths(...)` (and `schemas(...)` for new types) below

use axum::Router;
use jobboard_core::models::{ApplicationStatus, JobStatus, JobType, Role};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{applications, auth, health, jobs};
use crate::models::{
    AccountResponse, ApplicationResponse, AuthResponse, CreateApplicationRequest,
    CreateJobRequest, ErrorResponse, HealthResponse, JobListResponse, JobResponse, LoginRequest,
    MessageResponse, RefreshRequest, RegisterRequest, UpdateApplicationStatusRequest,
    UpdateJobRequest,
};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        description = "Recruiters publish job postings; candidates browse them and apply. \
                       Protected endpoints take `Authorization: Bearer <access_token>`."
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, sign-in and token refresh"),
        (name = "jobs", description = "Job postings"),
        (name = "applications", description = "Applications to job postings")
    ),
    components(schemas(
        Role,
        JobType,
        JobStatus,
        ApplicationStatus,
        ErrorResponse,
        MessageResponse,
        HealthResponse,
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        AccountResponse,
        AuthResponse,
        CreateJobRequest,
        UpdateJobRequest,
        JobResponse,
        JobListResponse,
        CreateApplicationRequest,
        UpdateApplicationStatusRequest,
        ApplicationResponse,
    )),
    paths(
        health::health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::refresh_handler,
        auth::me_handler,
        jobs::list_jobs_handler,
        jobs::get_job_handler,
        jobs::create_job_handler,
        jobs::update_job_handler,
        jobs::delete_job_handler,
        jobs::my_jobs_handler,
        applications::apply_handler,
        applications::my_applications_handler,
        applications::job_applications_handler,
        applications::update_status_handler,
    )
)]
pub struct ApiDoc;

/// Swagger UI at [`DOCS_PATH`] backed by the generated document.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(DOCS_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}
