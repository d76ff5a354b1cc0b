//! # jobboard_api
//!
//! HTTP API library for the job board.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::from_fn_with_state;
use axum::routing::{MethodRouter, get, post, put};
use jobboard_core::auth::{PasswordHasher, TokenService};
use jobboard_core::models::Role;
use jobboard_core::store::Store;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{applications, auth, health, jobs};
use crate::middleware::auth::{RoleGate, require_auth, require_roles};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend.
    pub store: Arc<dyn Store>,
    /// Token issuing and validation, built once from the config.
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        Self {
            store,
            tokens: Arc::new(config.token_service()),
            hasher: config.password_hasher(),
            config,
        }
    }
}

const RECRUITERS: RoleGate = RoleGate(&[Role::Recruiter]);
const CANDIDATES: RoleGate = RoleGate(&[Role::Candidate]);

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let signed_in = |routes: MethodRouter<AppState>| protect(routes, &state, None);
    let recruiters = |routes: MethodRouter<AppState>| protect(routes, &state, Some(RECRUITERS));
    let candidates = |routes: MethodRouter<AppState>| protect(routes, &state, Some(CANDIDATES));

    let api = Router::new()
        // Auth
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/auth/me", signed_in(get(auth::me_handler)))
        // Jobs
        .route(
            "/jobs",
            get(jobs::list_jobs_handler).merge(recruiters(post(jobs::create_job_handler))),
        )
        .route("/jobs/my-jobs", recruiters(get(jobs::my_jobs_handler)))
        .route(
            "/jobs/{id}",
            get(jobs::get_job_handler).merge(recruiters(
                put(jobs::update_job_handler).delete(jobs::delete_job_handler),
            )),
        )
        .route(
            "/jobs/{id}/applications",
            recruiters(get(applications::job_applications_handler)),
        )
        // Applications
        .route(
            "/applications",
            candidates(post(applications::apply_handler)),
        )
        .route(
            "/applications/my-applications",
            candidates(get(applications::my_applications_handler)),
        )
        .route(
            "/applications/{id}",
            recruiters(put(applications::update_status_handler)),
        );

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .merge(openapi::swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Put `routes` behind access-token authentication and, when given, a role
/// gate (which runs after authentication).
///
/// `route_layer` leaves the method fallback unguarded, so an unsupported
/// method is a 405 even without a token.
fn protect(
    routes: MethodRouter<AppState>,
    state: &AppState,
    gate: Option<RoleGate>,
) -> MethodRouter<AppState> {
    let routes = match gate {
        Some(gate) => routes.route_layer(from_fn_with_state(gate, require_roles)),
        None => routes,
    };
    routes.route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// Credentialed CORS for an explicit origin list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
}
