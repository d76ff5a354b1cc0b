//! Authentication middleware: bearer token extraction, then role gates.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use jobboard_core::auth::{Claims, GuardError, Role, TokenClass, authenticate, authorize};

use crate::AppState;
use crate::error::AppError;

/// Key used to store the verified `Claims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| GuardError::MissingContext.into())
    }
}

/// Roles permitted through a [`require_roles`] layer.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate(pub &'static [Role]);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies it is
/// a valid access token, and injects `AuthenticatedUser` into request
/// extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let claims = authenticate(header, &state.tokens, TokenClass::Access)?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

/// Axum middleware: rejects identities whose role is not in the gate.
///
/// Must run inside [`require_auth`].
pub async fn require_roles(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request.extensions().get::<AuthenticatedUser>();
    authorize(user.map(|u| &u.0), gate.0)?;
    Ok(next.run(request).await)
}
