//! Authentication service: register, login, refresh and profile lookups.

use jobboard_core::auth::{Claims, Role};
use jobboard_core::models::{Account, NewAccount};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AccountResponse, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::services::validation;

const TOKEN_TYPE: &str = "Bearer";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Issue a fresh token pair for `account`.
fn auth_response(state: &AppState, account: &Account) -> AppResult<AuthResponse> {
    let pair = state
        .tokens
        .issue_pair(account.id, &account.email, account.role)?;
    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: TOKEN_TYPE.into(),
        expires_in: pair.expires_in,
        user: AccountResponse::from(account),
    })
}

/// Create an account and sign it in.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<AuthResponse> {
    let email = validation::email(&req.email)?;
    validation::password(&req.password)?;
    let role: Role = match req.role.as_deref() {
        Some(raw) if !raw.trim().is_empty() => validation::parse("role", raw)?,
        _ => return Err(AppError::Validation("role is required".into())),
    };

    // Fast path; the unique index still decides races.
    if state.store.email_exists(&email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = state.hasher.hash(&req.password)?;
    let account = state
        .store
        .create_account(NewAccount {
            email,
            password_hash,
            role,
        })
        .await?;
    info!(account_id = %account.id, %role, "account registered");

    auth_response(state, &account)
}

/// Exchange email + password for a token pair.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = validation::email(&req.email)?;
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }

    let Some(account) = state.store.find_account_by_email(&email).await? else {
        warn!(%email, "login for unknown account");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };
    if !state.hasher.verify(&req.password, &account.password_hash) {
        warn!(account_id = %account.id, "login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    auth_response(state, &account)
}

/// Exchange a refresh token for a new pair. The account must still exist;
/// email and role are re-read from the store.
pub async fn refresh(state: &AppState, req: RefreshRequest) -> AppResult<AuthResponse> {
    let claims = state.tokens.validate_refresh(req.refresh_token.trim())?;
    let account = state
        .store
        .find_account(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    auth_response(state, &account)
}

/// Profile of the authenticated identity.
pub async fn me(state: &AppState, claims: &Claims) -> AppResult<AccountResponse> {
    let account = state
        .store
        .find_account(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(AccountResponse::from(&account))
}
