//! Request guard: credential extraction, role gate and ownership.
//!
//! Transport-agnostic; `jobboard_api::middleware::auth` wires these checks
//! into axum.

use thiserror::Error;
use uuid::Uuid;

use super::jwt::{Claims, TokenClass, TokenError, TokenService};
use crate::models::{Job, Role};

/// Authorization scheme prefix expected in the credential header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Guard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("Authorization header required")]
    MissingCredential,

    #[error("Invalid authorization format")]
    MalformedCredential,

    #[error("Invalid or expired token")]
    InvalidCredential(#[source] TokenError),

    #[error("Invalid token type: expected {expected} token")]
    WrongCredentialClass {
        expected: TokenClass,
        actual: TokenClass,
    },

    #[error("Insufficient permissions")]
    Forbidden,

    /// The role gate ran without a prior authentication step.
    #[error("Authenticated identity missing from request context")]
    MissingContext,
}

/// Authenticate a raw `Authorization` header value.
///
/// Requires the `Bearer <token>` form and a valid token of class `expected`.
pub fn authenticate(
    header: Option<&str>,
    tokens: &TokenService,
    expected: TokenClass,
) -> Result<Claims, GuardError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(GuardError::MissingCredential)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GuardError::MalformedCredential)?;

    tokens
        .validate_class(token, expected)
        .map_err(|e| match e {
            TokenError::WrongTokenClass { expected, actual } => {
                GuardError::WrongCredentialClass { expected, actual }
            }
            other => GuardError::InvalidCredential(other),
        })
}

/// Role gate: the authenticated identity must hold one of `allowed`.
pub fn authorize<'a>(claims: Option<&'a Claims>, allowed: &[Role]) -> Result<&'a Claims, GuardError> {
    let claims = claims.ok_or(GuardError::MissingContext)?;
    if allowed.contains(&claims.role) {
        Ok(claims)
    } else {
        Err(GuardError::Forbidden)
    }
}

/// A resource with a single owning account.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Job {
    fn owner_id(&self) -> Uuid {
        self.recruiter_id
    }
}

/// Whether `identity` owns `resource`.
pub fn is_owner<R: Owned + ?Sized>(resource: &R, identity: &Claims) -> bool {
    resource.owner_id() == identity.sub
}

/// [`is_owner`] as a guard step.
pub fn ensure_owner<R: Owned + ?Sized>(resource: &R, identity: &Claims) -> Result<(), GuardError> {
    if is_owner(resource, identity) {
        Ok(())
    } else {
        Err(GuardError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::{JobStatus, JobType};

    fn tokens() -> TokenService {
        TokenService::new(b"guard-test-secret", Duration::minutes(5), Duration::days(1))
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn missing_and_malformed_headers() {
        let svc = tokens();
        assert_eq!(
            authenticate(None, &svc, TokenClass::Access),
            Err(GuardError::MissingCredential)
        );
        assert_eq!(
            authenticate(Some(""), &svc, TokenClass::Access),
            Err(GuardError::MissingCredential)
        );
        assert_eq!(
            authenticate(Some("Token abc"), &svc, TokenClass::Access),
            Err(GuardError::MalformedCredential)
        );
        assert_eq!(
            authenticate(Some("Bearer "), &svc, TokenClass::Access),
            Err(GuardError::MalformedCredential)
        );
    }

    #[test]
    fn invalid_token_is_invalid_credential() {
        let svc = tokens();
        assert_eq!(
            authenticate(Some("Bearer garbage"), &svc, TokenClass::Access),
            Err(GuardError::InvalidCredential(TokenError::Malformed))
        );
    }

    #[test]
    fn class_mismatch_is_reported() {
        let svc = tokens();
        let pair = svc
            .issue_pair(Uuid::now_v7(), "c@example.com", Role::Candidate)
            .unwrap();

        let claims = authenticate(Some(&bearer(&pair.access_token)), &svc, TokenClass::Access)
            .unwrap();
        assert_eq!(claims.email, "c@example.com");

        assert_eq!(
            authenticate(Some(&bearer(&pair.refresh_token)), &svc, TokenClass::Access),
            Err(GuardError::WrongCredentialClass {
                expected: TokenClass::Access,
                actual: TokenClass::Refresh,
            })
        );
        assert!(
            authenticate(Some(&bearer(&pair.refresh_token)), &svc, TokenClass::Refresh).is_ok()
        );
    }

    #[test]
    fn role_gate() {
        let svc = tokens();
        let pair = svc
            .issue_pair(Uuid::now_v7(), "r@example.com", Role::Recruiter)
            .unwrap();
        let claims = svc.validate_access(&pair.access_token).unwrap();

        assert!(authorize(Some(&claims), &[Role::Recruiter]).is_ok());
        assert!(authorize(Some(&claims), &Role::ALL).is_ok());
        assert_eq!(
            authorize(Some(&claims), &[Role::Candidate]),
            Err(GuardError::Forbidden)
        );
        assert_eq!(
            authorize(None, &[Role::Recruiter]),
            Err(GuardError::MissingContext)
        );
    }

    #[test]
    fn ownership() {
        let svc = tokens();
        let owner_id = Uuid::now_v7();
        let owner = svc
            .validate_access(
                &svc.issue(TokenClass::Access, owner_id, "o@example.com", Role::Recruiter)
                    .unwrap(),
            )
            .unwrap();
        let stranger = svc
            .validate_access(
                &svc.issue(TokenClass::Access, Uuid::now_v7(), "s@example.com", Role::Recruiter)
                    .unwrap(),
            )
            .unwrap();

        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            recruiter_id: owner_id,
            title: "DevOps Engineer".into(),
            description: "Kubernetes".into(),
            salary: None,
            location: "São Paulo, SP".into(),
            job_type: JobType::Onsite,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        };

        assert!(is_owner(&job, &owner));
        assert!(ensure_owner(&job, &owner).is_ok());
        assert!(!is_owner(&job, &stranger));
        assert_eq!(ensure_owner(&job, &stranger), Err(GuardError::Forbidden));
    }
}
