//! Accounts and roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ParseEnumError;

/// Account role.
///
/// Recruiters publish and manage job postings; candidates apply to them.
/// Older clients call the recruiter role `admin`, which is accepted on input.
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "admin")]
    Recruiter,
    Candidate,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Recruiter, Role::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recruiter" | "admin" => Ok(Role::Recruiter),
            "candidate" => Ok(Role::Candidate),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
                expected: "recruiter, candidate",
            }),
        }
    }
}

/// A registered account. Carries the password hash, so it never leaves the
/// server as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively_and_accepts_admin_alias() {
        assert_eq!("Recruiter".parse::<Role>(), Ok(Role::Recruiter));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Recruiter));
        assert_eq!("CANDIDATE".parse::<Role>(), Ok(Role::Candidate));
        assert!("viewer".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Recruiter).unwrap(), "\"recruiter\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Recruiter);
    }
}
