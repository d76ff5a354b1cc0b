//! Authentication and authorization.
//!
//! Password hashing, signed token issuance/validation and the request
//! guard (credential extraction, role gate, ownership predicate). Shared by
//! `jobboard_api` and the seeding CLI.

pub mod guard;
pub mod jwt;
pub mod password;
pub mod secret;

pub use crate::models::Role;
pub use guard::{GuardError, Owned, authenticate, authorize, ensure_owner, is_owner};
pub use jwt::{Claims, TokenClass, TokenError, TokenPair, TokenService};
pub use password::{PasswordError, PasswordHasher};
