//! # jobboard_core
//!
//! Core domain logic for the job board: credentials, access control,
//! job search and persistence.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod search;
pub mod seed;
pub mod store;
pub mod text;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
