//! Signing secret resolution.

use std::io;
use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

/// Length of generated secrets.
const GENERATED_SECRET_LEN: usize = 64;

/// Resolve the signing secret: `JWT_SECRET` env var, otherwise the secret
/// persisted under the platform data directory (generated on first use).
pub fn resolve_jwt_secret() -> io::Result<String> {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.trim().is_empty()
    {
        return Ok(secret);
    }
    load_or_generate(&default_secret_path())
}

/// Read the secret stored at `path`, or generate and store a new one.
pub fn load_or_generate(path: &Path) -> io::Result<String> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &secret)?;
    info!(path = %path.display(), "generated new JWT secret");
    Ok(secret)
}

/// `<data_dir>/jobboard/jwt-secret`, falling back to the working directory.
fn default_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobboard")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_once_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jwt-secret");

        let first = load_or_generate(&path).unwrap();
        assert_eq!(first.len(), GENERATED_SECRET_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));

        let second = load_or_generate(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_file_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jwt-secret");
        std::fs::write(&path, "  \n").unwrap();

        let secret = load_or_generate(&path).unwrap();
        assert_eq!(secret.len(), GENERATED_SECRET_LEN);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), secret);
    }
}
