//! Password hashing via bcrypt.
//!
//! Every digest embeds its own random salt, so hashing the same password
//! twice yields two different strings that both verify.

use thiserror::Error;

/// bcrypt cost factor used when nothing else is configured.
pub const DEFAULT_COST: u32 = 10;

/// Bounds of the bcrypt cost factor.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Password hashing failure. Never caused by the password itself.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// bcrypt hasher with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher, clamping `cost` into bcrypt's accepted range.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Verify a password against a stored digest.
    ///
    /// Malformed digests simply fail verification.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        bcrypt::verify(password, digest).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(MIN_COST)
    }

    #[test]
    fn hash_and_verify() {
        let hasher = fast();
        let digest = hasher.hash("testpassword123").unwrap();
        assert_ne!(digest, "testpassword123");
        assert!(hasher.verify("testpassword123", &digest));
        assert!(!hasher.verify("wrongpassword", &digest));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = fast();
        let a = hasher.hash("samepassword").unwrap();
        let b = hasher.hash("samepassword").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("samepassword", &a));
        assert!(hasher.verify("samepassword", &b));
    }

    #[test]
    fn empty_password_is_hashable() {
        let hasher = fast();
        let digest = hasher.hash("").unwrap();
        assert!(hasher.verify("", &digest));
        assert!(!hasher.verify("x", &digest));
    }

    #[test]
    fn malformed_digest_fails_closed() {
        let hasher = fast();
        assert!(!hasher.verify("password", "not-a-valid-hash"));
        assert!(!hasher.verify("password", ""));
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(PasswordHasher::new(0).cost(), MIN_COST);
        assert_eq!(PasswordHasher::new(99).cost(), MAX_COST);
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_COST);
    }

    #[test]
    fn unicode_password() {
        let hasher = fast();
        let digest = hasher.hash("senhaçãoé123").unwrap();
        assert!(hasher.verify("senhaçãoé123", &digest));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn verify_accepts_own_hash(p in "[ -~]{0,40}") {
            let hasher = fast();
            let digest = hasher.hash(&p).unwrap();
            prop_assert!(hasher.verify(&p, &digest));
        }
    }
}
