//! Password hashing

use anyhow::{Context, Result};

/// One-way password hashing used by the credential service
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool>;
}

/// bcrypt-backed hasher
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        bcrypt::hash(plaintext, self.cost).context("Failed to hash password")
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        bcrypt::verify(plaintext, digest).context("Failed to verify password")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hasher = BcryptHasher::new(4);

        let digest = hasher.hash("my_secure_password").unwrap();
        assert_ne!(digest, "my_secure_password");
        assert!(hasher.verify("my_secure_password", &digest).unwrap());
        assert!(!hasher.verify("wrong_password", &digest).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = BcryptHasher::new(4);
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_garbage_digest_is_an_error() {
        let hasher = BcryptHasher::new(4);
        assert!(hasher.verify("pw", "not-a-bcrypt-hash").is_err());
    }
}
