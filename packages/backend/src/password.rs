//! # Password hashing and verification — Argon2id
//!
//! [`Passwords::hash`] generates a random salt via [`OsRng`] and returns a
//! PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`), which is what
//! the backends store. [`Passwords::verify`] parses such a string and checks a
//! plaintext against it: `Ok(true)` on match, `Ok(false)` on mismatch, `Err` if
//! the stored hash is malformed.
//!
//! [`Passwords::default`] uses the default memory-hard Argon2id parameters.
//! [`Passwords::fast`] trades that away for speed and exists for tests and
//! throwaway in-memory instances.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{BackendError, Result};

#[derive(Clone, Default)]
pub struct Passwords {
    argon2: Argon2<'static>,
}

impl Passwords {
    /// Cheap parameters. Never use for real accounts.
    pub fn fast() -> Self {
        let params = Params::new(8, 1, 1, None).unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a password. Returns a PHC-format string.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| BackendError::Password(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a PHC-format hash string.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| BackendError::Password(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl std::fmt::Debug for Passwords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passwords").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let passwords = Passwords::fast();
        let hash = passwords.hash("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("hunter22", &hash).unwrap());
        assert!(!passwords.verify("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(Passwords::fast().verify("x", "not-a-hash").is_err());
    }
}
