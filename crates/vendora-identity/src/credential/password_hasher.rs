//! Secure password hashing and verification using Argon2id.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use rand::rngs::OsRng;

use crate::{Error, Result, TRACING_TARGET_CREDENTIAL};

/// Secure password hashing and verification service using Argon2id.
///
/// # Security Features
///
/// - Uses Argon2id variant (hybrid of Argon2i and Argon2d)
/// - OWASP recommended parameters (19 MB memory, 2 iterations, 1 thread)
/// - Cryptographically secure random salt generation
/// - Timing-safe password verification
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new password hashing service with OWASP recommended configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if Argon2 initialization fails.
    pub fn new() -> Result<Self> {
        let params = Params::new(
            19456, // 19 MB - OWASP recommended
            2,     // 2 iterations - OWASP recommended
            1,     // 1 thread - OWASP recommended
            None,  // Use default output length (32 bytes)
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CREDENTIAL,
                error = %e,
                "Failed to create Argon2 parameters"
            );

            Error::Unexpected("Invalid password hashing configuration".into())
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    /// Hashes a password using Argon2id with a cryptographically secure random salt.
    ///
    /// The returned PHC string includes the algorithm, parameters, salt, and
    /// hash value, and can be stored directly in the database. Each call
    /// generates a unique salt.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CREDENTIAL,
                error = %e,
                "Failed to generate cryptographically secure salt"
            );
            Error::Unexpected("Password processing failed".into())
        })?;

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_CREDENTIAL,
                    error = %e,
                    "Password hashing operation failed"
                );

                Error::Unexpected("Password processing failed".into())
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// Verification is timing-safe and the error does not leak whether the
    /// hash or the password was at fault.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCredentials`] for incorrect passwords
    /// - [`Error::Unexpected`] for invalid hash format or system errors
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET_CREDENTIAL,
                error = %e,
                "Invalid password hash format provided"
            );

            Error::Unexpected("Authentication system temporarily unavailable".into())
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_CREDENTIAL,
                    "Password verification failed, incorrect password provided"
                );

                Err(Error::InvalidCredentials)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_CREDENTIAL,
                    error = %e,
                    "Password verification system error"
                );

                Err(Error::Unexpected(
                    "Authentication system temporarily unavailable".into(),
                ))
            }
        }
    }

    /// Performs a dummy password verification to maintain consistent timing.
    ///
    /// Used when an account does not exist so that lookups for unknown and
    /// known email addresses take about the same time, preventing account
    /// enumeration via timing analysis. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::Rng;

        let password_len = rand::random_range(16..32);
        let dummy_password: String = (0..password_len)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn wrong_password_reports_invalid_credentials() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password("correct_password")?;

        let result = hasher.verify_password("wrong_password", &hash);
        assert!(matches!(result, Err(Error::InvalidCredentials)));

        Ok(())
    }

    #[test]
    fn invalid_hash_format_is_not_a_credential_error() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;

        let result = hasher.verify_password("test_password", "invalid_hash_format");
        assert!(matches!(result, Err(Error::Unexpected(_))));

        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        assert!(!hasher.verify_dummy_password("any_password"));

        Ok(())
    }
}
