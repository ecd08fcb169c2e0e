//! Identity service configuration.

use jiff::SignedDuration;

/// Tunable parameters for the identity services.
///
/// The defaults match the platform's security policy; overrides are mostly
/// useful in tests.
#[derive(Debug, Clone)]
#[must_use = "configurations must be passed to a service to take effect"]
pub struct IdentityConfig {
    /// Minimum accepted password length in characters.
    pub min_password_length: u64,
    /// Minimum accepted password strength score (0-4).
    pub min_password_score: u8,
    /// How far into the past a password change is recorded.
    ///
    /// Backdating by a short margin guarantees that credentials issued in the
    /// same instant as the change compare as stale.
    pub password_backdate: SignedDuration,
    /// Validity window for password reset tokens.
    pub reset_token_ttl: SignedDuration,
    /// Validity window for email verification tokens.
    pub verify_token_ttl: SignedDuration,
    /// How many times a version-guarded update is retried before reporting
    /// an edit conflict.
    pub max_update_retries: u32,
}

impl IdentityConfig {
    /// Creates a configuration with the platform defaults.
    pub fn new() -> Self {
        Self {
            min_password_length: 8,
            min_password_score: 3,
            password_backdate: SignedDuration::from_secs(1),
            reset_token_ttl: SignedDuration::from_mins(10),
            verify_token_ttl: SignedDuration::from_hours(24),
            max_update_retries: 3,
        }
    }

    /// Sets the password reset token validity window.
    pub fn with_reset_token_ttl(mut self, ttl: SignedDuration) -> Self {
        self.reset_token_ttl = ttl;
        self
    }

    /// Sets the email verification token validity window.
    pub fn with_verify_token_ttl(mut self, ttl: SignedDuration) -> Self {
        self.verify_token_ttl = ttl;
        self
    }

    /// Sets the retry budget for version-guarded updates.
    pub fn with_max_update_retries(mut self, retries: u32) -> Self {
        self.max_update_retries = retries;
        self
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_security_policy() {
        let config = IdentityConfig::new();
        assert_eq!(config.min_password_length, 8);
        assert_eq!(config.password_backdate, SignedDuration::from_secs(1));
        assert_eq!(config.reset_token_ttl, SignedDuration::from_mins(10));
        assert_eq!(config.verify_token_ttl, SignedDuration::from_hours(24));
    }
}
