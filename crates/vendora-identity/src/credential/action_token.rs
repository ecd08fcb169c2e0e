//! Single-use action tokens for password reset and email verification.
//!
//! A token is 32 random bytes, handed to the user as a hex string. Only its
//! SHA-256 digest is persisted, so a database leak does not expose usable
//! tokens. Each account holds at most one outstanding token per slot;
//! issuing a new one replaces the old.

use jiff::{SignedDuration, Timestamp};
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use strum::Display;

use crate::{Error, Result, TRACING_TARGET_CREDENTIAL};

/// Number of random bytes in a raw token.
const TOKEN_BYTES: usize = 32;

/// The per-account token slots.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TokenSlot {
    /// Proves control of the account to set a new password.
    PasswordReset,
    /// Proves control of the registered email address.
    EmailVerification,
}

/// A freshly issued action token.
///
/// The `raw` value goes to the user (typically by email) and is never
/// stored; only `digest` is written to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Hex-encoded random token for the user.
    pub raw: String,
    /// SHA-256 hex digest of `raw`, for storage.
    pub digest: String,
    /// When the token stops being acceptable.
    pub expires_at: Timestamp,
}

/// Issues a new random token valid for `ttl` from now.
pub fn issue_token(slot: TokenSlot, ttl: SignedDuration) -> Result<IssuedToken> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET_CREDENTIAL,
            error = %e,
            "Failed to generate random token bytes"
        );
        Error::Unexpected("Token generation failed".into())
    })?;

    let raw = hex::encode(bytes);
    let digest = digest_token(&raw);
    let expires_at = Timestamp::now() + ttl;

    tracing::debug!(
        target: TRACING_TARGET_CREDENTIAL,
        %slot,
        %expires_at,
        "Issued action token"
    );

    Ok(IssuedToken {
        raw,
        digest,
        expires_at,
    })
}

/// Computes the storage digest of a raw token.
pub fn digest_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_are_random_hex() -> anyhow::Result<()> {
        let ttl = SignedDuration::from_mins(10);
        let first = issue_token(TokenSlot::PasswordReset, ttl)?;
        let second = issue_token(TokenSlot::PasswordReset, ttl)?;

        assert_eq!(first.raw.len(), TOKEN_BYTES * 2);
        assert!(first.raw.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.raw, second.raw);
        assert_ne!(first.digest, second.digest);

        Ok(())
    }

    #[test]
    fn digest_is_deterministic_and_differs_from_raw() -> anyhow::Result<()> {
        let token = issue_token(TokenSlot::EmailVerification, SignedDuration::from_hours(24))?;

        assert_eq!(token.digest, digest_token(&token.raw));
        assert_ne!(token.digest, token.raw);
        assert_eq!(token.digest.len(), 64);

        Ok(())
    }

    #[test]
    fn expiry_honors_ttl() -> anyhow::Result<()> {
        let before = Timestamp::now();
        let token = issue_token(TokenSlot::PasswordReset, SignedDuration::from_mins(10))?;
        let after = Timestamp::now();

        assert!(token.expires_at >= before + SignedDuration::from_mins(10));
        assert!(token.expires_at <= after + SignedDuration::from_mins(10));

        Ok(())
    }

    #[test]
    fn known_digest_vector() {
        // SHA-256 of the ASCII string "vendora".
        assert_eq!(
            digest_token("vendora"),
            "b046be8c53ce433502a6ff126c44b63ee24a483c9282c561cf5702f95a841927"
        );
    }
}
