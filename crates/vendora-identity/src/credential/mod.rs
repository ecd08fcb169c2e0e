//! Credential primitives: password hashing, strength evaluation, and
//! single-use action tokens.

mod action_token;
mod password_hasher;
mod password_strength;

pub use action_token::{IssuedToken, TokenSlot, digest_token, issue_token};
pub use password_hasher::PasswordHasher;
pub use password_strength::{PasswordStrength, PasswordStrengthResult};
