#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for credential operations (hashing, tokens).
pub const TRACING_TARGET_CREDENTIAL: &str = "vendora_identity::credential";

/// Tracing target for account lifecycle operations.
pub const TRACING_TARGET_ACCOUNT: &str = "vendora_identity::account";

/// Tracing target for vendor verification operations.
pub const TRACING_TARGET_VENDOR: &str = "vendora_identity::vendor";

/// Tracing target for audit log operations.
pub const TRACING_TARGET_AUDIT: &str = "vendora_identity::audit";

mod account;
pub mod audit;
mod config;
pub mod credential;
mod error;
mod profile;
pub mod request;
mod vendor;

pub use account::AccountService;
pub use audit::{ActivityAction, ClientContext};
pub use config::IdentityConfig;
pub use credential::{IssuedToken, PasswordHasher, PasswordStrength, TokenSlot};
pub use error::{Error, Result};
pub use profile::{PublicProfile, PublicVendorProfile};
pub use vendor::VendorService;
