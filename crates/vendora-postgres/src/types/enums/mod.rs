//! Database enumeration types for type-safe queries.
//!
//! This module provides strongly-typed enumerations that correspond to PostgreSQL ENUM types
//! defined in the database schema. Each enumeration provides serialization support for APIs
//! and database integration through Diesel.

// Account-related enumerations
pub mod account_role;
pub mod account_status;

// Vendor-related enumerations
pub mod business_type;
pub mod verification_status;

pub use account_role::AccountRole;
pub use account_status::AccountStatus;
pub use business_type::BusinessType;
pub use verification_status::VerificationStatus;
