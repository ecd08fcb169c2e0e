//! Contains constraints, enumerations and other custom types.

pub mod constants;
mod constraints;
mod enums;

pub use constraints::{
    AccountActivityConstraints, AccountConstraints, ConstraintCategory, ConstraintViolation,
    VendorProfileConstraints,
};
pub use enums::{AccountRole, AccountStatus, BusinessType, VerificationStatus};
