//! Identity service error taxonomy.
//!
//! Callers can match on these variants to distinguish user-addressable
//! failures (validation, duplicates, bad tokens) from infrastructure faults,
//! which stay wrapped in [`Error::Store`].

use std::borrow::Cow;

use vendora_postgres::types::{
    AccountConstraints, ConstraintViolation, VendorProfileConstraints, VerificationStatus,
};
use vendora_postgres::PgError;

/// All failures the identity services can report.
#[derive(Debug, thiserror::Error)]
#[must_use = "identity errors should be handled appropriately"]
pub enum Error {
    /// One or more request fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The password does not meet the minimum strength requirement.
    #[error("Password does not meet strength requirements")]
    WeakPassword {
        /// Human-readable improvement suggestions, when available.
        feedback: Option<String>,
    },

    /// The email address is already registered to another account.
    #[error("Email address is already registered")]
    DuplicateEmail,

    /// The business registration number is already in use by another vendor.
    #[error("Business registration number is already in use")]
    DuplicateRegistration,

    /// Authentication failed; deliberately does not say why.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The presented token does not match the outstanding one.
    #[error("Token does not match any outstanding credential")]
    TokenInvalid,

    /// The presented token matched but its validity window has passed.
    #[error("Token has expired")]
    TokenExpired,

    /// No token of the requested kind is outstanding for the account.
    #[error("No token of this kind is outstanding")]
    TokenAbsent,

    /// No visible account matches the given identifier.
    #[error("Account not found")]
    AccountNotFound,

    /// The account has no vendor profile.
    #[error("Vendor profile not found")]
    VendorProfileNotFound,

    /// A guarded update lost against a concurrent modification.
    #[error("Record was modified concurrently, retry the operation")]
    EditConflict,

    /// A verification state change that the workflow does not allow.
    #[error("Illegal verification transition from {from} to {to}")]
    InvalidTransition {
        from: VerificationStatus,
        to: VerificationStatus,
    },

    /// Verification documents are frozen after a terminal decision.
    #[error("Verification documents can no longer be modified")]
    DocumentsFrozen,

    /// Underlying storage failure.
    #[error(transparent)]
    Store(PgError),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl Error {
    /// Returns whether this error should be reported to the end user as-is.
    ///
    /// Storage and unexpected errors carry internal detail and should be
    /// translated before leaving the service boundary.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Error::Store(_) | Error::Unexpected(_))
    }
}

impl From<PgError> for Error {
    /// Maps known uniqueness violations to their domain-level duplicates;
    /// everything else stays a storage error.
    fn from(err: PgError) -> Self {
        match err.constraint_violation() {
            Some(ConstraintViolation::Account(AccountConstraints::EmailAddressUnique)) => {
                Error::DuplicateEmail
            }
            Some(ConstraintViolation::VendorProfile(
                VendorProfileConstraints::RegistrationNumberUnique,
            )) => Error::DuplicateRegistration,
            _ => Error::Store(err),
        }
    }
}

/// Specialized [`Result`] type for identity operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

    use super::*;

    struct FakeConstraintError(&'static str);

    impl DatabaseErrorInformation for FakeConstraintError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: &'static str) -> PgError {
        PgError::Query(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(FakeConstraintError(constraint)),
        ))
    }

    #[test]
    fn email_uniqueness_maps_to_duplicate_email() {
        let error = Error::from(unique_violation("accounts_email_address_key"));
        assert!(matches!(error, Error::DuplicateEmail));
    }

    #[test]
    fn registration_uniqueness_maps_to_duplicate_registration() {
        let error = Error::from(unique_violation("vendor_profiles_registration_number_key"));
        assert!(matches!(error, Error::DuplicateRegistration));
    }

    #[test]
    fn unknown_constraints_stay_storage_errors() {
        let error = Error::from(unique_violation("some_other_table_key"));
        assert!(matches!(error, Error::Store(_)));
    }

    #[test]
    fn user_facing_classification() {
        assert!(Error::DuplicateEmail.is_user_facing());
        assert!(Error::TokenExpired.is_user_facing());
        assert!(!Error::Unexpected("boom".into()).is_user_facing());
        assert!(!Error::from(unique_violation("some_other_table_key")).is_user_facing());
    }
}
