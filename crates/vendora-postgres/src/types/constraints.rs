//! Database constraint violations organized by table.
//!
//! Named CHECK and UNIQUE constraints from the schema are parsed into typed
//! enums so callers can translate a raw database error into a precise,
//! user-addressable failure (duplicate email vs. out-of-range rating).

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// High-level category of a constraint violation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintCategory {
    /// Malformed or out-of-range field values.
    Validation,
    /// Collision with an existing record.
    Uniqueness,
}

/// Accounts table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    // Account validation constraints
    #[strum(serialize = "accounts_email_address_length")]
    EmailAddressLength,
    #[strum(serialize = "accounts_total_orders_range")]
    TotalOrdersRange,
    #[strum(serialize = "accounts_total_spent_range")]
    TotalSpentRange,
    #[strum(serialize = "accounts_average_rating_range")]
    AverageRatingRange,
    #[strum(serialize = "accounts_review_count_range")]
    ReviewCountRange,
    #[strum(serialize = "accounts_products_sold_range")]
    ProductsSoldRange,
    #[strum(serialize = "accounts_total_sales_revenue_range")]
    TotalSalesRevenueRange,

    // Account unique constraints
    #[strum(serialize = "accounts_email_address_key")]
    EmailAddressUnique,
}

impl AccountConstraints {
    /// Creates a new [`AccountConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountConstraints::EmailAddressUnique => ConstraintCategory::Uniqueness,
            _ => ConstraintCategory::Validation,
        }
    }
}

/// Vendor profiles table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum VendorProfileConstraints {
    #[strum(serialize = "vendor_profiles_business_name_length")]
    BusinessNameLength,
    #[strum(serialize = "vendor_profiles_years_in_business_range")]
    YearsInBusinessRange,
    #[strum(serialize = "vendor_profiles_commission_rate_range")]
    CommissionRateRange,

    #[strum(serialize = "vendor_profiles_registration_number_key")]
    RegistrationNumberUnique,
}

impl VendorProfileConstraints {
    /// Creates a new [`VendorProfileConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            VendorProfileConstraints::RegistrationNumberUnique => ConstraintCategory::Uniqueness,
            _ => ConstraintCategory::Validation,
        }
    }
}

/// Account activities table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountActivityConstraints {
    #[strum(serialize = "account_activities_action_length")]
    ActionLength,
}

impl AccountActivityConstraints {
    /// Creates a new [`AccountActivityConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

/// Unified constraint violation enum that can represent any database constraint.
///
/// This enum wraps all specific constraint types, providing a single interface
/// for handling any constraint violation while maintaining type safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    VendorProfile(VendorProfileConstraints),
    AccountActivity(AccountActivityConstraints),
}

impl ConstraintViolation {
    /// Parses a raw constraint name into a typed violation, if recognized.
    pub fn new(constraint: &str) -> Option<Self> {
        if let Some(c) = AccountConstraints::new(constraint) {
            return Some(ConstraintViolation::Account(c));
        }
        if let Some(c) = VendorProfileConstraints::new(constraint) {
            return Some(ConstraintViolation::VendorProfile(c));
        }
        AccountActivityConstraints::new(constraint).map(ConstraintViolation::AccountActivity)
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
            ConstraintViolation::VendorProfile(c) => c.categorize(),
            ConstraintViolation::AccountActivity(c) => c.categorize(),
        }
    }

    /// Returns whether this violation represents a duplicate-identity collision.
    pub fn is_uniqueness(&self) -> bool {
        self.categorize() == ConstraintCategory::Uniqueness
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Account(c) => c.fmt(f),
            ConstraintViolation::VendorProfile(c) => c.fmt(f),
            ConstraintViolation::AccountActivity(c) => c.fmt(f),
        }
    }
}

macro_rules! impl_string_conversions {
    ($($t:ty),+) => {$(
        impl From<$t> for String {
            #[inline]
            fn from(val: $t) -> Self {
                val.to_string()
            }
        }

        impl TryFrom<String> for $t {
            type Error = strum::ParseError;

            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    )+};
}

impl_string_conversions!(
    AccountConstraints,
    VendorProfileConstraints,
    AccountActivityConstraints
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unique_email_constraint() {
        let violation = ConstraintViolation::new("accounts_email_address_key")
            .expect("known constraint name");
        assert_eq!(
            violation,
            ConstraintViolation::Account(AccountConstraints::EmailAddressUnique)
        );
        assert!(violation.is_uniqueness());
    }

    #[test]
    fn parses_registration_number_constraint() {
        let violation = ConstraintViolation::new("vendor_profiles_registration_number_key")
            .expect("known constraint name");
        assert!(violation.is_uniqueness());
    }

    #[test]
    fn rejects_unknown_constraint_names() {
        assert!(ConstraintViolation::new("documents_title_length").is_none());
    }

    #[test]
    fn range_checks_are_validation_failures() {
        let violation = ConstraintViolation::new("accounts_average_rating_range")
            .expect("known constraint name");
        assert_eq!(violation.categorize(), ConstraintCategory::Validation);
        assert!(!violation.is_uniqueness());
    }
}
