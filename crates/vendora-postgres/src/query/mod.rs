//! Database query repositories for all entities in the system.
//!
//! This module contains repository implementations that provide high-level
//! database operations for all entities, encapsulating common patterns
//! and providing type-safe interfaces.
//!
//! # Visibility
//!
//! Account lookups exclude soft-deleted and deactivated records by default.
//! Every default lookup goes through the same visibility filter; repository
//! methods with a `_with_hidden` suffix bypass it for administrative and
//! recovery flows.
//!
//! # Pagination
//!
//! All queries that may return large result sets use the [`Pagination`] struct
//! to provide consistent, bounded pagination across the system.

pub mod account;
pub mod account_activity;
pub mod vendor_profile;

pub use account::AccountRepository;
pub use account_activity::AccountActivityRepository;
use serde::{Deserialize, Serialize};
pub use vendor_profile::VendorProfileRepository;

use crate::types::constants::database::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            // Ensure limit stays within bounds
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            // Ensure offset is non-negative
            offset: offset.max(0),
        }
    }

    /// Creates pagination from page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    ///
    /// Tolerates hand-built instances with an out-of-range limit.
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit.max(1)) + 1
    }

    /// Gets the page size.
    pub fn page_size(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_new() {
        let pagination = Pagination::new(25, 100);
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 100);
    }

    #[test]
    fn pagination_bounds_checking() {
        let pagination = Pagination::new(0, 10);
        assert_eq!(pagination.limit, 1);

        let pagination = Pagination::new(1500, 10);
        assert_eq!(pagination.limit, MAX_PAGE_SIZE);

        let pagination = Pagination::new(10, -5);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 0);

        let pagination = Pagination::from_page(3, 10);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 20);

        let pagination = Pagination::from_page(0, 20);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_page_number() {
        let pagination = Pagination::new(20, 0);
        assert_eq!(pagination.page_number(), 1);

        let pagination = Pagination::new(10, 25);
        assert_eq!(pagination.page_number(), 3);
    }

    #[test]
    fn page_number_tolerates_zero_limit() {
        let pagination = Pagination {
            limit: 0,
            offset: 10,
        };
        assert_eq!(pagination.page_number(), 11);
    }
}
