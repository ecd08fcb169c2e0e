//! Constants used throughout the application.

/// Database-related constants.
pub mod database {
    /// Default pagination limit.
    pub const DEFAULT_PAGE_SIZE: i64 = 50;

    /// Maximum pagination limit.
    pub const MAX_PAGE_SIZE: i64 = 1000;
}

/// Constants related to the per-account activity log.
pub mod activity {
    /// Maximum number of retained activity entries per account.
    ///
    /// The log is a bounded FIFO: after every append, entries beyond this
    /// bound are evicted oldest-first.
    pub const MAX_ENTRIES_PER_ACCOUNT: i64 = 100;
}

/// Constants related to account security and behavior.
pub mod account {
    /// Maximum stored bio length in characters.
    pub const MAX_BIO_LENGTH: usize = 500;

    /// Upper bound for the stored average product/vendor rating.
    pub const MAX_AVERAGE_RATING: f64 = 5.0;
}

/// Constants related to vendor profiles.
pub mod vendor {
    /// Default commission percentage for new vendor profiles.
    pub const DEFAULT_COMMISSION_RATE: f64 = 15.0;

    /// Upper bound for the commission percentage.
    pub const MAX_COMMISSION_RATE: f64 = 100.0;
}
