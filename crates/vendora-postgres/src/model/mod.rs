//! Database models for all entities in the system.
//!
//! This module contains Diesel model definitions for all database tables,
//! including structs for querying, inserting, and updating records.

mod account;
mod account_activity;
mod vendor_profile;

// Account models
pub use account::{
    Account, AccountPreferences, NewAccount, PostalAddress, ShippingAddress, UpdateAccount,
};
pub use account_activity::{AccountActivity, NewAccountActivity};
// Vendor models
pub use vendor_profile::{
    BankAccount, NewVendorProfile, UpdateVendorProfile, VendorProfile, VerificationDocument,
};
