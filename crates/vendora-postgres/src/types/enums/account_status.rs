//! Account status enumeration for the account lifecycle.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of an account.
///
/// This enumeration corresponds to the `ACCOUNT_STATUS` PostgreSQL enum.
/// Deletion is always a soft transition into [`AccountStatus::Deleted`];
/// rows are never physically removed so historical orders keep a valid
/// account reference.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AccountStatus"]
pub enum AccountStatus {
    /// Normal, usable account.
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[default]
    Active,

    /// Temporarily blocked by an administrator; data preserved.
    #[db_rename = "suspended"]
    #[serde(rename = "suspended")]
    Suspended,

    /// Soft-deleted; excluded from default lookups.
    #[db_rename = "deleted"]
    #[serde(rename = "deleted")]
    Deleted,

    /// Retained for record-keeping, no longer in use.
    #[db_rename = "archived"]
    #[serde(rename = "archived")]
    Archived,
}

impl AccountStatus {
    /// Returns whether accounts in this status pass the default
    /// visibility filter (soft-deleted accounts never do).
    #[inline]
    pub fn is_visible(self) -> bool {
        !matches!(self, AccountStatus::Deleted)
    }

    /// Returns whether the account has been soft-deleted.
    #[inline]
    pub fn is_deleted(self) -> bool {
        matches!(self, AccountStatus::Deleted)
    }

    /// Returns whether the account is suspended.
    #[inline]
    pub fn is_suspended(self) -> bool {
        matches!(self, AccountStatus::Suspended)
    }
}
