//! Account role enumeration for marketplace access control.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines what a registered identity is allowed to do on the platform.
///
/// This enumeration corresponds to the `ACCOUNT_ROLE` PostgreSQL enum.
/// Every account starts as a buyer; the vendor role unlocks the sparse
/// vendor sub-profile, and admin grants platform-wide privileges.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AccountRole"]
pub enum AccountRole {
    /// Regular customer account, the registration default.
    #[db_rename = "buyer"]
    #[serde(rename = "buyer")]
    #[default]
    Buyer,

    /// Seller account with an attached vendor profile.
    #[db_rename = "vendor"]
    #[serde(rename = "vendor")]
    Vendor,

    /// Platform administrator.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,
}

impl AccountRole {
    /// Returns whether accounts with this role carry a vendor sub-profile.
    #[inline]
    pub fn is_vendor(self) -> bool {
        matches!(self, AccountRole::Vendor)
    }

    /// Returns whether this role has administrative privileges.
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_buyer() {
        assert_eq!(AccountRole::default(), AccountRole::Buyer);
        assert!(!AccountRole::default().is_vendor());
        assert!(!AccountRole::default().is_admin());
    }

    #[test]
    fn serde_names_are_lowercase() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&AccountRole::Vendor)?, "\"vendor\"");
        assert_eq!(
            serde_json::from_str::<AccountRole>("\"admin\"")?,
            AccountRole::Admin
        );
        Ok(())
    }
}
