//! Business type enumeration for vendor profiles.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Legal structure of a vendor's business.
///
/// This enumeration corresponds to the `BUSINESS_TYPE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::BusinessType"]
pub enum BusinessType {
    /// Sole trader, the application default.
    #[db_rename = "individual"]
    #[serde(rename = "individual")]
    #[default]
    Individual,

    /// Registered partnership.
    #[db_rename = "partnership"]
    #[serde(rename = "partnership")]
    Partnership,

    /// Limited company.
    #[db_rename = "company"]
    #[serde(rename = "company")]
    Company,

    /// Incorporated entity.
    #[db_rename = "corporation"]
    #[serde(rename = "corporation")]
    Corporation,
}
