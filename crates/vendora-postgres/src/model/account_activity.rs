//! Per-account activity audit log model.
//!
//! Each row records one security-relevant event (login, password change,
//! profile update). The log is a bounded FIFO: the repository prunes entries
//! beyond the retention bound oldest-first after every append.

use diesel::prelude::*;
use ipnet::IpNet;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::account_activities;

/// A single audit log entry for an account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = account_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountActivity {
    /// Monotonic entry identifier, used for eviction ordering.
    pub id: i64,
    /// Account this entry belongs to.
    pub account_id: Uuid,
    /// Machine-readable action name, e.g. "login" or "password_change".
    pub action: String,
    /// Optional human-readable details.
    pub description: Option<String>,
    /// Client IP address, when known.
    pub ip_address: Option<IpNet>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
    /// When the event occurred.
    pub created_at: Timestamp,
}

/// Data for appending a new audit log entry.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = account_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccountActivity {
    /// Account this entry belongs to.
    pub account_id: Uuid,
    /// Machine-readable action name.
    pub action: String,
    /// Optional human-readable details.
    pub description: Option<String>,
    /// Client IP address, when known.
    pub ip_address: Option<IpNet>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
}

impl AccountActivity {
    /// Returns whether the entry carries any client context.
    pub fn has_client_context(&self) -> bool {
        self.ip_address.is_some() || self.user_agent.is_some()
    }
}
