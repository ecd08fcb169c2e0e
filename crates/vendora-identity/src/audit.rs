//! Bounded per-account audit trail.
//!
//! Services record security-relevant events here; storage keeps only the
//! most recent entries per account (see the retention bound in
//! `vendora_postgres`). Recording is best-effort: a failed append is logged
//! and never fails the operation that triggered it.

use ipnet::IpNet;
use strum::{Display, EnumString};
use uuid::Uuid;
use vendora_postgres::model::NewAccountActivity;
use vendora_postgres::query::AccountActivityRepository;
use vendora_postgres::PgConnection;

use crate::TRACING_TARGET_AUDIT;

/// Security-relevant events recorded in the audit trail.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ActivityAction {
    Signup,
    Login,
    PasswordChange,
    PasswordReset,
    EmailVerified,
    ProfileUpdate,
    AccountDeleted,
    AccountSuspended,
    AccountReinstated,
    FavoritesUpdated,
    VendorApplied,
    VendorDocumentAdded,
    VendorApproved,
    VendorRejected,
    VendorReviewReset,
}

/// Client request context attached to audit entries when available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub ip_address: Option<IpNet>,
    pub user_agent: Option<String>,
}

/// Appends an audit entry for the account.
///
/// Failures are reported through tracing only; the audit trail never blocks
/// the operation being recorded.
pub async fn record_activity(
    conn: &mut PgConnection,
    account_id: Uuid,
    action: ActivityAction,
    description: Option<String>,
    client: Option<&ClientContext>,
) {
    let new_activity = NewAccountActivity {
        account_id,
        action: action.to_string(),
        description,
        ip_address: client.and_then(|c| c.ip_address),
        user_agent: client.and_then(|c| c.user_agent.clone()),
    };

    if let Err(err) = conn.log_activity(new_activity).await {
        tracing::warn!(
            target: TRACING_TARGET_AUDIT,
            %account_id,
            %action,
            error = %err,
            "Failed to record audit entry"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_are_snake_case() {
        assert_eq!(ActivityAction::Signup.to_string(), "signup");
        assert_eq!(ActivityAction::PasswordChange.to_string(), "password_change");
        assert_eq!(ActivityAction::VendorReviewReset.to_string(), "vendor_review_reset");
    }

    #[test]
    fn action_names_round_trip() {
        let parsed: ActivityAction = "vendor_approved".parse().expect("known action");
        assert_eq!(parsed, ActivityAction::VendorApproved);
    }
}
