//! Vendor verification status enumeration and its transition rules.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Review state of a vendor profile.
///
/// This enumeration corresponds to the `VERIFICATION_STATUS` PostgreSQL enum.
/// The workflow is one-directional: a pending profile is either verified or
/// rejected by an administrator, and both outcomes are terminal. Returning a
/// terminal profile to pending happens only through the explicit
/// administrative reset path, never as a normal transition.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::VerificationStatus"]
pub enum VerificationStatus {
    /// Awaiting administrative review, the initial state.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    /// Approved by an administrator.
    #[db_rename = "verified"]
    #[serde(rename = "verified")]
    Verified,

    /// Declined by an administrator.
    #[db_rename = "rejected"]
    #[serde(rename = "rejected")]
    Rejected,
}

impl VerificationStatus {
    /// Returns whether this state accepts no further automatic transitions.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            VerificationStatus::Verified | VerificationStatus::Rejected
        )
    }

    /// Returns whether the profile is still awaiting review.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, VerificationStatus::Pending)
    }

    /// Returns whether a normal (non-reset) transition into `next` is legal.
    ///
    /// Only `pending -> verified` and `pending -> rejected` are allowed.
    #[inline]
    pub fn can_transition_to(self, next: VerificationStatus) -> bool {
        self.is_pending() && next.is_terminal()
    }

    /// Returns whether new verification documents may still be attached.
    ///
    /// The document list is append-only history and freezes once a terminal
    /// decision has been recorded.
    #[inline]
    pub fn accepts_documents(self) -> bool {
        self.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_pending_to_terminal_transitions_are_legal() {
        for from in VerificationStatus::iter() {
            for to in VerificationStatus::iter() {
                let legal = from.can_transition_to(to);
                let expected = from == VerificationStatus::Pending && to.is_terminal();
                assert_eq!(legal, expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_states_reject_documents() {
        assert!(VerificationStatus::Pending.accepts_documents());
        assert!(!VerificationStatus::Verified.accepts_documents());
        assert!(!VerificationStatus::Rejected.accepts_documents());
    }

    #[test]
    fn initial_state_is_pending() {
        assert_eq!(VerificationStatus::default(), VerificationStatus::Pending);
        assert!(!VerificationStatus::default().is_terminal());
    }
}
