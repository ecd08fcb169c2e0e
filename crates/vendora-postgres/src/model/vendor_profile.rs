//! Vendor profile model for PostgreSQL database operations.
//!
//! A vendor profile extends an account with business details and the
//! verification review state. Profiles exist only for accounts that applied
//! to sell on the platform.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::vendor_profiles;
use crate::types::{BusinessType, VerificationStatus};

/// A document submitted as part of the vendor verification process.
///
/// Stored inside the profile's JSONB document list, which is append-only
/// history and never shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDocument {
    /// Document kind, e.g. "business_license" or "tax_certificate".
    pub kind: String,
    /// Storage URL of the uploaded file.
    pub url: String,
    /// When the document was uploaded.
    pub uploaded_at: jiff::Timestamp,
}

/// Bank account details for vendor payouts, stored as JSONB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    pub routing_number: Option<String>,
}

impl BankAccount {
    /// Returns the account number with all but the last four characters
    /// masked. The value comes from free-form JSONB, so the mask counts
    /// characters rather than bytes.
    pub fn masked_account_number(&self) -> String {
        let total = self.account_number.chars().count();
        if total <= 4 {
            return "*".repeat(total);
        }
        let visible: String = self.account_number.chars().skip(total - 4).collect();
        format!("{}{}", "*".repeat(total - 4), visible)
    }
}

/// Vendor profile model attached to a vendor account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = vendor_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VendorProfile {
    /// Owning account identifier.
    pub account_id: Uuid,
    /// Registered business name (2-200 characters).
    pub business_name: String,
    /// Government registration number, unique across vendors when present.
    pub registration_number: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Legal structure of the business.
    pub business_type: BusinessType,
    /// Years the business has been operating.
    pub years_in_business: Option<i32>,
    /// Business website.
    pub website_url: Option<String>,
    /// Current verification review state.
    pub verification_status: VerificationStatus,
    /// When a terminal verification decision was recorded.
    pub verification_date: Option<Timestamp>,
    /// Submitted verification documents as a JSONB array.
    pub verification_documents: serde_json::Value,
    /// Product categories the vendor sells in.
    pub categories: Vec<String>,
    /// Platform commission percentage (0-100).
    pub commission_rate: f64,
    /// Payout bank account details.
    pub bank_account: Option<serde_json::Value>,
    /// Timestamp when the profile was created.
    pub created_at: Timestamp,
    /// Timestamp when the profile was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new vendor profile.
///
/// New profiles always start in the pending verification state.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = vendor_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVendorProfile {
    /// Owning account identifier.
    pub account_id: Uuid,
    /// Registered business name.
    pub business_name: String,
    /// Government registration number.
    pub registration_number: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Legal structure of the business.
    pub business_type: Option<BusinessType>,
    /// Years the business has been operating.
    pub years_in_business: Option<i32>,
    /// Business website.
    pub website_url: Option<String>,
    /// Product categories the vendor sells in.
    pub categories: Option<Vec<String>>,
    /// Platform commission percentage; defaults to the platform rate.
    pub commission_rate: Option<f64>,
}

/// Data for updating a vendor profile's business fields.
///
/// Verification state changes go through dedicated repository operations
/// instead of this changeset.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = vendor_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateVendorProfile {
    /// Registered business name.
    pub business_name: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<Option<String>>,
    /// Years the business has been operating.
    pub years_in_business: Option<Option<i32>>,
    /// Business website.
    pub website_url: Option<Option<String>>,
    /// Product categories the vendor sells in.
    pub categories: Option<Vec<String>>,
    /// Platform commission percentage.
    pub commission_rate: Option<f64>,
    /// Payout bank account details.
    pub bank_account: Option<Option<serde_json::Value>>,
}

impl VendorProfile {
    /// Returns whether the profile has been approved.
    pub fn is_verified(&self) -> bool {
        matches!(self.verification_status, VerificationStatus::Verified)
    }

    /// Returns whether the profile is awaiting review.
    pub fn is_pending(&self) -> bool {
        self.verification_status.is_pending()
    }

    /// Deserializes the submitted verification documents.
    ///
    /// Malformed entries are skipped rather than failing the whole list.
    pub fn documents(&self) -> Vec<VerificationDocument> {
        match &self.verification_documents {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Deserializes the payout bank account, if present.
    pub fn bank_account(&self) -> Option<BankAccount> {
        self.bank_account
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_account_number_keeps_last_four() {
        let bank = BankAccount {
            account_holder: "Acme Goods LLC".to_owned(),
            account_number: "123456789".to_owned(),
            bank_name: "First Bank".to_owned(),
            routing_number: None,
        };
        assert_eq!(bank.masked_account_number(), "*****6789");

        let short = BankAccount {
            account_number: "123".to_owned(),
            ..bank
        };
        assert_eq!(short.masked_account_number(), "***");
    }

    #[test]
    fn masked_account_number_handles_multibyte_characters() {
        let bank = BankAccount {
            account_holder: "Acme Goods LLC".to_owned(),
            account_number: "１２３４５６".to_owned(),
            bank_name: "First Bank".to_owned(),
            routing_number: None,
        };
        assert_eq!(bank.masked_account_number(), "**３４５６");
    }

    #[test]
    fn documents_skip_malformed_entries() {
        let now = jiff::Timestamp::now();
        let profile = VendorProfile {
            account_id: Uuid::nil(),
            business_name: "Acme Goods".to_owned(),
            registration_number: None,
            tax_id: None,
            business_type: BusinessType::Company,
            years_in_business: None,
            website_url: None,
            verification_status: VerificationStatus::Pending,
            verification_date: None,
            verification_documents: serde_json::json!([
                {
                    "kind": "business_license",
                    "url": "https://files.example.com/doc1.pdf",
                    "uploaded_at": "2025-08-01T00:00:00Z"
                },
                { "kind": "incomplete" }
            ]),
            categories: vec![],
            commission_rate: 15.0,
            bank_account: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let documents = profile.documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].kind, "business_license");
    }
}
