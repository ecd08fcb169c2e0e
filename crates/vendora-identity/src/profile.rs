//! Public profile projection.
//!
//! Turns an [`Account`] (and optionally its vendor profile) into the shape
//! safe to hand to other users and API clients: credential material, token
//! digests, 2FA secrets, and the audit trail never leave the service.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;
use vendora_postgres::model::{Account, VendorProfile};
use vendora_postgres::types::{AccountRole, AccountStatus, BusinessType, VerificationStatus};

/// Marketplace statistics shown on a public profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_orders: i32,
    pub total_spent: BigDecimal,
    pub average_rating: f64,
    pub review_count: i32,
    pub products_sold: i32,
    pub total_sales_revenue: BigDecimal,
}

/// Vendor details shown on a public profile.
///
/// The payout bank account is reduced to a masked summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVendorProfile {
    pub business_name: String,
    pub business_type: BusinessType,
    pub verification_status: VerificationStatus,
    pub verification_date: Option<Timestamp>,
    pub years_in_business: Option<i32>,
    pub website_url: Option<String>,
    pub categories: Vec<String>,
    pub commission_rate: f64,
    /// Masked payout account, e.g. "First Bank *****6789".
    pub bank_account_summary: Option<String>,
}

/// The externally visible projection of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub email_address: String,
    /// Derived from the name parts; never stored.
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AccountRole,
    pub account_status: AccountStatus,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub member_since: Timestamp,
    pub stats: ProfileStats,
    pub favorite_products: Vec<Uuid>,
    pub favorite_vendors: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<PublicVendorProfile>,
}

impl PublicProfile {
    /// Projects an account without vendor details.
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            email_address: account.email_address.clone(),
            full_name: account.full_name(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            role: account.role,
            account_status: account.account_status,
            bio: account.bio.clone(),
            avatar_url: account.avatar_url.clone(),
            email_verified: account.email_verified,
            member_since: account.created_at.into(),
            stats: ProfileStats {
                total_orders: account.total_orders,
                total_spent: account.total_spent.clone(),
                average_rating: account.average_rating,
                review_count: account.review_count,
                products_sold: account.products_sold,
                total_sales_revenue: account.total_sales_revenue.clone(),
            },
            favorite_products: account.favorite_products.clone(),
            favorite_vendors: account.favorite_vendors.clone(),
            vendor: None,
        }
    }

    /// Projects an account together with its vendor profile.
    pub fn from_account_with_vendor(account: &Account, profile: &VendorProfile) -> Self {
        let bank_account_summary = profile.bank_account().map(|bank| {
            format!("{} {}", bank.bank_name, bank.masked_account_number())
        });

        let vendor = PublicVendorProfile {
            business_name: profile.business_name.clone(),
            business_type: profile.business_type,
            verification_status: profile.verification_status,
            verification_date: profile.verification_date.map(Into::into),
            years_in_business: profile.years_in_business,
            website_url: profile.website_url.clone(),
            categories: profile.categories.clone(),
            commission_rate: profile.commission_rate,
            bank_account_summary,
        };

        Self {
            vendor: Some(vendor),
            ..Self::from_account(account)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        let now = jiff::Timestamp::now();
        Account {
            id: Uuid::nil(),
            email_address: "jane@example.com".to_owned(),
            password_hash: "$argon2id$super-secret".to_owned(),
            role: AccountRole::Vendor,
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            phone_number: None,
            bio: Some("Purveyor of fine goods".to_owned()),
            avatar_url: None,
            primary_address: None,
            shipping_addresses: serde_json::json!([]),
            preferences: serde_json::json!({}),
            two_factor_enabled: true,
            two_factor_secret: Some("JBSWY3DPEHPK3PXP".to_owned()),
            email_verified: true,
            password_changed_at: None,
            password_reset_digest: Some("deadbeef".to_owned()),
            password_reset_expires_at: None,
            email_verify_digest: None,
            email_verify_expires_at: None,
            is_active: true,
            account_status: AccountStatus::Active,
            suspension_reason: None,
            suspended_at: None,
            total_orders: 3,
            total_spent: BigDecimal::from(120),
            average_rating: 4.5,
            review_count: 11,
            products_sold: 42,
            total_sales_revenue: BigDecimal::from(3400),
            favorite_products: vec![],
            favorite_vendors: vec![],
            version: 7,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    fn sample_vendor_profile() -> VendorProfile {
        let now = jiff::Timestamp::now();
        VendorProfile {
            account_id: Uuid::nil(),
            business_name: "Acme Goods".to_owned(),
            registration_number: Some("REG-1234".to_owned()),
            tax_id: None,
            business_type: BusinessType::Company,
            years_in_business: Some(6),
            website_url: None,
            verification_status: VerificationStatus::Verified,
            verification_date: Some(now.into()),
            verification_documents: serde_json::json!([]),
            categories: vec!["homeware".to_owned()],
            commission_rate: 15.0,
            bank_account: Some(serde_json::json!({
                "account_holder": "Acme Goods LLC",
                "account_number": "123456789",
                "bank_name": "First Bank",
                "routing_number": null
            })),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn projection_omits_secret_material() -> anyhow::Result<()> {
        let profile = PublicProfile::from_account(&sample_account());
        let json = serde_json::to_string(&profile)?;

        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("twoFactorSecret"));
        assert!(!json.contains("JBSWY3DPEHPK3PXP"));
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("version"));

        Ok(())
    }

    #[test]
    fn projection_derives_full_name() {
        let profile = PublicProfile::from_account(&sample_account());
        assert_eq!(profile.full_name, "Jane Doe");
    }

    #[test]
    fn vendor_projection_masks_bank_account() -> anyhow::Result<()> {
        let profile = PublicProfile::from_account_with_vendor(
            &sample_account(),
            &sample_vendor_profile(),
        );

        let vendor = profile.vendor.as_ref().expect("vendor details present");
        assert_eq!(
            vendor.bank_account_summary.as_deref(),
            Some("First Bank *****6789")
        );

        let json = serde_json::to_string(&profile)?;
        assert!(!json.contains("123456789"));
        assert!(!json.contains("REG-1234"));

        Ok(())
    }
}
