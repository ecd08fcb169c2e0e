//! Main account model for PostgreSQL database operations.
//!
//! This module provides the core account model covering authentication,
//! profile data, marketplace statistics, and account lifecycle state.
//!
//! ## Models
//!
//! - [`Account`] - Main account model with complete user information and security features
//! - [`NewAccount`] - Data structure for creating new user accounts
//! - [`UpdateAccount`] - Data structure for updating existing account information

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::accounts;
use crate::types::{AccountRole, AccountStatus};

/// A postal address stored as a JSONB document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// A labeled shipping address with a default flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// User-chosen label, e.g. "home" or "office".
    pub label: String,
    #[serde(flatten)]
    pub address: PostalAddress,
    #[serde(default)]
    pub is_default: bool,
}

/// Communication and display preferences stored as a JSONB document.
///
/// Missing fields fall back to the platform defaults, so documents written
/// by older releases keep deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPreferences {
    /// Opt-in to the platform newsletter.
    pub newsletter: bool,
    /// Opt-in to marketing emails.
    pub marketing_emails: bool,
    /// Order status notifications.
    pub order_notifications: bool,
    /// Preferred interface language (ISO 639-1 code).
    pub language: String,
    /// Preferred display currency (ISO 4217 code).
    pub currency: String,
    /// Interface theme.
    pub theme: String,
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            newsletter: false,
            marketing_emails: false,
            order_notifications: true,
            language: "en".to_owned(),
            currency: "USD".to_owned(),
            theme: "light".to_owned(),
        }
    }
}

/// Main account model representing a buyer, vendor, or administrator.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Primary email for authentication and communications (stored lowercase).
    pub email_address: String,
    /// Securely hashed password (argon2id PHC string).
    pub password_hash: String,
    /// Platform role of the account holder.
    pub role: AccountRole,
    /// Given name (1-50 characters).
    pub first_name: String,
    /// Family name (1-50 characters).
    pub last_name: String,
    /// Optional phone number for contact or 2FA.
    pub phone_number: Option<String>,
    /// Optional short self-description (up to 500 characters).
    pub bio: Option<String>,
    /// Optional URL to profile avatar image.
    pub avatar_url: Option<String>,
    /// Optional primary postal address.
    pub primary_address: Option<serde_json::Value>,
    /// Labeled shipping addresses as a JSONB array.
    pub shipping_addresses: serde_json::Value,
    /// Communication and display preferences as a JSONB document.
    pub preferences: serde_json::Value,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: bool,
    /// TOTP secret, present only when 2FA has been set up.
    pub two_factor_secret: Option<String>,
    /// Whether the email address has been confirmed.
    pub email_verified: bool,
    /// Timestamp when the password was last changed.
    pub password_changed_at: Option<Timestamp>,
    /// SHA-256 hex digest of the outstanding password reset token.
    pub password_reset_digest: Option<String>,
    /// Expiry of the outstanding password reset token.
    pub password_reset_expires_at: Option<Timestamp>,
    /// SHA-256 hex digest of the outstanding email verification token.
    pub email_verify_digest: Option<String>,
    /// Expiry of the outstanding email verification token.
    pub email_verify_expires_at: Option<Timestamp>,
    /// Whether the account is enabled; inactive accounts are hidden.
    pub is_active: bool,
    /// Lifecycle status of the account.
    pub account_status: AccountStatus,
    /// Reason recorded when the account was suspended.
    pub suspension_reason: Option<String>,
    /// Timestamp when the account was suspended.
    pub suspended_at: Option<Timestamp>,
    /// Number of completed orders as a buyer.
    pub total_orders: i32,
    /// Total amount spent as a buyer.
    pub total_spent: BigDecimal,
    /// Average rating received (0.0-5.0).
    pub average_rating: f64,
    /// Number of reviews received.
    pub review_count: i32,
    /// Number of products sold as a vendor.
    pub products_sold: i32,
    /// Total revenue earned as a vendor.
    pub total_sales_revenue: BigDecimal,
    /// Favorite product identifiers.
    pub favorite_products: Vec<Uuid>,
    /// Favorite vendor identifiers.
    pub favorite_vendors: Vec<Uuid>,
    /// Optimistic concurrency version, bumped on every guarded update.
    pub version: i64,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<Timestamp>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
    /// Timestamp when the account was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Primary email for authentication (will be stored lowercase).
    pub email_address: String,
    /// Securely hashed password (argon2id PHC string).
    pub password_hash: String,
    /// Platform role; defaults to buyer when `None`.
    pub role: Option<AccountRole>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Optional URL to profile avatar image.
    pub avatar_url: Option<String>,
}

/// Data for updating an account's profile fields.
///
/// Credential and lifecycle changes go through dedicated repository
/// operations instead of this changeset.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Phone number.
    pub phone_number: Option<Option<String>>,
    /// Short self-description.
    pub bio: Option<Option<String>>,
    /// URL to profile avatar image.
    pub avatar_url: Option<Option<String>>,
    /// Primary postal address.
    pub primary_address: Option<Option<serde_json::Value>>,
    /// Labeled shipping addresses.
    pub shipping_addresses: Option<serde_json::Value>,
    /// Communication and display preferences.
    pub preferences: Option<serde_json::Value>,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: Option<bool>,
}

impl Account {
    /// Returns the account holder's full name.
    ///
    /// Joins the name parts with a single space, skipping empty parts.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    /// Returns whether the account appears in default lookups.
    ///
    /// Hidden accounts are soft-deleted or deactivated ones.
    pub fn is_visible(&self) -> bool {
        self.is_active && self.account_status.is_visible()
    }

    /// Returns whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.account_status.is_deleted() || self.deleted_at.is_some()
    }

    /// Returns whether the account belongs to a vendor.
    pub fn is_vendor(&self) -> bool {
        self.role.is_vendor()
    }

    /// Returns whether the account has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the password was changed after the given instant.
    ///
    /// Used to invalidate credentials issued before a password change. An
    /// account that has never changed its password reports `false`.
    pub fn changed_password_after(&self, instant: jiff::Timestamp) -> bool {
        self.password_changed_at
            .is_some_and(|changed_at| jiff::Timestamp::from(changed_at) > instant)
    }

    /// Returns whether an unexpired password reset token is outstanding.
    pub fn has_pending_password_reset(&self) -> bool {
        self.password_reset_digest.is_some()
            && self
                .password_reset_expires_at
                .is_some_and(|expiry| jiff::Timestamp::from(expiry) > jiff::Timestamp::now())
    }

    /// Returns whether an unexpired email verification token is outstanding.
    pub fn has_pending_email_verification(&self) -> bool {
        self.email_verify_digest.is_some()
            && self
                .email_verify_expires_at
                .is_some_and(|expiry| jiff::Timestamp::from(expiry) > jiff::Timestamp::now())
    }

    /// Deserializes the primary postal address, if present.
    pub fn primary_address(&self) -> Option<PostalAddress> {
        self.primary_address
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Deserializes the stored preferences.
    ///
    /// A malformed document falls back to the platform defaults.
    pub fn preferences(&self) -> AccountPreferences {
        serde_json::from_value(self.preferences.clone()).unwrap_or_default()
    }

    /// Deserializes the list of shipping addresses.
    ///
    /// Malformed entries are skipped rather than failing the whole list.
    pub fn shipping_addresses(&self) -> Vec<ShippingAddress> {
        match &self.shipping_addresses {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
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
            password_hash: "$argon2id$...".to_owned(),
            role: AccountRole::Buyer,
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            phone_number: None,
            bio: None,
            avatar_url: None,
            primary_address: None,
            shipping_addresses: serde_json::json!([]),
            preferences: serde_json::json!({}),
            two_factor_enabled: false,
            two_factor_secret: None,
            email_verified: false,
            password_changed_at: None,
            password_reset_digest: None,
            password_reset_expires_at: None,
            email_verify_digest: None,
            email_verify_expires_at: None,
            is_active: true,
            account_status: AccountStatus::Active,
            suspension_reason: None,
            suspended_at: None,
            total_orders: 0,
            total_spent: BigDecimal::from(0),
            average_rating: 0.0,
            review_count: 0,
            products_sold: 0,
            total_sales_revenue: BigDecimal::from(0),
            favorite_products: vec![],
            favorite_vendors: vec![],
            version: 0,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    #[test]
    fn full_name_joins_parts() {
        let mut account = sample_account();
        assert_eq!(account.full_name(), "Jane Doe");

        account.last_name.clear();
        assert_eq!(account.full_name(), "Jane");

        account.first_name.clear();
        assert_eq!(account.full_name(), "");
    }

    #[test]
    fn visibility_requires_active_and_not_deleted() {
        let mut account = sample_account();
        assert!(account.is_visible());

        account.is_active = false;
        assert!(!account.is_visible());

        account.is_active = true;
        account.account_status = AccountStatus::Deleted;
        assert!(!account.is_visible());

        account.account_status = AccountStatus::Suspended;
        assert!(account.is_visible());
    }

    #[test]
    fn changed_password_after_compares_instants() {
        let mut account = sample_account();
        let issued_at = jiff::Timestamp::now();
        assert!(!account.changed_password_after(issued_at));

        let later = issued_at + jiff::Span::new().seconds(30);
        account.password_changed_at = Some(later.into());
        assert!(account.changed_password_after(issued_at));

        let earlier = issued_at - jiff::Span::new().seconds(30);
        account.password_changed_at = Some(earlier.into());
        assert!(!account.changed_password_after(issued_at));
    }

    #[test]
    fn shipping_addresses_skip_malformed_entries() {
        let mut account = sample_account();
        account.shipping_addresses = serde_json::json!([
            {
                "label": "home",
                "street": "1 Main St",
                "city": "Springfield",
                "state": null,
                "postal_code": "12345",
                "country": "US",
                "is_default": true
            },
            { "label": "broken" }
        ]);

        let addresses = account.shipping_addresses();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].label, "home");
        assert!(addresses[0].is_default);
    }

    #[test]
    fn preferences_fill_missing_fields_with_defaults() {
        let mut account = sample_account();
        assert_eq!(account.preferences(), AccountPreferences::default());
        assert!(account.preferences().order_notifications);

        account.preferences = serde_json::json!({
            "newsletter": true,
            "currency": "EUR"
        });
        let preferences = account.preferences();
        assert!(preferences.newsletter);
        assert_eq!(preferences.currency, "EUR");
        assert_eq!(preferences.language, "en");

        account.preferences = serde_json::json!("not-an-object");
        assert_eq!(account.preferences(), AccountPreferences::default());
    }
}
