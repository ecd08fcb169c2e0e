//! Validated request payloads for the identity services.
//!
//! Every service entry point that accepts user input takes one of these
//! payloads and validates it before touching storage.

use serde::Deserialize;
use validator::Validate;
use vendora_postgres::model::{AccountPreferences, PostalAddress, ShippingAddress};
use vendora_postgres::types::{AccountRole, BusinessType};

/// Payload for registering a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address, stored lowercase.
    #[validate(email)]
    pub email_address: String,
    /// Plaintext password; hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Must repeat `password` exactly.
    #[validate(must_match(other = "password"))]
    pub password_confirm: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    /// Requested role; defaults to buyer.
    pub role: Option<AccountRole>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
}

/// Payload for changing the password of an authenticated account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// The current password, re-checked before the change is applied.
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub new_password_confirm: String,
}

/// Payload for completing a password reset with an emailed token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// The raw token received by email.
    #[validate(length(equal = 64))]
    pub token: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub new_password_confirm: String,
}

/// Payload for updating profile fields.
///
/// All fields are optional; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    /// Primary postal address; replaces the stored one.
    pub primary_address: Option<PostalAddress>,
    /// Labeled shipping addresses; replaces the stored list.
    #[validate(length(max = 20))]
    pub shipping_addresses: Option<Vec<ShippingAddress>>,
    /// Communication and display preferences; replaces the stored document.
    pub preferences: Option<AccountPreferences>,
    /// Enables or disables two-factor authentication.
    pub two_factor_enabled: Option<bool>,
}

/// Payload for applying to sell on the platform.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorApplicationRequest {
    #[validate(length(min = 2, max = 200))]
    pub business_name: String,
    #[validate(length(min = 1, max = 100))]
    pub registration_number: Option<String>,
    #[validate(length(max = 100))]
    pub tax_id: Option<String>,
    /// Legal structure; defaults to individual.
    pub business_type: Option<BusinessType>,
    #[validate(range(min = 0, max = 200))]
    pub years_in_business: Option<i32>,
    #[validate(url)]
    pub website_url: Option<String>,
    /// Product categories the vendor intends to sell in.
    pub categories: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            email_address: "jane@example.com".to_owned(),
            password: "s3cure-enough-pw".to_owned(),
            password_confirm: "s3cure-enough-pw".to_owned(),
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            role: None,
            phone_number: None,
        }
    }

    #[test]
    fn signup_accepts_valid_payload() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn signup_rejects_short_password() {
        let request = SignupRequest {
            password: "short".to_owned(),
            password_confirm: "short".to_owned(),
            ..signup()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn signup_rejects_mismatched_confirmation() {
        let request = SignupRequest {
            password_confirm: "different-password".to_owned(),
            ..signup()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn signup_rejects_invalid_email() {
        let request = SignupRequest {
            email_address: "not-an-email".to_owned(),
            ..signup()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn profile_update_rejects_overlong_bio() {
        let request = UpdateProfileRequest {
            bio: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn profile_update_bounds_shipping_addresses() {
        let address = ShippingAddress {
            label: "home".to_owned(),
            address: PostalAddress {
                street: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                state: None,
                postal_code: "12345".to_owned(),
                country: "US".to_owned(),
            },
            is_default: true,
        };

        let request = UpdateProfileRequest {
            shipping_addresses: Some(vec![address.clone(); 21]),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            shipping_addresses: Some(vec![address]),
            two_factor_enabled: Some(true),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn reset_request_requires_full_token() {
        let request = ResetPasswordRequest {
            token: "abc123".to_owned(),
            new_password: "s3cure-enough-pw".to_owned(),
            new_password_confirm: "s3cure-enough-pw".to_owned(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn vendor_application_bounds() {
        let request = VendorApplicationRequest {
            business_name: "A".to_owned(),
            registration_number: None,
            tax_id: None,
            business_type: None,
            years_in_business: None,
            website_url: None,
            categories: None,
        };
        assert!(request.validate().is_err());

        let request = VendorApplicationRequest {
            business_name: "Acme Goods".to_owned(),
            years_in_business: Some(12),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
