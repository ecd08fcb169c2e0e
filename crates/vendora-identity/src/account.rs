//! Account lifecycle service.
//!
//! Covers registration, authentication, credential management, profile
//! updates, account lifecycle changes, favorites, and marketplace
//! statistics. Every entry point validates its input, goes through the
//! default visibility rules of the underlying repositories, and records
//! security-relevant events in the audit trail.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use uuid::Uuid;
use validator::Validate;
use vendora_postgres::model::{Account, AccountActivity, NewAccount, UpdateAccount};
use vendora_postgres::query::{AccountActivityRepository, AccountRepository, Pagination};
use vendora_postgres::query::VendorProfileRepository;
use vendora_postgres::types::constants::account::MAX_AVERAGE_RATING;
use vendora_postgres::PgClient;

use crate::audit::{record_activity, ActivityAction, ClientContext};
use crate::credential::{
    digest_token, issue_token, IssuedToken, PasswordHasher, PasswordStrength, TokenSlot,
};
use crate::profile::PublicProfile;
use crate::request::{
    ChangePasswordRequest, ResetPasswordRequest, SignupRequest, UpdateProfileRequest,
};
use crate::{Error, IdentityConfig, Result, TRACING_TARGET_ACCOUNT};

/// Which favorite list an edit applies to.
#[derive(Debug, Clone, Copy)]
enum FavoriteList {
    Products,
    Vendors,
}

/// Service for account lifecycle and credential operations.
#[derive(Debug, Clone)]
pub struct AccountService {
    pg: PgClient,
    hasher: PasswordHasher,
    strength: PasswordStrength,
    config: IdentityConfig,
}

impl AccountService {
    /// Creates a new account service backed by the given database client.
    pub fn new(pg: PgClient, config: IdentityConfig) -> Result<Self> {
        let hasher = PasswordHasher::new()?;
        let strength = PasswordStrength::with_min_score(config.min_password_score);

        Ok(Self {
            pg,
            hasher,
            strength,
            config,
        })
    }

    /// Registers a new account.
    ///
    /// The password is checked against the strength policy with the user's
    /// own email and name treated as weak material, then hashed before
    /// anything touches storage.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when the payload fails field validation
    /// - [`Error::WeakPassword`] when the password scores below the minimum
    /// - [`Error::DuplicateEmail`] when the email is already registered
    pub async fn register(
        &self,
        request: SignupRequest,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        request.validate()?;

        self.strength.validate_password(
            &request.password,
            &[
                &request.email_address,
                &request.first_name,
                &request.last_name,
            ],
        )?;

        let password_hash = self.hasher.hash_password(&request.password)?;

        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .create_account(NewAccount {
                email_address: request.email_address,
                password_hash,
                role: request.role,
                first_name: request.first_name,
                last_name: request.last_name,
                phone_number: request.phone_number,
                avatar_url: None,
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            account_id = %account.id,
            role = %account.role,
            "Account registered"
        );
        record_activity(&mut conn, account.id, ActivityAction::Signup, None, client).await;

        Ok(account)
    }

    /// Authenticates an account by email and password.
    ///
    /// Reports [`Error::InvalidCredentials`] for unknown emails and wrong
    /// passwords alike; a dummy hash verification keeps the unknown-email
    /// path from returning measurably faster.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;

        let Some(account) = conn.find_account_by_email(email).await? else {
            self.hasher.verify_dummy_password(password);
            return Err(Error::InvalidCredentials);
        };

        self.hasher.verify_password(password, &account.password_hash)?;

        let account = conn
            .record_login(account.id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        record_activity(&mut conn, account.id, ActivityAction::Login, None, client).await;

        Ok(account)
    }

    /// Changes the password of an authenticated account.
    ///
    /// The recorded change instant is backdated by the configured margin so
    /// that credentials issued in the same instant as the change compare as
    /// stale. Any outstanding password reset token is invalidated.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        request: ChangePasswordRequest,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        request.validate()?;

        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .find_account_by_id(account_id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        self.hasher
            .verify_password(&request.current_password, &account.password_hash)?;

        self.strength.validate_password(
            &request.new_password,
            &[
                &account.email_address,
                &account.first_name,
                &account.last_name,
            ],
        )?;

        let password_hash = self.hasher.hash_password(&request.new_password)?;
        let changed_at = Timestamp::now() - self.config.password_backdate;

        let account = conn
            .update_password(account_id, password_hash, changed_at)
            .await?
            .ok_or(Error::AccountNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            %account_id,
            "Password changed"
        );
        record_activity(
            &mut conn,
            account_id,
            ActivityAction::PasswordChange,
            None,
            client,
        )
        .await;

        Ok(account)
    }

    /// Issues a password reset token for the account behind the email.
    ///
    /// Only the token digest is stored; the raw value in the returned
    /// [`IssuedToken`] must be delivered to the user out of band. Issuing a
    /// new token replaces any outstanding one.
    pub async fn issue_password_reset(&self, email: &str) -> Result<IssuedToken> {
        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .find_account_by_email(email)
            .await?
            .ok_or(Error::AccountNotFound)?;

        let token = issue_token(TokenSlot::PasswordReset, self.config.reset_token_ttl)?;
        conn.store_password_reset_token(account.id, token.digest.clone(), token.expires_at)
            .await?
            .ok_or(Error::AccountNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            account_id = %account.id,
            expires_at = %token.expires_at,
            "Password reset token issued"
        );

        Ok(token)
    }

    /// Issues an email verification token for the account.
    pub async fn issue_email_verification(&self, account_id: Uuid) -> Result<IssuedToken> {
        let mut conn = self.pg.get_connection().await?;

        let token = issue_token(TokenSlot::EmailVerification, self.config.verify_token_ttl)?;
        conn.store_email_verify_token(account_id, token.digest.clone(), token.expires_at)
            .await?
            .ok_or(Error::AccountNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            %account_id,
            expires_at = %token.expires_at,
            "Email verification token issued"
        );

        Ok(token)
    }

    /// Completes a password reset with an emailed token.
    ///
    /// # Errors
    ///
    /// - [`Error::TokenInvalid`] when no account holds the token
    /// - [`Error::TokenExpired`] when the token matched but is stale
    /// - [`Error::WeakPassword`] when the new password scores too low
    pub async fn redeem_password_reset(
        &self,
        request: ResetPasswordRequest,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        request.validate()?;

        let digest = digest_token(&request.token);
        let mut conn = self.pg.get_connection().await?;

        let account = conn
            .find_account_by_reset_digest(&digest)
            .await?
            .ok_or(Error::TokenInvalid)?;

        validate_slot(&account, &request.token, TokenSlot::PasswordReset)?;

        self.strength.validate_password(
            &request.new_password,
            &[
                &account.email_address,
                &account.first_name,
                &account.last_name,
            ],
        )?;

        let password_hash = self.hasher.hash_password(&request.new_password)?;
        let changed_at = Timestamp::now() - self.config.password_backdate;

        // The digest guard clears the reset slot in the same statement, so
        // concurrent redemptions of one token have a single winner.
        let account = conn
            .redeem_password_reset(account.id, &digest, password_hash, changed_at)
            .await?
            .ok_or(Error::TokenInvalid)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            account_id = %account.id,
            "Password reset completed"
        );
        record_activity(
            &mut conn,
            account.id,
            ActivityAction::PasswordReset,
            None,
            client,
        )
        .await;

        Ok(account)
    }

    /// Confirms an email address with an emailed verification token.
    pub async fn confirm_email(
        &self,
        raw_token: &str,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        let digest = digest_token(raw_token);
        let mut conn = self.pg.get_connection().await?;

        let account = conn
            .find_account_by_verify_digest(&digest)
            .await?
            .ok_or(Error::TokenInvalid)?;

        validate_slot(&account, raw_token, TokenSlot::EmailVerification)?;

        // The digest guard makes concurrent confirmations single-winner.
        let account = conn
            .confirm_email(account.id, &digest)
            .await?
            .ok_or(Error::TokenInvalid)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            account_id = %account.id,
            "Email address verified"
        );
        record_activity(
            &mut conn,
            account.id,
            ActivityAction::EmailVerified,
            None,
            client,
        )
        .await;

        Ok(account)
    }

    /// Consumes an outstanding token of the given kind for a known account.
    ///
    /// Distinguishes the three failure modes: no token outstanding
    /// ([`Error::TokenAbsent`]), a token that does not match
    /// ([`Error::TokenInvalid`]), and a matching but stale token
    /// ([`Error::TokenExpired`]). On success the slot is cleared and, for
    /// email verification, the address is marked verified.
    pub async fn consume_token(
        &self,
        account_id: Uuid,
        raw_token: &str,
        slot: TokenSlot,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .find_account_by_id(account_id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        validate_slot(&account, raw_token, slot)?;

        // Both consumption paths are digest-guarded, so concurrent attempts
        // with the same token are single-winner.
        let account = match slot {
            TokenSlot::PasswordReset => conn
                .clear_password_reset_token(account_id, &digest_token(raw_token))
                .await?
                .ok_or(Error::TokenInvalid)?,
            TokenSlot::EmailVerification => conn
                .confirm_email(account_id, &digest_token(raw_token))
                .await?
                .ok_or(Error::TokenInvalid)?,
        };

        Ok(account)
    }

    /// Fetches a visible account by identifier.
    pub async fn get_account(&self, account_id: Uuid) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        conn.find_account_by_id(account_id)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Fetches an account by identifier, including hidden records.
    ///
    /// Administrative and recovery flows only.
    pub async fn get_account_with_hidden(&self, account_id: Uuid) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        conn.find_account_by_id_with_hidden(account_id)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Fetches a visible account by email address.
    pub async fn get_account_by_email(&self, email: &str) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        conn.find_account_by_email(email)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Lists visible accounts, most recently created first.
    pub async fn list_accounts(&self, pagination: Pagination) -> Result<Vec<Account>> {
        let mut conn = self.pg.get_connection().await?;
        Ok(conn.list_accounts(pagination).await?)
    }

    /// Updates profile fields of a visible account.
    ///
    /// The update is guarded by the record version and retried a bounded
    /// number of times when it loses against a concurrent modification;
    /// after the retry budget is exhausted the caller gets
    /// [`Error::EditConflict`].
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        request: UpdateProfileRequest,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        request.validate()?;

        let mut conn = self.pg.get_connection().await?;
        let mut attempts = 0;

        loop {
            let account = conn
                .find_account_by_id(account_id)
                .await?
                .ok_or(Error::AccountNotFound)?;

            let updates = profile_changeset(&request)?;

            if let Some(updated) = conn
                .update_account(account_id, account.version, updates)
                .await?
            {
                record_activity(
                    &mut conn,
                    account_id,
                    ActivityAction::ProfileUpdate,
                    None,
                    client,
                )
                .await;
                return Ok(updated);
            }

            // The guard missed: either the record disappeared or the version
            // moved underneath us.
            match conn.find_account_by_id_with_hidden(account_id).await? {
                Some(current) if current.is_visible() => {
                    attempts += 1;
                    if attempts >= self.config.max_update_retries {
                        tracing::warn!(
                            target: TRACING_TARGET_ACCOUNT,
                            %account_id,
                            attempts,
                            "Profile update lost all version-guard retries"
                        );
                        return Err(Error::EditConflict);
                    }
                }
                _ => return Err(Error::AccountNotFound),
            }
        }
    }

    /// Soft-deletes an account.
    ///
    /// The record is kept but hidden from all default lookups.
    pub async fn soft_delete(
        &self,
        account_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .soft_delete_account(account_id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            %account_id,
            "Account soft-deleted"
        );
        record_activity(
            &mut conn,
            account_id,
            ActivityAction::AccountDeleted,
            None,
            client,
        )
        .await;

        Ok(account)
    }

    /// Suspends an account, recording the reason.
    ///
    /// Suspended accounts remain visible but should be denied access by
    /// callers; the status carries the enforcement signal.
    pub async fn suspend(
        &self,
        account_id: Uuid,
        reason: Option<String>,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .suspend_account(account_id, reason.clone())
            .await?
            .ok_or(Error::AccountNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT,
            %account_id,
            "Account suspended"
        );
        record_activity(
            &mut conn,
            account_id,
            ActivityAction::AccountSuspended,
            reason,
            client,
        )
        .await;

        Ok(account)
    }

    /// Reinstates a suspended account.
    ///
    /// Reinstating an account that is not suspended is a no-op.
    pub async fn reinstate(
        &self,
        account_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;

        if let Some(account) = conn.reinstate_account(account_id).await? {
            tracing::info!(
                target: TRACING_TARGET_ACCOUNT,
                %account_id,
                "Account reinstated"
            );
            record_activity(
                &mut conn,
                account_id,
                ActivityAction::AccountReinstated,
                None,
                client,
            )
            .await;
            return Ok(account);
        }

        // Nothing matched the suspended guard; report missing accounts and
        // leave already-active ones untouched.
        conn.find_account_by_id_with_hidden(account_id)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Adds a product to the account's favorites.
    pub async fn add_favorite_product(
        &self,
        account_id: Uuid,
        product_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        self.edit_favorites(account_id, FavoriteList::Products, client, |list| {
            if list.contains(&product_id) {
                false
            } else {
                list.push(product_id);
                true
            }
        })
        .await
    }

    /// Removes a product from the account's favorites.
    pub async fn remove_favorite_product(
        &self,
        account_id: Uuid,
        product_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        self.edit_favorites(account_id, FavoriteList::Products, client, |list| {
            let before = list.len();
            list.retain(|id| *id != product_id);
            list.len() != before
        })
        .await
    }

    /// Adds a vendor to the account's favorites.
    pub async fn add_favorite_vendor(
        &self,
        account_id: Uuid,
        vendor_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        self.edit_favorites(account_id, FavoriteList::Vendors, client, |list| {
            if list.contains(&vendor_id) {
                false
            } else {
                list.push(vendor_id);
                true
            }
        })
        .await
    }

    /// Removes a vendor from the account's favorites.
    pub async fn remove_favorite_vendor(
        &self,
        account_id: Uuid,
        vendor_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<Account> {
        self.edit_favorites(account_id, FavoriteList::Vendors, client, |list| {
            let before = list.len();
            list.retain(|id| *id != vendor_id);
            list.len() != before
        })
        .await
    }

    /// Applies an edit to one of the favorite lists under the version guard.
    ///
    /// The edit closure returns whether it changed the list; unchanged lists
    /// short-circuit without touching storage.
    async fn edit_favorites(
        &self,
        account_id: Uuid,
        which: FavoriteList,
        client: Option<&ClientContext>,
        edit: impl Fn(&mut Vec<Uuid>) -> bool,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        let mut attempts = 0;

        loop {
            let account = conn
                .find_account_by_id(account_id)
                .await?
                .ok_or(Error::AccountNotFound)?;

            let mut list = match which {
                FavoriteList::Products => account.favorite_products.clone(),
                FavoriteList::Vendors => account.favorite_vendors.clone(),
            };
            if !edit(&mut list) {
                return Ok(account);
            }

            let updated = match which {
                FavoriteList::Products => {
                    conn.set_favorite_products(account_id, account.version, list)
                        .await?
                }
                FavoriteList::Vendors => {
                    conn.set_favorite_vendors(account_id, account.version, list)
                        .await?
                }
            };

            if let Some(updated) = updated {
                record_activity(
                    &mut conn,
                    account_id,
                    ActivityAction::FavoritesUpdated,
                    None,
                    client,
                )
                .await;
                return Ok(updated);
            }

            match conn.find_account_by_id_with_hidden(account_id).await? {
                Some(current) if current.is_visible() => {
                    attempts += 1;
                    if attempts >= self.config.max_update_retries {
                        return Err(Error::EditConflict);
                    }
                }
                _ => return Err(Error::AccountNotFound),
            }
        }
    }

    /// Records a completed order against the buyer's statistics.
    ///
    /// The increment is applied in a single statement, so concurrent
    /// recordings never lose updates.
    pub async fn record_order_completion(
        &self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        conn.record_order_completion(account_id, amount)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Records a received review, folding the rating into the average.
    pub async fn record_review(&self, account_id: Uuid, rating: f64) -> Result<Account> {
        if !(0.0..=MAX_AVERAGE_RATING).contains(&rating) {
            let mut errors = validator::ValidationErrors::new();
            errors.add("rating".into(), validator::ValidationError::new("range"));
            return Err(Error::Validation(errors));
        }

        let mut conn = self.pg.get_connection().await?;
        conn.record_review(account_id, rating)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Records a completed sale against the vendor's statistics.
    pub async fn record_sale(&self, account_id: Uuid, amount: BigDecimal) -> Result<Account> {
        let mut conn = self.pg.get_connection().await?;
        conn.record_sale(account_id, amount)
            .await?
            .ok_or(Error::AccountNotFound)
    }

    /// Builds the externally visible projection of a visible account.
    ///
    /// Vendor accounts include their business details when a vendor profile
    /// exists.
    pub async fn public_profile(&self, account_id: Uuid) -> Result<PublicProfile> {
        let mut conn = self.pg.get_connection().await?;
        let account = conn
            .find_account_by_id(account_id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        if account.is_vendor() {
            if let Some(profile) = conn.find_vendor_profile(account_id).await? {
                return Ok(PublicProfile::from_account_with_vendor(&account, &profile));
            }
        }

        Ok(PublicProfile::from_account(&account))
    }

    /// Lists the account's audit trail, most recent first.
    pub async fn activity(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<AccountActivity>> {
        let mut conn = self.pg.get_connection().await?;
        Ok(conn.list_activities(account_id, pagination).await?)
    }
}

/// Maps a validated profile update onto the account changeset.
///
/// Structured fields (addresses, preferences) are serialized into their
/// JSONB representation here, so storage never sees the request types.
fn profile_changeset(request: &UpdateProfileRequest) -> Result<UpdateAccount> {
    let encode = |label: &'static str, err: serde_json::Error| {
        Error::Unexpected(format!("{label} encoding failed: {err}").into())
    };

    let primary_address = request
        .primary_address
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| encode("address", err))?
        .map(Some);
    let shipping_addresses = request
        .shipping_addresses
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| encode("address list", err))?;
    let preferences = request
        .preferences
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| encode("preferences", err))?;

    Ok(UpdateAccount {
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        phone_number: request.phone_number.clone().map(Some),
        bio: request.bio.clone().map(Some),
        avatar_url: request.avatar_url.clone().map(Some),
        primary_address,
        shipping_addresses,
        preferences,
        two_factor_enabled: request.two_factor_enabled,
    })
}

/// Checks a raw token against the account's slot of the given kind.
///
/// Precedence is fixed: an empty slot reports [`Error::TokenAbsent`], a
/// mismatched digest reports [`Error::TokenInvalid`], and only a matching
/// token can report [`Error::TokenExpired`].
fn validate_slot(account: &Account, raw_token: &str, slot: TokenSlot) -> Result<()> {
    let (digest, expires_at) = match slot {
        TokenSlot::PasswordReset => (
            account.password_reset_digest.as_deref(),
            account.password_reset_expires_at,
        ),
        TokenSlot::EmailVerification => (
            account.email_verify_digest.as_deref(),
            account.email_verify_expires_at,
        ),
    };

    let Some(stored_digest) = digest else {
        return Err(Error::TokenAbsent);
    };

    if digest_token(raw_token) != stored_digest {
        return Err(Error::TokenInvalid);
    }

    match expires_at {
        Some(expiry) if Timestamp::from(expiry) > Timestamp::now() => Ok(()),
        _ => Err(Error::TokenExpired),
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use vendora_postgres::model::{AccountPreferences, PostalAddress, ShippingAddress};
    use vendora_postgres::types::{AccountRole, AccountStatus};

    use super::*;

    fn sample_account() -> Account {
        let now = Timestamp::now();
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
    fn profile_changeset_carries_structured_fields() -> anyhow::Result<()> {
        let request = UpdateProfileRequest {
            first_name: Some("Janet".to_owned()),
            primary_address: Some(PostalAddress {
                street: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                state: None,
                postal_code: "12345".to_owned(),
                country: "US".to_owned(),
            }),
            shipping_addresses: Some(vec![ShippingAddress {
                label: "home".to_owned(),
                address: PostalAddress {
                    street: "1 Main St".to_owned(),
                    city: "Springfield".to_owned(),
                    state: None,
                    postal_code: "12345".to_owned(),
                    country: "US".to_owned(),
                },
                is_default: true,
            }]),
            preferences: Some(AccountPreferences {
                newsletter: true,
                ..AccountPreferences::default()
            }),
            two_factor_enabled: Some(true),
            ..UpdateProfileRequest::default()
        };

        let updates = profile_changeset(&request)?;
        assert_eq!(updates.first_name.as_deref(), Some("Janet"));
        assert_eq!(updates.two_factor_enabled, Some(true));

        let address = updates.primary_address.flatten().expect("address present");
        assert_eq!(address["city"], "Springfield");

        let list = updates.shipping_addresses.expect("address list present");
        assert_eq!(list.as_array().map(Vec::len), Some(1));
        assert_eq!(list[0]["label"], "home");

        let preferences = updates.preferences.expect("preferences present");
        assert_eq!(preferences["newsletter"], true);

        Ok(())
    }

    #[test]
    fn profile_changeset_leaves_absent_fields_untouched() -> anyhow::Result<()> {
        let updates = profile_changeset(&UpdateProfileRequest::default())?;
        assert!(updates.first_name.is_none());
        assert!(updates.primary_address.is_none());
        assert!(updates.shipping_addresses.is_none());
        assert!(updates.preferences.is_none());
        assert!(updates.two_factor_enabled.is_none());
        Ok(())
    }

    #[test]
    fn empty_slot_reports_token_absent() {
        let account = sample_account();
        let result = validate_slot(&account, "any-token", TokenSlot::PasswordReset);
        assert!(matches!(result, Err(Error::TokenAbsent)));
    }

    #[test]
    fn mismatched_token_reports_token_invalid() {
        let mut account = sample_account();
        account.password_reset_digest = Some(digest_token("the-real-token"));
        account.password_reset_expires_at =
            Some((Timestamp::now() + SignedDuration::from_mins(10)).into());

        let result = validate_slot(&account, "a-different-token", TokenSlot::PasswordReset);
        assert!(matches!(result, Err(Error::TokenInvalid)));
    }

    #[test]
    fn stale_token_reports_token_expired() {
        let mut account = sample_account();
        account.password_reset_digest = Some(digest_token("the-real-token"));
        account.password_reset_expires_at =
            Some((Timestamp::now() - SignedDuration::from_mins(1)).into());

        let result = validate_slot(&account, "the-real-token", TokenSlot::PasswordReset);
        assert!(matches!(result, Err(Error::TokenExpired)));
    }

    #[test]
    fn matching_unexpired_token_is_accepted() {
        let mut account = sample_account();
        account.email_verify_digest = Some(digest_token("verify-me"));
        account.email_verify_expires_at =
            Some((Timestamp::now() + SignedDuration::from_hours(24)).into());

        assert!(validate_slot(&account, "verify-me", TokenSlot::EmailVerification).is_ok());
    }

    #[test]
    fn mismatch_wins_over_expiry() {
        // A stale slot holding a different token must not leak that a token
        // ever existed beyond the invalid report.
        let mut account = sample_account();
        account.password_reset_digest = Some(digest_token("the-real-token"));
        account.password_reset_expires_at =
            Some((Timestamp::now() - SignedDuration::from_mins(1)).into());

        let result = validate_slot(&account, "a-different-token", TokenSlot::PasswordReset);
        assert!(matches!(result, Err(Error::TokenInvalid)));
    }
}
