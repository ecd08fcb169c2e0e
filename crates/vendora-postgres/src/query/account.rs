//! Account repository for managing user accounts.

use std::future::Future;

use bigdecimal::BigDecimal;
use diesel::BoxableExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Account, NewAccount, UpdateAccount};
use crate::types::AccountStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// The default visibility rule applied to account lookups.
///
/// This is the single choke point for hiding records: an account is visible
/// when it is active and has not been soft-deleted. Methods with a
/// `_with_hidden` suffix skip this filter.
fn visible() -> Box<
    dyn BoxableExpression<schema::accounts::table, Pg, SqlType = diesel::sql_types::Bool>,
> {
    use schema::accounts::dsl;

    Box::new(
        dsl::is_active
            .eq(true)
            .and(dsl::account_status.ne(AccountStatus::Deleted))
            .and(dsl::deleted_at.is_null()),
    )
}

/// Repository for account database operations.
///
/// Handles account lifecycle management including authentication, profile
/// management, credential token slots, and marketplace statistics.
///
/// Update operations guarded by a record version return `None` both when the
/// record does not exist and when the version check fails; callers
/// disambiguate with a `_with_hidden` lookup.
pub trait AccountRepository {
    /// Creates a new user account.
    ///
    /// Email addresses are trimmed and lowercased before insertion so the
    /// uniqueness guarantee is case-insensitive.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds a visible account by its unique identifier.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by its unique identifier, including hidden records.
    ///
    /// Intended for administrative and recovery flows only.
    fn find_account_by_id_with_hidden(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds a visible account by email address.
    ///
    /// Email comparison is case-insensitive.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by email address, including hidden records.
    fn find_account_by_email_with_hidden(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds a visible account holding the given password reset digest.
    fn find_account_by_reset_digest(
        &mut self,
        digest: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds a visible account holding the given email verification digest.
    fn find_account_by_verify_digest(
        &mut self,
        digest: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Lists visible accounts ordered by creation time, most recent first.
    fn list_accounts(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Lists all accounts including hidden ones.
    fn list_accounts_with_hidden(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Applies a profile changeset guarded by the record version.
    ///
    /// The update succeeds only when the stored version equals
    /// `expected_version`; on success the version is bumped. Returns `None`
    /// when the guard did not match any row.
    fn update_account(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        updates: UpdateAccount,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Replaces the password hash and records when the change happened.
    ///
    /// Also clears any outstanding password reset token so credentials issued
    /// before the change cannot be replayed.
    fn update_password(
        &mut self,
        account_id: Uuid,
        password_hash: String,
        changed_at: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Replaces the password hash if the stored reset digest matches.
    ///
    /// Compare-and-set makes token redemption single-winner; the reset slot
    /// is cleared in the same statement. Returns `None` when the digest does
    /// not match the outstanding token.
    fn redeem_password_reset(
        &mut self,
        account_id: Uuid,
        digest: &str,
        password_hash: String,
        changed_at: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Stores a password reset token digest, replacing any previous one.
    fn store_password_reset_token(
        &mut self,
        account_id: Uuid,
        digest: String,
        expires_at: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Clears the password reset token slot if the stored digest matches.
    ///
    /// Compare-and-clear makes consumption single-use. Returns `None` when
    /// the digest does not match the outstanding token.
    fn clear_password_reset_token(
        &mut self,
        account_id: Uuid,
        digest: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Stores an email verification token digest, replacing any previous one.
    fn store_email_verify_token(
        &mut self,
        account_id: Uuid,
        digest: String,
        expires_at: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Marks the email as verified if the stored digest matches.
    ///
    /// The verification token slot is cleared in the same statement, making
    /// consumption single-use. Returns `None` when the digest does not match
    /// the outstanding token.
    fn confirm_email(
        &mut self,
        account_id: Uuid,
        digest: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Soft deletes an account.
    ///
    /// Marks the record as deleted and deactivates it without removing data,
    /// which hides it from all default lookups.
    fn soft_delete_account(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Suspends an account, recording the reason and timestamp.
    fn suspend_account(
        &mut self,
        account_id: Uuid,
        reason: Option<String>,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Reinstates a suspended account.
    fn reinstate_account(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Records a successful login timestamp.
    fn record_login(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Checks if an email address is already registered.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Checks if an email address is used by another account.
    fn email_exists_for_other(
        &mut self,
        email: &str,
        exclude_account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Records a completed order against the buyer's statistics.
    ///
    /// Increments the order count and adds the amount to the running total in
    /// a single statement, so concurrent recordings never lose increments.
    fn record_order_completion(
        &mut self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Records a received review, folding the rating into the average.
    fn record_review(
        &mut self,
        account_id: Uuid,
        rating: f64,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Records a completed sale against the vendor's statistics.
    fn record_sale(
        &mut self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Replaces the favorite product list, guarded by the record version.
    fn set_favorite_products(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        products: Vec<Uuid>,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Replaces the favorite vendor list, guarded by the record version.
    fn set_favorite_vendors(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        vendors: Vec<Uuid>,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        // Normalize fields: trim whitespace, lowercase email
        new_account.email_address = new_account.email_address.trim().to_lowercase();
        new_account.first_name = new_account.first_name.trim().to_owned();
        new_account.last_name = new_account.last_name.trim().to_owned();

        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .filter(visible())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_id_with_hidden(
        &mut self,
        account_id: Uuid,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .filter(visible())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_email_with_hidden(
        &mut self,
        email: &str,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_reset_digest(&mut self, digest: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::password_reset_digest.eq(digest))
            .filter(visible())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_verify_digest(&mut self, digest: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_verify_digest.eq(digest))
            .filter(visible())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_accounts(&mut self, pagination: Pagination) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(visible())
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_accounts_with_hidden(
        &mut self,
        pagination: Pagination,
    ) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        mut updates: UpdateAccount,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        // Normalize fields: trim whitespace
        if let Some(name) = updates.first_name.as_mut() {
            *name = name.trim().to_owned();
        }
        if let Some(name) = updates.last_name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::version.eq(expected_version)),
        )
        .set((&updates, dsl::version.eq(dsl::version + 1)))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn update_password(
        &mut self,
        account_id: Uuid,
        password_hash: String,
        changed_at: Timestamp,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::password_hash.eq(password_hash),
                dsl::password_changed_at.eq(Some(jiff_diesel::Timestamp::from(changed_at))),
                dsl::password_reset_digest.eq(None::<String>),
                dsl::password_reset_expires_at.eq(None::<jiff_diesel::Timestamp>),
                dsl::version.eq(dsl::version + 1),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn redeem_password_reset(
        &mut self,
        account_id: Uuid,
        digest: &str,
        password_hash: String,
        changed_at: Timestamp,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::password_reset_digest.eq(digest)),
        )
        .set((
            dsl::password_hash.eq(password_hash),
            dsl::password_changed_at.eq(Some(jiff_diesel::Timestamp::from(changed_at))),
            dsl::password_reset_digest.eq(None::<String>),
            dsl::password_reset_expires_at.eq(None::<jiff_diesel::Timestamp>),
            dsl::version.eq(dsl::version + 1),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn store_password_reset_token(
        &mut self,
        account_id: Uuid,
        digest: String,
        expires_at: Timestamp,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::password_reset_digest.eq(Some(digest)),
                dsl::password_reset_expires_at.eq(Some(jiff_diesel::Timestamp::from(expires_at))),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn clear_password_reset_token(
        &mut self,
        account_id: Uuid,
        digest: &str,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::password_reset_digest.eq(digest)),
        )
        .set((
            dsl::password_reset_digest.eq(None::<String>),
            dsl::password_reset_expires_at.eq(None::<jiff_diesel::Timestamp>),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn store_email_verify_token(
        &mut self,
        account_id: Uuid,
        digest: String,
        expires_at: Timestamp,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::email_verify_digest.eq(Some(digest)),
                dsl::email_verify_expires_at.eq(Some(jiff_diesel::Timestamp::from(expires_at))),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn confirm_email(
        &mut self,
        account_id: Uuid,
        digest: &str,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::email_verify_digest.eq(digest)),
        )
        .set((
            dsl::email_verified.eq(true),
            dsl::email_verify_digest.eq(None::<String>),
            dsl::email_verify_expires_at.eq(None::<jiff_diesel::Timestamp>),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn soft_delete_account(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::account_status.eq(AccountStatus::Deleted),
                dsl::is_active.eq(false),
                dsl::deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn suspend_account(
        &mut self,
        account_id: Uuid,
        reason: Option<String>,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::account_status.eq(AccountStatus::Suspended),
                dsl::suspension_reason.eq(reason),
                dsl::suspended_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn reinstate_account(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::account_status.eq(AccountStatus::Suspended)),
        )
        .set((
            dsl::account_status.eq(AccountStatus::Active),
            dsl::suspension_reason.eq(None::<String>),
            dsl::suspended_at.eq(None::<jiff_diesel::Timestamp>),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn record_login(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set(dsl::last_login_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let count: i64 = accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count > 0)
    }

    async fn email_exists_for_other(
        &mut self,
        email: &str,
        exclude_account_id: Uuid,
    ) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let count: i64 = accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .filter(dsl::id.ne(exclude_account_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count > 0)
    }

    async fn record_order_completion(
        &mut self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::total_orders.eq(dsl::total_orders + 1),
                dsl::total_spent.eq(dsl::total_spent + amount),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn record_review(
        &mut self,
        account_id: Uuid,
        rating: f64,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        // Fold the new rating into the running average in one statement so
        // concurrent reviews never observe a stale count.
        let new_average = diesel::dsl::sql::<diesel::sql_types::Double>(
            "(average_rating * review_count + ",
        )
        .bind::<diesel::sql_types::Double, _>(rating)
        .sql(") / (review_count + 1)");

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::average_rating.eq(new_average),
                dsl::review_count.eq(dsl::review_count + 1),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn record_sale(
        &mut self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((
                dsl::products_sold.eq(dsl::products_sold + 1),
                dsl::total_sales_revenue.eq(dsl::total_sales_revenue + amount),
            ))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn set_favorite_products(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        products: Vec<Uuid>,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::version.eq(expected_version)),
        )
        .set((
            dsl::favorite_products.eq(products),
            dsl::version.eq(dsl::version + 1),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn set_favorite_vendors(
        &mut self,
        account_id: Uuid,
        expected_version: i64,
        vendors: Vec<Uuid>,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::version.eq(expected_version)),
        )
        .set((
            dsl::favorite_vendors.eq(vendors),
            dsl::version.eq(dsl::version + 1),
        ))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;
    use diesel::prelude::*;
    use uuid::Uuid;

    use crate::schema::accounts::{self, dsl};

    #[test]
    fn password_reset_redemption_is_digest_guarded() {
        let statement = diesel::update(
            accounts::table
                .filter(dsl::id.eq(Uuid::nil()))
                .filter(dsl::password_reset_digest.eq("digest")),
        )
        .set((
            dsl::password_hash.eq("hash"),
            dsl::password_reset_digest.eq(None::<String>),
        ));

        let sql = debug_query::<Pg, _>(&statement).to_string();
        assert!(sql.contains(r#""id" = $"#), "{sql}");
        assert!(sql.contains(r#""password_reset_digest" = $"#), "{sql}");
    }
}
