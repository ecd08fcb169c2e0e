//! Bounded per-account activity audit log repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use super::Pagination;
use crate::model::{AccountActivity, NewAccountActivity};
use crate::types::constants::activity::MAX_ENTRIES_PER_ACCOUNT;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for the per-account audit log.
///
/// The log is a bounded FIFO: [`log_activity`] appends an entry and evicts
/// anything beyond the retention bound oldest-first, both inside one
/// transaction.
///
/// [`log_activity`]: AccountActivityRepository::log_activity
pub trait AccountActivityRepository {
    /// Appends an audit entry and prunes the account's log to its bound.
    fn log_activity(
        &mut self,
        new_activity: NewAccountActivity,
    ) -> impl Future<Output = PgResult<AccountActivity>> + Send;

    /// Lists audit entries for an account, most recent first.
    fn list_activities(
        &mut self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<AccountActivity>>> + Send;

    /// Counts retained audit entries for an account.
    fn count_activities(&mut self, account_id: Uuid)
    -> impl Future<Output = PgResult<i64>> + Send;
}

impl AccountActivityRepository for PgConnection {
    async fn log_activity(
        &mut self,
        new_activity: NewAccountActivity,
    ) -> PgResult<AccountActivity> {
        use schema::account_activities::{self, dsl};

        let account_id = new_activity.account_id;
        let entry = self
            .transaction::<_, PgError, _>(|conn| {
                async move {
                    let entry: AccountActivity =
                        diesel::insert_into(account_activities::table)
                            .values(&new_activity)
                            .returning(AccountActivity::as_returning())
                            .get_result(conn)
                            .await?;

                    // Evict oldest entries beyond the retention bound. The
                    // id of the oldest retained entry is looked up first so
                    // the delete stays a plain filter on the table.
                    let threshold: Option<i64> = account_activities::table
                        .filter(dsl::account_id.eq(account_id))
                        .order(dsl::id.desc())
                        .offset(MAX_ENTRIES_PER_ACCOUNT - 1)
                        .limit(1)
                        .select(dsl::id)
                        .first(conn)
                        .await
                        .optional()?;

                    if let Some(threshold) = threshold {
                        let evicted = diesel::delete(
                            account_activities::table
                                .filter(dsl::account_id.eq(account_id))
                                .filter(dsl::id.lt(threshold)),
                        )
                        .execute(conn)
                        .await?;

                        if evicted > 0 {
                            tracing::debug!(
                                target: TRACING_TARGET_QUERY,
                                %account_id,
                                evicted,
                                "Pruned activity log to retention bound"
                            );
                        }
                    }

                    Ok(entry)
                }
                .scope_boxed()
            })
            .await?;

        Ok(entry)
    }

    async fn list_activities(
        &mut self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<AccountActivity>> {
        use schema::account_activities::{self, dsl};

        account_activities::table
            .filter(dsl::account_id.eq(account_id))
            .order(dsl::id.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(AccountActivity::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_activities(&mut self, account_id: Uuid) -> PgResult<i64> {
        use schema::account_activities::{self, dsl};

        account_activities::table
            .filter(dsl::account_id.eq(account_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;
    use diesel::prelude::*;
    use uuid::Uuid;

    use crate::schema::account_activities::{self, dsl};
    use crate::types::constants::activity::MAX_ENTRIES_PER_ACCOUNT;

    #[test]
    fn eviction_delete_targets_ids_below_threshold() {
        let statement = diesel::delete(
            account_activities::table
                .filter(dsl::account_id.eq(Uuid::nil()))
                .filter(dsl::id.lt(42_i64)),
        );
        let sql = debug_query::<Pg, _>(&statement).to_string();
        assert!(sql.starts_with("DELETE"), "{sql}");
        assert!(sql.contains(r#""account_id" = $"#), "{sql}");
        assert!(sql.contains(r#""id" < $"#), "{sql}");
    }

    #[test]
    fn eviction_threshold_is_the_oldest_retained_entry() {
        let query = account_activities::table
            .filter(dsl::account_id.eq(Uuid::nil()))
            .order(dsl::id.desc())
            .offset(MAX_ENTRIES_PER_ACCOUNT - 1)
            .limit(1)
            .select(dsl::id);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("ORDER BY"), "{sql}");
        assert!(sql.contains("LIMIT"), "{sql}");
        assert!(sql.contains("OFFSET"), "{sql}");
    }
}
