//! Vendor profile repository managing business details and verification state.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewVendorProfile, UpdateVendorProfile, VendorProfile};
use crate::types::VerificationStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for vendor profile database operations.
///
/// Verification state transitions are guarded at the SQL level: decisions
/// apply only to pending profiles, so two concurrent reviewers cannot both
/// record an outcome.
pub trait VendorProfileRepository {
    /// Creates a new vendor profile in the pending verification state.
    fn create_vendor_profile(
        &mut self,
        new_profile: NewVendorProfile,
    ) -> impl Future<Output = PgResult<VendorProfile>> + Send;

    /// Finds the vendor profile attached to the given account.
    fn find_vendor_profile(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<VendorProfile>>> + Send;

    /// Applies a business-field changeset to the profile.
    fn update_vendor_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateVendorProfile,
    ) -> impl Future<Output = PgResult<Option<VendorProfile>>> + Send;

    /// Appends a verification document to the profile's document history.
    ///
    /// Documents are accepted only while the profile is pending review; the
    /// list itself is append-only and never shrinks. Returns `None` when the
    /// profile is missing or no longer pending.
    fn append_verification_document(
        &mut self,
        account_id: Uuid,
        document: serde_json::Value,
    ) -> impl Future<Output = PgResult<Option<VendorProfile>>> + Send;

    /// Records a terminal verification decision on a pending profile.
    ///
    /// Stamps the decision time. Returns `None` when the profile is missing
    /// or a decision was already recorded.
    fn set_verification_status(
        &mut self,
        account_id: Uuid,
        status: VerificationStatus,
    ) -> impl Future<Output = PgResult<Option<VendorProfile>>> + Send;

    /// Returns a decided profile to the pending state.
    ///
    /// This is the explicit administrative reset path; the decision timestamp
    /// is cleared but the document history is preserved.
    fn reset_verification(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<VendorProfile>>> + Send;

    /// Lists vendor profiles in the given verification state.
    fn list_vendor_profiles_by_status(
        &mut self,
        status: VerificationStatus,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<VendorProfile>>> + Send;
}

impl VendorProfileRepository for PgConnection {
    async fn create_vendor_profile(
        &mut self,
        mut new_profile: NewVendorProfile,
    ) -> PgResult<VendorProfile> {
        use schema::vendor_profiles;

        // Normalize fields: trim whitespace
        new_profile.business_name = new_profile.business_name.trim().to_owned();
        if let Some(ref mut registration) = new_profile.registration_number {
            *registration = registration.trim().to_owned();
        }

        diesel::insert_into(vendor_profiles::table)
            .values(&new_profile)
            .returning(VendorProfile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_vendor_profile(&mut self, account_id: Uuid) -> PgResult<Option<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        vendor_profiles::table
            .filter(dsl::account_id.eq(account_id))
            .select(VendorProfile::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_vendor_profile(
        &mut self,
        account_id: Uuid,
        mut updates: UpdateVendorProfile,
    ) -> PgResult<Option<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        if let Some(name) = updates.business_name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(vendor_profiles::table.filter(dsl::account_id.eq(account_id)))
            .set(&updates)
            .returning(VendorProfile::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn append_verification_document(
        &mut self,
        account_id: Uuid,
        document: serde_json::Value,
    ) -> PgResult<Option<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        let appended = diesel::dsl::sql::<diesel::sql_types::Jsonb>("verification_documents || ")
            .bind::<diesel::sql_types::Jsonb, _>(document);

        diesel::update(
            vendor_profiles::table
                .filter(dsl::account_id.eq(account_id))
                .filter(dsl::verification_status.eq(VerificationStatus::Pending)),
        )
        .set(dsl::verification_documents.eq(appended))
        .returning(VendorProfile::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn set_verification_status(
        &mut self,
        account_id: Uuid,
        status: VerificationStatus,
    ) -> PgResult<Option<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        diesel::update(
            vendor_profiles::table
                .filter(dsl::account_id.eq(account_id))
                .filter(dsl::verification_status.eq(VerificationStatus::Pending)),
        )
        .set((
            dsl::verification_status.eq(status),
            dsl::verification_date.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))),
        ))
        .returning(VendorProfile::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn reset_verification(&mut self, account_id: Uuid) -> PgResult<Option<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        diesel::update(vendor_profiles::table.filter(dsl::account_id.eq(account_id)))
            .set((
                dsl::verification_status.eq(VerificationStatus::Pending),
                dsl::verification_date.eq(None::<jiff_diesel::Timestamp>),
            ))
            .returning(VendorProfile::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_vendor_profiles_by_status(
        &mut self,
        status: VerificationStatus,
        pagination: Pagination,
    ) -> PgResult<Vec<VendorProfile>> {
        use schema::vendor_profiles::{self, dsl};

        vendor_profiles::table
            .filter(dsl::verification_status.eq(status))
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(VendorProfile::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
