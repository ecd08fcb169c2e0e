//! Vendor verification workflow service.
//!
//! Vendor profiles move through a one-directional review: they start
//! pending, receive exactly one terminal decision (verified or rejected),
//! and can only return to pending through the explicit administrative
//! reset. Verification documents are accepted while the review is open and
//! form an append-only history.

use jiff::Timestamp;
use uuid::Uuid;
use validator::Validate;
use vendora_postgres::model::{NewVendorProfile, VendorProfile, VerificationDocument};
use vendora_postgres::query::{AccountRepository, Pagination, VendorProfileRepository};
use vendora_postgres::types::constants::vendor::MAX_COMMISSION_RATE;
use vendora_postgres::types::VerificationStatus;
use vendora_postgres::PgClient;

use crate::audit::{record_activity, ActivityAction, ClientContext};
use crate::request::VendorApplicationRequest;
use crate::{Error, Result, TRACING_TARGET_VENDOR};

/// Service for vendor applications and the verification review.
#[derive(Debug, Clone)]
pub struct VendorService {
    pg: PgClient,
}

impl VendorService {
    /// Creates a new vendor service backed by the given database client.
    pub fn new(pg: PgClient) -> Self {
        Self { pg }
    }

    /// Submits a vendor application for an existing account.
    ///
    /// The profile starts pending review with the platform's default
    /// commission rate. The account keeps its current role until the
    /// application is approved.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when the payload fails field validation
    /// - [`Error::AccountNotFound`] when no visible account matches
    /// - [`Error::DuplicateRegistration`] when the registration number is
    ///   already in use
    pub async fn submit_application(
        &self,
        account_id: Uuid,
        request: VendorApplicationRequest,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        request.validate()?;

        let mut conn = self.pg.get_connection().await?;
        conn.find_account_by_id(account_id)
            .await?
            .ok_or(Error::AccountNotFound)?;

        let profile = conn
            .create_vendor_profile(NewVendorProfile {
                account_id,
                business_name: request.business_name,
                registration_number: request.registration_number,
                tax_id: request.tax_id,
                business_type: request.business_type,
                years_in_business: request.years_in_business,
                website_url: request.website_url,
                categories: request.categories,
                commission_rate: None,
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_VENDOR,
            %account_id,
            business_name = %profile.business_name,
            "Vendor application submitted"
        );
        record_activity(
            &mut conn,
            account_id,
            ActivityAction::VendorApplied,
            Some(profile.business_name.clone()),
            client,
        )
        .await;

        Ok(profile)
    }

    /// Fetches the vendor profile attached to an account.
    pub async fn get_profile(&self, account_id: Uuid) -> Result<VendorProfile> {
        let mut conn = self.pg.get_connection().await?;
        conn.find_vendor_profile(account_id)
            .await?
            .ok_or(Error::VendorProfileNotFound)
    }

    /// Appends a verification document to a pending profile.
    ///
    /// Documents are frozen once a terminal decision has been recorded;
    /// the history itself never shrinks.
    pub async fn add_document(
        &self,
        account_id: Uuid,
        kind: String,
        url: String,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        let mut conn = self.pg.get_connection().await?;
        let profile = conn
            .find_vendor_profile(account_id)
            .await?
            .ok_or(Error::VendorProfileNotFound)?;

        if !profile.verification_status.accepts_documents() {
            return Err(Error::DocumentsFrozen);
        }

        let document = serde_json::to_value(VerificationDocument {
            kind: kind.clone(),
            url,
            uploaded_at: Timestamp::now(),
        })
        .map_err(|e| Error::Unexpected(format!("Document serialization failed: {e}").into()))?;

        // The pending guard in the append makes a racing decision win over
        // a late upload.
        let profile = conn
            .append_verification_document(account_id, document)
            .await?
            .ok_or(Error::DocumentsFrozen)?;

        record_activity(
            &mut conn,
            account_id,
            ActivityAction::VendorDocumentAdded,
            Some(kind),
            client,
        )
        .await;

        Ok(profile)
    }

    /// Approves a pending vendor application.
    pub async fn approve(
        &self,
        account_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        self.decide(account_id, VerificationStatus::Verified, client)
            .await
    }

    /// Rejects a pending vendor application.
    pub async fn reject(
        &self,
        account_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        self.decide(account_id, VerificationStatus::Rejected, client)
            .await
    }

    /// Records a terminal verification decision.
    async fn decide(
        &self,
        account_id: Uuid,
        decision: VerificationStatus,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        let mut conn = self.pg.get_connection().await?;
        let profile = conn
            .find_vendor_profile(account_id)
            .await?
            .ok_or(Error::VendorProfileNotFound)?;

        if !profile.verification_status.can_transition_to(decision) {
            tracing::error!(
                target: TRACING_TARGET_VENDOR,
                %account_id,
                from = %profile.verification_status,
                to = %decision,
                "Illegal verification transition attempted"
            );
            return Err(Error::InvalidTransition {
                from: profile.verification_status,
                to: decision,
            });
        }

        // The pending guard in the update makes concurrent reviewers
        // single-winner; the loser observes the decided state.
        let profile = conn
            .set_verification_status(account_id, decision)
            .await?
            .ok_or(Error::InvalidTransition {
                from: profile.verification_status,
                to: decision,
            })?;

        tracing::info!(
            target: TRACING_TARGET_VENDOR,
            %account_id,
            status = %decision,
            "Verification decision recorded"
        );
        let action = match decision {
            VerificationStatus::Verified => ActivityAction::VendorApproved,
            _ => ActivityAction::VendorRejected,
        };
        record_activity(&mut conn, account_id, action, None, client).await;

        Ok(profile)
    }

    /// Returns a decided profile to the pending state.
    ///
    /// This is the administrative reset path and the only way back from a
    /// terminal decision; the document history is preserved.
    pub async fn reset_review(
        &self,
        account_id: Uuid,
        client: Option<&ClientContext>,
    ) -> Result<VendorProfile> {
        let mut conn = self.pg.get_connection().await?;
        let profile = conn
            .reset_verification(account_id)
            .await?
            .ok_or(Error::VendorProfileNotFound)?;

        tracing::info!(
            target: TRACING_TARGET_VENDOR,
            %account_id,
            "Verification review reset to pending"
        );
        record_activity(
            &mut conn,
            account_id,
            ActivityAction::VendorReviewReset,
            None,
            client,
        )
        .await;

        Ok(profile)
    }

    /// Updates the commission rate charged on the vendor's sales.
    pub async fn update_commission(&self, account_id: Uuid, rate: f64) -> Result<VendorProfile> {
        if !(0.0..=MAX_COMMISSION_RATE).contains(&rate) {
            let mut errors = validator::ValidationErrors::new();
            errors.add(
                "commission_rate".into(),
                validator::ValidationError::new("range"),
            );
            return Err(Error::Validation(errors));
        }

        let mut conn = self.pg.get_connection().await?;
        conn.update_vendor_profile(
            account_id,
            vendora_postgres::model::UpdateVendorProfile {
                commission_rate: Some(rate),
                ..Default::default()
            },
        )
        .await?
        .ok_or(Error::VendorProfileNotFound)
    }

    /// Lists profiles awaiting review, oldest applications served through
    /// pagination like any other listing.
    pub async fn list_pending(&self, pagination: Pagination) -> Result<Vec<VendorProfile>> {
        let mut conn = self.pg.get_connection().await?;
        Ok(conn
            .list_vendor_profiles_by_status(VerificationStatus::Pending, pagination)
            .await?)
    }
}
