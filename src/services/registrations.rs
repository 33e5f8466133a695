//! Registration pricing and submission

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    booking::{form, FormQuote, ProgramCatalog, ProgramDefinition},
    error::{AppError, AppResult, FieldErrors},
    models::{
        lead::{Lead, NewLead},
        registration::{
            CreateRegistration, NewRegistration, QuoteRequest, Registration, RegistrationQuery,
            UpdateRegistration,
        },
    },
    repository::{leads::LeadsRepository, registrations::RegistrationsRepository, Repository},
    services::{
        email::ConfirmationDetails,
        qr,
        redis::submission_fingerprint,
    },
};

/// Where registrations are written
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn create(&self, data: &NewRegistration) -> AppResult<Registration>;
    async fn set_qr_token(&self, id: Uuid, token: &str) -> AppResult<()>;
}

/// Where leads are captured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn create(&self, data: &NewLead) -> AppResult<Lead>;
}

/// Outcome of a single confirmation email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailReceipt {
    pub success: bool,
    pub error: Option<String>,
}

impl EmailReceipt {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send_confirmation_email(
        &self,
        email: &str,
        program: &str,
        details: &ConfirmationDetails,
    ) -> EmailReceipt;
}

/// Rejects a submission seen recently
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionGuard: Send + Sync {
    /// Record the fingerprint; `false` when it was already present
    async fn check_and_record(&self, fingerprint: &str) -> AppResult<bool>;
    async fn release(&self, fingerprint: &str) -> AppResult<()>;
}

#[async_trait]
impl RegistrationStore for RegistrationsRepository {
    async fn create(&self, data: &NewRegistration) -> AppResult<Registration> {
        RegistrationsRepository::create(self, data).await
    }

    async fn set_qr_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        RegistrationsRepository::set_qr_token(self, id, token).await
    }
}

#[async_trait]
impl LeadSink for LeadsRepository {
    async fn create(&self, data: &NewLead) -> AppResult<Lead> {
        LeadsRepository::create(self, data).await
    }
}

/// Stages of one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    Validating,
    Guarding,
    Persisting,
    Deriving,
    Notifying,
    Emailing,
    Complete,
    Failed,
}

impl SubmissionStage {
    pub fn next(self) -> Option<Self> {
        use SubmissionStage::*;
        match self {
            Idle => Some(Validating),
            Validating => Some(Guarding),
            Guarding => Some(Persisting),
            Persisting => Some(Deriving),
            Deriving => Some(Notifying),
            Notifying => Some(Emailing),
            Emailing => Some(Complete),
            Complete | Failed => None,
        }
    }

    /// Stages only move forward one step, or to `Failed` from any live stage
    pub fn can_transition(self, to: Self) -> bool {
        match to {
            SubmissionStage::Failed => !matches!(self, SubmissionStage::Complete | SubmissionStage::Failed),
            _ => self.next() == Some(to),
        }
    }
}

struct Attempt {
    stage: SubmissionStage,
    registration_id: Option<Uuid>,
}

impl Attempt {
    fn new() -> Self {
        Self {
            stage: SubmissionStage::Idle,
            registration_id: None,
        }
    }

    fn advance(&mut self, to: SubmissionStage) -> AppResult<()> {
        if !self.stage.can_transition(to) {
            return Err(AppError::Internal(format!(
                "Invalid submission transition {:?} -> {:?}",
                self.stage, to
            )));
        }
        tracing::debug!(from = ?self.stage, to = ?to, registration_id = ?self.registration_id, "Submission stage");
        self.stage = to;
        Ok(())
    }

    /// Mark the attempt failed and hand the error back
    fn fail(&mut self, error: AppError) -> AppError {
        tracing::debug!(from = ?self.stage, registration_id = ?self.registration_id, "Submission failed: {}", error);
        self.stage = SubmissionStage::Failed;
        error
    }
}

/// How the confirmation email went
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmailDelivery {
    Sent,
    Failed { reason: String },
}

impl From<EmailReceipt> for EmailDelivery {
    fn from(receipt: EmailReceipt) -> Self {
        if receipt.success {
            EmailDelivery::Sent
        } else {
            EmailDelivery::Failed {
                reason: receipt.error.unwrap_or_else(|| "unknown error".to_string()),
            }
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionOutcome {
    pub registration: Registration,
    pub qr_token: Option<String>,
    /// SVG QR code as a `data:` URL
    pub qr_image: Option<String>,
    pub lead_captured: bool,
    pub email: EmailDelivery,
}

/// Validate, guard, persist, derive, notify and email, in that order
#[derive(Clone)]
pub struct SubmissionPipeline {
    store: Arc<dyn RegistrationStore>,
    leads: Arc<dyn LeadSink>,
    mailer: Arc<dyn ConfirmationMailer>,
    guard: Arc<dyn SubmissionGuard>,
    catalog: Arc<ProgramCatalog>,
    currency: String,
}

impl SubmissionPipeline {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        leads: Arc<dyn LeadSink>,
        mailer: Arc<dyn ConfirmationMailer>,
        guard: Arc<dyn SubmissionGuard>,
        catalog: Arc<ProgramCatalog>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            leads,
            mailer,
            guard,
            catalog,
            currency: currency.into(),
        }
    }

    pub fn catalog(&self) -> &ProgramCatalog {
        &self.catalog
    }

    /// Schema rules plus the program's own rules, all reported together
    fn validate(&self, form: &CreateRegistration, today: NaiveDate) -> AppResult<&ProgramDefinition> {
        let program = self.catalog.get(form.program)?;

        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        errors.merge(program.check_children(&form.children, today));
        errors.into_result()?;

        Ok(program)
    }

    pub async fn submit(&self, form: CreateRegistration) -> AppResult<SubmissionOutcome> {
        self.submit_on(form, Utc::now().date_naive()).await
    }

    pub async fn submit_on(
        &self,
        form: CreateRegistration,
        today: NaiveDate,
    ) -> AppResult<SubmissionOutcome> {
        let mut attempt = Attempt::new();

        attempt.advance(SubmissionStage::Validating)?;
        let program = match self.validate(&form, today) {
            Ok(program) => program,
            Err(e) => return Err(attempt.fail(e)),
        };

        attempt.advance(SubmissionStage::Guarding)?;
        let fingerprint = submission_fingerprint(&form.email, &form.phone, form.program);
        let guarded = match self.guard.check_and_record(&fingerprint).await {
            Ok(true) => true,
            Ok(false) => {
                return Err(attempt.fail(AppError::Conflict(
                    "An identical registration was submitted recently".to_string(),
                )))
            }
            Err(e) => {
                tracing::warn!("Duplicate guard unavailable, continuing without it: {}", e);
                false
            }
        };

        attempt.advance(SubmissionStage::Persisting)?;
        let quote = form::quote(&form.children, &program.pricing, today);
        let new_registration = NewRegistration {
            program: form.program,
            parent_name: form.parent_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            location: form.location,
            children: quote.children,
            payment_method: form.payment_method,
            total_amount: quote.total,
            currency: self.currency.clone(),
            notes: form.notes,
        };

        let mut registration = match self.store.create(&new_registration).await {
            Ok(registration) => registration,
            Err(e) => {
                if guarded {
                    if let Err(release_err) = self.guard.release(&fingerprint).await {
                        tracing::warn!("Failed to release submission fingerprint: {}", release_err);
                    }
                }
                return Err(attempt.fail(e));
            }
        };
        attempt.registration_id = Some(registration.id);
        tracing::info!(
            registration_id = %registration.id,
            program = %registration.program,
            total = %registration.total_amount,
            "Registration created"
        );

        attempt.advance(SubmissionStage::Deriving)?;
        let token = qr::generate_qr_data(registration.id);
        let qr_token = match self.store.set_qr_token(registration.id, &token).await {
            Ok(()) => {
                registration.qr_token = Some(token.clone());
                Some(token)
            }
            Err(e) => {
                tracing::warn!(registration_id = %registration.id, "Failed to store QR token: {}", e);
                None
            }
        };
        let qr_image = match qr_token.as_deref().map(qr::render_qr_image) {
            Some(Ok(image)) => Some(image),
            Some(Err(e)) => {
                tracing::warn!(registration_id = %registration.id, "Failed to render QR code: {}", e);
                None
            }
            None => None,
        };

        attempt.advance(SubmissionStage::Notifying)?;
        let lead_captured = match self.leads.create(&NewLead::from_registration(&registration)).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(registration_id = %registration.id, "Failed to capture lead: {}", e);
                false
            }
        };

        attempt.advance(SubmissionStage::Emailing)?;
        let details = ConfirmationDetails::new(&registration, qr_token.as_deref());
        let receipt = self
            .mailer
            .send_confirmation_email(&registration.email, &program.title, &details)
            .await;
        if let Some(reason) = &receipt.error {
            tracing::warn!(registration_id = %registration.id, "Confirmation email not sent: {}", reason);
        }

        attempt.advance(SubmissionStage::Complete)?;
        Ok(SubmissionOutcome {
            registration,
            qr_token,
            qr_image,
            lead_captured,
            email: receipt.into(),
        })
    }
}

#[derive(Clone)]
pub struct RegistrationsService {
    repository: Repository,
    pipeline: SubmissionPipeline,
}

impl RegistrationsService {
    pub fn new(repository: Repository, pipeline: SubmissionPipeline) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    /// Programs currently open for registration
    pub fn programs(&self) -> Vec<ProgramDefinition> {
        self.pipeline.catalog().enabled().into_iter().cloned().collect()
    }

    /// Price a draft form without saving anything
    pub fn quote(&self, request: &QuoteRequest) -> AppResult<FormQuote> {
        self.quote_on(request, Utc::now().date_naive())
    }

    pub fn quote_on(&self, request: &QuoteRequest, today: NaiveDate) -> AppResult<FormQuote> {
        let program = self.pipeline.catalog().get(request.program)?;

        let mut errors = match request.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        errors.merge(program.check_children(&request.children, today));
        errors.into_result()?;

        Ok(form::quote(&request.children, &program.pricing, today))
    }

    pub async fn submit(&self, form: CreateRegistration) -> AppResult<SubmissionOutcome> {
        self.pipeline.submit(form).await
    }

    pub async fn list(&self, query: &RegistrationQuery) -> AppResult<(Vec<Registration>, i64)> {
        self.repository.registrations.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Registration> {
        self.repository.registrations.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, data: UpdateRegistration) -> AppResult<Registration> {
        data.validate()?;
        self.repository.registrations.update(id, &data).await
    }

    /// Resolve a scanned QR token to its registration
    pub async fn check_in(&self, token: &str) -> AppResult<Registration> {
        let id = qr::verify(token)?;
        let registration = self.repository.registrations.get_by_id(id).await?;
        if registration.qr_token.as_deref() != Some(token.trim()) {
            return Err(AppError::NotFound("Registration code not recognised".to_string()));
        }
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{PriceBasis, ProgramBuilder, RateTable, SessionKind};
    use crate::models::{
        enums::{LeadStatus, PaymentMethod, PaymentStatus, ProgramKind},
        registration::ChildInput,
    };
    use mockall::Sequence;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn catalog() -> Arc<ProgramCatalog> {
        let mut catalog = ProgramCatalog::default();
        catalog.insert(
            ProgramBuilder::new(
                ProgramKind::DayCamp,
                PriceBasis::PerSession {
                    rates: RateTable::new(Decimal::from(2000), Decimal::from(3500)),
                },
            )
            .title("Day Camp")
            .build()
            .unwrap(),
        );
        catalog.insert(
            ProgramBuilder::new(
                ProgramKind::HolidayCamp,
                PriceBasis::FlatDaily {
                    daily_rate: Decimal::from(4000),
                },
            )
            .title("Holiday Camp")
            .requires_date_of_birth(true)
            .build()
            .unwrap(),
        );
        catalog.insert(
            ProgramBuilder::new(
                ProgramKind::TeamBuilding,
                PriceBasis::FlatDaily {
                    daily_rate: Decimal::from(1000),
                },
            )
            .enabled(false)
            .build()
            .unwrap(),
        );
        Arc::new(catalog)
    }

    fn child(name: &str, sessions: Vec<SessionKind>) -> ChildInput {
        ChildInput {
            full_name: name.to_string(),
            date_of_birth: None,
            age_bracket: None,
            number_of_days: Some(sessions.len() as u32),
            sessions,
        }
    }

    fn form() -> CreateRegistration {
        CreateRegistration {
            program: ProgramKind::DayCamp,
            parent_name: "Wanjiru Kamau".to_string(),
            email: "wanjiru@example.com".to_string(),
            phone: "+254 712 345 678".to_string(),
            location: Some("Nairobi".to_string()),
            payment_method: PaymentMethod::Mpesa,
            notes: None,
            children: vec![
                child("Amani", vec![SessionKind::Half, SessionKind::Full]),
                child("Zawadi", vec![SessionKind::Full]),
            ],
        }
    }

    fn saved(new: &NewRegistration) -> Registration {
        let now = Utc::now();
        Registration {
            id: Uuid::new_v4(),
            program: new.program,
            parent_name: new.parent_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            location: new.location.clone(),
            children: new.children.clone(),
            payment_status: PaymentStatus::Pending,
            payment_method: new.payment_method,
            total_amount: new.total_amount,
            currency: new.currency.clone(),
            qr_token: None,
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn lead(new: &NewLead) -> Lead {
        let now = Utc::now();
        Lead {
            id: Uuid::new_v4(),
            registration_id: new.registration_id,
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            program: new.program,
            source: new.source.clone(),
            status: LeadStatus::New,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    struct Mocks {
        store: MockRegistrationStore,
        leads: MockLeadSink,
        mailer: MockConfirmationMailer,
        guard: MockSubmissionGuard,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                store: MockRegistrationStore::new(),
                leads: MockLeadSink::new(),
                mailer: MockConfirmationMailer::new(),
                guard: MockSubmissionGuard::new(),
            }
        }

        /// Every downstream call succeeds
        fn happy() -> Self {
            let mut mocks = Self::new();
            mocks.guard.expect_check_and_record().returning(|_| Ok(true));
            mocks.store.expect_create().returning(|new| Ok(saved(new)));
            mocks.store.expect_set_qr_token().returning(|_, _| Ok(()));
            mocks.leads.expect_create().returning(|new| Ok(lead(new)));
            mocks
                .mailer
                .expect_send_confirmation_email()
                .returning(|_, _, _| EmailReceipt::sent());
            mocks
        }

        fn pipeline(self) -> SubmissionPipeline {
            SubmissionPipeline::new(
                Arc::new(self.store),
                Arc::new(self.leads),
                Arc::new(self.mailer),
                Arc::new(self.guard),
                catalog(),
                "KES",
            )
        }
    }

    #[test]
    fn test_stage_transitions() {
        use SubmissionStage::*;
        assert!(Idle.can_transition(Validating));
        assert!(Emailing.can_transition(Complete));
        assert!(Persisting.can_transition(Failed));
        assert!(!Idle.can_transition(Persisting));
        assert!(!Deriving.can_transition(Guarding));
        assert!(!Complete.can_transition(Failed));
        assert_eq!(Complete.next(), None);
    }

    #[test]
    fn test_attempt_rejects_skipped_stage() {
        let mut attempt = Attempt::new();
        assert!(attempt.advance(SubmissionStage::Validating).is_ok());
        assert!(attempt.advance(SubmissionStage::Emailing).is_err());
        assert_eq!(attempt.stage, SubmissionStage::Validating);
    }

    #[tokio::test]
    async fn test_submission_runs_stages_in_order() {
        let mut mocks = Mocks::new();
        let mut seq = Sequence::new();
        mocks
            .guard
            .expect_check_and_record()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        mocks
            .store
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new| Ok(saved(new)));
        mocks
            .store
            .expect_set_qr_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mocks
            .leads
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new| Ok(lead(new)));
        mocks
            .mailer
            .expect_send_confirmation_email()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, program, _| {
                assert_eq!(program, "Day Camp");
                EmailReceipt::sent()
            });

        let outcome = mocks.pipeline().submit_on(form(), today()).await.unwrap();

        assert_eq!(outcome.registration.total_amount, Decimal::from(9000));
        assert_eq!(outcome.registration.children[0].price, Decimal::from(5500));
        assert_eq!(outcome.registration.currency, "KES");
        assert!(outcome.lead_captured);
        assert_eq!(outcome.email, EmailDelivery::Sent);

        let token = outcome.qr_token.unwrap();
        assert_eq!(qr::verify(&token).unwrap(), outcome.registration.id);
        assert_eq!(outcome.registration.qr_token.as_deref(), Some(token.as_str()));
        assert!(outcome.qr_image.unwrap().starts_with("data:image/svg+xml"));
    }

    #[tokio::test]
    async fn test_invalid_form_never_persists() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().never();
        mocks.store.expect_create().never();

        let mut bad = form();
        bad.parent_name = String::new();
        bad.email = "not-an-email".to_string();

        let err = mocks.pipeline().submit_on(bad, today()).await.unwrap_err();
        match err {
            AppError::InvalidFields(fields) => {
                assert!(fields.contains("parent_name"));
                assert!(fields.contains("email"));
            }
            other => panic!("expected InvalidFields, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_required_birth_date_never_persists() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().never();
        mocks.store.expect_create().never();

        let mut holiday = form();
        holiday.program = ProgramKind::HolidayCamp;

        let err = mocks.pipeline().submit_on(holiday, today()).await.unwrap_err();
        match err {
            AppError::InvalidFields(fields) => {
                assert!(fields.contains("children[0].date_of_birth"));
                assert!(fields.contains("children[1].date_of_birth"));
            }
            other => panic!("expected InvalidFields, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_program_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.store.expect_create().never();

        let mut closed = form();
        closed.program = ProgramKind::TeamBuilding;

        let err = mocks.pipeline().submit_on(closed, today()).await.unwrap_err();
        assert!(matches!(err, AppError::ProgramUnavailable(_)));
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_a_conflict() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().times(1).returning(|_| Ok(false));
        mocks.store.expect_create().never();

        let err = mocks.pipeline().submit_on(form(), today()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_persist_failure_releases_fingerprint() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().times(1).returning(|_| Ok(true));
        mocks
            .store
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));
        mocks.guard.expect_release().times(1).returning(|_| Ok(()));
        mocks.store.expect_set_qr_token().never();
        mocks.leads.expect_create().never();
        mocks.mailer.expect_send_confirmation_email().never();

        let err = mocks.pipeline().submit_on(form(), today()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_guard_outage_does_not_block_registration() {
        let mut mocks = Mocks::new();
        mocks
            .guard
            .expect_check_and_record()
            .returning(|_| Err(AppError::Internal("redis down".to_string())));
        mocks.guard.expect_release().never();
        mocks.store.expect_create().returning(|new| Ok(saved(new)));
        mocks.store.expect_set_qr_token().returning(|_, _| Ok(()));
        mocks.leads.expect_create().returning(|new| Ok(lead(new)));
        mocks
            .mailer
            .expect_send_confirmation_email()
            .returning(|_, _, _| EmailReceipt::sent());

        assert!(mocks.pipeline().submit_on(form(), today()).await.is_ok());
    }

    #[tokio::test]
    async fn test_qr_failure_does_not_block() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().returning(|_| Ok(true));
        mocks.store.expect_create().returning(|new| Ok(saved(new)));
        mocks
            .store
            .expect_set_qr_token()
            .returning(|id, _| Err(AppError::NotFound(format!("Registration {} not found", id))));
        mocks.leads.expect_create().times(1).returning(|new| Ok(lead(new)));
        mocks
            .mailer
            .expect_send_confirmation_email()
            .times(1)
            .withf(|_, _, details| details.qr_token.is_none())
            .returning(|_, _, _| EmailReceipt::sent());

        let outcome = mocks.pipeline().submit_on(form(), today()).await.unwrap();
        assert!(outcome.qr_token.is_none());
        assert!(outcome.qr_image.is_none());
        assert!(outcome.registration.qr_token.is_none());
    }

    #[tokio::test]
    async fn test_lead_failure_is_reported_not_raised() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().returning(|_| Ok(true));
        mocks.store.expect_create().returning(|new| Ok(saved(new)));
        mocks.store.expect_set_qr_token().returning(|_, _| Ok(()));
        mocks
            .leads
            .expect_create()
            .returning(|_| Err(AppError::Internal("leads table locked".to_string())));
        mocks
            .mailer
            .expect_send_confirmation_email()
            .times(1)
            .returning(|_, _, _| EmailReceipt::sent());

        let outcome = mocks.pipeline().submit_on(form(), today()).await.unwrap();
        assert!(!outcome.lead_captured);
    }

    #[tokio::test]
    async fn test_email_failure_is_best_effort() {
        let mut mocks = Mocks::new();
        mocks.guard.expect_check_and_record().returning(|_| Ok(true));
        mocks.guard.expect_release().never();
        mocks.store.expect_create().returning(|new| Ok(saved(new)));
        mocks.store.expect_set_qr_token().returning(|_, _| Ok(()));
        mocks.leads.expect_create().returning(|new| Ok(lead(new)));
        mocks
            .mailer
            .expect_send_confirmation_email()
            .returning(|_, _, _| EmailReceipt::failed("SMTP timeout"));

        let outcome = mocks.pipeline().submit_on(form(), today()).await.unwrap();
        assert_eq!(
            outcome.email,
            EmailDelivery::Failed {
                reason: "SMTP timeout".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_client_prices_are_ignored() {
        let mocks = Mocks::happy();

        let mut flat = form();
        flat.program = ProgramKind::HolidayCamp;
        for c in &mut flat.children {
            c.date_of_birth = NaiveDate::from_ymd_opt(2017, 6, 15);
        }

        let outcome = mocks.pipeline().submit_on(flat, today()).await.unwrap();
        let children = &outcome.registration.children;
        // Flat daily pricing: 2 days + 1 day at 4000
        assert_eq!(outcome.registration.total_amount, Decimal::from(12000));
        assert!(children.iter().all(|c| c.sessions.is_empty()));
        assert_eq!(children[0].age_bracket.map(|b| b.label()), Some("7-10"));
    }

    #[test]
    fn test_email_delivery_from_receipt() {
        assert_eq!(EmailDelivery::from(EmailReceipt::sent()), EmailDelivery::Sent);
        assert_eq!(
            EmailDelivery::from(EmailReceipt {
                success: false,
                error: None
            }),
            EmailDelivery::Failed {
                reason: "unknown error".to_string()
            }
        );
    }
}
