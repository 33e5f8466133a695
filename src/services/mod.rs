//! Business logic services

pub mod auth;
pub mod dashboard;
pub mod email;
pub mod faq;
pub mod finance;
pub mod leads;
pub mod qr;
pub mod redis;
pub mod registrations;
pub mod vendors;

use std::sync::Arc;

use crate::{
    booking::ProgramCatalog, config::AppConfig, error::AppResult, repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub registrations: registrations::RegistrationsService,
    pub dashboard: dashboard::DashboardService,
    pub finance: finance::FinanceService,
    pub vendors: vendors::VendorsService,
    pub leads: leads::LeadsService,
    pub faq: faq::FaqService,
    pub redis: redis::RedisService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(
        repository: Repository,
        config: &AppConfig,
        redis_service: redis::RedisService,
    ) -> AppResult<Self> {
        let catalog = Arc::new(ProgramCatalog::from_config(&config.registration)?);
        tracing::info!(
            programs = catalog.enabled().len(),
            "Program catalog loaded"
        );

        let email = email::EmailService::new(config.email.clone());
        let pipeline = registrations::SubmissionPipeline::new(
            Arc::new(repository.registrations.clone()),
            Arc::new(repository.leads.clone()),
            Arc::new(email),
            Arc::new(redis_service.clone()),
            catalog,
            config.registration.currency.clone(),
        );

        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            registrations: registrations::RegistrationsService::new(repository.clone(), pipeline),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            finance: finance::FinanceService::new(repository.clone()),
            vendors: vendors::VendorsService::new(repository.clone()),
            leads: leads::LeadsService::new(repository.clone()),
            faq: faq::FaqService::new(&config.faq),
            redis: redis_service,
            repository,
        })
    }
}
