//! Lead CRM

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::lead::{Lead, LeadQuery, UpdateLead},
    repository::Repository,
};

#[derive(Clone)]
pub struct LeadsService {
    repository: Repository,
}

impl LeadsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &LeadQuery) -> AppResult<(Vec<Lead>, i64)> {
        self.repository.leads.list(query).await
    }

    pub async fn update(&self, id: Uuid, data: UpdateLead) -> AppResult<Lead> {
        self.repository.leads.update(id, &data).await
    }
}
