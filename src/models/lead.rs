//! Marketing lead model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{
    enums::{LeadStatus, ProgramKind},
    registration::Registration,
};

/// Lead captured for CRM follow-up
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    /// Registration the lead came from, if any
    pub registration_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub program: Option<ProgramKind>,
    /// Where the lead came from (`registration`, `contact_form`, ...)
    pub source: String,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub registration_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub program: Option<ProgramKind>,
    pub source: String,
}

impl NewLead {
    pub fn from_registration(registration: &Registration) -> Self {
        Self {
            registration_id: Some(registration.id),
            name: registration.parent_name.clone(),
            email: registration.email.clone(),
            phone: Some(registration.phone.clone()),
            program: Some(registration.program),
            source: "registration".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    pub program: Option<ProgramKind>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLead {
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}
