//! Lead CRM endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        lead::{Lead, LeadQuery, UpdateLead},
        user::Portal,
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List leads
#[utoipa::path(
    get,
    path = "/admin/leads",
    tag = "leads",
    security(("bearer_auth" = [])),
    params(LeadQuery),
    responses(
        (status = 200, description = "Leads", body = PaginatedResponse<Lead>),
        (status = 403, description = "Admin portal required")
    )
)]
pub async fn list_leads(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LeadQuery>,
) -> AppResult<Json<PaginatedResponse<Lead>>> {
    claims.require_portal(Portal::Admin)?;

    let (items, total) = state.services.leads.list(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Update a lead's status or notes
#[utoipa::path(
    put,
    path = "/admin/leads/{id}",
    tag = "leads",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Lead ID")),
    request_body = UpdateLead,
    responses(
        (status = 200, description = "Lead updated", body = Lead),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn update_lead(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateLead>,
) -> AppResult<Json<Lead>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(state.services.leads.update(id, data).await?))
}
