//! Program listing, quotes, public registration and admin registration
//! management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    booking::{FormQuote, ProgramDefinition},
    error::AppResult,
    models::{
        registration::{
            CreateRegistration, QuoteRequest, Registration, RegistrationQuery, UpdateRegistration,
        },
        user::Portal,
    },
    services::registrations::SubmissionOutcome,
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Programs open for registration
#[utoipa::path(
    get,
    path = "/programs",
    tag = "registrations",
    responses(
        (status = 200, description = "Open programs", body = Vec<ProgramDefinition>)
    )
)]
pub async fn list_programs(State(state): State<AppState>) -> Json<Vec<ProgramDefinition>> {
    Json(state.services.registrations.programs())
}

/// Price a draft registration without saving it
#[utoipa::path(
    post,
    path = "/registrations/quote",
    tag = "registrations",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Per-child breakdown and total", body = FormQuote),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse),
        (status = 422, description = "Program closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> AppResult<Json<FormQuote>> {
    let quote = state.services.registrations.quote(&request)?;
    Ok(Json(quote))
}

/// Submit a registration
#[utoipa::path(
    post,
    path = "/registrations",
    tag = "registrations",
    request_body = CreateRegistration,
    responses(
        (status = 201, description = "Registration created", body = SubmissionOutcome),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate submission", body = crate::error::ErrorResponse),
        (status = 422, description = "Program closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_registration(
    State(state): State<AppState>,
    Json(form): Json<CreateRegistration>,
) -> AppResult<(StatusCode, Json<SubmissionOutcome>)> {
    let outcome = state.services.registrations.submit(form).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// List registrations
#[utoipa::path(
    get,
    path = "/admin/registrations",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Registrations", body = PaginatedResponse<Registration>),
        (status = 403, description = "Admin portal required")
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RegistrationQuery>,
) -> AppResult<Json<PaginatedResponse<Registration>>> {
    claims.require_portal(Portal::Admin)?;

    let (items, total) = state.services.registrations.list(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get a registration by ID
#[utoipa::path(
    get,
    path = "/admin/registrations/{id}",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration", body = Registration),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn get_registration(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Registration>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(state.services.registrations.get(id).await?))
}

/// Update payment status, method or notes
#[utoipa::path(
    put,
    path = "/admin/registrations/{id}",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = UpdateRegistration,
    responses(
        (status = 200, description = "Registration updated", body = Registration),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn update_registration(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRegistration>,
) -> AppResult<Json<Registration>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(state.services.registrations.update(id, data).await?))
}

/// Look up a registration from its scanned QR token
#[utoipa::path(
    get,
    path = "/admin/check-in/{token}",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("token" = String, Path, description = "QR token")),
    responses(
        (status = 200, description = "Registration", body = Registration),
        (status = 400, description = "Malformed token"),
        (status = 404, description = "Unknown token")
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(token): Path<String>,
) -> AppResult<Json<Registration>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(state.services.registrations.check_in(&token).await?))
}
