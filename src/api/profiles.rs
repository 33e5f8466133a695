//! Staff profile administration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{CreateProfile, Portal, Profile, UpdateProfileAccess},
    AppState,
};

use super::AuthenticatedUser;

/// List staff profiles
#[utoipa::path(
    get,
    path = "/admin/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profiles", body = Vec<Profile>),
        (status = 403, description = "Admin portal required")
    )
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Profile>>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(state.services.auth.list_profiles().await?))
}

/// Create a staff profile
#[utoipa::path(
    post,
    path = "/admin/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    request_body = CreateProfile,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Login already exists")
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateProfile>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    claims.require_portal(Portal::Admin)?;

    let created = state.services.auth.create_profile(data).await?;
    tracing::info!(profile_id = %created.id, by = %claims.profile_id, "Profile created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change a profile's role or active flag
#[utoipa::path(
    put,
    path = "/admin/profiles/{id}/access",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdateProfileAccess,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 404, description = "Profile not found"),
        (status = 422, description = "Would remove the caller's own admin access")
    )
)]
pub async fn update_access(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateProfileAccess>,
) -> AppResult<Json<Profile>> {
    claims.require_portal(Portal::Admin)?;
    Ok(Json(
        state
            .services
            .auth
            .update_access(claims.profile_id, id, data)
            .await?,
    ))
}
