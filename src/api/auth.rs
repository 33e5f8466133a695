//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{Portal, Profile},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User login
    pub login: String,
    /// User password
    pub password: String,
}

/// Login response with JWT token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration in seconds
    pub expires_in: u64,
    pub profile: ProfileInfo,
    /// Portal to open after signing in; none for roles without one
    pub portal: Option<Portal>,
}

/// Signed-in profile summary
#[derive(Serialize, ToSchema)]
pub struct ProfileInfo {
    pub id: Uuid,
    pub login: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub portals: Vec<Portal>,
}

impl From<Profile> for ProfileInfo {
    fn from(profile: Profile) -> Self {
        Self {
            portals: profile.role.portals().to_vec(),
            id: profile.id,
            login: profile.login,
            display_name: profile.display_name,
            email: profile.email,
            role: profile.role,
        }
    }
}

/// Where the caller should land
#[derive(Serialize, ToSchema)]
pub struct PortalResponse {
    pub portal: Portal,
    /// Client route of the portal
    pub path: String,
    pub available: Vec<Portal>,
}

/// Authenticate staff and return JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let signed_in = state
        .services
        .auth
        .login(&request.login, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: signed_in.token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.jwt_expiration_hours * 3600,
        profile: signed_in.profile.into(),
        portal: signed_in.portal,
    }))
}

/// Get current profile information
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = ProfileInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ProfileInfo>> {
    let profile = state.services.auth.get_profile(claims.profile_id).await?;
    Ok(Json(profile.into()))
}

/// Resolve the caller's landing portal
#[utoipa::path(
    get,
    path = "/portal",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Landing portal", body = PortalResponse),
        (status = 403, description = "Role has no portal")
    )
)]
pub async fn portal(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<PortalResponse>> {
    let portal = claims.role.landing_portal().ok_or_else(|| {
        AppError::Authorization(format!("Role {} has no portal access", claims.role))
    })?;

    Ok(Json(PortalResponse {
        portal,
        path: portal.path().to_string(),
        available: claims.role.portals().to_vec(),
    }))
}
