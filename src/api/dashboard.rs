//! Accounts dashboard endpoint

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{dashboard::AccountsDashboard, user::Portal},
    AppState,
};

use super::AuthenticatedUser;

/// Revenue, expenses, outstanding invoices, collections and budgets
#[utoipa::path(
    get,
    path = "/accounts/dashboard",
    tag = "accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard figures", body = AccountsDashboard),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AccountsDashboard>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.dashboard.accounts().await?))
}
