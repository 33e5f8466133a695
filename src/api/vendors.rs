//! Vendors portal: suppliers and their bills

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        user::Portal,
        vendor::{
            Bill, BillQuery, CreateBill, CreateVendor, UpdateBill, UpdateVendor, Vendor,
            VendorQuery,
        },
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List vendors
#[utoipa::path(
    get,
    path = "/vendors",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(VendorQuery),
    responses(
        (status = 200, description = "Vendors", body = PaginatedResponse<Vendor>),
        (status = 403, description = "Vendors portal required")
    )
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<VendorQuery>,
) -> AppResult<Json<PaginatedResponse<Vendor>>> {
    claims.require_portal(Portal::Vendors)?;

    let (items, total) = state.services.vendors.list_vendors(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get vendor by ID
#[utoipa::path(
    get,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor", body = Vendor),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vendor>> {
    claims.require_portal(Portal::Vendors)?;
    Ok(Json(state.services.vendors.get_vendor(id).await?))
}

/// Create vendor
#[utoipa::path(
    post,
    path = "/vendors",
    tag = "vendors",
    security(("bearer_auth" = [])),
    request_body = CreateVendor,
    responses(
        (status = 201, description = "Vendor created", body = Vendor),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateVendor>,
) -> AppResult<(StatusCode, Json<Vendor>)> {
    claims.require_portal(Portal::Vendors)?;

    let created = state.services.vendors.create_vendor(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update vendor
#[utoipa::path(
    put,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = UpdateVendor,
    responses(
        (status = 200, description = "Vendor updated", body = Vendor),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateVendor>,
) -> AppResult<Json<Vendor>> {
    claims.require_portal(Portal::Vendors)?;
    Ok(Json(state.services.vendors.update_vendor(id, data).await?))
}

/// Delete vendor
#[utoipa::path(
    delete,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found"),
        (status = 422, description = "Vendor still has bills")
    )
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Vendors)?;

    state.services.vendors.delete_vendor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List bills
#[utoipa::path(
    get,
    path = "/vendors/bills",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(BillQuery),
    responses(
        (status = 200, description = "Bills", body = PaginatedResponse<Bill>),
        (status = 403, description = "Vendors portal required")
    )
)]
pub async fn list_bills(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BillQuery>,
) -> AppResult<Json<PaginatedResponse<Bill>>> {
    claims.require_portal(Portal::Vendors)?;

    let (items, total) = state.services.vendors.list_bills(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get bill by ID
#[utoipa::path(
    get,
    path = "/vendors/bills/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill", body = Bill),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn get_bill(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Bill>> {
    claims.require_portal(Portal::Vendors)?;
    Ok(Json(state.services.vendors.get_bill(id).await?))
}

/// Create bill
#[utoipa::path(
    post,
    path = "/vendors/bills",
    tag = "vendors",
    security(("bearer_auth" = [])),
    request_body = CreateBill,
    responses(
        (status = 201, description = "Bill created", body = Bill),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Vendor not found"),
        (status = 409, description = "Bill number already used for this vendor")
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBill>,
) -> AppResult<(StatusCode, Json<Bill>)> {
    claims.require_portal(Portal::Vendors)?;

    let created = state.services.vendors.create_bill(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update bill; marking it paid stamps `paid_at`
#[utoipa::path(
    put,
    path = "/vendors/bills/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    request_body = UpdateBill,
    responses(
        (status = 200, description = "Bill updated", body = Bill),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn update_bill(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateBill>,
) -> AppResult<Json<Bill>> {
    claims.require_portal(Portal::Vendors)?;
    Ok(Json(state.services.vendors.update_bill(id, data).await?))
}

/// Delete bill
#[utoipa::path(
    delete,
    path = "/vendors/bills/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 204, description = "Bill deleted"),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn delete_bill(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Vendors)?;

    state.services.vendors.delete_bill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
