//! Accounts portal: invoices, payments, expenses, budgets and collections

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        finance::{
            Budget, BudgetQuery, CollectionQuery, CreateBudget, CreateCollection, CreateExpense,
            CreateInvoice, CreatePayment, Expense, ExpenseQuery, Invoice, InvoiceQuery, Payment,
            PaymentQuery, PendingCollection, UpdateBudget, UpdateCollection, UpdateExpense,
            UpdateInvoice, UpdatePayment,
        },
        user::Portal,
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

/// List invoices
#[utoipa::path(
    get,
    path = "/accounts/invoices",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Invoices", body = PaginatedResponse<Invoice>),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<PaginatedResponse<Invoice>>> {
    claims.require_portal(Portal::Accounts)?;

    let (items, total) = state.services.finance.list_invoices(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get invoice by ID
#[utoipa::path(
    get,
    path = "/accounts/invoices/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Invoice>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.get_invoice(id).await?))
}

/// Create invoice
#[utoipa::path(
    post,
    path = "/accounts/invoices",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateInvoice,
    responses(
        (status = 201, description = "Invoice created", body = Invoice),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Invoice number already exists")
    )
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    claims.require_portal(Portal::Accounts)?;

    let created = state.services.finance.create_invoice(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update invoice
#[utoipa::path(
    put,
    path = "/accounts/invoices/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoice,
    responses(
        (status = 200, description = "Invoice updated", body = Invoice),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateInvoice>,
) -> AppResult<Json<Invoice>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.update_invoice(id, data).await?))
}

/// Delete invoice
#[utoipa::path(
    delete,
    path = "/accounts/invoices/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Accounts)?;

    state.services.finance.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// List payments
#[utoipa::path(
    get,
    path = "/accounts/payments",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(PaymentQuery),
    responses(
        (status = 200, description = "Payments", body = PaginatedResponse<Payment>),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<PaginatedResponse<Payment>>> {
    claims.require_portal(Portal::Accounts)?;

    let (items, total) = state.services.finance.list_payments(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get payment by ID
#[utoipa::path(
    get,
    path = "/accounts/payments/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.get_payment(id).await?))
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/accounts/payments",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreatePayment,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Referenced invoice not found")
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    claims.require_portal(Portal::Accounts)?;

    let created = state.services.finance.create_payment(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update payment
#[utoipa::path(
    put,
    path = "/accounts/payments/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePayment,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn update_payment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePayment>,
) -> AppResult<Json<Payment>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.update_payment(id, data).await?))
}

/// Delete payment
#[utoipa::path(
    delete,
    path = "/accounts/payments/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Accounts)?;

    state.services.finance.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// List expenses
#[utoipa::path(
    get,
    path = "/accounts/expenses",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Expenses", body = PaginatedResponse<Expense>),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ExpenseQuery>,
) -> AppResult<Json<PaginatedResponse<Expense>>> {
    claims.require_portal(Portal::Accounts)?;

    let (items, total) = state.services.finance.list_expenses(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get expense by ID
#[utoipa::path(
    get,
    path = "/accounts/expenses/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense", body = Expense),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.get_expense(id).await?))
}

/// Create expense
#[utoipa::path(
    post,
    path = "/accounts/expenses",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateExpense,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    claims.require_portal(Portal::Accounts)?;

    let created = state.services.finance.create_expense(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update expense
#[utoipa::path(
    put,
    path = "/accounts/expenses/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    request_body = UpdateExpense,
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.update_expense(id, data).await?))
}

/// Delete expense
#[utoipa::path(
    delete,
    path = "/accounts/expenses/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Accounts)?;

    state.services.finance.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

/// List budgets
#[utoipa::path(
    get,
    path = "/accounts/budgets",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(BudgetQuery),
    responses(
        (status = 200, description = "Budgets", body = PaginatedResponse<Budget>),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn list_budgets(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BudgetQuery>,
) -> AppResult<Json<PaginatedResponse<Budget>>> {
    claims.require_portal(Portal::Accounts)?;

    let (items, total) = state.services.finance.list_budgets(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get budget by ID
#[utoipa::path(
    get,
    path = "/accounts/budgets/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Budget", body = Budget),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn get_budget(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Budget>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.get_budget(id).await?))
}

/// Create budget
#[utoipa::path(
    post,
    path = "/accounts/budgets",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateBudget,
    responses(
        (status = 201, description = "Budget created", body = Budget),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_budget(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBudget>,
) -> AppResult<(StatusCode, Json<Budget>)> {
    claims.require_portal(Portal::Accounts)?;

    let created = state.services.finance.create_budget(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update budget allocation, spend or status
#[utoipa::path(
    put,
    path = "/accounts/budgets/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Budget ID")),
    request_body = UpdateBudget,
    responses(
        (status = 200, description = "Budget updated", body = Budget),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn update_budget(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateBudget>,
) -> AppResult<Json<Budget>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.update_budget(id, data).await?))
}

/// Delete budget
#[utoipa::path(
    delete,
    path = "/accounts/budgets/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Budget ID")),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn delete_budget(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Accounts)?;

    state.services.finance.delete_budget(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Pending collections
// ---------------------------------------------------------------------------

/// List pending collections
#[utoipa::path(
    get,
    path = "/accounts/collections",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(CollectionQuery),
    responses(
        (status = 200, description = "Collections", body = PaginatedResponse<PendingCollection>),
        (status = 403, description = "Accounts portal required")
    )
)]
pub async fn list_collections(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CollectionQuery>,
) -> AppResult<Json<PaginatedResponse<PendingCollection>>> {
    claims.require_portal(Portal::Accounts)?;

    let (items, total) = state.services.finance.list_collections(&query).await?;
    Ok(Json(PaginatedResponse::new(items, total, query.page, query.per_page)))
}

/// Get collection by ID
#[utoipa::path(
    get,
    path = "/accounts/collections/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection", body = PendingCollection),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn get_collection(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PendingCollection>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.get_collection(id).await?))
}

/// Create collection
#[utoipa::path(
    post,
    path = "/accounts/collections",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateCollection,
    responses(
        (status = 201, description = "Collection created", body = PendingCollection),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_collection(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCollection>,
) -> AppResult<(StatusCode, Json<PendingCollection>)> {
    claims.require_portal(Portal::Accounts)?;

    let created = state.services.finance.create_collection(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update collection
#[utoipa::path(
    put,
    path = "/accounts/collections/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    request_body = UpdateCollection,
    responses(
        (status = 200, description = "Collection updated", body = PendingCollection),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn update_collection(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateCollection>,
) -> AppResult<Json<PendingCollection>> {
    claims.require_portal(Portal::Accounts)?;
    Ok(Json(state.services.finance.update_collection(id, data).await?))
}

/// Delete collection
#[utoipa::path(
    delete,
    path = "/accounts/collections/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_portal(Portal::Accounts)?;

    state.services.finance.delete_collection(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
