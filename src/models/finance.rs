//! Accounting models: invoices, payments, expenses, budgets and pending
//! collections

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::enums::{
    BudgetStatus, CollectionStatus, ExpenseStatus, InvoiceStatus, PaymentMethod, TransactionStatus,
};

/// Amounts must be strictly positive
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive");
        err.message = Some("Amount must be greater than zero".into());
        Err(err)
    }
}

pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount cannot be negative".into());
        Err(err)
    }
}

/// Page/per-page pair shared by list endpoints
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Highest page number served; later pages come back empty
const MAX_PAGE: i64 = 1_000_000;

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = per_page.unwrap_or(50).clamp(1, 200);
        Self {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub registration_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Amount still owed on the invoice
    pub fn balance(&self) -> Decimal {
        (self.total_amount - self.amount_paid).max(Decimal::ZERO)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInvoice {
    #[validate(length(min = 1, max = 40, message = "Invoice number is required"))]
    pub invoice_number: String,
    #[validate(length(min = 1, max = 120, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    pub registration_id: Option<Uuid>,
    #[validate(custom(function = "positive_amount"))]
    pub total_amount: Decimal,
    pub status: Option<InvoiceStatus>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoice {
    pub customer_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub total_amount: Option<Decimal>,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount_paid: Option<Decimal>,
    pub status: Option<InvoiceStatus>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct InvoiceQuery {
    pub status: Option<InvoiceStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    /// Invoice settled by this payment, if any
    pub invoice_id: Option<Uuid>,
    pub registration_id: Option<Uuid>,
    pub payer_name: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// External reference (M-Pesa code, card receipt, ...)
    pub reference: Option<String>,
    pub status: TransactionStatus,
    pub paid_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePayment {
    pub invoice_id: Option<Uuid>,
    pub registration_id: Option<Uuid>,
    #[validate(length(min = 1, max = 120, message = "Payer name is required"))]
    pub payer_name: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub status: Option<TransactionStatus>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePayment {
    pub invoice_id: Option<Uuid>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub reference: Option<String>,
    pub status: Option<TransactionStatus>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PaymentQuery {
    pub status: Option<TransactionStatus>,
    pub invoice_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub status: ExpenseStatus,
    pub budget_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpense {
    #[validate(length(min = 1, max = 200, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 60, message = "Category is required"))]
    pub category: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub status: Option<ExpenseStatus>,
    pub budget_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub expense_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExpense {
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,
    pub status: Option<ExpenseStatus>,
    pub budget_id: Option<Uuid>,
    pub expense_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ExpenseQuery {
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_budget_period"))]
pub struct CreateBudget {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 60, message = "Category is required"))]
    pub category: String,
    #[validate(custom(function = "positive_amount"))]
    pub allocated_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

fn validate_budget_period(budget: &CreateBudget) -> Result<(), ValidationError> {
    if budget.period_end >= budget.period_start {
        Ok(())
    } else {
        let mut err = ValidationError::new("period");
        err.message = Some("Budget period must end after it starts".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBudget {
    pub name: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub allocated_amount: Option<Decimal>,
    #[validate(custom(function = "non_negative_amount"))]
    pub spent_amount: Option<Decimal>,
    pub period_end: Option<NaiveDate>,
    pub status: Option<BudgetStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BudgetQuery {
    pub status: Option<BudgetStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Pending collections
// ---------------------------------------------------------------------------

/// Unpaid balance awaiting invoicing or payment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingCollection {
    pub id: Uuid,
    pub registration_id: Option<Uuid>,
    pub payer_name: String,
    pub description: String,
    pub amount_due: Decimal,
    pub amount_paid: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: CollectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingCollection {
    pub fn outstanding(&self) -> Decimal {
        (self.amount_due - self.amount_paid).max(Decimal::ZERO)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCollection {
    pub registration_id: Option<Uuid>,
    #[validate(length(min = 1, max = 120, message = "Payer name is required"))]
    pub payer_name: String,
    #[validate(length(min = 1, max = 200, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount_due: Decimal,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCollection {
    pub description: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub amount_due: Option<Decimal>,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount_paid: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<CollectionStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CollectionQuery {
    pub status: Option<CollectionStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        let page = Page::new(None, None);
        assert_eq!((page.limit, page.offset), (50, 0));

        let page = Page::new(Some(3), Some(20));
        assert_eq!((page.limit, page.offset), (20, 40));

        let page = Page::new(Some(0), Some(10_000));
        assert_eq!((page.limit, page.offset), (200, 0));

        let page = Page::new(Some(i64::MAX), Some(200));
        assert_eq!(page.limit, 200);
        assert_eq!(page.offset, (MAX_PAGE - 1) * 200);

        let page = Page::new(Some(i64::MIN), Some(i64::MIN));
        assert_eq!((page.limit, page.offset), (1, 0));
    }

    #[test]
    fn test_budget_period_must_not_run_backwards() {
        let budget = CreateBudget {
            name: "Camp food".to_string(),
            category: "catering".to_string(),
            allocated_amount: Decimal::from(50_000),
            period_start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        };
        assert!(budget.validate().is_err());
    }

    #[test]
    fn test_amount_validators() {
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(positive_amount(&Decimal::ONE).is_ok());
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());
        assert!(non_negative_amount(&Decimal::NEGATIVE_ONE).is_err());
    }
}
