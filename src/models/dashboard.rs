//! Accounts dashboard projection

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Where a recent transaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    Payment,
    Expense,
    Invoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecentTransaction {
    pub id: Uuid,
    pub source: TransactionSource,
    pub description: String,
    /// Positive for money in, negative for money out
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BudgetUtilization {
    pub budget_id: Uuid,
    pub name: String,
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
    /// `spent / allocated × 100`, capped at 100 for display
    pub utilization_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccountsDashboard {
    pub total_revenue: Decimal,
    pub revenue_this_month: Decimal,
    pub revenue_last_month: Decimal,
    /// Month-over-month change, one decimal place; 0 when last month is empty
    pub revenue_change_pct: Decimal,
    pub outstanding_invoice_count: i64,
    pub outstanding_invoice_amount: Decimal,
    pub monthly_expenses: Decimal,
    pub expenses_last_month: Decimal,
    pub expense_change_pct: Decimal,
    pub pending_collections_amount: Decimal,
    pub recent_transactions: Vec<RecentTransaction>,
    pub budgets: Vec<BudgetUtilization>,
}
