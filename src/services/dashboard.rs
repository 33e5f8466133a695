//! Accounts dashboard aggregation
//!
//! All reads are issued concurrently, then the projection is computed in
//! memory. Nothing here is persisted.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::AppResult,
    models::{
        dashboard::{AccountsDashboard, BudgetUtilization, RecentTransaction, TransactionSource},
        finance::{Budget, Expense, Invoice, Payment, PendingCollection},
    },
    repository::Repository,
};

const RECENT_LIMIT: usize = 5;

/// Month-over-month change in percent, one decimal place, 0 when the
/// previous value is 0
pub fn change_pct(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// `spent / allocated × 100` capped to `0..=100`
pub fn utilization_pct(spent: Decimal, allocated: Decimal) -> Decimal {
    if allocated <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (spent / allocated * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// First day of this month, of next month and of last month
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate, NaiveDate) {
    let this_month = today - Duration::days(today.day0() as i64);
    let next_month = {
        let later = this_month + Duration::days(32);
        later - Duration::days(later.day0() as i64)
    };
    let last_month = {
        let earlier = this_month - Duration::days(1);
        earlier - Duration::days(earlier.day0() as i64)
    };
    (this_month, next_month, last_month)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Raw reads the dashboard is computed from
#[derive(Debug, Default)]
pub struct DashboardInputs {
    pub invoices: Vec<Invoice>,
    pub completed_payments: Vec<Payment>,
    pub payments_this_month: Vec<Payment>,
    pub payments_last_month: Vec<Payment>,
    pub expenses_this_month: Vec<Expense>,
    pub expenses_last_month: Vec<Expense>,
    pub recent_expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub collections: Vec<PendingCollection>,
}

fn sum_payments(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}

fn sum_spend(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.status.counts_as_spend())
        .map(|e| e.amount)
        .sum()
}

/// Merge payments, expenses and invoices into one feed, newest first
pub fn recent_transactions(
    payments: &[Payment],
    expenses: &[Expense],
    invoices: &[Invoice],
    limit: usize,
) -> Vec<RecentTransaction> {
    let payments = payments.iter().map(|p| RecentTransaction {
        id: p.id,
        source: TransactionSource::Payment,
        description: format!("Payment from {}", p.payer_name),
        amount: p.amount,
        occurred_at: p.paid_at,
    });
    let expenses = expenses.iter().map(|e| RecentTransaction {
        id: e.id,
        source: TransactionSource::Expense,
        description: e.description.clone(),
        amount: -e.amount,
        occurred_at: e.created_at,
    });
    let invoices = invoices.iter().map(|i| RecentTransaction {
        id: i.id,
        source: TransactionSource::Invoice,
        description: format!("Invoice {} to {}", i.invoice_number, i.customer_name),
        amount: i.total_amount,
        occurred_at: i.created_at,
    });

    let mut feed: Vec<RecentTransaction> = payments.chain(expenses).chain(invoices).collect();
    feed.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed.truncate(limit);
    feed
}

pub fn build(inputs: &DashboardInputs) -> AccountsDashboard {
    let revenue_this_month = sum_payments(&inputs.payments_this_month);
    let revenue_last_month = sum_payments(&inputs.payments_last_month);
    let monthly_expenses = sum_spend(&inputs.expenses_this_month);
    let expenses_last_month = sum_spend(&inputs.expenses_last_month);

    let outstanding: Vec<&Invoice> = inputs
        .invoices
        .iter()
        .filter(|i| i.status.is_outstanding())
        .collect();

    AccountsDashboard {
        total_revenue: sum_payments(&inputs.completed_payments),
        revenue_this_month,
        revenue_last_month,
        revenue_change_pct: change_pct(revenue_this_month, revenue_last_month),
        outstanding_invoice_count: outstanding.len() as i64,
        outstanding_invoice_amount: outstanding.iter().map(|i| i.balance()).sum(),
        monthly_expenses,
        expenses_last_month,
        expense_change_pct: change_pct(monthly_expenses, expenses_last_month),
        pending_collections_amount: inputs.collections.iter().map(|c| c.outstanding()).sum(),
        recent_transactions: recent_transactions(
            &inputs.completed_payments,
            &inputs.recent_expenses,
            &inputs.invoices,
            RECENT_LIMIT,
        ),
        budgets: inputs
            .budgets
            .iter()
            .map(|b| BudgetUtilization {
                budget_id: b.id,
                name: b.name.clone(),
                allocated_amount: b.allocated_amount,
                spent_amount: b.spent_amount,
                utilization_pct: utilization_pct(b.spent_amount, b.allocated_amount),
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn accounts(&self) -> AppResult<AccountsDashboard> {
        self.accounts_on(Utc::now().date_naive()).await
    }

    pub async fn accounts_on(&self, today: NaiveDate) -> AppResult<AccountsDashboard> {
        let (this_month, next_month, last_month) = month_bounds(today);
        let repo = &self.repository;

        let (
            invoices,
            completed_payments,
            payments_this_month,
            payments_last_month,
            expenses_this_month,
            expenses_last_month,
            recent_expenses,
            budgets,
            collections,
        ) = tokio::try_join!(
            repo.invoices.all_active(),
            repo.payments.completed(),
            repo.payments.completed_between(midnight(this_month), midnight(next_month)),
            repo.payments.completed_between(midnight(last_month), midnight(this_month)),
            repo.expenses.between(this_month, next_month),
            repo.expenses.between(last_month, this_month),
            repo.expenses.recent(RECENT_LIMIT as i64),
            repo.budgets.active(),
            repo.collections.open(),
        )?;

        let dashboard = build(&DashboardInputs {
            invoices,
            completed_payments,
            payments_this_month,
            payments_last_month,
            expenses_this_month,
            expenses_last_month,
            recent_expenses,
            budgets,
            collections,
        });
        tracing::debug!(
            revenue = %dashboard.total_revenue,
            outstanding = dashboard.outstanding_invoice_count,
            "Accounts dashboard computed"
        );
        Ok(dashboard)
    }
}
