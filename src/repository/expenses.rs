//! Expenses repository

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ExpenseStatus,
        finance::{CreateExpense, Expense, ExpenseQuery, Page, UpdateExpense},
    },
};

#[derive(Clone)]
pub struct ExpensesRepository {
    pool: Pool<Postgres>,
}

impl ExpensesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ExpenseQuery) -> AppResult<(Vec<Expense>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let filter = "WHERE ($1::text IS NULL OR status = $1) AND ($2::text IS NULL OR category = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM expenses {}", filter))
            .bind(query.status)
            .bind(&query.category)
            .fetch_one(&self.pool)
            .await?;

        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT * FROM expenses {} ORDER BY expense_date DESC, created_at DESC LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(query.status)
        .bind(&query.category)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((expenses, total))
    }

    /// Expenses dated `from <= expense_date < until`, excluding rejected ones
    pub async fn between(&self, from: NaiveDate, until: NaiveDate) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT * FROM expenses
            WHERE expense_date >= $1 AND expense_date < $2 AND status <> 'rejected'
            ORDER BY expense_date DESC
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    pub async fn recent(&self, limit: i64) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT * FROM expenses
            WHERE status <> 'rejected'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Expense {} not found", id)))
    }

    pub async fn create(&self, data: &CreateExpense) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                description, category, amount, status, budget_id, vendor_id, expense_date, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.description)
        .bind(&data.category)
        .bind(data.amount)
        .bind(data.status.unwrap_or(ExpenseStatus::Pending))
        .bind(data.budget_id)
        .bind(data.vendor_id)
        .bind(data.expense_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateExpense) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses SET
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                amount = COALESCE($4, amount),
                status = COALESCE($5, status),
                budget_id = COALESCE($6, budget_id),
                expense_date = COALESCE($7, expense_date),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.description)
        .bind(&data.category)
        .bind(data.amount)
        .bind(data.status)
        .bind(data.budget_id)
        .bind(data.expense_date)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }
}
