//! Budgets repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::finance::{Budget, BudgetQuery, CreateBudget, Page, UpdateBudget},
};

#[derive(Clone)]
pub struct BudgetsRepository {
    pool: Pool<Postgres>,
}

impl BudgetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &BudgetQuery) -> AppResult<(Vec<Budget>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM budgets WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT * FROM budgets
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY period_start DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((budgets, total))
    }

    pub async fn active(&self) -> AppResult<Vec<Budget>> {
        let budgets = sqlx::query_as::<_, Budget>(
            "SELECT * FROM budgets WHERE status = 'active' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(budgets)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Budget> {
        sqlx::query_as::<_, Budget>("SELECT * FROM budgets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Budget {} not found", id)))
    }

    pub async fn create(&self, data: &CreateBudget) -> AppResult<Budget> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (
                name, category, allocated_amount, spent_amount, period_start, period_end, status
            ) VALUES ($1, $2, $3, 0, $4, $5, 'active')
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.allocated_amount)
        .bind(data.period_start)
        .bind(data.period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(budget)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateBudget) -> AppResult<Budget> {
        sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets SET
                name = COALESCE($2, name),
                allocated_amount = COALESCE($3, allocated_amount),
                spent_amount = COALESCE($4, spent_amount),
                period_end = COALESCE($5, period_end),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.allocated_amount)
        .bind(data.spent_amount)
        .bind(data.period_end)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Budget {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Budget {} not found", id)));
        }
        Ok(())
    }
}
