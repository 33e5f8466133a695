//! Vendor bills repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        finance::Page,
        vendor::{Bill, BillQuery, CreateBill, UpdateBill},
    },
};

#[derive(Clone)]
pub struct BillsRepository {
    pool: Pool<Postgres>,
}

impl BillsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &BillQuery) -> AppResult<(Vec<Bill>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let filter = "WHERE ($1::uuid IS NULL OR vendor_id = $1) AND ($2::text IS NULL OR status = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bills {}", filter))
            .bind(query.vendor_id)
            .bind(query.status)
            .fetch_one(&self.pool)
            .await?;

        let bills = sqlx::query_as::<_, Bill>(&format!(
            "SELECT * FROM bills {} ORDER BY due_date ASC NULLS LAST, created_at DESC LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(query.vendor_id)
        .bind(query.status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((bills, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Bill> {
        sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bill {} not found", id)))
    }

    pub async fn create(&self, data: &CreateBill) -> AppResult<Bill> {
        sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (vendor_id, bill_number, description, amount, due_date, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(data.vendor_id)
        .bind(&data.bill_number)
        .bind(&data.description)
        .bind(data.amount)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "Bill {} already recorded for this vendor",
                        data.bill_number
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound(format!("Vendor {} not found", data.vendor_id));
                }
            }
            AppError::Database(e)
        })
    }

    /// Partial update; moving to `paid` stamps `paid_at` once
    pub async fn update(&self, id: Uuid, data: &UpdateBill) -> AppResult<Bill> {
        sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills SET
                description = COALESCE($2, description),
                amount = COALESCE($3, amount),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                paid_at = CASE
                    WHEN $5 = 'paid' AND paid_at IS NULL THEN NOW()
                    ELSE paid_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.description)
        .bind(data.amount)
        .bind(data.due_date)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bill {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Bill {} not found", id)));
        }
        Ok(())
    }
}
