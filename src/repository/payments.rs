//! Payments repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TransactionStatus,
        finance::{CreatePayment, Page, Payment, PaymentQuery, UpdatePayment},
    },
};

#[derive(Clone)]
pub struct PaymentsRepository {
    pool: Pool<Postgres>,
}

impl PaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &PaymentQuery) -> AppResult<(Vec<Payment>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let filter = "WHERE ($1::text IS NULL OR status = $1) AND ($2::uuid IS NULL OR invoice_id = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM payments {}", filter))
            .bind(query.status)
            .bind(query.invoice_id)
            .fetch_one(&self.pool)
            .await?;

        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT * FROM payments {} ORDER BY paid_at DESC LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(query.status)
        .bind(query.invoice_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((payments, total))
    }

    /// All completed payments, newest first
    pub async fn completed(&self) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE status = 'completed' ORDER BY paid_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    /// Completed payments with `from <= paid_at < until`
    pub async fn completed_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE status = 'completed' AND paid_at >= $1 AND paid_at < $2
            ORDER BY paid_at DESC
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }

    pub async fn create(&self, data: &CreatePayment) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                invoice_id, registration_id, payer_name, amount, method,
                reference, status, paid_at, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.invoice_id)
        .bind(data.registration_id)
        .bind(&data.payer_name)
        .bind(data.amount)
        .bind(data.method)
        .bind(&data.reference)
        .bind(data.status.unwrap_or(TransactionStatus::Completed))
        .bind(data.paid_at.unwrap_or_else(Utc::now))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(payment)
    }

    pub async fn update(&self, id: Uuid, data: &UpdatePayment) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                invoice_id = COALESCE($2, invoice_id),
                amount = COALESCE($3, amount),
                method = COALESCE($4, method),
                reference = COALESCE($5, reference),
                status = COALESCE($6, status),
                paid_at = COALESCE($7, paid_at),
                notes = COALESCE($8, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.invoice_id)
        .bind(data.amount)
        .bind(data.method)
        .bind(&data.reference)
        .bind(data.status)
        .bind(data.paid_at)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Payment {} not found", id)));
        }
        Ok(())
    }
}
