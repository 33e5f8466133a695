//! Invoices repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::InvoiceStatus,
        finance::{CreateInvoice, Invoice, InvoiceQuery, Page, UpdateInvoice},
    },
};

#[derive(Clone)]
pub struct InvoicesRepository {
    pool: Pool<Postgres>,
}

impl InvoicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &InvoiceQuery) -> AppResult<(Vec<Invoice>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY issue_date DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((invoices, total))
    }

    /// Every invoice that is not cancelled, newest first
    pub async fn all_active(&self) -> AppResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE status <> 'cancelled' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Invoice> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invoice {} not found", id)))
    }

    pub async fn create(&self, data: &CreateInvoice) -> AppResult<Invoice> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                invoice_number, customer_name, customer_email, registration_id,
                total_amount, amount_paid, status, issue_date, due_date, notes
            ) VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.invoice_number)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(data.registration_id)
        .bind(data.total_amount)
        .bind(data.status.unwrap_or(InvoiceStatus::Draft))
        .bind(data.issue_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(data.due_date)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "Invoice number {} already exists",
                        data.invoice_number
                    ));
                }
            }
            AppError::Database(e)
        })
    }

    pub async fn update(&self, id: Uuid, data: &UpdateInvoice) -> AppResult<Invoice> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices SET
                customer_name = COALESCE($2, customer_name),
                customer_email = COALESCE($3, customer_email),
                total_amount = COALESCE($4, total_amount),
                amount_paid = COALESCE($5, amount_paid),
                status = COALESCE($6, status),
                due_date = COALESCE($7, due_date),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(data.total_amount)
        .bind(data.amount_paid)
        .bind(data.status)
        .bind(data.due_date)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Invoice {} not found", id)));
        }
        Ok(())
    }
}
