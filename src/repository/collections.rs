//! Pending collections (action items) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::finance::{CollectionQuery, CreateCollection, Page, PendingCollection, UpdateCollection},
};

#[derive(Clone)]
pub struct CollectionsRepository {
    pool: Pool<Postgres>,
}

impl CollectionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &CollectionQuery) -> AppResult<(Vec<PendingCollection>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pending_collections WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, PendingCollection>(
            r#"
            SELECT * FROM pending_collections
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY due_date ASC NULLS LAST, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }

    /// Collections that are not yet settled
    pub async fn open(&self) -> AppResult<Vec<PendingCollection>> {
        let items = sqlx::query_as::<_, PendingCollection>(
            "SELECT * FROM pending_collections WHERE status <> 'settled' ORDER BY due_date ASC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<PendingCollection> {
        sqlx::query_as::<_, PendingCollection>("SELECT * FROM pending_collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))
    }

    pub async fn create(&self, data: &CreateCollection) -> AppResult<PendingCollection> {
        let item = sqlx::query_as::<_, PendingCollection>(
            r#"
            INSERT INTO pending_collections (
                registration_id, payer_name, description, amount_due, amount_paid, due_date, status
            ) VALUES ($1, $2, $3, $4, 0, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(data.registration_id)
        .bind(&data.payer_name)
        .bind(&data.description)
        .bind(data.amount_due)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateCollection) -> AppResult<PendingCollection> {
        sqlx::query_as::<_, PendingCollection>(
            r#"
            UPDATE pending_collections SET
                description = COALESCE($2, description),
                amount_due = COALESCE($3, amount_due),
                amount_paid = COALESCE($4, amount_paid),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.description)
        .bind(data.amount_due)
        .bind(data.amount_paid)
        .bind(data.due_date)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM pending_collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Collection {} not found", id)));
        }
        Ok(())
    }
}
