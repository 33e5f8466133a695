//! Leads repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        finance::Page,
        lead::{Lead, LeadQuery, NewLead, UpdateLead},
    },
};

#[derive(Clone)]
pub struct LeadsRepository {
    pool: Pool<Postgres>,
}

impl LeadsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &NewLead) -> AppResult<Lead> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (registration_id, name, email, phone, program, source, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'new')
            RETURNING *
            "#,
        )
        .bind(data.registration_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.program)
        .bind(&data.source)
        .fetch_one(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn list(&self, query: &LeadQuery) -> AppResult<(Vec<Lead>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let filter = "WHERE ($1::text IS NULL OR status = $1) AND ($2::text IS NULL OR program = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM leads {}", filter))
            .bind(query.status)
            .bind(query.program)
            .fetch_one(&self.pool)
            .await?;

        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT * FROM leads {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(query.status)
        .bind(query.program)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((leads, total))
    }

    pub async fn update(&self, id: Uuid, data: &UpdateLead) -> AppResult<Lead> {
        sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.status)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))
    }
}
