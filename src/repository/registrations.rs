//! Registrations repository for database operations

use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        finance::Page,
        registration::{
            NewRegistration, Registration, RegistrationQuery, RegistrationRow, UpdateRegistration,
        },
    },
};

#[derive(Clone)]
pub struct RegistrationsRepository {
    pool: Pool<Postgres>,
}

impl RegistrationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a priced registration; payment status starts as `pending`
    pub async fn create(&self, data: &NewRegistration) -> AppResult<Registration> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            INSERT INTO registrations (
                program, parent_name, email, phone, location,
                children, payment_status, payment_method,
                total_amount, currency, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(data.program)
        .bind(&data.parent_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.location)
        .bind(Json(&data.children))
        .bind(data.payment_method)
        .bind(data.total_amount)
        .bind(&data.currency)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn set_qr_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE registrations SET qr_token = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Registration {} not found", id)));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Registration> {
        sqlx::query_as::<_, RegistrationRow>("SELECT * FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Registration::from)
            .ok_or_else(|| AppError::NotFound(format!("Registration {} not found", id)))
    }

    /// List registrations, newest first
    pub async fn list(&self, query: &RegistrationQuery) -> AppResult<(Vec<Registration>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let filter = r#"
            WHERE ($1::text IS NULL OR program = $1)
              AND ($2::text IS NULL OR payment_status = $2)
              AND ($3::text IS NULL OR lower(email) = lower($3))
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM registrations {}", filter))
                .bind(query.program)
                .bind(query.payment_status)
                .bind(&query.email)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT * FROM registrations {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
            filter
        ))
        .bind(query.program)
        .bind(query.payment_status)
        .bind(&query.email)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Registration::from).collect(), total))
    }

    pub async fn update(&self, id: Uuid, data: &UpdateRegistration) -> AppResult<Registration> {
        sqlx::query_as::<_, RegistrationRow>(
            r#"
            UPDATE registrations SET
                payment_status = COALESCE($2, payment_status),
                payment_method = COALESCE($3, payment_method),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.payment_status)
        .bind(data.payment_method)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .map(Registration::from)
        .ok_or_else(|| AppError::NotFound(format!("Registration {} not found", id)))
    }
}
