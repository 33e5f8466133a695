//! Vendors repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        finance::Page,
        vendor::{CreateVendor, UpdateVendor, Vendor, VendorQuery},
    },
};

#[derive(Clone)]
pub struct VendorsRepository {
    pool: Pool<Postgres>,
}

impl VendorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &VendorQuery) -> AppResult<(Vec<Vendor>, i64)> {
        let page = Page::new(query.page, query.per_page);
        let name = query.name.as_ref().map(|n| format!("%{}%", n.trim()));
        let filter = "WHERE ($1::text IS NULL OR status = $1) AND ($2::text IS NULL OR name ILIKE $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM vendors {}", filter))
            .bind(query.status)
            .bind(&name)
            .fetch_one(&self.pool)
            .await?;

        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT * FROM vendors {} ORDER BY name LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(query.status)
        .bind(&name)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((vendors, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vendor> {
        sqlx::query_as::<_, Vendor>("SELECT * FROM vendors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vendor {} not found", id)))
    }

    pub async fn create(&self, data: &CreateVendor) -> AppResult<Vendor> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors (name, contact_name, email, phone, category, status, notes)
            VALUES ($1, $2, $3, $4, $5, 'active', $6)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(&data.contact_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.category)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(vendor)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateVendor) -> AppResult<Vendor> {
        sqlx::query_as::<_, Vendor>(
            r#"
            UPDATE vendors SET
                name = COALESCE($2, name),
                contact_name = COALESCE($3, contact_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                category = COALESCE($6, category),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.contact_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.category)
        .bind(data.status)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {} not found", id)))
    }

    /// Delete a vendor. Vendors with bills on file cannot be removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let bills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE vendor_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if bills > 0 {
            return Err(AppError::BusinessRule(format!(
                "Vendor has {} bill(s) on file; deactivate it instead",
                bills
            )));
        }

        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vendor {} not found", id)));
        }
        Ok(())
    }
}
