//! Vendor and bill models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    enums::{BillStatus, VendorStatus},
    finance::positive_amount,
    registration::PHONE_REGEX,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Supply category (transport, catering, equipment, ...)
    pub category: Option<String>,
    pub status: VendorStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVendor {
    #[validate(length(min = 1, max = 120, message = "Vendor name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
    pub category: Option<String>,
    pub status: Option<VendorStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VendorQuery {
    pub status: Option<VendorStatus>,
    /// Case-insensitive substring of the vendor name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Bill received from a vendor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bill {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub bill_number: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBill {
    pub vendor_id: Uuid,
    #[validate(length(min = 1, max = 40, message = "Bill number is required"))]
    pub bill_number: String,
    pub description: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBill {
    pub description: Option<String>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<BillStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BillQuery {
    pub vendor_id: Option<Uuid>,
    pub status: Option<BillStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
