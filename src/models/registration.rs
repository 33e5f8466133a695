//! Registration model and related types

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{PaymentMethod, PaymentStatus, ProgramKind};
use crate::booking::{AgeBracket, SessionKind};

/// Loose international phone format: optional `+`, digits, spaces and dashes
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("valid phone regex"));

/// A child as typed by the parent
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChildInput {
    #[validate(length(min = 1, max = 120, message = "Child name is required"))]
    pub full_name: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<NaiveDate>,
    /// Bracket picked by hand when no birth date is given
    pub age_bracket: Option<AgeBracket>,
    pub number_of_days: Option<u32>,
    /// One entry per day; missing days default to full sessions
    #[serde(default)]
    pub sessions: Vec<SessionKind>,
}

/// A child as stored on a registration, with derived fields filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Child {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age_bracket: Option<AgeBracket>,
    pub number_of_days: u32,
    pub sessions: Vec<SessionKind>,
    pub price: Decimal,
}

/// Public registration form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRegistration {
    pub program: ProgramKind,
    #[validate(length(min = 2, max = 120, message = "Parent name is required"))]
    pub parent_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: String,
    pub location: Option<String>,
    pub payment_method: PaymentMethod,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
    #[validate(nested)]
    pub children: Vec<ChildInput>,
}

/// Request for a price quote before submitting
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub program: ProgramKind,
    #[validate(nested)]
    pub children: Vec<ChildInput>,
}

/// Row to insert, built by the registration service after pricing
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub program: ProgramKind,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
    pub children: Vec<Child>,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    id: Uuid,
    program: ProgramKind,
    parent_name: String,
    email: String,
    phone: String,
    location: Option<String>,
    children: Json<Vec<Child>>,
    payment_status: PaymentStatus,
    payment_method: PaymentMethod,
    total_amount: Decimal,
    currency: String,
    qr_token: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Registration {
            id: row.id,
            program: row.program,
            parent_name: row.parent_name,
            email: row.email,
            phone: row.phone,
            location: row.location,
            children: row.children.0,
            payment_status: row.payment_status,
            payment_method: row.payment_method,
            total_amount: row.total_amount,
            currency: row.currency,
            qr_token: row.qr_token,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub program: ProgramKind,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
    pub children: Vec<Child>,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Sum of child prices at submission time
    pub total_amount: Decimal,
    pub currency: String,
    pub qr_token: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RegistrationQuery {
    pub program: Option<ProgramKind>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive match on the parent's email
    pub email: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Admin update of a registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRegistration {
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+254 712 345 678"));
        assert!(PHONE_REGEX.is_match("0712-345678"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
    }

    #[test]
    fn test_child_input_sessions_default_empty() {
        let child: ChildInput =
            serde_json::from_str(r#"{"full_name": "Njeri", "number_of_days": 2}"#).unwrap();
        assert!(child.sessions.is_empty());
        assert_eq!(child.number_of_days, Some(2));
    }
}
