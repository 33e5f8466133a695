//! Staff profiles, roles, portals and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// Admin portals reachable from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    /// Profiles, registrations, leads
    Admin,
    /// Dashboard, invoices, payments, expenses, budgets, collections
    Accounts,
    /// Vendors and bills
    Vendors,
}

impl Portal {
    pub fn path(&self) -> &'static str {
        match self {
            Portal::Admin => "/admin",
            Portal::Accounts => "/accounts",
            Portal::Vendors => "/vendors",
        }
    }
}

impl std::fmt::Display for Portal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Portal::Admin => "admin",
            Portal::Accounts => "accounts",
            Portal::Vendors => "vendors",
        };
        write!(f, "{}", label)
    }
}

impl Role {
    /// Portals this role may open, landing portal first
    pub fn portals(&self) -> &'static [Portal] {
        match self {
            Role::Admin => &[Portal::Admin, Portal::Accounts, Portal::Vendors],
            Role::Accounts => &[Portal::Accounts],
            Role::Procurement => &[Portal::Vendors],
            Role::Staff => &[],
        }
    }

    /// Where the user lands after signing in
    pub fn landing_portal(&self) -> Option<Portal> {
        self.portals().first().copied()
    }

    pub fn can_access(&self, portal: Portal) -> bool {
        self.portals().contains(&portal)
    }
}

/// Staff profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Create profile request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfile {
    #[validate(length(min = 3, max = 60, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Display name is required"))]
    pub display_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Role,
}

/// Change a profile's role or active flag (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileAccess {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// JWT Claims for authenticated staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub profile_id: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(profile: &Profile, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: profile.login.clone(),
            profile_id: profile.id,
            role: profile.role,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(expiration_hours as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn require_portal(&self, portal: Portal) -> Result<(), AppError> {
        if self.role.can_access(portal) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} cannot open the {} portal",
                self.role, portal
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_dispatch() {
        assert_eq!(Role::Admin.landing_portal(), Some(Portal::Admin));
        assert_eq!(Role::Accounts.landing_portal(), Some(Portal::Accounts));
        assert_eq!(Role::Procurement.landing_portal(), Some(Portal::Vendors));
        assert_eq!(Role::Staff.landing_portal(), None);

        assert!(Role::Admin.can_access(Portal::Vendors));
        assert!(!Role::Accounts.can_access(Portal::Vendors));
        assert!(!Role::Procurement.can_access(Portal::Accounts));
    }

    #[test]
    fn test_token_round_trip_and_portal_check() {
        let profile = Profile {
            id: Uuid::new_v4(),
            login: "akinyi".to_string(),
            password_hash: String::new(),
            display_name: "Akinyi".to_string(),
            email: None,
            role: Role::Accounts,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        let claims = UserClaims::new(&profile, 1);
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();

        assert_eq!(parsed.profile_id, profile.id);
        assert_eq!(parsed.role, Role::Accounts);
        assert!(parsed.require_portal(Portal::Accounts).is_ok());
        assert!(matches!(
            parsed.require_portal(Portal::Admin),
            Err(AppError::Authorization(_))
        ));
        assert!(UserClaims::from_token(&token, "other").is_err());
    }
}
