//! Staff authentication and profile administration

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateProfile, Portal, Profile, UpdateProfileAccess, UserClaims},
    repository::Repository,
};

/// Sign-in progress for one session
#[derive(Debug, Clone)]
pub enum SessionState {
    Unauthenticated,
    Authenticating { login: String },
    ProfileLoading { profile_id: Uuid },
    Ready(Box<Profile>),
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit { login: String },
    CredentialsVerified { profile_id: Uuid },
    ProfileLoaded(Box<Profile>),
    Error(String),
    SignOut,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit { .. } => "submit",
            SessionEvent::CredentialsVerified { .. } => "credentials_verified",
            SessionEvent::ProfileLoaded(_) => "profile_loaded",
            SessionEvent::Error(_) => "error",
            SessionEvent::SignOut => "sign_out",
        }
    }
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating { .. } => "authenticating",
            SessionState::ProfileLoading { .. } => "profile_loading",
            SessionState::Ready(_) => "ready",
            SessionState::Failed { .. } => "failed",
        }
    }

    /// Apply an event; anything not listed below is rejected
    pub fn apply(self, event: SessionEvent) -> AppResult<SessionState> {
        use SessionEvent as E;
        use SessionState as S;

        let from = self.name();
        match (self, event) {
            (S::Unauthenticated | S::Failed { .. }, E::Submit { login }) => {
                Ok(S::Authenticating { login })
            }
            (S::Authenticating { .. }, E::CredentialsVerified { profile_id }) => {
                Ok(S::ProfileLoading { profile_id })
            }
            (S::ProfileLoading { profile_id }, E::ProfileLoaded(profile)) => {
                if profile.id != profile_id {
                    return Err(AppError::Internal(
                        "Loaded profile does not match verified credentials".to_string(),
                    ));
                }
                Ok(S::Ready(profile))
            }
            (S::Authenticating { .. } | S::ProfileLoading { .. }, E::Error(reason)) => {
                Ok(S::Failed { reason })
            }
            (S::Ready(_) | S::Failed { .. }, E::SignOut) => Ok(S::Unauthenticated),
            (_, event) => Err(AppError::Internal(format!(
                "Invalid session transition from {} on {}",
                from,
                event.name()
            ))),
        }
    }
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub profile: Profile,
    pub portal: Option<Portal>,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    async fn verify_credentials(&self, login: &str, password: &str) -> AppResult<Profile> {
        let profile = self
            .repository
            .profiles
            .find_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !profile.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }
        if !verify_password(&profile.password_hash, password)? {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }
        Ok(profile)
    }

    /// Sign in: verify credentials, load the profile, issue a token
    pub async fn login(&self, login: &str, password: &str) -> AppResult<SignedIn> {
        let state = SessionState::Unauthenticated.apply(SessionEvent::Submit {
            login: login.to_string(),
        })?;

        let verified = match self.verify_credentials(login, password).await {
            Ok(profile) => profile,
            Err(e) => {
                let failed = state.apply(SessionEvent::Error(e.to_string()))?;
                tracing::info!(login = %login, state = failed.name(), "Sign-in rejected");
                return Err(e);
            }
        };
        let state = state.apply(SessionEvent::CredentialsVerified {
            profile_id: verified.id,
        })?;

        let state = match self.repository.profiles.get_by_id(verified.id).await {
            Ok(profile) => state.apply(SessionEvent::ProfileLoaded(Box::new(profile)))?,
            Err(e) => {
                state.apply(SessionEvent::Error(e.to_string()))?;
                return Err(e);
            }
        };

        let profile = match state {
            SessionState::Ready(profile) => *profile,
            other => {
                return Err(AppError::Internal(format!(
                    "Session ended in {} instead of ready",
                    other.name()
                )))
            }
        };

        let token = UserClaims::new(&profile, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        if let Err(e) = self.repository.profiles.touch_last_login(profile.id).await {
            tracing::warn!(profile_id = %profile.id, "Failed to record last login: {}", e);
        }
        tracing::info!(profile_id = %profile.id, role = %profile.role, "Signed in");

        Ok(SignedIn {
            token,
            portal: profile.role.landing_portal(),
            profile,
        })
    }

    pub async fn get_profile(&self, id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(id).await
    }

    pub async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        self.repository.profiles.list().await
    }

    pub async fn create_profile(&self, data: CreateProfile) -> AppResult<Profile> {
        data.validate()?;
        let hash = hash_password(&data.password)?;
        self.repository
            .profiles
            .create(
                data.login.trim(),
                &hash,
                data.display_name.trim(),
                data.email.as_deref(),
                data.role,
            )
            .await
    }

    /// Change role or active flag. Admins cannot lock themselves out.
    pub async fn update_access(
        &self,
        acting_profile: Uuid,
        id: Uuid,
        data: UpdateProfileAccess,
    ) -> AppResult<Profile> {
        if acting_profile == id {
            let demotes = data.role.is_some_and(|r| !r.can_access(Portal::Admin));
            let disables = data.is_active == Some(false);
            if demotes || disables {
                return Err(AppError::BusinessRule(
                    "You cannot remove your own admin access".to_string(),
                ));
            }
        }
        self.repository.profiles.update_access(id, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Role;
    use chrono::Utc;

    fn profile(id: Uuid) -> Profile {
        Profile {
            id,
            login: "akinyi".to_string(),
            password_hash: String::new(),
            display_name: "Akinyi".to_string(),
            email: None,
            role: Role::Accounts,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "wrong horse").unwrap());
        assert!(verify_password("not a hash", "x").is_err());
    }

    #[test]
    fn test_session_happy_path() {
        let id = Uuid::new_v4();
        let state = SessionState::Unauthenticated
            .apply(SessionEvent::Submit {
                login: "akinyi".to_string(),
            })
            .unwrap()
            .apply(SessionEvent::CredentialsVerified { profile_id: id })
            .unwrap()
            .apply(SessionEvent::ProfileLoaded(Box::new(profile(id))))
            .unwrap();

        match &state {
            SessionState::Ready(p) => assert_eq!(p.id, id),
            other => panic!("expected ready, got {:?}", other),
        }
        assert!(matches!(
            state.apply(SessionEvent::SignOut).unwrap(),
            SessionState::Unauthenticated
        ));
    }

    #[test]
    fn test_session_rejects_skipped_steps() {
        let id = Uuid::new_v4();
        assert!(SessionState::Unauthenticated
            .apply(SessionEvent::ProfileLoaded(Box::new(profile(id))))
            .is_err());
        assert!(SessionState::Unauthenticated
            .apply(SessionEvent::CredentialsVerified { profile_id: id })
            .is_err());
        assert!(SessionState::Unauthenticated.apply(SessionEvent::SignOut).is_err());
    }

    #[test]
    fn test_session_rejects_mismatched_profile() {
        let state = SessionState::ProfileLoading {
            profile_id: Uuid::new_v4(),
        };
        assert!(state
            .apply(SessionEvent::ProfileLoaded(Box::new(profile(Uuid::new_v4()))))
            .is_err());
    }

    #[test]
    fn test_failed_session_can_retry() {
        let failed = SessionState::Authenticating {
            login: "akinyi".to_string(),
        }
        .apply(SessionEvent::Error("bad password".to_string()))
        .unwrap();
        assert!(matches!(failed, SessionState::Failed { .. }));

        let retry = failed
            .apply(SessionEvent::Submit {
                login: "akinyi".to_string(),
            })
            .unwrap();
        assert!(matches!(retry, SessionState::Authenticating { .. }));
    }
}
