//! Redis service for short-lived submission fingerprints

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use sha2::{Digest, Sha256};

use crate::{
    error::{AppError, AppResult},
    models::enums::ProgramKind,
    services::registrations::SubmissionGuard,
};

/// Stable fingerprint of a submission: lowercased email, phone digits and
/// program. Resubmitting the same form maps to the same key.
pub fn submission_fingerprint(email: &str, phone: &str, program: ProgramKind) -> String {
    let phone: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let raw = format!("{}|{}|{}", email.trim().to_lowercase(), phone, program);
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Holds one managed connection that reconnects on its own; clones share it
#[derive(Clone)]
pub struct RedisService {
    connection: ConnectionManager,
    window_seconds: u64,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str, window_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        let service = Self {
            connection,
            window_seconds,
        };
        service.ping().await?;
        Ok(service)
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Round-trip a PING, used at startup and by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    fn key(fingerprint: &str) -> String {
        format!("submission:{}", fingerprint)
    }
}

#[async_trait]
impl SubmissionGuard for RedisService {
    async fn check_and_record(&self, fingerprint: &str) -> AppResult<bool> {
        let mut conn = self.connection();

        // SET key 1 NX EX window: replies OK when set, nil when already present
        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(fingerprint))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(self.window_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to record submission: {}", e)))?;

        Ok(reply.is_some())
    }

    async fn release(&self, fingerprint: &str) -> AppResult<()> {
        let mut conn = self.connection();
        conn.del::<_, ()>(Self::key(fingerprint))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to release submission: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_normalises_contact_details() {
        let a = submission_fingerprint("Parent@Example.com ", "+254 712-345-678", ProgramKind::DayCamp);
        let b = submission_fingerprint("parent@example.com", "254712345678", ProgramKind::DayCamp);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_differs_per_program() {
        let a = submission_fingerprint("p@example.com", "0712345678", ProgramKind::DayCamp);
        let b = submission_fingerprint("p@example.com", "0712345678", ProgramKind::HolidayCamp);
        assert_ne!(a, b);
    }
}
