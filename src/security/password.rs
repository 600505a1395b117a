use crate::error::{MarketError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Argon2id password hashing with default parameters
#[derive(Default)]
pub struct PasswordEncoder;

impl PasswordEncoder {
    pub fn encode(&self, raw: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| MarketError::PasswordHash(e.to_string()))
    }

    /// `encode` on the blocking pool, off the async workers
    pub async fn encode_blocking(&self, raw: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self.encode(&raw))
            .await
            .map_err(|e| MarketError::Internal(format!("password hashing task failed: {e}")))?
    }

    pub fn matches(&self, raw: &str, encoded: &str) -> bool {
        PasswordHash::new(encoded)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(raw.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl crate::di::Injectable for PasswordEncoder {
    fn inject(_container: &crate::di::Container) -> Result<Self> {
        Ok(Self)
    }
}
