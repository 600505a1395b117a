use crate::security::UserAuthentication;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque bearer tokens issued on registration
#[derive(Clone, Default)]
pub struct TokenStore {
    tokens: Arc<DashMap<String, UserAuthentication>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, authentication: UserAuthentication) -> String {
        let token = Uuid::new_v4().simple().to_string();
        tracing::debug!(user_id = authentication.user_id, "issued access token");
        self.tokens.insert(token.clone(), authentication);
        token
    }

    pub fn authenticate(&self, token: &str) -> Option<UserAuthentication> {
        self.tokens.get(token).map(|entry| entry.value().clone())
    }
}
