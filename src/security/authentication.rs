use crate::error::MarketError;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Named permission checked by `#[pre_authorize(...)]`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Authority {
    User,
    Admin,
}

/// The authenticated caller of the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthentication {
    pub user_id: i64,
    pub email: String,
    pub authorities: Vec<Authority>,
}

impl UserAuthentication {
    pub fn new(user_id: i64, email: impl Into<String>, authorities: Vec<Authority>) -> Self {
        Self {
            user_id,
            email: email.into(),
            authorities,
        }
    }

    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }

    pub fn has_any_authority<A: AsRef<str>>(&self, names: &[A]) -> bool {
        self.authorities
            .iter()
            .any(|granted| names.iter().any(|name| name.as_ref() == granted.as_ref()))
    }

    pub fn is_admin(&self) -> bool {
        self.has_authority(Authority::Admin)
    }
}

/// Handler parameter form: rejects with 401 when the request carries no
/// authenticated principal.
impl<S> FromRequestParts<S> for UserAuthentication
where
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAuthentication>()
            .cloned()
            .ok_or_else(|| MarketError::Unauthorized("authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_authority_names() {
        let auth = UserAuthentication::new(1, "a@puppy.market", vec![Authority::User]);
        assert!(auth.has_any_authority(&["USER"]));
        assert!(auth.has_any_authority(&["ADMIN", "USER"]));
        assert!(!auth.has_any_authority(&["ADMIN"]));
        assert!(!auth.is_admin());
        assert_eq!(Authority::Admin.to_string(), "ADMIN");
    }
}
