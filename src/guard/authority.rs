use crate::guard::{Guard, GuardError, GuardResult};
use crate::security::UserAuthentication;
use async_trait::async_trait;
use axum::http::request::Parts;

/// `isAuthenticated() and hasAnyAuthority(...)`
///
/// Generated by `#[pre_authorize("USER", "ADMIN")]`. Reads the principal
/// left by the authentication interceptor.
#[derive(Debug, Clone)]
pub struct AuthorityGuard {
    authorities: Vec<String>,
}

impl AuthorityGuard {
    pub fn any_of(authorities: &[&str]) -> Self {
        Self {
            authorities: authorities.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn check(&self, authentication: Option<&UserAuthentication>) -> GuardResult {
        let authentication = authentication
            .ok_or_else(|| GuardError::Unauthorized("authentication required".to_string()))?;
        if authentication.has_any_authority(self.authorities.as_slice()) {
            Ok(())
        } else {
            Err(GuardError::Forbidden(format!(
                "requires one of [{}]",
                self.authorities.join(", ")
            )))
        }
    }
}

#[async_trait]
impl Guard for AuthorityGuard {
    async fn can_activate(&self, parts: &Parts) -> GuardResult {
        self.check(parts.extensions.get::<UserAuthentication>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Authority;
    use axum::http::Request;

    #[test]
    fn anonymous_callers_are_unauthorized() {
        let guard = AuthorityGuard::any_of(&["USER"]);
        assert!(matches!(guard.check(None), Err(GuardError::Unauthorized(_))));
    }

    #[test]
    fn missing_authority_is_forbidden() {
        let admin_only = AuthorityGuard::any_of(&["ADMIN"]);
        let user = UserAuthentication::new(1, "u@puppy.market", vec![Authority::User]);
        assert!(matches!(admin_only.check(Some(&user)), Err(GuardError::Forbidden(_))));
    }

    #[test]
    fn any_listed_authority_is_enough() {
        let guard = AuthorityGuard::any_of(&["USER", "ADMIN"]);
        let admin = UserAuthentication::new(2, "a@puppy.market", vec![Authority::Admin]);
        assert!(guard.check(Some(&admin)).is_ok());
    }

    #[tokio::test]
    async fn reads_principal_from_request_extensions() {
        let guard = AuthorityGuard::any_of(&["USER"]);
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(guard.can_activate(&parts).await.is_err());

        parts
            .extensions
            .insert(UserAuthentication::new(3, "u@puppy.market", vec![Authority::User]));
        assert!(guard.can_activate(&parts).await.is_ok());
    }
}
