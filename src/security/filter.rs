use crate::interceptor::{Interceptor, Next};
use crate::security::TokenStore;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, header::AUTHORIZATION},
    response::Response,
};
use std::sync::Arc;

const BEARER_SCHEME: &str = "Bearer";

/// Resolves `Authorization: Bearer <token>` into a
/// [`UserAuthentication`](crate::security::UserAuthentication) extension.
///
/// Requests without a valid token continue anonymously; the route guard
/// decides whether anonymous access is allowed.
pub struct AuthenticationInterceptor {
    tokens: Arc<TokenStore>,
}

impl AuthenticationInterceptor {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }
}

/// The auth scheme is matched case-insensitively
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

#[async_trait]
impl Interceptor for AuthenticationInterceptor {
    async fn intercept(&self, mut request: Request<Body>, next: Next) -> Response {
        let authentication = bearer_token(&request).and_then(|token| self.tokens.authenticate(token));
        match authentication {
            Some(authentication) => {
                tracing::trace!(user_id = authentication.user_id, "authenticated request");
                request.extensions_mut().insert(authentication);
            }
            None if request.headers().contains_key(AUTHORIZATION) => {
                tracing::debug!("ignoring unrecognised authorization header");
            }
            None => {}
        }
        next.run(request).await
    }
}
