use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;

mod layer;
mod logging;

pub use layer::InterceptorLayer;
pub use logging::LoggingInterceptor;

pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// The remainder of the chain after the current interceptor
pub struct Next {
    run: Box<dyn FnOnce(Request<Body>) -> ResponseFuture + Send>,
}

impl Next {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> ResponseFuture + Send + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Execute the next handler
    pub async fn run(self, request: Request<Body>) -> Response {
        (self.run)(request).await
    }
}

/// Request/response hook wrapped around every route
///
/// Interceptors may inspect or enrich the request (extensions, headers)
/// before calling `next`, and inspect the response afterwards. An
/// interceptor that answers without calling `next` short-circuits the chain.
///
/// # Example
/// ```ignore
/// struct Timing;
///
/// #[async_trait]
/// impl Interceptor for Timing {
///     async fn intercept(&self, req: Request<Body>, next: Next) -> Response {
///         let start = Instant::now();
///         let res = next.run(req).await;
///         tracing::info!(elapsed = ?start.elapsed());
///         res
///     }
/// }
/// ```
#[async_trait]
pub trait Interceptor: Send + Sync + 'static {
    async fn intercept(&self, request: Request<Body>, next: Next) -> Response;
}
