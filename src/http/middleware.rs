//! Cascade middleware.
//!
//! Offers each request to the cascade before the rest of the application
//! sees it; unclaimed requests continue down the stack unmodified.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::routing::cascade::{Cascade, CascadeOutcome};

/// Middleware form of the cascade, for use with
/// [`axum::middleware::from_fn_with_state`].
///
/// Build the cascade with [`Cascade::middleware`] so that a stray terminal
/// fallback is rejected up front, then insert this ahead of the handlers that
/// should serve as the implicit fallback:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use cascade_router::{cascade_middleware, Cascade};
///
/// # fn sub_app() -> Router { Router::new() }
/// let cascade = Cascade::middleware(|b| {
///     b.mount(sub_app());
/// })
/// .unwrap();
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "downstream" }))
///     .layer(middleware::from_fn_with_state(
///         Arc::new(cascade),
///         cascade_middleware,
///     ));
/// ```
pub async fn cascade_middleware(
    State(cascade): State<Arc<Cascade>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match cascade.offer(request).await {
        CascadeOutcome::Accepted(response) => response,
        CascadeOutcome::Unclaimed(request) => next.run(request).await,
    }
}
