//! Cascade dispatch engine.
//!
//! # Responsibilities
//! - Walk the mounted applications in registration order
//! - Invoke applications whose condition holds, skipping the rest
//! - Interpret the `X-Cascade: pass` declining signal
//! - Hand unclaimed requests back for the mode-specific fallback
//!
//! # Design Decisions
//! - Conditions are evaluated before any application is invoked; a skipped
//!   application never sees the request
//! - Declining is opt-in per response, never inferred from the status code
//! - The mount table is read-only at dispatch time, safe for concurrent use
//!   without locks

use axum::body::{to_bytes, Body};
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tracing::{debug, trace, warn};

use super::builder::{BoxedApp, BuildError, CascadeBuilder, MountEntry};

/// Response header a sub-application sets to decline a request it was offered.
/// Looked up case-insensitively, as any header name.
pub const X_CASCADE: HeaderName = HeaderName::from_static("x-cascade");

/// Exact header value that declines a request. Any other value is final.
const CASCADE_PASS: &[u8] = b"pass";

/// Default request-body buffering cap (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Canonical declining response: 404 with `X-Cascade: pass`.
///
/// Sub-applications typically return this from their own fallback to hand
/// requests for paths they do not serve back to the cascade.
pub fn pass() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(X_CASCADE, HeaderValue::from_static("pass"))],
    )
        .into_response()
}

/// Result of offering a request to the mounted applications.
pub enum CascadeOutcome {
    /// An application produced a final response.
    Accepted(Response),
    /// Every application was skipped or declined; the request is handed back
    /// so the caller can resolve it through its fallback.
    Unclaimed(Request<Body>),
}

/// An ordered, immutable table of mounted applications plus the dispatch
/// logic that walks it.
///
/// Built once at startup through [`Cascade::standalone`] or
/// [`Cascade::middleware`] and never mutated afterwards, so concurrent
/// dispatches share it behind an `Arc` without synchronization.
pub struct Cascade {
    entries: Vec<MountEntry>,
    fallback: Option<BoxedApp>,
    body_limit: usize,
}

impl Cascade {
    /// Build a cascade that resolves misses itself: through the terminal
    /// fallback declared with [`CascadeBuilder::fallback`], or a bare 404
    /// when none was declared.
    pub fn standalone(configure: impl FnOnce(&mut CascadeBuilder)) -> Self {
        let mut builder = CascadeBuilder::new();
        configure(&mut builder);
        Self {
            entries: builder.entries,
            fallback: builder.fallback,
            body_limit: builder.body_limit,
        }
    }

    /// Build a cascade for use as middleware, where misses are forwarded to
    /// the wrapped downstream handler.
    ///
    /// Declaring a terminal fallback here is a configuration error: the
    /// downstream handler already fills that role.
    pub fn middleware(
        configure: impl FnOnce(&mut CascadeBuilder),
    ) -> Result<Self, BuildError> {
        let mut builder = CascadeBuilder::new();
        configure(&mut builder);
        if builder.fallback.is_some() {
            return Err(BuildError::FallbackInMiddleware);
        }
        Ok(Self {
            entries: builder.entries,
            fallback: None,
            body_limit: builder.body_limit,
        })
    }

    /// Offer `request` to the mounted applications in registration order.
    ///
    /// Applications whose condition fails are skipped without being invoked.
    /// A matching application's response is final unless it carries
    /// `X-Cascade: pass`, in which case it is discarded and the walk
    /// continues. When the table is exhausted the request is handed back
    /// unmodified.
    pub async fn offer(&self, request: Request<Body>) -> CascadeOutcome {
        let (parts, body) = request.into_parts();

        let mut candidates = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.condition.evaluate(&parts) {
                candidates.push((index, entry));
            } else {
                trace!(entry = index, "condition rejected");
            }
        }

        // Nothing matched: hand the request back with its body untouched.
        if candidates.is_empty() {
            return CascadeOutcome::Unclaimed(Request::from_parts(parts, body));
        }

        // A declined request is re-offered to later candidates, so each
        // invocation needs its own body: buffer once, rebuild per attempt.
        let bytes = match to_bytes(body, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(limit = self.body_limit, error = %err, "request body exceeded buffering cap");
                return CascadeOutcome::Accepted(StatusCode::PAYLOAD_TOO_LARGE.into_response());
            }
        };

        for (index, entry) in candidates {
            let attempt = Request::from_parts(parts.clone(), Body::from(bytes.clone()));
            let response = match entry.app.clone().oneshot(attempt).await {
                Ok(response) => response,
                Err(never) => match never {},
            };

            if declined(&response) {
                debug!(entry = index, status = %response.status(), "application declined");
                continue;
            }

            debug!(entry = index, status = %response.status(), "application accepted");
            return CascadeOutcome::Accepted(response);
        }

        CascadeOutcome::Unclaimed(Request::from_parts(parts, Body::from(bytes)))
    }

    /// Dispatch `request` to a final response, resolving misses through the
    /// terminal fallback or the default 404.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        match self.offer(request).await {
            CascadeOutcome::Accepted(response) => response,
            CascadeOutcome::Unclaimed(request) => match &self.fallback {
                Some(app) => match app.clone().oneshot(request).await {
                    Ok(response) => response,
                    Err(never) => match never {},
                },
                None => {
                    debug!(
                        method = %request.method(),
                        path = %request.uri().path(),
                        "no mounted application accepted the request"
                    );
                    StatusCode::NOT_FOUND.into_response()
                }
            },
        }
    }
}

/// A response bearing `X-Cascade: pass` (exact value) declines the request.
fn declined(response: &Response) -> bool {
    response
        .headers()
        .get(&X_CASCADE)
        .is_some_and(|value| value.as_bytes() == CASCADE_PASS)
}
