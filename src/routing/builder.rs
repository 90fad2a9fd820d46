//! Mount table construction.
//!
//! # Responsibilities
//! - Accumulate mounted applications in registration order
//! - Resolve each entry's condition against the enclosing scope stack
//! - Record the optional terminal fallback
//!
//! # Design Decisions
//! - The scope stack exists only while the builder runs; the built table is frozen
//! - Registration order is dispatch order, no priority scores
//! - Configuration errors abort construction instead of producing a partial table

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use thiserror::Error;
use tower::util::BoxCloneSyncService;
use tower::Service;

use super::cascade::DEFAULT_BODY_LIMIT;
use super::condition::{Always, AndCondition, Condition};

/// Boxed sub-application, callable concurrently from any dispatch.
pub(crate) type BoxedApp = BoxCloneSyncService<Request<Body>, Response, Infallible>;

/// A mounted application together with its fully resolved condition.
pub struct MountEntry {
    pub(crate) app: BoxedApp,
    pub(crate) condition: Arc<dyn Condition>,
}

/// Error type for cascade construction.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A terminal fallback was declared while building a middleware cascade.
    /// In middleware mode the wrapped downstream handler already fills that
    /// role, so the declaration is a configuration mistake.
    #[error("terminal fallback declared in middleware mode; the wrapped handler receives misses")]
    FallbackInMiddleware,
}

/// Builder for a [`Cascade`](super::cascade::Cascade) mount table.
///
/// Obtained through [`Cascade::standalone`](super::cascade::Cascade::standalone)
/// or [`Cascade::middleware`](super::cascade::Cascade::middleware); the builder
/// is handed to a configuration closure and consumed when it returns.
pub struct CascadeBuilder {
    pub(crate) entries: Vec<MountEntry>,
    pub(crate) fallback: Option<BoxedApp>,
    pub(crate) body_limit: usize,
    scope_stack: Vec<Arc<dyn Condition>>,
}

impl CascadeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
            body_limit: DEFAULT_BODY_LIMIT,
            scope_stack: Vec::new(),
        }
    }

    /// Mount an application guarded only by the conditions of the enclosing
    /// scopes (none at the top level: the app is offered every request).
    pub fn mount<S>(&mut self, app: S) -> &mut Self
    where
        S: Service<Request<Body>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.mount_when(Always, app)
    }

    /// Mount an application guarded by `condition` in addition to the
    /// conditions of the enclosing scopes. All of them must hold for the app
    /// to be offered a request.
    pub fn mount_when<C, S>(&mut self, condition: C, app: S) -> &mut Self
    where
        C: Condition + 'static,
        S: Service<Request<Body>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let condition = self.resolve(Arc::new(condition));
        self.entries.push(MountEntry {
            app: BoxCloneSyncService::new(app),
            condition,
        });
        self
    }

    /// Push `condition` for the duration of `configure`. Every mount declared
    /// inside the closure (including nested scopes) requires it to hold.
    pub fn scope<C, F>(&mut self, condition: C, configure: F) -> &mut Self
    where
        C: Condition + 'static,
        F: FnOnce(&mut Self),
    {
        self.scope_stack.push(Arc::new(condition));
        configure(self);
        self.scope_stack.pop();
        self
    }

    /// Set the terminal fallback invoked when no mounted application accepts
    /// a request. Standalone mode only; without one, misses resolve to a bare
    /// 404. Declaring a fallback more than once overwrites the previous one
    /// (last write wins).
    pub fn fallback<S>(&mut self, app: S) -> &mut Self
    where
        S: Service<Request<Body>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.fallback = Some(BoxCloneSyncService::new(app));
        self
    }

    /// Cap request-body buffering at `limit` bytes.
    ///
    /// Offering one request to several applications requires buffering its
    /// body; a body that exceeds the limit resolves to a 413 response instead
    /// of being offered. Defaults to [`DEFAULT_BODY_LIMIT`].
    pub fn body_limit(&mut self, limit: usize) -> &mut Self {
        self.body_limit = limit;
        self
    }

    /// Resolved condition for a new entry: the conjunction of the active
    /// scope conditions plus the entry's own.
    fn resolve(&self, local: Arc<dyn Condition>) -> Arc<dyn Condition> {
        if self.scope_stack.is_empty() {
            return local;
        }
        let mut conditions = self.scope_stack.clone();
        conditions.push(local);
        Arc::new(AndCondition::new(conditions))
    }
}
