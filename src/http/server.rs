//! Standalone HTTP server front end.
//!
//! # Responsibilities
//! - Create the Axum router feeding every request into the cascade
//! - Wire up middleware (tracing)
//! - Bind the server to a listener and serve until shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routing::cascade::Cascade;

/// HTTP server exposing a [`Cascade`] as a standalone application.
pub struct CascadeServer {
    router: Router,
}

impl CascadeServer {
    /// Create a new server around the given cascade.
    pub fn new(cascade: Cascade) -> Self {
        let router = Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(Arc::new(cascade))
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Consume the server, returning its router for embedding into a larger
    /// Axum application or serving by other means.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "cascade server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("cascade server stopped");
        Ok(())
    }
}

/// Every request, regardless of method or path, goes through the cascade.
async fn dispatch_handler(
    State(cascade): State<Arc<Cascade>>,
    request: Request<Body>,
) -> Response {
    cascade.dispatch(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
