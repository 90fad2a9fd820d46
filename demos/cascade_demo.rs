//! Cascade composition demo.
//!
//! Mounts a public API sub-application and a token-guarded admin
//! sub-application behind one listener:
//!
//! ```text
//! curl http://localhost:8080/api/status
//! curl -H 'X-Admin-Token: letmein' http://localhost:8080/admin/metrics
//! ```

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cascade_router::{pass, Cascade, CascadeServer, HeaderCondition};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cascade_router=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = Router::new()
        .route(
            "/api/status",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .fallback(|| async { pass() });

    let admin = Router::new()
        .route("/admin/metrics", get(|| async { "metrics snapshot" }))
        .fallback(|| async { pass() });

    let cascade = Cascade::standalone(|b| {
        b.mount(api);
        b.mount_when(HeaderCondition::new("x-admin-token", "letmein"), admin);
    });

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    CascadeServer::new(cascade).run(listener).await?;

    Ok(())
}
