//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use cascade_router::pass;

/// Sub-application answering `GET /app{n}` and declining every other path.
///
/// `GET /app{n}?pass=true` answers 200 but still declines, for exercising
/// header-driven pass-through from a matched application.
#[allow(dead_code)]
pub fn sub_app(n: usize) -> Router {
    let path = format!("/app{n}");
    Router::new()
        .route(
            &path,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("pass").is_some_and(|v| v == "true") {
                    pass_with_ok_status()
                } else {
                    StatusCode::OK.into_response()
                }
            }),
        )
        .fallback(|| async { pass() })
}

fn pass_with_ok_status() -> axum::response::Response {
    use cascade_router::X_CASCADE;
    (StatusCode::OK, [(X_CASCADE, "pass")]).into_response()
}

/// Condition matching requests that carry `X-Cond{n}: true`.
#[allow(dead_code)]
pub fn condition(n: usize) -> impl Fn(&Parts) -> bool + Send + Sync + 'static {
    let name = format!("x-cond{n}");
    move |parts: &Parts| {
        parts
            .headers
            .get(name.as_str())
            .is_some_and(|v| v.as_bytes() == b"true")
    }
}

/// Serve an Axum router on an ephemeral local port, returning its address.
#[allow(dead_code)]
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
