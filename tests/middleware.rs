//! Integration tests for the cascade inserted as middleware ahead of a
//! downstream application.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::Router;

use cascade_router::{cascade_middleware, Cascade};

mod common;

fn mounts(b: &mut cascade_router::CascadeBuilder) {
    b.mount(common::sub_app(0));
    b.mount_when(common::condition(1), common::sub_app(1));

    b.scope(common::condition(2), |b| {
        b.mount(common::sub_app(2));
        b.scope(common::condition(3), |b| {
            b.mount(common::sub_app(3));
        });
    });
}

async fn echo(headers: HeaderMap, body: String) -> String {
    let probe = headers
        .get("x-probe")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    format!("{probe}|{body}")
}

/// Downstream application: an echo route plus a plain 404 for everything
/// else, with the cascade layered in front.
fn app_under_test() -> Router {
    let cascade = Cascade::middleware(mounts).unwrap();

    Router::new()
        .route("/echo", post(echo))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(from_fn_with_state(Arc::new(cascade), cascade_middleware))
}

async fn start() -> SocketAddr {
    common::serve(app_under_test()).await
}

#[tokio::test]
async fn routes_to_an_app() {
    let addr = start().await;
    let res = reqwest::get(format!("http://{addr}/app0")).await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn responds_with_404_from_downstream() {
    let addr = start().await;
    let res = reqwest::get(format!("http://{addr}/not-found"))
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn passes_routing_conditions() {
    let addr = start().await;
    let res = reqwest::Client::new()
        .get(format!("http://{addr}/app1"))
        .header("X-Cond1", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn fails_routing_conditions() {
    let addr = start().await;
    let res = reqwest::get(format!("http://{addr}/app1")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn passes_routing_conditions_in_a_block() {
    let addr = start().await;
    let res = reqwest::Client::new()
        .get(format!("http://{addr}/app2"))
        .header("X-Cond2", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn fails_routing_conditions_in_a_block() {
    let addr = start().await;
    let res = reqwest::get(format!("http://{addr}/app2")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn passes_nested_routing_conditions() {
    let addr = start().await;
    let res = reqwest::Client::new()
        .get(format!("http://{addr}/app3"))
        .header("X-Cond2", "true")
        .header("X-Cond3", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn fails_nested_routing_conditions() {
    let addr = start().await;
    let res = reqwest::Client::new()
        .get(format!("http://{addr}/app3"))
        .header("X-Cond2", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn forwards_unclaimed_requests_unmodified() {
    // Every mounted app declines POST /echo through its fallback, so the
    // request reaches the downstream echo route with headers and the
    // (rebuffered) body intact.
    let addr = start().await;
    let res = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .header("X-Probe", "alpha")
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "alpha|payload");
}

#[tokio::test]
async fn forwards_unmatched_requests_without_buffering() {
    // No unconditional mounts here: a request matching no condition is
    // forwarded downstream with its original body, never buffered.
    let cascade = Cascade::middleware(|b| {
        b.body_limit(4);
        b.mount_when(common::condition(1), common::sub_app(1));
    })
    .unwrap();
    let app = Router::new()
        .route("/echo", post(echo))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(from_fn_with_state(Arc::new(cascade), cascade_middleware));
    let addr = common::serve(app).await;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .header("X-Probe", "beta")
        .body("a body much longer than the four-byte cap")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.text().await.unwrap(),
        "beta|a body much longer than the four-byte cap"
    );
}
