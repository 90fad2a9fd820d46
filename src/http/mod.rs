//! HTTP front ends for the cascade.
//!
//! # Data Flow
//! ```text
//! Standalone:
//!     TCP connection
//!         → server.rs (Axum setup, dispatch handler)
//!         → routing::Cascade (walk mounts, resolve fallback)
//!         → Send response to client
//!
//! Middleware:
//!     host application layer stack
//!         → middleware.rs (offer request to the cascade)
//!         → claimed: cascade response; unclaimed: next handler
//! ```

pub mod middleware;
pub mod server;

pub use server::CascadeServer;
