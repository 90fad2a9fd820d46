//! Cascade routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers)
//!     → cascade.rs (ordered walk over mounted applications)
//!     → condition.rs (evaluate mount conditions)
//!     → invoke matching applications in registration order
//!     → Return: first non-declining Response, or the request handed back
//!
//! Mount table construction (at startup):
//!     CascadeBuilder { mount / scope / fallback }
//!     → resolve each entry's condition (AND of enclosing scopes)
//!     → Freeze as immutable Cascade
//! ```
//!
//! # Design Decisions
//! - Mount table built once at startup, immutable at runtime
//! - Conditions are opaque predicates over request metadata, not URL patterns
//! - Deterministic: dispatch order is exactly registration order
//! - First non-declining match wins; declining is opt-in via `X-Cascade: pass`

pub mod builder;
pub mod cascade;
pub mod condition;
