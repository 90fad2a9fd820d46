//! Mount condition evaluation.
//!
//! # Responsibilities
//! - Gate mounted applications on request metadata (method, path, headers)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Header name lookup is case-insensitive (per HTTP spec); value comparison is exact
//! - Path prefix matching is case-sensitive
//! - An empty composite condition always matches
//! - Evaluation is pure and total: no I/O and nothing to return but the bool

use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{HeaderName, Method};

/// Trait for gating mounted applications on request metadata.
///
/// Implemented for any `Fn(&Parts) -> bool` closure, so callers can supply
/// arbitrary predicates without naming a type.
pub trait Condition: Send + Sync {
    /// Returns true if the guarded application may be offered this request.
    fn evaluate(&self, parts: &Parts) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&Parts) -> bool + Send + Sync,
{
    fn evaluate(&self, parts: &Parts) -> bool {
        self(parts)
    }
}

/// Matches every request. Mounts declared without a condition use this.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Condition for Always {
    fn evaluate(&self, _parts: &Parts) -> bool {
        true
    }
}

/// Matches when a request header equals an expected value.
///
/// The header name is looked up case-insensitively; the value must match
/// exactly.
#[derive(Debug, Clone)]
pub struct HeaderCondition {
    name: HeaderName,
    expected: String,
}

impl HeaderCondition {
    /// Create a new header condition.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid header name. Conditions are built once
    /// at startup, so an invalid name fails construction, not dispatch.
    pub fn new(name: &str, expected: impl Into<String>) -> Self {
        Self {
            name: HeaderName::try_from(name).expect("valid header name"),
            expected: expected.into(),
        }
    }
}

impl Condition for HeaderCondition {
    fn evaluate(&self, parts: &Parts) -> bool {
        parts
            .headers
            .get(&self.name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == self.expected)
            .unwrap_or(false)
    }
}

/// Matches on the request method.
#[derive(Debug, Clone)]
pub struct MethodCondition {
    method: Method,
}

impl MethodCondition {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Condition for MethodCondition {
    fn evaluate(&self, parts: &Parts) -> bool {
        parts.method == self.method
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixCondition {
    prefix: String,
}

impl PathPrefixCondition {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Condition for PathPrefixCondition {
    fn evaluate(&self, parts: &Parts) -> bool {
        parts.uri.path().starts_with(&self.prefix)
    }
}

/// Combines multiple conditions with AND semantics.
///
/// Evaluation short-circuits on the first failing condition, in declaration
/// order. An empty composite matches every request.
pub struct AndCondition {
    conditions: Vec<Arc<dyn Condition>>,
}

impl AndCondition {
    pub fn new(conditions: Vec<Arc<dyn Condition>>) -> Self {
        Self { conditions }
    }
}

impl Condition for AndCondition {
    fn evaluate(&self, parts: &Parts) -> bool {
        // All conditions must pass (AND)
        self.conditions.iter().all(|c| c.evaluate(parts))
    }
}
