//! Cascading request dispatcher library.

pub mod http;
pub mod routing;

pub use http::middleware::cascade_middleware;
pub use http::CascadeServer;
pub use routing::builder::{BuildError, CascadeBuilder};
pub use routing::cascade::{pass, Cascade, CascadeOutcome, X_CASCADE};
pub use routing::condition::{
    Always, AndCondition, Condition, HeaderCondition, MethodCondition, PathPrefixCondition,
};
