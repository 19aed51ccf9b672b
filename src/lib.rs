//! # promql-builder
//!
//! Typed builders for composing PromQL expressions and rendering them to query
//! text.
//!
//! ## Features
//!
//! - **Typed expression tree**: vector selectors, literals, subqueries, unary and
//!   binary operators, aggregations and function calls
//! - **Fluent builders**: one builder per node kind, composable through the
//!   [`promql::Builder`] trait
//! - **Minimal parentheses**: rendering follows PromQL operator precedence
//! - **JSON encoding**: trees can be stored and decoded with validation
//!
//! ## Modules
//!
//! - [`promql`]: Expression tree, builders and rendering
//! - [`config`]: Configuration for the `promql` command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use promql_builder::promql::{gt, histogram_quantile, n, rate, sum, vector};
//!
//! let buckets = vector("http_request_duration_seconds_bucket")?
//!     .label("job", "api")?
//!     .range("5m");
//!
//! let p99 = histogram_quantile(0.99, sum(rate(buckets)).by(["le"]));
//! let alert = gt(p99, n(0.5));
//!
//! assert_eq!(
//!     alert.to_string(),
//!     r#"histogram_quantile(0.99, sum by (le) (rate(http_request_duration_seconds_bucket{job="api"}[5m]))) > 0.5"#
//! );
//! # Ok::<(), promql_builder::promql::ValidationError>(())
//! ```

pub mod config;
pub mod promql;

// Re-export top-level types for convenience
pub use promql::{Builder, Expr, ExprError, ExprResult, ValidationError};

pub use config::{Config, ConfigError, LoggingConfig, OutputConfig, OutputFormat};
