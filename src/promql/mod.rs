//! PromQL expression builder
//!
//! Composes PromQL expressions from typed builders and renders them to query
//! text:
//!
//! - **AST**: the closed [`Expr`] tree and its node types
//! - **Builders**: one fluent builder per node kind plus short helper functions
//! - **Render**: PromQL text through `Display`
//!
//! Builders are consumed by [`Builder::build`]; `to_string()` renders without
//! consuming.
//!
//! # Example
//!
//! ```rust
//! use promql_builder::promql::{rate, sum, vector, Builder};
//!
//! let requests = vector("demo_api_request_duration_seconds_count")?
//!     .label("job", "api")?
//!     .range("5m");
//!
//! let query = sum(rate(requests)).by(["instance"]);
//! assert_eq!(
//!     query.to_string(),
//!     r#"sum by (instance) (rate(demo_api_request_duration_seconds_count{job="api"}[5m]))"#
//! );
//!
//! let expr = query.build();
//! assert_eq!(expr.kind(), "aggregationExpr");
//! # Ok::<(), promql_builder::promql::ValidationError>(())
//! ```

mod aggregation;
mod ast;
mod binary;
mod builder;
mod error;
mod function;
mod literal;
mod render;
mod subquery;
mod unary;
mod vector;

pub use aggregation::{
    avg, bottomk, count, count_values, group, limit_ratio, limitk, max, min, quantile, stddev,
    stdvar, sum, topk, AggregationExprBuilder,
};
pub use ast::{
    AggregationExpr, AggregationOp, BinaryExpr, BinaryOp, Expr, FuncCallExpr, GroupModifier,
    LabelMatchingOperator, LabelSelector, MatchType, NumberLiteralExpr, StringLiteralExpr,
    SubqueryExpr, UnaryExpr, UnaryOp, VectorExpr,
};
pub use binary::{
    add, and, atan2, div, eq, gt, gte, lt, lte, modulo, mul, neq, or, pow, sub, unless,
    BinaryExprBuilder,
};
pub use builder::Builder;
pub use error::{ExprError, ExprResult, ValidationError};
pub use function::{
    abs, absent, absent_over_time, acos, acosh, asin, asinh, atan, atanh, avg_over_time, ceil,
    changes, clamp, clamp_max, clamp_min, cos, cosh, count_over_time, day_of_month,
    day_of_month_for, day_of_week, day_of_week_for, day_of_year, day_of_year_for, days_in_month,
    days_in_month_for, deg, delta, deriv, exp, floor, histogram_avg, histogram_count,
    histogram_fraction, histogram_quantile, histogram_stddev, histogram_stdvar, histogram_sum,
    hour, hour_for, idelta, increase, irate, label_join, label_replace, last_over_time, ln, log10,
    log2, max_over_time, min_over_time, minute, minute_for, month, month_for, pi, predict_linear,
    present_over_time, quantile_over_time, rad, rate, resets, round, round_to, scalar, sgn, sin,
    sinh, sort, sort_desc, sqrt, stddev_over_time, stdvar_over_time, sum_over_time, tan, tanh,
    time, timestamp, vect, year, year_for, FuncCallExprBuilder,
};
pub use literal::{n, s, NumberLiteralExprBuilder, StringLiteralExprBuilder};
pub use render::{format_number, quote, render};
pub use subquery::{subquery, SubqueryExprBuilder};
pub use unary::{id, neg, UnaryExprBuilder};
pub use vector::{vector, LabelSelectorBuilder, VectorExprBuilder};
