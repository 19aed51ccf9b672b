//! Aggregation operator builders
//!
//! See https://prometheus.io/docs/prometheus/latest/querying/operators/#aggregation-operators
//!
//! ```rust
//! use promql_builder::promql::{rate, sum, vector};
//!
//! let query = sum(rate(vector("http_requests_total")?.range("5m"))).by(["job"]);
//! assert_eq!(query.to_string(), "sum by (job) (rate(http_requests_total[5m]))");
//! # Ok::<(), promql_builder::promql::ValidationError>(())
//! ```

use std::fmt::{self, Display, Formatter};

use super::ast::{AggregationExpr, AggregationOp, Expr};
use super::builder::Builder;
use super::literal::{n, s};

/// Sum over dimensions
pub fn sum(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Sum, vector)
}

/// Minimum over dimensions
pub fn min(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Min, vector)
}

/// Maximum over dimensions
pub fn max(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Max, vector)
}

/// Average over dimensions
pub fn avg(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Avg, vector)
}

/// All values in the resulting vector are 1
pub fn group(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Group, vector)
}

/// Population standard deviation over dimensions
pub fn stddev(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Stddev, vector)
}

/// Population standard variance over dimensions
pub fn stdvar(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Stdvar, vector)
}

/// Count number of elements in the vector
pub fn count(vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Count, vector)
}

/// φ-quantile (0 ≤ φ ≤ 1) over dimensions
pub fn quantile(phi: f64, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Quantile, vector).param(n(phi))
}

/// Count number of elements with the same value, stored in `label`
pub fn count_values(label: impl Into<String>, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::CountValues, vector).param(s(label))
}

/// Smallest k elements by sample value
pub fn bottomk(k: f64, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Bottomk, vector).param(n(k))
}

/// Largest k elements by sample value
pub fn topk(k: f64, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Topk, vector).param(n(k))
}

/// Sample k elements
pub fn limitk(k: f64, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::Limitk, vector).param(n(k))
}

/// Sample elements with approximately ratio `r` if `r > 0`, and the complement
/// of such samples if `r = -(1.0 - r)`
pub fn limit_ratio(r: f64, vector: impl Builder<Expr>) -> AggregationExprBuilder {
    AggregationExprBuilder::new(AggregationOp::LimitRatio, vector).param(n(r))
}

#[derive(Debug, Clone)]
pub struct AggregationExprBuilder {
    internal: AggregationExpr,
}

impl AggregationExprBuilder {
    pub fn new(op: AggregationOp, expr: impl Builder<Expr>) -> Self {
        Self {
            internal: AggregationExpr::new(op, expr.build()),
        }
    }

    pub fn op(mut self, op: AggregationOp) -> Self {
        self.internal.op = op;
        self
    }

    pub fn expr(mut self, expr: impl Builder<Expr>) -> Self {
        self.internal.expr = Box::new(expr.build());
        self
    }

    /// Parameter for operators that take one (`topk`, `quantile`, ...)
    pub fn param(mut self, param: impl Builder<Expr>) -> Self {
        self.internal.param = Some(Box::new(param.build()));
        self
    }

    /// Keep only the listed labels. Clears any `without` clause.
    pub fn by<L>(mut self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.internal.by = labels.into_iter().map(Into::into).collect();
        self.internal.without.clear();
        self
    }

    /// Drop the listed labels and keep the rest. Clears any `by` clause.
    pub fn without<L>(mut self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.internal.without = labels.into_iter().map(Into::into).collect();
        self.internal.by.clear();
        self
    }
}

impl Builder<Expr> for AggregationExprBuilder {
    fn build(self) -> Expr {
        Expr::Aggregation(self.internal)
    }
}

impl Display for AggregationExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promql::{rate, vector};

    #[test]
    fn test_sum_of_rate() {
        let requests = vector("demo_api_request_duration_seconds_count")
            .unwrap()
            .range("5m");

        let inner = rate(requests.clone());
        assert_eq!(
            inner.to_string(),
            "rate(demo_api_request_duration_seconds_count[5m])"
        );

        let query = sum(rate(requests));
        assert_eq!(
            query.to_string(),
            "sum(rate(demo_api_request_duration_seconds_count[5m]))"
        );
    }

    #[test]
    fn test_by_and_without_are_exclusive() {
        let up = || vector("up").unwrap();

        assert_eq!(
            count(up()).by(["job", "instance"]).to_string(),
            "count by (job, instance) (up)"
        );
        assert_eq!(
            count(up()).by(["job"]).without(["instance"]).to_string(),
            "count without (instance) (up)"
        );
        assert_eq!(
            count(up()).without(["instance"]).by(["job"]).to_string(),
            "count by (job) (up)"
        );
    }

    #[test]
    fn test_parameterized_operators() {
        let load = || vector("node_load1").unwrap();

        assert_eq!(topk(5.0, load()).to_string(), "topk(5, node_load1)");
        assert_eq!(bottomk(3.0, load()).to_string(), "bottomk(3, node_load1)");
        assert_eq!(limitk(10.0, load()).to_string(), "limitk(10, node_load1)");
        assert_eq!(
            limit_ratio(0.1, load()).to_string(),
            "limit_ratio(0.1, node_load1)"
        );
        assert_eq!(
            quantile(0.95, load()).by(["cpu"]).to_string(),
            "quantile by (cpu) (0.95, node_load1)"
        );
        assert_eq!(
            count_values("version", vector("build_info").unwrap()).to_string(),
            r#"count_values("version", build_info)"#
        );
    }

    #[test]
    fn test_plain_operators() {
        let up = || vector("up").unwrap();

        assert_eq!(min(up()).to_string(), "min(up)");
        assert_eq!(max(up()).to_string(), "max(up)");
        assert_eq!(avg(up()).to_string(), "avg(up)");
        assert_eq!(group(up()).to_string(), "group(up)");
        assert_eq!(stddev(up()).to_string(), "stddev(up)");
        assert_eq!(stdvar(up()).to_string(), "stdvar(up)");
        assert_eq!(sum(up()).op(AggregationOp::Max).to_string(), "max(up)");
    }
}
