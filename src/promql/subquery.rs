//! Subquery builder
//!
//! A subquery evaluates its inner expression over `range` at every
//! `resolution` step, producing a range vector:
//!
//! ```text
//! max_over_time(rate(http_requests_total[5m])[30m:1m])
//! ```

use std::fmt::{self, Display, Formatter};

use super::ast::{Expr, SubqueryExpr};
use super::builder::Builder;

/// Start a subquery over the given expression
pub fn subquery(expr: impl Builder<Expr>) -> SubqueryExprBuilder {
    SubqueryExprBuilder::new(expr)
}

#[derive(Debug, Clone)]
pub struct SubqueryExprBuilder {
    internal: SubqueryExpr,
}

impl SubqueryExprBuilder {
    pub fn new(expr: impl Builder<Expr>) -> Self {
        Self {
            internal: SubqueryExpr::new(expr.build()),
        }
    }

    /// Replace the inner expression
    pub fn expr(mut self, expr: impl Builder<Expr>) -> Self {
        self.internal.expr = Box::new(expr.build());
        self
    }

    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.internal.offset = Some(offset.into());
        self
    }

    pub fn at(mut self, at: impl Into<String>) -> Self {
        self.internal.at = Some(at.into());
        self
    }

    /// How far back the subquery reaches
    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.internal.range = Some(range.into());
        self
    }

    /// Step between evaluations; the empty string selects the default step
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.internal.resolution = Some(resolution.into());
        self
    }
}

impl Builder<Expr> for SubqueryExprBuilder {
    fn build(self) -> Expr {
        Expr::Subquery(self.internal)
    }
}

impl Display for SubqueryExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promql::{add, n, rate, vector};

    #[test]
    fn test_subquery_with_empty_resolution() {
        let query = subquery(vector("x").unwrap().range("5m"))
            .range("30m")
            .resolution("");

        assert_eq!(query.to_string(), "x[5m][30m:]");
    }

    #[test]
    fn test_subquery_without_resolution() {
        let query = subquery(rate(vector("x").unwrap().range("5m"))).range("1h");
        assert_eq!(query.to_string(), "rate(x[5m])[1h:]");
    }

    #[test]
    fn test_subquery_modifiers() {
        let query = subquery(rate(vector("x").unwrap().range("5m")))
            .range("1h")
            .resolution("1m")
            .offset("1d")
            .at("end()");

        assert_eq!(query.to_string(), "rate(x[5m])[1h:1m] offset 1d @ end()");
    }

    #[test]
    fn test_subquery_over_binary() {
        let query = subquery(add(vector("a").unwrap(), n(1.0))).range("10m");
        assert_eq!(query.to_string(), "(a + 1)[10m:]");
    }

    #[test]
    fn test_replace_inner_expression() {
        let query = subquery(vector("old").unwrap())
            .expr(vector("new").unwrap())
            .range("5m");

        assert_eq!(query.to_string(), "new[5m:]");
    }

    #[test]
    fn test_nested_subqueries() {
        let inner = subquery(vector("x").unwrap()).range("5m");
        let outer = subquery(inner).range("1h").resolution("5m");

        assert_eq!(outer.to_string(), "(x[5m:])[1h:5m]");
    }
}
