//! Unary operator builder

use std::fmt::{self, Display, Formatter};

use super::ast::{Expr, UnaryExpr, UnaryOp};
use super::builder::Builder;

/// Negate an expression: `-expr`
pub fn neg(expr: impl Builder<Expr>) -> UnaryExprBuilder {
    UnaryExprBuilder::new(UnaryOp::Minus, expr)
}

/// Unary plus: `+expr`
pub fn id(expr: impl Builder<Expr>) -> UnaryExprBuilder {
    UnaryExprBuilder::new(UnaryOp::Plus, expr)
}

#[derive(Debug, Clone)]
pub struct UnaryExprBuilder {
    internal: UnaryExpr,
}

impl UnaryExprBuilder {
    pub fn new(op: UnaryOp, expr: impl Builder<Expr>) -> Self {
        Self {
            internal: UnaryExpr {
                op,
                expr: Box::new(expr.build()),
            },
        }
    }

    pub fn op(mut self, op: UnaryOp) -> Self {
        self.internal.op = op;
        self
    }

    pub fn expr(mut self, expr: impl Builder<Expr>) -> Self {
        self.internal.expr = Box::new(expr.build());
        self
    }
}

impl Builder<Expr> for UnaryExprBuilder {
    fn build(self) -> Expr {
        Expr::Unary(self.internal)
    }
}

impl Display for UnaryExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promql::{mul, vector};

    #[test]
    fn test_negation() {
        assert_eq!(neg(vector("x").unwrap()).to_string(), "-x");
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(neg(neg(vector("x").unwrap())).to_string(), "--x");
    }

    #[test]
    fn test_identity() {
        assert_eq!(id(vector("x").unwrap()).to_string(), "+x");
        assert_eq!(
            id(vector("x").unwrap()).op(UnaryOp::Minus).to_string(),
            "-x"
        );
    }

    #[test]
    fn test_negated_binary() {
        let expr = neg(mul(vector("a").unwrap(), vector("b").unwrap()));
        assert_eq!(expr.to_string(), "-(a * b)");
    }

    #[test]
    fn test_replace_operand() {
        let expr = neg(vector("a").unwrap()).expr(vector("b").unwrap());
        assert_eq!(expr.to_string(), "-b");
    }
}
