//! Number and string literal builders

use std::fmt::{self, Display, Formatter};

use super::ast::{Expr, NumberLiteralExpr, StringLiteralExpr};
use super::builder::Builder;

/// A number literal
pub fn n(value: f64) -> NumberLiteralExprBuilder {
    NumberLiteralExprBuilder::new().value(value)
}

/// A string literal
pub fn s(value: impl Into<String>) -> StringLiteralExprBuilder {
    StringLiteralExprBuilder::new().value(value)
}

#[derive(Debug, Clone, Default)]
pub struct NumberLiteralExprBuilder {
    internal: NumberLiteralExpr,
}

impl NumberLiteralExprBuilder {
    /// Start from `0`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: f64) -> Self {
        self.internal.value = value;
        self
    }
}

impl Builder<Expr> for NumberLiteralExprBuilder {
    fn build(self) -> Expr {
        Expr::NumberLiteral(self.internal)
    }
}

impl Display for NumberLiteralExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringLiteralExprBuilder {
    internal: StringLiteralExpr,
}

impl StringLiteralExprBuilder {
    /// Start from the empty string
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.internal.value = value.into();
        self
    }
}

impl Builder<Expr> for StringLiteralExprBuilder {
    fn build(self) -> Expr {
        Expr::StringLiteral(self.internal)
    }
}

impl Display for StringLiteralExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(n(3600.0).to_string(), "3600");
        assert_eq!(n(0.5).to_string(), "0.5");
        assert_eq!(n(-1.0).to_string(), "-1");
        assert_eq!(NumberLiteralExprBuilder::new().to_string(), "0");
    }

    #[test]
    fn test_string_literal_renders_raw() {
        assert_eq!(s("instance").to_string(), "instance");
        assert_eq!(StringLiteralExprBuilder::new().to_string(), "");
    }

    #[test]
    fn test_literal_nodes() {
        assert_eq!(
            n(2.5).build(),
            Expr::NumberLiteral(NumberLiteralExpr { value: 2.5 })
        );
        assert_eq!(
            s("x").build(),
            Expr::StringLiteral(StringLiteralExpr {
                value: "x".to_string()
            })
        );
    }
}
