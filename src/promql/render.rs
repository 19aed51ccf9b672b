//! Query Text Rendering
//!
//! Turns an expression tree back into PromQL text. Every node type implements
//! [`std::fmt::Display`]; [`render`] is a convenience wrapper.
//!
//! Parentheses are only emitted where the tree shape would otherwise be lost:
//!
//! ```text
//! (a + b) * c        binary operand of lower precedence
//! a - (b - c)        right operand of a left-associative operator
//! (-a) ^ b           unary left operand of `^`
//! -(a + b)           binary operand of a unary operator
//! (a + b)[5m:]       subquery over a compound expression
//! ```
//!
//! String literals render raw on their own. Contexts that embed them in query
//! text (label matchers, function arguments, aggregation parameters) quote them.

use std::fmt::{self, Display, Formatter};

use super::ast::*;

/// Render an expression to PromQL text
pub fn render(expr: &Expr) -> String {
    expr.to_string()
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLiteral(expr) => expr.fmt(f),
            Self::StringLiteral(expr) => expr.fmt(f),
            Self::Vector(expr) => expr.fmt(f),
            Self::Subquery(expr) => expr.fmt(f),
            Self::Unary(expr) => expr.fmt(f),
            Self::Aggregation(expr) => expr.fmt(f),
            Self::Binary(expr) => expr.fmt(f),
            Self::FuncCall(expr) => expr.fmt(f),
        }
    }
}

impl Display for NumberLiteralExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.value))
    }
}

impl Display for StringLiteralExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Display for LabelSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.operator, quote(&self.value))
    }
}

impl Display for LabelMatchingOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for AggregationOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for VectorExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.metric)?;

        if !self.labels.is_empty() {
            f.write_str("{")?;
            for (i, label) in self.labels.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                label.fmt(f)?;
            }
            f.write_str("}")?;
        }

        if let Some(range) = present(&self.range) {
            write!(f, "[{}]", range)?;
        }

        write_modifiers(f, &self.offset, &self.at)
    }
}

impl Display for SubqueryExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if subquery_needs_parens(&self.expr) {
            write!(f, "({})", self.expr)?;
        } else {
            self.expr.fmt(f)?;
        }

        if let Some(range) = present(&self.range) {
            let resolution = present(&self.resolution).unwrap_or_default();
            write!(f, "[{}:{}]", range, resolution)?;
        }

        write_modifiers(f, &self.offset, &self.at)
    }
}

impl Display for UnaryExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.expr.as_ref() {
            Expr::Binary(_) => write!(f, "{}({})", self.op, self.expr),
            expr => write!(f, "{}{}", self.op, expr),
        }
    }
}

impl Display for AggregationExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.op.fmt(f)?;

        if !self.without.is_empty() {
            write!(f, " without ({}) ", self.without.join(", "))?;
        }
        if !self.by.is_empty() {
            write!(f, " by ({}) ", self.by.join(", "))?;
        }

        f.write_str("(")?;
        if let Some(param) = &self.param {
            write_argument(f, param)?;
            f.write_str(", ")?;
        }
        write_argument(f, &self.expr)?;
        f.write_str(")")
    }
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_operand(f, self.op, &self.left, Side::Left)?;
        write!(f, " {} ", self.op)?;

        if let Some(match_type) = self.match_type {
            let keyword = match match_type {
                MatchType::On => "on",
                MatchType::Ignoring => "ignoring",
            };
            write!(f, "{}({}) ", keyword, self.match_labels.join(", "))?;
        }

        if let Some(modifier) = self.group_modifier {
            let keyword = match modifier {
                GroupModifier::Left => "group_left",
                GroupModifier::Right => "group_right",
            };
            f.write_str(keyword)?;
            if !self.group_labels.is_empty() {
                write!(f, "({})", self.group_labels.join(", "))?;
            }
            f.write_str(" ")?;
        }

        write_operand(f, self.op, &self.right, Side::Right)
    }
}

impl Display for FuncCallExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function)?;
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_argument(f, arg)?;
        }
        f.write_str(")")
    }
}

/// Format a float the way PromQL reads it back: shortest round-trip decimal,
/// `NaN` and `Inf` for the non-finite values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Double-quote a string, escaping what PromQL would otherwise misread
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn write_modifiers(
    f: &mut Formatter<'_>,
    offset: &Option<String>,
    at: &Option<String>,
) -> fmt::Result {
    if let Some(offset) = present(offset) {
        write!(f, " offset {}", offset)?;
    }
    if let Some(at) = present(at) {
        write!(f, " @ {}", at)?;
    }
    Ok(())
}

/// Arguments of calls and aggregations, where string literals are quoted
fn write_argument(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::StringLiteral(literal) => f.write_str(&quote(&literal.value)),
        expr => expr.fmt(f),
    }
}

fn write_operand(f: &mut Formatter<'_>, parent: BinaryOp, operand: &Expr, side: Side) -> fmt::Result {
    if operand_needs_parens(parent, operand, side) {
        write!(f, "({})", operand)
    } else {
        operand.fmt(f)
    }
}

fn is_negative_number(expr: &Expr) -> bool {
    matches!(expr, Expr::NumberLiteral(n) if n.value.is_sign_negative() && !n.value.is_nan())
}

fn operand_needs_parens(parent: BinaryOp, operand: &Expr, side: Side) -> bool {
    match operand {
        Expr::Binary(inner) => {
            let (outer, inner) = (parent.precedence(), inner.op.precedence());
            if inner != outer {
                return inner < outer;
            }
            // Same precedence: only the side the operator associates towards is free.
            match side {
                Side::Left => parent.is_right_associative(),
                Side::Right => !parent.is_right_associative(),
            }
        }
        // -a ^ b parses as -(a ^ b)
        Expr::Unary(_) => parent == BinaryOp::Pow && side == Side::Left,
        expr if is_negative_number(expr) => parent == BinaryOp::Pow && side == Side::Left,
        _ => false,
    }
}

fn subquery_needs_parens(expr: &Expr) -> bool {
    match expr {
        Expr::Binary(_) | Expr::Unary(_) | Expr::Subquery(_) => true,
        Expr::Vector(vector) => present(&vector.offset).is_some() || present(&vector.at).is_some(),
        expr => is_negative_number(expr),
    }
}
