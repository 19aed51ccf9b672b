//! Binary operator builders
//!
//! Operands are parenthesized on render only where operator precedence
//! requires it, so `mul(add(a, b), c)` renders `(a + b) * c` while
//! `add(a, mul(b, c))` renders `a + b * c`.

use std::fmt::{self, Display, Formatter};

use super::ast::{BinaryExpr, BinaryOp, Expr, GroupModifier, MatchType};
use super::builder::Builder;

macro_rules! binary_helpers {
    ($($(#[$doc:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(left: impl Builder<Expr>, right: impl Builder<Expr>) -> BinaryExprBuilder {
                BinaryExprBuilder::new(BinaryOp::$op, left, right)
            }
        )*
    };
}

binary_helpers! {
    /// Addition
    add => Add,
    /// Subtraction
    sub => Sub,
    /// Multiplication
    mul => Mul,
    /// Division
    div => Div,
    /// Modulo
    modulo => Mod,
    /// Power/exponentiation
    pow => Pow,
    /// "equal" comparison
    eq => Eql,
    /// "not-equal" comparison
    neq => Neq,
    /// "greater-than" comparison
    gt => Gtr,
    /// "less-than" comparison
    lt => Lss,
    /// "greater-or-equal" comparison
    gte => Gte,
    /// "less-or-equal" comparison
    lte => Lte,
    /// Intersection of two vectors
    and => And,
    /// Union of two vectors
    or => Or,
    /// Elements of the left vector without a match in the right one
    unless => Unless,
    /// Arc tangent of the two operands
    atan2 => Atan2,
}

#[derive(Debug, Clone)]
pub struct BinaryExprBuilder {
    internal: BinaryExpr,
}

impl BinaryExprBuilder {
    pub fn new(op: BinaryOp, left: impl Builder<Expr>, right: impl Builder<Expr>) -> Self {
        Self {
            internal: BinaryExpr::new(op, left.build(), right.build()),
        }
    }

    pub fn op(mut self, op: BinaryOp) -> Self {
        self.internal.op = op;
        self
    }

    pub fn left(mut self, left: impl Builder<Expr>) -> Self {
        self.internal.left = Box::new(left.build());
        self
    }

    pub fn right(mut self, right: impl Builder<Expr>) -> Self {
        self.internal.right = Box::new(right.build());
        self
    }

    /// Match only on the listed labels.
    /// See https://prometheus.io/docs/prometheus/latest/querying/operators/#one-to-one-vector-matches
    pub fn on<L>(self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.matching(MatchType::On, labels)
    }

    /// Ignore the listed labels when matching
    pub fn ignoring<L>(self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.matching(MatchType::Ignoring, labels)
    }

    /// Many-to-one matching, carrying the listed labels over from the right side.
    /// See https://prometheus.io/docs/prometheus/latest/querying/operators/#many-to-one-and-one-to-many-vector-matches
    pub fn group_left<L>(self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.grouping(GroupModifier::Left, labels)
    }

    /// One-to-many matching, carrying the listed labels over from the left side
    pub fn group_right<L>(self, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.grouping(GroupModifier::Right, labels)
    }

    fn matching<L>(mut self, match_type: MatchType, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.internal.match_type = Some(match_type);
        self.internal.match_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    fn grouping<L>(mut self, modifier: GroupModifier, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<String>,
    {
        self.internal.group_modifier = Some(modifier);
        self.internal.group_labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl Builder<Expr> for BinaryExprBuilder {
    fn build(self) -> Expr {
        Expr::Binary(self.internal)
    }
}

impl Display for BinaryExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}
