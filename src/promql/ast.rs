//! PromQL Expression Tree
//!
//! Defines the node types that make up a PromQL expression. Every node owns its
//! children outright, so a tree never shares or cycles.
//!
//! # Example Expressions
//!
//! ```text
//! http_requests_total{job="api",code!="200"}[5m] offset 1d
//! sum by (job) (rate(http_requests_total[5m]))
//! max_over_time(rate(errors_total[1m])[30m:1m])
//! ```
//!
//! Nodes are encoded to JSON with a `type` tag on the expression, which lets
//! trees be stored or exchanged outside of Rust code.

use serde::{Deserialize, Serialize};

use super::error::{ExprResult, ValidationError};

/// A PromQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// Float literal
    #[serde(rename = "numberLiteralExpr")]
    NumberLiteral(NumberLiteralExpr),
    /// String literal
    #[serde(rename = "stringLiteralExpr")]
    StringLiteral(StringLiteralExpr),
    /// Instant or range vector selector
    #[serde(rename = "vectorExpr")]
    Vector(VectorExpr),
    /// Subquery over an inner expression
    #[serde(rename = "subqueryExpr")]
    Subquery(SubqueryExpr),
    /// Unary `+` or `-`
    #[serde(rename = "unaryExpr")]
    Unary(UnaryExpr),
    /// Aggregation operator (`sum`, `topk`, ...)
    #[serde(rename = "aggregationExpr")]
    Aggregation(AggregationExpr),
    /// Binary operator
    #[serde(rename = "binaryExpr")]
    Binary(BinaryExpr),
    /// Function call
    #[serde(rename = "funcCallExpr")]
    FuncCall(FuncCallExpr),
}

impl Expr {
    /// Name of the node kind, as used in the JSON `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NumberLiteral(_) => "numberLiteralExpr",
            Self::StringLiteral(_) => "stringLiteralExpr",
            Self::Vector(_) => "vectorExpr",
            Self::Subquery(_) => "subqueryExpr",
            Self::Unary(_) => "unaryExpr",
            Self::Aggregation(_) => "aggregationExpr",
            Self::Binary(_) => "binaryExpr",
            Self::FuncCall(_) => "funcCallExpr",
        }
    }

    /// Check the non-empty constraints the builders enforce, for the whole tree.
    ///
    /// Trees produced by the builders always pass; this exists for trees that
    /// were constructed by hand or decoded from JSON.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::NumberLiteral(_) | Self::StringLiteral(_) => Ok(()),
            Self::Vector(vector) => vector.validate(),
            Self::Subquery(subquery) => subquery.expr.validate(),
            Self::Unary(unary) => unary.expr.validate(),
            Self::Aggregation(agg) => {
                agg.expr.validate()?;
                match &agg.param {
                    Some(param) => param.validate(),
                    None => Ok(()),
                }
            }
            Self::Binary(binary) => {
                binary.left.validate()?;
                binary.right.validate()
            }
            Self::FuncCall(call) => {
                if call.function.is_empty() {
                    return Err(ValidationError::EmptyFunction);
                }
                call.args.iter().try_for_each(Expr::validate)
            }
        }
    }

    /// Encode the tree as pretty-printed JSON
    pub fn to_json(&self) -> ExprResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a tree from JSON and validate it
    pub fn from_json(input: &str) -> ExprResult<Self> {
        let expr: Expr = serde_json::from_str(input)?;

        if let Err(e) = expr.validate() {
            tracing::debug!(kind = expr.kind(), error = %e, "Rejected decoded expression");
            return Err(e.into());
        }

        tracing::debug!(kind = expr.kind(), "Decoded expression");
        Ok(expr)
    }
}

macro_rules! impl_from_node {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for Expr {
                fn from(node: $node) -> Self {
                    Expr::$variant(node)
                }
            }
        )*
    };
}

impl_from_node! {
    NumberLiteralExpr => NumberLiteral,
    StringLiteralExpr => StringLiteral,
    VectorExpr => Vector,
    SubqueryExpr => Subquery,
    UnaryExpr => Unary,
    AggregationExpr => Aggregation,
    BinaryExpr => Binary,
    FuncCallExpr => FuncCall,
}

/// A number literal.
/// See https://prometheus.io/docs/prometheus/latest/querying/basics/#float-literals-and-time-durations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteralExpr {
    pub value: f64,
}

/// A string literal.
/// See https://prometheus.io/docs/prometheus/latest/querying/basics/#string-literals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteralExpr {
    pub value: String,
}

/// Instant and range vector selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorExpr {
    /// Metric name
    pub metric: String,
    /// Label matchers, in the order they were added
    #[serde(default)]
    pub labels: Vec<LabelSelector>,
    /// Time offset modifier.
    /// https://prometheus.io/docs/prometheus/latest/querying/basics/#offset-modifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    /// Evaluation time (`@` modifier), a unix timestamp or `start()`/`end()`.
    /// https://prometheus.io/docs/prometheus/latest/querying/basics/#modifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    /// Range of samples back from the current instant. Present on range vectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl VectorExpr {
    pub(crate) fn new(metric: String) -> Self {
        Self {
            metric,
            labels: Vec::new(),
            offset: None,
            at: None,
            range: None,
        }
    }

    /// Whether this selects a range vector
    pub fn is_range(&self) -> bool {
        self.range.as_deref().is_some_and(|r| !r.is_empty())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.metric.is_empty() {
            return Err(ValidationError::EmptyMetric);
        }
        self.labels.iter().try_for_each(LabelSelector::validate)
    }
}

/// A single label matcher inside a vector selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelector {
    /// Label name
    pub name: String,
    /// Value to match against
    pub value: String,
    /// Matching operator
    pub operator: LabelMatchingOperator,
}

impl LabelSelector {
    pub(crate) fn new(
        name: String,
        operator: LabelMatchingOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name,
            value: value.into(),
            operator,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            Err(ValidationError::EmptyLabelName)
        } else {
            Ok(())
        }
    }
}

/// Label matching operators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelMatchingOperator {
    /// Equal to
    #[default]
    #[serde(rename = "=")]
    Equal,
    /// Not equal to
    #[serde(rename = "!=")]
    NotEqual,
    /// Matches the regular expression
    #[serde(rename = "=~")]
    MatchRegexp,
    /// Does not match the regular expression
    #[serde(rename = "!~")]
    NotMatchRegexp,
}

impl LabelMatchingOperator {
    /// Query text of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::MatchRegexp => "=~",
            Self::NotMatchRegexp => "!~",
        }
    }
}

/// A subquery.
/// See https://prometheus.io/docs/prometheus/latest/querying/basics/#subquery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubqueryExpr {
    /// Inner expression evaluated at each step
    pub expr: Box<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Step between evaluations. Absent or empty means the default resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl SubqueryExpr {
    pub(crate) fn new(expr: Expr) -> Self {
        Self {
            expr: Box::new(expr),
            offset: None,
            at: None,
            range: None,
            resolution: None,
        }
    }
}

/// A unary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

/// An aggregation over the dimensions of a vector.
/// See https://prometheus.io/docs/prometheus/latest/querying/operators/#aggregation-operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationExpr {
    pub op: AggregationOp,
    pub expr: Box<Expr>,
    /// Parameter for `topk`, `quantile`, `count_values` and friends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<Box<Expr>>,
    /// Labels kept in the result; all others are dropped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by: Vec<String>,
    /// Labels removed from the result; all others are kept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub without: Vec<String>,
}

impl AggregationExpr {
    pub(crate) fn new(op: AggregationOp, expr: Expr) -> Self {
        Self {
            op,
            expr: Box::new(expr),
            param: None,
            by: Vec::new(),
            without: Vec::new(),
        }
    }
}

/// Aggregation operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationOp {
    Sum,
    Min,
    Max,
    Avg,
    Stddev,
    Stdvar,
    Count,
    Group,
    CountValues,
    Bottomk,
    Topk,
    Quantile,
    Limitk,
    LimitRatio,
}

impl AggregationOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Avg => "avg",
            Self::Stddev => "stddev",
            Self::Stdvar => "stdvar",
            Self::Count => "count",
            Self::Group => "group",
            Self::CountValues => "count_values",
            Self::Bottomk => "bottomk",
            Self::Topk => "topk",
            Self::Quantile => "quantile",
            Self::Limitk => "limitk",
            Self::LimitRatio => "limit_ratio",
        }
    }
}

/// A binary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    /// Vector matching keyword.
    /// https://prometheus.io/docs/prometheus/latest/querying/operators/#vector-matching-keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_modifier: Option<GroupModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_labels: Vec<String>,
}

impl BinaryExpr {
    pub(crate) fn new(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
            match_type: None,
            match_labels: Vec::new(),
            group_modifier: None,
            group_labels: Vec::new(),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "^")]
    Pow,
    #[serde(rename = "==")]
    Eql,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = ">")]
    Gtr,
    #[serde(rename = "<")]
    Lss,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "unless")]
    Unless,
    #[serde(rename = "atan2")]
    Atan2,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eql => "==",
            Self::Neq => "!=",
            Self::Gtr => ">",
            Self::Lss => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::And => "and",
            Self::Or => "or",
            Self::Unless => "unless",
            Self::Atan2 => "atan2",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And | Self::Unless => 2,
            Self::Eql | Self::Neq | Self::Gtr | Self::Lss | Self::Gte | Self::Lte => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div | Self::Mod | Self::Atan2 => 5,
            Self::Pow => 6,
        }
    }

    /// `^` is the only right-associative operator
    pub fn is_right_associative(&self) -> bool {
        matches!(self, Self::Pow)
    }
}

/// Vector matching keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    On,
    #[serde(rename = "ignore")]
    Ignoring,
}

/// Group modifiers for many-to-one and one-to-many matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupModifier {
    Left,
    Right,
}

/// A function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCallExpr {
    /// Function name
    pub function: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl FuncCallExpr {
    pub(crate) fn new(function: String) -> Self {
        Self {
            function,
            args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(metric: &str) -> Expr {
        Expr::Vector(VectorExpr::new(metric.to_string()))
    }

    #[test]
    fn test_validate_vector() {
        assert!(selector("up").validate().is_ok());
        assert_eq!(selector("").validate(), Err(ValidationError::EmptyMetric));

        let mut vector = VectorExpr::new("up".to_string());
        vector.labels.push(LabelSelector::new(
            String::new(),
            LabelMatchingOperator::Equal,
            "api",
        ));
        assert_eq!(
            Expr::Vector(vector).validate(),
            Err(ValidationError::EmptyLabelName)
        );
    }

    #[test]
    fn test_validate_nested() {
        let inner = Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            expr: Box::new(selector("")),
        });
        let outer = Expr::Binary(BinaryExpr::new(BinaryOp::Add, selector("up"), inner));
        assert_eq!(outer.validate(), Err(ValidationError::EmptyMetric));

        let call = Expr::FuncCall(FuncCallExpr::new(String::new()));
        assert_eq!(call.validate(), Err(ValidationError::EmptyFunction));
    }

    #[test]
    fn test_json_tags() {
        let expr = Expr::Subquery(SubqueryExpr::new(selector("up")));
        let json = expr.to_json().unwrap();

        assert!(json.contains(r#""type": "subqueryExpr""#));
        assert!(json.contains(r#""type": "vectorExpr""#));
        assert!(!json.contains("offset"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "type": "binaryExpr",
            "op": "/",
            "left": {"type": "vectorExpr", "metric": "errors_total", "range": "5m"},
            "right": {"type": "numberLiteralExpr", "value": 60},
            "matchType": "ignore",
            "matchLabels": ["code"]
        }"#;

        let expr = Expr::from_json(json).unwrap();
        let Expr::Binary(binary) = expr else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.op, BinaryOp::Div);
        assert_eq!(binary.match_type, Some(MatchType::Ignoring));
        assert_eq!(binary.match_labels, vec!["code"]);
        assert!(matches!(*binary.left, Expr::Vector(ref v) if v.is_range()));
    }

    #[test]
    fn test_from_json_rejects_invalid_tree() {
        let json = r#"{
            "type": "vectorExpr",
            "metric": "up",
            "labels": [{"name": "", "value": "api", "operator": "="}]
        }"#;

        let result = Expr::from_json(json);
        assert!(matches!(
            result,
            Err(crate::promql::ExprError::Validation(ValidationError::EmptyLabelName))
        ));
    }

    #[test]
    fn test_binary_precedence_order() {
        assert!(BinaryOp::Pow.precedence() > BinaryOp::Mul.precedence());
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Gtr.precedence());
        assert!(BinaryOp::Gtr.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::Unless.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Pow.is_right_associative());
        assert!(!BinaryOp::Sub.is_right_associative());
    }
}
