//! Vector selector builders
//!
//! ```rust
//! use promql_builder::promql::vector;
//!
//! let selector = vector("http_requests_total")?
//!     .label("job", "api")?
//!     .label_neq("code", "200")?
//!     .range("5m");
//!
//! assert_eq!(selector.to_string(), r#"http_requests_total{job="api",code!="200"}[5m]"#);
//! # Ok::<(), promql_builder::promql::ValidationError>(())
//! ```

use std::fmt::{self, Display, Formatter};

use super::ast::{Expr, LabelMatchingOperator, LabelSelector, VectorExpr};
use super::builder::{require_non_empty, Builder};
use super::error::ValidationError;

/// Start a vector selector for the given metric
pub fn vector(metric: impl Into<String>) -> Result<VectorExprBuilder, ValidationError> {
    VectorExprBuilder::new(metric)
}

/// Builder for instant and range vector selectors
#[derive(Debug, Clone)]
pub struct VectorExprBuilder {
    internal: VectorExpr,
}

impl VectorExprBuilder {
    /// Create a selector for a metric. Fails if the metric name is empty.
    pub fn new(metric: impl Into<String>) -> Result<Self, ValidationError> {
        let metric = require_non_empty(metric.into(), ValidationError::EmptyMetric)?;
        Ok(Self {
            internal: VectorExpr::new(metric),
        })
    }

    /// Replace the metric name
    pub fn metric(mut self, metric: impl Into<String>) -> Result<Self, ValidationError> {
        self.internal.metric = require_non_empty(metric.into(), ValidationError::EmptyMetric)?;
        Ok(self)
    }

    /// Add a `name="value"` matcher
    pub fn label(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.push_label(name, LabelMatchingOperator::Equal, value)
    }

    /// Add a `name!="value"` matcher
    pub fn label_neq(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.push_label(name, LabelMatchingOperator::NotEqual, value)
    }

    /// Add a `name=~"regex"` matcher
    pub fn label_match_regexp(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.push_label(name, LabelMatchingOperator::MatchRegexp, value)
    }

    /// Add a `name!~"regex"` matcher
    pub fn label_not_match_regexp(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.push_label(name, LabelMatchingOperator::NotMatchRegexp, value)
    }

    /// Add a matcher assembled by a [`LabelSelectorBuilder`]
    pub fn label_selector(mut self, selector: impl Builder<LabelSelector>) -> Self {
        self.internal.labels.push(selector.build());
        self
    }

    /// Replace all matchers
    pub fn labels<B>(mut self, selectors: impl IntoIterator<Item = B>) -> Self
    where
        B: Builder<LabelSelector>,
    {
        self.internal.labels = selectors.into_iter().map(|s| s.build()).collect();
        self
    }

    /// Time offset modifier, e.g. `1d`
    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.internal.offset = Some(offset.into());
        self
    }

    /// `@` modifier: a unix timestamp, `start()` or `end()`
    pub fn at(mut self, at: impl Into<String>) -> Self {
        self.internal.at = Some(at.into());
        self
    }

    /// Turn the selector into a range vector over the given duration
    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.internal.range = Some(range.into());
        self
    }

    fn push_label(
        mut self,
        name: impl Into<String>,
        operator: LabelMatchingOperator,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = require_non_empty(name.into(), ValidationError::EmptyLabelName)?;
        self.internal
            .labels
            .push(LabelSelector::new(name, operator, value));
        Ok(self)
    }
}

impl Builder<Expr> for VectorExprBuilder {
    fn build(self) -> Expr {
        Expr::Vector(self.internal)
    }
}

impl Display for VectorExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

/// Builder for a single label matcher
#[derive(Debug, Clone)]
pub struct LabelSelectorBuilder {
    internal: LabelSelector,
}

impl LabelSelectorBuilder {
    /// Create an `=` matcher with an empty value. Fails if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = require_non_empty(name.into(), ValidationError::EmptyLabelName)?;
        Ok(Self {
            internal: LabelSelector::new(name, LabelMatchingOperator::default(), ""),
        })
    }

    /// Replace the label name
    pub fn name(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.internal.name = require_non_empty(name.into(), ValidationError::EmptyLabelName)?;
        Ok(self)
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.internal.value = value.into();
        self
    }

    pub fn operator(mut self, operator: LabelMatchingOperator) -> Self {
        self.internal.operator = operator;
        self
    }
}

impl Builder<LabelSelector> for LabelSelectorBuilder {
    fn build(self) -> LabelSelector {
        self.internal
    }
}

impl Display for LabelSelectorBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_requires_metric() {
        assert_eq!(vector("").unwrap_err(), ValidationError::EmptyMetric);
        assert_eq!(
            vector("up").unwrap().metric("").unwrap_err(),
            ValidationError::EmptyMetric
        );
    }

    #[test]
    fn test_label_requires_name() {
        let result = vector("m").unwrap().label("", "v");
        assert_eq!(result.unwrap_err(), ValidationError::EmptyLabelName);

        let result = vector("m").unwrap().label_not_match_regexp("", "v");
        assert_eq!(result.unwrap_err(), ValidationError::EmptyLabelName);
    }

    #[test]
    fn test_label_selector_builder_requires_name() {
        assert_eq!(
            LabelSelectorBuilder::new("").unwrap_err(),
            ValidationError::EmptyLabelName
        );
        assert_eq!(
            LabelSelectorBuilder::new("job").unwrap().name("").unwrap_err(),
            ValidationError::EmptyLabelName
        );
    }

    #[test]
    fn test_label_order_is_preserved() {
        let selector = vector("m")
            .unwrap()
            .label("a", "1")
            .unwrap()
            .label_neq("b", "2")
            .unwrap();

        assert_eq!(selector.to_string(), r#"m{a="1",b!="2"}"#);
    }

    #[test]
    fn test_all_matching_operators() {
        let selector = vector("m")
            .unwrap()
            .label("a", "1")
            .unwrap()
            .label_neq("b", "2")
            .unwrap()
            .label_match_regexp("c", "3|4")
            .unwrap()
            .label_not_match_regexp("d", "5.*")
            .unwrap();

        assert_eq!(
            selector.to_string(),
            r#"m{a="1",b!="2",c=~"3|4",d!~"5.*"}"#
        );
    }

    #[test]
    fn test_range_offset_at() {
        let selector = vector("m").unwrap().range("5m").offset("1d").at("100");
        assert_eq!(selector.to_string(), "m[5m] offset 1d @ 100");
    }

    #[test]
    fn test_modifiers_stored_verbatim() {
        let selector = vector("m").unwrap().range("not a duration");
        assert_eq!(selector.to_string(), "m[not a duration]");
    }

    #[test]
    fn test_label_selector_builder() {
        let matcher = LabelSelectorBuilder::new("env")
            .unwrap()
            .operator(LabelMatchingOperator::MatchRegexp)
            .value("prod|staging");
        assert_eq!(matcher.to_string(), r#"env=~"prod|staging""#);

        let selector = vector("up").unwrap().label_selector(matcher);
        assert_eq!(selector.to_string(), r#"up{env=~"prod|staging"}"#);
    }

    #[test]
    fn test_labels_replaces_matchers() {
        let selector = vector("up")
            .unwrap()
            .label("stale", "yes")
            .unwrap()
            .labels(vec![
                LabelSelectorBuilder::new("job").unwrap().value("api"),
                LabelSelectorBuilder::new("zone").unwrap().value("eu"),
            ]);

        assert_eq!(selector.to_string(), r#"up{job="api",zone="eu"}"#);
    }

    #[test]
    fn test_build_and_to_string_agree() {
        let builder = vector("up").unwrap().label("job", "api").unwrap();
        let text = builder.to_string();

        assert_eq!(builder.to_string(), text);
        assert_eq!(builder.build().to_string(), text);
    }

    #[test]
    fn test_build_yields_vector_node() {
        let expr = vector("up").unwrap().range("1m").build();
        match expr {
            Expr::Vector(v) => {
                assert_eq!(v.metric, "up");
                assert!(v.is_range());
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }
}
