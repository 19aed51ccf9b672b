//! Builder contract shared by every expression kind
//!
//! A builder owns the node it is assembling. [`Builder::build`] consumes the
//! builder and moves the node out, so a built tree can never be changed through
//! a builder afterwards. Parent builders take their children by value and build
//! them on the spot, which keeps every child owned by exactly one parent.

use super::ast::{Expr, LabelSelector};
use super::error::ValidationError;

/// Something that produces a finished `T`
pub trait Builder<T> {
    /// Finish construction and hand over the node
    fn build(self) -> T;
}

/// A finished expression can be attached wherever a builder is expected
impl Builder<Expr> for Expr {
    fn build(self) -> Expr {
        self
    }
}

impl Builder<LabelSelector> for LabelSelector {
    fn build(self) -> LabelSelector {
        self
    }
}

/// The one check builders perform: required names must not be empty
pub(crate) fn require_non_empty(
    value: String,
    error: ValidationError,
) -> Result<String, ValidationError> {
    if value.is_empty() {
        tracing::debug!(error = %error, "Rejected builder input");
        Err(error)
    } else {
        Ok(value)
    }
}
