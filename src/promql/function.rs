//! Function call builders
//!
//! One helper per PromQL function. See
//! https://prometheus.io/docs/prometheus/latest/querying/functions/
//!
//! Any function without a helper can be called through
//! [`FuncCallExprBuilder::new`]:
//!
//! ```rust
//! use promql_builder::promql::{s, vector, FuncCallExprBuilder};
//!
//! let call = FuncCallExprBuilder::new("sort_by_label")?
//!     .arg(vector("up")?)
//!     .arg(s("instance"));
//! assert_eq!(call.to_string(), r#"sort_by_label(up, "instance")"#);
//! # Ok::<(), promql_builder::promql::ValidationError>(())
//! ```

use std::fmt::{self, Display, Formatter};

use super::ast::{Expr, FuncCallExpr};
use super::builder::{require_non_empty, Builder};
use super::error::ValidationError;
use super::literal::{n, s};

macro_rules! vector_functions {
    ($($(#[$doc:meta])* $name:ident => $function:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(v: impl Builder<Expr>) -> FuncCallExprBuilder {
                FuncCallExprBuilder::named($function).arg(v)
            }
        )*
    };
}

macro_rules! nullary_functions {
    ($($(#[$doc:meta])* $name:ident => $function:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name() -> FuncCallExprBuilder {
                FuncCallExprBuilder::named($function)
            }
        )*
    };
}

vector_functions! {
    /// Absolute value of every sample
    abs => "abs",
    /// 1-element vector with the value 1 if `v` has no elements, empty otherwise
    absent => "absent",
    /// Like `absent`, over a range vector
    absent_over_time => "absent_over_time",
    /// Round sample values up to the nearest integer
    ceil => "ceil",
    /// Number of times each series changed value within the range
    changes => "changes",
    /// Difference between the first and last value of each series in the range
    delta => "delta",
    /// Per-second derivative using simple linear regression. Gauges only.
    deriv => "deriv",
    /// Exponential function
    exp => "exp",
    /// Round sample values down to the nearest integer
    floor => "floor",
    /// Arithmetic average of observations in native histograms
    histogram_avg => "histogram_avg",
    /// Count of observations in native histograms
    histogram_count => "histogram_count",
    /// Sum of observations in native histograms
    histogram_sum => "histogram_sum",
    /// Estimated standard deviation of observations in native histograms
    histogram_stddev => "histogram_stddev",
    /// Estimated standard variance of observations in native histograms
    histogram_stdvar => "histogram_stdvar",
    /// Difference between the last two samples of each series in the range
    idelta => "idelta",
    /// Increase of each series over the range
    increase => "increase",
    /// Per-second instant rate based on the last two samples
    irate => "irate",
    /// Natural logarithm
    ln => "ln",
    /// Binary logarithm
    log2 => "log2",
    /// Decimal logarithm
    log10 => "log10",
    /// Per-second average rate of increase over the range
    rate => "rate",
    /// Number of counter resets within the range
    resets => "resets",
    /// Round sample values to the nearest integer, ties rounding up
    round => "round",
    /// Sample value of a single-element vector as a scalar
    scalar => "scalar",
    /// Sign of every sample: 1, -1 or 0
    sgn => "sgn",
    /// Sort by sample value, ascending
    sort => "sort",
    /// Sort by sample value, descending
    sort_desc => "sort_desc",
    /// Square root
    sqrt => "sqrt",
    /// Timestamp of each sample, in seconds since the epoch
    timestamp => "timestamp",
    /// Day of the month (1 to 31) for each given time
    day_of_month_for => "day_of_month",
    /// Day of the week (0 to 6, Sunday first) for each given time
    day_of_week_for => "day_of_week",
    /// Day of the year (1 to 366) for each given time
    day_of_year_for => "day_of_year",
    /// Number of days in the month (28 to 31) for each given time
    days_in_month_for => "days_in_month",
    /// Hour of the day (0 to 23) for each given time
    hour_for => "hour",
    /// Minute of the hour (0 to 59) for each given time
    minute_for => "minute",
    /// Month of the year (1 to 12) for each given time
    month_for => "month",
    /// Year for each given time
    year_for => "year",
    /// Average of all points in the range
    avg_over_time => "avg_over_time",
    /// Minimum of all points in the range
    min_over_time => "min_over_time",
    /// Maximum of all points in the range
    max_over_time => "max_over_time",
    /// Sum of all points in the range
    sum_over_time => "sum_over_time",
    /// Count of all points in the range
    count_over_time => "count_over_time",
    /// Population standard deviation of all points in the range
    stddev_over_time => "stddev_over_time",
    /// Population standard variance of all points in the range
    stdvar_over_time => "stdvar_over_time",
    /// Most recent point in the range
    last_over_time => "last_over_time",
    /// The value 1 for any series with a point in the range
    present_over_time => "present_over_time",
    acos => "acos",
    acosh => "acosh",
    asin => "asin",
    asinh => "asinh",
    atan => "atan",
    atanh => "atanh",
    cos => "cos",
    cosh => "cosh",
    sin => "sin",
    sinh => "sinh",
    tan => "tan",
    tanh => "tanh",
    /// Radians to degrees
    deg => "deg",
    /// Degrees to radians
    rad => "rad",
}

nullary_functions! {
    /// Current day of the month, in UTC
    day_of_month => "day_of_month",
    /// Current day of the week, in UTC
    day_of_week => "day_of_week",
    /// Current day of the year, in UTC
    day_of_year => "day_of_year",
    /// Number of days in the current month
    days_in_month => "days_in_month",
    /// Current hour of the day, in UTC
    hour => "hour",
    /// Current minute of the hour, in UTC
    minute => "minute",
    /// Current month of the year, in UTC
    month => "month",
    /// Current year, in UTC
    year => "year",
    /// Evaluation time in seconds since the epoch
    time => "time",
    pi => "pi",
}

/// Clamp sample values to `[min, max]`
pub fn clamp(v: impl Builder<Expr>, min: f64, max: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("clamp").arg(v).arg(n(min)).arg(n(max))
}

/// Clamp sample values to an upper limit
pub fn clamp_max(v: impl Builder<Expr>, max: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("clamp_max").arg(v).arg(n(max))
}

/// Clamp sample values to a lower limit
pub fn clamp_min(v: impl Builder<Expr>, min: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("clamp_min").arg(v).arg(n(min))
}

/// Estimated fraction of observations between `lower` and `upper`
pub fn histogram_fraction(lower: f64, upper: f64, v: impl Builder<Expr>) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("histogram_fraction")
        .arg(n(lower))
        .arg(n(upper))
        .arg(v)
}

/// φ-quantile (0 ≤ φ ≤ 1) from a classic or native histogram
pub fn histogram_quantile(phi: f64, v: impl Builder<Expr>) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("histogram_quantile")
        .arg(n(phi))
        .arg(v)
}

/// Join the values of `src_labels` with `separator` into `dst_label`
pub fn label_join<L>(
    v: impl Builder<Expr>,
    dst_label: impl Into<String>,
    separator: impl Into<String>,
    src_labels: impl IntoIterator<Item = L>,
) -> FuncCallExprBuilder
where
    L: Into<String>,
{
    let builder = FuncCallExprBuilder::named("label_join")
        .arg(v)
        .arg(s(dst_label))
        .arg(s(separator));

    src_labels
        .into_iter()
        .fold(builder, |builder, label| builder.arg(s(label)))
}

/// Write the expansion of `replacement` into `dst_label` when `regex` matches
/// the value of `src_label`
pub fn label_replace(
    v: impl Builder<Expr>,
    dst_label: impl Into<String>,
    replacement: impl Into<String>,
    src_label: impl Into<String>,
    regex: impl Into<String>,
) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("label_replace")
        .arg(v)
        .arg(s(dst_label))
        .arg(s(replacement))
        .arg(s(src_label))
        .arg(s(regex))
}

/// Predict the value `t` seconds from now using simple linear regression
pub fn predict_linear(v: impl Builder<Expr>, t: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("predict_linear").arg(v).arg(n(t))
}

/// φ-quantile (0 ≤ φ ≤ 1) of all points in the range
pub fn quantile_over_time(phi: f64, v: impl Builder<Expr>) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("quantile_over_time")
        .arg(n(phi))
        .arg(v)
}

/// Round sample values to the nearest multiple of `to_nearest`
pub fn round_to(v: impl Builder<Expr>, to_nearest: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("round").arg(v).arg(n(to_nearest))
}

/// The scalar `s` as a vector with no labels (PromQL `vector(s)`)
pub fn vect(s: f64) -> FuncCallExprBuilder {
    FuncCallExprBuilder::named("vector").arg(n(s))
}

#[derive(Debug, Clone)]
pub struct FuncCallExprBuilder {
    internal: FuncCallExpr,
}

impl FuncCallExprBuilder {
    /// Call a function by name. Fails if the name is empty.
    pub fn new(function: impl Into<String>) -> Result<Self, ValidationError> {
        let function = require_non_empty(function.into(), ValidationError::EmptyFunction)?;
        Ok(Self {
            internal: FuncCallExpr::new(function),
        })
    }

    fn named(function: &'static str) -> Self {
        Self {
            internal: FuncCallExpr::new(function.to_string()),
        }
    }

    /// Replace the function name
    pub fn function(mut self, function: impl Into<String>) -> Result<Self, ValidationError> {
        self.internal.function =
            require_non_empty(function.into(), ValidationError::EmptyFunction)?;
        Ok(self)
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Builder<Expr>) -> Self {
        self.internal.args.push(arg.build());
        self
    }

    /// Replace all arguments
    pub fn args<B>(mut self, args: impl IntoIterator<Item = B>) -> Self
    where
        B: Builder<Expr>,
    {
        self.internal.args = args.into_iter().map(|arg| arg.build()).collect();
        self
    }
}

impl Builder<Expr> for FuncCallExprBuilder {
    fn build(self) -> Expr {
        Expr::FuncCall(self.internal)
    }
}

impl Display for FuncCallExprBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.internal.fmt(f)
    }
}
