//! Error types for statistic and metric computation.

use tempest_array::ArrayError;
use tempest_calendar::CalendarError;

/// Errors that can occur while computing statistics or deriving metrics.
///
/// Numerical problems (division by zero, logarithms of zero, non-finite
/// inputs) are not errors: they flow through as NaN or infinity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// A per-variable parameter list has the wrong length.
    #[error("parameter '{parameter}' has {got} value(s), expected {expected} (one per variable)")]
    LengthMismatch {
        parameter: &'static str,
        expected: usize,
        got: usize,
    },

    /// A statistic was configured without any variables.
    #[error("no variables configured for {statistic}")]
    EmptyVariables { statistic: String },

    /// The valid p1 range is empty.
    #[error("min_p1 {min_p1} exceeds max_p1 {max_p1} for variable '{variable}'")]
    InvalidP1Range {
        variable: String,
        min_p1: f64,
        max_p1: f64,
    },

    /// A dimension a metric relies on is absent from an aggregated statistic.
    #[error("dimension '{dim}' not found in {statistic} statistic")]
    MissingDimension { dim: String, statistic: String },

    /// Reduction dimensions are not all dimensions of the statistic.
    #[error("cannot reduce over dimension(s) {} that are not evaluation unit dimensions", .dims.join(", "))]
    UnknownReduceDims { dims: Vec<String> },

    /// Predictions and targets both carry a validity mask.
    #[error("both predictions and targets carry a mask for variable '{variable}'")]
    BothOperandsMasked { variable: String },

    /// A variable is missing from one of the inputs.
    #[error("variable '{variable}' not found in {location}")]
    MissingVariable { variable: String, location: String },

    /// A metric's statistic is missing from the aggregated values.
    #[error("statistic '{key}' not found in aggregated statistics")]
    MissingStatistic { key: String },

    /// A climatology field is missing.
    #[error("climatology field '{field}' not found")]
    MissingClimatologyField { field: String },

    /// A climatology field has no entry for a (day-of-year, hour) pair.
    #[error("climatology field '{field}' has no entry for dayofyear {day_of_year}, hour {hour}")]
    MissingClimatologyKey {
        field: String,
        day_of_year: u16,
        hour: u8,
    },

    /// An array lacks a coordinate of the expected kind.
    #[error("missing {kind} coordinate for dimension '{dim}'")]
    MissingCoordinate { dim: String, kind: &'static str },

    /// A metric needs a climatology but none was provided.
    #[error("metric '{metric}' requires a climatology")]
    ClimatologyRequired { metric: String },

    /// Alignment or shape failure in the array layer.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Valid-time overflow or an impossible day-of-year/hour label.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
