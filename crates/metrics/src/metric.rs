//! The metric abstraction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tempest_array::NamedArray;

use crate::error::MetricError;
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues};

/// A score derived from statistics after they have been averaged.
///
/// A metric names the statistics it needs under metric-internal keys; the
/// aggregator computes and averages them, then hands the averaged values back
/// under the same keys.
pub trait Metric: fmt::Debug + Send + Sync {
    /// Name identifying this metric and its configuration.
    fn unique_name(&self) -> String;

    /// Statistics required by this metric, keyed by metric-internal name.
    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>>;

    /// Derives the metric from averaged statistics.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::MissingStatistic`] if a required key is absent.
    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError>;
}

/// Averaged values of the statistic stored under `key`.
pub(crate) fn statistic<'a>(
    values: &'a StatisticValues,
    key: &str,
) -> Result<&'a AggregatedVariables, MetricError> {
    values.get(key).ok_or_else(|| MetricError::MissingStatistic {
        key: key.to_string(),
    })
}

/// Checks that every variable of the statistic under `key` has `dim`.
pub(crate) fn require_dim(values: &StatisticValues, key: &str, dim: &str) -> Result<(), MetricError> {
    let missing = statistic(values, key)?
        .values()
        .any(|array: &NamedArray<f64>| !array.has_dim(dim));
    if missing {
        return Err(MetricError::MissingDimension {
            dim: dim.to_string(),
            statistic: key.to_string(),
        });
    }
    Ok(())
}

/// Formats parameter values for unique names.
pub(crate) fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join("_")
}
