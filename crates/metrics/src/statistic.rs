//! The statistic abstraction and per-variable dispatch.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use tempest_array::{MaskedArray, NamedArray, ValidityMask};

use crate::error::MetricError;

/// Mapping from variable name to array.
pub type Variables = BTreeMap<String, MaskedArray>;

/// Mapping from variable name to a statistic already averaged over the
/// reduction dimensions.
pub type AggregatedVariables = BTreeMap<String, NamedArray<f64>>;

/// Aggregated values keyed by the metric-internal statistic name.
pub type StatisticValues = BTreeMap<String, AggregatedVariables>;

/// A per-evaluation-unit quantity computed from predictions and targets.
///
/// The output holds one array per prediction variable over the inputs'
/// evaluation unit dimensions. Two statistics with the same
/// [`unique_name`](Statistic::unique_name) produce identical output for
/// identical input, so aggregators compute each name once.
pub trait Statistic: fmt::Debug + Send + Sync {
    /// Name identifying this statistic and its configuration.
    fn unique_name(&self) -> String;

    /// Computes the statistic for every prediction variable.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::MissingVariable`] if a prediction variable has
    /// no target, or an alignment error if the two disagree in shape.
    fn compute(&self, predictions: &Variables, targets: &Variables) -> Result<Variables, MetricError>;
}

/// Applies `f` to every prediction variable and its matching target.
///
/// Variables are processed in parallel; the first error wins.
pub fn map_variables<F>(predictions: &Variables, targets: &Variables, f: F) -> Result<Variables, MetricError>
where
    F: Fn(&str, &MaskedArray, &MaskedArray) -> Result<MaskedArray, MetricError> + Sync,
{
    predictions
        .par_iter()
        .map(|(name, prediction)| {
            let target = lookup(targets, name, "targets")?;
            Ok((name.clone(), f(name, prediction, target)?))
        })
        .collect()
}

pub(crate) fn lookup<'a>(
    variables: &'a Variables,
    name: &str,
    location: &str,
) -> Result<&'a MaskedArray, MetricError> {
    variables.get(name).ok_or_else(|| MetricError::MissingVariable {
        variable: name.to_string(),
        location: location.to_string(),
    })
}

/// Mask carried into an elementwise result: whichever operand has one, or
/// the conjunction when both do.
pub(crate) fn forward_mask(
    prediction: &MaskedArray,
    target: &MaskedArray,
) -> Result<Option<ValidityMask>, MetricError> {
    Ok(match (prediction.mask(), target.mask()) {
        (Some(p), Some(t)) => Some(p.and(t)?),
        (Some(m), None) | (None, Some(m)) => Some(m.clone()),
        (None, None) => None,
    })
}

/// Combines predictions and targets elementwise, forwarding masks.
pub(crate) fn elementwise<F>(
    prediction: &MaskedArray,
    target: &MaskedArray,
    f: F,
) -> Result<MaskedArray, MetricError>
where
    F: FnMut(&f64, &f64) -> f64,
{
    let values = prediction.values().zip_with(target.values(), f)?;
    let mask = forward_mask(prediction, target)?;
    Ok(MaskedArray::new(values).with_optional_mask(mask)?)
}
