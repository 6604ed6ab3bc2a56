//! Squared error statistic and the Brier score.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::MetricError;
use crate::metric::{Metric, statistic};
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues, Variables, elementwise, map_variables};

/// Metric-internal key of the squared error statistic.
pub const SQUARED_ERROR_KEY: &str = "SquaredError";

/// Squared difference between prediction and target. Masks are forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredError;

impl Statistic for SquaredError {
    fn unique_name(&self) -> String {
        SQUARED_ERROR_KEY.to_string()
    }

    fn compute(&self, predictions: &Variables, targets: &Variables) -> Result<Variables, MetricError> {
        map_variables(predictions, targets, |_, p, t| {
            elementwise(p, t, |&a, &b| (a - b).powi(2))
        })
    }
}

/// Brier score: aggregated squared error, further averaged over
/// `reduce_dims`.
///
/// With probabilistic predictions and binary targets this is the classic
/// Brier score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrierScore {
    reduce_dims: Vec<String>,
}

impl BrierScore {
    pub fn new<S: Into<String>>(reduce_dims: impl IntoIterator<Item = S>) -> Self {
        Self {
            reduce_dims: reduce_dims.into_iter().map(Into::into).collect(),
        }
    }
}

impl Metric for BrierScore {
    fn unique_name(&self) -> String {
        if self.reduce_dims.is_empty() {
            "BrierScore".to_string()
        } else {
            format!("BrierScore_reduce_dims_{}", self.reduce_dims.join("_"))
        }
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        let statistic: Arc<dyn Statistic> = Arc::new(SquaredError);
        BTreeMap::from([(SQUARED_ERROR_KEY.to_string(), statistic)])
    }

    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError> {
        let dims: Vec<&str> = self.reduce_dims.iter().map(String::as_str).collect();
        statistic(statistic_values, SQUARED_ERROR_KEY)?
            .iter()
            .map(|(variable, se)| {
                let unknown: Vec<String> = dims
                    .iter()
                    .filter(|d| !se.has_dim(d))
                    .map(|d| d.to_string())
                    .collect();
                if !unknown.is_empty() {
                    return Err(MetricError::UnknownReduceDims { dims: unknown });
                }
                Ok((variable.clone(), se.mean_over(&dims)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use tempest_array::{MaskedArray, NamedArray};

    fn aggregated(values: ndarray::ArrayD<f64>) -> StatisticValues {
        let mut vars = AggregatedVariables::new();
        vars.insert("v".to_string(), NamedArray::new(["lat", "lon"], values).unwrap());
        StatisticValues::from([(SQUARED_ERROR_KEY.to_string(), vars)])
    }

    #[test]
    fn squared_error_values() {
        let mut predictions = Variables::new();
        predictions.insert("v".to_string(), MaskedArray::new(NamedArray::from_vec("x", vec![1.0, 4.0, f64::NAN])));
        let mut targets = Variables::new();
        targets.insert("v".to_string(), MaskedArray::new(NamedArray::from_vec("x", vec![3.0, 4.0, 0.0])));

        let se = SquaredError.compute(&predictions, &targets).unwrap();
        let out: Vec<f64> = se["v"].values().data().iter().copied().collect();
        assert_eq!(&out[..2], &[4.0, 0.0]);
        assert!(out[2].is_nan());
    }

    #[test]
    fn brier_averages_over_dims() {
        let values = aggregated(array![[0.0, 0.5], [0.25, 0.25]].into_dyn());
        let bs = BrierScore::new(["lon"]).values_from_mean_statistics(&values).unwrap();
        assert_eq!(bs["v"].dims(), &["lat"]);
        assert_relative_eq!(*bs["v"].get(&[0]).unwrap(), 0.25);
        assert_relative_eq!(*bs["v"].get(&[1]).unwrap(), 0.25);
    }

    #[test]
    fn brier_without_dims_is_identity() {
        let values = aggregated(array![[0.0, 0.5], [0.25, 0.25]].into_dyn());
        let bs = BrierScore::default().values_from_mean_statistics(&values).unwrap();
        assert_eq!(&bs["v"], &values[SQUARED_ERROR_KEY]["v"]);
    }

    #[test]
    fn unknown_reduce_dims_are_named() {
        let values = aggregated(array![[0.0]].into_dyn());
        let err = BrierScore::new(["lat", "member"])
            .values_from_mean_statistics(&values)
            .unwrap_err();
        assert_eq!(
            err,
            MetricError::UnknownReduceDims {
                dims: vec!["member".to_string()]
            }
        );
    }

    #[test]
    fn unique_names() {
        assert_eq!(BrierScore::default().unique_name(), "BrierScore");
        assert_eq!(BrierScore::new(["lat", "lon"]).unique_name(), "BrierScore_reduce_dims_lat_lon");
    }
}
