//! Reference aggregation pipeline: compute, average, derive.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EvaluateConfig;
use crate::error::MetricError;
use crate::metric::Metric;
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues, Variables};

/// Metric results keyed by metric unique name, then variable.
pub type MetricResults = BTreeMap<String, AggregatedVariables>;

/// Distinct statistics required by `metrics`, keyed by unique name.
pub fn required_statistics(metrics: &[Box<dyn Metric>]) -> BTreeMap<String, Arc<dyn Statistic>> {
    let mut out = BTreeMap::new();
    for metric in metrics {
        for statistic in metric.statistics().into_values() {
            out.entry(statistic.unique_name()).or_insert(statistic);
        }
    }
    out
}

/// Computes every distinct statistic needed by `metrics` exactly once.
///
/// The result is keyed by statistic unique name.
pub fn compute_statistics(
    metrics: &[Box<dyn Metric>],
    predictions: &Variables,
    targets: &Variables,
) -> Result<BTreeMap<String, Variables>, MetricError> {
    let statistics = required_statistics(metrics);
    let mut out = BTreeMap::new();
    for (name, statistic) in statistics {
        debug!(statistic = %name, "computing statistic");
        out.insert(name, statistic.compute(predictions, targets)?);
    }
    Ok(out)
}

/// Averages every statistic over the configured dimensions.
///
/// With masked reduction enabled, positions whose mask is false are
/// excluded; NaN values are always skipped.
pub fn mean_statistics(
    statistics: &BTreeMap<String, Variables>,
    config: &EvaluateConfig,
) -> Result<BTreeMap<String, AggregatedVariables>, MetricError> {
    let dims: Vec<&str> = config.reduce_dims().iter().map(String::as_str).collect();
    statistics
        .iter()
        .map(|(name, variables)| {
            let means = variables
                .iter()
                .map(|(variable, array)| Ok((variable.clone(), array.masked_mean(&dims, config.masked())?)))
                .collect::<Result<AggregatedVariables, MetricError>>()?;
            Ok((name.clone(), means))
        })
        .collect()
}

/// Runs the whole pipeline: statistics, averages, metric values.
///
/// A metric whose unique name repeats an earlier one is skipped with a
/// warning.
pub fn evaluate(
    metrics: &[Box<dyn Metric>],
    predictions: &Variables,
    targets: &Variables,
    config: &EvaluateConfig,
) -> Result<MetricResults, MetricError> {
    info!(
        metrics = metrics.len(),
        variables = predictions.len(),
        "evaluating"
    );
    let statistics = compute_statistics(metrics, predictions, targets)?;
    let means = mean_statistics(&statistics, config)?;

    let mut results = MetricResults::new();
    for metric in metrics {
        let name = metric.unique_name();
        if results.contains_key(&name) {
            warn!(metric = %name, "duplicate metric skipped");
            continue;
        }
        let mut values = StatisticValues::new();
        for (key, statistic) in metric.statistics() {
            let statistic_name = statistic.unique_name();
            let aggregated = means
                .get(&statistic_name)
                .ok_or(MetricError::MissingStatistic { key: statistic_name })?;
            values.insert(key, aggregated.clone());
        }
        debug!(metric = %name, "deriving metric");
        results.insert(name, metric.values_from_mean_statistics(&values)?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brier::BrierScore;
    use crate::contingency::ContingencyScore;
    use tempest_array::{MaskedArray, NamedArray};

    fn vars(values: Vec<f64>) -> Variables {
        Variables::from([("v".to_string(), MaskedArray::new(NamedArray::from_vec("x", values)))])
    }

    #[test]
    fn shared_statistics_are_deduplicated() {
        let metrics: Vec<Box<dyn Metric>> = vec![
            Box::new(ContingencyScore::Csi),
            Box::new(ContingencyScore::Hss),
            Box::new(BrierScore::default()),
        ];
        let names: Vec<String> = required_statistics(&metrics).into_keys().collect();
        assert_eq!(
            names,
            vec![
                "FalseNegatives",
                "FalsePositives",
                "SquaredError",
                "TrueNegatives",
                "TruePositives"
            ]
        );
    }

    #[test]
    fn evaluate_reduces_then_derives() {
        let metrics: Vec<Box<dyn Metric>> = vec![Box::new(ContingencyScore::Accuracy)];
        let config = EvaluateConfig::default().with_reduce_dims(["x"]);
        let results = evaluate(
            &metrics,
            &vars(vec![1.0, 0.0, 1.0, 0.0]),
            &vars(vec![1.0, 0.0, 0.0, 0.0]),
            &config,
        )
        .unwrap();
        let accuracy = &results["Accuracy"]["v"];
        assert!(accuracy.dims().is_empty());
        assert_eq!(accuracy.data().sum(), 0.75);
    }

    #[test]
    fn repeated_metric_is_reported_once() {
        let metrics: Vec<Box<dyn Metric>> = vec![
            Box::new(ContingencyScore::Csi),
            Box::new(ContingencyScore::Accuracy),
            Box::new(ContingencyScore::Csi),
        ];
        let config = EvaluateConfig::default().with_reduce_dims(["x"]);
        let results = evaluate(
            &metrics,
            &vars(vec![1.0, 1.0, 0.0, 0.0]),
            &vars(vec![1.0, 0.0, 1.0, 0.0]),
            &config,
        )
        .unwrap();
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["Accuracy", "CSI"]);
        assert!((results["CSI"]["v"].data().sum() - 1.0 / 3.0).abs() < 1e-12);
    }
}
