//! Area under the ROC curve and the ROC skill score.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::ArrayView1;

use crate::confusion::ConfusionCount;
use crate::contingency::{ContingencyTable, count_statistics, tables};
use crate::error::MetricError;
use crate::metric::{Metric, require_dim};
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues};

/// Area under the ROC curve traced by the tables along one lane.
///
/// Points are (false alarm rate, hit rate) in lane order; thresholds are
/// expected to increase along the lane, so F decreases and the trapezoid
/// integral is negated.
pub fn roc_area(lane: ArrayView1<'_, ContingencyTable>) -> f64 {
    let points: Vec<(f64, f64)> = lane
        .iter()
        .map(|t| (t.false_alarm_rate(), t.hit_rate()))
        .collect();
    let integral: f64 = points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
        .sum();
    -integral
}

/// Area under the ROC curve along a threshold-probability dimension.
///
/// The threshold dimension is removed from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auc {
    threshold_dim: String,
}

impl Auc {
    pub fn new(threshold_dim: impl Into<String>) -> Self {
        Self {
            threshold_dim: threshold_dim.into(),
        }
    }

    pub fn threshold_dim(&self) -> &str {
        &self.threshold_dim
    }
}

impl Metric for Auc {
    fn unique_name(&self) -> String {
        format!("AUC_threshold_dim_{}", self.threshold_dim)
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        count_statistics(&ConfusionCount::ALL)
    }

    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError> {
        require_dim(
            statistic_values,
            ConfusionCount::TruePositives.name(),
            &self.threshold_dim,
        )?;
        tracing::debug!(threshold_dim = %self.threshold_dim, "integrating ROC curve");
        tables(statistic_values, &ConfusionCount::ALL)?
            .into_iter()
            .map(|(variable, table)| Ok((variable, table.reduce_dim(&self.threshold_dim, roc_area)?)))
            .collect()
    }
}

/// ROC skill score, `2 * AUC - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rocss {
    auc: Auc,
}

impl Rocss {
    pub fn new(threshold_dim: impl Into<String>) -> Self {
        Self {
            auc: Auc::new(threshold_dim),
        }
    }
}

impl Metric for Rocss {
    fn unique_name(&self) -> String {
        format!("ROCSS_threshold_dim_{}", self.auc.threshold_dim())
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        self.auc.statistics()
    }

    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError> {
        Ok(self
            .auc
            .values_from_mean_statistics(statistic_values)?
            .into_iter()
            .map(|(variable, auc)| (variable, auc.map(|&a| 2.0 * a - 1.0)))
            .collect())
    }
}
