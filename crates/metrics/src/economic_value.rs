//! Relative economic value in the static cost/loss model.

use std::collections::BTreeMap;
use std::sync::Arc;

use tempest_array::{Coordinate, NamedArray};

use crate::confusion::ConfusionCount;
use crate::contingency::{ContingencyTable, count_statistics, tables};
use crate::error::MetricError;
use crate::metric::{Metric, join_values, require_dim};
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues};

/// Dimension added by [`RelativeEconomicValue`].
pub const COST_LOSS_RATIOS: &str = "cost_loss_ratios";

/// Relative economic value of acting on the forecast for a user with
/// cost/loss ratio `alpha`.
///
/// Expected expenses are normalised by the loss: climatology
/// `min(base rate, alpha)`, forecast `(TP + FP) / total * alpha + FN / total`,
/// perfect `base rate * alpha`.
pub fn relative_value(table: &ContingencyTable, alpha: f64) -> f64 {
    let total = table.total();
    let event_ratio = table.base_rate();
    let climate = if event_ratio < alpha { event_ratio } else { alpha };
    let forecast = (table.hits + table.false_alarms) / total * alpha + table.misses / total;
    let perfect = event_ratio * alpha;
    (climate - forecast) / (climate - perfect)
}

/// REV over a set of cost/loss ratios.
///
/// The output gains a `cost_loss_ratios` dimension labelled by the ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeEconomicValue {
    cost_loss_ratios: Vec<f64>,
}

impl RelativeEconomicValue {
    pub fn new(cost_loss_ratios: Vec<f64>) -> Self {
        Self { cost_loss_ratios }
    }

    pub fn cost_loss_ratios(&self) -> &[f64] {
        &self.cost_loss_ratios
    }

    fn ratios(&self) -> Result<NamedArray<f64>, MetricError> {
        Ok(NamedArray::from_vec(COST_LOSS_RATIOS, self.cost_loss_ratios.clone())
            .with_coord(COST_LOSS_RATIOS, Coordinate::Float(self.cost_loss_ratios.clone()))?)
    }
}

impl Metric for RelativeEconomicValue {
    fn unique_name(&self) -> String {
        format!("REV_cost_loss_ratios_{}", join_values(&self.cost_loss_ratios))
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        count_statistics(&ConfusionCount::ALL)
    }

    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError> {
        let ratios = self.ratios()?;
        tables(statistic_values, &ConfusionCount::ALL)?
            .into_iter()
            .map(|(variable, table)| {
                let rev = table.zip_with(&ratios, |t, &alpha| relative_value(t, alpha))?;
                Ok((variable, rev))
            })
            .collect()
    }
}

/// Potential economic value: the maximum REV over a threshold dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialEconomicValue {
    rev: RelativeEconomicValue,
    threshold_dim: String,
}

impl PotentialEconomicValue {
    pub fn new(cost_loss_ratios: Vec<f64>, threshold_dim: impl Into<String>) -> Self {
        Self {
            rev: RelativeEconomicValue::new(cost_loss_ratios),
            threshold_dim: threshold_dim.into(),
        }
    }
}

impl Metric for PotentialEconomicValue {
    fn unique_name(&self) -> String {
        format!(
            "PREV_cost_loss_ratios_{}_threshold_dim_{}",
            join_values(self.rev.cost_loss_ratios()),
            self.threshold_dim
        )
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        self.rev.statistics()
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
        self.rev
            .values_from_mean_statistics(statistic_values)?
            .into_iter()
            .map(|(variable, rev)| Ok((variable, rev.max_over(&[self.threshold_dim.as_str()])?)))
            .collect()
    }
}
