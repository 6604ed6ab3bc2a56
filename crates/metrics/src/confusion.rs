//! Binary confusion-matrix indicator statistics.

use tempest_array::MaskedArray;

use crate::error::MetricError;
use crate::statistic::{Statistic, Variables, elementwise, map_variables};

/// One cell of the binary contingency table.
///
/// Inputs are interpreted as booleans (non-zero is an event). The statistic
/// is 1.0 where the cell applies, 0.0 where it doesn't, and NaN where the
/// product of prediction and target is not finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfusionCount {
    TruePositives,
    TrueNegatives,
    FalsePositives,
    FalseNegatives,
}

impl ConfusionCount {
    /// All four cells.
    pub const ALL: [ConfusionCount; 4] = [
        ConfusionCount::TruePositives,
        ConfusionCount::TrueNegatives,
        ConfusionCount::FalsePositives,
        ConfusionCount::FalseNegatives,
    ];

    /// Statistic name, also used as the metric-internal key.
    pub fn name(self) -> &'static str {
        match self {
            ConfusionCount::TruePositives => "TruePositives",
            ConfusionCount::TrueNegatives => "TrueNegatives",
            ConfusionCount::FalsePositives => "FalsePositives",
            ConfusionCount::FalseNegatives => "FalseNegatives",
        }
    }

    fn applies(self, predicted: bool, observed: bool) -> bool {
        match self {
            ConfusionCount::TruePositives => predicted && observed,
            ConfusionCount::TrueNegatives => !predicted && !observed,
            ConfusionCount::FalsePositives => predicted && !observed,
            ConfusionCount::FalseNegatives => !predicted && observed,
        }
    }

    /// Indicator value for a single prediction/target pair.
    pub fn indicator(self, prediction: f64, target: f64) -> f64 {
        if !(prediction * target).is_finite() {
            return f64::NAN;
        }
        if self.applies(prediction != 0.0, target != 0.0) {
            1.0
        } else {
            0.0
        }
    }

    /// Indicator array for one variable. Masks are forwarded.
    pub fn compute_variable(
        self,
        prediction: &MaskedArray,
        target: &MaskedArray,
    ) -> Result<MaskedArray, MetricError> {
        elementwise(prediction, target, |&p, &t| self.indicator(p, t))
    }
}

impl Statistic for ConfusionCount {
    fn unique_name(&self) -> String {
        self.name().to_string()
    }

    fn compute(&self, predictions: &Variables, targets: &Variables) -> Result<Variables, MetricError> {
        tracing::debug!(statistic = self.name(), "computing confusion indicator");
        map_variables(predictions, targets, |_, p, t| self.compute_variable(p, t))
    }
}
