//! Closed-form scores of the 2x2 contingency table.

use std::collections::BTreeMap;
use std::sync::Arc;

use tempest_array::NamedArray;

use crate::confusion::ConfusionCount;
use crate::confusion::ConfusionCount::{
    FalseNegatives as FN, FalsePositives as FP, TrueNegatives as TN, TruePositives as TP,
};
use crate::error::MetricError;
use crate::metric::{Metric, statistic};
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues};

/// Averaged contingency table at one position.
///
/// Cells a metric does not request are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContingencyTable {
    pub hits: f64,
    pub false_alarms: f64,
    pub misses: f64,
    pub correct_negatives: f64,
}

impl Default for ContingencyTable {
    fn default() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    }
}

impl ContingencyTable {
    pub fn new(hits: f64, false_alarms: f64, misses: f64, correct_negatives: f64) -> Self {
        Self {
            hits,
            false_alarms,
            misses,
            correct_negatives,
        }
    }

    /// Copy with one cell replaced.
    pub fn with(mut self, count: ConfusionCount, value: f64) -> Self {
        match count {
            ConfusionCount::TruePositives => self.hits = value,
            ConfusionCount::FalsePositives => self.false_alarms = value,
            ConfusionCount::FalseNegatives => self.misses = value,
            ConfusionCount::TrueNegatives => self.correct_negatives = value,
        }
        self
    }

    pub fn total(&self) -> f64 {
        self.hits + self.false_alarms + self.misses + self.correct_negatives
    }

    /// H = TP / (TP + FN).
    pub fn hit_rate(&self) -> f64 {
        self.hits / (self.hits + self.misses)
    }

    /// F = FP / (FP + TN).
    pub fn false_alarm_rate(&self) -> f64 {
        self.false_alarms / (self.false_alarms + self.correct_negatives)
    }

    /// Observed event frequency (TP + FN) / total.
    pub fn base_rate(&self) -> f64 {
        (self.hits + self.misses) / self.total()
    }

    /// Forecast event frequency (TP + FP) / total.
    pub fn forecast_rate(&self) -> f64 {
        (self.hits + self.false_alarms) / self.total()
    }
}

/// Combines the averaged confusion counts of every variable into tables.
///
/// Variables are taken from the first requested count; every other count
/// must cover them too.
pub(crate) fn tables(
    values: &StatisticValues,
    counts: &[ConfusionCount],
) -> Result<BTreeMap<String, NamedArray<ContingencyTable>>, MetricError> {
    for count in counts {
        statistic(values, count.name())?;
    }
    let Some((&first, rest)) = counts.split_first() else {
        return Ok(BTreeMap::new());
    };
    let mut out = BTreeMap::new();
    for (variable, array) in statistic(values, first.name())? {
        let mut table = array.map(|&v| ContingencyTable::default().with(first, v));
        for &count in rest {
            let other = statistic(values, count.name())?.get(variable).ok_or_else(|| {
                MetricError::MissingVariable {
                    variable: variable.clone(),
                    location: format!("{} statistic", count.name()),
                }
            })?;
            table = table.zip_with(other, |t, &v| t.with(count, v))?;
        }
        out.insert(variable.clone(), table);
    }
    Ok(out)
}

/// The statistics map for a set of confusion counts.
pub(crate) fn count_statistics(counts: &[ConfusionCount]) -> BTreeMap<String, Arc<dyn Statistic>> {
    counts
        .iter()
        .map(|&count| {
            let statistic: Arc<dyn Statistic> = Arc::new(count);
            (count.name().to_string(), statistic)
        })
        .collect()
}

/// Scores computed elementwise from the averaged contingency table.
///
/// Division by zero and logarithms of zero give NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContingencyScore {
    /// Critical success index, TP / (TP + FP + FN).
    Csi,
    /// (TP + TN) / total.
    Accuracy,
    /// Hit rate, TP / (TP + FN).
    Recall,
    /// TP / (TP + FP).
    Precision,
    /// 2TP / (2TP + FP + FN).
    F1Score,
    /// (TP + FP) / (TP + FN).
    FrequencyBias,
    /// Heidke skill score.
    Hss,
    /// Gilbert skill score (equitable threat score).
    Gss,
    /// Extreme dependency score.
    Eds,
    /// Symmetric extreme dependency score.
    Seds,
    /// False alarm rate, FP / (FP + TN).
    FalseAlarmRate,
    /// TN / (FP + TN).
    Specificity,
    /// Odds ratio skill score.
    Orss,
    /// Peirce skill score, H - F.
    Pss,
    /// Extremal dependence index.
    Edi,
    /// Symmetric extremal dependence index.
    Sedi,
}

impl ContingencyScore {
    pub const ALL: [ContingencyScore; 16] = [
        ContingencyScore::Csi,
        ContingencyScore::Accuracy,
        ContingencyScore::Recall,
        ContingencyScore::Precision,
        ContingencyScore::F1Score,
        ContingencyScore::FrequencyBias,
        ContingencyScore::Hss,
        ContingencyScore::Gss,
        ContingencyScore::Eds,
        ContingencyScore::Seds,
        ContingencyScore::FalseAlarmRate,
        ContingencyScore::Specificity,
        ContingencyScore::Orss,
        ContingencyScore::Pss,
        ContingencyScore::Edi,
        ContingencyScore::Sedi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContingencyScore::Csi => "CSI",
            ContingencyScore::Accuracy => "Accuracy",
            ContingencyScore::Recall => "Recall",
            ContingencyScore::Precision => "Precision",
            ContingencyScore::F1Score => "F1Score",
            ContingencyScore::FrequencyBias => "FrequencyBias",
            ContingencyScore::Hss => "HSS",
            ContingencyScore::Gss => "GSS",
            ContingencyScore::Eds => "EDS",
            ContingencyScore::Seds => "SEDS",
            ContingencyScore::FalseAlarmRate => "F",
            ContingencyScore::Specificity => "Specificity",
            ContingencyScore::Orss => "ORSS",
            ContingencyScore::Pss => "PSS",
            ContingencyScore::Edi => "EDI",
            ContingencyScore::Sedi => "SEDI",
        }
    }

    /// Confusion counts the score reads.
    pub fn required(self) -> &'static [ConfusionCount] {
        match self {
            ContingencyScore::Csi | ContingencyScore::F1Score | ContingencyScore::FrequencyBias => {
                &[TP, FP, FN]
            }
            ContingencyScore::Recall => &[TP, FN],
            ContingencyScore::Precision => &[TP, FP],
            ContingencyScore::FalseAlarmRate | ContingencyScore::Specificity => &[FP, TN],
            ContingencyScore::Accuracy
            | ContingencyScore::Hss
            | ContingencyScore::Gss
            | ContingencyScore::Eds
            | ContingencyScore::Seds
            | ContingencyScore::Orss
            | ContingencyScore::Pss
            | ContingencyScore::Edi
            | ContingencyScore::Sedi => &[TP, FP, FN, TN],
        }
    }

    /// Evaluates the score on one table.
    pub fn score(self, t: &ContingencyTable) -> f64 {
        let (tp, fp, fn_, tn) = (t.hits, t.false_alarms, t.misses, t.correct_negatives);
        match self {
            ContingencyScore::Csi => tp / (tp + fp + fn_),
            ContingencyScore::Accuracy => (tp + tn) / t.total(),
            ContingencyScore::Recall => t.hit_rate(),
            ContingencyScore::Precision => tp / (tp + fp),
            ContingencyScore::F1Score => 2.0 * tp / (2.0 * tp + fp + fn_),
            ContingencyScore::FrequencyBias => (tp + fp) / (tp + fn_),
            ContingencyScore::Hss => {
                let total = t.total();
                let expected = ((tp + fp) * (tp + fn_) + (fp + tn) * (fn_ + tn)) / total;
                ((tp + tn) - expected) / (total - expected)
            }
            ContingencyScore::Gss => {
                let random_hits = (tp + fp) * (tp + fn_) / t.total();
                (tp - random_hits) / ((tp + fp + fn_) - random_hits)
            }
            ContingencyScore::Eds => {
                let (b, h) = (t.base_rate().ln(), t.hit_rate().ln());
                (b - h) / (b + h)
            }
            ContingencyScore::Seds => {
                let (r, b, h) = (t.forecast_rate().ln(), t.base_rate().ln(), t.hit_rate().ln());
                (r - h) / (b + h)
            }
            ContingencyScore::FalseAlarmRate => t.false_alarm_rate(),
            ContingencyScore::Specificity => tn / (fp + tn),
            ContingencyScore::Orss => (tp * tn - fp * fn_) / (tp * tn + fp * fn_),
            ContingencyScore::Pss => t.hit_rate() - t.false_alarm_rate(),
            ContingencyScore::Edi => {
                let (f, h) = (t.false_alarm_rate().ln(), t.hit_rate().ln());
                (f - h) / (f + h)
            }
            ContingencyScore::Sedi => {
                let (f, h) = (t.false_alarm_rate(), t.hit_rate());
                let (lf, lh, l1h, l1f) = (f.ln(), h.ln(), (1.0 - h).ln(), (1.0 - f).ln());
                (lf - lh + l1h - l1f) / (lf + lh + l1h + l1f)
            }
        }
    }
}

impl Metric for ContingencyScore {
    fn unique_name(&self) -> String {
        self.name().to_string()
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        count_statistics(self.required())
    }

    fn values_from_mean_statistics(
        &self,
        statistic_values: &StatisticValues,
    ) -> Result<AggregatedVariables, MetricError> {
        tracing::debug!(metric = self.name(), "deriving contingency score");
        Ok(tables(statistic_values, self.required())?
            .into_iter()
            .map(|(variable, table)| (variable, table.map(|t| self.score(t))))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> ContingencyTable {
        ContingencyTable::new(3.0, 1.0, 2.0, 4.0)
    }

    #[test]
    fn reference_scores() {
        let t = table();
        assert_relative_eq!(ContingencyScore::Csi.score(&t), 0.5);
        assert_relative_eq!(ContingencyScore::Accuracy.score(&t), 0.7);
        assert_relative_eq!(ContingencyScore::Recall.score(&t), 0.6);
        assert_relative_eq!(ContingencyScore::Precision.score(&t), 0.75);
        assert_relative_eq!(ContingencyScore::F1Score.score(&t), 2.0 / 3.0);
        assert_relative_eq!(ContingencyScore::FrequencyBias.score(&t), 0.8);
        assert_relative_eq!(ContingencyScore::FalseAlarmRate.score(&t), 0.2);
        assert_relative_eq!(ContingencyScore::Specificity.score(&t), 0.8);
        assert_relative_eq!(ContingencyScore::Pss.score(&t), 0.4);
        assert_relative_eq!(ContingencyScore::Orss.score(&t), 10.0 / 14.0);
    }

    #[test]
    fn skill_scores() {
        let t = table();
        // E = (4*5 + 5*6) / 10 = 5
        assert_relative_eq!(ContingencyScore::Hss.score(&t), 0.4);
        // A = 4*5/10 = 2
        assert_relative_eq!(ContingencyScore::Gss.score(&t), 0.25);
        let (b, h) = (0.5f64.ln(), 0.6f64.ln());
        assert_relative_eq!(ContingencyScore::Eds.score(&t), (b - h) / (b + h));
        let r = 0.4f64.ln();
        assert_relative_eq!(ContingencyScore::Seds.score(&t), (r - h) / (b + h));
    }

    #[test]
    fn extremal_dependence_indices() {
        let t = table();
        let (f, h) = (0.2f64, 0.6f64);
        assert_relative_eq!(
            ContingencyScore::Edi.score(&t),
            (f.ln() - h.ln()) / (f.ln() + h.ln())
        );
        let num = f.ln() - h.ln() + (1.0 - h).ln() - (1.0 - f).ln();
        let den = f.ln() + h.ln() + (1.0 - h).ln() + (1.0 - f).ln();
        assert_relative_eq!(ContingencyScore::Sedi.score(&t), num / den);
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        let empty = ContingencyTable::new(0.0, 0.0, 0.0, 0.0);
        assert!(ContingencyScore::Csi.score(&empty).is_nan());
        let no_events = ContingencyTable::new(0.0, 0.0, 0.0, 1.0);
        assert!(ContingencyScore::Edi.score(&no_events).is_nan());
    }

    #[test]
    fn declared_statistics_match_required_counts() {
        let recall = ContingencyScore::Recall.statistics();
        let keys: Vec<&str> = recall.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["FalseNegatives", "TruePositives"]);
        assert_eq!(ContingencyScore::Hss.statistics().len(), 4);
    }

    #[test]
    fn names_are_distinct() {
        let mut names: Vec<&str> = ContingencyScore::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ContingencyScore::ALL.len());
    }

    #[test]
    fn missing_statistic_is_reported() {
        let mut values = StatisticValues::new();
        values.insert("TruePositives".to_string(), AggregatedVariables::new());
        let err = ContingencyScore::Csi.values_from_mean_statistics(&values);
        assert!(matches!(
            err,
            Err(MetricError::MissingStatistic { ref key }) if key == "FalsePositives"
        ));
    }
}
