//! Config-driven construction of metrics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::brier::BrierScore;
use crate::climatology::Climatology;
use crate::contingency::ContingencyScore;
use crate::economic_value::{PotentialEconomicValue, RelativeEconomicValue};
use crate::error::MetricError;
use crate::metric::Metric;
use crate::roc::{Auc, Rocss};
use crate::seeps::{
    PerVariable, PrecipitationUnit, Seeps, SeepsConfig, SeepsStatistic, default_dry_threshold_mm,
    default_max_p1, default_min_p1,
};

/// Every available metric with its parameters.
///
/// Deserializes from a table tagged by `kind`, e.g.
/// `{ kind = "auc", threshold_dim = "threshold_probability" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSpec {
    Csi,
    Accuracy,
    Recall,
    Precision,
    F1Score,
    FrequencyBias,
    Hss,
    Gss,
    Eds,
    Seds,
    FalseAlarmRate,
    Specificity,
    Orss,
    Pss,
    Edi,
    Sedi,
    Auc {
        threshold_dim: String,
    },
    Rocss {
        threshold_dim: String,
    },
    Rev {
        cost_loss_ratios: Vec<f64>,
    },
    Prev {
        cost_loss_ratios: Vec<f64>,
        threshold_dim: String,
    },
    BrierScore {
        #[serde(default)]
        reduce_dims: Vec<String>,
    },
    Seeps {
        variables: Vec<String>,
        #[serde(default = "default_dry_threshold_mm")]
        dry_threshold_mm: PerVariable,
        #[serde(default = "default_min_p1")]
        min_p1: PerVariable,
        #[serde(default = "default_max_p1")]
        max_p1: PerVariable,
        #[serde(default)]
        unit: PrecipitationUnit,
    },
}

impl MetricSpec {
    /// Builds the metric.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::ClimatologyRequired`] for SEEPS without a
    /// climatology, and the SEEPS configuration errors from
    /// [`SeepsConfig::resolve`].
    pub fn build(&self, climatology: Option<&Arc<Climatology>>) -> Result<Box<dyn Metric>, MetricError> {
        let metric: Box<dyn Metric> = match self {
            MetricSpec::Csi => Box::new(ContingencyScore::Csi),
            MetricSpec::Accuracy => Box::new(ContingencyScore::Accuracy),
            MetricSpec::Recall => Box::new(ContingencyScore::Recall),
            MetricSpec::Precision => Box::new(ContingencyScore::Precision),
            MetricSpec::F1Score => Box::new(ContingencyScore::F1Score),
            MetricSpec::FrequencyBias => Box::new(ContingencyScore::FrequencyBias),
            MetricSpec::Hss => Box::new(ContingencyScore::Hss),
            MetricSpec::Gss => Box::new(ContingencyScore::Gss),
            MetricSpec::Eds => Box::new(ContingencyScore::Eds),
            MetricSpec::Seds => Box::new(ContingencyScore::Seds),
            MetricSpec::FalseAlarmRate => Box::new(ContingencyScore::FalseAlarmRate),
            MetricSpec::Specificity => Box::new(ContingencyScore::Specificity),
            MetricSpec::Orss => Box::new(ContingencyScore::Orss),
            MetricSpec::Pss => Box::new(ContingencyScore::Pss),
            MetricSpec::Edi => Box::new(ContingencyScore::Edi),
            MetricSpec::Sedi => Box::new(ContingencyScore::Sedi),
            MetricSpec::Auc { threshold_dim } => Box::new(Auc::new(threshold_dim.clone())),
            MetricSpec::Rocss { threshold_dim } => Box::new(Rocss::new(threshold_dim.clone())),
            MetricSpec::Rev { cost_loss_ratios } => {
                Box::new(RelativeEconomicValue::new(cost_loss_ratios.clone()))
            }
            MetricSpec::Prev {
                cost_loss_ratios,
                threshold_dim,
            } => Box::new(PotentialEconomicValue::new(
                cost_loss_ratios.clone(),
                threshold_dim.clone(),
            )),
            MetricSpec::BrierScore { reduce_dims } => Box::new(BrierScore::new(reduce_dims.iter().cloned())),
            MetricSpec::Seeps {
                variables,
                dry_threshold_mm,
                min_p1,
                max_p1,
                unit,
            } => {
                let config = SeepsConfig::new(variables.iter().cloned())
                    .with_dry_threshold_mm(dry_threshold_mm.clone())
                    .with_min_p1(min_p1.clone())
                    .with_max_p1(max_p1.clone())
                    .with_unit(*unit);
                let Some(climatology) = climatology else {
                    return Err(MetricError::ClimatologyRequired {
                        metric: config.unique_name()?,
                    });
                };
                Box::new(Seeps::new(SeepsStatistic::new(&config, Arc::clone(climatology))?))
            }
        };
        Ok(metric)
    }
}
