//! Pure conversion functions: TOML config structs -> crate API types.

use std::sync::Arc;

use anyhow::{Context, Result};
use tempest_metrics::{Climatology, EvaluateConfig, Metric, MetricSpec};

use crate::config::EvaluateToml;

/// Builds an [`EvaluateConfig`] from the TOML evaluate configuration.
pub fn build_evaluate_config(eval: &EvaluateToml) -> EvaluateConfig {
    EvaluateConfig::default()
        .with_reduce_dims(eval.reduce_dims.iter().cloned())
        .with_masked(eval.masked)
}

/// Builds every configured metric.
pub fn build_metrics(
    specs: &[MetricSpec],
    climatology: Option<&Arc<Climatology>>,
) -> Result<Vec<Box<dyn Metric>>> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            spec.build(climatology)
                .with_context(|| format!("invalid metric #{} ({spec:?})", i + 1))
        })
        .collect()
}
