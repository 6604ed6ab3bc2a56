use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tempest_metrics::MetricSpec;

/// Top-level Tempest configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TempestConfig {
    /// Climatology JSON, required by SEEPS.
    #[serde(default)]
    pub climatology: Option<PathBuf>,

    /// Aggregation settings.
    #[serde(default)]
    pub evaluate: EvaluateToml,

    /// Metrics to compute.
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

impl TempestConfig {
    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateToml {
    /// Dimensions statistics are averaged over.
    #[serde(default = "default_reduce_dims")]
    pub reduce_dims: Vec<String>,
    /// Honour validity masks when averaging.
    #[serde(default)]
    pub masked: bool,
}

impl Default for EvaluateToml {
    fn default() -> Self {
        Self {
            reduce_dims: default_reduce_dims(),
            masked: false,
        }
    }
}

fn default_reduce_dims() -> Vec<String> {
    vec!["init_time".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config() {
        let file = write_config(
            r#"
climatology = "clim.json"

[evaluate]
reduce_dims = ["init_time", "latitude", "longitude"]
masked = true

[[metrics]]
kind = "csi"

[[metrics]]
kind = "auc"
threshold_dim = "threshold_probability"

[[metrics]]
kind = "seeps"
variables = ["total_precipitation_6hr", "total_precipitation_24hr"]
dry_threshold_mm = [0.25, 1.0]
"#,
        );
        let config = TempestConfig::load(file.path()).unwrap();
        assert_eq!(config.climatology, Some(PathBuf::from("clim.json")));
        assert_eq!(config.evaluate.reduce_dims.len(), 3);
        assert!(config.evaluate.masked);
        assert_eq!(config.metrics.len(), 3);
        assert_eq!(config.metrics[0], MetricSpec::Csi);
        assert!(matches!(config.metrics[2], MetricSpec::Seeps { .. }));
    }

    #[test]
    fn defaults() {
        let file = write_config("[[metrics]]\nkind = \"brier_score\"\n");
        let config = TempestConfig::load(file.path()).unwrap();
        assert!(config.climatology.is_none());
        assert_eq!(config.evaluate.reduce_dims, vec!["init_time"]);
        assert!(!config.evaluate.masked);
    }

    #[test]
    fn evaluate_table_field_defaults() {
        let file = write_config("[evaluate]\nmasked = true\n");
        let config = TempestConfig::load(file.path()).unwrap();
        assert_eq!(config.evaluate.reduce_dims, vec!["init_time"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_config("[evaluate]\nreduce = [\"x\"]\n");
        assert!(TempestConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file() {
        let err = TempestConfig::load(Path::new("/nonexistent/tempest.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
