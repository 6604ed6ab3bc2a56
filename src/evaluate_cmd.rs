//! Evaluate command: score predictions against targets.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use tempest_metrics::aggregate;

use crate::cli::EvaluateArgs;
use crate::config::TempestConfig;
use crate::{convert, io};

/// Run the evaluation pipeline.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();
    // 1. Load project TOML
    let config = TempestConfig::load(&args.config)?;
    if config.metrics.is_empty() {
        bail!(
            "no metrics configured: add [[metrics]] entries to {}",
            args.config.display()
        );
    }

    // 2. Load the climatology, if any
    let climatology = config
        .climatology
        .as_ref()
        .map(|path| {
            info!(path = %path.display(), "reading climatology");
            io::read_climatology(path).map(Arc::new)
        })
        .transpose()?;

    // 3. Build metrics
    let metrics = convert::build_metrics(&config.metrics, climatology.as_ref())?;
    let eval_config = convert::build_evaluate_config(&config.evaluate);
    info!(
        n_metrics = metrics.len(),
        reduce_dims = ?eval_config.reduce_dims(),
        masked = eval_config.masked(),
        "metrics configured"
    );

    // 4. Read predictions and targets
    info!(path = %args.input.display(), "reading input");
    let input = io::read_input(&args.input)?;
    info!(
        n_variables = input.predictions.len(),
        "input loaded"
    );

    // 5. Evaluate
    let results = aggregate::evaluate(&metrics, &input.predictions, &input.targets, &eval_config)
        .context("evaluation failed")?;

    // 6. Write results
    let output = output_path(&args);
    io::write_results(&output, &results)?;
    info!(path = %output.display(), n_metrics = results.len(), "results written");

    Ok(())
}

fn output_path(args: &EvaluateArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("metrics.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(dir: &std::path::Path, output: Option<PathBuf>) -> EvaluateArgs {
        EvaluateArgs {
            config: dir.join("tempest.toml"),
            input: dir.join("forecast.json"),
            output,
        }
    }

    fn write(path: PathBuf, contents: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn default_output_sits_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let out = output_path(&args(dir.path(), None));
        assert_eq!(out, dir.path().join("forecast.metrics.json"));

        let explicit = dir.path().join("scores.json");
        assert_eq!(output_path(&args(dir.path(), Some(explicit.clone()))), explicit);
    }

    #[test]
    fn end_to_end_contingency_scores() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path().join("tempest.toml"),
            "[evaluate]\nreduce_dims = [\"init_time\"]\n\n[[metrics]]\nkind = \"csi\"\n\n[[metrics]]\nkind = \"accuracy\"\n",
        );
        write(
            dir.path().join("forecast.json"),
            r#"{
                "predictions": {"tp": {"dims": ["init_time"], "shape": [4], "values": [1.0, 1.0, 0.0, 0.0]}},
                "targets": {"tp": {"dims": ["init_time"], "shape": [4], "values": [1.0, 0.0, 1.0, 0.0]}}
            }"#,
        );

        run(args(dir.path(), None)).unwrap();

        let text = std::fs::read_to_string(dir.path().join("forecast.metrics.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let csi = json["CSI"]["tp"]["values"][0].as_f64().unwrap();
        let accuracy = json["Accuracy"]["tp"]["values"][0].as_f64().unwrap();
        assert!((csi - 1.0 / 3.0).abs() < 1e-12);
        assert!((accuracy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_metric_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("tempest.toml"), "[evaluate]\nmasked = true\n");
        let err = run(args(dir.path(), None)).unwrap_err();
        assert!(format!("{err:#}").contains("no metrics configured"));
    }

    #[test]
    fn seeps_without_climatology_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path().join("tempest.toml"),
            "[[metrics]]\nkind = \"seeps\"\nvariables = [\"tp\"]\n",
        );
        let err = run(args(dir.path(), None)).unwrap_err();
        assert!(format!("{err:#}").contains("requires a climatology"));
    }
}
