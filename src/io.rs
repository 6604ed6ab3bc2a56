//! JSON documents read and written by the `evaluate` command.
//!
//! Arrays are stored flat in row-major order. JSON has no NaN, so missing
//! values are written as `null` and read back as NaN.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::{ArrayD, IxDyn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempest_array::{Coordinate, MaskedArray, NamedArray, ValidityMask};
use tempest_metrics::aggregate::MetricResults;
use tempest_metrics::{Climatology, Variables};

/// Flat serialized form of a labelled array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonArray {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coords: BTreeMap<String, Coordinate>,
}

/// Flat serialized form of a validity mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonMask {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<bool>,
}

/// One input variable: values plus an optional validity mask.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonVariable {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub coords: BTreeMap<String, Coordinate>,
    #[serde(default)]
    pub mask: Option<JsonMask>,
}

/// Input document: forecasts and verifying truth, keyed by variable name.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDocument {
    pub predictions: BTreeMap<String, JsonVariable>,
    pub targets: BTreeMap<String, JsonVariable>,
}

/// Predictions and targets ready for evaluation.
#[derive(Debug)]
pub struct EvaluationInput {
    pub predictions: Variables,
    pub targets: Variables,
}

impl JsonArray {
    fn into_named(self) -> Result<NamedArray<f64>> {
        let values = self
            .values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        let data = shaped(&self.shape, values)?;
        let mut array = NamedArray::new(self.dims, data)?;
        for (dim, coord) in self.coords {
            array = array
                .with_coord(&dim, coord)
                .with_context(|| format!("invalid coordinate for dimension '{dim}'"))?;
        }
        Ok(array)
    }

    fn from_named(array: &NamedArray<f64>) -> Self {
        Self {
            dims: array.dims().to_vec(),
            shape: array.shape().to_vec(),
            values: array
                .data()
                .iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect(),
            coords: array.coords().clone(),
        }
    }
}

impl JsonMask {
    fn into_mask(self) -> Result<ValidityMask> {
        let data = shaped(&self.shape, self.values)?;
        Ok(ValidityMask::new(NamedArray::new(self.dims, data)?))
    }
}

impl JsonVariable {
    fn into_masked(self) -> Result<MaskedArray> {
        let values = JsonArray {
            dims: self.dims,
            shape: self.shape,
            values: self.values,
            coords: self.coords,
        }
        .into_named()?;
        let mask = self.mask.map(JsonMask::into_mask).transpose()?;
        Ok(MaskedArray::new(values).with_optional_mask(mask)?)
    }
}

fn shaped<T>(shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>> {
    let expected: usize = shape.iter().product();
    if values.len() != expected {
        bail!(
            "shape {shape:?} holds {expected} values, got {}",
            values.len()
        );
    }
    Ok(ArrayD::from_shape_vec(IxDyn(shape), values)?)
}

fn convert_variables(variables: BTreeMap<String, JsonVariable>, role: &str) -> Result<Variables> {
    variables
        .into_iter()
        .map(|(name, variable)| {
            let array = variable
                .into_masked()
                .with_context(|| format!("invalid {role} variable '{name}'"))?;
            Ok((name, array))
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Reads predictions and targets from a JSON input document.
pub fn read_input(path: &Path) -> Result<EvaluationInput> {
    let doc: InputDocument = read_json(path)?;
    Ok(EvaluationInput {
        predictions: convert_variables(doc.predictions, "prediction")?,
        targets: convert_variables(doc.targets, "target")?,
    })
}

/// Reads a climatology: a JSON object of named fields.
pub fn read_climatology(path: &Path) -> Result<Climatology> {
    let fields: BTreeMap<String, JsonArray> = read_json(path)?;
    fields
        .into_iter()
        .try_fold(Climatology::new(), |clim, (name, field)| {
            let array = field
                .into_named()
                .with_context(|| format!("invalid climatology field '{name}'"))?;
            Ok(clim.with_field(name, array))
        })
}

/// Writes metric results as `{metric: {variable: array}}` JSON.
pub fn write_results(path: &Path, results: &MetricResults) -> Result<()> {
    let output: BTreeMap<&str, BTreeMap<&str, JsonArray>> = results
        .iter()
        .map(|(metric, variables)| {
            let arrays = variables
                .iter()
                .map(|(name, array)| (name.as_str(), JsonArray::from_named(array)))
                .collect();
            (metric.as_str(), arrays)
        })
        .collect();

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &output)
        .with_context(|| format!("failed to write JSON: {}", path.display()))
}
