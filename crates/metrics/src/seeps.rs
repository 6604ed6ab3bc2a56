//! Stable Equitable Error in Probability Space (SEEPS) for precipitation.
//!
//! Precipitation is sorted into three categories (dry, light, heavy) using
//! a fixed dry threshold and a climatological wet threshold looked up at each
//! forecast's valid time. The forecast/observation category pair selects an
//! entry of a penalty matrix built from the climatological dry fraction `p1`.
//! Locations whose `p1` lies outside `[min_p1, max_p1]` are masked out.
//!
//! Reference: Rodwell et al. (2010), "A new equitable score suitable for
//! verifying precipitation in numerical weather prediction".

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tempest_array::{Coordinate, MaskedArray, NamedArray, ValidityMask};

use crate::climatology::{Climatology, DAY_OF_YEAR, HOUR, valid_time_grid};
use crate::error::MetricError;
use crate::metric::{Metric, join_values};
use crate::statistic::{AggregatedVariables, Statistic, StatisticValues, Variables, lookup};

/// Category axis produced by [`categorize`].
pub const SEEPS_CAT: &str = "seeps_cat";
/// Forecast category axis of the contingency and scoring arrays.
pub const FORECAST_CAT: &str = "forecast_cat";
/// Observed category axis of the contingency and scoring arrays.
pub const TRUTH_CAT: &str = "truth_cat";

/// Metric-internal key of the SEEPS statistic.
pub const SEEPS_STATISTIC_KEY: &str = "SEEPSStatistic";

/// Precipitation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeepsCategory {
    Dry,
    Light,
    Heavy,
}

impl SeepsCategory {
    /// Categories in axis order.
    pub const ALL: [SeepsCategory; 3] = [SeepsCategory::Dry, SeepsCategory::Light, SeepsCategory::Heavy];

    /// Coordinate label.
    pub fn label(self) -> &'static str {
        match self {
            SeepsCategory::Dry => "dry",
            SeepsCategory::Light => "light",
            SeepsCategory::Heavy => "heavy",
        }
    }

    fn coordinate() -> Coordinate {
        Coordinate::labels(Self::ALL.map(Self::label))
    }

    /// 1.0 if `value` falls in this category, 0.0 otherwise, NaN if `value`
    /// is not finite.
    ///
    /// Dry is `value <= dry`, light is `dry < value < wet` and heavy is
    /// `value >= wet`.
    pub fn indicator(self, value: f64, dry: f64, wet: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let hit = match self {
            SeepsCategory::Dry => value <= dry,
            SeepsCategory::Light => value > dry && value < wet,
            SeepsCategory::Heavy => value >= wet,
        };
        if hit { 1.0 } else { 0.0 }
    }
}

/// One-hot encodes `values` along a new `seeps_cat` dimension.
///
/// `wet_threshold` is aligned with `values` by dimension name.
pub fn categorize(
    values: &NamedArray<f64>,
    dry_threshold: f64,
    wet_threshold: &NamedArray<f64>,
) -> Result<NamedArray<f64>, MetricError> {
    let layers = SeepsCategory::ALL
        .iter()
        .map(|&cat| values.zip_with(wet_threshold, |&v, &wet| cat.indicator(v, dry_threshold, wet)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NamedArray::stack(SEEPS_CAT, SeepsCategory::coordinate(), &layers)?)
}

/// Penalty for forecasting `forecast` when `truth` was observed, before
/// halving.
fn penalty(forecast: SeepsCategory, truth: SeepsCategory, p1: f64) -> f64 {
    use SeepsCategory::{Dry, Heavy, Light};
    match (forecast, truth) {
        (Dry, Dry) | (Light, Light) | (Heavy, Heavy) => 0.0,
        (Dry, Light) => 1.0 / (1.0 - p1),
        (Dry, Heavy) => 4.0 / (1.0 - p1),
        (Light, Dry) => 1.0 / p1,
        (Light, Heavy) => 3.0 / (1.0 - p1),
        (Heavy, Dry) => 1.0 / p1 + 3.0 / (2.0 + p1),
        (Heavy, Light) => 3.0 / (2.0 + p1),
    }
}

/// SEEPS penalty matrix for a climatological dry fraction `p1`.
///
/// The result has dimensions `forecast_cat`, `truth_cat` followed by those
/// of `p1`. The diagonal is exactly zero for every `p1`, including NaN.
pub fn scoring_matrix(p1: &NamedArray<f64>) -> Result<NamedArray<f64>, MetricError> {
    let rows = SeepsCategory::ALL
        .iter()
        .map(|&forecast| {
            let cells: Vec<NamedArray<f64>> = SeepsCategory::ALL
                .iter()
                .map(|&truth| p1.map(|&p| 0.5 * penalty(forecast, truth, p)))
                .collect();
            NamedArray::stack(TRUTH_CAT, SeepsCategory::coordinate(), &cells)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NamedArray::stack(FORECAST_CAT, SeepsCategory::coordinate(), &rows)?)
}

/// A scalar applied to every variable or one value per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerVariable {
    Uniform(f64),
    Each(Vec<f64>),
}

impl From<f64> for PerVariable {
    fn from(value: f64) -> Self {
        PerVariable::Uniform(value)
    }
}

impl From<Vec<f64>> for PerVariable {
    fn from(values: Vec<f64>) -> Self {
        PerVariable::Each(values)
    }
}

impl PerVariable {
    fn resolve(&self, parameter: &'static str, count: usize) -> Result<Vec<f64>, MetricError> {
        match self {
            PerVariable::Uniform(v) => Ok(vec![*v; count]),
            PerVariable::Each(values) if values.len() == count => Ok(values.clone()),
            PerVariable::Each(values) => Err(MetricError::LengthMismatch {
                parameter,
                expected: count,
                got: values.len(),
            }),
        }
    }
}

/// Unit of the precipitation fields being scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecipitationUnit {
    /// Metres of water equivalent; millimetre thresholds are divided by 1000.
    #[default]
    Metres,
    Millimetres,
}

impl PrecipitationUnit {
    /// Converts a threshold given in millimetres to this unit.
    pub fn from_millimetres(self, mm: f64) -> f64 {
        match self {
            PrecipitationUnit::Metres => mm / 1000.0,
            PrecipitationUnit::Millimetres => mm,
        }
    }
}

/// Default dry threshold in millimetres.
pub fn default_dry_threshold_mm() -> PerVariable {
    PerVariable::Uniform(0.25)
}

/// Default lower bound on `p1`.
pub fn default_min_p1() -> PerVariable {
    PerVariable::Uniform(0.1)
}

/// Default upper bound on `p1`.
pub fn default_max_p1() -> PerVariable {
    PerVariable::Uniform(0.85)
}

/// Configuration for a [`SeepsStatistic`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeepsConfig {
    variables: Vec<String>,
    dry_threshold_mm: PerVariable,
    min_p1: PerVariable,
    max_p1: PerVariable,
    unit: PrecipitationUnit,
}

impl SeepsConfig {
    /// Configuration for `variables` with default thresholds.
    pub fn new<S: Into<String>>(variables: impl IntoIterator<Item = S>) -> Self {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            dry_threshold_mm: default_dry_threshold_mm(),
            min_p1: default_min_p1(),
            max_p1: default_max_p1(),
            unit: PrecipitationUnit::default(),
        }
    }

    /// Set the dry threshold in millimetres.
    pub fn with_dry_threshold_mm(mut self, value: impl Into<PerVariable>) -> Self {
        self.dry_threshold_mm = value.into();
        self
    }

    /// Set the lower bound of the valid `p1` range.
    pub fn with_min_p1(mut self, value: impl Into<PerVariable>) -> Self {
        self.min_p1 = value.into();
        self
    }

    /// Set the upper bound of the valid `p1` range.
    pub fn with_max_p1(mut self, value: impl Into<PerVariable>) -> Self {
        self.max_p1 = value.into();
        self
    }

    /// Set the precipitation unit.
    pub fn with_unit(mut self, unit: PrecipitationUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Configured variables.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Name identifying the configuration.
    ///
    /// Parameters are expanded to one value per variable before joining, so
    /// a scalar and the equivalent list give the same name.
    ///
    /// # Errors
    ///
    /// Same as [`SeepsConfig::resolve`].
    pub fn unique_name(&self) -> Result<String, MetricError> {
        let [dry, min, max] = self.per_variable()?;
        let name = format!(
            "SEEPS_{}_dry_threshold_mm_{}_min_p1_{}_max_p1_{}",
            self.variables.join("_"),
            join_values(&dry),
            join_values(&min),
            join_values(&max)
        );
        Ok(match self.unit {
            PrecipitationUnit::Metres => name,
            PrecipitationUnit::Millimetres => format!("{name}_unit_mm"),
        })
    }

    /// Resolves per-variable settings.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::EmptyVariables`] with no variables,
    /// [`MetricError::LengthMismatch`] if a list parameter has the wrong
    /// length, and [`MetricError::InvalidP1Range`] if `min_p1 > max_p1`.
    pub fn resolve(&self) -> Result<Vec<SeepsVariable>, MetricError> {
        let [dry, min, max] = self.per_variable()?;
        Ok(self
            .variables
            .iter()
            .enumerate()
            .map(|(i, name)| SeepsVariable {
                name: name.clone(),
                dry_threshold: self.unit.from_millimetres(dry[i]),
                min_p1: min[i],
                max_p1: max[i],
            })
            .collect())
    }

    /// Dry threshold (mm), `min_p1` and `max_p1`, one value per variable.
    fn per_variable(&self) -> Result<[Vec<f64>; 3], MetricError> {
        let n = self.variables.len();
        if n == 0 {
            return Err(MetricError::EmptyVariables {
                statistic: "SEEPS".to_string(),
            });
        }
        let dry = self.dry_threshold_mm.resolve("dry_threshold_mm", n)?;
        let min = self.min_p1.resolve("min_p1", n)?;
        let max = self.max_p1.resolve("max_p1", n)?;
        if let Some(i) = (0..n).find(|&i| min[i] > max[i]) {
            return Err(MetricError::InvalidP1Range {
                variable: self.variables[i].clone(),
                min_p1: min[i],
                max_p1: max[i],
            });
        }
        Ok([dry, min, max])
    }
}

/// Resolved settings for one variable. The dry threshold is in the unit of
/// the data.
#[derive(Debug, Clone, PartialEq)]
pub struct SeepsVariable {
    pub name: String,
    pub dry_threshold: f64,
    pub min_p1: f64,
    pub max_p1: f64,
}

impl SeepsVariable {
    fn threshold_field(&self) -> String {
        format!("{}_seeps_threshold", self.name)
    }

    fn dry_fraction_field(&self) -> String {
        format!("{}_seeps_dry_fraction", self.name)
    }
}

/// The SEEPS statistic.
///
/// Inputs must carry `init_time` (time labels) and `lead_time` (duration
/// labels) dimensions. The climatology must hold
/// `{variable}_seeps_threshold` and `{variable}_seeps_dry_fraction` fields
/// over `dayofyear`, `hour` and the spatial dimensions of the inputs.
#[derive(Debug, Clone)]
pub struct SeepsStatistic {
    name: String,
    variables: Vec<SeepsVariable>,
    climatology: Arc<Climatology>,
}

impl SeepsStatistic {
    /// Resolves `config` once and binds it to `climatology`.
    pub fn new(config: &SeepsConfig, climatology: Arc<Climatology>) -> Result<Self, MetricError> {
        Ok(Self {
            name: config.unique_name()?,
            variables: config.resolve()?,
            climatology,
        })
    }

    /// Resolved per-variable settings.
    pub fn variables(&self) -> &[SeepsVariable] {
        &self.variables
    }

    fn score_variable(
        &self,
        settings: &SeepsVariable,
        prediction: &MaskedArray,
        target: &MaskedArray,
    ) -> Result<MaskedArray, MetricError> {
        tracing::debug!(variable = %settings.name, "computing SEEPS");

        let times = valid_time_grid(prediction.values())?;
        let wet_threshold = self.climatology.select(&settings.threshold_field(), &times)?;

        let forecast = categorize(prediction.values(), settings.dry_threshold, &wet_threshold)?
            .rename_dim(SEEPS_CAT, FORECAST_CAT)?;
        let truth = categorize(target.values(), settings.dry_threshold, &wet_threshold)?
            .rename_dim(SEEPS_CAT, TRUTH_CAT)?;
        let contingency = forecast.zip_with(&truth, |a, b| a * b)?;

        let p1 = self
            .climatology
            .field(&settings.dry_fraction_field())?
            .mean_over(&[DAY_OF_YEAR, HOUR])?;
        let scoring = scoring_matrix(&p1)?;
        let score = contingency.dot(&scoring, &[FORECAST_CAT, TRUTH_CAT])?;

        let p1_mask = ValidityMask::new(p1.map(|&p| p >= settings.min_p1 && p <= settings.max_p1));
        let score = score.where_mask(&p1_mask)?;
        let mask = match (prediction.mask(), target.mask()) {
            (Some(_), Some(_)) => {
                return Err(MetricError::BothOperandsMasked {
                    variable: settings.name.clone(),
                });
            }
            (Some(m), None) | (None, Some(m)) => p1_mask.and(m)?,
            (None, None) => p1_mask,
        };
        Ok(MaskedArray::new(score).with_mask(mask)?)
    }
}

impl Statistic for SeepsStatistic {
    fn unique_name(&self) -> String {
        self.name.clone()
    }

    /// Scores the configured variables only; other prediction variables are
    /// ignored.
    fn compute(&self, predictions: &Variables, targets: &Variables) -> Result<Variables, MetricError> {
        self.variables
            .par_iter()
            .map(|settings| {
                let prediction = lookup(predictions, &settings.name, "predictions")?;
                let target = lookup(targets, &settings.name, "targets")?;
                let score = self.score_variable(settings, prediction, target)?;
                Ok((settings.name.clone(), score))
            })
            .collect()
    }
}

/// SEEPS metric: the aggregated SEEPS statistic, passed through unchanged.
#[derive(Debug, Clone)]
pub struct Seeps {
    statistic: Arc<SeepsStatistic>,
}

impl Seeps {
    /// Metric over a configured statistic.
    pub fn new(statistic: SeepsStatistic) -> Self {
        Self {
            statistic: Arc::new(statistic),
        }
    }
}

impl Metric for Seeps {
    fn unique_name(&self) -> String {
        self.statistic.unique_name()
    }

    fn statistics(&self) -> BTreeMap<String, Arc<dyn Statistic>> {
        let statistic: Arc<dyn Statistic> = self.statistic.clone();
        BTreeMap::from([(SEEPS_STATISTIC_KEY.to_string(), statistic)])
    }

    fn values_from_mean_statistics(&self, statistic_values: &StatisticValues) -> Result<AggregatedVariables, MetricError> {
        statistic_values
            .get(SEEPS_STATISTIC_KEY)
            .cloned()
            .ok_or_else(|| MetricError::MissingStatistic {
                key: SEEPS_STATISTIC_KEY.to_string(),
            })
    }
}
