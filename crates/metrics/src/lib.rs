//! # tempest-metrics
//!
//! Categorical verification statistics and metrics for gridded weather
//! forecasts.
//!
//! A [`Statistic`] is computed per evaluation unit (e.g. per init time, lead
//! time and grid point) from predictions and targets. An external aggregator
//! averages statistics over the requested dimensions, and a [`Metric`]
//! turns the averaged statistics into a score. The [`aggregate`] module is a
//! reference aggregator running the whole pipeline.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     P["predictions"] --> S["Statistic::compute"]
//!     T["targets"] --> S
//!     C["Climatology"] -.->|SEEPS| S
//!     S --> A["masked mean over reduce_dims"]
//!     A --> M["Metric::values_from_mean_statistics"]
//!     M --> R["{metric → {variable → array}}"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tempest_metrics::{ContingencyScore, EvaluateConfig, Metric, aggregate};
//!
//! let metrics: Vec<Box<dyn Metric>> = vec![
//!     Box::new(ContingencyScore::Csi),
//!     Box::new(ContingencyScore::Hss),
//! ];
//! let config = EvaluateConfig::default()
//!     .with_reduce_dims(["init_time", "latitude", "longitude"])
//!     .with_masked(true);
//! let results = aggregate::evaluate(&metrics, &predictions, &targets, &config)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `statistic` | `Statistic` trait and per-variable dispatch |
//! | `confusion` | True/false positive/negative indicators |
//! | `seeps` | SEEPS categorization, scoring matrix and statistic |
//! | `climatology` | Day-of-year/hour climatology lookup at valid times |
//! | `metric` | `Metric` trait |
//! | `contingency` | Closed-form 2x2 contingency scores |
//! | `roc` | AUC and ROC skill score |
//! | `economic_value` | Relative and potential economic value |
//! | `brier` | Squared error and Brier score |
//! | `registry` | Config-driven metric construction |
//! | `aggregate` | Reference aggregation pipeline |
//! | `config` | Aggregation configuration |
//! | `error` | Error types |

pub mod aggregate;
mod brier;
mod climatology;
mod config;
mod confusion;
mod contingency;
mod economic_value;
mod error;
mod metric;
mod registry;
mod roc;
mod seeps;
mod statistic;

pub use brier::{BrierScore, SQUARED_ERROR_KEY, SquaredError};
pub use climatology::{Climatology, DAY_OF_YEAR, HOUR, INIT_TIME, LEAD_TIME, valid_time_grid};
pub use config::EvaluateConfig;
pub use confusion::ConfusionCount;
pub use contingency::{ContingencyScore, ContingencyTable};
pub use economic_value::{COST_LOSS_RATIOS, PotentialEconomicValue, RelativeEconomicValue, relative_value};
pub use error::MetricError;
pub use metric::Metric;
pub use registry::MetricSpec;
pub use roc::{Auc, Rocss, roc_area};
pub use seeps::{
    FORECAST_CAT, PerVariable, PrecipitationUnit, SEEPS_CAT, SEEPS_STATISTIC_KEY, Seeps,
    SeepsCategory, SeepsConfig, SeepsStatistic, SeepsVariable, TRUTH_CAT, categorize,
    scoring_matrix,
};
pub use statistic::{AggregatedVariables, Statistic, StatisticValues, Variables, map_variables};
