//! Day-of-year/hour climatology and valid-time lookup.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use ndarray::{ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use tempest_array::{ArrayError, Coordinate, NamedArray};
use tempest_calendar::{ClimatologyKey, DayOfYear, HourOfDay, valid_times};

use crate::error::MetricError;

/// Day-of-year dimension of climatology fields.
pub const DAY_OF_YEAR: &str = "dayofyear";
/// Hour-of-day dimension of climatology fields.
pub const HOUR: &str = "hour";
/// Forecast initialisation dimension.
pub const INIT_TIME: &str = "init_time";
/// Forecast lead dimension.
pub const LEAD_TIME: &str = "lead_time";

/// Named climatology fields indexed by `dayofyear` and `hour`, plus any
/// spatial dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Climatology {
    fields: BTreeMap<String, NamedArray<f64>>,
}

impl Climatology {
    /// Empty climatology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field.
    pub fn with_field(mut self, name: impl Into<String>, field: NamedArray<f64>) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Looks up a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::MissingClimatologyField`] if it is absent.
    pub fn field(&self, name: &str) -> Result<&NamedArray<f64>, MetricError> {
        self.fields
            .get(name)
            .ok_or_else(|| MetricError::MissingClimatologyField {
                field: name.to_string(),
            })
    }

    /// Selects `field` at the (day-of-year, hour) of every valid time.
    ///
    /// The result has the dimensions of `times` followed by the field's
    /// remaining dimensions, carrying the coordinates of both.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::MissingCoordinate`] if the field lacks integer
    /// `dayofyear` or `hour` labels, [`MetricError::Calendar`] if a label is
    /// not a valid day-of-year or hour, and
    /// [`MetricError::MissingClimatologyKey`] if a valid time has no entry.
    pub fn select(&self, field: &str, times: &NamedArray<NaiveDateTime>) -> Result<NamedArray<f64>, MetricError> {
        let array = self.field(field)?;
        let doy_axis = array.axis_of(DAY_OF_YEAR)?;
        let hour_axis = array.axis_of(HOUR)?;
        let days = int_coord(array, DAY_OF_YEAR)?;
        let hours = int_coord(array, HOUR)?;
        check_labels(days, hours)?;

        let rest: Vec<usize> = (0..array.ndim())
            .filter(|&a| a != doy_axis && a != hour_axis)
            .collect();
        let perm: Vec<usize> = [doy_axis, hour_axis].into_iter().chain(rest.iter().copied()).collect();
        let view = array.data().view().permuted_axes(IxDyn(&perm));
        let slab_len: usize = rest.iter().map(|&a| array.shape()[a]).product();

        let mut values = Vec::with_capacity(times.len() * slab_len);
        for &time in times.data() {
            let key = ClimatologyKey::of(time);
            let day = key.day_of_year().get();
            let hour = key.hour().get();
            let missing = || MetricError::MissingClimatologyKey {
                field: field.to_string(),
                day_of_year: day,
                hour,
            };
            let d = days.position_of_int(i64::from(day)).ok_or_else(missing)?;
            let h = hours.position_of_int(i64::from(hour)).ok_or_else(missing)?;
            let slab = view
                .clone()
                .index_axis_move(Axis(0), d)
                .index_axis_move(Axis(0), h);
            values.extend(slab.iter().copied());
        }

        let mut dims = times.dims().to_vec();
        let mut shape = times.shape().to_vec();
        for &a in &rest {
            dims.push(array.dims()[a].clone());
            shape.push(array.shape()[a]);
        }
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(ArrayError::from)?;
        let mut out = NamedArray::new(dims, data)?;
        for (dim, coord) in times.coords() {
            out = out.with_coord(dim, coord.clone())?;
        }
        for (dim, coord) in array.coords() {
            if dim != DAY_OF_YEAR && dim != HOUR {
                out = out.with_coord(dim, coord.clone())?;
            }
        }
        Ok(out)
    }
}

fn int_coord<'a>(array: &'a NamedArray<f64>, dim: &str) -> Result<&'a Coordinate, MetricError> {
    array
        .coord(dim)
        .filter(|c| c.as_ints().is_some())
        .ok_or_else(|| MetricError::MissingCoordinate {
            dim: dim.to_string(),
            kind: "int",
        })
}

/// Rejects labels no timestamp can map to.
fn check_labels(days: &Coordinate, hours: &Coordinate) -> Result<(), MetricError> {
    for &day in days.as_ints().into_iter().flatten() {
        DayOfYear::new(day)?;
    }
    for &hour in hours.as_ints().into_iter().flatten() {
        HourOfDay::new(hour)?;
    }
    Ok(())
}

/// Valid times `init_time + lead_time` over the `init_time` and `lead_time`
/// dimensions of `array`.
///
/// # Errors
///
/// Returns [`MetricError::MissingCoordinate`] if either dimension lacks
/// time/duration labels.
pub fn valid_time_grid(array: &NamedArray<f64>) -> Result<NamedArray<NaiveDateTime>, MetricError> {
    let inits = array
        .coord(INIT_TIME)
        .and_then(Coordinate::as_times)
        .ok_or_else(|| MetricError::MissingCoordinate {
            dim: INIT_TIME.to_string(),
            kind: "time",
        })?;
    let leads = array
        .coord(LEAD_TIME)
        .and_then(Coordinate::as_durations)
        .ok_or_else(|| MetricError::MissingCoordinate {
            dim: LEAD_TIME.to_string(),
            kind: "duration",
        })?;

    let times = valid_times(inits, leads)?;
    let data = ArrayD::from_shape_vec(IxDyn(&[inits.len(), leads.len()]), times).map_err(ArrayError::from)?;
    Ok(NamedArray::new([INIT_TIME, LEAD_TIME], data)?
        .with_coord(INIT_TIME, Coordinate::Time(inits.to_vec()))?
        .with_coord(LEAD_TIME, Coordinate::Duration(leads.to_vec()))?)
}
