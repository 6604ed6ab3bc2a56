//! Floating-point reductions and contractions.

use ndarray::ArrayView1;

use crate::error::ArrayError;
use crate::mask::ValidityMask;
use crate::named::NamedArray;

/// Mean of the non-NaN elements of a lane, NaN if there are none.
pub fn nan_mean(lane: ArrayView1<'_, f64>) -> f64 {
    let (sum, count) = lane
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Maximum of the non-NaN elements of a lane, NaN if there are none.
pub fn nan_max(lane: ArrayView1<'_, f64>) -> f64 {
    lane.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(f64::NAN)
}

impl NamedArray<f64> {
    /// NaN-skipping mean over `dims`.
    pub fn mean_over(&self, dims: &[&str]) -> Result<Self, ArrayError> {
        self.reduce_dims(dims, nan_mean)
    }

    /// NaN-skipping maximum over `dims`.
    pub fn max_over(&self, dims: &[&str]) -> Result<Self, ArrayError> {
        self.reduce_dims(dims, nan_max)
    }

    /// Sum over `dims`. NaN propagates.
    pub fn sum_over(&self, dims: &[&str]) -> Result<Self, ArrayError> {
        self.reduce_dims(dims, |lane| lane.sum())
    }

    /// Multiplies with `other` (aligned by name) and sums over `dims`.
    pub fn dot(&self, other: &NamedArray<f64>, dims: &[&str]) -> Result<Self, ArrayError> {
        self.zip_with(other, |a, b| a * b)?.sum_over(dims)
    }

    /// Replaces elements with NaN wherever `mask` is false.
    pub fn where_mask(&self, mask: &ValidityMask) -> Result<Self, ArrayError> {
        self.zip_with(mask.array(), |&v, &keep| if keep { v } else { f64::NAN })
    }
}
