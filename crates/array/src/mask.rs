//! Validity masks and masked arrays.

use serde::{Deserialize, Serialize};

use crate::error::ArrayError;
use crate::named::NamedArray;

/// Boolean array marking which positions take part in averaging.
///
/// `true` keeps a position, `false` excludes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidityMask(NamedArray<bool>);

impl ValidityMask {
    /// Wraps a boolean array.
    pub fn new(array: NamedArray<bool>) -> Self {
        Self(array)
    }

    /// The underlying boolean array.
    pub fn array(&self) -> &NamedArray<bool> {
        &self.0
    }

    /// Logical AND of two masks, aligned by dimension name.
    pub fn and(&self, other: &ValidityMask) -> Result<Self, ArrayError> {
        Ok(Self(self.0.zip_with(&other.0, |&a, &b| a && b)?))
    }

    /// Number of positions kept.
    pub fn count_valid(&self) -> usize {
        self.0.data().iter().filter(|&&keep| keep).count()
    }
}

/// Floating-point array with an optional validity mask.
///
/// The mask's dimensions are always a subset of the values' dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedArray {
    values: NamedArray<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mask: Option<ValidityMask>,
}

impl From<NamedArray<f64>> for MaskedArray {
    fn from(values: NamedArray<f64>) -> Self {
        Self::new(values)
    }
}

impl MaskedArray {
    /// Unmasked array.
    pub fn new(values: NamedArray<f64>) -> Self {
        Self { values, mask: None }
    }

    /// Attaches `mask`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MaskNotBroadcastable`] if the mask has a
    /// dimension the values lack, or an alignment error if a shared
    /// dimension disagrees.
    pub fn with_mask(mut self, mask: ValidityMask) -> Result<Self, ArrayError> {
        check_mask_fits(&self.values, &mask)?;
        self.mask = Some(mask);
        Ok(self)
    }

    /// Same as [`with_mask`](Self::with_mask) for an optional mask.
    pub fn with_optional_mask(self, mask: Option<ValidityMask>) -> Result<Self, ArrayError> {
        match mask {
            Some(mask) => self.with_mask(mask),
            None => Ok(self),
        }
    }

    /// The values.
    pub fn values(&self) -> &NamedArray<f64> {
        &self.values
    }

    /// The validity mask, if any.
    pub fn mask(&self) -> Option<&ValidityMask> {
        self.mask.as_ref()
    }

    /// NaN-skipping mean over `dims`.
    ///
    /// With `masked` set and a mask present, positions where the mask is
    /// false are excluded as well.
    pub fn masked_mean(&self, dims: &[&str], masked: bool) -> Result<NamedArray<f64>, ArrayError> {
        match (&self.mask, masked) {
            (Some(mask), true) => self.values.where_mask(mask)?.mean_over(dims),
            _ => self.values.mean_over(dims),
        }
    }
}

fn check_mask_fits(values: &NamedArray<f64>, mask: &ValidityMask) -> Result<(), ArrayError> {
    if let Some(dim) = mask.array().dims().iter().find(|d| !values.has_dim(d)) {
        return Err(ArrayError::MaskNotBroadcastable { dim: dim.clone() });
    }
    // Shared dimensions must align.
    values.zip_with(mask.array(), |_, _| ())?;
    Ok(())
}
