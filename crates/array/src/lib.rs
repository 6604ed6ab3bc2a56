//! # tempest-array
//!
//! Named, labeled multidimensional arrays for forecast verification.
//!
//! Arrays carry one name per axis and optional coordinate labels per axis.
//! Arithmetic aligns operands by name: shared dimensions must agree in
//! length and labels, other dimensions broadcast. A mismatch is an error,
//! never a silent positional broadcast.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `named` | [`NamedArray`] and alignment |
//! | `coord` | [`Coordinate`] labels |
//! | `mask` | [`ValidityMask`] and [`MaskedArray`] |
//! | `reduce` | NaN-aware reductions and contractions |
//! | `error` | Error types |

mod coord;
mod duration_seconds;
mod error;
mod mask;
mod named;
mod reduce;

pub use coord::Coordinate;
pub use error::ArrayError;
pub use mask::{MaskedArray, ValidityMask};
pub use named::NamedArray;
pub use reduce::{nan_max, nan_mean};
