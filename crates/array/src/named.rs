//! Named multidimensional array with alignment by dimension name.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD, ArrayView1, ArrayViewD, Axis, IxDyn, Zip, arr0};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::coord::Coordinate;
use crate::error::ArrayError;

/// An n-dimensional array whose axes are identified by name.
///
/// Binary operations align operands by dimension name rather than position:
/// shared dimensions must agree in length (and in coordinates, when both
/// sides carry them), and dimensions present on only one side broadcast.
/// The result lists the left operand's dimensions first, followed by the
/// right operand's remaining dimensions in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedArray<T> {
    dims: Vec<String>,
    data: ArrayD<T>,
    coords: BTreeMap<String, Coordinate>,
}

#[derive(Deserialize)]
struct RawNamedArray<T> {
    dims: Vec<String>,
    data: ArrayD<T>,
    #[serde(default)]
    coords: BTreeMap<String, Coordinate>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawNamedArray::<T>::deserialize(deserializer)?;
        let mut array = NamedArray::new(raw.dims, raw.data).map_err(D::Error::custom)?;
        for (dim, coord) in raw.coords {
            array = array.with_coord(&dim, coord).map_err(D::Error::custom)?;
        }
        Ok(array)
    }
}

impl<T> NamedArray<T> {
    /// Wraps `data` with one name per axis.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::DimensionCountMismatch`] if the number of names
    /// differs from the rank, or [`ArrayError::DuplicateDimension`] if a name
    /// repeats.
    pub fn new<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        data: ArrayD<T>,
    ) -> Result<Self, ArrayError> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(ArrayError::DimensionCountMismatch {
                dims: dims.len(),
                ndim: data.ndim(),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(ArrayError::DuplicateDimension { dim: dim.clone() });
            }
        }
        Ok(Self {
            dims,
            data,
            coords: BTreeMap::new(),
        })
    }

    /// One-dimensional array along `dim`.
    pub fn from_vec(dim: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            dims: vec![dim.into()],
            data: Array1::from(values).into_dyn(),
            coords: BTreeMap::new(),
        }
    }

    /// Zero-dimensional array holding a single value.
    pub fn scalar(value: T) -> Self {
        Self {
            dims: Vec::new(),
            data: arr0(value).into_dyn(),
            coords: BTreeMap::new(),
        }
    }

    /// Attaches coordinate labels to `dim`, replacing any existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::UnknownDimension`] if `dim` is not an axis, or
    /// [`ArrayError::CoordinateLength`] if the label count differs from the
    /// axis length.
    pub fn with_coord(mut self, dim: &str, coord: Coordinate) -> Result<Self, ArrayError> {
        let expected = self.len_of(dim)?;
        if coord.len() != expected {
            return Err(ArrayError::CoordinateLength {
                dim: dim.to_string(),
                expected,
                got: coord.len(),
            });
        }
        self.coords.insert(dim.to_string(), coord);
        Ok(self)
    }

    /// Dimension names in axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Underlying data.
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Axis lengths in axis order.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if `dim` is one of the axes.
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis index of `dim`.
    pub fn axis_of(&self, dim: &str) -> Result<usize, ArrayError> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| ArrayError::UnknownDimension {
                dim: dim.to_string(),
            })
    }

    /// Length of `dim`.
    pub fn len_of(&self, dim: &str) -> Result<usize, ArrayError> {
        let axis = self.axis_of(dim)?;
        Ok(self.data.len_of(Axis(axis)))
    }

    /// Coordinate labels of `dim`, if any were attached.
    pub fn coord(&self, dim: &str) -> Option<&Coordinate> {
        self.coords.get(dim)
    }

    /// All attached coordinates, keyed by dimension.
    pub fn coords(&self) -> &BTreeMap<String, Coordinate> {
        &self.coords
    }

    /// Element at a multi-index given in axis order.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.data.get(IxDyn(index))
    }

    /// Renames dimension `from` to `to`, carrying its coordinate along.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::UnknownDimension`] if `from` is absent, or
    /// [`ArrayError::DuplicateDimension`] if `to` already exists.
    pub fn rename_dim(mut self, from: &str, to: &str) -> Result<Self, ArrayError> {
        let axis = self.axis_of(from)?;
        if from != to && self.has_dim(to) {
            return Err(ArrayError::DuplicateDimension {
                dim: to.to_string(),
            });
        }
        self.dims[axis] = to.to_string();
        if let Some(coord) = self.coords.remove(from) {
            self.coords.insert(to.to_string(), coord);
        }
        Ok(self)
    }

    /// Applies `f` to every element, keeping dimensions and coordinates.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> NamedArray<U> {
        NamedArray {
            dims: self.dims.clone(),
            data: self.data.map(f),
            coords: self.coords.clone(),
        }
    }

    /// View of the data with axes reordered to `dims` and unit axes inserted
    /// for every target dimension this array lacks.
    fn expanded_view(&self, dims: &[String]) -> Result<ArrayViewD<'_, T>, ArrayError> {
        if let Some(dim) = self.dims.iter().find(|d| !dims.contains(d)) {
            return Err(ArrayError::NotBroadcastable { dim: dim.clone() });
        }
        let perm: Vec<usize> = dims
            .iter()
            .filter_map(|dim| self.dims.iter().position(|d| d == dim))
            .collect();
        let mut view = self.data.view().permuted_axes(IxDyn(&perm));
        for (i, dim) in dims.iter().enumerate() {
            if !self.has_dim(dim) {
                view = view.insert_axis(Axis(i));
            }
        }
        Ok(view)
    }

    /// Combines two arrays elementwise after aligning them by dimension name.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] or
    /// [`ArrayError::CoordinateMismatch`] if a shared dimension disagrees.
    pub fn zip_with<U, V, F>(&self, other: &NamedArray<U>, mut f: F) -> Result<NamedArray<V>, ArrayError>
    where
        F: FnMut(&T, &U) -> V,
    {
        let layout = Layout::aligned(self, other)?;
        let left = self.expanded_view(&layout.dims)?;
        let right = other.expanded_view(&layout.dims)?;
        let left = left
            .broadcast(IxDyn(&layout.shape))
            .ok_or_else(|| layout.shape_error())?;
        let right = right
            .broadcast(IxDyn(&layout.shape))
            .ok_or_else(|| layout.shape_error())?;
        let data = Zip::from(&left).and(&right).map_collect(|a, b| f(a, b));
        Ok(NamedArray {
            dims: layout.dims,
            data,
            coords: layout.coords,
        })
    }

    /// Applies `f` to every lane along `dim`, removing that dimension.
    pub fn reduce_dim<U, F>(&self, dim: &str, f: F) -> Result<NamedArray<U>, ArrayError>
    where
        F: FnMut(ArrayView1<'_, T>) -> U,
    {
        let axis = self.axis_of(dim)?;
        let data = self.data.map_axis(Axis(axis), f);
        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut coords = self.coords.clone();
        coords.remove(dim);
        Ok(NamedArray { dims, data, coords })
    }
}

impl<T: Clone> NamedArray<T> {
    /// Stacks equally-dimensioned arrays along a new leading dimension `dim`
    /// labeled by `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyStack`] for an empty slice,
    /// [`ArrayError::StackMismatch`] if the arrays' dimension sets differ, and
    /// the usual alignment errors if their lengths or coordinates differ.
    pub fn stack(
        dim: impl Into<String>,
        coord: Coordinate,
        arrays: &[NamedArray<T>],
    ) -> Result<Self, ArrayError> {
        let dim = dim.into();
        let first = arrays.first().ok_or(ArrayError::EmptyStack)?;
        if first.has_dim(&dim) {
            return Err(ArrayError::DuplicateDimension { dim });
        }
        if coord.len() != arrays.len() {
            return Err(ArrayError::CoordinateLength {
                dim,
                expected: arrays.len(),
                got: coord.len(),
            });
        }

        let mut coords = first.coords.clone();
        let mut views = Vec::with_capacity(arrays.len());
        for array in arrays {
            let layout = Layout::aligned(first, array)?;
            if layout.dims.len() != first.ndim() {
                return Err(ArrayError::StackMismatch { dim });
            }
            coords.extend(layout.coords);
            views.push(array.expanded_view(&first.dims)?);
        }
        let data = ndarray::stack(Axis(0), &views)?;

        let mut dims = Vec::with_capacity(first.ndim() + 1);
        dims.push(dim.clone());
        dims.extend(first.dims.iter().cloned());
        coords.insert(dim, coord);
        Ok(Self { dims, data, coords })
    }

    /// Applies `f` to the flattened lanes spanning all of `dims`, removing
    /// those dimensions. Lane elements follow row-major order of the reduced
    /// axes.
    pub fn reduce_dims<U, F>(&self, dims: &[&str], f: F) -> Result<NamedArray<U>, ArrayError>
    where
        F: FnMut(ArrayView1<'_, T>) -> U,
    {
        let mut reduced = Vec::with_capacity(dims.len());
        for dim in dims {
            let axis = self.axis_of(dim)?;
            if !reduced.contains(&axis) {
                reduced.push(axis);
            }
        }
        let kept: Vec<usize> = (0..self.ndim()).filter(|a| !reduced.contains(a)).collect();

        let perm: Vec<usize> = kept.iter().chain(reduced.iter()).copied().collect();
        let view = self.data.view().permuted_axes(IxDyn(&perm));
        let mut shape: Vec<usize> = kept.iter().map(|&a| self.shape()[a]).collect();
        shape.push(reduced.iter().map(|&a| self.shape()[a]).product());
        let flat = ArrayD::from_shape_vec(IxDyn(&shape), view.iter().cloned().collect())?;
        let data = flat.map_axis(Axis(kept.len()), f);

        let out_dims: Vec<String> = kept.iter().map(|&a| self.dims[a].clone()).collect();
        let coords = self
            .coords
            .iter()
            .filter(|(dim, _)| out_dims.contains(dim))
            .map(|(dim, coord)| (dim.clone(), coord.clone()))
            .collect();
        Ok(NamedArray {
            dims: out_dims,
            data,
            coords,
        })
    }
}

/// Output layout of an aligned binary operation.
struct Layout {
    dims: Vec<String>,
    shape: Vec<usize>,
    coords: BTreeMap<String, Coordinate>,
}

impl Layout {
    fn aligned<A, B>(left: &NamedArray<A>, right: &NamedArray<B>) -> Result<Self, ArrayError> {
        let mut dims = left.dims.clone();
        let mut shape = left.shape().to_vec();
        for (axis, dim) in right.dims.iter().enumerate() {
            let len = right.data.len_of(Axis(axis));
            match left.dims.iter().position(|d| d == dim) {
                Some(i) if shape[i] != len => {
                    return Err(ArrayError::SizeMismatch {
                        dim: dim.clone(),
                        left: shape[i],
                        right: len,
                    });
                }
                Some(_) => {}
                None => {
                    dims.push(dim.clone());
                    shape.push(len);
                }
            }
        }

        let mut coords = left.coords.clone();
        for (dim, coord) in &right.coords {
            match coords.get(dim) {
                Some(existing) if existing != coord => {
                    return Err(ArrayError::CoordinateMismatch { dim: dim.clone() });
                }
                Some(_) => {}
                None => {
                    coords.insert(dim.clone(), coord.clone());
                }
            }
        }
        Ok(Self {
            dims,
            shape,
            coords,
        })
    }

    fn shape_error(&self) -> ArrayError {
        ArrayError::Shape {
            reason: format!("cannot broadcast operands to {:?} {:?}", self.dims, self.shape),
        }
    }
}
