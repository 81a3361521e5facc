/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use ndarray::ArrayD;
use ndarray::SliceInfoElem;

use crate::axis::AxisError;
use crate::axis::AxisSet;
use crate::axis::AxisValue;
use crate::axis::AxisValues;
use crate::axis::Tolerance;
use crate::index::Index;
use crate::index::IndexError;
use crate::index::NpIndex;
use crate::index::normalize_position;
use crate::parse::ParseError;
use crate::resolve::IndexResolver;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LabeledArrayError {
    #[error("array of shape {shape:?} is not compatible with axes calling for leading shape {expected:?}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: Vec<usize>,
    },

    #[error("too many indices: {given} for an array of rank {ndim}")]
    TooManyIndices { given: usize, ndim: usize },

    #[error("index {index} out of range for dimension {dim} of size {size}")]
    IndexOutOfRange {
        index: isize,
        dim: usize,
        size: usize,
    },

    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Axis(#[from] AxisError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A dense array whose leading dimensions are labeled by an
/// [`AxisSet`].
///
/// Indexing accepts the extended expressions described in
/// [`crate::index`]: plain positions and slices, values looked up on
/// an axis, and name-based slices. The result of indexing is a new
/// array; the source array is never modified.
///
/// ```
/// use ndarray::ArrayD;
/// use ndarray::IxDyn;
/// use ndlabel::LabeledArray;
/// use ndlabel::Selected;
///
/// let axes = ndlabel::axes!(ng = [-0.1, 0.0, 0.1, 0.2], flux = [-1.0, -0.5, 0.0, 0.5, 1.0]);
/// let data = ArrayD::from_shape_fn(IxDyn(&[4, 5]), |ix| 10 * ix[0] + ix[1]);
/// let array = LabeledArray::new(data, axes).unwrap();
///
/// // Fix `flux` at 0.5, i.e. column 3.
/// let Selected::Labeled(column) = array.get_str("'flux':0.5").unwrap() else {
///     panic!("expected a labeled result");
/// };
/// assert_eq!(column.axes().names(), &["ng".to_string()]);
/// assert_eq!(column.data().iter().copied().collect::<Vec<_>>(), vec![3, 13, 23, 33]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledArray<T> {
    data: ArrayD<T>,
    axes: AxisSet,
}

/// The result of indexing a [`LabeledArray`].
#[derive(Clone, Debug, PartialEq)]
pub enum Selected<T> {
    /// Some named axis still varies.
    Labeled(LabeledArray<T>),
    /// No labeling survives, but dimensions remain.
    Array(ArrayD<T>),
    /// A single element.
    Scalar(T),
}

impl<T> Selected<T> {
    /// The selected data, labeled or not.
    pub fn into_array(self) -> ArrayD<T> {
        match self {
            Selected::Labeled(array) => array.data,
            Selected::Array(array) => array,
            Selected::Scalar(value) => ndarray::arr0(value).into_dyn(),
        }
    }

    pub fn labeled(self) -> Option<LabeledArray<T>> {
        match self {
            Selected::Labeled(array) => Some(array),
            _ => None,
        }
    }
}

impl<T> LabeledArray<T> {
    /// Label the leading dimensions of `data` with `axes`. The
    /// leading dimensions must match the axis lengths, in order.
    pub fn new(data: ArrayD<T>, axes: AxisSet) -> Result<Self, LabeledArrayError> {
        if !leading_shape_matches(data.shape(), &axes) {
            return Err(LabeledArrayError::ShapeMismatch {
                shape: data.shape().to_vec(),
                expected: axes.counts(),
            });
        }
        Ok(Self { data, axes })
    }

    /// Label `data` with the given ordered axis names and values.
    pub fn from_values(
        data: ArrayD<T>,
        names: Vec<String>,
        values: Vec<AxisValues>,
    ) -> Result<Self, LabeledArrayError> {
        Self::new(data, AxisSet::new(names, values)?)
    }

    /// Use `tolerance` for value lookups.
    pub fn with_tolerance(self, tolerance: Tolerance) -> Self {
        Self {
            data: self.data,
            axes: self.axes.with_tolerance(tolerance),
        }
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn into_inner(self) -> (ArrayD<T>, AxisSet) {
        (self.data, self.axes)
    }
}

impl<T: Clone> LabeledArray<T> {
    /// Index this array. See [`crate::index`] for the accepted
    /// expressions.
    pub fn get(&self, index: &Index) -> Result<Selected<T>, LabeledArrayError> {
        let resolved = IndexResolver::new(&self.axes).resolve(index)?;
        let elems = self.slice_info(&resolved.indices)?;
        let data = self.data.slice(elems.as_slice()).to_owned();

        if data.ndim() == 0 {
            if let Some(value) = data.iter().next() {
                return Ok(Selected::Scalar(value.clone()));
            }
        }
        match resolved.axes {
            Some(axes) if leading_shape_matches(data.shape(), &axes) => {
                Ok(Selected::Labeled(Self { data, axes }))
            }
            Some(axes) => {
                // A slice of length one keeps its dimension but not its
                // axis.
                tracing::debug!(
                    "dropping labels {} from result of shape {:?} for index {}",
                    axes,
                    data.shape(),
                    index
                );
                Ok(Selected::Array(data))
            }
            None => Ok(Selected::Array(data)),
        }
    }

    /// Parse `expr` as an index expression and index this array with
    /// it.
    pub fn get_str(&self, expr: &str) -> Result<Selected<T>, LabeledArrayError> {
        self.get(&expr.parse()?)
    }

    /// Fix the named axes at single values, keeping every dimension.
    /// See [`AxisSet::reduce`]. The data must already have a single
    /// entry along each fixed axis.
    pub fn reduce<S: AsRef<str>>(
        &self,
        fixed_names: &[S],
        fixed_values: Option<&[AxisValue]>,
    ) -> Result<Self, LabeledArrayError> {
        Self::new(self.data.clone(), self.axes.reduce(fixed_names, fixed_values)?)
    }

    fn slice_info(&self, indices: &[NpIndex]) -> Result<Vec<SliceInfoElem>, LabeledArrayError> {
        let shape = self.data.shape();
        if indices.len() > shape.len() {
            return Err(LabeledArrayError::TooManyIndices {
                given: indices.len(),
                ndim: shape.len(),
            });
        }
        shape
            .iter()
            .enumerate()
            .map(|(dim, &size)| match indices.get(dim).copied().unwrap_or(NpIndex::FULL) {
                NpIndex::Index(index) => normalize_position(index, size)
                    .map(|position| SliceInfoElem::Index(position as isize))
                    .ok_or(LabeledArrayError::IndexOutOfRange { index, dim, size }),
                NpIndex::Slice(slice) => Ok(SliceInfoElem::from(slice.resolve(size)?.to_nd_slice())),
            })
            .collect()
    }
}

fn leading_shape_matches(shape: &[usize], axes: &AxisSet) -> bool {
    let counts = axes.counts();
    shape.len() >= counts.len() && shape[..counts.len()] == counts[..]
}

impl<T> fmt::Display for LabeledArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabeledArray{} of shape {:?}", self.axes, self.data.shape())
    }
}
