/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use itertools::izip;
use num_complex::Complex64;
use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexError;
use crate::index::NpIndex;
use crate::index::Span;
use crate::index::normalize_position;

/// The tolerance used for value lookups unless configured otherwise:
/// relative 1e-9, no absolute slack.
pub const DEFAULT_TOLERANCE: Tolerance = Tolerance {
    rel: 1e-9,
    abs: 0.0,
};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AxisError {
    #[error("duplicate axis name `{name}`")]
    DuplicateName { name: String },

    #[error("axis `{name}` has no values")]
    EmptyAxis { name: String },

    #[error("invalid axis configuration: {reason}")]
    Configuration { reason: String },

    #[error("no axis named `{name}`")]
    UnknownName { name: String },

    #[error("axis position {position} out of range for {count} axes")]
    UnknownPosition { position: usize, count: usize },

    #[error("no matching entry for value {value} on axis `{axis}`")]
    ValueNotFound { value: AxisValue, axis: String },

    #[error("index {index} out of range for axis `{axis}` of size {size}")]
    IndexOutOfRange {
        index: isize,
        axis: String,
        size: usize,
    },
}

/// How close a requested value must be to an axis value to be
/// considered a match: `|a - b| <= max(rel * max(|a|, |b|), abs)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub rel: f64,
    pub abs: f64,
}

impl Tolerance {
    pub fn new(rel: f64, abs: f64) -> Self {
        Self { rel, abs }
    }

    /// An absolute-only tolerance.
    pub fn absolute(abs: f64) -> Self {
        Self { rel: 0.0, abs }
    }

    pub fn is_close(&self, a: Complex64, b: Complex64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).norm();
        diff.is_finite() && diff <= (self.rel * a.norm().max(b.norm())).max(self.abs)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        DEFAULT_TOLERANCE
    }
}

/// A single coordinate value along an axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Real(f64),
    Complex(Complex64),
    Label(String),
}

impl AxisValue {
    fn as_complex(&self) -> Option<Complex64> {
        match self {
            AxisValue::Real(value) => Some(Complex64::new(*value, 0.0)),
            AxisValue::Complex(value) => Some(*value),
            AxisValue::Label(_) => None,
        }
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Real(value)
    }
}

impl From<Complex64> for AxisValue {
    fn from(value: Complex64) -> Self {
        AxisValue::Complex(value)
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        AxisValue::Label(value.to_string())
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Real(value) => write!(f, "{}", value),
            AxisValue::Complex(value) => write!(f, "{}", value),
            AxisValue::Label(value) => write!(f, "'{}'", value),
        }
    }
}

/// The ordered values of one axis. All values of an axis share a
/// kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
    Labels(Vec<String>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Real(values) => values.len(),
            AxisValues::Complex(values) => values.len(),
            AxisValues::Labels(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at `position`, if any.
    pub fn get(&self, position: usize) -> Option<AxisValue> {
        match self {
            AxisValues::Real(values) => values.get(position).copied().map(AxisValue::Real),
            AxisValues::Complex(values) => values.get(position).copied().map(AxisValue::Complex),
            AxisValues::Labels(values) => values.get(position).cloned().map(AxisValue::Label),
        }
    }

    /// The values at the positions of `span`, in span order.
    pub fn select(&self, span: &Span) -> AxisValues {
        match self {
            AxisValues::Real(values) => {
                AxisValues::Real(span.positions().map(|i| values[i]).collect())
            }
            AxisValues::Complex(values) => {
                AxisValues::Complex(span.positions().map(|i| values[i]).collect())
            }
            AxisValues::Labels(values) => {
                AxisValues::Labels(span.positions().map(|i| values[i].clone()).collect())
            }
        }
    }

    /// Position of the value closest to `value`: smallest absolute
    /// difference for numbers (reals compare with complex numbers on
    /// the complex plane), exact equality for labels. Ties resolve to
    /// the first position. `None` if `value` cannot be compared with
    /// this axis.
    pub fn closest(&self, value: &AxisValue) -> Option<usize> {
        match (self, value) {
            (AxisValues::Labels(labels), AxisValue::Label(label)) => {
                labels.iter().position(|l| l == label)
            }
            (AxisValues::Labels(_), _) | (_, AxisValue::Label(_)) => None,
            (AxisValues::Real(values), AxisValue::Real(value)) => {
                argmin(values.iter().map(|v| (v - value).abs()))
            }
            (AxisValues::Real(values), value) => {
                let value = value.as_complex()?;
                argmin(values.iter().map(|v| (Complex64::new(*v, 0.0) - value).norm()))
            }
            (AxisValues::Complex(values), value) => {
                let value = value.as_complex()?;
                argmin(values.iter().map(|v| (v - value).norm()))
            }
        }
    }
}

fn argmin(distances: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (position, distance) in distances.enumerate() {
        match best {
            Some((_, closest)) if !closest.is_nan() && !(distance < closest) => {}
            _ => best = Some((position, distance)),
        }
    }
    best.map(|(position, _)| position)
}

impl From<AxisValue> for AxisValues {
    fn from(value: AxisValue) -> Self {
        match value {
            AxisValue::Real(value) => AxisValues::Real(vec![value]),
            AxisValue::Complex(value) => AxisValues::Complex(vec![value]),
            AxisValue::Label(value) => AxisValues::Labels(vec![value]),
        }
    }
}

impl From<Vec<f64>> for AxisValues {
    fn from(values: Vec<f64>) -> Self {
        AxisValues::Real(values)
    }
}

impl<const N: usize> From<[f64; N]> for AxisValues {
    fn from(values: [f64; N]) -> Self {
        AxisValues::Real(values.to_vec())
    }
}

impl From<Vec<Complex64>> for AxisValues {
    fn from(values: Vec<Complex64>) -> Self {
        AxisValues::Complex(values)
    }
}

impl From<Vec<String>> for AxisValues {
    fn from(values: Vec<String>) -> Self {
        AxisValues::Labels(values)
    }
}

impl From<Vec<&str>> for AxisValues {
    fn from(values: Vec<&str>) -> Self {
        AxisValues::Labels(values.into_iter().map(String::from).collect())
    }
}

/// An ordered set of named axes, each with its sequence of values.
///
/// An `AxisSet` labels the leading dimensions of a dense array: the
/// *i*-th axis names dimension *i*, and its value sequence has one
/// entry per position along that dimension. Axis sets are immutable;
/// [`AxisSet::reduce`] and [`AxisSet::slice`] derive new ones.
///
/// ```
/// let axes = ndlabel::axes!(ng = [-0.1, 0.0, 0.1, 0.2], flux = [-1.0, -0.5, 0.0, 0.5, 1.0]);
/// assert_eq!(axes.position_of("flux").unwrap(), 1);
/// assert_eq!(axes.counts(), vec![4, 5]);
/// assert_eq!(axes.to_string(), "{ng=4,flux=5}");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSet {
    /// Axis names in position order.
    names: Vec<String>,
    /// The value sequence of each axis, in position order.
    values: Vec<AxisValues>,
    /// Inverse of `names`.
    positions: HashMap<String, usize>,
    tolerance: Tolerance,
}

impl AxisSet {
    /// Creates a new axis set with the given ordered names, one value
    /// sequence per name.
    pub fn new(names: Vec<String>, values: Vec<AxisValues>) -> Result<Self, AxisError> {
        if names.len() != values.len() {
            return Err(AxisError::Configuration {
                reason: format!(
                    "{} axis names but {} value sequences",
                    names.len(),
                    values.len()
                ),
            });
        }
        let mut positions = HashMap::with_capacity(names.len());
        for (position, (name, values)) in names.iter().zip(&values).enumerate() {
            if positions.insert(name.clone(), position).is_some() {
                return Err(AxisError::DuplicateName { name: name.clone() });
            }
            if values.is_empty() {
                return Err(AxisError::EmptyAxis { name: name.clone() });
            }
        }
        Ok(Self {
            names,
            values,
            positions,
            tolerance: Tolerance::default(),
        })
    }

    /// Creates a new axis set from ordered `(name, values)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, AxisError>
    where
        I: IntoIterator<Item = (S, AxisValues)>,
        S: Into<String>,
    {
        let (names, values) = pairs
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();
        Self::new(names, values)
    }

    /// An axis set without axes.
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            values: Vec::new(),
            positions: HashMap::new(),
            tolerance: Tolerance::default(),
        }
    }

    /// Use `tolerance` for value lookups on this set and everything
    /// derived from it.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// The number of axes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Axis names in position order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(name, values)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AxisValues)> {
        self.names.iter().map(String::as_str).zip(&self.values)
    }

    /// The number of values on each axis.
    pub fn counts(&self) -> Vec<usize> {
        self.values.iter().map(AxisValues::len).collect()
    }

    /// The positions `0..count` of each axis.
    pub fn ranges(&self) -> Vec<Range<usize>> {
        self.values.iter().map(|values| 0..values.len()).collect()
    }

    /// The value sequence of the axis at `axis`.
    pub fn values(&self, axis: usize) -> Result<&AxisValues, AxisError> {
        self.values.get(axis).ok_or(AxisError::UnknownPosition {
            position: axis,
            count: self.len(),
        })
    }

    /// The value sequence of the axis named `name`.
    pub fn values_by_name(&self, name: &str) -> Result<&AxisValues, AxisError> {
        Ok(&self.values[self.position_of(name)?])
    }

    /// The value sequences of a contiguous range of axes.
    pub fn axes_in(&self, range: Range<usize>) -> Result<&[AxisValues], AxisError> {
        if range.start > range.end || range.end > self.len() {
            return Err(AxisError::UnknownPosition {
                position: range.end,
                count: self.len(),
            });
        }
        Ok(&self.values[range])
    }

    pub fn position_of(&self, name: &str) -> Result<usize, AxisError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| AxisError::UnknownName {
                name: name.to_string(),
            })
    }

    pub fn name_of(&self, position: usize) -> Result<&str, AxisError> {
        self.names
            .get(position)
            .map(String::as_str)
            .ok_or(AxisError::UnknownPosition {
                position,
                count: self.len(),
            })
    }

    /// The value of every axis at the given coordinates, one
    /// coordinate per axis.
    pub fn values_at(&self, coords: &[usize]) -> Result<Vec<AxisValue>, AxisError> {
        if coords.len() != self.len() {
            return Err(AxisError::Configuration {
                reason: format!("{} coordinates for {} axes", coords.len(), self.len()),
            });
        }
        izip!(&self.names, &self.values, coords)
            .map(|(name, values, &coord)| {
                values.get(coord).ok_or_else(|| AxisError::IndexOutOfRange {
                    index: coord as isize,
                    axis: name.clone(),
                    size: values.len(),
                })
            })
            .collect()
    }

    /// The position on `axis` whose value is closest to `value`,
    /// without any tolerance check.
    pub fn closest_index(&self, axis: usize, value: &AxisValue) -> Result<usize, AxisError> {
        self.values(axis)?
            .closest(value)
            .ok_or_else(|| AxisError::ValueNotFound {
                value: value.clone(),
                axis: self.names[axis].clone(),
            })
    }

    /// The position on `axis` whose value matches `value`: the closest
    /// value, provided it lies within this set's tolerance of
    /// `value`. Labels must match exactly.
    pub fn nearest_index(&self, axis: usize, value: &AxisValue) -> Result<usize, AxisError> {
        let position = self.closest_index(axis, value)?;
        let candidate = self.values[axis].get(position);
        let matches = match (&candidate, value) {
            (Some(AxisValue::Label(_)), _) => true,
            (Some(candidate), value) => match (candidate.as_complex(), value.as_complex()) {
                (Some(a), Some(b)) => self.tolerance.is_close(a, b),
                _ => false,
            },
            (None, _) => false,
        };
        if matches {
            Ok(position)
        } else {
            Err(AxisError::ValueNotFound {
                value: value.clone(),
                axis: self.names[axis].clone(),
            })
        }
    }

    /// Like [`AxisSet::nearest_index`], addressing the axis by name.
    pub fn nearest_index_by_name(&self, name: &str, value: &AxisValue) -> Result<usize, AxisError> {
        self.nearest_index(self.position_of(name)?, value)
    }

    /// Fix the named axes to single values: the supplied
    /// `fixed_values` (one per name) or else each axis's first value.
    /// Every axis is kept, fixed ones with a single-value sequence.
    pub fn reduce<S: AsRef<str>>(
        &self,
        fixed_names: &[S],
        fixed_values: Option<&[AxisValue]>,
    ) -> Result<AxisSet, AxisError> {
        if let Some(fixed_values) = fixed_values {
            if fixed_values.len() != fixed_names.len() {
                return Err(AxisError::Configuration {
                    reason: format!(
                        "{} fixed values for {} fixed axes",
                        fixed_values.len(),
                        fixed_names.len()
                    ),
                });
            }
        }

        let mut values = self.values.clone();
        for (i, name) in fixed_names.iter().enumerate() {
            let position = self.position_of(name.as_ref())?;
            let value = match fixed_values {
                Some(fixed_values) => fixed_values[i].clone(),
                None => self.values[position]
                    .get(0)
                    .ok_or_else(|| AxisError::EmptyAxis {
                        name: name.as_ref().to_string(),
                    })?,
            };
            values[position] = AxisValues::from(value);
        }

        Ok(Self {
            names: self.names.clone(),
            values,
            positions: self.positions.clone(),
            tolerance: self.tolerance,
        })
    }

    /// Apply one positional index per axis and keep only the axes
    /// that still vary, i.e. whose sliced sequence has more than one
    /// value. Missing trailing indices leave their axes whole;
    /// indices past the last axis address unlabeled dimensions and
    /// are ignored.
    pub fn slice(&self, indices: &[NpIndex]) -> Result<AxisSet, IndexError> {
        let mut names = Vec::new();
        let mut values = Vec::new();
        for (position, (name, axis_values)) in self.names.iter().zip(&self.values).enumerate() {
            let index = indices.get(position).copied().unwrap_or(NpIndex::FULL);
            let sliced = match index {
                NpIndex::Index(index) => {
                    normalize_position(index, axis_values.len()).ok_or_else(|| {
                        AxisError::IndexOutOfRange {
                            index,
                            axis: name.clone(),
                            size: axis_values.len(),
                        }
                    })?;
                    continue;
                }
                NpIndex::Slice(slice) => axis_values.select(&slice.resolve(axis_values.len())?),
            };
            if sliced.len() > 1 {
                names.push(name.clone());
                values.push(sliced);
            }
        }
        Ok(Self::new(names, values)?.with_tolerance(self.tolerance))
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, values)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", name, values.len())?;
        }
        write!(f, "}}")
    }
}

/// Construct an [`AxisSet`] from `name = values` pairs, in order.
///
/// ```
/// let axes = ndlabel::axes!(param1 = [-4.4, -0.1, 0.3, 10.0], kind = vec!["a", "b"]);
/// assert_eq!(axes.names(), &["param1".to_string(), "kind".to_string()]);
/// ```
#[macro_export]
macro_rules! axes {
    ( $( $name:ident = $values:expr ),* $(,)? ) => {
        {
            let mut names = Vec::new();
            let mut values = Vec::new();

            $(
                names.push(stringify!($name).to_string());
                values.push($crate::axis::AxisValues::from($values));
            )*

            $crate::axis::AxisSet::new(names, values).unwrap()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NpSlice;

    fn params() -> AxisSet {
        axes!(
            param1 = [-4.4, -0.1, 0.3, 10.0],
            param2 = vec![
                Complex64::new(0.0, 0.1),
                Complex64::new(3.0, -4.0),
                Complex64::new(25.0, 0.0)
            ],
        )
    }

    #[test]
    fn test_basic() {
        let axes = params();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes.names(), &["param1".to_string(), "param2".to_string()]);
        assert_eq!(axes.position_of("param2").unwrap(), 1);
        assert_eq!(axes.name_of(0).unwrap(), "param1");
        assert_eq!(axes.counts(), vec![4, 3]);
        assert_eq!(axes.ranges(), vec![0..4, 0..3]);
        assert_eq!(axes.to_string(), "{param1=4,param2=3}");
        assert_eq!(
            axes.values_by_name("param1").unwrap(),
            &AxisValues::Real(vec![-4.4, -0.1, 0.3, 10.0])
        );
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            AxisSet::new(
                vec!["a".to_string(), "a".to_string()],
                vec![vec![1.0].into(), vec![2.0].into()]
            ),
            Err(AxisError::DuplicateName { name }) if name == "a"
        ));
        assert!(matches!(
            AxisSet::new(vec!["a".to_string()], vec![AxisValues::Real(vec![])]),
            Err(AxisError::EmptyAxis { name }) if name == "a"
        ));
        assert!(matches!(
            AxisSet::new(vec!["a".to_string()], vec![]),
            Err(AxisError::Configuration { .. })
        ));
    }

    #[test]
    fn test_lookup_errors() {
        let axes = params();
        assert!(matches!(
            axes.position_of("nope"),
            Err(AxisError::UnknownName { name }) if name == "nope"
        ));
        assert!(matches!(
            axes.name_of(2),
            Err(AxisError::UnknownPosition { position: 2, count: 2 })
        ));
        assert!(axes.values(5).is_err());
    }

    #[test]
    fn test_nearest_index() {
        let axes = params().with_tolerance(Tolerance::absolute(0.1));
        assert_eq!(axes.nearest_index(0, &AxisValue::Real(0.25)).unwrap(), 2);
        assert_eq!(axes.nearest_index(0, &AxisValue::Real(-4.4)).unwrap(), 0);
        assert!(matches!(
            axes.nearest_index(0, &AxisValue::Real(100.0)),
            Err(AxisError::ValueNotFound { axis, .. }) if axis == "param1"
        ));
        assert_eq!(
            axes.nearest_index(1, &AxisValue::Complex(Complex64::new(3.0, -4.0)))
                .unwrap(),
            1
        );
        // Reals are compared with complex axes on the complex plane.
        assert_eq!(axes.nearest_index(1, &AxisValue::Real(25.0)).unwrap(), 2);
    }

    #[test]
    fn test_nearest_index_default_tolerance() {
        let axes = params();
        assert_eq!(axes.nearest_index(0, &AxisValue::Real(0.3)).unwrap(), 2);
        assert_eq!(
            axes.nearest_index(0, &AxisValue::Real(0.3 + 1e-12)).unwrap(),
            2
        );
        assert!(axes.nearest_index(0, &AxisValue::Real(0.25)).is_err());
        // Without a tolerance check, the closest entry always wins.
        assert_eq!(axes.closest_index(0, &AxisValue::Real(100.0)).unwrap(), 3);
    }

    #[test]
    fn test_labels() {
        let axes = axes!(kind = vec!["low", "mid", "high"], x = [1.0, 2.0]);
        assert_eq!(axes.nearest_index(0, &"high".into()).unwrap(), 2);
        assert!(axes.nearest_index(0, &"other".into()).is_err());
        assert!(axes.nearest_index(0, &AxisValue::Real(1.0)).is_err());
        assert!(axes.nearest_index(1, &"low".into()).is_err());
        assert_eq!(axes.nearest_index_by_name("x", &AxisValue::Real(2.0)).unwrap(), 1);
    }

    #[test]
    fn test_values_at() {
        let axes = params();
        assert_eq!(
            axes.values_at(&[2, 1]).unwrap(),
            vec![
                AxisValue::Real(0.3),
                AxisValue::Complex(Complex64::new(3.0, -4.0))
            ]
        );
        assert!(axes.values_at(&[4, 0]).is_err());
        assert!(axes.values_at(&[0]).is_err());
    }

    #[test]
    fn test_axes_in() {
        let axes = params();
        assert_eq!(axes.axes_in(1..2).unwrap().len(), 1);
        assert_eq!(axes.axes_in(0..2).unwrap()[0].len(), 4);
        assert!(axes.axes_in(1..3).is_err());
    }

    #[test]
    fn test_reduce() {
        let axes = params();
        let reduced = axes.reduce(&["param1"], None).unwrap();
        assert_eq!(reduced.names(), axes.names());
        assert_eq!(reduced.values(0).unwrap(), &AxisValues::Real(vec![-4.4]));
        assert_eq!(reduced.values(1).unwrap(), axes.values(1).unwrap());

        let reduced = axes
            .reduce(&["param2"], Some(&[AxisValue::Real(7.0)]))
            .unwrap();
        assert_eq!(reduced.counts(), vec![4, 1]);
        assert_eq!(reduced.values(1).unwrap(), &AxisValues::Real(vec![7.0]));
    }

    #[test]
    fn test_reduce_idempotent() {
        let axes = params();
        let names = ["param1", "param2"];
        let once = axes.reduce(&names, None).unwrap();
        let twice = once.reduce(&names, None).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.counts(), vec![1, 1]);
    }

    #[test]
    fn test_reduce_errors() {
        let axes = params();
        assert!(matches!(
            axes.reduce(&["nope"], None),
            Err(AxisError::UnknownName { .. })
        ));
        assert!(matches!(
            axes.reduce(&["param1"], Some(&[])),
            Err(AxisError::Configuration { .. })
        ));
    }

    #[test]
    fn test_slice() {
        let axes = params();

        // An integer index drops the axis.
        let sliced = axes
            .slice(&[NpIndex::Index(2), NpIndex::FULL])
            .unwrap();
        assert_eq!(sliced.names(), &["param2".to_string()]);

        // A sub-range keeps it, with the sliced values.
        let sliced = axes
            .slice(&[NpIndex::Slice(NpSlice::new(Some(1), None, None))])
            .unwrap();
        assert_eq!(sliced.counts(), vec![3, 3]);
        assert_eq!(
            sliced.values(0).unwrap(),
            &AxisValues::Real(vec![-0.1, 0.3, 10.0])
        );

        // A range of length one drops it as well.
        let sliced = axes
            .slice(&[
                NpIndex::Slice(NpSlice::new(Some(0), Some(1), None)),
                NpIndex::Slice(NpSlice::new(None, None, Some(-1))),
            ])
            .unwrap();
        assert_eq!(sliced.names(), &["param2".to_string()]);
        assert_eq!(
            sliced.values(0).unwrap(),
            &AxisValues::Complex(vec![
                Complex64::new(25.0, 0.0),
                Complex64::new(3.0, -4.0),
                Complex64::new(0.0, 0.1)
            ])
        );

        let sliced = axes.slice(&[NpIndex::Index(0), NpIndex::Index(-1)]).unwrap();
        assert!(sliced.is_empty());
    }

    #[test]
    fn test_slice_out_of_range() {
        let axes = params();
        assert!(matches!(
            axes.slice(&[NpIndex::Index(4)]),
            Err(IndexError::Axis(AxisError::IndexOutOfRange { index: 4, size: 4, .. }))
        ));
    }

    #[test]
    fn test_tolerance_is_inherited() {
        let tolerance = Tolerance::absolute(0.5);
        let axes = params().with_tolerance(tolerance);
        assert_eq!(axes.slice(&[]).unwrap().tolerance(), tolerance);
        assert_eq!(axes.reduce(&["param1"], None).unwrap().tolerance(), tolerance);
    }
}
