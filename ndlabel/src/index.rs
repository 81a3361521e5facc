/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Index expressions.
//!
//! Two families of types live here:
//!
//! - The *raw* expression a caller writes: an [`Index`] made of
//!   [`IndexEntry`] values, whose components are [`Scalar`]s. A scalar
//!   may be an integer position, a real or complex axis value, or a
//!   string (an axis name when it leads a slice, an axis label
//!   otherwise).
//! - The *canonical* positional form handed to the dense array: one
//!   [`NpIndex`] per dimension, either an integer position or an
//!   integer-bounded [`NpSlice`].
//!
//! Positional slices follow numpy semantics: negative bounds count
//! from the end of the dimension, out-of-range bounds are clamped and
//! a negative step walks backwards. [`NpSlice::resolve`] turns a slice
//! into a concrete [`Span`] for a dimension of known size.

use std::fmt;

use num_complex::Complex64;
use serde::Deserialize;
use serde::Serialize;

use crate::axis::AxisError;
use crate::axis::AxisValue;

/// The type of error raised while classifying or resolving an index
/// expression.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("invalid index kind: {reason}")]
    TypeKind { reason: String },

    #[error("if one index is name-based, all indices must be (entry {position} is not)")]
    MixedMode { position: usize },

    #[error("axis `{name}` is named more than once")]
    RepeatedAxis { name: String },

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error(transparent)]
    Axis(#[from] AxisError),
}

/// A scalar component of a raw index expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// An integer position.
    Int(isize),
    /// A real axis value, looked up by nearest match.
    Real(f64),
    /// A complex axis value, looked up by nearest match.
    Complex(Complex64),
    /// An axis name (leading a slice) or a string label.
    Str(String),
}

impl Scalar {
    /// The axis value this scalar denotes, or `None` for integer
    /// positions.
    pub fn as_value(&self) -> Option<AxisValue> {
        match self {
            Scalar::Int(_) => None,
            Scalar::Real(value) => Some(AxisValue::Real(*value)),
            Scalar::Complex(value) => Some(AxisValue::Complex(*value)),
            Scalar::Str(label) => Some(AxisValue::Label(label.clone())),
        }
    }
}

impl From<isize> for Scalar {
    fn from(value: isize) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as isize)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Real(value)
    }
}

impl From<Complex64> for Scalar {
    fn from(value: Complex64) -> Self {
        Scalar::Complex(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Real(value) => write!(f, "{:?}", value),
            Scalar::Complex(value) => {
                let sign = if value.im < 0.0 { '-' } else { '+' };
                write!(f, "({:?}{}{:?}j)", value.re, sign, value.im.abs())
            }
            Scalar::Str(value) => write!(f, "'{}'", value),
        }
    }
}

/// A raw `start:stop:step` slice. When `start` is a string, the slice
/// is name-based and reads `name:start:stop` instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceExpr {
    pub start: Option<Scalar>,
    pub stop: Option<Scalar>,
    pub step: Option<Scalar>,
}

impl SliceExpr {
    /// The unconstrained slice `:`.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: impl Into<Scalar>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn stop(mut self, stop: impl Into<Scalar>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    pub fn step(mut self, step: impl Into<Scalar>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Whether this slice addresses an axis by name.
    pub fn is_name_based(&self) -> bool {
        matches!(self.start, Some(Scalar::Str(_)))
    }
}

impl fmt::Display for SliceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = &self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(stop) = &self.stop {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = &self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

/// One entry of a raw multi-axis index expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IndexEntry {
    Scalar(Scalar),
    Slice(SliceExpr),
}

impl IndexEntry {
    /// True for integers and slices whose bounds are all integers.
    pub fn is_positional(&self) -> bool {
        let positional = |scalar: &Option<Scalar>| matches!(scalar, None | Some(Scalar::Int(_)));
        match self {
            IndexEntry::Scalar(scalar) => matches!(scalar, Scalar::Int(_)),
            IndexEntry::Slice(slice) => {
                positional(&slice.start) && positional(&slice.stop) && positional(&slice.step)
            }
        }
    }
}

impl From<Scalar> for IndexEntry {
    fn from(scalar: Scalar) -> Self {
        IndexEntry::Scalar(scalar)
    }
}

impl From<SliceExpr> for IndexEntry {
    fn from(slice: SliceExpr) -> Self {
        IndexEntry::Slice(slice)
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexEntry::Scalar(scalar) => write!(f, "{}", scalar),
            IndexEntry::Slice(slice) => write!(f, "{}", slice),
        }
    }
}

/// A complete raw index expression.
///
/// A bare integer is kept apart from a one-element tuple: it is plain
/// positional indexing of the leading axis and is never classified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Index {
    Int(isize),
    Entries(Vec<IndexEntry>),
}

impl Index {
    /// True when the expression uses only integers and integer
    /// slices, i.e. it is ordinary array indexing.
    pub fn is_positional(&self) -> bool {
        match self {
            Index::Int(_) => true,
            Index::Entries(entries) => entries.iter().all(IndexEntry::is_positional),
        }
    }

    /// The entries of this expression; a bare integer is a single
    /// entry.
    pub fn entries(&self) -> Vec<IndexEntry> {
        match self {
            Index::Int(position) => vec![IndexEntry::Scalar(Scalar::Int(*position))],
            Index::Entries(entries) => entries.clone(),
        }
    }
}

impl From<isize> for Index {
    fn from(position: isize) -> Self {
        Index::Int(position)
    }
}

impl From<IndexEntry> for Index {
    fn from(entry: IndexEntry) -> Self {
        Index::Entries(vec![entry])
    }
}

impl From<SliceExpr> for Index {
    fn from(slice: SliceExpr) -> Self {
        Index::Entries(vec![IndexEntry::Slice(slice)])
    }
}

impl From<Vec<IndexEntry>> for Index {
    fn from(entries: Vec<IndexEntry>) -> Self {
        Index::Entries(entries)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Int(position) => write!(f, "{}", position),
            Index::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                Ok(())
            }
        }
    }
}

/// Constructors for raw index expressions.
///
/// ```
/// use ndlabel::index::dsl::*;
/// use ndlabel::index::Index;
///
/// // 'flux':0.5 -- fix the `flux` axis at the value 0.5.
/// let by_name = Index::Entries(vec![name("flux").start(0.5).into()]);
/// // 0.25, 0:2
/// let by_value = Index::Entries(vec![at(0.25), range(0, 2)]);
/// assert!(!by_name.is_positional());
/// assert!(!by_value.is_positional());
/// ```
pub mod dsl {
    use super::Index;
    use super::IndexEntry;
    use super::Scalar;
    use super::SliceExpr;

    /// A single position or value.
    pub fn at(scalar: impl Into<Scalar>) -> IndexEntry {
        IndexEntry::Scalar(scalar.into())
    }

    /// The unconstrained slice `:`.
    pub fn all() -> IndexEntry {
        IndexEntry::Slice(SliceExpr::full())
    }

    /// The slice `start:stop`.
    pub fn range(start: impl Into<Scalar>, stop: impl Into<Scalar>) -> IndexEntry {
        IndexEntry::Slice(SliceExpr::full().start(start).stop(stop))
    }

    /// A name-based slice builder, `name:start:stop`.
    pub fn name(name: &str) -> NameSlice {
        NameSlice {
            expr: SliceExpr::full().start(name),
        }
    }

    /// Builder for `name:start:stop` slices. The name occupies the
    /// raw slice's start, so the bounds shift one place to the right.
    #[derive(Clone, Debug)]
    pub struct NameSlice {
        expr: SliceExpr,
    }

    impl NameSlice {
        pub fn start(mut self, start: impl Into<Scalar>) -> Self {
            self.expr.stop = Some(start.into());
            self
        }

        pub fn stop(mut self, stop: impl Into<Scalar>) -> Self {
            self.expr.step = Some(stop.into());
            self
        }
    }

    impl From<NameSlice> for IndexEntry {
        fn from(slice: NameSlice) -> Self {
            IndexEntry::Slice(slice.expr)
        }
    }

    impl From<NameSlice> for Index {
        fn from(slice: NameSlice) -> Self {
            Index::Entries(vec![slice.into()])
        }
    }
}

/// A positional slice with optional integer bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpSlice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl NpSlice {
    /// The unconstrained slice `:`.
    pub const FULL: NpSlice = NpSlice {
        start: None,
        stop: None,
        step: None,
    };

    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Resolve this slice against a dimension of `size` elements.
    ///
    /// Bounds are clamped the way numpy clamps them, so the resulting
    /// span only ever addresses valid positions.
    pub fn resolve(&self, size: usize) -> Result<Span, IndexError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(IndexError::ZeroStep);
        }
        let size = size as isize;
        let (lower, upper) = if step > 0 { (0, size) } else { (-1, size - 1) };
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + size).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = match self.start {
            Some(start) => clamp(start),
            None if step > 0 => lower,
            None => upper,
        };
        let stop = match self.stop {
            Some(stop) => clamp(stop),
            None if step > 0 => upper,
            None => lower,
        };
        // `start` and `stop` lie within `-1..=size`, so their distance
        // cannot overflow; `step` may be anything but zero.
        let distance = if step > 0 { stop - start } else { start - stop };
        let len = if distance > 0 {
            (distance - 1).unsigned_abs() / step.unsigned_abs() + 1
        } else {
            0
        };
        Ok(Span { start, step, len })
    }
}

impl fmt::Display for NpSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

/// A canonical positional index for one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpIndex {
    /// A single position; removes the dimension.
    Index(isize),
    /// A sub-range; keeps the dimension.
    Slice(NpSlice),
}

impl NpIndex {
    pub const FULL: NpIndex = NpIndex::Slice(NpSlice::FULL);
}

impl fmt::Display for NpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NpIndex::Index(position) => write!(f, "{}", position),
            NpIndex::Slice(slice) => write!(f, "{}", slice),
        }
    }
}

/// Map a possibly negative position onto `0..size`.
pub fn normalize_position(position: isize, size: usize) -> Option<usize> {
    let size = size as isize;
    let position = if position < 0 {
        position + size
    } else {
        position
    };
    (0..size).contains(&position).then_some(position as usize)
}

/// A resolved slice: `len` positions starting at `start`, `step`
/// apart. All positions are valid for the dimension it was resolved
/// against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    start: isize,
    step: isize,
    len: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The addressed positions, in traversal order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len as isize).map(move |k| (self.start + k * self.step) as usize)
    }

    /// The equivalent `ndarray` slice.
    ///
    /// `ndarray` applies a negative step by walking its `start..end`
    /// range from the back, so a backwards span is expressed through
    /// its lowest position.
    pub fn to_nd_slice(&self) -> ndarray::Slice {
        match self.len {
            0 => return ndarray::Slice::new(0, Some(0), 1),
            1 => return ndarray::Slice::new(self.start, Some(self.start + 1), 1),
            _ => {}
        }
        let last = self.start + (self.len as isize - 1) * self.step;
        if self.step > 0 {
            ndarray::Slice::new(self.start, Some(last + 1), self.step)
        } else {
            ndarray::Slice::new(last, Some(self.start + 1), self.step)
        }
    }
}
