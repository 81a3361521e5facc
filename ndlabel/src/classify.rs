/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Per-entry classification of raw index expressions.
//!
//! Each [`IndexEntry`] of a multi-axis expression is classified on its
//! own into one of four kinds (see [`Classified`]) and normalized into
//! positional form. Deciding whether the kinds of a whole expression
//! are consistent is left to the resolver.

use crate::axis::AxisError;
use crate::axis::AxisSet;
use crate::axis::AxisValue;
use crate::index::IndexEntry;
use crate::index::IndexError;
use crate::index::NpIndex;
use crate::index::NpSlice;
use crate::index::Scalar;
use crate::index::SliceExpr;

/// A classified, positionally normalized index entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    /// An integer position, passed through as is.
    ExactPosition(isize),
    /// A real, complex or label value, resolved to the position of
    /// the matching axis value.
    ValueLookup(usize),
    /// `name:start:stop`; `index` is a single position when only a
    /// start is given, otherwise a step-less slice.
    NameSlice { name: String, index: NpIndex },
    /// A positional `start:stop:step` slice.
    PlainSlice(NpSlice),
}

impl Classified {
    pub fn is_name_based(&self) -> bool {
        matches!(self, Classified::NameSlice { .. })
    }

    /// The positional index this entry stands for.
    pub fn into_np_index(self) -> NpIndex {
        match self {
            Classified::ExactPosition(position) => NpIndex::Index(position),
            Classified::ValueLookup(position) => NpIndex::Index(position as isize),
            Classified::NameSlice { index, .. } => index,
            Classified::PlainSlice(slice) => NpIndex::Slice(slice),
        }
    }
}

/// Classify `entry`, found at `position` of its expression, against
/// `axes`.
pub fn classify(
    entry: &IndexEntry,
    axes: &AxisSet,
    position: usize,
) -> Result<Classified, IndexError> {
    let classified = match entry {
        IndexEntry::Scalar(Scalar::Int(index)) => Classified::ExactPosition(*index),
        IndexEntry::Scalar(scalar) => {
            let value = value_of(scalar)?;
            Classified::ValueLookup(axes.nearest_index(position, &value)?)
        }
        IndexEntry::Slice(slice) => match &slice.start {
            Some(Scalar::Str(name)) => classify_name_slice(name, slice, axes)?,
            _ => classify_plain_slice(slice, axes, position)?,
        },
    };
    tracing::trace!("classified index entry {entry} at {position} as {classified:?}");
    Ok(classified)
}

fn classify_name_slice(
    name: &str,
    slice: &SliceExpr,
    axes: &AxisSet,
) -> Result<Classified, IndexError> {
    let lookup = |value: &AxisValue| axes.nearest_index_by_name(name, value);
    // The name takes the start slot, so the raw stop and step carry
    // the bounds.
    let start = bound(slice.stop.as_ref(), lookup)?;
    let stop = bound(slice.step.as_ref(), lookup)?;
    let index = match (start, stop) {
        (Some(start), None) => NpIndex::Index(start),
        (start, stop) => NpIndex::Slice(NpSlice::new(start, stop, None)),
    };
    Ok(Classified::NameSlice {
        name: name.to_string(),
        index,
    })
}

fn classify_plain_slice(
    slice: &SliceExpr,
    axes: &AxisSet,
    position: usize,
) -> Result<Classified, IndexError> {
    let lookup = |value: &AxisValue| axes.nearest_index(position, value);
    let start = bound(slice.start.as_ref(), lookup)?;
    let stop = bound(slice.stop.as_ref(), lookup)?;
    let step = match &slice.step {
        None => None,
        Some(Scalar::Int(step)) => Some(*step),
        Some(other) => {
            return Err(IndexError::TypeKind {
                reason: format!("slice step can only be an integer or absent, found {other}"),
            });
        }
    };
    Ok(Classified::PlainSlice(NpSlice::new(start, stop, step)))
}

/// Normalize one slice bound: absent stays absent, integers pass
/// through and values are looked up.
fn bound(
    scalar: Option<&Scalar>,
    lookup: impl Fn(&AxisValue) -> Result<usize, AxisError>,
) -> Result<Option<isize>, IndexError> {
    match scalar {
        None => Ok(None),
        Some(Scalar::Int(index)) => Ok(Some(*index)),
        Some(scalar) => Ok(Some(lookup(&value_of(scalar)?)? as isize)),
    }
}

fn value_of(scalar: &Scalar) -> Result<AxisValue, IndexError> {
    scalar.as_value().ok_or_else(|| IndexError::TypeKind {
        reason: format!("{scalar} is not an axis value"),
    })
}
