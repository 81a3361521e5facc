/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Resolution of whole index expressions into canonical positional
//! form.
//!
//! An expression is either entirely name-based or entirely
//! positional:
//!
//! ```text
//!     'flux':0.5              -->  :, 3
//!     'flux'::2, 'ng':-1      -->  -1, :2
//!     0.25, 0:2               -->  2, 0:2
//!     'flux':0.5, 1           -->  error (mixed mode)
//! ```
//!
//! A name-based expression starts from "every axis unconstrained" and
//! overwrites only the axes it names, each at most once. A positional
//! expression applies its entries in order; axes past its end stay
//! unconstrained.

use crate::axis::AxisSet;
use crate::classify::Classified;
use crate::classify::classify;
use crate::index::Index;
use crate::index::IndexError;
use crate::index::NpIndex;

/// The canonical form of an index expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// One positional index per dimension addressed; at least one per
    /// named axis.
    pub indices: Vec<NpIndex>,
    /// The labeling of the result, if any named axis still varies.
    pub axes: Option<AxisSet>,
}

/// Resolves index expressions against an [`AxisSet`].
pub struct IndexResolver<'a> {
    axes: &'a AxisSet,
}

impl<'a> IndexResolver<'a> {
    pub fn new(axes: &'a AxisSet) -> Self {
        Self { axes }
    }

    /// Resolve `index` into positional indices and the labeling of the
    /// indexed result.
    pub fn resolve(&self, index: &Index) -> Result<Resolved, IndexError> {
        let indices = match index {
            // Plain integer indexing of the leading axis.
            Index::Int(position) => vec![NpIndex::Index(*position)],
            Index::Entries(entries) => {
                let classified = entries
                    .iter()
                    .enumerate()
                    .map(|(position, entry)| classify(entry, self.axes, position))
                    .collect::<Result<Vec<_>, _>>()?;
                match classified.first() {
                    Some(first) if first.is_name_based() => self.name_based(classified)?,
                    _ => self.positional(classified)?,
                }
            }
        };

        let axes = self.axes.slice(&indices)?;
        let axes = if axes.is_empty() {
            tracing::debug!("index {index} reduces every named axis of {}", self.axes);
            None
        } else {
            Some(axes)
        };
        Ok(Resolved { indices, axes })
    }

    fn name_based(&self, classified: Vec<Classified>) -> Result<Vec<NpIndex>, IndexError> {
        let mut indices = vec![NpIndex::FULL; self.axes.len()];
        let mut named = vec![false; self.axes.len()];
        for (position, entry) in classified.into_iter().enumerate() {
            match entry {
                Classified::NameSlice { name, index } => {
                    let axis = self.axes.position_of(&name)?;
                    if std::mem::replace(&mut named[axis], true) {
                        return Err(IndexError::RepeatedAxis { name });
                    }
                    indices[axis] = index;
                }
                _ => return Err(IndexError::MixedMode { position }),
            }
        }
        tracing::debug!(
            "resolved name-based index to ({})",
            itertools::join(&indices, ", ")
        );
        Ok(indices)
    }

    fn positional(&self, classified: Vec<Classified>) -> Result<Vec<NpIndex>, IndexError> {
        if let Some(position) = classified.iter().position(Classified::is_name_based) {
            return Err(IndexError::MixedMode { position });
        }
        let mut indices: Vec<NpIndex> = classified
            .into_iter()
            .map(Classified::into_np_index)
            .collect();
        if indices.len() < self.axes.len() {
            indices.resize(self.axes.len(), NpIndex::FULL);
        }
        Ok(indices)
    }
}

/// Resolve `index` against `axes`.
pub fn resolve(index: &Index, axes: &AxisSet) -> Result<Resolved, IndexError> {
    IndexResolver::new(axes).resolve(index)
}
