/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Labeled n-dimensional arrays.
//!
//! Provides [`LabeledArray`], a dense [`ndarray::ArrayD`] whose
//! leading dimensions are named and carry a sequence of coordinate
//! values (an [`AxisSet`]). Besides ordinary integer and slice
//! indexing, a labeled array can be indexed by axis *value* (`0.25`
//! selects the position whose value is nearest 0.25, within a
//! [`Tolerance`]) and by axis *name* (`'flux':0.5` fixes the `flux`
//! axis wherever it sits). Indexing derives the labels of the result,
//! dropping axes that no longer vary.
//!
//! ```
//! use ndarray::ArrayD;
//! use ndarray::IxDyn;
//! use ndlabel::LabeledArray;
//! use ndlabel::Selected;
//!
//! let axes = ndlabel::axes!(ng = [-0.1, 0.0, 0.1, 0.2], flux = [-1.0, -0.5, 0.0, 0.5, 1.0]);
//! let array = LabeledArray::new(ArrayD::<f64>::zeros(IxDyn(&[4, 5])), axes).unwrap();
//!
//! // The same selection, by name and by position.
//! assert_eq!(array.get_str("'flux'::2, 'ng':-1").unwrap(), array.get_str("-1, :2").unwrap());
//! ```

/// Axis sets: named, ordered coordinate axes and value lookup.
pub mod axis;

/// Per-entry classification of raw index expressions.
pub mod classify;

/// Raw and canonical index expressions, and numpy slice semantics.
pub mod index;

/// The labeled array itself.
pub mod labeled;

/// Parser for the textual index syntax.
pub mod parse;

/// The persisted form of a labeled array.
pub mod record;

/// Resolution of whole index expressions into positional form.
pub mod resolve;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;

pub use axis::AxisError;
pub use axis::AxisSet;
pub use axis::AxisValue;
pub use axis::AxisValues;
pub use axis::DEFAULT_TOLERANCE;
pub use axis::Tolerance;
/// DSL-style constructors for building index expressions.
pub use index::dsl;
pub use index::Index;
pub use index::IndexEntry;
pub use index::IndexError;
pub use index::NpIndex;
pub use index::NpSlice;
pub use index::Scalar;
pub use index::SliceExpr;
pub use labeled::LabeledArray;
pub use labeled::LabeledArrayError;
pub use labeled::Selected;
pub use parse::ParseError;
pub use record::Record;
pub use resolve::IndexResolver;
pub use resolve::Resolved;
