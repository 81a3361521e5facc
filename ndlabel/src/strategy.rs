/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for [`LabeledArray`] and positional
//! index expressions.
//!
//! The main entry points are [`gen_labeled_array`], which builds an
//! array whose leading dimensions carry strictly increasing real
//! axes, and [`gen_positional`], which builds a numpy-style index for
//! a given shape.
//!
//! ```ignore
//! use proptest::prelude::*;
//!
//! use crate::strategy::gen_labeled_array;
//!
//! proptest! {
//!     #[test]
//!     fn test_array(array in gen_labeled_array(3, 5)) {
//!         // Index `array` ...
//!     }
//! }
//! ```
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use ndarray::ArrayD;
use ndarray::IxDyn;
use proptest::prelude::*;

use crate::axis::AxisSet;
use crate::axis::AxisValues;
use crate::index::IndexEntry;
use crate::index::NpIndex;
use crate::index::NpSlice;
use crate::index::Scalar;
use crate::index::SliceExpr;
use crate::labeled::LabeledArray;

/// Generates a shape of 1 to `max_dims` dimensions, each of size 1 to
/// `max_len`.
pub fn gen_shape(max_dims: usize, max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1..=max_len, 1..=max_dims)
}

/// Generates a strictly increasing sequence of `len` real values.
pub fn gen_axis_values(len: usize) -> impl Strategy<Value = AxisValues> {
    (-10.0f64..10.0, prop::collection::vec(0.25f64..2.0, len)).prop_map(|(origin, steps)| {
        let values = steps
            .iter()
            .scan(origin, |value, step| {
                let current = *value;
                *value += step;
                Some(current)
            })
            .collect::<Vec<_>>();
        AxisValues::Real(values)
    })
}

/// Generates an [`AxisSet`] with one axis per entry of `counts`,
/// named `a0`, `a1`, ...
pub fn gen_axis_set(counts: Vec<usize>) -> BoxedStrategy<AxisSet> {
    counts
        .into_iter()
        .map(gen_axis_values)
        .collect::<Vec<_>>()
        .prop_map(|values| {
            let names = (0..values.len()).map(|i| format!("a{i}")).collect();
            AxisSet::new(names, values).expect("valid axis set")
        })
        .boxed()
}

/// Generates a [`LabeledArray`] of up to `max_dims` dimensions. At
/// least the first dimension is labeled; the remaining ones may be
/// left unlabeled. Elements are their row-major offsets.
pub fn gen_labeled_array(
    max_dims: usize,
    max_len: usize,
) -> impl Strategy<Value = LabeledArray<usize>> {
    gen_shape(max_dims, max_len).prop_flat_map(|shape| {
        let ndim = shape.len();
        (1..=ndim).prop_flat_map(move |labeled| {
            let shape = shape.clone();
            gen_axis_set(shape[..labeled].to_vec()).prop_map(move |axes| {
                let len: usize = shape.iter().product();
                let data = ArrayD::from_shape_vec(IxDyn(&shape), (0..len).collect())
                    .expect("valid shape");
                LabeledArray::new(data, axes).expect("matching shape")
            })
        })
    })
}

/// Generates a positional index for one dimension of `size`: an
/// in-range position, or a slice whose bounds may fall outside the
/// dimension and whose step may be negative.
pub fn gen_np_index(size: usize) -> BoxedStrategy<NpIndex> {
    let size = size as isize;
    let bound = || prop::option::of(-(size + 2)..=(size + 2));
    let step = prop::option::of(prop_oneof![-3isize..=-1, 1isize..=3]);
    prop_oneof![
        (-size..size).prop_map(NpIndex::Index),
        (bound(), bound(), step)
            .prop_map(|(start, stop, step)| NpIndex::Slice(NpSlice::new(start, stop, step))),
    ]
    .boxed()
}

/// Generates a positional index for a prefix of `shape`.
pub fn gen_positional(shape: Vec<usize>) -> BoxedStrategy<Vec<NpIndex>> {
    let ndim = shape.len();
    (0..=ndim)
        .prop_flat_map(move |len| {
            shape[..len]
                .iter()
                .map(|&size| gen_np_index(size))
                .collect::<Vec<_>>()
        })
        .boxed()
}

/// Generates a labeled array together with a positional index for
/// it.
pub fn gen_array_and_index(
    max_dims: usize,
    max_len: usize,
) -> impl Strategy<Value = (LabeledArray<usize>, Vec<NpIndex>)> {
    gen_labeled_array(max_dims, max_len).prop_flat_map(|array| {
        let shape = array.shape().to_vec();
        (Just(array), gen_positional(shape))
    })
}

/// The raw entry that stands for `index`.
pub fn entry_of(index: NpIndex) -> IndexEntry {
    match index {
        NpIndex::Index(position) => IndexEntry::Scalar(Scalar::Int(position)),
        NpIndex::Slice(slice) => IndexEntry::Slice(SliceExpr {
            start: slice.start.map(Scalar::Int),
            stop: slice.stop.map(Scalar::Int),
            step: slice.step.map(Scalar::Int),
        }),
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::axis::AxisValue;
    use crate::index::Index;
    use crate::index::dsl;
    use crate::labeled::Selected;

    // Select `indices` from `data` element by element.
    fn reference(data: &ArrayD<usize>, indices: &[NpIndex]) -> ArrayD<usize> {
        let dims: Vec<(Vec<usize>, bool)> = data
            .shape()
            .iter()
            .enumerate()
            .map(|(dim, &size)| match indices.get(dim).copied().unwrap_or(NpIndex::FULL) {
                NpIndex::Index(position) => {
                    let position = if position < 0 {
                        position + size as isize
                    } else {
                        position
                    };
                    (vec![position as usize], false)
                }
                NpIndex::Slice(slice) => {
                    (slice.resolve(size).unwrap().positions().collect(), true)
                }
            })
            .collect();
        let shape: Vec<usize> = dims
            .iter()
            .filter(|(_, kept)| *kept)
            .map(|(positions, _)| positions.len())
            .collect();
        ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
            let mut kept = 0;
            let source: Vec<usize> = dims
                .iter()
                .map(|(positions, keep)| {
                    if *keep {
                        kept += 1;
                        positions[ix[kept - 1]]
                    } else {
                        positions[0]
                    }
                })
                .collect();
            data[IxDyn(&source)]
        })
    }

    proptest! {
        #[test]
        fn test_positional_matches_elementwise((array, indices) in gen_array_and_index(4, 5)) {
            let index = Index::Entries(indices.iter().copied().map(entry_of).collect());
            let selected = array.get(&index).unwrap();
            prop_assert_eq!(selected.into_array(), reference(array.data(), &indices));
        }

        #[test]
        fn test_labels_follow_data((array, indices) in gen_array_and_index(4, 5)) {
            let index = Index::Entries(indices.iter().copied().map(entry_of).collect());
            if let Selected::Labeled(selected) = array.get(&index).unwrap() {
                let counts = selected.axes().counts();
                prop_assert_eq!(&selected.shape()[..counts.len()], &counts[..]);
                prop_assert!(counts.iter().all(|&count| count > 1));
            }
        }

        #[test]
        fn test_text_matches_structured((array, indices) in gen_array_and_index(3, 4)) {
            prop_assume!(!indices.is_empty());
            let index = Index::Entries(indices.iter().copied().map(entry_of).collect());
            let text = indices.iter().join(", ");
            prop_assert_eq!(array.get_str(&text).unwrap(), array.get(&index).unwrap());
        }

        #[test]
        fn test_name_matches_position(
            (array, axis, position) in gen_labeled_array(3, 5).prop_flat_map(|array| {
                let axes = array.axes().len();
                (Just(array), 0..axes).prop_flat_map(|(array, axis)| {
                    let count = array.axes().counts()[axis];
                    (Just(array), Just(axis), 0..count)
                })
            })
        ) {
            let name = array.axes().name_of(axis).unwrap().to_string();
            let Some(AxisValue::Real(value)) = array.axes().values(axis).unwrap().get(position) else {
                panic!("real axis expected");
            };
            let by_name = array.get(&dsl::name(&name).start(value).into()).unwrap();
            let mut entries = vec![dsl::all(); axis];
            entries.push(dsl::at(position as isize));
            let by_position = array.get(&Index::Entries(entries)).unwrap();
            prop_assert_eq!(by_name, by_position);
        }

        #[test]
        fn test_value_matches_position(
            (array, position) in gen_labeled_array(3, 5).prop_flat_map(|array| {
                let count = array.axes().counts()[0];
                (Just(array), 0..count)
            })
        ) {
            let Some(value) = array.axes().values(0).unwrap().get(position) else {
                panic!("position in range");
            };
            let AxisValue::Real(value) = value else {
                panic!("real axis expected");
            };
            prop_assert_eq!(
                array.get(&Index::Entries(vec![dsl::at(value)])).unwrap(),
                array.get(&Index::Int(position as isize)).unwrap()
            );
        }
    }
}
