/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The persisted form of a [`LabeledArray`].
//!
//! A record holds the data as nested sequences under `input_array`
//! and the axes as an ordered `name -> values` mapping under
//! `values_by_name`:
//!
//! ```text
//! {
//!   "input_array": [[0, 1, 2], [10, 11, 12]],
//!   "values_by_name": {"ng": [-0.1, 0.0], "flux": [-1.0, 0.0, 1.0]}
//! }
//! ```
//!
//! An array with a zero-length dimension nests no deeper than that
//! dimension, so its record also carries the full `shape`.
//!
//! Axis order is the mapping's document order. Unknown fields are
//! ignored, and a record is only accepted if it passes the same
//! validation as [`LabeledArray::new`]. The lookup tolerance is not
//! part of the record.

use std::fmt;

use ndarray::ArrayD;
use ndarray::ArrayViewD;
use ndarray::IxDyn;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use crate::axis::AxisSet;
use crate::axis::AxisValues;
use crate::labeled::LabeledArray;
use crate::labeled::LabeledArrayError;

/// A dense array as nested sequences, outermost dimension first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    List(Vec<Nested<T>>),
    Leaf(T),
}

impl<T: Clone> Nested<T> {
    pub fn from_array(array: &ArrayD<T>) -> Self {
        Self::from_view(array.view())
    }

    fn from_view(view: ArrayViewD<'_, T>) -> Self {
        if view.ndim() == 0 {
            if let Some(value) = view.iter().next() {
                return Nested::Leaf(value.clone());
            }
        }
        Nested::List(view.outer_iter().map(Self::from_view).collect())
    }
}

impl<T> Nested<T> {
    /// Rebuild the dense array. Every list at a given depth must have
    /// the same length, and leaves may only appear at the innermost
    /// depth.
    pub fn into_array(self) -> Result<ArrayD<T>, LabeledArrayError> {
        let shape = self.shape();
        self.into_array_with_shape(&shape)
    }

    /// Rebuild the dense array, requiring it to have `shape`.
    pub fn into_array_with_shape(self, shape: &[usize]) -> Result<ArrayD<T>, LabeledArrayError> {
        let mut flat = Vec::with_capacity(shape.iter().product());
        self.flatten_into(shape, &mut flat)?;
        ArrayD::from_shape_vec(IxDyn(shape), flat).map_err(|err| {
            LabeledArrayError::MalformedRecord {
                reason: err.to_string(),
            }
        })
    }

    // The shape implied by the first element at every depth.
    fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::new();
        let mut node = self;
        while let Nested::List(items) = node {
            shape.push(items.len());
            match items.first() {
                Some(first) => node = first,
                None => break,
            }
        }
        shape
    }

    fn flatten_into(self, shape: &[usize], flat: &mut Vec<T>) -> Result<(), LabeledArrayError> {
        match (self, shape.split_first()) {
            (Nested::Leaf(value), None) => {
                flat.push(value);
                Ok(())
            }
            (Nested::List(items), Some((&len, rest))) if items.len() == len => {
                for item in items {
                    item.flatten_into(rest, flat)?;
                }
                Ok(())
            }
            (Nested::List(items), Some((&len, _))) => Err(LabeledArrayError::MalformedRecord {
                reason: format!("ragged input: expected {} entries, found {}", len, items.len()),
            }),
            (Nested::List(_), None) => Err(LabeledArrayError::MalformedRecord {
                reason: "ragged input: found a list where a value was expected".to_string(),
            }),
            (Nested::Leaf(_), Some(_)) => Err(LabeledArrayError::MalformedRecord {
                reason: "ragged input: found a value where a list was expected".to_string(),
            }),
        }
    }
}

/// Axis value sequences by name, in axis order. Serialized as a map
/// whose entry order is the axis order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValuesByName(pub Vec<(String, AxisValues)>);

impl From<&AxisSet> for ValuesByName {
    fn from(axes: &AxisSet) -> Self {
        Self(
            axes.iter()
                .map(|(name, values)| (name.to_string(), values.clone()))
                .collect(),
        )
    }
}

impl TryFrom<ValuesByName> for AxisSet {
    type Error = LabeledArrayError;

    fn try_from(values: ValuesByName) -> Result<Self, Self::Error> {
        Ok(AxisSet::from_pairs(values.0)?)
    }
}

impl Serialize for ValuesByName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in &self.0 {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValuesByName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ValuesByName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map from axis names to value sequences")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, AxisValues>()? {
                    entries.push(entry);
                }
                Ok(ValuesByName(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// The persisted form of a [`LabeledArray`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub input_array: Nested<T>,
    pub values_by_name: ValuesByName,
    /// Present only when `input_array` cannot convey the shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,
}

impl<T: Clone> LabeledArray<T> {
    pub fn to_record(&self) -> Record<T> {
        let shape = self.shape();
        Record {
            input_array: Nested::from_array(self.data()),
            values_by_name: self.axes().into(),
            shape: shape.contains(&0).then(|| shape.to_vec()),
        }
    }
}

impl<T> LabeledArray<T> {
    /// Rebuild a labeled array from its record, validating it like
    /// [`LabeledArray::new`].
    pub fn from_record(record: Record<T>) -> Result<Self, LabeledArrayError> {
        let data = match record.shape {
            Some(shape) => record.input_array.into_array_with_shape(&shape)?,
            None => record.input_array.into_array()?,
        };
        let axes = AxisSet::try_from(record.values_by_name)?;
        tracing::debug!("restoring labeled array {} from record", axes);
        LabeledArray::new(data, axes)
    }
}

impl<T: Clone + Serialize> Serialize for LabeledArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LabeledArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Record::<T>::deserialize(deserializer)?;
        LabeledArray::from_record(record).map_err(serde::de::Error::custom)
    }
}
