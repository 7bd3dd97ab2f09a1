// Copyright 2025 Winframe Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Aggregate Functions
//!
//! Aggregates evaluated over each row's frame:
//!
//! - [`SumFunction`] - SUM(column)
//! - [`AvgFunction`] - AVG(column)
//! - [`MinFunction`] - MIN(column)
//! - [`MaxFunction`] - MAX(column)
//! - [`CountFunction`] - COUNT(column)
//! - [`CountAllFunction`] - COUNT(*)
//!
//! SUM, AVG, MIN and MAX are specialized per numeric kind through the sealed
//! [`NumericKind`] trait; any other column kind is `UnsupportedType`.
//! An empty frame yields 0, and so does a frame holding only NULLs.

mod avg;
mod count;
mod max;
mod min;
mod sum;

pub use avg::AvgFunction;
pub use count::{CountAllFunction, CountFunction};
pub use max::MaxFunction;
pub use min::MinFunction;
pub use sum::SumFunction;

use std::cmp::Ordering;
use std::ops::Range;

use crate::core::value::compare_floats;
use crate::core::{Column, ColumnAccessor, DataType, Result, Value};
use crate::window::{FrameSpec, OrderedPartition};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Numeric column kinds with aggregate kernels
pub trait NumericKind: sealed::Sealed + Copy + PartialOrd + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    /// Integer arithmetic is exact under wrapping, so frame sums can come
    /// from prefix differences
    const EXACT_PREFIX: bool;

    fn zero() -> Self;

    fn from_value(value: &Value) -> Option<Self>;

    /// Addition; integers wrap on overflow
    fn add(self, other: Self) -> Self;

    /// Subtraction; integers wrap on overflow
    fn sub(self, other: Self) -> Self;

    fn to_f64(self) -> f64;

    /// Total order used by MIN and MAX; NaN sorts above every number
    fn order(self, other: Self) -> Ordering;

    fn into_column(name: &str, values: Vec<Option<Self>>) -> Column;
}

impl NumericKind for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
    const EXACT_PREFIX: bool = true;

    fn zero() -> Self {
        0
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int64().map(|v| v as i32)
    }

    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    fn sub(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn order(self, other: Self) -> Ordering {
        self.cmp(&other)
    }

    fn into_column(name: &str, values: Vec<Option<Self>>) -> Column {
        Column::int32(name, values)
    }
}

impl NumericKind for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
    const EXACT_PREFIX: bool = true;

    fn zero() -> Self {
        0
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int64()
    }

    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    fn sub(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn order(self, other: Self) -> Ordering {
        self.cmp(&other)
    }

    fn into_column(name: &str, values: Vec<Option<Self>>) -> Column {
        Column::int64(name, values)
    }
}

impl NumericKind for f64 {
    const DATA_TYPE: DataType = DataType::Float64;
    const EXACT_PREFIX: bool = false;

    fn zero() -> Self {
        0.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float64()
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn sub(self, other: Self) -> Self {
        self - other
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn order(self, other: Self) -> Ordering {
        compare_floats(self, other)
    }

    fn into_column(name: &str, values: Vec<Option<Self>>) -> Column {
        Column::float64(name, values)
    }
}

/// Column values at each logical position of the partition
pub(crate) fn load<T: NumericKind>(
    partition: &OrderedPartition<'_>,
    column: &dyn ColumnAccessor,
) -> Vec<Option<T>> {
    (0..partition.len())
        .map(|pos| T::from_value(&partition.value_at(column, pos)))
        .collect()
}

/// Evaluate `f` on every row's frame; the result is laid out by slot
pub(crate) fn per_frame<R: Clone + Default>(
    partition: &OrderedPartition<'_>,
    frame: &FrameSpec,
    mut f: impl FnMut(Range<usize>) -> R,
) -> Result<Vec<R>> {
    let mut out = vec![R::default(); partition.len()];
    for pos in 0..partition.len() {
        let range = partition.frame_bounds(pos, Some(frame))?;
        out[partition.slot_at(pos)] = f(range);
    }
    Ok(out)
}

/// Sum of the non-null values in `values`
pub(crate) fn sum_of<T: NumericKind>(values: &[Option<T>]) -> T {
    values
        .iter()
        .flatten()
        .fold(T::zero(), |acc, &v| acc.add(v))
}

/// Running sums: `prefix[i]` is the sum of `values[..i]`, nulls skipped
pub(crate) fn prefix_sums<T: NumericKind>(values: &[Option<T>]) -> Vec<T> {
    let mut prefix = Vec::with_capacity(values.len() + 1);
    let mut acc = T::zero();
    prefix.push(acc);
    for v in values {
        if let Some(v) = v {
            acc = acc.add(*v);
        }
        prefix.push(acc);
    }
    prefix
}
