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

//! MIN window aggregate

use crate::core::{Column, ColumnAccessor, DataType, Error, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

use super::{load, per_frame, NumericKind};

/// MIN window function
///
/// Smallest non-NULL value of each row's frame, 0 when there is none.
#[derive(Debug, Clone)]
pub struct MinFunction {
    column: String,
}

impl MinFunction {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    fn compute_kind<T: NumericKind>(
        &self,
        partition: &OrderedPartition<'_>,
        frame: &FrameSpec,
        column: &dyn ColumnAccessor,
    ) -> Result<Column> {
        let values = load::<T>(partition, column);
        let mins = per_frame(partition, frame, |r| {
            let min = values[r].iter().flatten().copied().min_by(|a, b| a.order(*b));
            Some(min.unwrap_or_else(T::zero))
        })?;
        Ok(T::into_column(self.name(), mins))
    }
}

impl WindowFunction for MinFunction {
    fn name(&self) -> &str {
        "min"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "min",
            FunctionType::Aggregate,
            "Returns the minimum non-NULL value in the frame",
            FunctionSignature::new(1, 1),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn uses_frame(&self) -> bool {
        true
    }

    fn compute(&self, partition: &OrderedPartition<'_>, frame: &FrameSpec) -> Result<Column> {
        let column = partition.column(&self.column)?;
        match column.data_type() {
            DataType::Int32 => self.compute_kind::<i32>(partition, frame, column),
            DataType::Int64 => self.compute_kind::<i64>(partition, frame, column),
            DataType::Float64 => self.compute_kind::<f64>(partition, frame, column),
            kind => Err(Error::unsupported_type("min", &self.column, kind)),
        }
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}
