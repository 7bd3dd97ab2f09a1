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

//! COUNT window aggregates

use crate::core::{Column, DataType, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

use super::per_frame;

/// COUNT(column) window function
///
/// Number of non-NULL values in the frame. Accepts every column kind.
#[derive(Debug, Clone)]
pub struct CountFunction {
    column: String,
}

impl CountFunction {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl WindowFunction for CountFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "count",
            FunctionType::Aggregate,
            "Returns the number of non-NULL values in the frame",
            FunctionSignature::new(1, 1),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn uses_frame(&self) -> bool {
        true
    }

    fn compute(&self, partition: &OrderedPartition<'_>, frame: &FrameSpec) -> Result<Column> {
        let column = partition.column(&self.column)?;

        // non-null prefix counts in logical order
        let mut prefix = Vec::with_capacity(partition.len() + 1);
        let mut seen = 0i64;
        prefix.push(seen);
        for pos in 0..partition.len() {
            if !column.is_null(partition.row_at(pos)) {
                seen += 1;
            }
            prefix.push(seen);
        }

        let counts = per_frame(partition, frame, |r| Some(prefix[r.end] - prefix[r.start]))?;
        Ok(Column::int64(self.name(), counts))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// COUNT(*) window function
///
/// Number of rows in the frame, NULLs included.
#[derive(Debug, Clone, Default)]
pub struct CountAllFunction;

impl CountAllFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for CountAllFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "count",
            FunctionType::Aggregate,
            "Returns the number of rows in the frame",
            FunctionSignature::new(0, 0),
        )
    }

    fn arguments(&self) -> Vec<String> {
        vec!["*".to_string()]
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn uses_frame(&self) -> bool {
        true
    }

    fn compute(&self, partition: &OrderedPartition<'_>, frame: &FrameSpec) -> Result<Column> {
        let counts = per_frame(partition, frame, |r| Some(r.len() as i64))?;
        Ok(Column::int64(self.name(), counts))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}
