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

//! FIRST_VALUE, LAST_VALUE and NTH_VALUE window functions

use crate::core::{Column, DataType, Error, Result, Value};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition, WindowSpec};

/// Broadcast the value at logical position `pos` to every row
fn broadcast(
    name: &str,
    column: &str,
    partition: &OrderedPartition<'_>,
    pos: Option<usize>,
) -> Result<Column> {
    let source = partition.column(column)?;
    let value = pos.map_or(Value::Null, |p| partition.value_at(source, p));
    let mut out = Column::nulls(name, source.data_type(), partition.len());
    for slot in 0..partition.len() {
        out.set(slot, &value)?;
    }
    Ok(out)
}

/// FIRST_VALUE window function
///
/// Value at the first sorted position of the partition, the same for
/// every row.
#[derive(Debug, Clone)]
pub struct FirstValueFunction {
    column: String,
}

impl FirstValueFunction {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl WindowFunction for FirstValueFunction {
    fn name(&self) -> &str {
        "first_value"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "first_value",
            FunctionType::Window,
            "Returns the first value of the partition",
            FunctionSignature::new(1, 1),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let first = (!partition.is_empty()).then_some(0);
        broadcast(self.name(), &self.column, partition, first)
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// LAST_VALUE window function
///
/// Value at the last sorted position of the partition, the same for every
/// row regardless of the frame.
#[derive(Debug, Clone)]
pub struct LastValueFunction {
    column: String,
}

impl LastValueFunction {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl WindowFunction for LastValueFunction {
    fn name(&self) -> &str {
        "last_value"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "last_value",
            FunctionType::Window,
            "Returns the last value of the partition",
            FunctionSignature::new(1, 1),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let last = partition.len().checked_sub(1);
        broadcast(self.name(), &self.column, partition, last)
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// NTH_VALUE window function
///
/// The `n`-th row (1-based) of each row's frame; NULL when the frame is
/// shorter than `n`.
#[derive(Debug, Clone)]
pub struct NthValueFunction {
    column: String,
    n: usize,
}

impl NthValueFunction {
    /// `n` must be at least 1; [`WindowFunction::validate`] and `compute`
    /// reject 0
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self {
            column: column.into(),
            n,
        }
    }

    fn check(&self) -> Result<()> {
        if self.n == 0 {
            return Err(Error::invalid_argument(
                "NTH_VALUE position must be at least 1",
            ));
        }
        Ok(())
    }
}

impl WindowFunction for NthValueFunction {
    fn name(&self) -> &str {
        "nth_value"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "nth_value",
            FunctionType::Window,
            "Returns the value of the n-th row of the frame",
            FunctionSignature::new(2, 2),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn arguments(&self) -> Vec<String> {
        vec![self.column.clone(), self.n.to_string()]
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn uses_frame(&self) -> bool {
        true
    }

    fn validate(&self, _spec: &WindowSpec) -> Result<()> {
        self.check()
    }

    fn compute(&self, partition: &OrderedPartition<'_>, frame: &FrameSpec) -> Result<Column> {
        self.check()?;
        let source = partition.column(&self.column)?;
        let mut out = Column::nulls(self.name(), source.data_type(), partition.len());
        for pos in 0..partition.len() {
            let range = partition.frame_bounds(pos, Some(frame))?;
            let target = range.start.checked_add(self.n - 1);
            if let Some(target) = target.filter(|&t| t < range.end) {
                out.set(partition.slot_at(pos), &partition.value_at(source, target))?;
            }
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}
