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

//! ROW_NUMBER window function

use crate::core::{Column, DataType, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

/// ROW_NUMBER window function
///
/// 1-based sorted position of each row within its partition.
#[derive(Debug, Clone, Default)]
pub struct RowNumberFunction;

impl RowNumberFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for RowNumberFunction {
    fn name(&self) -> &str {
        "row_number"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "row_number",
            FunctionType::Window,
            "Returns the sequential number of a row within its partition",
            FunctionSignature::new(0, 0),
        )
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let mut numbers = vec![None; partition.len()];
        for pos in 0..partition.len() {
            numbers[partition.slot_at(pos)] = Some(pos as i64 + 1);
        }
        Ok(Column::int64(self.name(), numbers))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnAccessor, ColumnSet, Value};
    use crate::window::{OrderClause, Partition};

    #[test]
    fn test_row_number_follows_sort_order() {
        let cols = ColumnSet::from_columns([Column::from_f64s("score", &[2.5, 9.0, 1.0])]).unwrap();
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::desc("score")]).unwrap();
        let out = RowNumberFunction::new()
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(
            out.values(),
            vec![Value::integer(2), Value::integer(1), Value::integer(3)]
        );
    }

    #[test]
    fn test_row_number_empty_partition() {
        let cols = ColumnSet::from_columns([Column::from_i64s("v", &[1, 2])]).unwrap();
        let partition = Partition::new(&cols, Vec::new());
        let out = RowNumberFunction::new()
            .compute(&partition.unordered(), &FrameSpec::whole_partition())
            .unwrap();
        assert!(out.is_empty());
    }
}
