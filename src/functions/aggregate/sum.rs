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

//! SUM window aggregate

use crate::core::{Column, ColumnAccessor, DataType, Error, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

use super::{load, per_frame, prefix_sums, sum_of, NumericKind};

/// SUM window function
///
/// Sums the non-NULL values of each row's frame. The result keeps the input
/// kind; integer sums wrap on overflow.
#[derive(Debug, Clone)]
pub struct SumFunction {
    column: String,
}

impl SumFunction {
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
        let sums = if T::EXACT_PREFIX {
            let prefix = prefix_sums(&values);
            per_frame(partition, frame, |r| Some(prefix[r.end].sub(prefix[r.start])))?
        } else {
            per_frame(partition, frame, |r| Some(sum_of(&values[r])))?
        };
        Ok(T::into_column(self.name(), sums))
    }
}

impl WindowFunction for SumFunction {
    fn name(&self) -> &str {
        "sum"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "sum",
            FunctionType::Aggregate,
            "Returns the sum of the non-NULL values in the frame",
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
            kind => Err(Error::unsupported_type("sum", &self.column, kind)),
        }
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnSet, Value};
    use crate::window::{OrderClause, Partition};

    fn run(column: Column, frame: &FrameSpec) -> Result<Vec<Value>> {
        let cols = ColumnSet::from_columns([column])?;
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::asc("v")])?;
        Ok(SumFunction::new("v").compute(&view, frame)?.values())
    }

    #[test]
    fn test_sum_sliding_rows() {
        let out = run(
            Column::from_i64s("v", &[1, 2, 3, 4, 5]),
            &FrameSpec::rows_between(-1, 1),
        )
        .unwrap();
        let expected: Vec<Value> = [3, 6, 9, 12, 9].into_iter().map(Value::integer).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_sum_keeps_int32_kind() {
        let cols = ColumnSet::from_columns([Column::from_i32s("v", &[1, 2])]).unwrap();
        let partition = Partition::whole(&cols);
        let view = partition.unordered();
        let out = SumFunction::new("v")
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(out.data_type(), DataType::Int32);
        assert_eq!(out.get(0), Value::integer(3));
    }

    #[test]
    fn test_sum_floats_skip_nulls() {
        let out = run(
            Column::float64("v", vec![Some(0.5), None, Some(1.25)]),
            &FrameSpec::whole_partition(),
        )
        .unwrap();
        assert_eq!(out, vec![Value::float(1.75); 3]);
    }

    #[test]
    fn test_sum_empty_frame_is_zero() {
        let out = run(
            Column::from_i64s("v", &[1, 2, 3]),
            &FrameSpec::rows_between(2, 3),
        )
        .unwrap();
        assert_eq!(out, vec![Value::integer(3), Value::integer(0), Value::integer(0)]);
    }

    #[test]
    fn test_sum_unsupported_type() {
        let err = run(
            Column::text("v", vec![Some("a")]),
            &FrameSpec::whole_partition(),
        )
        .unwrap_err();
        assert_eq!(err, Error::unsupported_type("sum", "v", DataType::Text));
    }

    #[test]
    fn test_sum_missing_column() {
        let cols = ColumnSet::from_columns([Column::from_i64s("v", &[1])]).unwrap();
        let partition = Partition::whole(&cols);
        let view = partition.unordered();
        let err = SumFunction::new("nope")
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
