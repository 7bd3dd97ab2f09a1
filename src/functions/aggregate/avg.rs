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

//! AVG window aggregate

use crate::core::{Column, ColumnAccessor, DataType, Error, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

use super::{load, per_frame, NumericKind};

/// AVG window function
///
/// Always produces FLOAT64. The divisor is the number of rows in the frame,
/// NULL rows included; an empty frame averages to 0.
#[derive(Debug, Clone)]
pub struct AvgFunction {
    column: String,
}

impl AvgFunction {
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
        let averages = per_frame(partition, frame, |r| {
            if r.is_empty() {
                return Some(0.0);
            }
            let count = r.len() as f64;
            let sum: f64 = values[r].iter().flatten().map(|v| v.to_f64()).sum();
            Some(sum / count)
        })?;
        Ok(Column::float64(self.name(), averages))
    }
}

impl WindowFunction for AvgFunction {
    fn name(&self) -> &str {
        "avg"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "avg",
            FunctionType::Aggregate,
            "Returns the average of the values in the frame",
            FunctionSignature::new(1, 1),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Float64
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
            kind => Err(Error::unsupported_type("avg", &self.column, kind)),
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

    fn run(column: Column, frame: &FrameSpec) -> Result<Column> {
        let cols = ColumnSet::from_columns([column])?;
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::asc("v")])?;
        AvgFunction::new("v").compute(&view, frame)
    }

    #[test]
    fn test_avg_integers_produce_float() {
        let out = run(
            Column::from_i32s("v", &[1, 2, 3, 4]),
            &FrameSpec::rows_between(-1, 0),
        )
        .unwrap();
        assert_eq!(out.data_type(), DataType::Float64);
        assert_eq!(
            out.values(),
            vec![
                Value::float(1.0),
                Value::float(1.5),
                Value::float(2.5),
                Value::float(3.5)
            ]
        );
    }

    #[test]
    fn test_avg_divides_by_physical_rows() {
        // NULL sorts first: frames are [NULL], [NULL, 4], [4, 8]
        let out = run(
            Column::int64("v", vec![Some(4), None, Some(8)]),
            &FrameSpec::rows_between(-1, 0),
        )
        .unwrap();
        assert_eq!(
            out.values(),
            vec![Value::float(2.0), Value::float(0.0), Value::float(6.0)]
        );
    }

    #[test]
    fn test_avg_empty_frame_is_zero() {
        let out = run(
            Column::from_f64s("v", &[1.0, 2.0]),
            &FrameSpec::rows_between(1, 1),
        )
        .unwrap();
        assert_eq!(out.values(), vec![Value::float(2.0), Value::float(0.0)]);
    }

    #[test]
    fn test_avg_unsupported_type() {
        let err = run(
            Column::boolean("v", vec![Some(true)]),
            &FrameSpec::whole_partition(),
        )
        .unwrap_err();
        assert_eq!(err, Error::unsupported_type("avg", "v", DataType::Boolean));
    }
}
