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

//! LEAD and LAG window functions

use crate::core::{Column, DataType, Result, Value};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

fn offset_signature() -> FunctionSignature {
    FunctionSignature::new(1, 3)
}

/// Copy `column` shifted by `target(pos)`, falling back to `default`
///
/// The result keeps the column's kind; a default that does not fit that
/// kind fails with `TypeConversion` the first time it is needed.
fn shifted(
    name: &str,
    column: &str,
    partition: &OrderedPartition<'_>,
    default: &Value,
    target: impl Fn(usize) -> Option<usize>,
) -> Result<Column> {
    let source = partition.column(column)?;
    let size = partition.len();
    let mut out = Column::nulls(name, source.data_type(), size);
    for pos in 0..size {
        let value = match target(pos).filter(|&t| t < size) {
            Some(t) => partition.value_at(source, t),
            None => default.clone(),
        };
        out.set(partition.slot_at(pos), &value)?;
    }
    Ok(out)
}

/// LEAD window function
///
/// Value `offset` rows after the current row in sort order, or `default`
/// past the end of the partition.
#[derive(Debug, Clone)]
pub struct LeadFunction {
    column: String,
    offset: usize,
    default_value: Value,
}

impl LeadFunction {
    pub fn new(column: impl Into<String>, offset: usize, default_value: Value) -> Self {
        Self {
            column: column.into(),
            offset,
            default_value,
        }
    }

    /// LEAD(column) with offset 1 and a NULL default
    pub fn next(column: impl Into<String>) -> Self {
        Self::new(column, 1, Value::Null)
    }
}

impl WindowFunction for LeadFunction {
    fn name(&self) -> &str {
        "lead"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "lead",
            FunctionType::Window,
            "Returns the value from a row that is offset rows after the current row",
            offset_signature(),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn arguments(&self) -> Vec<String> {
        vec![
            self.column.clone(),
            self.offset.to_string(),
            self.default_value.to_string(),
        ]
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        shifted(
            self.name(),
            &self.column,
            partition,
            &self.default_value,
            |pos| pos.checked_add(self.offset),
        )
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// LAG window function
///
/// Value `offset` rows before the current row in sort order, or `default`
/// before the start of the partition.
#[derive(Debug, Clone)]
pub struct LagFunction {
    column: String,
    offset: usize,
    default_value: Value,
}

impl LagFunction {
    pub fn new(column: impl Into<String>, offset: usize, default_value: Value) -> Self {
        Self {
            column: column.into(),
            offset,
            default_value,
        }
    }

    /// LAG(column) with offset 1 and a NULL default
    pub fn previous(column: impl Into<String>) -> Self {
        Self::new(column, 1, Value::Null)
    }
}

impl WindowFunction for LagFunction {
    fn name(&self) -> &str {
        "lag"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "lag",
            FunctionType::Window,
            "Returns the value from a row that is offset rows before the current row",
            offset_signature(),
        )
    }

    fn input_column(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn arguments(&self) -> Vec<String> {
        vec![
            self.column.clone(),
            self.offset.to_string(),
            self.default_value.to_string(),
        ]
    }

    fn result_type(&self, input: DataType) -> DataType {
        input
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        shifted(
            self.name(),
            &self.column,
            partition,
            &self.default_value,
            |pos| pos.checked_sub(self.offset),
        )
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnSet, Error};
    use crate::window::{OrderClause, Partition};

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::integer(v)).collect()
    }

    fn prices() -> ColumnSet {
        ColumnSet::from_columns([
            Column::from_i64s("price", &[30, 10, 40, 20]),
            Column::from_i64s("ts", &[3, 1, 4, 2]),
        ])
        .unwrap()
    }

    #[test]
    fn test_lag_with_default() {
        let cols = ColumnSet::from_columns([Column::from_i64s("v", &[10, 20, 30, 40])]).unwrap();
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::asc("v")]).unwrap();
        let out = LagFunction::new("v", 1, Value::integer(-1))
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(out.values(), ints(&[-1, 10, 20, 30]));
    }

    #[test]
    fn test_lead_writes_original_positions() {
        let cols = prices();
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::asc("ts")]).unwrap();
        // sorted prices: 10, 20, 30, 40
        let out = LeadFunction::next("price")
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(
            out.values(),
            vec![
                Value::integer(40),
                Value::integer(20),
                Value::Null,
                Value::integer(30)
            ]
        );
    }

    #[test]
    fn test_lag_large_offset_is_all_default() {
        let cols = prices();
        let partition = Partition::whole(&cols);
        let view = partition.apply_order(&[OrderClause::asc("ts")]).unwrap();
        let out = LagFunction::new("price", 10, Value::integer(0))
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(out.values(), ints(&[0, 0, 0, 0]));

        let out = LeadFunction::new("price", usize::MAX, Value::integer(7))
            .compute(&view, &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(out.values(), ints(&[7, 7, 7, 7]));
    }

    #[test]
    fn test_lag_unordered_uses_arrival_order() {
        let cols = prices();
        let partition = Partition::whole(&cols);
        let out = LagFunction::previous("price")
            .compute(&partition.unordered(), &FrameSpec::whole_partition())
            .unwrap();
        assert_eq!(
            out.values(),
            vec![
                Value::Null,
                Value::integer(30),
                Value::integer(10),
                Value::integer(40)
            ]
        );
    }

    #[test]
    fn test_default_must_fit_column_kind() {
        let cols = prices();
        let partition = Partition::whole(&cols);
        let err = LagFunction::new("price", 1, Value::text("none"))
            .compute(&partition.unordered(), &FrameSpec::whole_partition())
            .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_missing_column() {
        let cols = prices();
        let partition = Partition::whole(&cols);
        let err = LeadFunction::next("nope")
            .compute(&partition.unordered(), &FrameSpec::whole_partition())
            .unwrap_err();
        assert_eq!(err, Error::ColumnNotFound("nope".to_string()));
    }
}
