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

//! Columns consumed and produced by window evaluation
//!
//! - [`ColumnAccessor`]: read-only view over one column, the only thing the
//!   engine needs from its input
//! - [`Column`]: concrete typed nullable column, used for results
//! - [`ColumnSet`]: ordered name to column map with an equal-length invariant

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::error::{Error, Result};
use super::types::DataType;
use super::value::Value;

/// Read-only access to one column
pub trait ColumnAccessor: Send + Sync {
    /// Column name
    fn name(&self) -> &str;

    /// Value at `row`, `Value::Null` when the cell is null or out of range
    fn get(&self, row: usize) -> Value;

    /// Whether the cell at `row` is null
    fn is_null(&self, row: usize) -> bool;

    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared kind, used to pick a numeric kernel
    fn data_type(&self) -> DataType;
}

/// Typed storage behind a [`Column`]
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int32(Vec<Option<i32>>),
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Text(Vec<Option<Arc<str>>>),
    Boolean(Vec<Option<bool>>),
}

/// A named, typed, nullable column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn int32(name: impl Into<String>, values: Vec<Option<i32>>) -> Self {
        Self::new(name, ColumnData::Int32(values))
    }

    pub fn int64(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int64(values))
    }

    pub fn float64(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float64(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values))
    }

    pub fn text<S: AsRef<str>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let data = values
            .into_iter()
            .map(|v| v.map(|s| Arc::from(s.as_ref())))
            .collect();
        Self::new(name, ColumnData::Text(data))
    }

    /// Int32 column without nulls
    pub fn from_i32s(name: impl Into<String>, values: &[i32]) -> Self {
        Self::int32(name, values.iter().copied().map(Some).collect())
    }

    /// Int64 column without nulls
    pub fn from_i64s(name: impl Into<String>, values: &[i64]) -> Self {
        Self::int64(name, values.iter().copied().map(Some).collect())
    }

    /// Float64 column without nulls
    pub fn from_f64s(name: impl Into<String>, values: &[f64]) -> Self {
        Self::float64(name, values.iter().copied().map(Some).collect())
    }

    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// All-null column of `kind`
    ///
    /// `DataType::Null` has no storage of its own and falls back to Int64.
    pub fn nulls(name: impl Into<String>, kind: DataType, len: usize) -> Self {
        let data = match kind {
            DataType::Int32 => ColumnData::Int32(vec![None; len]),
            DataType::Float64 => ColumnData::Float64(vec![None; len]),
            DataType::Text => ColumnData::Text(vec![None; len]),
            DataType::Boolean => ColumnData::Boolean(vec![None; len]),
            DataType::Int64 | DataType::Null => ColumnData::Int64(vec![None; len]),
        };
        Self::new(name, data)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// All cells as values, in row order
    pub fn values(&self) -> Vec<Value> {
        (0..self.len()).map(|row| self.get(row)).collect()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Store `value` at `row`
    ///
    /// Integers fit any numeric kind (Int32 only within range); floats only
    /// Float64. NULL fits everywhere.
    pub fn set(&mut self, row: usize, value: &Value) -> Result<()> {
        let len = self.len();
        if row >= len {
            return Err(Error::invalid_argument(format!(
                "row {} out of range for column '{}' with {} rows",
                row, self.name, len
            )));
        }
        let target = self.data_type();
        let mismatch = || Error::type_conversion(value.data_type(), target);

        match (&mut self.data, value) {
            (ColumnData::Int32(v), Value::Null) => v[row] = None,
            (ColumnData::Int64(v), Value::Null) => v[row] = None,
            (ColumnData::Float64(v), Value::Null) => v[row] = None,
            (ColumnData::Text(v), Value::Null) => v[row] = None,
            (ColumnData::Boolean(v), Value::Null) => v[row] = None,

            (ColumnData::Int32(v), Value::Integer(i)) => {
                v[row] = Some(i32::try_from(*i).map_err(|_| mismatch())?)
            }
            (ColumnData::Int64(v), Value::Integer(i)) => v[row] = Some(*i),
            (ColumnData::Float64(v), Value::Integer(i)) => v[row] = Some(*i as f64),
            (ColumnData::Float64(v), Value::Float(f)) => v[row] = Some(*f),
            (ColumnData::Text(v), Value::Text(s)) => v[row] = Some(s.clone()),
            (ColumnData::Boolean(v), Value::Boolean(b)) => v[row] = Some(*b),

            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Write `segment[k]` to row `targets[k]` for every k
    pub fn scatter(&mut self, segment: &Column, targets: &[usize]) -> Result<()> {
        if segment.len() != targets.len() {
            return Err(Error::column_length_mismatch(
                segment.name(),
                targets.len(),
                segment.len(),
            ));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= self.len()) {
            return Err(Error::invalid_argument(format!(
                "scatter target {} out of range for column '{}' with {} rows",
                bad,
                self.name,
                self.len()
            )));
        }

        match (&mut self.data, &segment.data) {
            (ColumnData::Int32(dst), ColumnData::Int32(src)) => copy_to(dst, src, targets),
            (ColumnData::Int64(dst), ColumnData::Int64(src)) => copy_to(dst, src, targets),
            (ColumnData::Float64(dst), ColumnData::Float64(src)) => copy_to(dst, src, targets),
            (ColumnData::Text(dst), ColumnData::Text(src)) => copy_to(dst, src, targets),
            (ColumnData::Boolean(dst), ColumnData::Boolean(src)) => copy_to(dst, src, targets),
            _ => {
                for (k, &target) in targets.iter().enumerate() {
                    self.set(target, &segment.get(k))?;
                }
            }
        }
        Ok(())
    }
}

fn copy_to<T: Clone>(dst: &mut [Option<T>], src: &[Option<T>], targets: &[usize]) {
    for (value, &target) in src.iter().zip(targets) {
        dst[target] = value.clone();
    }
}

impl ColumnAccessor for Column {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, row: usize) -> Value {
        let value = match &self.data {
            ColumnData::Int32(v) => v.get(row).copied().flatten().map(|x| Value::Integer(x as i64)),
            ColumnData::Int64(v) => v.get(row).copied().flatten().map(Value::Integer),
            ColumnData::Float64(v) => v.get(row).copied().flatten().map(Value::Float),
            ColumnData::Text(v) => v.get(row).cloned().flatten().map(Value::Text),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(Value::Boolean),
        };
        value.unwrap_or(Value::Null)
    }

    fn is_null(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Int32(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Int64(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Float64(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Text(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Boolean(v) => !matches!(v.get(row), Some(Some(_))),
        }
    }

    fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    fn data_type(&self) -> DataType {
        match &self.data {
            ColumnData::Int32(_) => DataType::Int32,
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::Float64(_) => DataType::Float64,
            ColumnData::Text(_) => DataType::Text,
            ColumnData::Boolean(_) => DataType::Boolean,
        }
    }
}

/// Named columns of equal length
#[derive(Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Arc<dyn ColumnAccessor>>,
    index: FxHashMap<String, usize>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from concrete columns
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Result<Self> {
        let mut set = Self::new();
        for column in columns {
            set.add(Arc::new(column))?;
        }
        Ok(set)
    }

    /// Builder form of [`ColumnSet::add`]
    pub fn with_column(mut self, column: impl ColumnAccessor + 'static) -> Result<Self> {
        self.add(Arc::new(column))?;
        Ok(self)
    }

    /// Add a column; names must be unique and lengths equal
    pub fn add(&mut self, column: Arc<dyn ColumnAccessor>) -> Result<()> {
        if self.index.contains_key(column.name()) {
            return Err(Error::DuplicateColumn(column.name().to_string()));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(Error::column_length_mismatch(
                    column.name(),
                    first.len(),
                    column.len(),
                ));
            }
        }
        self.index
            .insert(column.name().to_string(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&dyn ColumnAccessor> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].as_ref())
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ColumnAccessor> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// Row count shared by every column, 0 for an empty set
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Debug for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.names().collect::<Vec<_>>())
            .field("rows", &self.num_rows())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_access() {
        let col = Column::int64("v", vec![Some(1), None, Some(3)]);
        assert_eq!(col.name(), "v");
        assert_eq!(col.len(), 3);
        assert_eq!(col.data_type(), DataType::Int64);
        assert_eq!(col.get(0), Value::integer(1));
        assert_eq!(col.get(1), Value::Null);
        assert!(col.is_null(1));
        assert!(!col.is_null(2));
        // out of range reads as null
        assert_eq!(col.get(10), Value::Null);
        assert!(col.is_null(10));
    }

    #[test]
    fn test_text_column() {
        let col = Column::text("name", vec![Some("a"), None]);
        assert_eq!(col.data_type(), DataType::Text);
        assert_eq!(col.get(0), Value::text("a"));
        assert!(col.is_null(1));
    }

    #[test]
    fn test_set_coerces_integers() {
        let mut col = Column::nulls("out", DataType::Float64, 2);
        col.set(0, &Value::integer(4)).unwrap();
        assert_eq!(col.get(0), Value::float(4.0));

        let mut col = Column::nulls("out", DataType::Int32, 1);
        col.set(0, &Value::integer(-7)).unwrap();
        assert_eq!(col.get(0), Value::integer(-7));

        let err = col.set(0, &Value::integer(i64::MAX)).unwrap_err();
        assert_eq!(err, Error::type_conversion(DataType::Int64, DataType::Int32));
    }

    #[test]
    fn test_set_rejects_mismatched_kind() {
        let mut col = Column::nulls("out", DataType::Int64, 1);
        let err = col.set(0, &Value::text("x")).unwrap_err();
        assert_eq!(err, Error::type_conversion(DataType::Text, DataType::Int64));

        let err = col.set(0, &Value::float(1.5)).unwrap_err();
        assert!(err.is_type_error());

        assert!(col.set(5, &Value::integer(1)).is_err());
    }

    #[test]
    fn test_scatter() {
        let mut out = Column::nulls("out", DataType::Int64, 5);
        let segment = Column::from_i64s("seg", &[10, 20]);
        out.scatter(&segment, &[4, 1]).unwrap();
        assert_eq!(
            out.values(),
            vec![
                Value::Null,
                Value::integer(20),
                Value::Null,
                Value::Null,
                Value::integer(10)
            ]
        );
    }

    #[test]
    fn test_scatter_coerces_across_kinds() {
        let mut out = Column::nulls("out", DataType::Float64, 2);
        let segment = Column::from_i32s("seg", &[3]);
        out.scatter(&segment, &[1]).unwrap();
        assert_eq!(out.get(1), Value::float(3.0));

        assert!(out.scatter(&segment, &[0, 1]).is_err());
        assert!(out.scatter(&segment, &[9]).is_err());
    }

    #[test]
    fn test_column_set() {
        let set = ColumnSet::from_columns([
            Column::from_i64s("a", &[1, 2]),
            Column::text("b", vec![Some("x"), Some("y")]),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.num_rows(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(set.column("b").unwrap().get(1), Value::text("y"));

        let err = set.column("c").err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_column_set_invariants() {
        let err = ColumnSet::from_columns([
            Column::from_i64s("a", &[1, 2]),
            Column::from_i64s("a", &[3, 4]),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("a".to_string()));

        let err = ColumnSet::new()
            .with_column(Column::from_i64s("a", &[1, 2]))
            .and_then(|s| s.with_column(Column::from_f64s("b", &[1.0])))
            .unwrap_err();
        assert_eq!(err, Error::column_length_mismatch("b", 2, 1));
    }
}
