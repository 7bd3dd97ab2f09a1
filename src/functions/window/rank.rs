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

//! RANK, DENSE_RANK, PERCENT_RANK and CUME_DIST window functions
//!
//! Ties are rows equal on every ORDER BY key. Without ORDER BY the whole
//! partition is one tie group.

use crate::core::{Column, DataType, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition};

/// Evaluate `f(group index, first position, one-past-last position)` once
/// per tie group and write the result to every member's slot
fn per_tie_group<R: Clone>(
    partition: &OrderedPartition<'_>,
    mut f: impl FnMut(usize, usize, usize) -> R,
) -> Vec<Option<R>> {
    let ties = partition.tie_groups();
    let mut out = vec![None; partition.len()];
    for group in 0..ties.count() {
        let range = ties.range(group);
        let value = f(group, range.start, range.end);
        for pos in range {
            out[partition.slot_at(pos)] = Some(value.clone());
        }
    }
    out
}

fn ranking_info(name: &str, description: &str) -> FunctionInfo {
    FunctionInfo::new(
        name,
        FunctionType::Window,
        description,
        FunctionSignature::new(0, 0),
    )
}

/// RANK window function
///
/// Tied rows share a rank and the next rank skips: 1, 1, 3.
#[derive(Debug, Clone, Default)]
pub struct RankFunction;

impl RankFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for RankFunction {
    fn name(&self) -> &str {
        "rank"
    }

    fn info(&self) -> FunctionInfo {
        ranking_info(
            "rank",
            "Returns the rank of the current row within the partition, with gaps for ties",
        )
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let ranks = per_tie_group(partition, |_, start, _| start as i64 + 1);
        Ok(Column::int64(self.name(), ranks))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// DENSE_RANK window function
///
/// Like RANK without gaps: 1, 1, 2.
#[derive(Debug, Clone, Default)]
pub struct DenseRankFunction;

impl DenseRankFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for DenseRankFunction {
    fn name(&self) -> &str {
        "dense_rank"
    }

    fn info(&self) -> FunctionInfo {
        ranking_info(
            "dense_rank",
            "Returns the rank of the current row within the partition, without gaps",
        )
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let ranks = per_tie_group(partition, |group, _, _| group as i64 + 1);
        Ok(Column::int64(self.name(), ranks))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// PERCENT_RANK window function
///
/// `(rank - 1) / (rows - 1)`, or 0 for a single-row partition.
#[derive(Debug, Clone, Default)]
pub struct PercentRankFunction;

impl PercentRankFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for PercentRankFunction {
    fn name(&self) -> &str {
        "percent_rank"
    }

    fn info(&self) -> FunctionInfo {
        ranking_info(
            "percent_rank",
            "Returns the relative rank of the current row: (rank - 1) / (rows - 1)",
        )
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Float64
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let n = partition.len();
        let ranks = per_tie_group(partition, |_, start, _| {
            if n <= 1 {
                0.0
            } else {
                start as f64 / (n - 1) as f64
            }
        });
        Ok(Column::float64(self.name(), ranks))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}

/// CUME_DIST window function
///
/// Fraction of the partition's rows that sort at or before the current
/// row, ties included.
#[derive(Debug, Clone, Default)]
pub struct CumeDistFunction;

impl CumeDistFunction {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFunction for CumeDistFunction {
    fn name(&self) -> &str {
        "cume_dist"
    }

    fn info(&self) -> FunctionInfo {
        ranking_info(
            "cume_dist",
            "Returns the cumulative distribution of the current row",
        )
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Float64
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        let n = partition.len() as f64;
        let dist = per_tie_group(partition, |_, _, end| end as f64 / n);
        Ok(Column::float64(self.name(), dist))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}
