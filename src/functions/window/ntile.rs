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

//! NTILE window function

use crate::core::{Column, DataType, Error, Result};
use crate::functions::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};
use crate::window::{FrameSpec, OrderedPartition, WindowSpec};

/// NTILE window function
///
/// Splits the sorted partition into `buckets` groups numbered from 1. When
/// the rows do not divide evenly the first `rows % buckets` groups get one
/// extra row.
#[derive(Debug, Clone)]
pub struct NtileFunction {
    buckets: usize,
}

impl NtileFunction {
    pub fn new(buckets: usize) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    fn check(&self) -> Result<()> {
        if self.buckets == 0 {
            return Err(Error::invalid_argument(
                "NTILE bucket count must be at least 1",
            ));
        }
        Ok(())
    }

    /// Bucket (1-based) of sorted position `pos` in a partition of `rows`
    fn bucket_of(&self, pos: usize, rows: usize) -> usize {
        let base = rows / self.buckets;
        let extra = rows % self.buckets;
        let large = extra * (base + 1);
        if pos < large {
            pos / (base + 1) + 1
        } else {
            // base > 0 here: pos < rows and every row past `large` sits in
            // a bucket of `base` rows
            extra + (pos - large) / base + 1
        }
    }
}

impl WindowFunction for NtileFunction {
    fn name(&self) -> &str {
        "ntile"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "ntile",
            FunctionType::Window,
            "Divides the partition into n ranked groups",
            FunctionSignature::new(1, 1),
        )
    }

    fn arguments(&self) -> Vec<String> {
        vec![self.buckets.to_string()]
    }

    fn result_type(&self, _input: DataType) -> DataType {
        DataType::Int64
    }

    fn validate(&self, _spec: &WindowSpec) -> Result<()> {
        self.check()
    }

    fn compute(&self, partition: &OrderedPartition<'_>, _frame: &FrameSpec) -> Result<Column> {
        self.check()?;
        let rows = partition.len();
        let mut tiles = vec![None; rows];
        for pos in 0..rows {
            tiles[partition.slot_at(pos)] = Some(self.bucket_of(pos, rows) as i64);
        }
        Ok(Column::int64(self.name(), tiles))
    }

    fn clone_box(&self) -> Box<dyn WindowFunction> {
        Box::new(self.clone())
    }
}
