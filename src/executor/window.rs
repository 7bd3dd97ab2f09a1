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

//! Window Function Execution
//!
//! One evaluation pass over a [`ColumnSet`]:
//!
//! 1. Bucket rows by their PARTITION BY key, in first-appearance order
//! 2. Order each partition and evaluate the function over it
//! 3. Scatter each partition's segment into a pre-sized output column
//!
//! Step 2 runs on rayon when [`ParallelConfig::should_parallelize`] holds.
//! Partitions own disjoint row indices, so the scatter needs no locking.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Column, ColumnAccessor, ColumnSet, Result, Value};
use crate::window::{FrameSpec, FrameUnit, Partition, WindowExpr};

use super::context::CancellationHandle;
use super::parallel::ParallelConfig;

/// Partition key - stack-allocated for up to 4 PARTITION BY columns
type PartitionKey = SmallVec<[Value; 4]>;

/// Evaluates window expressions over column sets
#[derive(Debug, Clone, Default)]
pub struct WindowExecutor {
    config: ParallelConfig,
    cancel: CancellationHandle,
}

impl WindowExecutor {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            cancel: CancellationHandle::new(),
        }
    }

    /// Observe a cancellation flag owned by the caller
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = CancellationHandle::from_flag(flag);
        self
    }

    pub fn with_cancellation(mut self, handle: CancellationHandle) -> Self {
        self.cancel = handle;
        self
    }

    /// Handle that cancels passes run by this executor
    pub fn cancellation_handle(&self) -> CancellationHandle {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Evaluate `expr` over every row of `columns`
    ///
    /// The result has one value per input row, at the row's original index,
    /// and is named after [`WindowExpr::display_name`].
    pub fn evaluate(&self, expr: &WindowExpr, columns: &ColumnSet) -> Result<Column> {
        expr.validate()?;
        self.cancel.check()?;

        let spec = expr.spec();
        let kind = expr.output_type(columns)?;
        let frame = spec.effective_frame();
        if frame.unit != FrameUnit::Rows && !spec.has_order_by() && expr.function().uses_frame() {
            warn!(
                "{} frame without ORDER BY in '{}'; using the whole partition",
                frame.unit, expr
            );
        }

        let rows = columns.num_rows();
        let partitions = partition_rows(columns, spec.partition_columns())?;
        let parallel = self.config.should_parallelize(rows, partitions.len());
        debug!(
            "window pass '{}': {} rows, {} partitions, {}",
            expr,
            rows,
            partitions.len(),
            if parallel { "parallel" } else { "sequential" }
        );

        let segments: Vec<(Vec<usize>, Column)> = if parallel {
            partitions
                .into_par_iter()
                .map(|indices| self.evaluate_partition(expr, &frame, columns, indices))
                .collect::<Result<_>>()?
        } else {
            partitions
                .into_iter()
                .map(|indices| self.evaluate_partition(expr, &frame, columns, indices))
                .collect::<Result<_>>()?
        };

        let mut out = Column::nulls(expr.display_name(), kind, rows);
        for (indices, segment) in &segments {
            out.scatter(segment, indices)?;
        }
        Ok(out)
    }

    /// Evaluate several expressions and append their results to `columns`
    pub fn evaluate_all(&self, exprs: &[WindowExpr], columns: &ColumnSet) -> Result<ColumnSet> {
        let mut out = columns.clone();
        for expr in exprs {
            let column = self.evaluate(expr, columns)?;
            out.add(Arc::new(column))?;
        }
        Ok(out)
    }

    fn evaluate_partition(
        &self,
        expr: &WindowExpr,
        frame: &FrameSpec,
        columns: &ColumnSet,
        indices: Vec<usize>,
    ) -> Result<(Vec<usize>, Column)> {
        self.cancel.check()?;
        let partition = Partition::new(columns, indices);
        let segment = {
            let ordered = partition
                .apply_order_with(expr.spec().order_clauses(), self.config.sort_threshold())?;
            expr.function().compute(&ordered, frame)?
        };
        Ok((partition.into_indices(), segment))
    }
}

/// Group row indices by their values in `partition_by`
///
/// Partitions come back in order of first appearance, each holding its rows
/// in original order. No PARTITION BY columns means one partition with every
/// row; an empty input means no partitions.
pub fn partition_rows(columns: &ColumnSet, partition_by: &[String]) -> Result<Vec<Vec<usize>>> {
    let rows = columns.num_rows();
    if rows == 0 {
        return Ok(Vec::new());
    }
    if partition_by.is_empty() {
        return Ok(vec![(0..rows).collect()]);
    }

    let keys = partition_by
        .iter()
        .map(|name| columns.column(name))
        .collect::<Result<SmallVec<[&dyn ColumnAccessor; 4]>>>()?;

    let mut slots: FxHashMap<PartitionKey, usize> = FxHashMap::default();
    let mut partitions: Vec<Vec<usize>> = Vec::new();
    for row in 0..rows {
        let key: PartitionKey = keys.iter().map(|col| col.get(row)).collect();
        let slot = *slots.entry(key).or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(row);
    }
    Ok(partitions)
}
