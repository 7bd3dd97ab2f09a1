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

//! Parallel evaluation settings
//!
//! Partitions are independent, so a pass can hand each one to rayon's
//! work-stealing pool. Parallelism has overhead, so it is used only when:
//! - the input has 10,000+ rows and at least 2 partitions (partition fan-out)
//! - a single partition has 50,000+ rows (stable parallel sort)

pub const DEFAULT_PARALLEL_ROWS_THRESHOLD: usize = 10_000;
pub const DEFAULT_PARALLEL_PARTITIONS_THRESHOLD: usize = 2;
pub const DEFAULT_PARALLEL_SORT_THRESHOLD: usize = 50_000;

/// Configuration for parallel evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Whether parallel evaluation is enabled
    pub enabled: bool,
    /// Minimum input rows before partitions are evaluated in parallel
    pub min_rows_for_parallel: usize,
    /// Minimum partition count before partitions are evaluated in parallel
    pub min_partitions_for_parallel: usize,
    /// Minimum rows in one partition before it is sorted in parallel
    pub min_rows_for_parallel_sort: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_rows_for_parallel: DEFAULT_PARALLEL_ROWS_THRESHOLD,
            min_partitions_for_parallel: DEFAULT_PARALLEL_PARTITIONS_THRESHOLD,
            min_rows_for_parallel_sort: DEFAULT_PARALLEL_SORT_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    pub fn new(
        enabled: bool,
        min_rows_for_parallel: usize,
        min_partitions_for_parallel: usize,
        min_rows_for_parallel_sort: usize,
    ) -> Self {
        Self {
            enabled,
            min_rows_for_parallel,
            min_partitions_for_parallel,
            min_rows_for_parallel_sort,
        }
    }

    /// Create a config with parallel evaluation disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Whether `partitions` partitions holding `rows` rows in total should
    /// be evaluated in parallel
    #[inline]
    pub fn should_parallelize(&self, rows: usize, partitions: usize) -> bool {
        self.enabled
            && rows >= self.min_rows_for_parallel
            && partitions >= self.min_partitions_for_parallel
    }

    /// Row count at which a partition switches to the parallel sort;
    /// `usize::MAX` when disabled
    #[inline]
    pub fn sort_threshold(&self) -> usize {
        if self.enabled {
            self.min_rows_for_parallel_sort
        } else {
            usize::MAX
        }
    }
}
