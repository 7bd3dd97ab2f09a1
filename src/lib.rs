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

//! # Winframe - SQL window functions over in-memory columns
//!
//! Winframe evaluates SQL window expressions (`func(args) OVER (...)`) over
//! columnar data: PARTITION BY bucketing, multi-key ORDER BY, and ROWS,
//! RANGE and GROUPS frames, with partitions evaluated in parallel on rayon.
//!
//! ## Quick Start
//!
//! ```rust
//! use winframe::{Column, ColumnSet, SumFunction, Value, WindowExpr, WindowSpec};
//!
//! let columns = ColumnSet::from_columns([
//!     Column::from_i64s("ts", &[1, 2, 3, 4, 5]),
//!     Column::from_i64s("amount", &[1, 2, 3, 4, 5]),
//! ])
//! .unwrap();
//!
//! let expr = WindowExpr::over(
//!     SumFunction::new("amount"),
//!     WindowSpec::new().order_by_asc("ts").rows_between(-1, 1),
//! )
//! .alias("moving");
//!
//! let out = expr.evaluate(&columns).unwrap();
//! assert_eq!(out.values()[1], Value::integer(6));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Column`], [`ColumnSet`], [`Error`])
//! - [`window`] - Window specifications, partitions and frame resolution
//! - [`functions`] - Aggregate, offset and ranking functions plus the registry
//! - [`executor`] - Evaluation passes with parallel partition processing

pub mod core;
pub mod executor;
pub mod functions;
pub mod window;

// Re-export main types for convenience
pub use core::{Column, ColumnAccessor, ColumnData, ColumnSet, DataType, Error, Result, Value};

// Re-export window model types
pub use window::{
    FrameBound, FrameOffset, FrameSpec, FrameUnit, OrderClause, OrderedPartition, Partition,
    PeerGroups, WindowExpr, WindowSpec,
};

// Re-export function types
pub use functions::{
    global_registry, FunctionInfo, FunctionRegistry, FunctionSignature, FunctionType,
    WindowFunction,
};

// Re-export specific function implementations
pub use functions::{
    AvgFunction, CountAllFunction, CountFunction, CumeDistFunction, DenseRankFunction,
    FirstValueFunction, LagFunction, LastValueFunction, LeadFunction, MaxFunction, MinFunction,
    NthValueFunction, NtileFunction, PercentRankFunction, RankFunction, RowNumberFunction,
    SumFunction,
};

// Re-export executor types
pub use executor::{CancellationHandle, ParallelConfig, WindowExecutor};
