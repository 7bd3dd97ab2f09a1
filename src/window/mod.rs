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

//! Window model
//!
//! - [`spec`] - PARTITION BY / ORDER BY / frame clauses
//! - [`partition`] - raw partitions and their immutable ordered views
//! - [`frame`] - ROWS, RANGE and GROUPS frame resolution
//! - [`expr`] - a function bound to a window specification

pub mod expr;
pub mod frame;
pub mod partition;
pub mod spec;

pub use expr::WindowExpr;
pub use partition::{OrderedPartition, Partition, PeerGroups};
pub use spec::{FrameBound, FrameOffset, FrameSpec, FrameUnit, OrderClause, WindowSpec};
