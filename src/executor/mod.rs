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

//! Window evaluation passes
//!
//! - [`WindowExecutor`] - partitions, orders and evaluates a [`WindowExpr`]
//! - [`ParallelConfig`] - when to fan partitions out to rayon
//! - [`CancellationHandle`] - cooperative cancellation of a running pass
//!
//! [`WindowExpr`]: crate::window::WindowExpr

pub mod context;
pub mod parallel;
mod window;

pub use context::CancellationHandle;
pub use parallel::ParallelConfig;
pub use window::{partition_rows, WindowExecutor};
