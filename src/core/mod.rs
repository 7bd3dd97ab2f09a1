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

//! Core types and definitions
//!
//! - [`DataType`] - column kinds (INT32, INT64, FLOAT64, TEXT, BOOLEAN)
//! - [`Value`] - dynamically typed cell value with a NULL-first total order
//! - [`ColumnAccessor`] - read-only column view consumed by the engine
//! - [`Column`] / [`ColumnSet`] - concrete columns and named column maps
//! - [`Error`] - error type for every fallible operation

pub mod column;
pub mod error;
pub mod types;
pub mod value;

pub use column::{Column, ColumnAccessor, ColumnData, ColumnSet};
pub use error::{Error, Result};
pub use types::DataType;
pub use value::Value;
