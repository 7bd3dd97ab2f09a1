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

//! Window function library
//!
//! - [`aggregate`] - SUM, AVG, MIN, MAX, COUNT evaluated over frames
//! - [`window`] - offset (LAG, LEAD, FIRST_VALUE, ...) and ranking functions
//! - [`FunctionRegistry`] - name to factory lookup
//!
//! Every function implements [`WindowFunction`] and is evaluated one
//! partition at a time.

pub mod aggregate;
pub mod registry;
pub mod window;

use crate::core::{Column, DataType, Error, Result};
use crate::window::{FrameSpec, OrderedPartition, WindowSpec};

/// Function type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionType {
    /// Aggregate evaluated over each row's frame
    Aggregate,
    /// Offset or ranking function
    Window,
}

/// Accepted argument counts of a registry factory
///
/// Argument kinds are checked by each factory, since a column name and a
/// literal offset both arrive as [`Value`](crate::core::Value)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Minimum number of arguments
    pub min_args: usize,
    /// Maximum number of arguments
    pub max_args: usize,
}

impl FunctionSignature {
    pub fn new(min_args: usize, max_args: usize) -> Self {
        Self { min_args, max_args }
    }

    /// Validate argument count
    pub fn validate_arg_count(&self, count: usize) -> Result<()> {
        if count < self.min_args {
            return Err(Error::invalid_argument(format!(
                "expected at least {} arguments, got {}",
                self.min_args, count
            )));
        }
        if count > self.max_args {
            return Err(Error::invalid_argument(format!(
                "expected at most {} arguments, got {}",
                self.max_args, count
            )));
        }
        Ok(())
    }
}

/// Function information
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub function_type: FunctionType,
    pub description: String,
    pub signature: FunctionSignature,
}

impl FunctionInfo {
    pub fn new(
        name: impl Into<String>,
        function_type: FunctionType,
        description: impl Into<String>,
        signature: FunctionSignature,
    ) -> Self {
        Self {
            name: name.into(),
            function_type,
            description: description.into(),
            signature,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function_type(&self) -> FunctionType {
        self.function_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }
}

/// A function evaluated over window partitions
///
/// `compute` returns one cell per partition row, laid out like the
/// partition's own index list: cell `partition.slot_at(i)` holds the result
/// for logical position `i`. The executor scatters those cells back to the
/// original row indices.
pub trait WindowFunction: Send + Sync {
    /// Lower-case function name, as rendered
    fn name(&self) -> &str;

    /// Get function information
    fn info(&self) -> FunctionInfo;

    /// Column the function reads, if any
    fn input_column(&self) -> Option<&str> {
        None
    }

    /// Arguments as rendered between the parentheses
    fn arguments(&self) -> Vec<String> {
        self.input_column().map(|c| vec![c.to_string()]).unwrap_or_default()
    }

    /// Result kind for an input column of kind `input`
    ///
    /// `input` is `DataType::Null` for functions without an input column.
    fn result_type(&self, input: DataType) -> DataType;

    /// Whether evaluation depends on the frame clause
    fn uses_frame(&self) -> bool {
        false
    }

    /// Check the function against the window it is bound to
    fn validate(&self, _spec: &WindowSpec) -> Result<()> {
        Ok(())
    }

    /// Evaluate over one ordered partition with the resolved frame
    fn compute(&self, partition: &OrderedPartition<'_>, frame: &FrameSpec) -> Result<Column>;

    /// Clone the function into a new instance
    fn clone_box(&self) -> Box<dyn WindowFunction>;
}

impl Clone for Box<dyn WindowFunction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn WindowFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.arguments().join(", "))
    }
}

// Re-export main types
pub use aggregate::{
    AvgFunction, CountAllFunction, CountFunction, MaxFunction, MinFunction, SumFunction,
};
pub use registry::{global_registry, FunctionRegistry};
pub use window::{
    CumeDistFunction, DenseRankFunction, FirstValueFunction, LagFunction, LastValueFunction,
    LeadFunction, NthValueFunction, NtileFunction, PercentRankFunction, RankFunction,
    RowNumberFunction,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_signature_validation() {
        let sig = FunctionSignature::new(1, 1);
        assert!(sig.validate_arg_count(1).is_ok());
        assert!(sig.validate_arg_count(0).is_err());
        assert!(sig.validate_arg_count(2).is_err());
    }

    #[test]
    fn test_function_info() {
        let info = SumFunction::new("amount").info();
        assert_eq!(info.name(), "sum");
        assert_eq!(info.function_type(), FunctionType::Aggregate);
        assert_eq!(info.signature().min_args, 1);
    }

    #[test]
    fn test_boxed_clone_and_debug() {
        let f: Box<dyn WindowFunction> = Box::new(LagFunction::new("price", 2, 0.into()));
        let g = f.clone();
        assert_eq!(g.name(), "lag");
        assert_eq!(format!("{:?}", g), "lag(price, 2, 0)");
    }
}
