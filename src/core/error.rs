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

//! Error types for winframe
//!
//! Only conditions the caller must react to are errors. An inverted frame
//! (end before start) is clamped to an empty window and a RANGE/GROUPS frame
//! without ORDER BY degrades to the whole partition; neither shows up here.

use thiserror::Error;

use super::types::DataType;

/// Result type alias for winframe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for window evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Column errors
    // =========================================================================
    /// A function or ORDER BY clause references a column the partition does not have
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Two columns with the same name were added to a column set
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Columns of a column set must all have the same length
    #[error("column '{column}' has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    // =========================================================================
    // Type errors
    // =========================================================================
    /// A function has no kernel for the column's kind
    #[error("{function} does not support column '{column}' of type {kind}")]
    UnsupportedType {
        function: String,
        column: String,
        kind: DataType,
    },

    /// RANGE offset arithmetic on a non-numeric ORDER BY value
    #[error("RANGE offset requires a numeric ORDER BY value, got {kind}")]
    NonNumericOffset { kind: DataType },

    /// A value cannot be stored in a column of the target kind
    #[error("type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: DataType, to: DataType },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Invalid argument for a function or frame
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Evaluation was cancelled through the executor's cancel flag
    #[error("query cancelled")]
    QueryCancelled,
}

impl Error {
    /// Create a new UnsupportedType error
    pub fn unsupported_type(
        function: impl Into<String>,
        column: impl Into<String>,
        kind: DataType,
    ) -> Self {
        Error::UnsupportedType {
            function: function.into(),
            column: column.into(),
            kind,
        }
    }

    /// Create a new ColumnLengthMismatch error
    pub fn column_length_mismatch(column: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ColumnLengthMismatch {
            column: column.into(),
            expected,
            got,
        }
    }

    /// Create a new TypeConversion error
    pub fn type_conversion(from: DataType, to: DataType) -> Self {
        Error::TypeConversion { from, to }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ColumnNotFound(_))
    }

    /// Check if this error comes from a value or column kind mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType { .. }
                | Error::NonNumericOffset { .. }
                | Error::TypeConversion { .. }
        )
    }
}
