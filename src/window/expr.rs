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

//! Window expressions: a function bound to a window specification

use std::fmt;

use crate::core::{Column, ColumnSet, DataType, Result};
use crate::executor::WindowExecutor;
use crate::functions::WindowFunction;

use super::spec::WindowSpec;

/// `function(args) OVER (spec) [AS alias]`
#[derive(Debug, Clone)]
pub struct WindowExpr {
    function: Box<dyn WindowFunction>,
    spec: WindowSpec,
    alias: Option<String>,
}

impl WindowExpr {
    pub fn new(function: Box<dyn WindowFunction>, spec: WindowSpec) -> Self {
        Self {
            function,
            spec,
            alias: None,
        }
    }

    /// Bind a concrete function without boxing it first
    pub fn over(function: impl WindowFunction + 'static, spec: WindowSpec) -> Self {
        Self::new(Box::new(function), spec)
    }

    /// Name the output column
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn function(&self) -> &dyn WindowFunction {
        self.function.as_ref()
    }

    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// The function call as written, `sum(amount)` or `row_number()`
    pub fn call(&self) -> String {
        format!("{}({})", self.function.name(), self.function.arguments().join(", "))
    }

    /// Output column name: the alias when set, else the function name
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.function.name())
    }

    /// SQL-like text of the whole expression
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Result kind for an input column of kind `input`
    pub fn result_type(&self, input: DataType) -> DataType {
        self.function.result_type(input)
    }

    /// Result kind against concrete input columns
    pub fn output_type(&self, columns: &ColumnSet) -> Result<DataType> {
        let input = match self.function.input_column() {
            Some(name) => columns.column(name)?.data_type(),
            None => DataType::Null,
        };
        Ok(self.result_type(input))
    }

    /// Check frame offsets and function arguments
    pub fn validate(&self) -> Result<()> {
        self.spec.validate()?;
        self.function.validate(&self.spec)
    }

    /// Evaluate with a default [`WindowExecutor`]
    pub fn evaluate(&self, columns: &ColumnSet) -> Result<Column> {
        WindowExecutor::default().evaluate(self, columns)
    }
}

impl fmt::Display for WindowExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} OVER ({})", self.call(), self.spec)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}
