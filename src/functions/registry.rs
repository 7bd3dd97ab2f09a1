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

//! Function Registry
//!
//! Maps case-insensitive function names to factories that build a
//! [`WindowFunction`] from literal arguments. Column arguments are passed as
//! `Value::Text`, counts and offsets as `Value::Integer`.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Value};

use super::aggregate::{
    AvgFunction, CountAllFunction, CountFunction, MaxFunction, MinFunction, SumFunction,
};
use super::window::{
    CumeDistFunction, DenseRankFunction, FirstValueFunction, LagFunction, LastValueFunction,
    LeadFunction, NthValueFunction, NtileFunction, PercentRankFunction, RankFunction,
    RowNumberFunction,
};
use super::{FunctionInfo, FunctionSignature, FunctionType, WindowFunction};

/// Global function registry instance
static GLOBAL_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Get the global function registry
#[inline]
pub fn global_registry() -> &'static FunctionRegistry {
    GLOBAL_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Builds a function from its literal arguments
pub type WindowFnFactory =
    Arc<dyn Fn(&[Value]) -> Result<Box<dyn WindowFunction>> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    info: FunctionInfo,
    factory: WindowFnFactory,
}

/// Name to factory registry for window functions
pub struct FunctionRegistry {
    functions: RwLock<FxHashMap<String, Entry>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a registry with every built-in function registered
    pub fn new() -> Self {
        let registry = Self::empty();

        // Aggregates
        registry.register_column_function(SumFunction::new("x").info(), SumFunction::new);
        registry.register_column_function(AvgFunction::new("x").info(), AvgFunction::new);
        registry.register_column_function(MinFunction::new("x").info(), MinFunction::new);
        registry.register_column_function(MaxFunction::new("x").info(), MaxFunction::new);
        registry.register(
            FunctionInfo::new(
                "count",
                FunctionType::Aggregate,
                "Returns the number of rows, or of non-NULL values of a column, in the frame",
                FunctionSignature::new(0, 1),
            ),
            |args| match args.first() {
                None => Ok(Box::new(CountAllFunction::new())),
                Some(Value::Text(s)) if &**s == "*" => Ok(Box::new(CountAllFunction::new())),
                Some(_) => Ok(Box::new(CountFunction::new(column_arg("count", args, 0)?))),
            },
        );

        // Offset and value functions
        registry.register(LagFunction::previous("x").info(), |args| {
            Ok(Box::new(LagFunction::new(
                column_arg("lag", args, 0)?,
                count_arg("lag", args, 1, 1)?,
                args.get(2).cloned().unwrap_or_default(),
            )))
        });
        registry.register(LeadFunction::next("x").info(), |args| {
            Ok(Box::new(LeadFunction::new(
                column_arg("lead", args, 0)?,
                count_arg("lead", args, 1, 1)?,
                args.get(2).cloned().unwrap_or_default(),
            )))
        });
        registry.register_column_function(
            FirstValueFunction::new("x").info(),
            FirstValueFunction::new,
        );
        registry.register_column_function(
            LastValueFunction::new("x").info(),
            LastValueFunction::new,
        );
        registry.register(NthValueFunction::new("x", 1).info(), |args| {
            let column = column_arg("nth_value", args, 0)?;
            let n = count_arg("nth_value", args, 1, 0)?;
            if n == 0 {
                return Err(Error::invalid_argument(
                    "NTH_VALUE position must be at least 1",
                ));
            }
            Ok(Box::new(NthValueFunction::new(column, n)))
        });

        // Ranking
        registry.register(RowNumberFunction::new().info(), |_| {
            Ok(Box::new(RowNumberFunction::new()))
        });
        registry.register(RankFunction::new().info(), |_| Ok(Box::new(RankFunction::new())));
        registry.register(DenseRankFunction::new().info(), |_| {
            Ok(Box::new(DenseRankFunction::new()))
        });
        registry.register(PercentRankFunction::new().info(), |_| {
            Ok(Box::new(PercentRankFunction::new()))
        });
        registry.register(CumeDistFunction::new().info(), |_| {
            Ok(Box::new(CumeDistFunction::new()))
        });
        registry.register(NtileFunction::new(1).info(), |args| {
            let buckets = count_arg("ntile", args, 0, 0)?;
            if buckets == 0 {
                return Err(Error::invalid_argument(
                    "NTILE bucket count must be at least 1",
                ));
            }
            Ok(Box::new(NtileFunction::new(buckets)))
        });

        registry
    }

    /// Registry with nothing registered
    pub fn empty() -> Self {
        Self {
            functions: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register (or replace) a function under `info.name`
    pub fn register<F>(&self, info: FunctionInfo, factory: F)
    where
        F: Fn(&[Value]) -> Result<Box<dyn WindowFunction>> + Send + Sync + 'static,
    {
        let name = info.name.to_lowercase();
        let entry = Entry {
            info,
            factory: Arc::new(factory),
        };
        self.functions.write().insert(name, entry);
    }

    /// Register a function whose only argument is a column name
    fn register_column_function<W>(&self, info: FunctionInfo, build: fn(String) -> W)
    where
        W: WindowFunction + 'static,
    {
        let name = info.name.clone();
        self.register(info, move |args| {
            Ok(Box::new(build(column_arg(&name, args, 0)?)))
        });
    }

    /// Build function `name` from `args`
    pub fn create(&self, name: &str, args: &[Value]) -> Result<Box<dyn WindowFunction>> {
        // clone the entry so the factory runs without holding the lock
        let entry = self
            .functions
            .read()
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::invalid_argument(format!("unknown window function '{}'", name)))?;
        entry
            .info
            .signature
            .validate_arg_count(args.len())
            .map_err(|e| Error::invalid_argument(format!("{}: {}", entry.info.name, e)))?;
        (entry.factory)(args)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.read().contains_key(&name.to_lowercase())
    }

    pub fn get_info(&self, name: &str) -> Option<FunctionInfo> {
        self.functions
            .read()
            .get(&name.to_lowercase())
            .map(|e| e.info.clone())
    }

    /// Registered names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered names of one function type, sorted
    pub fn list_by_type(&self, function_type: FunctionType) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .read()
            .iter()
            .filter(|(_, e)| e.info.function_type == function_type)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Column-name argument at `index`
fn column_arg(function: &str, args: &[Value], index: usize) -> Result<String> {
    match args.get(index) {
        Some(Value::Text(s)) => Ok(s.to_string()),
        Some(other) => Err(Error::invalid_argument(format!(
            "{}: argument {} must be a column name, got {}",
            function,
            index + 1,
            other.data_type()
        ))),
        None => Err(Error::invalid_argument(format!(
            "{}: missing column argument",
            function
        ))),
    }
}

/// Non-negative integer argument at `index`, `default` when absent
fn count_arg(function: &str, args: &[Value], index: usize, default: usize) -> Result<usize> {
    match args.get(index) {
        None => Ok(default),
        Some(Value::Integer(v)) => usize::try_from(*v).map_err(|_| {
            Error::invalid_argument(format!(
                "{}: argument {} must be non-negative, got {}",
                function,
                index + 1,
                v
            ))
        }),
        Some(other) => Err(Error::invalid_argument(format!(
            "{}: argument {} must be an integer, got {}",
            function,
            index + 1,
            other.data_type()
        ))),
    }
}
