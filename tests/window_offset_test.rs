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

//! Offset Window Function Tests
//!
//! LAG, LEAD, FIRST_VALUE, LAST_VALUE and NTH_VALUE.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use winframe::{
    Column, ColumnAccessor, ColumnSet, DataType, FirstValueFunction, LagFunction,
    LastValueFunction, LeadFunction, NthValueFunction, Value, WindowExpr, WindowSpec,
};

fn setup_prices() -> ColumnSet {
    ColumnSet::from_columns([
        Column::text(
            "symbol",
            vec![Some("x"), Some("y"), Some("x"), Some("y"), Some("x")],
        ),
        Column::from_i64s("ts", &[3, 1, 1, 2, 2]),
        Column::float64(
            "price",
            vec![Some(12.0), Some(20.0), Some(10.0), None, Some(11.0)],
        ),
    ])
    .expect("Failed to build price columns")
}

/// LAG over 10, 20, 30, 40 with default -1
#[test]
fn test_lag_scenario() {
    let cols = ColumnSet::from_columns([Column::from_i64s("v", &[10, 20, 30, 40])]).unwrap();
    let out = WindowExpr::over(
        LagFunction::new("v", 1, Value::integer(-1)),
        WindowSpec::new().order_by_asc("v"),
    )
    .evaluate(&cols)
    .unwrap();
    let expected: Vec<Value> = [-1, 10, 20, 30].into_iter().map(Value::integer).collect();
    assert_eq!(out.values(), expected);
}

/// The first sorted row gets LAG's default and the last gets LEAD's
#[test]
fn test_lag_lead_edges_random() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10 {
        let n = rng.random_range(1..30usize);
        let keys: Vec<i64> = (0..n).map(|_| rng.random_range(0..1000)).collect();
        let cols = ColumnSet::from_columns([Column::from_i64s("k", &keys)]).unwrap();
        let spec = WindowSpec::new().order_by_asc("k");

        let first_row = (0..n).min_by_key(|&i| (keys[i], i)).unwrap();
        let last_row = (0..n).max_by_key(|&i| (keys[i], i)).unwrap();

        let lag = WindowExpr::over(LagFunction::new("k", 1, Value::integer(-7)), spec.clone())
            .evaluate(&cols)
            .unwrap();
        assert_eq!(lag.get(first_row), Value::integer(-7));

        let lead = WindowExpr::over(LeadFunction::new("k", 1, Value::integer(-9)), spec)
            .evaluate(&cols)
            .unwrap();
        assert_eq!(lead.get(last_row), Value::integer(-9));
    }
}

/// LEAD stays inside its partition and keeps the column kind
#[test]
fn test_partitioned_lead() {
    let cols = setup_prices();
    let out = WindowExpr::over(
        LeadFunction::next("price"),
        WindowSpec::new().partition_by(["symbol"]).order_by_asc("ts"),
    )
    .alias("next_price")
    .evaluate(&cols)
    .unwrap();
    assert_eq!(out.data_type(), DataType::Float64);
    // x by ts: rows 2, 4, 0; y by ts: rows 1, 3
    assert_eq!(
        out.values(),
        vec![
            Value::Null,
            Value::Null,
            Value::float(11.0),
            Value::Null,
            Value::float(12.0)
        ]
    );
}

/// An integer default is stored in a float column
#[test]
fn test_default_coerces_to_column_kind() {
    let cols = setup_prices();
    let out = WindowExpr::over(
        LagFunction::new("price", 2, Value::integer(0)),
        WindowSpec::new().partition_by(["symbol"]).order_by_asc("ts"),
    )
    .evaluate(&cols)
    .unwrap();
    assert_eq!(out.get(0), Value::float(10.0));
    assert_eq!(out.get(2), Value::float(0.0));
    assert_eq!(out.get(3), Value::float(0.0));
}

/// A default that cannot be stored in the column kind is an error
#[test]
fn test_incompatible_default() {
    let cols = setup_prices();
    let err = WindowExpr::over(
        LagFunction::new("price", 1, Value::text("n/a")),
        WindowSpec::new().order_by_asc("ts"),
    )
    .evaluate(&cols)
    .unwrap_err();
    assert!(err.is_type_error());
}

/// FIRST_VALUE and LAST_VALUE are constant per partition
#[test]
fn test_first_last_value_per_partition() {
    let cols = setup_prices();
    let spec = WindowSpec::new().partition_by(["symbol"]).order_by_asc("ts");

    let first = WindowExpr::over(FirstValueFunction::new("price"), spec.clone())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(
        first.values(),
        vec![
            Value::float(10.0),
            Value::float(20.0),
            Value::float(10.0),
            Value::float(20.0),
            Value::float(10.0)
        ]
    );

    let last = WindowExpr::over(LastValueFunction::new("price"), spec)
        .evaluate(&cols)
        .unwrap();
    assert_eq!(last.get(2), Value::float(12.0));
    assert_eq!(last.get(1), Value::Null);
}

/// Without ORDER BY, FIRST_VALUE takes the first row in arrival order
#[test]
fn test_first_value_unordered() {
    let cols = setup_prices();
    let out = WindowExpr::over(
        FirstValueFunction::new("ts"),
        WindowSpec::new().partition_by(["symbol"]),
    )
    .evaluate(&cols)
    .unwrap();
    let expected: Vec<Value> = [3, 1, 3, 1, 3].into_iter().map(Value::integer).collect();
    assert_eq!(out.values(), expected);
}

/// NTH_VALUE reads the current frame
#[test]
fn test_nth_value_with_frames() {
    let cols = ColumnSet::from_columns([Column::from_i64s("v", &[5, 1, 4, 2, 3])]).unwrap();

    let running = WindowExpr::over(
        NthValueFunction::new("v", 2),
        WindowSpec::new().order_by_asc("v"),
    )
    .evaluate(&cols)
    .unwrap();
    // sorted 1..5: the row holding 1 has a one-row frame
    assert_eq!(running.get(1), Value::Null);
    assert_eq!(running.get(0), Value::integer(2));

    let sliding = WindowExpr::over(
        NthValueFunction::new("v", 1),
        WindowSpec::new().order_by_asc("v").rows_between(-1, 1),
    )
    .evaluate(&cols)
    .unwrap();
    let expected: Vec<Value> = [4, 1, 3, 1, 2].into_iter().map(Value::integer).collect();
    assert_eq!(sliding.values(), expected);
}

/// Offset functions fail on unknown columns
#[test]
fn test_missing_column() {
    let cols = setup_prices();
    for function in [
        Box::new(LagFunction::previous("volume")) as Box<dyn winframe::WindowFunction>,
        Box::new(LeadFunction::next("volume")),
        Box::new(FirstValueFunction::new("volume")),
        Box::new(LastValueFunction::new("volume")),
    ] {
        let err = WindowExpr::new(function, WindowSpec::new())
            .evaluate(&cols)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
