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

//! Aggregate Window Function Tests
//!
//! SUM, AVG, MIN, MAX and COUNT evaluated through window expressions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use winframe::{
    AvgFunction, Column, ColumnAccessor, ColumnSet, CountAllFunction, CountFunction, DataType,
    Error, FrameBound, FrameSpec, FrameUnit, MaxFunction, MinFunction, SumFunction, Value,
    WindowExpr, WindowSpec,
};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::integer(v)).collect()
}

fn setup_sales() -> ColumnSet {
    ColumnSet::from_columns([
        Column::text(
            "region",
            vec![
                Some("east"),
                Some("west"),
                Some("east"),
                Some("west"),
                Some("east"),
                Some("west"),
            ],
        ),
        Column::from_i64s("day", &[1, 1, 2, 2, 3, 3]),
        Column::int64(
            "units",
            vec![Some(5), Some(7), None, Some(3), Some(4), Some(1)],
        ),
        Column::from_f64s("price", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
    ])
    .expect("Failed to build sales columns")
}

/// Values 1..=5 with ROWS 1 PRECEDING .. 1 FOLLOWING
#[test]
fn test_sliding_sum_scenario() {
    let cols = ColumnSet::from_columns([Column::from_i64s("v", &[1, 2, 3, 4, 5])]).unwrap();
    let expr = WindowExpr::over(
        SumFunction::new("v"),
        WindowSpec::new().order_by_asc("v").rows_between(-1, 1),
    );
    let out = expr.evaluate(&cols).expect("Failed to evaluate");
    assert_eq!(out.values(), ints(&[3, 6, 9, 12, 9]));
}

/// Running SUM matches a brute-force recomputation on random input
#[test]
fn test_running_sum_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..25 {
        let n = rng.random_range(1..=50usize);
        let keys: Vec<i64> = (0..n).map(|_| rng.random_range(0..20)).collect();
        let values: Vec<i64> = (0..n).map(|_| rng.random_range(-100..100)).collect();
        let cols = ColumnSet::from_columns([
            Column::from_i64s("k", &keys),
            Column::from_i64s("v", &values),
        ])
        .unwrap();

        // ties on k are broken by arrival order, as the stable sort does
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| keys[i]);

        let expr = WindowExpr::over(SumFunction::new("v"), WindowSpec::new().order_by_asc("k"));
        let out = expr.evaluate(&cols).unwrap();

        for (pos, &row) in order.iter().enumerate() {
            let expected: i64 = order[..=pos].iter().map(|&r| values[r]).sum();
            assert_eq!(out.get(row), Value::integer(expected), "row {}", row);
        }
    }
}

/// Partitioned running totals land at the original row positions
#[test]
fn test_partitioned_running_sum() {
    let cols = setup_sales();
    let expr = WindowExpr::over(
        SumFunction::new("units"),
        WindowSpec::new().partition_by(["region"]).order_by_asc("day"),
    )
    .alias("running_units");
    let out = expr.evaluate(&cols).unwrap();
    assert_eq!(out.name(), "running_units");
    assert_eq!(out.data_type(), DataType::Int64);
    assert_eq!(out.values(), ints(&[5, 7, 5, 10, 9, 11]));
}

/// AVG divides by every row in the frame and returns FLOAT64
#[test]
fn test_avg_over_partition() {
    let cols = setup_sales();
    let expr = WindowExpr::over(
        AvgFunction::new("units"),
        WindowSpec::new().partition_by(["region"]),
    );
    let out = expr.evaluate(&cols).unwrap();
    assert_eq!(out.data_type(), DataType::Float64);
    // east: (5 + NULL + 4) / 3 rows, west: (7 + 3 + 1) / 3 rows
    assert_eq!(out.get(0), Value::float(3.0));
    assert_eq!(out.get(1), Value::float(11.0 / 3.0));
    assert_eq!(out.get(2), Value::float(3.0));
}

/// MIN and MAX keep the input kind and skip NULLs
#[test]
fn test_min_max_sliding() {
    let cols = setup_sales();
    let spec = WindowSpec::new()
        .partition_by(["region"])
        .order_by_asc("day")
        .rows_between(-1, 0);

    let min = WindowExpr::over(MinFunction::new("units"), spec.clone())
        .evaluate(&cols)
        .unwrap();
    // east frames: [5], [5, NULL], [NULL, 4]; west: [7], [7, 3], [3, 1]
    assert_eq!(min.values(), ints(&[5, 7, 5, 3, 4, 1]));

    let max = WindowExpr::over(MaxFunction::new("price"), spec)
        .evaluate(&cols)
        .unwrap();
    assert_eq!(max.data_type(), DataType::Float64);
    assert_eq!(max.get(4), Value::float(5.0));
    assert_eq!(max.get(5), Value::float(6.0));
}

/// COUNT(column) skips NULLs, COUNT(*) does not
#[test]
fn test_count_variants() {
    let cols = setup_sales();
    let spec = WindowSpec::new().partition_by(["region"]);

    let non_null = WindowExpr::over(CountFunction::new("units"), spec.clone())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(non_null.values(), ints(&[2, 3, 2, 3, 2, 3]));

    let all = WindowExpr::over(CountAllFunction::new(), spec)
        .evaluate(&cols)
        .unwrap();
    assert_eq!(all.values(), ints(&[3; 6]));
}

/// Empty frames and all-NULL frames yield the zero sentinel
#[test]
fn test_empty_frame_sentinels() {
    let cols = ColumnSet::from_columns([
        Column::from_i64s("ts", &[1, 2, 3]),
        Column::int64("v", vec![None, Some(4), Some(6)]),
    ])
    .unwrap();
    // frame is the next row only: the last row sees nothing
    let spec = WindowSpec::new().order_by_asc("ts").rows_between(1, 1);

    let sum = WindowExpr::over(SumFunction::new("v"), spec.clone())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(sum.values(), ints(&[4, 6, 0]));

    let min = WindowExpr::over(MinFunction::new("v"), spec.clone())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(min.values(), ints(&[4, 6, 0]));

    let count = WindowExpr::over(CountAllFunction::new(), spec.clone())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(count.values(), ints(&[1, 1, 0]));

    let avg = WindowExpr::over(AvgFunction::new("v"), spec)
        .evaluate(&cols)
        .unwrap();
    assert_eq!(avg.get(2), Value::float(0.0));

    // the only row of the first frame is NULL
    let max = WindowExpr::over(
        MaxFunction::new("v"),
        WindowSpec::new().order_by_asc("ts").rows_between(0, 0),
    )
    .evaluate(&cols)
    .unwrap();
    assert_eq!(max.get(0), Value::integer(0));
}

/// Frames starting at UNBOUNDED FOLLOWING or ending at UNBOUNDED PRECEDING are empty
#[test]
fn test_unbounded_edge_frames_are_empty() {
    let cols = ColumnSet::from_columns([Column::from_i64s("v", &[1, 2, 3])]).unwrap();
    let tail = FrameSpec::new(
        FrameUnit::Rows,
        FrameBound::UnboundedFollowing,
        FrameBound::UnboundedFollowing,
    );
    let out = WindowExpr::over(
        SumFunction::new("v"),
        WindowSpec::new().order_by_asc("v").frame(tail),
    )
    .evaluate(&cols)
    .unwrap();
    assert_eq!(out.values(), ints(&[0, 0, 0]));

    let head = FrameSpec::new(
        FrameUnit::Groups,
        FrameBound::CurrentRow,
        FrameBound::UnboundedPreceding,
    );
    let out = WindowExpr::over(
        CountAllFunction::new(),
        WindowSpec::new().order_by_asc("v").frame(head),
    )
    .evaluate(&cols)
    .unwrap();
    assert_eq!(out.values(), ints(&[0, 0, 0]));
}

/// MIN ignores NaN unless it is alone, MAX returns it wherever it appears
#[test]
fn test_min_max_nan_ordering() {
    for input in [[f64::NAN, 1.0, 2.0], [2.0, 1.0, f64::NAN]] {
        let cols = ColumnSet::from_columns([Column::from_f64s("v", &input)]).unwrap();
        let min = WindowExpr::over(MinFunction::new("v"), WindowSpec::new())
            .evaluate(&cols)
            .unwrap();
        assert_eq!(min.get(0), Value::float(1.0));
        let max = WindowExpr::over(MaxFunction::new("v"), WindowSpec::new())
            .evaluate(&cols)
            .unwrap();
        assert!(max.get(0).as_float64().unwrap().is_nan());
    }
}

/// Integer sums wrap instead of failing
#[test]
fn test_integer_sum_wraps() {
    let cols = ColumnSet::from_columns([Column::from_i64s("v", &[i64::MAX, 1])]).unwrap();
    let out = WindowExpr::over(SumFunction::new("v"), WindowSpec::new())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(out.get(0), Value::integer(i64::MIN));
}

/// Aggregates reject non-numeric columns and unknown columns
#[test]
fn test_aggregate_errors() {
    let cols = setup_sales();
    let err = WindowExpr::over(SumFunction::new("region"), WindowSpec::new())
        .evaluate(&cols)
        .unwrap_err();
    assert_eq!(err, Error::unsupported_type("sum", "region", DataType::Text));

    let err = WindowExpr::over(AvgFunction::new("missing"), WindowSpec::new())
        .evaluate(&cols)
        .unwrap_err();
    assert!(err.is_not_found());

    // COUNT accepts any kind
    let ok = WindowExpr::over(CountFunction::new("region"), WindowSpec::new())
        .evaluate(&cols)
        .unwrap();
    assert_eq!(ok.get(0), Value::integer(6));
}
