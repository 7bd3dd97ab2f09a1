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

//! Window specifications: PARTITION BY, ORDER BY and the frame clause

use std::fmt;

use crate::core::{Error, Result, Value};

/// One ORDER BY key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub ascending: bool,
}

impl OrderClause {
    pub fn new(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            column: column.into(),
            ascending,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, true)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, false)
    }
}

impl fmt::Display for OrderClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            write!(f, "{}", self.column)
        } else {
            write!(f, "{} DESC", self.column)
        }
    }
}

/// Frame unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    /// Physical row offsets
    Rows,
    /// Value distance along the first ORDER BY key
    Range,
    /// Counts of peer groups
    Groups,
}

impl fmt::Display for FrameUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameUnit::Rows => write!(f, "ROWS"),
            FrameUnit::Range => write!(f, "RANGE"),
            FrameUnit::Groups => write!(f, "GROUPS"),
        }
    }
}

/// Numeric offset of a PRECEDING / FOLLOWING bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOffset {
    Integer(i64),
    Float(f64),
}

impl FrameOffset {
    pub fn is_negative(&self) -> bool {
        match self {
            FrameOffset::Integer(v) => *v < 0,
            FrameOffset::Float(v) => *v < 0.0,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            FrameOffset::Integer(v) => *v == 0,
            FrameOffset::Float(v) => *v == 0.0,
        }
    }

    fn abs(self) -> Self {
        match self {
            FrameOffset::Integer(v) => FrameOffset::Integer(v.saturating_abs()),
            FrameOffset::Float(v) => FrameOffset::Float(v.abs()),
        }
    }

    /// Offset as a value for RANGE arithmetic
    pub fn to_value(&self) -> Value {
        match self {
            FrameOffset::Integer(v) => Value::Integer(*v),
            FrameOffset::Float(v) => Value::Float(*v),
        }
    }

    /// Offset as a row or group count
    ///
    /// ROWS and GROUPS only accept non-negative integers.
    pub fn as_count(&self) -> Result<usize> {
        match self {
            FrameOffset::Integer(v) if *v >= 0 => Ok(usize::try_from(*v).unwrap_or(usize::MAX)),
            other => Err(Error::invalid_argument(format!(
                "frame offset must be a non-negative integer, got {}",
                other
            ))),
        }
    }
}

impl From<i64> for FrameOffset {
    fn from(v: i64) -> Self {
        FrameOffset::Integer(v)
    }
}

impl From<i32> for FrameOffset {
    fn from(v: i32) -> Self {
        FrameOffset::Integer(v as i64)
    }
}

impl From<f64> for FrameOffset {
    fn from(v: f64) -> Self {
        FrameOffset::Float(v)
    }
}

impl fmt::Display for FrameOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOffset::Integer(v) => write!(f, "{}", v),
            FrameOffset::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One end of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(FrameOffset),
    CurrentRow,
    Following(FrameOffset),
    UnboundedFollowing,
}

impl FrameBound {
    pub fn preceding(offset: impl Into<FrameOffset>) -> Self {
        FrameBound::Preceding(offset.into())
    }

    pub fn following(offset: impl Into<FrameOffset>) -> Self {
        FrameBound::Following(offset.into())
    }

    /// Signed shorthand: negative is PRECEDING, zero CURRENT ROW, positive FOLLOWING
    pub fn from_signed(offset: impl Into<FrameOffset>) -> Self {
        let offset = offset.into();
        if offset.is_zero() {
            FrameBound::CurrentRow
        } else if offset.is_negative() {
            FrameBound::Preceding(offset.abs())
        } else {
            FrameBound::Following(offset)
        }
    }

    pub fn offset(&self) -> Option<&FrameOffset> {
        match self {
            FrameBound::Preceding(o) | FrameBound::Following(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameBound::UnboundedPreceding => write!(f, "UNBOUNDED PRECEDING"),
            FrameBound::Preceding(o) => write!(f, "{} PRECEDING", o),
            FrameBound::CurrentRow => write!(f, "CURRENT ROW"),
            FrameBound::Following(o) => write!(f, "{} FOLLOWING", o),
            FrameBound::UnboundedFollowing => write!(f, "UNBOUNDED FOLLOWING"),
        }
    }
}

/// Frame clause: unit plus start and end bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpec {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: FrameBound,
}

impl FrameSpec {
    pub fn new(unit: FrameUnit, start: FrameBound, end: FrameBound) -> Self {
        Self { unit, start, end }
    }

    /// ROWS BETWEEN with signed offsets
    pub fn rows_between(start: i64, end: i64) -> Self {
        Self::new(
            FrameUnit::Rows,
            FrameBound::from_signed(start),
            FrameBound::from_signed(end),
        )
    }

    /// RANGE BETWEEN with signed integer or float offsets
    pub fn range_between(start: impl Into<FrameOffset>, end: impl Into<FrameOffset>) -> Self {
        Self::new(
            FrameUnit::Range,
            FrameBound::from_signed(start),
            FrameBound::from_signed(end),
        )
    }

    /// GROUPS BETWEEN with signed offsets
    pub fn groups_between(start: i64, end: i64) -> Self {
        Self::new(
            FrameUnit::Groups,
            FrameBound::from_signed(start),
            FrameBound::from_signed(end),
        )
    }

    /// ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING
    pub fn whole_partition() -> Self {
        Self::new(
            FrameUnit::Rows,
            FrameBound::UnboundedPreceding,
            FrameBound::UnboundedFollowing,
        )
    }

    /// ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    pub fn running() -> Self {
        Self::new(
            FrameUnit::Rows,
            FrameBound::UnboundedPreceding,
            FrameBound::CurrentRow,
        )
    }

    /// Reject bounds that cannot be resolved
    ///
    /// An inverted frame (`2 FOLLOWING AND 1 PRECEDING`) is accepted and
    /// evaluates to an empty window, as are a start of UNBOUNDED FOLLOWING
    /// and an end of UNBOUNDED PRECEDING.
    pub fn validate(&self) -> Result<()> {
        for offset in [self.start.offset(), self.end.offset()].into_iter().flatten() {
            match self.unit {
                FrameUnit::Rows | FrameUnit::Groups => {
                    offset.as_count()?;
                }
                FrameUnit::Range => {
                    let valid = match offset {
                        FrameOffset::Integer(v) => *v >= 0,
                        FrameOffset::Float(v) => v.is_finite() && *v >= 0.0,
                    };
                    if !valid {
                        return Err(Error::invalid_argument(format!(
                            "RANGE offset must be a non-negative finite number, got {}",
                            offset
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for FrameSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BETWEEN {} AND {}", self.unit, self.start, self.end)
    }
}

/// PARTITION BY, ORDER BY and an optional frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSpec {
    partition_by: Vec<String>,
    order_by: Vec<OrderClause>,
    frame: Option<FrameSpec>,
}

impl WindowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn partition_by<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.partition_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order_by.push(OrderClause::new(column, ascending));
        self
    }

    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, true)
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, false)
    }

    pub fn frame(mut self, frame: FrameSpec) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn rows_between(self, start: i64, end: i64) -> Self {
        self.frame(FrameSpec::rows_between(start, end))
    }

    pub fn range_between(self, start: impl Into<FrameOffset>, end: impl Into<FrameOffset>) -> Self {
        self.frame(FrameSpec::range_between(start, end))
    }

    pub fn groups_between(self, start: i64, end: i64) -> Self {
        self.frame(FrameSpec::groups_between(start, end))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn partition_columns(&self) -> &[String] {
        &self.partition_by
    }

    pub fn order_clauses(&self) -> &[OrderClause] {
        &self.order_by
    }

    pub fn frame_spec(&self) -> Option<&FrameSpec> {
        self.frame.as_ref()
    }

    pub fn has_order_by(&self) -> bool {
        !self.order_by.is_empty()
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partition_by.is_empty()
    }

    /// True when the spec renders as `OVER ()`
    pub fn is_empty(&self) -> bool {
        self.partition_by.is_empty() && self.order_by.is_empty() && self.frame.is_none()
    }

    /// Frame used when none is given: a running frame with ORDER BY,
    /// the whole partition without
    pub fn default_frame(&self) -> FrameSpec {
        if self.has_order_by() {
            FrameSpec::running()
        } else {
            FrameSpec::whole_partition()
        }
    }

    /// Explicit frame, or the default one
    pub fn effective_frame(&self) -> FrameSpec {
        self.frame.unwrap_or_else(|| self.default_frame())
    }

    pub fn validate(&self) -> Result<()> {
        match &self.frame {
            Some(frame) => frame.validate(),
            None => Ok(()),
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if !self.partition_by.is_empty() {
            parts.push(format!("PARTITION BY {}", self.partition_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            let orders: Vec<String> = self.order_by.iter().map(|o| o.to_string()).collect();
            parts.push(format!("ORDER BY {}", orders.join(", ")));
        }
        if let Some(frame) = &self.frame {
            parts.push(frame.to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_bounds() {
        assert_eq!(
            FrameBound::from_signed(-2),
            FrameBound::Preceding(FrameOffset::Integer(2))
        );
        assert_eq!(FrameBound::from_signed(0), FrameBound::CurrentRow);
        assert_eq!(
            FrameBound::from_signed(3),
            FrameBound::Following(FrameOffset::Integer(3))
        );
        assert_eq!(
            FrameBound::from_signed(-0.5),
            FrameBound::Preceding(FrameOffset::Float(0.5))
        );
    }

    #[test]
    fn test_frame_display() {
        assert_eq!(
            FrameSpec::rows_between(-1, 1).to_string(),
            "ROWS BETWEEN 1 PRECEDING AND 1 FOLLOWING"
        );
        assert_eq!(
            FrameSpec::running().to_string(),
            "ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW"
        );
        assert_eq!(
            FrameSpec::range_between(-2.5, 0).to_string(),
            "RANGE BETWEEN 2.5 PRECEDING AND CURRENT ROW"
        );
        assert_eq!(
            FrameSpec::groups_between(0, 2).to_string(),
            "GROUPS BETWEEN CURRENT ROW AND 2 FOLLOWING"
        );
    }

    #[test]
    fn test_frame_validation() {
        assert!(FrameSpec::rows_between(-3, 3).validate().is_ok());
        assert!(FrameSpec::range_between(-1.5, 2).validate().is_ok());
        // inverted frames are legal and resolve to empty windows
        assert!(FrameSpec::rows_between(2, -1).validate().is_ok());

        let tail = FrameSpec::new(
            FrameUnit::Rows,
            FrameBound::UnboundedFollowing,
            FrameBound::UnboundedFollowing,
        );
        assert!(tail.validate().is_ok());

        let head = FrameSpec::new(
            FrameUnit::Groups,
            FrameBound::CurrentRow,
            FrameBound::UnboundedPreceding,
        );
        assert!(head.validate().is_ok());

        let float_rows = FrameSpec::new(
            FrameUnit::Rows,
            FrameBound::preceding(1.5),
            FrameBound::CurrentRow,
        );
        assert!(float_rows.validate().is_err());

        let negative = FrameSpec::new(
            FrameUnit::Range,
            FrameBound::preceding(-1),
            FrameBound::CurrentRow,
        );
        assert!(negative.validate().is_err());

        let nan = FrameSpec::new(
            FrameUnit::Range,
            FrameBound::CurrentRow,
            FrameBound::following(f64::NAN),
        );
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_window_spec_builder() {
        let spec = WindowSpec::new()
            .partition_by(["dept", "region"])
            .order_by_desc("ts")
            .order_by("id", true)
            .rows_between(-1, 1);

        assert!(spec.is_partitioned());
        assert!(spec.has_order_by());
        assert_eq!(spec.partition_columns(), &["dept", "region"]);
        assert_eq!(spec.order_clauses()[0], OrderClause::desc("ts"));
        assert_eq!(
            spec.to_string(),
            "PARTITION BY dept, region ORDER BY ts DESC, id ROWS BETWEEN 1 PRECEDING AND 1 FOLLOWING"
        );
    }

    #[test]
    fn test_default_frame() {
        let unordered = WindowSpec::new();
        assert!(unordered.is_empty());
        assert_eq!(unordered.effective_frame(), FrameSpec::whole_partition());

        let ordered = WindowSpec::new().order_by_asc("ts");
        assert_eq!(ordered.effective_frame(), FrameSpec::running());

        let explicit = ordered.clone().groups_between(-1, 0);
        assert_eq!(explicit.effective_frame(), FrameSpec::groups_between(-1, 0));
    }

    #[test]
    fn test_offset_as_count() {
        assert_eq!(FrameOffset::Integer(4).as_count().unwrap(), 4);
        assert!(FrameOffset::Integer(-1).as_count().is_err());
        assert!(FrameOffset::Float(1.0).as_count().is_err());
    }
}
