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

//! Frame bound calculation
//!
//! Maps a logical row position and a frame clause to a half-open range of
//! logical positions `[start, end)`:
//!
//! - ROWS counts physical rows around the current one.
//! - RANGE measures distance on the first ORDER BY value. Bounds include
//!   every row tied with the boundary value. A NULL current value only ever
//!   sees its NULL peers.
//! - GROUPS counts peer groups of the first ORDER BY value.
//!
//! RANGE and GROUPS over an unordered partition cover the whole partition.
//! A frame whose end resolves before its start is empty, never an error.
//! A start of UNBOUNDED FOLLOWING or an end of UNBOUNDED PRECEDING always
//! yields an empty frame, whatever the unit.

use std::cmp::Ordering;
use std::ops::Range;

use crate::core::{Result, Value};

use super::partition::OrderedPartition;
use super::spec::{FrameBound, FrameOffset, FrameSpec, FrameUnit};

impl OrderedPartition<'_> {
    /// Frame of logical position `row`; `None` means the whole partition
    ///
    /// Fails only when a RANGE offset meets a non-numeric ORDER BY value or
    /// a ROWS/GROUPS offset is not a non-negative integer.
    pub fn frame_bounds(&self, row: usize, frame: Option<&FrameSpec>) -> Result<Range<usize>> {
        let size = self.len();
        let Some(frame) = frame else {
            return Ok(0..size);
        };
        if size == 0 {
            return Ok(0..0);
        }

        let (start, end) = match frame.unit {
            FrameUnit::Rows => self.rows_bounds(row, frame)?,
            FrameUnit::Range if !self.is_ordered() => (0, size),
            FrameUnit::Range => self.range_bounds(row, frame)?,
            FrameUnit::Groups if !self.is_ordered() => (0, size),
            FrameUnit::Groups => self.groups_bounds(row, frame)?,
        };

        let start = match frame.start {
            FrameBound::UnboundedFollowing => size,
            _ => start.min(size),
        };
        let end = match frame.end {
            FrameBound::UnboundedPreceding => 0,
            _ => end.min(size),
        };
        Ok(if end < start { start..start } else { start..end })
    }

    // =========================================================================
    // ROWS
    // =========================================================================

    fn rows_bounds(&self, row: usize, frame: &FrameSpec) -> Result<(usize, usize)> {
        let size = self.len();

        let start = match frame.start {
            FrameBound::UnboundedPreceding => 0,
            FrameBound::Preceding(o) => row.saturating_sub(o.as_count()?),
            FrameBound::CurrentRow => row,
            FrameBound::Following(o) => row.saturating_add(o.as_count()?),
            FrameBound::UnboundedFollowing => size,
        };

        let end = match frame.end {
            FrameBound::UnboundedPreceding => 0,
            FrameBound::Preceding(o) => (row + 1).saturating_sub(o.as_count()?),
            FrameBound::CurrentRow => row + 1,
            FrameBound::Following(o) => row.saturating_add(o.as_count()?).saturating_add(1),
            FrameBound::UnboundedFollowing => size,
        };

        Ok((start, end))
    }

    // =========================================================================
    // RANGE
    // =========================================================================

    fn range_bounds(&self, row: usize, frame: &FrameSpec) -> Result<(usize, usize)> {
        let size = self.len();
        let current = self.order_value_at(row);

        // NULL peers only see each other
        if current.is_null() {
            let peers = self.peer_groups().range_of(row);
            return Ok((peers.start, peers.end));
        }

        let start = match frame.start {
            FrameBound::UnboundedPreceding => 0,
            FrameBound::CurrentRow => self.peer_groups().range_of(row).start,
            FrameBound::Preceding(o) => self.first_at_or_after(&self.step_back(current, &o)?),
            FrameBound::Following(o) => self.first_at_or_after(&self.step_forward(current, &o)?),
            FrameBound::UnboundedFollowing => size,
        };

        let end = match frame.end {
            FrameBound::UnboundedPreceding => 0,
            FrameBound::CurrentRow => self.peer_groups().range_of(row).end,
            FrameBound::Preceding(o) => self.first_after(&self.step_back(current, &o)?),
            FrameBound::Following(o) => self.first_after(&self.step_forward(current, &o)?),
            FrameBound::UnboundedFollowing => size,
        };

        Ok((start, end))
    }

    /// `value` moved `offset` towards the start of the sort order
    fn step_back(&self, value: &Value, offset: &FrameOffset) -> Result<Value> {
        if self.first_key_ascending() {
            value.checked_sub(&offset.to_value())
        } else {
            value.checked_add(&offset.to_value())
        }
    }

    /// `value` moved `offset` towards the end of the sort order
    fn step_forward(&self, value: &Value, offset: &FrameOffset) -> Result<Value> {
        if self.first_key_ascending() {
            value.checked_add(&offset.to_value())
        } else {
            value.checked_sub(&offset.to_value())
        }
    }

    /// First logical position whose order value is not before `target`
    fn first_at_or_after(&self, target: &Value) -> usize {
        self.search(|v| self.compare_in_order(v, target) == Ordering::Less)
    }

    /// First logical position whose order value is after `target`
    fn first_after(&self, target: &Value) -> usize {
        self.search(|v| self.compare_in_order(v, target) != Ordering::Greater)
    }

    /// Binary search over logical positions; `before` must hold for a prefix.
    /// NULLs sort first ascending and last descending, so they never fall
    /// inside a numeric target window.
    fn search(&self, before: impl Fn(&Value) -> bool) -> usize {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if before(self.order_value_at(mid)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    fn groups_bounds(&self, row: usize, frame: &FrameSpec) -> Result<(usize, usize)> {
        let groups = self.peer_groups();
        let last = groups.count() - 1;
        let current = groups.group_of(row);

        let group_at = |bound: &FrameBound| -> Result<usize> {
            Ok(match bound {
                FrameBound::UnboundedPreceding => 0,
                FrameBound::Preceding(o) => current.saturating_sub(o.as_count()?),
                FrameBound::CurrentRow => current,
                FrameBound::Following(o) => current.saturating_add(o.as_count()?).min(last),
                FrameBound::UnboundedFollowing => last,
            })
        };

        let start_group = group_at(&frame.start)?;
        let end_group = group_at(&frame.end)?;
        if end_group < start_group {
            let start = groups.range(start_group).start;
            return Ok((start, start));
        }

        Ok((groups.range(start_group).start, groups.range(end_group).end))
    }
}
