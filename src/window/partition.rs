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

//! Partitions and their ordered views
//!
//! A [`Partition`] is the set of original row indices that share one
//! PARTITION BY key. Ordering never mutates it: [`Partition::apply_order`]
//! returns a fresh [`OrderedPartition`] computed from the original index
//! order every time, and that view is immutable for its whole life.
//!
//! Positions in an ordered view are *logical* (sorted) positions. Use
//! [`OrderedPartition::row_at`] to get back to the original row index and
//! [`OrderedPartition::slot_at`] for the position inside the partition's own
//! index list.

use std::cmp::Ordering;
use std::ops::Range;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::core::{ColumnAccessor, ColumnSet, Result, Value};

use super::spec::OrderClause;

/// ORDER BY key of one row
type SortKey = SmallVec<[Value; 4]>;

static NULL_VALUE: Value = Value::Null;

/// Rows of one partition, in their original relative order
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    columns: &'a ColumnSet,
    indices: Vec<usize>,
}

impl<'a> Partition<'a> {
    /// Partition over `indices` into `columns`
    pub fn new(columns: &'a ColumnSet, indices: Vec<usize>) -> Self {
        Self { columns, indices }
    }

    /// Single partition holding every row of `columns`
    pub fn whole(columns: &'a ColumnSet) -> Self {
        Self::new(columns, (0..columns.num_rows()).collect())
    }

    pub fn columns(&self) -> &'a ColumnSet {
        self.columns
    }

    /// Original row indices, in arrival order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Look up a column of the underlying set
    pub fn column(&self, name: &str) -> Result<&'a dyn ColumnAccessor> {
        self.columns.column(name)
    }

    /// View without ordering: logical positions follow arrival order
    pub fn unordered(&self) -> OrderedPartition<'_> {
        let n = self.len();
        OrderedPartition {
            partition: self,
            clauses: Vec::new(),
            order: (0..n).collect(),
            keys: Vec::new(),
            peers: PeerGroups::single(n),
            ties: PeerGroups::single(n),
        }
    }

    /// Sort by `clauses` with a stable sequential sort
    pub fn apply_order(&self, clauses: &[OrderClause]) -> Result<OrderedPartition<'_>> {
        self.apply_order_with(clauses, usize::MAX)
    }

    /// Sort by `clauses`, switching to rayon's stable parallel sort once the
    /// partition holds at least `parallel_sort_threshold` rows
    ///
    /// Earlier clauses take precedence; rows equal on every key keep their
    /// arrival order. An empty clause list gives the unordered view.
    pub fn apply_order_with(
        &self,
        clauses: &[OrderClause],
        parallel_sort_threshold: usize,
    ) -> Result<OrderedPartition<'_>> {
        if clauses.is_empty() {
            return Ok(self.unordered());
        }

        let order_columns = clauses
            .iter()
            .map(|c| self.columns.column(&c.column).map(|col| (col, c.ascending)))
            .collect::<Result<SmallVec<[(&dyn ColumnAccessor, bool); 4]>>>()?;
        let directions: SmallVec<[bool; 4]> = order_columns.iter().map(|(_, asc)| *asc).collect();

        // Precompute keys once so the comparator never touches the columns
        let mut keys: Vec<SortKey> = self
            .indices
            .iter()
            .map(|&row| order_columns.iter().map(|(col, _)| col.get(row)).collect())
            .collect();

        let mut order: Vec<usize> = (0..self.len()).collect();
        let compare = |a: &usize, b: &usize| compare_keys(&keys[*a], &keys[*b], &directions);
        if order.len() >= parallel_sort_threshold {
            order.par_sort_by(compare);
        } else {
            order.sort_by(compare);
        }

        let keys: Vec<SortKey> = order
            .iter()
            .map(|&slot| std::mem::take(&mut keys[slot]))
            .collect();

        let peers = PeerGroups::build(keys.len(), |a, b| {
            keys[a][0].compare(&keys[b][0]) == Ordering::Equal
        });
        let ties = PeerGroups::build(keys.len(), |a, b| {
            compare_keys(&keys[a], &keys[b], &directions) == Ordering::Equal
        });

        Ok(OrderedPartition {
            partition: self,
            clauses: clauses.to_vec(),
            order,
            keys,
            peers,
            ties,
        })
    }
}

fn compare_keys(a: &[Value], b: &[Value], directions: &[bool]) -> Ordering {
    for ((x, y), ascending) in a.iter().zip(b).zip(directions) {
        let cmp = x.compare(y);
        let cmp = if *ascending { cmp } else { cmp.reverse() };
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Maximal runs of adjacent equal positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerGroups {
    starts: Vec<usize>,
    group_of: Vec<usize>,
    len: usize,
}

impl PeerGroups {
    fn single(len: usize) -> Self {
        Self {
            starts: if len == 0 { Vec::new() } else { vec![0] },
            group_of: vec![0; len],
            len,
        }
    }

    fn build(len: usize, same: impl Fn(usize, usize) -> bool) -> Self {
        let mut starts = Vec::new();
        let mut group_of = Vec::with_capacity(len);
        for pos in 0..len {
            if pos == 0 || !same(pos - 1, pos) {
                starts.push(pos);
            }
            group_of.push(starts.len() - 1);
        }
        Self {
            starts,
            group_of,
            len,
        }
    }

    /// Number of groups
    pub fn count(&self) -> usize {
        self.starts.len()
    }

    /// Group holding logical position `pos`
    pub fn group_of(&self, pos: usize) -> usize {
        self.group_of[pos]
    }

    /// Logical positions of group `group`
    pub fn range(&self, group: usize) -> Range<usize> {
        let start = self.starts.get(group).copied().unwrap_or(self.len);
        let end = self.starts.get(group + 1).copied().unwrap_or(self.len);
        start..end
    }

    /// Positions sharing a group with `pos`
    pub fn range_of(&self, pos: usize) -> Range<usize> {
        self.range(self.group_of(pos))
    }
}

/// Immutable ordered view over a [`Partition`]
#[derive(Debug, Clone)]
pub struct OrderedPartition<'p> {
    partition: &'p Partition<'p>,
    clauses: Vec<OrderClause>,
    /// slot (position in `partition.indices`) for each logical position
    order: Vec<usize>,
    /// ORDER BY key per logical position, empty when unordered
    keys: Vec<SortKey>,
    /// peers on the first ORDER BY key
    peers: PeerGroups,
    /// ties on the full ORDER BY key
    ties: PeerGroups,
}

impl<'p> OrderedPartition<'p> {
    pub fn partition(&self) -> &'p Partition<'p> {
        self.partition
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_ordered(&self) -> bool {
        !self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[OrderClause] {
        &self.clauses
    }

    /// Direction of the first ORDER BY key, ascending when unordered
    pub fn first_key_ascending(&self) -> bool {
        self.clauses.first().map_or(true, |c| c.ascending)
    }

    /// Original row index at logical position `pos`
    pub fn row_at(&self, pos: usize) -> usize {
        self.partition.indices[self.order[pos]]
    }

    /// Position inside the partition's index list for logical position `pos`
    pub fn slot_at(&self, pos: usize) -> usize {
        self.order[pos]
    }

    /// Original row indices in logical order
    pub fn sorted_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().map(|&slot| self.partition.indices[slot])
    }

    /// First ORDER BY value at logical position `pos`, NULL when unordered
    pub fn order_value_at(&self, pos: usize) -> &Value {
        self.keys
            .get(pos)
            .and_then(|k| k.first())
            .unwrap_or(&NULL_VALUE)
    }

    /// Compare two first-key values in sort direction
    pub fn compare_in_order(&self, a: &Value, b: &Value) -> Ordering {
        let cmp = a.compare(b);
        if self.first_key_ascending() {
            cmp
        } else {
            cmp.reverse()
        }
    }

    /// Peer groups on the first ORDER BY key (RANGE and GROUPS frames)
    pub fn peer_groups(&self) -> &PeerGroups {
        &self.peers
    }

    /// Tie groups on the full ORDER BY key (ranking functions)
    pub fn tie_groups(&self) -> &PeerGroups {
        &self.ties
    }

    /// Value of `column` at logical position `pos`
    pub fn value_at(&self, column: &dyn ColumnAccessor, pos: usize) -> Value {
        column.get(self.row_at(pos))
    }

    /// Look up a column of the underlying set
    pub fn column(&self, name: &str) -> Result<&'p dyn ColumnAccessor> {
        self.partition.column(name)
    }
}
