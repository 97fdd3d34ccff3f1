use crate::algorithms::common::TieBreak;
use crate::grid::{Cell, Position};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct QueueEntry {
    total_cost: u32,
    tie_rank: i64,
    sequence: u64,
    position: Position,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the smallest entry
        other
            .total_cost
            .cmp(&self.total_cost)
            .then_with(|| other.tie_rank.cmp(&self.tie_rank))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue of cells keyed by position.
///
/// A cell's priority is captured when it is inserted. Inserting a position
/// that is already queued does nothing, so cost changes made to a queued cell
/// do not move it in the queue.
pub struct OpenQueue {
    heap: BinaryHeap<QueueEntry>,
    members: FxHashSet<Position>,
    tie_break: TieBreak,
    next_sequence: u64,
}

impl OpenQueue {
    pub fn new(tie_break: TieBreak) -> Self {
        OpenQueue {
            heap: BinaryHeap::new(),
            members: FxHashSet::default(),
            tie_break,
            next_sequence: 0,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    fn tie_rank(&self, cell: &Cell) -> i64 {
        let cost = i64::from(cell.cost_from_start);
        match self.tie_break {
            TieBreak::PreferHigherCost => -cost,
            TieBreak::PreferLowerCost => cost,
            TieBreak::NoPreference => 0,
        }
    }

    /// Queues `cell` unless its position is already queued.
    pub fn insert(&mut self, cell: &Cell) {
        if !self.members.insert(cell.position) {
            return;
        }
        let entry = QueueEntry {
            total_cost: cell.total_cost,
            tie_rank: self.tie_rank(cell),
            sequence: self.next_sequence,
            position: cell.position,
        };
        self.next_sequence += 1;
        self.heap.push(entry);
    }

    /// Removes and returns the position with the smallest total cost, ties
    /// resolved by the tie-break policy.
    pub fn extract_min(&mut self) -> Option<Position> {
        let entry = self.heap.pop()?;
        self.members.remove(&entry.position);
        Some(entry.position)
    }

    pub fn remove(&mut self, position: Position) -> bool {
        if !self.members.remove(&position) {
            return false;
        }
        self.heap.retain(|entry| entry.position != position);
        true
    }

    pub fn contains(&self, position: Position) -> bool {
        self.members.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queued positions in no particular order.
    pub fn positions(&self) -> Vec<Position> {
        self.heap.iter().map(|entry| entry.position).collect()
    }
}
