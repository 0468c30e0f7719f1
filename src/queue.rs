// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;

/// An entry of the priority queue used by both [Dijkstra](crate::shortest_paths)
/// and [A*](crate::find_route).
///
/// `cost` is the cost-so-far from the source, while `score` is the priority:
/// the same as `cost` for Dijkstra, `cost + heuristic` for A*.
///
/// Queues never update entries in-place. Instead, a node is pushed again whenever
/// a cheaper way to it is found, and outdated (stale) entries are skipped when popped.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueItem {
    pub(crate) at: usize,
    pub(crate) cost: f64,
    pub(crate) score: f64,
}

impl QueueItem {
    /// Returns true if a cheaper way to `self.at` than this entry has already been found.
    #[inline]
    pub(crate) fn is_stale(&self, known_costs: &[f64]) -> bool {
        self.cost > known_costs[self.at]
    }
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn item(at: usize, score: f64) -> QueueItem {
        QueueItem {
            at,
            cost: score,
            score,
        }
    }

    #[test]
    fn pops_lowest_score_first() {
        let mut queue = BinaryHeap::from([item(0, 5.0), item(1, 1.5), item(2, f64::INFINITY), item(3, 3.0)]);
        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|i| i.at).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn stale_entries() {
        let known = [0.0, 4.0];
        assert!(item(1, 5.0).is_stale(&known));
        assert!(!item(1, 4.0).is_stale(&known));
    }
}
