// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::LandmarkTables;

/// Estimate of the remaining cost from a node to a fixed search target.
///
/// A* only guarantees optimal routes if the estimate never exceeds the true
/// remaining cost (the heuristic is *admissible*).
pub trait Heuristic {
    fn estimate(&self, node: usize) -> f64;
}

/// Heuristic which always returns zero, turning A* into Dijkstra's algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _: usize) -> f64 {
        0.0
    }
}

/// Landmark-based (ALT) heuristic, bound to a specific target.
///
/// See [LandmarkTables::estimate] for the exact lower bound used.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkHeuristic<'a> {
    tables: &'a LandmarkTables,
    target: usize,
}

impl<'a> LandmarkHeuristic<'a> {
    pub fn new(tables: &'a LandmarkTables, target: usize) -> Self {
        Self { tables, target }
    }
}

impl Heuristic for LandmarkHeuristic<'_> {
    #[inline]
    fn estimate(&self, node: usize) -> f64 {
        self.tables.estimate(node, self.target)
    }
}
