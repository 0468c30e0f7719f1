// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Single-source shortest paths with [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm).

use std::collections::BinaryHeap;

use crate::astar::{find_route_with_heuristic, Route, SearchError, ZeroHeuristic};
use crate::queue::QueueItem;
use crate::{Edge, Graph};

/// Shortest-path distances (in seconds) from a fixed source to every node of a [Graph].
///
/// Unreachable nodes have a distance of [f64::INFINITY].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DistanceTable(Vec<f64>);

impl DistanceTable {
    pub(crate) fn from_vec(distances: Vec<f64>) -> Self {
        Self(distances)
    }

    /// Returns the number of nodes covered by this table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the distance to a node. Returns [f64::INFINITY] for unreachable
    /// and non-existing nodes.
    #[inline]
    pub fn get(&self, node: usize) -> f64 {
        self.0.get(node).copied().unwrap_or(f64::INFINITY)
    }

    /// Returns true if there is a path from the source to the provided node.
    pub fn is_reachable(&self, node: usize) -> bool {
        self.get(node).is_finite()
    }

    /// Returns an iterator over all reachable nodes and their distances, ordered by node id.
    pub fn reachable(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(node, &d)| (node, d))
    }

    /// Returns all distances, indexed by node id.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Result of a [shortest_paths] run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub distances: DistanceTable,

    /// Number of items popped from the priority queue, stale entries included.
    /// Only useful for diagnostics and benchmarking.
    pub nodes_processed: usize,
}

/// Computes exact shortest-path distances from `source` to every node of the graph.
///
/// Fails only if `source` doesn't exist; unreachable nodes are reported
/// with an infinite distance.
pub fn shortest_paths(g: &Graph, source: usize) -> Result<ShortestPaths, SearchError> {
    if !g.contains(source) {
        return Err(SearchError::InvalidReference(source));
    }

    let mut distances = vec![f64::INFINITY; g.len()];
    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut nodes_processed: usize = 0;

    distances[source] = 0.0;
    queue.push(QueueItem {
        at: source,
        cost: 0.0,
        score: 0.0,
    });

    while let Some(item) = queue.pop() {
        nodes_processed += 1;

        // A node may be present in the queue multiple times, only the cheapest entry counts.
        if item.is_stale(&distances) {
            continue;
        }

        for &Edge {
            to: neighbor_id,
            cost: edge_cost,
            ..
        } in g.get_edges(item.at)
        {
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost < distances[neighbor_id] {
                distances[neighbor_id] = neighbor_cost;
                queue.push(QueueItem {
                    at: neighbor_id,
                    cost: neighbor_cost,
                    score: neighbor_cost,
                });
            }
        }
    }

    log::debug!(
        "dijkstra from {}: {} nodes processed",
        source,
        nodes_processed
    );

    Ok(ShortestPaths {
        distances: DistanceTable(distances),
        nodes_processed,
    })
}

/// Finds the shortest route between two nodes with plain Dijkstra's algorithm,
/// stopping as soon as `target` is settled.
///
/// Equivalent to [find_route](crate::find_route) without any heuristic; useful
/// to measure how many nodes the landmark heuristic saves.
pub fn find_route(
    g: &Graph,
    source: usize,
    target: usize,
    step_limit: usize,
) -> Result<Route, SearchError> {
    find_route_with_heuristic(g, &ZeroHeuristic, source, target, step_limit)
}
