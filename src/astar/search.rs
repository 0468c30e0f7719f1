// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use super::{Heuristic, LandmarkHeuristic, SearchError};
use crate::queue::QueueItem;
use crate::{Edge, Graph, LandmarkTables};

/// Result of a point-to-point route search.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Total cost of the route in seconds, [f64::INFINITY] if there's no route.
    pub distance: f64,

    /// Nodes of the route, from the source to the target (both inclusive).
    /// Empty if there's no route.
    pub path: Vec<usize>,

    /// Number of items popped from the priority queue, stale entries included.
    /// Only useful for diagnostics and benchmarking.
    pub nodes_processed: usize,
}

impl Route {
    fn not_found(nodes_processed: usize) -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::default(),
            nodes_processed,
        }
    }

    /// Returns true if a route between the nodes exists.
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }
}

fn reconstruct_path(came_from: &HashMap<usize, usize>, mut last: usize) -> Vec<usize> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// with the landmark (ALT) heuristic to find the shortest route between two nodes.
///
/// A missing route is not an error - [Route::is_found] returns false in that case.
///
/// Tables built with [LandmarkTables::build] assume that drive times are symmetric,
/// which is not guaranteed for directed road networks. The heuristic might then
/// overestimate and the returned route might not be the shortest one.
/// Tables built with [LandmarkTables::build_directed] don't have that problem.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [SearchError::StepLimitExceeded]. The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route(
    g: &Graph,
    tables: &LandmarkTables,
    source: usize,
    target: usize,
    step_limit: usize,
) -> Result<Route, SearchError> {
    let heuristic = LandmarkHeuristic::new(tables, target);
    find_route_with_heuristic(g, &heuristic, source, target, step_limit)
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// with an arbitrary [Heuristic] to find the shortest route between two nodes.
///
/// See [find_route] for details.
pub fn find_route_with_heuristic<H: Heuristic + ?Sized>(
    g: &Graph,
    heuristic: &H,
    source: usize,
    target: usize,
    step_limit: usize,
) -> Result<Route, SearchError> {
    if !g.contains(source) {
        return Err(SearchError::InvalidReference(source));
    }
    if !g.contains(target) {
        return Err(SearchError::InvalidReference(target));
    }

    if source == target {
        return Ok(Route {
            distance: 0.0,
            path: vec![source],
            nodes_processed: 0,
        });
    }

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<usize, usize> = HashMap::default();
    let mut known_costs: HashMap<usize, f64> = HashMap::default();
    let mut nodes_processed: usize = 0;
    let mut steps: usize = 0;

    queue.push(QueueItem {
        at: source,
        cost: 0.0,
        score: heuristic.estimate(source),
    });
    known_costs.insert(source, 0.0);

    while let Some(item) = queue.pop() {
        nodes_processed += 1;

        // Contrary to the wikipedia definition, we might keep multiple items in the queue for the same node.
        if item.cost > known_costs.get(&item.at).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        if item.at == target {
            log::debug!(
                "route {} -> {}: {} nodes processed",
                source,
                target,
                nodes_processed
            );
            // With an overestimating heuristic, predecessors of the target may have been
            // improved after the target was pushed. Report the cost of the returned path.
            let path = reconstruct_path(&came_from, target);
            let distance = g.path_cost(&path).unwrap_or(item.cost);
            return Ok(Route {
                distance,
                path,
                nodes_processed,
            });
        }

        steps += 1;
        if steps > step_limit {
            return Err(SearchError::StepLimitExceeded);
        }

        for &Edge {
            to: neighbor_id,
            cost: edge_cost,
            ..
        } in g.get_edges(item.at)
        {
            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
                score: neighbor_cost + heuristic.estimate(neighbor_id),
            });
        }
    }

    log::debug!(
        "no route {} -> {}: {} nodes processed",
        source,
        target,
        nodes_processed
    );
    Ok(Route::not_found(nodes_processed))
}
