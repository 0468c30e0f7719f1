// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Recommended number of allowed node expansions in [find_route](crate::find_route)
/// before [SearchError::StepLimitExceeded] is returned.
///
/// Large enough to exhaust a country-sized road network.
pub const DEFAULT_STEP_LIMIT: usize = 10_000_000;

/// Error conditions which may occur during [find_route](crate::find_route),
/// [shortest_paths](crate::shortest_paths) or [nearest_pois](crate::nearest_pois).
///
/// Note that the lack of a route is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The start or end nodes don't exist in a graph.
    #[error("invalid node: {0}")]
    InvalidReference(usize),

    /// Route search has exceeded its limit of steps.
    ///
    /// Concluding that no route exists requires traversing everything reachable
    /// from the start. The step limit lets callers bound the time spent on a single query.
    #[error("step limit exceeded")]
    StepLimitExceeded,
}
