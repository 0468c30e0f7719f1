// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur when constructing a [Graph](crate::Graph)
/// or precomputing [landmarks](crate::LandmarkSet).
///
/// All of them are caused by malformed input and abort the whole operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An edge refers to a node outside of the graph, or has a negative (or non-finite) cost.
    #[error("invalid edge {from} -> {to} (cost {cost}): {reason}")]
    InvalidEdge {
        from: i64,
        to: i64,
        cost: f64,
        reason: &'static str,
    },

    /// A node id falls outside of the dense `0..node_count` range.
    #[error("invalid node {id}: ids must be in 0..{node_count}")]
    InvalidNode { id: usize, node_count: usize },

    /// More landmarks were requested than there are nodes in the graph.
    #[error("can't choose {requested} landmarks from {available} nodes")]
    InsufficientNodes { requested: usize, available: usize },

    /// An explicitly provided landmark doesn't exist in the graph.
    #[error("invalid landmark: {0}")]
    InvalidLandmark(usize),
}
