// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Error, Node, RoadEdge};

/// Represents a road network as a set of [Nodes](Node)
/// and directed [Edges](Edge) between them.
///
/// A graph is immutable once built - use a [GraphBuilder] to create one.
/// Since it is never modified, a single graph may be shared between any number
/// of concurrent queries.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Vec<Edge>>,
}

impl Graph {
    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of (directed) edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Returns true if a node with the provided id exists.
    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        id < self.nodes.len()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: usize) -> Option<Node> {
        self.nodes.get(id).copied()
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id,
    /// in the order they were added. Parallel edges are preserved.
    #[inline]
    pub fn get_edges(&self, from_id: usize) -> &[Edge] {
        self.edges
            .get(from_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Gets the cost of the cheapest [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, from_id: usize, to_id: usize) -> f64 {
        self.cheapest_edge(from_id, to_id)
            .map(|e| e.cost)
            .unwrap_or(f64::INFINITY)
    }

    fn cheapest_edge(&self, from_id: usize, to_id: usize) -> Option<&Edge> {
        self.get_edges(from_id)
            .iter()
            .filter(|e| e.to == to_id)
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }

    /// Sums the costs of the cheapest edges between consecutive nodes of a path.
    ///
    /// Returns `None` if any two consecutive nodes aren't connected.
    pub fn path_cost(&self, path: &[usize]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.cheapest_edge(pair[0], pair[1]).map(|e| e.cost))
            .sum()
    }

    /// Sums the lengths (in meters) of the cheapest edges between consecutive nodes of a path.
    ///
    /// Returns `None` if any two consecutive nodes aren't connected.
    pub fn path_length(&self, path: &[usize]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.cheapest_edge(pair[0], pair[1]).map(|e| e.length))
            .sum()
    }

    /// Creates a new graph with every edge reversed.
    ///
    /// Running [shortest_paths](crate::shortest_paths) from `n` on the transposed graph
    /// gives distances from every node *to* `n` in the original graph.
    pub fn transposed(&self) -> Graph {
        let mut edges = vec![Vec::default(); self.nodes.len()];
        for (from_id, outgoing) in self.edges.iter().enumerate() {
            for edge in outgoing {
                edges[edge.to].push(Edge {
                    to: from_id,
                    ..*edge
                });
            }
        }

        Graph {
            nodes: self.nodes.clone(),
            edges,
        }
    }
}

/// Append-only builder of a [Graph].
///
/// Every edge is validated when added, so that a built [Graph] only contains
/// edges between existing nodes with finite, non-negative costs.
#[derive(Debug, Clone)]
pub struct GraphBuilder(Graph);

impl GraphBuilder {
    /// Creates a builder for a graph with `node_count` nodes (`0..node_count`),
    /// all without known positions.
    pub fn new(node_count: usize) -> Self {
        Self(Graph {
            nodes: (0..node_count).map(Node::unplaced).collect(),
            edges: vec![Vec::default(); node_count],
        })
    }

    /// Creates a builder from a complete node table.
    ///
    /// The table must contain every id from `0..nodes.len()` exactly once;
    /// nodes don't need to be sorted.
    pub fn with_nodes(mut nodes: Vec<Node>) -> Result<Self, Error> {
        let node_count = nodes.len();
        nodes.sort_by_key(|n| n.id);

        for (expected_id, node) in nodes.iter().enumerate() {
            if node.id != expected_id {
                return Err(Error::InvalidNode {
                    id: node.id,
                    node_count,
                });
            }
        }

        Ok(Self(Graph {
            nodes,
            edges: vec![Vec::default(); node_count],
        }))
    }

    /// Returns the number of nodes in the graph being built.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the graph being built has no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Updates the position of a [Node] with `node.id`.
    pub fn set_node(&mut self, node: Node) -> Result<(), Error> {
        let node_count = self.0.len();
        match self.0.nodes.get_mut(node.id) {
            Some(existing) => {
                *existing = node;
                Ok(())
            }
            None => Err(Error::InvalidNode {
                id: node.id,
                node_count,
            }),
        }
    }

    /// Adds an outgoing [Edge] from a node with a given id.
    ///
    /// Existing edges between the same pair of nodes are kept.
    pub fn add_edge(&mut self, from_id: usize, edge: Edge) -> Result<(), Error> {
        let invalid = |reason| Error::InvalidEdge {
            from: from_id as i64,
            to: edge.to as i64,
            cost: edge.cost,
            reason,
        };

        if !self.0.contains(from_id) || !self.0.contains(edge.to) {
            return Err(invalid("node out of range"));
        }
        if !edge.cost.is_finite() || edge.cost < 0.0 {
            return Err(invalid("cost must be finite and non-negative"));
        }

        self.0.edges[from_id].push(edge);
        Ok(())
    }

    /// Adds an edge from a raw [RoadEdge] record, converting its drive time into seconds.
    pub fn add_road_edge(&mut self, e: &RoadEdge) -> Result<(), Error> {
        let invalid = |reason| Error::InvalidEdge {
            from: e.from,
            to: e.to,
            cost: e.cost(),
            reason,
        };

        let from_id = usize::try_from(e.from).map_err(|_| invalid("node out of range"))?;
        let to_id = usize::try_from(e.to).map_err(|_| invalid("node out of range"))?;

        self.add_edge(
            from_id,
            Edge {
                to: to_id,
                cost: e.cost(),
                length: e.length,
                speed_limit: e.speed_limit,
            },
        )
    }

    /// Freezes the builder into an immutable [Graph].
    pub fn build(self) -> Graph {
        self.0
    }
}

impl Graph {
    /// Convenience constructor of a graph without node positions from
    /// `(from, to, cost)` triples.
    pub fn from_costs<I>(node_count: usize, edges: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut b = GraphBuilder::new(node_count);
        for (from_id, to_id, cost) in edges {
            b.add_edge(from_id, Edge::new(to_id, cost))?;
        }
        Ok(b.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_graph() -> Graph {
        Graph::from_costs(3, [(0, 1, 2.0), (1, 2, 3.0), (0, 2, 10.0)]).unwrap()
    }

    #[test]
    fn edges_are_directed() {
        let g = simple_graph();
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.get_edge(0, 1), 2.0);
        assert_eq!(g.get_edge(1, 0), f64::INFINITY);
        assert!(g.get_edges(2).is_empty());
        assert!(g.get_edges(3).is_empty());
    }

    #[test]
    fn parallel_edges_are_preserved() {
        let g = Graph::from_costs(2, [(0, 1, 5.0), (0, 1, 3.0)]).unwrap();
        assert_eq!(g.get_edges(0).len(), 2);
        assert_eq!(g.get_edge(0, 1), 3.0);
    }

    #[test]
    fn out_of_range_edge() {
        let err = Graph::from_costs(2, [(0, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidEdge { from: 0, to: 2, .. }));
    }

    #[test]
    fn negative_edge() {
        let err = Graph::from_costs(2, [(0, 1, -1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidEdge { from: 0, to: 1, .. }));

        let err = Graph::from_costs(2, [(0, 1, f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::InvalidEdge { .. }));
    }

    #[test]
    fn road_edge_conversion() {
        let mut b = GraphBuilder::new(2);
        b.add_road_edge(&RoadEdge {
            from: 0,
            to: 1,
            drive_time: 1250,
            length: 300.0,
            speed_limit: 50,
        })
        .unwrap();

        let err = b
            .add_road_edge(&RoadEdge {
                from: -1,
                to: 1,
                drive_time: 10,
                length: 1.0,
                speed_limit: 50,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEdge { from: -1, .. }));

        let err = b
            .add_road_edge(&RoadEdge {
                from: 1,
                to: 0,
                drive_time: -10,
                length: 1.0,
                speed_limit: 50,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEdge { from: 1, to: 0, .. }));

        let g = b.build();
        assert_eq!(
            g.get_edges(0),
            &[Edge {
                to: 1,
                cost: 12.5,
                length: 300.0,
                speed_limit: 50,
            }]
        );
    }

    #[test]
    fn node_table_must_be_dense() {
        let nodes = vec![
            Node {
                id: 1,
                lat: 63.4,
                lon: 10.4,
            },
            Node {
                id: 0,
                lat: 63.5,
                lon: 10.5,
            },
        ];
        let b = GraphBuilder::with_nodes(nodes).unwrap();
        let g = b.build();
        assert_eq!(g.get_node(1).map(|n| n.lat), Some(63.4));

        let err = GraphBuilder::with_nodes(vec![Node::unplaced(0), Node::unplaced(2)]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidNode {
                id: 2,
                node_count: 2
            }
        );
    }

    #[test]
    fn transposed() {
        let g = simple_graph().transposed();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.get_edge(1, 0), 2.0);
        assert_eq!(g.get_edge(2, 1), 3.0);
        assert_eq!(g.get_edge(2, 0), 10.0);
        assert_eq!(g.get_edge(0, 1), f64::INFINITY);
    }

    #[test]
    fn path_cost_and_length() {
        let mut b = GraphBuilder::new(3);
        b.add_edge(
            0,
            Edge {
                to: 1,
                cost: 2.0,
                length: 40.0,
                speed_limit: 80,
            },
        )
        .unwrap();
        b.add_edge(
            1,
            Edge {
                to: 2,
                cost: 3.0,
                length: 60.0,
                speed_limit: 80,
            },
        )
        .unwrap();
        let g = b.build();

        assert_eq!(g.path_cost(&[0, 1, 2]), Some(5.0));
        assert_eq!(g.path_length(&[0, 1, 2]), Some(100.0));
        assert_eq!(g.path_cost(&[0]), Some(0.0));
        assert_eq!(g.path_cost(&[0, 2]), None);
    }
}
