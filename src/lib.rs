// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest paths over large, static road networks.
//!
//! A road network is loaded once into an immutable [Graph]. Queries run against it
//! without any shared mutable state:
//!
//! - [shortest_paths] runs [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
//!   from a single source to every node,
//! - [LandmarkTables] precompute distances from a handful of landmark nodes, which
//!   [find_route] uses as an A* heuristic (the ALT technique: A*, Landmarks, Triangle inequality),
//! - [nearest_pois] ranks [points of interest](Poi) by drive time from a node.
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//!
//! let options = altroute::reader::Options::default();
//! let g = altroute::reader::load_graph("noder.txt", "kanter.txt", &options)
//!     .expect("failed to load the road network");
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//! let landmarks = altroute::LandmarkSet::choose(&g, 3, &mut rng).expect("graph too small");
//! let tables = altroute::LandmarkTables::build(&g, &landmarks).expect("invalid landmarks");
//!
//! let route = altroute::find_route(&g, &tables, 2800567, 7705656, altroute::DEFAULT_STEP_LIMIT)
//!     .expect("failed to find route");
//!
//! println!("Route: {:?} ({} s)", route.path, route.distance);
//! ```

mod astar;
pub mod dijkstra;
mod error;
mod graph;
mod landmarks;
mod poi;
mod queue;
pub mod reader;

pub use astar::{
    find_route, find_route_with_heuristic, Heuristic, LandmarkHeuristic, Route, SearchError,
    ZeroHeuristic, DEFAULT_STEP_LIMIT,
};
pub use dijkstra::{shortest_paths, DistanceTable, ShortestPaths};
pub use error::Error;
pub use graph::{Graph, GraphBuilder};
pub use landmarks::{LandmarkSet, LandmarkTables};
pub use poi::{category, nearest_pois, nearest_pois_in_category, Poi, PoiMatch, PoiSet};

/// Represents a single intersection (or other point) of the road network.
///
/// Node ids are dense: a [Graph] with `n` nodes contains exactly the ids `0..n`.
/// Coordinates are carried for presentation and play no role in routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: usize,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    /// Creates a node without a known position.
    pub const fn unplaced(id: usize) -> Self {
        Self {
            id,
            lat: 0.0,
            lon: 0.0,
        }
    }
}

/// Represents an outgoing (one-way) connection from a specific [Node].
///
/// `cost` is the drive time in seconds and must be finite and non-negative.
/// `length` (meters) and `speed_limit` (km/h) are carried along, but
/// never influence routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub cost: f64,
    pub length: f64,
    pub speed_limit: u16,
}

impl Edge {
    /// Creates an edge with only a traversal cost.
    pub const fn new(to: usize, cost: f64) -> Self {
        Self {
            to,
            cost,
            length: 0.0,
            speed_limit: 0,
        }
    }
}

/// A raw edge record, as present in road network input files.
///
/// Drive times are stored in hundredths of a second;
/// [GraphBuilder::add_road_edge] converts them into seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadEdge {
    pub from: i64,
    pub to: i64,
    pub drive_time: i64,
    pub length: f64,
    pub speed_limit: u16,
}

impl RoadEdge {
    /// Drive time of this edge, in seconds.
    pub fn cost(&self) -> f64 {
        self.drive_time as f64 / 100.0
    }
}
