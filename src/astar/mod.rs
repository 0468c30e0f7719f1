// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod error;
mod heuristic;
mod search;

pub use error::{SearchError, DEFAULT_STEP_LIMIT};
pub use heuristic::{Heuristic, LandmarkHeuristic, ZeroHeuristic};
pub use search::{find_route, find_route_with_heuristic, Route};
