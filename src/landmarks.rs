// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use rand::Rng;
use rayon::prelude::*;

use crate::{shortest_paths, DistanceTable, Error, Graph};

/// A small set of nodes used as reference points for the landmark heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkSet(Vec<usize>);

impl LandmarkSet {
    /// Chooses `count` distinct landmarks uniformly at random.
    ///
    /// Pass a seeded generator (e.g. [rand::rngs::SmallRng]) for reproducible choices.
    pub fn choose<R: Rng + ?Sized>(g: &Graph, count: usize, rng: &mut R) -> Result<Self, Error> {
        if count > g.len() {
            return Err(Error::InsufficientNodes {
                requested: count,
                available: g.len(),
            });
        }

        let ids = rand::seq::index::sample(rng, g.len(), count).into_vec();
        log::debug!("chose landmarks: {:?}", ids);
        Ok(Self(ids))
    }

    /// Chooses `count` distinct landmarks with the thread-local random generator.
    pub fn choose_random(g: &Graph, count: usize) -> Result<Self, Error> {
        Self::choose(g, count, &mut rand::thread_rng())
    }

    /// Uses explicitly provided landmarks, e.g. well-known remote places.
    pub fn from_ids<I: IntoIterator<Item = usize>>(g: &Graph, ids: I) -> Result<Self, Error> {
        let ids = ids.into_iter().collect::<Vec<_>>();
        match ids.iter().find(|&&id| !g.contains(id)) {
            Some(&invalid) => Err(Error::InvalidLandmark(invalid)),
            None => Ok(Self(ids)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[usize] {
        &self.0
    }
}

/// Precomputed distances between [landmarks](LandmarkSet) and every node of a [Graph],
/// used by [find_route](crate::find_route) to estimate remaining costs.
///
/// Tables are immutable once built and must be rebuilt whenever the graph changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkTables {
    landmarks: Vec<usize>,

    /// `from_landmark[i].get(n)` is the cost from `landmarks[i]` to `n`.
    from_landmark: Vec<DistanceTable>,

    /// `to_landmark[i].get(n)` is the cost from `n` to `landmarks[i]`.
    /// Only present in directed tables.
    to_landmark: Option<Vec<DistanceTable>>,
}

impl LandmarkTables {
    /// Runs [shortest_paths] from every landmark.
    ///
    /// The resulting heuristic, `|d(L, node) - d(L, target)|`, is only a valid lower bound
    /// if the costs are symmetric. On directed graphs it may overestimate, making
    /// [find_route](crate::find_route) return suboptimal routes; use [Self::build_directed] there.
    pub fn build(g: &Graph, landmarks: &LandmarkSet) -> Result<Self, Error> {
        log::info!("precomputing distances from {} landmarks", landmarks.len());
        Ok(Self {
            landmarks: landmarks.0.clone(),
            from_landmark: distances_from_all(g, landmarks)?,
            to_landmark: None,
        })
    }

    /// Runs [shortest_paths] from every landmark on both the graph and its
    /// [transposition](Graph::transposed), so that distances both to and from landmarks are known.
    ///
    /// Takes twice as long as [Self::build], but the heuristic never overestimates,
    /// even on directed graphs.
    pub fn build_directed(g: &Graph, landmarks: &LandmarkSet) -> Result<Self, Error> {
        log::info!(
            "precomputing distances from and to {} landmarks",
            landmarks.len()
        );
        let transposed = g.transposed();
        Ok(Self {
            landmarks: landmarks.0.clone(),
            from_landmark: distances_from_all(g, landmarks)?,
            to_landmark: Some(distances_from_all(&transposed, landmarks)?),
        })
    }

    pub(crate) fn from_parts(
        landmarks: Vec<usize>,
        from_landmark: Vec<DistanceTable>,
        to_landmark: Option<Vec<DistanceTable>>,
    ) -> Self {
        debug_assert_eq!(landmarks.len(), from_landmark.len());
        debug_assert!(to_landmark
            .as_ref()
            .map_or(true, |t| t.len() == landmarks.len()));
        Self {
            landmarks,
            from_landmark,
            to_landmark,
        }
    }

    /// Returns the landmarks, in the same order as the distance tables.
    pub fn landmarks(&self) -> &[usize] {
        &self.landmarks
    }

    /// Returns the number of nodes covered by the tables.
    pub fn node_count(&self) -> usize {
        self.from_landmark.first().map(DistanceTable::len).unwrap_or(0)
    }

    /// Returns true if distances to landmarks are known as well (see [Self::build_directed]).
    pub fn is_directed(&self) -> bool {
        self.to_landmark.is_some()
    }

    /// Distances from the `i`-th landmark to all nodes.
    pub fn distances_from(&self, i: usize) -> Option<&DistanceTable> {
        self.from_landmark.get(i)
    }

    /// Distances from all nodes to the `i`-th landmark; only available in directed tables.
    pub fn distances_to(&self, i: usize) -> Option<&DistanceTable> {
        self.to_landmark.as_ref().and_then(|t| t.get(i))
    }

    /// Estimates the cost from `node` to `target`, taking the maximum over all landmarks.
    ///
    /// Symmetric tables use `|d(L, node) - d(L, target)|`. Directed tables use
    /// `max(d(L, target) - d(L, node), d(node, L) - d(target, L))`, which follows
    /// from the triangle inequality regardless of symmetry.
    ///
    /// A landmark contributes nothing if any of the involved distances is infinite.
    pub fn estimate(&self, node: usize, target: usize) -> f64 {
        let mut best: f64 = 0.0;

        for (i, from_landmark) in self.from_landmark.iter().enumerate() {
            let landmark_to_node = from_landmark.get(node);
            let landmark_to_target = from_landmark.get(target);
            let both_finite = landmark_to_node.is_finite() && landmark_to_target.is_finite();

            match &self.to_landmark {
                None => {
                    if both_finite {
                        best = best.max((landmark_to_node - landmark_to_target).abs());
                    }
                }

                Some(to_landmark) => {
                    if both_finite {
                        best = best.max(landmark_to_target - landmark_to_node);
                    }

                    let node_to_landmark = to_landmark[i].get(node);
                    let target_to_landmark = to_landmark[i].get(target);
                    if node_to_landmark.is_finite() && target_to_landmark.is_finite() {
                        best = best.max(node_to_landmark - target_to_landmark);
                    }
                }
            }
        }

        best
    }
}

fn distances_from_all(g: &Graph, landmarks: &LandmarkSet) -> Result<Vec<DistanceTable>, Error> {
    // Every landmark is independent, so the searches run in parallel.
    landmarks
        .0
        .par_iter()
        .map(|&landmark| {
            shortest_paths(g, landmark)
                .map(|r| r.distances)
                .map_err(|_| Error::InvalidLandmark(landmark))
        })
        .collect()
}
