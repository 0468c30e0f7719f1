// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{shortest_paths, Graph, SearchError};

/// Bit flags used in [Poi::category]. A place may belong to multiple categories,
/// in which case its code is the sum (bitwise or) of the flags.
pub mod category {
    pub const PLACE_NAME: u8 = 1;
    pub const GAS_STATION: u8 = 2;
    pub const CHARGING_STATION: u8 = 4;
    pub const FOOD: u8 = 8;
    pub const DRINKS: u8 = 16;
    pub const ACCOMMODATION: u8 = 32;
}

/// A named point of interest, attached to a node of the road network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poi {
    pub node: usize,
    pub category: u8,
    pub name: String,
}

impl Poi {
    /// Returns true if this point belongs to every category in `mask`.
    pub fn has_category(&self, mask: u8) -> bool {
        self.category & mask == mask
    }
}

/// Collection of [points of interest](Poi), at most one per node.
///
/// Points are kept in insertion order, which decides between equally distant
/// points in [nearest_pois].
#[derive(Debug, Default, Clone)]
pub struct PoiSet {
    pois: Vec<Poi>,
    by_node: HashMap<usize, usize>,
}

impl PoiSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point of interest. If a point for the same node already exists,
    /// the new one is discarded and false is returned.
    pub fn insert(&mut self, poi: Poi) -> bool {
        if self.by_node.contains_key(&poi.node) {
            log::warn!(
                "duplicate point of interest at node {}: {:?} ignored",
                poi.node,
                poi.name
            );
            return false;
        }

        self.by_node.insert(poi.node, self.pois.len());
        self.pois.push(poi);
        true
    }

    /// Retrieves the point of interest at a given node.
    pub fn get(&self, node: usize) -> Option<&Poi> {
        self.by_node.get(&node).map(|&idx| &self.pois[idx])
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Returns an iterator over all points, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Poi> {
        self.pois.iter()
    }
}

impl FromIterator<Poi> for PoiSet {
    fn from_iter<I: IntoIterator<Item = Poi>>(iter: I) -> Self {
        let mut set = Self::new();
        for poi in iter {
            set.insert(poi);
        }
        set
    }
}

/// A point of interest together with its drive time from the query node.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiMatch<'a> {
    pub poi: &'a Poi,
    pub distance: f64,
}

/// Finds up to `k` points of interest closest (by drive time) to `source`.
///
/// Results are sorted by ascending distance, with ties kept in [PoiSet] order.
/// Points unreachable from `source` are never returned.
pub fn nearest_pois<'a>(
    g: &Graph,
    pois: &'a PoiSet,
    source: usize,
    k: usize,
) -> Result<Vec<PoiMatch<'a>>, SearchError> {
    nearest_matching(g, pois, source, k, |_| true)
}

/// Like [nearest_pois], but only considers points belonging to every category in `mask`
/// (see [category]).
pub fn nearest_pois_in_category<'a>(
    g: &Graph,
    pois: &'a PoiSet,
    source: usize,
    k: usize,
    mask: u8,
) -> Result<Vec<PoiMatch<'a>>, SearchError> {
    nearest_matching(g, pois, source, k, |poi| poi.has_category(mask))
}

fn nearest_matching<'a, F: Fn(&Poi) -> bool>(
    g: &Graph,
    pois: &'a PoiSet,
    source: usize,
    k: usize,
    filter: F,
) -> Result<Vec<PoiMatch<'a>>, SearchError> {
    let distances = shortest_paths(g, source)?.distances;

    let mut matches: Vec<PoiMatch<'a>> = pois
        .iter()
        .filter(|poi| filter(poi))
        .map(|poi| PoiMatch {
            poi,
            distance: distances.get(poi.node),
        })
        .filter(|m| m.distance.is_finite())
        .collect();

    // sort_by is stable, so equally distant points stay in insertion order
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    matches.truncate(k);
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(node: usize, category: u8, name: &str) -> Poi {
        Poi {
            node,
            category,
            name: name.to_string(),
        }
    }

    fn graph() -> Graph {
        // 0 -> 1 -> 2 -> 5, 0 -> 3 (tie with 2), 7 isolated
        Graph::from_costs(
            8,
            [
                (0, 1, 1.0),
                (1, 2, 2.0),
                (2, 5, 4.0),
                (0, 3, 3.0),
                (7, 0, 1.0),
            ],
        )
        .unwrap()
    }

    fn names<'a>(matches: &[PoiMatch<'a>]) -> Vec<&'a str> {
        matches.iter().map(|m| m.poi.name.as_str()).collect()
    }

    #[test]
    fn ranks_by_distance_and_skips_unreachable() {
        let g = graph();
        let pois: PoiSet = [
            poi(5, category::FOOD, "Far"),
            poi(7, category::FOOD, "Unreachable"),
            poi(2, category::GAS_STATION, "Near"),
        ]
        .into_iter()
        .collect();

        let r = nearest_pois(&g, &pois, 0, 5).unwrap();
        assert_eq!(names(&r), vec!["Near", "Far"]);
        assert_eq!(r[0].distance, 3.0);
        assert_eq!(r[1].distance, 7.0);
    }

    #[test]
    fn truncates_to_k() {
        let g = graph();
        let pois: PoiSet = [poi(5, 1, "A"), poi(2, 1, "B"), poi(1, 1, "C")]
            .into_iter()
            .collect();

        assert_eq!(names(&nearest_pois(&g, &pois, 0, 2).unwrap()), vec!["C", "B"]);
        assert!(nearest_pois(&g, &pois, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let g = graph();
        let pois: PoiSet = [poi(3, 1, "Three"), poi(2, 1, "Two")].into_iter().collect();
        assert_eq!(names(&nearest_pois(&g, &pois, 0, 2).unwrap()), vec!["Three", "Two"]);

        let pois: PoiSet = [poi(2, 1, "Two"), poi(3, 1, "Three")].into_iter().collect();
        assert_eq!(names(&nearest_pois(&g, &pois, 0, 2).unwrap()), vec!["Two", "Three"]);
    }

    #[test]
    fn source_itself_counts() {
        let g = graph();
        let pois: PoiSet = [poi(2, 1, "Two"), poi(0, 1, "Zero")].into_iter().collect();
        let r = nearest_pois(&g, &pois, 0, 1).unwrap();
        assert_eq!(names(&r), vec!["Zero"]);
        assert_eq!(r[0].distance, 0.0);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut pois = PoiSet::new();
        assert!(pois.insert(poi(2, 1, "First")));
        assert!(!pois.insert(poi(2, 8, "Second")));
        assert_eq!(pois.len(), 1);
        assert_eq!(pois.get(2).map(|p| p.name.as_str()), Some("First"));
        assert_eq!(pois.get(3), None);
    }

    #[test]
    fn category_filter() {
        let g = graph();
        let pois: PoiSet = [
            poi(1, category::GAS_STATION, "Gas"),
            poi(2, category::FOOD | category::DRINKS, "Pub"),
            poi(3, category::FOOD, "Diner"),
            poi(5, category::DRINKS | category::ACCOMMODATION, "Hotel"),
        ]
        .into_iter()
        .collect();

        let food = nearest_pois_in_category(&g, &pois, 0, 5, category::FOOD).unwrap();
        assert_eq!(names(&food), vec!["Pub", "Diner"]);

        let drinks = nearest_pois_in_category(&g, &pois, 0, 1, category::DRINKS).unwrap();
        assert_eq!(names(&drinks), vec!["Pub"]);

        let both =
            nearest_pois_in_category(&g, &pois, 0, 5, category::FOOD | category::DRINKS).unwrap();
        assert_eq!(names(&both), vec!["Pub"]);
    }

    #[test]
    fn invalid_source() {
        let pois = PoiSet::new();
        assert_eq!(
            nearest_pois(&graph(), &pois, 8, 1).unwrap_err(),
            SearchError::InvalidReference(8)
        );
    }
}
