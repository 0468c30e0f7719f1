// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading of road networks, points of interest and precomputed landmark tables
//! from whitespace-separated text files.
//!
//! Node files start with the number of nodes, followed by `id lat lon` lines.
//! Edge files start with the number of edges, followed by
//! `from to drive_time length speed_limit` lines, where the drive time is in hundredths of a second.
//! POI files start with the number of points, followed by `node category "name"` lines.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::{Graph, GraphBuilder, LandmarkTables, Node, PoiSet, RoadEdge};

mod landmarks;
mod text;

pub use landmarks::{read_landmarks, read_landmarks_from_file, write_landmarks, write_landmarks_to_file};

/// Format of an input file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the compression based on the content
    #[default]
    Unknown,

    /// Force uncompressed text
    Plain,

    /// Force text with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    Gz,

    /// Force text with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    Bz2,
}

impl FileFormat {
    /// Guesses the format of a file from its first few bytes.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(&[0x1F, 0x8B]) {
            Self::Gz
        } else if header.starts_with(b"BZh") {
            Self::Bz2
        } else {
            Self::Plain
        }
    }
}

/// Additional controls for reading input files.
#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    /// Compression of the input data.
    pub file_format: FileFormat,
}

/// Error which can occur when reading input files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unexpected end of file: expected {expected} records, got {got}")]
    UnexpectedEof { expected: usize, got: usize },

    #[error("landmark tables don't match the graph: {0}")]
    LandmarkMismatch(String),

    #[error("graph: {0}")]
    Graph(#[from] crate::Error),
}

/// Wraps a reader in a buffered reader, decompressing its content as per the provided [Options].
fn open<'a, R: io::Read + 'a>(reader: R, options: &Options) -> io::Result<Box<dyn io::BufRead + 'a>> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(io::BufRead::fill_buf(&mut b)?),
        other => other,
    };

    Ok(match format {
        FileFormat::Unknown | FileFormat::Plain => Box::new(b),
        FileFormat::Gz => Box::new(io::BufReader::new(flate2::read::MultiGzDecoder::new(b))),
        FileFormat::Bz2 => Box::new(io::BufReader::new(bzip2::read::MultiBzDecoder::new(b))),
    })
}

/// Parses a node table from a reader.
pub fn read_nodes<R: io::Read>(reader: R, options: &Options) -> Result<Vec<Node>, Error> {
    text::parse_nodes(open(reader, options)?)
}

/// Parses an edge table from a reader.
pub fn read_edges<R: io::Read>(reader: R, options: &Options) -> Result<Vec<RoadEdge>, Error> {
    text::parse_edges(open(reader, options)?)
}

/// Parses a table of points of interest from a reader.
///
/// If multiple points refer to the same node, only the first one is kept.
pub fn read_pois<R: io::Read>(reader: R, options: &Options) -> Result<PoiSet, Error> {
    text::parse_pois(open(reader, options)?)
}

/// Parses a table of points of interest from a file at the provided path.
pub fn read_pois_from_file<P: AsRef<Path>>(path: P, options: &Options) -> Result<PoiSet, Error> {
    read_pois(File::open(path)?, options)
}

/// Builds a [Graph] from node and edge tables.
pub fn build_graph(nodes: Vec<Node>, edges: &[RoadEdge]) -> Result<Graph, Error> {
    let mut b = GraphBuilder::with_nodes(nodes)?;
    for e in edges {
        b.add_road_edge(e)?;
    }
    Ok(b.build())
}

/// Loads a [Graph] from node and edge readers.
pub fn load_graph_from_io<N: io::Read, E: io::Read>(
    nodes: N,
    edges: E,
    options: &Options,
) -> Result<Graph, Error> {
    let nodes = read_nodes(nodes, options)?;
    let edges = read_edges(edges, options)?;
    let g = build_graph(nodes, &edges)?;
    log::info!("loaded graph with {} nodes and {} edges", g.len(), g.edge_count());
    Ok(g)
}

/// Loads a [Graph] from node and edge files at the provided paths.
pub fn load_graph<N: AsRef<Path>, E: AsRef<Path>>(
    nodes_path: N,
    edges_path: E,
    options: &Options,
) -> Result<Graph, Error> {
    let nodes = File::open(nodes_path)?;
    let edges = File::open(edges_path)?;
    load_graph_from_io(nodes, edges, options)
}

/// Checks that landmark tables were computed for a graph of the same size.
fn check_landmarks(g: &Graph, tables: &LandmarkTables) -> Result<(), Error> {
    if tables.node_count() != g.len() {
        return Err(Error::LandmarkMismatch(format!(
            "tables cover {} nodes, graph has {}",
            tables.node_count(),
            g.len()
        )));
    }

    match tables.landmarks().iter().find(|&&l| !g.contains(l)) {
        Some(l) => Err(Error::LandmarkMismatch(format!("landmark {} not in graph", l))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{category, nearest_pois, shortest_paths, LandmarkSet};

    const NODES: &[u8] = include_bytes!("test_fixtures/nodes.txt");
    const NODES_GZ: &[u8] = include_bytes!("test_fixtures/nodes.txt.gz");
    const EDGES: &[u8] = include_bytes!("test_fixtures/edges.txt");
    const EDGES_BZ2: &[u8] = include_bytes!("test_fixtures/edges.txt.bz2");
    const POIS: &[u8] = include_bytes!("test_fixtures/pois.txt");

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn check_simple_graph(g: &Graph) {
        //      ┌───────5
        //      │       │
        // 0────1───────2
        //      │       │
        //      3───────4   6

        assert_eq!(g.len(), 7);
        assert_eq!(g.edge_count(), 11);

        let n = g.get_node(2).unwrap();
        assert_almost_eq!(n.lat, 63.4305);
        assert_almost_eq!(n.lon, 10.3951);

        // Drive times are converted from hundredths of a second
        assert_almost_eq!(g.get_edge(0, 1), 12.5);
        assert_almost_eq!(g.get_edge(1, 0), 12.5);
        let e = g.get_edges(0)[0];
        assert_almost_eq!(e.length, 180.0);
        assert_eq!(e.speed_limit, 50);

        // One-way 1 -> 5 -> 2
        assert!(g.get_edge(1, 5).is_finite());
        assert!(g.get_edge(5, 1).is_infinite());

        // 6 is isolated
        assert!(g.get_edges(6).is_empty());
    }

    #[test]
    fn load_plain() {
        let g = load_graph_from_io(NODES, EDGES, &Options::default()).unwrap();
        check_simple_graph(&g);
    }

    #[test]
    fn load_compressed() {
        let g = load_graph_from_io(NODES_GZ, EDGES_BZ2, &Options::default()).unwrap();
        check_simple_graph(&g);

        let nodes = read_nodes(
            NODES_GZ,
            &Options {
                file_format: FileFormat::Gz,
            },
        )
        .unwrap();
        assert_eq!(nodes.len(), 7);
    }

    #[test]
    fn detect() {
        assert_eq!(FileFormat::detect(NODES), FileFormat::Plain);
        assert_eq!(FileFormat::detect(NODES_GZ), FileFormat::Gz);
        assert_eq!(FileFormat::detect(EDGES_BZ2), FileFormat::Bz2);
        assert_eq!(FileFormat::detect(b""), FileFormat::Plain);
    }

    #[test]
    fn load_pois() {
        let pois = read_pois(POIS, &Options::default()).unwrap();

        // Node 4 is listed twice, the first record wins
        assert_eq!(pois.len(), 4);
        let hotel = pois.get(4).unwrap();
        assert_eq!(hotel.name, "Hotel Östersund");
        assert_eq!(hotel.category, category::ACCOMMODATION | category::FOOD);
        assert_eq!(pois.get(2).map(|p| p.name.as_str()), Some("Trondheim"));
    }

    #[test]
    fn nearest_pois_from_files() {
        let g = load_graph_from_io(NODES, EDGES, &Options::default()).unwrap();
        let pois = read_pois(POIS, &Options::default()).unwrap();
        let d = shortest_paths(&g, 0).unwrap().distances;

        let r = nearest_pois(&g, &pois, 0, 10).unwrap();
        assert!(r.iter().all(|m| m.poi.node != 6));
        assert!(r.windows(2).all(|w| w[0].distance <= w[1].distance));
        for m in &r {
            assert_eq!(m.distance, d.get(m.poi.node));
        }
    }

    #[test]
    fn landmark_mismatch() {
        let g = load_graph_from_io(NODES, EDGES, &Options::default()).unwrap();
        let small = Graph::from_costs(3, [(0, 1, 1.0)]).unwrap();
        let tables =
            LandmarkTables::build(&small, &LandmarkSet::from_ids(&small, [0]).unwrap()).unwrap();

        assert!(matches!(
            check_landmarks(&g, &tables),
            Err(Error::LandmarkMismatch(_))
        ));
    }

    #[test]
    fn invalid_edge_in_file() {
        let edges = b"1\n0 9 100 10 50\n";
        let err = load_graph_from_io(NODES, edges.as_slice(), &Options::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Graph(crate::Error::InvalidEdge { from: 0, to: 9, .. })
        ));
    }
}
