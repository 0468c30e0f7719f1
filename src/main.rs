// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use altroute::reader::{self, Options};
use altroute::{Graph, LandmarkSet, LandmarkTables, Route};
use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Error of loading an input file, labelled with the file(s) involved.
#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct LoadError(String, #[source] reader::Error);

impl LoadError {
    fn wrap<P: AsRef<Path>>(path: P) -> impl FnOnce(reader::Error) -> Self {
        let label = path.as_ref().display().to_string();
        move |e| Self(label, e)
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the fastest route between two nodes, with and without landmarks
    Route(RouteArgs),

    /// List the points of interest closest to a node
    Nearest(NearestArgs),

    /// Precompute landmark tables and save them to a file
    Preprocess(PreprocessArgs),
}

#[derive(Args)]
struct NetworkArgs {
    /// The path to the node table
    nodes: PathBuf,

    /// The path to the edge table
    edges: PathBuf,
}

#[derive(Args)]
struct LandmarkArgs {
    /// Number of randomly chosen landmarks
    #[arg(short, long = "landmarks", default_value_t = 3)]
    landmark_count: usize,

    /// Seed for choosing landmarks; random if not provided
    #[arg(long)]
    seed: Option<u64>,

    /// Also precompute distances to the landmarks, which keeps routes optimal on one-way roads
    #[arg(long)]
    directed: bool,
}

#[derive(Args)]
struct RouteArgs {
    #[command(flatten)]
    network: NetworkArgs,

    /// Start node
    from: usize,

    /// End node
    to: usize,

    #[command(flatten)]
    landmarks: LandmarkArgs,

    /// Load landmark tables created by `preprocess` instead of computing them
    #[arg(long)]
    landmark_file: Option<PathBuf>,

    /// Maximum number of nodes to expand in a single search
    #[arg(long, default_value_t = altroute::DEFAULT_STEP_LIMIT)]
    step_limit: usize,
}

#[derive(Args)]
struct NearestArgs {
    #[command(flatten)]
    network: NetworkArgs,

    /// The path to the points of interest table
    pois: PathBuf,

    /// Start node
    from: usize,

    /// Number of points to list
    #[arg(short, default_value_t = 5)]
    k: usize,

    /// Only list points belonging to all categories in this bit mask
    #[arg(short, long)]
    category: Option<u8>,
}

#[derive(Args)]
struct PreprocessArgs {
    #[command(flatten)]
    network: NetworkArgs,

    /// Where to save the landmark tables
    output: PathBuf,

    #[command(flatten)]
    landmarks: LandmarkArgs,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => route(args),
        Command::Nearest(args) => nearest(args),
        Command::Preprocess(args) => preprocess(args),
    }
}

fn route(args: RouteArgs) -> Result<(), Box<dyn Error>> {
    let g = load_graph(&args.network)?;

    let tables = match &args.landmark_file {
        Some(path) => reader::read_landmarks_from_file(path, &Options::default(), &g)
            .map_err(LoadError::wrap(path))?,
        None => build_tables(&g, &args.landmarks)?,
    };

    let plain = altroute::dijkstra::find_route(&g, args.from, args.to, args.step_limit)?;
    print_route(&g, "Dijkstra", &plain);

    let alt = altroute::find_route(&g, &tables, args.from, args.to, args.step_limit)?;
    print_route(&g, "ALT", &alt);

    Ok(())
}

fn nearest(args: NearestArgs) -> Result<(), Box<dyn Error>> {
    let g = load_graph(&args.network)?;
    let pois = reader::read_pois_from_file(&args.pois, &Options::default())
        .map_err(LoadError::wrap(&args.pois))?;

    let matches = match args.category {
        Some(mask) => altroute::nearest_pois_in_category(&g, &pois, args.from, args.k, mask)?,
        None => altroute::nearest_pois(&g, &pois, args.from, args.k)?,
    };

    if matches.is_empty() {
        println!("No reachable points of interest");
    }
    for (i, m) in matches.iter().enumerate() {
        println!(
            "{:>3}. {} (node {}, category {}) - {}",
            i + 1,
            m.poi.name,
            m.poi.node,
            m.poi.category,
            format_duration(m.distance),
        );
    }

    Ok(())
}

fn preprocess(args: PreprocessArgs) -> Result<(), Box<dyn Error>> {
    let g = load_graph(&args.network)?;
    let tables = build_tables(&g, &args.landmarks)?;
    reader::write_landmarks_to_file(&args.output, &tables)?;
    log::info!("saved landmark tables to {}", args.output.display());
    Ok(())
}

fn load_graph(args: &NetworkArgs) -> Result<Graph, LoadError> {
    reader::load_graph(&args.nodes, &args.edges, &Options::default()).map_err(|e| {
        LoadError(
            format!("{} + {}", args.nodes.display(), args.edges.display()),
            e,
        )
    })
}

fn build_tables(g: &Graph, args: &LandmarkArgs) -> Result<LandmarkTables, altroute::Error> {
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let landmarks = LandmarkSet::choose(g, args.landmark_count, &mut rng)?;
    if args.directed {
        LandmarkTables::build_directed(g, &landmarks)
    } else {
        LandmarkTables::build(g, &landmarks)
    }
}

fn print_route(g: &Graph, label: &str, route: &Route) {
    if !route.is_found() {
        println!("{}: no route ({} nodes processed)", label, route.nodes_processed);
        return;
    }

    let km = g.path_length(&route.path).unwrap_or(0.0) / 1000.0;
    println!(
        "{}: {}, {:.1} km, {} nodes, {} nodes processed",
        label,
        format_duration(route.distance),
        km,
        route.path.len(),
        route.nodes_processed,
    );
}

/// Formats seconds as `HH:MM:SS`.
fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_both_files() {
        let args = NetworkArgs {
            nodes: PathBuf::from("missing-noder.txt"),
            edges: PathBuf::from("missing-kanter.txt"),
        };
        let err = load_graph(&args).unwrap_err();
        assert!(matches!(err.1, reader::Error::Io(_)));

        let message = err.to_string();
        assert!(message.starts_with("missing-noder.txt + missing-kanter.txt: "));
    }

    #[test]
    fn duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.6), "00:01:00");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(90000.0), "25:00:00");
    }
}
