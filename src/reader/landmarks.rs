// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Text format of precomputed [LandmarkTables]:
//!
//! ```text
//! <landmark count> <node count> <0 = symmetric, 1 = directed>
//! <landmark ids>
//! <node count lines: distance from every landmark to the node>
//! <node count lines: distance from the node to every landmark, only in directed tables>
//! ```
//!
//! Unreachable nodes are stored as `inf`.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::text::{capacity_for, Lines, Table};
use super::{check_landmarks, open, Error, Options};
use crate::{DistanceTable, Graph, LandmarkTables};

/// Serializes [LandmarkTables] into a writer.
pub fn write_landmarks<W: Write>(w: W, tables: &LandmarkTables) -> io::Result<()> {
    let mut w = io::BufWriter::new(w);
    let landmarks = tables.landmarks();
    let node_count = tables.node_count();

    writeln!(
        w,
        "{} {} {}",
        landmarks.len(),
        node_count,
        u8::from(tables.is_directed())
    )?;
    writeln!(w, "{}", join(landmarks.iter()))?;

    let from: Vec<&DistanceTable> = (0..landmarks.len())
        .filter_map(|i| tables.distances_from(i))
        .collect();
    write_rows(&mut w, &from, node_count)?;

    if tables.is_directed() {
        let to: Vec<&DistanceTable> = (0..landmarks.len())
            .filter_map(|i| tables.distances_to(i))
            .collect();
        write_rows(&mut w, &to, node_count)?;
    }

    w.flush()
}

/// Serializes [LandmarkTables] into a file at the provided path.
pub fn write_landmarks_to_file<P: AsRef<Path>>(path: P, tables: &LandmarkTables) -> io::Result<()> {
    write_landmarks(File::create(path)?, tables)
}

fn join<T: std::fmt::Display, I: Iterator<Item = T>>(items: I) -> String {
    items
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_rows<W: Write>(w: &mut W, tables: &[&DistanceTable], node_count: usize) -> io::Result<()> {
    for node in 0..node_count {
        writeln!(w, "{}", join(tables.iter().map(|t| t.get(node))))?;
    }
    Ok(())
}

/// Reads [LandmarkTables] previously written with [write_landmarks],
/// checking that they fit the provided [Graph].
pub fn read_landmarks<R: io::Read>(
    reader: R,
    options: &Options,
    g: &Graph,
) -> Result<LandmarkTables, Error> {
    let mut lines = Lines::new(open(reader, options)?);
    let (landmark_count, node_count, directed, records) = match lines.next_line()? {
        Some(mut header) => {
            let landmark_count: usize = header.parse("landmark count")?;
            let node_count: usize = header.parse("node count")?;
            let directed = header.parse::<u8>("directedness flag")? != 0;

            // Landmark ids, then one row per node for every direction
            let directions = if directed { 2 } else { 1 };
            let records = node_count
                .checked_mul(directions)
                .and_then(|rows| rows.checked_add(1))
                .ok_or_else(|| header.error(format!("node count {} too large", node_count)))?;

            (landmark_count, node_count, directed, records)
        }
        None => return Err(Error::UnexpectedEof { expected: 1, got: 0 }),
    };

    let mut t = Table::from_lines(lines, records);

    let landmarks = t.next_row(landmark_count, "landmark id")?;
    let from_landmark = read_distances(&mut t, landmark_count, node_count)?;
    let to_landmark = if directed {
        Some(read_distances(&mut t, landmark_count, node_count)?)
    } else {
        None
    };

    let tables = LandmarkTables::from_parts(landmarks, from_landmark, to_landmark);
    check_landmarks(g, &tables)?;
    log::info!(
        "read {} landmark tables covering {} nodes",
        landmark_count,
        node_count
    );
    Ok(tables)
}

/// Reads [LandmarkTables] from a file at the provided path.
pub fn read_landmarks_from_file<P: AsRef<Path>>(
    path: P,
    options: &Options,
    g: &Graph,
) -> Result<LandmarkTables, Error> {
    read_landmarks(File::open(path)?, options, g)
}

fn read_distances<R: io::BufRead>(
    t: &mut Table<R>,
    landmark_count: usize,
    node_count: usize,
) -> Result<Vec<DistanceTable>, Error> {
    let mut columns = vec![Vec::with_capacity(capacity_for(node_count)); landmark_count];
    for _ in 0..node_count {
        let row: Vec<f64> = t.next_row(landmark_count, "distance")?;
        for (column, d) in columns.iter_mut().zip(row) {
            column.push(d);
        }
    }
    Ok(columns.into_iter().map(DistanceTable::from_vec).collect())
}
