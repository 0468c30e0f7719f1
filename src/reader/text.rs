// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::str::FromStr;

use super::Error;
use crate::{Node, Poi, PoiSet, RoadEdge};

/// Upper bound on memory reserved up-front for records announced in a header.
const MAX_RESERVED_RECORDS: usize = 1 << 20;

/// Number of records to reserve space for, given a count read from a file.
pub(super) fn capacity_for(count: usize) -> usize {
    count.min(MAX_RESERVED_RECORDS)
}

/// Reader of non-blank lines, keeping track of line numbers for errors.
pub(super) struct Lines<R: io::BufRead> {
    reader: R,
    buffer: String,
    line: usize,
}

impl<R: io::BufRead> Lines<R> {
    pub(super) fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::default(),
            line: 0,
        }
    }

    /// Returns the fields of the next non-blank line, or None at the end of input.
    pub(super) fn next_line(&mut self) -> Result<Option<Fields<'_>>, Error> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            if !self.buffer.trim().is_empty() {
                break;
            }
        }

        Ok(Some(Fields::new(self.buffer.trim_end(), self.line)))
    }
}

/// Reader of tables with a known number of records (lines).
pub(super) struct Table<R: io::BufRead> {
    lines: Lines<R>,
    expected: usize,
    seen: usize,
}

impl<R: io::BufRead> Table<R> {
    /// Starts reading a table, parsing the record count from the first non-blank line.
    /// Anything after the count on the header line is ignored.
    pub(super) fn new(reader: R) -> Result<Self, Error> {
        let mut lines = Lines::new(reader);
        let expected = match lines.next_line()? {
            Some(mut header) => header.parse("record count")?,
            None => return Err(Error::UnexpectedEof { expected: 1, got: 0 }),
        };
        Ok(Self::from_lines(lines, expected))
    }

    /// Continues reading `expected` records from already opened [Lines].
    pub(super) fn from_lines(lines: Lines<R>, expected: usize) -> Self {
        Self {
            lines,
            expected,
            seen: 0,
        }
    }

    /// Number of records announced in the header.
    pub(super) fn expected(&self) -> usize {
        self.expected
    }

    /// Returns the next record, or None once all announced records were read.
    pub(super) fn next_record(&mut self) -> Result<Option<Fields<'_>>, Error> {
        if self.seen == self.expected {
            return Ok(None);
        }

        let (expected, seen) = (self.expected, self.seen);
        match self.lines.next_line()? {
            Some(fields) => {
                self.seen += 1;
                Ok(Some(fields))
            }
            None => Err(Error::UnexpectedEof {
                expected,
                got: seen,
            }),
        }
    }

    /// Parses the next record as exactly `len` values.
    pub(super) fn next_row<T: FromStr>(&mut self, len: usize, what: &str) -> Result<Vec<T>, Error>
    where
        T::Err: std::fmt::Display,
    {
        let (expected, seen) = (self.expected, self.seen);
        match self.next_record()? {
            Some(mut fields) => fields.parse_all(len, what),
            None => Err(Error::UnexpectedEof {
                expected: expected + 1,
                got: seen,
            }),
        }
    }
}

/// Whitespace-separated fields of a single line.
pub(super) struct Fields<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self { rest: text, line }
    }

    pub(super) fn error(&self, message: String) -> Error {
        Error::Parse {
            line: self.line,
            message,
        }
    }

    /// Returns the next field, or None if there are no more fields.
    pub(super) fn next_field(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (field, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(field)
    }

    /// Returns everything left on the line, without surrounding whitespace.
    pub(super) fn remainder(&mut self) -> &'a str {
        let r = self.rest.trim();
        self.rest = "";
        r
    }

    /// Parses the next field, failing if it's missing or malformed.
    pub(super) fn parse<T: FromStr>(&mut self, what: &str) -> Result<T, Error>
    where
        T::Err: std::fmt::Display,
    {
        let field = self
            .next_field()
            .ok_or_else(|| self.error(format!("missing {}", what)))?;
        field
            .parse()
            .map_err(|e| self.error(format!("invalid {} {:?}: {}", what, field, e)))
    }

    /// Parses exactly `len` fields, failing if the line has fewer or more of them.
    pub(super) fn parse_all<T: FromStr>(&mut self, len: usize, what: &str) -> Result<Vec<T>, Error>
    where
        T::Err: std::fmt::Display,
    {
        let values = (0..len)
            .map(|_| self.parse(what))
            .collect::<Result<Vec<T>, Error>>()?;

        match self.next_field() {
            Some(extra) => Err(self.error(format!(
                "unexpected {} {:?}, expected {} values",
                what, extra, len
            ))),
            None => Ok(values),
        }
    }

    /// Parses the next field if it's present.
    pub(super) fn parse_optional<T: FromStr>(&mut self, what: &str) -> Result<Option<T>, Error>
    where
        T::Err: std::fmt::Display,
    {
        match self.next_field() {
            Some(field) => field
                .parse()
                .map(Some)
                .map_err(|e| self.error(format!("invalid {} {:?}: {}", what, field, e))),
            None => Ok(None),
        }
    }
}

pub(super) fn parse_nodes<R: io::BufRead>(reader: R) -> Result<Vec<Node>, Error> {
    let mut t = Table::new(reader)?;
    let mut nodes = Vec::with_capacity(capacity_for(t.expected()));

    while let Some(mut f) = t.next_record()? {
        nodes.push(Node {
            id: f.parse("node id")?,
            lat: f.parse("latitude")?,
            lon: f.parse("longitude")?,
        });
    }

    Ok(nodes)
}

pub(super) fn parse_edges<R: io::BufRead>(reader: R) -> Result<Vec<RoadEdge>, Error> {
    let mut t = Table::new(reader)?;
    let mut edges = Vec::with_capacity(capacity_for(t.expected()));

    while let Some(mut f) = t.next_record()? {
        edges.push(RoadEdge {
            from: f.parse("from node")?,
            to: f.parse("to node")?,
            drive_time: f.parse("drive time")?,
            length: f.parse_optional("length")?.unwrap_or(0.0),
            speed_limit: f.parse_optional("speed limit")?.unwrap_or(0),
        });
    }

    Ok(edges)
}

pub(super) fn parse_pois<R: io::BufRead>(reader: R) -> Result<PoiSet, Error> {
    let mut t = Table::new(reader)?;
    let mut pois = PoiSet::new();

    while let Some(mut f) = t.next_record()? {
        let node = f.parse("node id")?;
        let category = f.parse("category")?;
        let name = f.remainder().trim_matches('"').to_string();
        pois.insert(Poi {
            node,
            category,
            name,
        });
    }

    Ok(pois)
}
