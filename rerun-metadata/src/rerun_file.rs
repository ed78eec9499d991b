// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{RerunEntryParseError, RerunFileReadError};
use camino::Utf8Path;
use indexmap::IndexMap;
use std::{collections::BTreeSet, fmt, fs, str::FromStr};

/// A single source identifier along with the lines of the test cases that failed in it.
///
/// The textual form is the source followed by `:<line>` for every line, e.g.
/// `features/a.feature:3:12`. An entry without any lines selects the entire source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RerunEntry {
    /// The source identifier: a path or URI.
    pub source: String,

    /// Line numbers, in the order they were recorded.
    pub lines: Vec<u32>,
}

impl RerunEntry {
    /// Creates a new entry.
    pub fn new(source: impl Into<String>, lines: impl IntoIterator<Item = u32>) -> Self {
        Self {
            source: source.into(),
            lines: lines.into_iter().collect(),
        }
    }
}

impl fmt::Display for RerunEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)?;
        for line in &self.lines {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

/// Parses an entry from its textual form.
///
/// Every trailing `:<digits>` segment is read as a line number. A source that itself ends in
/// `:<digits>` therefore doesn't survive a round trip: `RerunEntry::new("classpath:42", [3])`
/// renders as `classpath:42:3`, which parses back as source `classpath` with lines `[42, 3]`.
impl FromStr for RerunEntry {
    type Err = RerunEntryParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // Line numbers are peeled off from the right, so sources that themselves contain colons
        // (`classpath:a.feature`, `C:\a.feature`) are kept intact.
        let mut source = input;
        let mut lines = Vec::new();
        while let Some((rest, segment)) = source.rsplit_once(':') {
            if segment.is_empty() {
                if lines.is_empty() {
                    return Err(RerunEntryParseError::EmptyLineNumber {
                        input: input.to_owned(),
                    });
                }
                break;
            }
            if !segment.bytes().all(|b| b.is_ascii_digit()) {
                break;
            }
            let line = segment
                .parse::<u32>()
                .map_err(|_| RerunEntryParseError::LineOutOfRange {
                    input: input.to_owned(),
                    line: segment.to_owned(),
                })?;
            lines.push(line);
            source = rest;
        }

        if source.is_empty() {
            return Err(RerunEntryParseError::EmptySource {
                input: input.to_owned(),
            });
        }

        lines.reverse();
        Ok(Self {
            source: source.to_owned(),
            lines,
        })
    }
}

/// The set of lines selected within a single source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineSelection {
    /// Every test case in the source is selected.
    All,

    /// Only test cases starting at these lines are selected.
    Lines(BTreeSet<u32>),
}

impl LineSelection {
    /// Returns true if a test case starting at `line` is selected.
    pub fn contains(&self, line: u32) -> bool {
        match self {
            Self::All => true,
            Self::Lines(lines) => lines.contains(&line),
        }
    }

    fn from_lines(lines: &[u32]) -> Self {
        if lines.is_empty() {
            Self::All
        } else {
            Self::Lines(lines.iter().copied().collect())
        }
    }

    fn merge(&mut self, lines: &[u32]) {
        match self {
            Self::All => {}
            Self::Lines(_) if lines.is_empty() => *self = Self::All,
            Self::Lines(existing) => existing.extend(lines.iter().copied()),
        }
    }
}

/// A parsed rerun file: the locations a subsequent run should be restricted to.
///
/// Each non-blank line holds one entry, so sources may contain spaces. Leading and trailing
/// whitespace on a line is ignored. Entries for the same source are merged, and sources are kept
/// in the order they first appear.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RerunFile {
    entries: IndexMap<String, LineSelection>,
}

impl RerunFile {
    /// Parses a rerun file from its textual contents.
    pub fn parse(input: &str) -> Result<Self, RerunEntryParseError> {
        let mut entries: IndexMap<String, LineSelection> = IndexMap::new();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let entry: RerunEntry = line.parse()?;
            match entries.get_mut(&entry.source) {
                Some(selection) => selection.merge(&entry.lines),
                None => {
                    let selection = LineSelection::from_lines(&entry.lines);
                    entries.insert(entry.source, selection);
                }
            }
        }
        Ok(Self { entries })
    }

    /// Reads and parses the rerun file at `path`.
    pub fn from_path(path: &Utf8Path) -> Result<Self, RerunFileReadError> {
        let contents = fs::read_to_string(path).map_err(|error| RerunFileReadError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::parse(&contents).map_err(|error| RerunFileReadError::Parse {
            path: path.to_owned(),
            error,
        })
    }

    /// Returns true if no sources are selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the selected sources in the order they first appear.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over sources along with their line selections.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineSelection)> + '_ {
        self.entries
            .iter()
            .map(|(source, selection)| (source.as_str(), selection))
    }

    /// Returns the line selection for `source`, if it is selected at all.
    pub fn selection(&self, source: &str) -> Option<&LineSelection> {
        self.entries.get(source)
    }

    /// Returns true if the test case at `source:line` should be run.
    pub fn matches(&self, source: &str, line: u32) -> bool {
        self.selection(source)
            .is_some_and(|selection| selection.contains(line))
    }
}

impl FromStr for RerunFile {
    type Err = RerunEntryParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}
