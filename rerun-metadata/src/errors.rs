// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while parsing a single `source:line:...` entry.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum RerunEntryParseError {
    /// The entry had no source identifier before its line numbers.
    #[error("rerun entry `{input}` has an empty source")]
    EmptySource {
        /// The entry that failed to parse.
        input: String,
    },

    /// The entry ended with a colon that wasn't followed by a line number.
    #[error("rerun entry `{input}` has an empty line number")]
    EmptyLineNumber {
        /// The entry that failed to parse.
        input: String,
    },

    /// A line number was too large to be represented.
    #[error("rerun entry `{input}` has an out-of-range line number `{line}`")]
    LineOutOfRange {
        /// The entry that failed to parse.
        input: String,

        /// The line number segment.
        line: String,
    },
}

/// An error that occurs while reading a rerun file from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RerunFileReadError {
    /// The file could not be read.
    #[error("failed to read rerun file at {path}")]
    Read {
        /// The path that failed to be read.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The file was read but one of its entries was malformed.
    #[error("failed to parse rerun file at {path}")]
    Parse {
        /// The path that failed to be parsed.
        path: Utf8PathBuf,

        /// The underlying parse error.
        #[source]
        error: RerunEntryParseError,
    },
}
