// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! The rerun file format.
//!
//! A rerun file lists the source locations of test cases that failed in a previous run, one
//! source per line:
//!
//! ```text
//! features/a.feature:3:12
//! features/b.feature:1
//! ```
//!
//! The recorder in `rerun-recorder` writes this format, and [`RerunFile`] reads it back so that a
//! subsequent run can be restricted to those locations.

mod errors;
mod rerun_file;

pub use errors::*;
pub use rerun_file::*;
