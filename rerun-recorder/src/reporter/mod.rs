// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporters that consume test events.
//!
//! The main type here is [`RerunRecorder`], which writes the locations of failed test cases to a
//! rerun file.

mod appender;
mod rerun;
#[cfg(test)]
mod test_helpers;

pub use appender::Appender;
pub use rerun::RerunRecorder;
