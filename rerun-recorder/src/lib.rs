// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Records the source locations of failed BDD test cases, so that a later run can be restricted
//! to just those cases.
//!
//! The flow is:
//!
//! 1. Build a [`RerunConfig`](config::RerunConfig), or parse a
//!    [`PluginSpec`](plugin::PluginSpec) such as `rerun:target/rerun.txt`.
//! 2. Create a [`RerunRecorder`](reporter::RerunRecorder), set its strictness, and subscribe it to
//!    an [`EventBus`](publisher::EventBus).
//! 3. Publish a `TestCaseFinished` event per test case, then a single `RunFinished` event. The
//!    recorder writes one `source:line:line...` line per source with failures and closes its
//!    output.
//!
//! The rerun file format itself lives in the `rerun-metadata` crate.

pub mod config;
pub mod errors;
pub mod events;
pub mod plugin;
pub mod publisher;
pub mod reporter;
pub mod write_str;
