// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::write_str::WriteStr;
use std::{fmt, io};

/// Wraps a [`WriteStr`] sink so that it can be closed exactly once.
///
/// Closing flushes the sink and drops it, releasing the file handle or buffer behind it. Writes
/// after that fail with an error rather than reaching the released sink.
#[derive(Debug)]
pub struct Appender<W> {
    inner: Option<W>,
}

impl<W: WriteStr> Appender<W> {
    /// Creates a new appender around `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner: Some(inner) }
    }

    /// Appends the display form of `text`.
    pub fn append(&mut self, text: impl fmt::Display) -> io::Result<&mut Self> {
        write!(self.inner_mut()?, "{text}")?;
        Ok(self)
    }

    /// Ends the current line.
    pub fn println(&mut self) -> io::Result<()> {
        self.inner_mut()?.write_str("\n")
    }

    /// Flushes and releases the sink. Closing an already-closed appender does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.write_str_flush(),
            None => Ok(()),
        }
    }

    /// Returns true if [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    fn inner_mut(&mut self) -> io::Result<&mut W> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("rerun output is already closed"))
    }
}
