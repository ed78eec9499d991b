// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test helpers for reporter types.

use crate::write_str::WriteStr;
use std::{
    cell::{Cell, RefCell},
    io,
    rc::Rc,
};

/// A [`WriteStr`] whose contents stay observable after the reporter drops it.
///
/// Clones share the same buffer. Flushing records that the sink was closed, even when the flush
/// itself is set up to fail.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedWriter {
    buf: Rc<RefCell<String>>,
    flushed: Rc<Cell<bool>>,
    fail_writes: bool,
    fail_flush: bool,
}

impl SharedWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a writer whose writes all fail.
    pub(crate) fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Returns a writer that accepts writes but fails to flush.
    pub(crate) fn failing_flush() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }

    pub(crate) fn contents(&self) -> String {
        self.buf.borrow().clone()
    }

    /// Returns true once the sink was flushed and every other clone was released.
    pub(crate) fn is_closed(&self) -> bool {
        self.flushed.get() && Rc::strong_count(&self.buf) == 1
    }
}

impl WriteStr for SharedWriter {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
        }
        self.buf.borrow_mut().push_str(s);
        Ok(())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        self.flushed.set(true);
        if self.fail_flush {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
        }
        Ok(())
    }
}
