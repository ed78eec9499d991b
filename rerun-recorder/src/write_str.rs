// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text sinks the recorder can write to.
//!
//! Rerun output is always text, so sinks accept `&str` rather than arbitrary bytes. This is
//! similar to [`std::fmt::Write`], but returns [`std::io::Error`] so that failures writing to a
//! file reach the caller intact.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
};

/// A destination that accepts sequential text writes.
pub trait WriteStr {
    /// Writes a string to the sink.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flushes any buffered contents to their destination.
    fn write_str_flush(&mut self) -> io::Result<()>;

    /// Writes formatted text to the sink.
    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> io::Result<()> {
        // fmt::Write only reports fmt::Error, so stash the io::Error seen by the sink and hand
        // that back instead.
        struct Adapter<'a, T: ?Sized> {
            inner: &'a mut T,
            error: io::Result<()>,
        }

        impl<T: ?Sized + WriteStr> fmt::Write for Adapter<'_, T> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.inner.write_str(s).map_err(|e| {
                    self.error = Err(e);
                    fmt::Error
                })
            }
        }

        let mut output = Adapter {
            inner: self,
            error: Ok(()),
        };
        match fmt::write(&mut output, fmt) {
            Ok(()) => Ok(()),
            Err(_) if output.error.is_err() => output.error,
            Err(_) => Err(io::Error::other("formatter error")),
        }
    }
}

impl WriteStr for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteStr for BufWriter<File> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl WriteStr for Broken {
        fn write_str(&mut self, _s: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        }

        fn write_str_flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_fmt_to_string() {
        let mut out = String::new();
        write!(out, "{}:{}", "a.feature", 3).unwrap();
        assert_eq!(out, "a.feature:3");
    }

    #[test]
    fn write_fmt_preserves_io_error() {
        let err = write!(Broken, ":{}", 3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }
}
