// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records the locations of failed test cases and writes them out as a rerun file.

use super::appender::Appender;
use crate::{
    errors::WriteEventError,
    events::{EventType, TestCase, TestEventKind, TestResult},
    plugin::{EventListener, Plugin, StrictAware},
    publisher::{EventPublisher, event_handler},
    write_str::WriteStr,
};
use camino::Utf8Path;
use indexmap::IndexMap;
use rerun_metadata::RerunEntry;
use std::{
    cell::RefCell,
    fs::{self, File},
    io::{self, BufWriter},
    rc::Rc,
};
use tracing::debug;

/// Failed line numbers, keyed by the source they were defined in.
///
/// Sources are kept in the order their first failure was recorded, and lines in the order they
/// were recorded.
#[derive(Clone, Debug, Default)]
struct FailureLog {
    failures: IndexMap<String, Vec<u32>>,
}

impl FailureLog {
    fn record(&mut self, test_case: &TestCase) {
        self.failures
            .entry(test_case.uri.clone())
            .or_default()
            .push(test_case.line);
    }

    fn entries(&self) -> impl Iterator<Item = RerunEntry> + '_ {
        self.failures
            .iter()
            .filter(|(_, lines)| !lines.is_empty())
            .map(|(source, lines)| RerunEntry::new(source.clone(), lines.iter().copied()))
    }
}

#[derive(Debug)]
struct RecorderInner<W> {
    strict: bool,
    failures: FailureLog,
    out: Appender<W>,
}

impl<W: WriteStr> RecorderInner<W> {
    fn handle_test_case_finished(&mut self, test_case: &TestCase, result: &TestResult) {
        if self.out.is_closed() {
            debug!(%test_case, "ignoring test case finished after the rerun output was closed");
            return;
        }
        if !result.is_ok(self.strict) {
            debug!(%test_case, status = ?result.status, "recording failed test case");
            self.failures.record(test_case);
        }
    }

    fn handle_test_run_finished(&mut self) -> Result<(), WriteEventError> {
        if self.out.is_closed() {
            debug!("ignoring repeated run finished: rerun output already closed");
            return Ok(());
        }

        // The sink is released even if reporting failed partway through.
        let reported = self.report_failed_test_cases();
        let closed = self.out.close();
        reported.and(closed).map_err(WriteEventError::Io)
    }

    fn report_failed_test_cases(&mut self) -> io::Result<()> {
        let mut count = 0;
        for entry in self.failures.entries() {
            self.out.append(&entry)?.println()?;
            count += 1;
        }
        debug!(sources = count, "wrote rerun output");
        Ok(())
    }
}

/// A reporter that records the source locations of failed test cases, and writes them out once
/// the run finishes.
///
/// The output has one line per source with at least one failure: the source followed by
/// `:<line>` for each failed test case, in the order the failures were recorded.
///
/// ```text
/// features/a.feature:3:12
/// features/b.feature:1
/// ```
///
/// The recorder subscribes to [`TestCaseFinished`](EventType::TestCaseFinished) and
/// [`RunFinished`](EventType::RunFinished) events via
/// [`set_event_publisher`](EventListener::set_event_publisher). On run finished it writes its
/// output and closes the sink, after which it is done: further events are ignored.
#[derive(Debug)]
pub struct RerunRecorder<W> {
    inner: Rc<RefCell<RecorderInner<W>>>,
}

impl<W: WriteStr> RerunRecorder<W> {
    /// Creates a new recorder writing to `out`. Strict mode is off by default.
    pub fn new(out: W) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RecorderInner {
                strict: false,
                failures: FailureLog::default(),
                out: Appender::new(out),
            })),
        }
    }

    /// Returns true if pending and undefined results are being counted as failures.
    pub fn is_strict(&self) -> bool {
        self.inner.borrow().strict
    }

    /// Returns true once the run has finished and the output has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().out.is_closed()
    }

    /// Returns the failures recorded so far.
    pub fn failures(&self) -> Vec<RerunEntry> {
        self.inner.borrow().failures.entries().collect()
    }
}

impl RerunRecorder<BufWriter<File>> {
    /// Creates a recorder writing to the file at `path`, creating parent directories as needed.
    pub fn create(path: &Utf8Path) -> Result<Self, WriteEventError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| WriteEventError::Fs {
                file: parent.to_owned(),
                error,
            })?;
        }
        let file = File::create(path).map_err(|error| WriteEventError::Fs {
            file: path.to_owned(),
            error,
        })?;
        debug!(%path, "writing rerun output");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W> StrictAware for RerunRecorder<W> {
    fn set_strict(&mut self, strict: bool) {
        self.inner.borrow_mut().strict = strict;
    }
}

impl<'a, W: WriteStr + 'a> EventListener<'a> for RerunRecorder<W> {
    fn set_event_publisher(&mut self, publisher: &mut dyn EventPublisher<'a>) {
        let inner = Rc::clone(&self.inner);
        publisher.register_handler_for(
            EventType::TestCaseFinished,
            event_handler(move |event| {
                if let TestEventKind::TestCaseFinished { test_case, result } = &event.kind {
                    inner
                        .borrow_mut()
                        .handle_test_case_finished(test_case, result);
                }
                Ok(())
            }),
        );

        let inner = Rc::clone(&self.inner);
        publisher.register_handler_for(
            EventType::RunFinished,
            event_handler(move |_| inner.borrow_mut().handle_test_run_finished()),
        );
    }
}

impl<'a, W: WriteStr + 'a> Plugin<'a> for RerunRecorder<W> {
    fn as_strict_aware(&mut self) -> Option<&mut dyn StrictAware> {
        Some(self)
    }
}
