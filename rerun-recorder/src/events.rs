// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events published over the course of a test run.

use chrono::{DateTime, FixedOffset, Local};
use std::{fmt, time::Duration};

/// A test event.
///
/// Events are delivered by an [`EventPublisher`](crate::publisher::EventPublisher) to the
/// handlers registered for their [`EventType`].
#[derive(Clone, Debug)]
pub struct TestEvent<'a> {
    /// The time at which the event was generated, including the offset from UTC.
    pub timestamp: DateTime<FixedOffset>,

    /// The kind of test event this is.
    pub kind: TestEventKind<'a>,
}

impl<'a> TestEvent<'a> {
    /// Creates a new event of the given kind, timestamped now.
    pub fn new(kind: TestEventKind<'a>) -> Self {
        Self {
            timestamp: Local::now().fixed_offset(),
            kind,
        }
    }

    /// Returns the type of this event.
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }
}

/// The kind of test event this is.
///
/// Forms part of [`TestEvent`].
#[derive(Clone, Debug)]
pub enum TestEventKind<'a> {
    /// The test run started.
    RunStarted,

    /// A test case started running.
    TestCaseStarted {
        /// The test case that started.
        test_case: &'a TestCase,
    },

    /// A test case finished running.
    ///
    /// Published exactly once per executed test case.
    TestCaseFinished {
        /// The test case that finished.
        test_case: &'a TestCase,

        /// The result of running it.
        result: &'a TestResult,
    },

    /// The test run finished. Published exactly once, after every test case has finished.
    RunFinished {
        /// Whether the run as a whole passed.
        success: bool,
    },
}

impl TestEventKind<'_> {
    /// Returns the type of this event kind.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::RunStarted => EventType::RunStarted,
            Self::TestCaseStarted { .. } => EventType::TestCaseStarted,
            Self::TestCaseFinished { .. } => EventType::TestCaseFinished,
            Self::RunFinished { .. } => EventType::RunFinished,
        }
    }
}

/// The type of a [`TestEvent`], used to register handlers.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EventType {
    /// [`TestEventKind::RunStarted`].
    RunStarted,

    /// [`TestEventKind::TestCaseStarted`].
    TestCaseStarted,

    /// [`TestEventKind::TestCaseFinished`].
    TestCaseFinished,

    /// [`TestEventKind::RunFinished`].
    RunFinished,
}

/// A single executable scenario, identified by where it starts.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TestCase {
    /// The path or URI of the source the test case was defined in.
    pub uri: String,

    /// The line the test case starts at.
    pub line: u32,

    /// The name of the test case.
    pub name: String,
}

impl TestCase {
    /// Creates a new test case.
    pub fn new(uri: impl Into<String>, line: u32, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            line,
            name: name.into(),
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uri, self.line)
    }
}

/// The status a test case finished with.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestStatus {
    /// Every step passed.
    Passed,

    /// The test case was skipped.
    Skipped,

    /// A step is marked as not yet implemented.
    Pending,

    /// A step had no matching definition.
    Undefined,

    /// A step matched more than one definition.
    Ambiguous,

    /// A step failed.
    Failed,
}

impl TestStatus {
    /// Returns true if this status is ok regardless of strictness.
    pub fn is_always_ok(self) -> bool {
        matches!(self, Self::Passed | Self::Skipped)
    }

    /// Returns true if this status is ok only when the run isn't strict.
    pub fn is_ok_when_not_strict(self) -> bool {
        matches!(self, Self::Pending | Self::Undefined)
    }
}

/// The result of running a test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestResult {
    /// The status the test case finished with.
    pub status: TestStatus,

    /// How long the test case took.
    pub duration: Duration,

    /// The error message, if a step failed.
    pub error: Option<String>,
}

impl TestResult {
    /// Creates a new result with the given status and no error.
    pub fn new(status: TestStatus, duration: Duration) -> Self {
        Self {
            status,
            duration,
            error: None,
        }
    }

    /// Returns true if this result does not fail the run.
    ///
    /// Under `strict`, pending and undefined results count as failures.
    pub fn is_ok(&self, strict: bool) -> bool {
        self.status.is_always_ok() || (!strict && self.status.is_ok_when_not_strict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TestStatus::Passed, true, true ; "passed")]
    #[test_case(TestStatus::Skipped, true, true ; "skipped")]
    #[test_case(TestStatus::Pending, true, false ; "pending")]
    #[test_case(TestStatus::Undefined, true, false ; "undefined")]
    #[test_case(TestStatus::Ambiguous, false, false ; "ambiguous")]
    #[test_case(TestStatus::Failed, false, false ; "failed")]
    fn is_ok(status: TestStatus, lenient: bool, strict: bool) {
        let result = TestResult::new(status, Duration::ZERO);
        assert_eq!(result.is_ok(false), lenient, "non-strict");
        assert_eq!(result.is_ok(true), strict, "strict");
    }

    #[test]
    fn event_types() {
        let test_case = TestCase::new("features/a.feature", 3, "a scenario");
        let result = TestResult::new(TestStatus::Passed, Duration::ZERO);
        let event = TestEvent::new(TestEventKind::TestCaseFinished {
            test_case: &test_case,
            result: &result,
        });
        assert_eq!(event.event_type(), EventType::TestCaseFinished);
        assert_eq!(
            TestEvent::new(TestEventKind::RunFinished { success: true }).event_type(),
            EventType::RunFinished
        );
        assert_eq!(test_case.to_string(), "features/a.feature:3");
    }
}
