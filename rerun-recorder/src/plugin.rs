// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugins: reporters that subscribe to test events.
//!
//! Every plugin is an [`EventListener`]. Some plugins additionally care about whether the run is
//! strict; they expose that through [`Plugin::as_strict_aware`], which [`Plugins`] checks once
//! during setup.

use crate::{
    config::RerunConfig,
    errors::{PluginSpecParseError, WriteEventError},
    publisher::EventPublisher,
    reporter::RerunRecorder,
};
use camino::Utf8PathBuf;
use std::{fmt, str::FromStr};
use tracing::debug;

/// A listener that registers handlers with an [`EventPublisher`].
pub trait EventListener<'a> {
    /// Registers this listener's handlers with `publisher`.
    ///
    /// Called once, before any events are published.
    fn set_event_publisher(&mut self, publisher: &mut dyn EventPublisher<'a>);
}

/// A listener whose behavior depends on whether the run is strict.
pub trait StrictAware {
    /// Sets whether pending and undefined results count as failures.
    fn set_strict(&mut self, strict: bool);
}

/// A reporter plugin.
pub trait Plugin<'a>: EventListener<'a> {
    /// Returns this plugin as [`StrictAware`], if it accepts a strictness setting.
    fn as_strict_aware(&mut self) -> Option<&mut dyn StrictAware> {
        None
    }
}

/// The set of plugins active for a run.
#[derive(Default)]
pub struct Plugins<'a> {
    plugins: Vec<Box<dyn Plugin<'a> + 'a>>,
}

impl<'a> Plugins<'a> {
    /// Creates an empty set of plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin.
    pub fn add(&mut self, plugin: impl Plugin<'a> + 'a) {
        self.plugins.push(Box::new(plugin));
    }

    /// Adds an already-boxed plugin.
    pub fn add_boxed(&mut self, plugin: Box<dyn Plugin<'a> + 'a>) {
        self.plugins.push(plugin);
    }

    /// Returns the number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if there are no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Passes `strict` to every plugin that accepts a strictness setting.
    pub fn set_strict_on_plugins(&mut self, strict: bool) {
        for plugin in &mut self.plugins {
            if let Some(strict_aware) = plugin.as_strict_aware() {
                strict_aware.set_strict(strict);
            }
        }
    }

    /// Subscribes every plugin to `publisher`.
    pub fn set_event_publisher_on_plugins(&mut self, publisher: &mut dyn EventPublisher<'a>) {
        for plugin in &mut self.plugins {
            plugin.set_event_publisher(publisher);
        }
    }
}

impl fmt::Debug for Plugins<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugins")
            .field("len", &self.plugins.len())
            .finish()
    }
}

/// A plugin option as written on the command line, e.g. `rerun:target/rerun.txt`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum PluginSpec {
    /// The rerun recorder.
    Rerun {
        /// Where to write output. If not specified, the configured output path is used.
        output: Option<Utf8PathBuf>,
    },
}

impl PluginSpec {
    /// Creates the plugin this option describes.
    ///
    /// The plugin is configured with the strictness in `config`.
    pub fn create(
        &self,
        config: &RerunConfig,
    ) -> Result<Box<dyn Plugin<'static>>, WriteEventError> {
        match self {
            Self::Rerun { output } => {
                let output = output.as_deref().unwrap_or(config.output());
                debug!(%output, strict = config.strict(), "creating rerun plugin");
                let mut recorder = RerunRecorder::create(output)?;
                recorder.set_strict(config.strict());
                Ok(Box::new(recorder))
            }
        }
    }
}

impl FromStr for PluginSpec {
    type Err = PluginSpecParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (name, output) = match input.split_once(':') {
            Some((name, output)) => (name, Some(output)),
            None => (input, None),
        };

        match name {
            "rerun" => match output {
                Some("") => Err(PluginSpecParseError::EmptyOutput {
                    input: input.to_owned(),
                }),
                output => Ok(Self::Rerun {
                    output: output.map(Utf8PathBuf::from),
                }),
            },
            _ => Err(PluginSpecParseError::UnknownPlugin {
                input: input.to_owned(),
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{EventType, TestCase, TestEvent, TestEventKind, TestResult, TestStatus},
        publisher::{EventBus, event_handler},
    };
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, rc::Rc, time::Duration};
    use test_case::test_case;

    /// A plugin that counts the events it sees, and doesn't accept a strictness setting.
    struct Counter(Rc<Cell<usize>>);

    impl<'a> EventListener<'a> for Counter {
        fn set_event_publisher(&mut self, publisher: &mut dyn EventPublisher<'a>) {
            let count = self.0.clone();
            publisher.register_handler_for(
                EventType::TestCaseFinished,
                event_handler(move |_| {
                    count.set(count.get() + 1);
                    Ok(())
                }),
            );
        }
    }

    impl Plugin<'_> for Counter {}

    /// A plugin that only remembers the strictness it was given.
    struct Strictness(Rc<Cell<Option<bool>>>);

    impl<'a> EventListener<'a> for Strictness {
        fn set_event_publisher(&mut self, _publisher: &mut dyn EventPublisher<'a>) {}
    }

    impl StrictAware for Strictness {
        fn set_strict(&mut self, strict: bool) {
            self.0.set(Some(strict));
        }
    }

    impl Plugin<'_> for Strictness {
        fn as_strict_aware(&mut self) -> Option<&mut dyn StrictAware> {
            Some(self)
        }
    }

    #[test]
    fn strictness_only_reaches_strict_aware_plugins() {
        let count = Rc::new(Cell::new(0));
        let strictness = Rc::new(Cell::new(None));

        let mut plugins = Plugins::new();
        plugins.add(Counter(count.clone()));
        plugins.add(Strictness(strictness.clone()));
        assert_eq!(plugins.len(), 2);

        plugins.set_strict_on_plugins(true);
        assert_eq!(strictness.get(), Some(true));

        let mut bus = EventBus::new();
        plugins.set_event_publisher_on_plugins(&mut bus);
        let test_case = TestCase::new("features/a.feature", 1, "a");
        let result = TestResult::new(TestStatus::Passed, Duration::ZERO);
        bus.publish(TestEvent::new(TestEventKind::TestCaseFinished {
            test_case: &test_case,
            result: &result,
        }))
        .unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test_case("rerun", PluginSpec::Rerun { output: None } ; "default output")]
    #[test_case(
        "rerun:target/failed.txt",
        PluginSpec::Rerun { output: Some("target/failed.txt".into()) }
        ; "explicit output"
    )]
    #[test_case(
        "rerun:C:/out/failed.txt",
        PluginSpec::Rerun { output: Some("C:/out/failed.txt".into()) }
        ; "output with colon"
    )]
    fn parse_spec(input: &str, expected: PluginSpec) {
        assert_eq!(input.parse::<PluginSpec>(), Ok(expected));
    }

    #[test]
    fn parse_spec_errors() {
        assert_eq!(
            "rerun:".parse::<PluginSpec>(),
            Err(PluginSpecParseError::EmptyOutput {
                input: "rerun:".to_owned()
            })
        );
        assert_eq!(
            "junit:out.xml".parse::<PluginSpec>(),
            Err(PluginSpecParseError::UnknownPlugin {
                input: "junit:out.xml".to_owned(),
                name: "junit".to_owned(),
            })
        );
    }

    #[test]
    fn create_applies_config() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let path = temp_dir.path().join("rerun.txt");
        let config = RerunConfig::from_sources(None, Some(true)).unwrap();

        let spec = PluginSpec::Rerun {
            output: Some(path.clone()),
        };
        let mut plugin = spec.create(&config).unwrap();

        let mut bus = EventBus::new();
        plugin.set_event_publisher(&mut bus);
        let test_case = TestCase::new("features/a.feature", 6, "a");
        let result = TestResult::new(TestStatus::Pending, Duration::ZERO);
        bus.publish(TestEvent::new(TestEventKind::TestCaseFinished {
            test_case: &test_case,
            result: &result,
        }))
        .unwrap();
        bus.publish(TestEvent::new(TestEventKind::RunFinished { success: false }))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "features/a.feature:6\n");
    }
}
