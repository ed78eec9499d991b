// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of [`TestEvent`]s to registered handlers.
//!
//! Events are delivered synchronously, in order, on the thread that publishes them.

use crate::{
    errors::WriteEventError,
    events::{EventType, TestEvent},
};
use std::fmt;

/// A handler invoked for each event of the type it was registered for.
pub type EventHandler<'a> = Box<dyn FnMut(&TestEvent<'_>) -> Result<(), WriteEventError> + 'a>;

/// Boxes a closure into an [`EventHandler`].
///
/// Going through this function lets the closure's argument type be inferred.
pub fn event_handler<'a, F>(handler: F) -> EventHandler<'a>
where
    F: FnMut(&TestEvent<'_>) -> Result<(), WriteEventError> + 'a,
{
    Box::new(handler)
}

/// A source of test events that handlers can subscribe to.
pub trait EventPublisher<'a> {
    /// Registers `handler` to be called for every event of type `event_type`.
    fn register_handler_for(&mut self, event_type: EventType, handler: EventHandler<'a>);
}

/// An in-process [`EventPublisher`].
#[derive(Default)]
pub struct EventBus<'a> {
    handlers: Vec<(EventType, EventHandler<'a>)>,
}

impl<'a> EventBus<'a> {
    /// Creates a new bus with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to each handler registered for its type, in registration order.
    ///
    /// Dispatch stops at the first handler that returns an error, and that error is returned.
    pub fn publish(&mut self, event: TestEvent<'_>) -> Result<(), WriteEventError> {
        let event_type = event.event_type();
        for (_, handler) in self
            .handlers
            .iter_mut()
            .filter(|(registered, _)| *registered == event_type)
        {
            handler(&event)?;
        }
        Ok(())
    }

    /// Returns the number of handlers registered for `event_type`.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers
            .iter()
            .filter(|(registered, _)| *registered == event_type)
            .count()
    }
}

impl<'a> EventPublisher<'a> for EventBus<'a> {
    fn register_handler_for(&mut self, event_type: EventType, handler: EventHandler<'a>) {
        self.handlers.push((event_type, handler));
    }
}

impl fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "handlers",
                &self.handlers.iter().map(|(ty, _)| ty).collect::<Vec<_>>(),
            )
            .finish()
    }
}
