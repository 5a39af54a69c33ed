//! Test-only tracing layer that keeps every emitted event in memory.

#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Default level installed by `setup_logging` when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

impl CapturedLogs {
    /// Runs `f` with this layer installed behind the default level filter.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_LEVEL))
            .with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn levels_of(&self, message: &str) -> Vec<Level> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m == message)
            .map(|(level, _)| *level)
            .collect()
    }
}
