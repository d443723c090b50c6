//! Context shared by platform operations

use pscaf_events::{EventEmitter, EventSender};

/// Context for platform operations, providing event emission and verbosity
#[derive(Debug, Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
    verbose: bool,
    correlation_id: Option<String>,
}

impl PlatformContext {
    #[must_use]
    pub fn new(event_sender: Option<EventSender>, verbose: bool) -> Self {
        Self {
            event_sender,
            verbose,
            correlation_id: None,
        }
    }

    /// Stamp every event emitted through this context with `id`
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Whether commands are echoed and their output streamed
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
