//! Everything a run needs besides its options and paths

use pscaf_config::ToolConfig;
use pscaf_events::{EventEmitter, EventSender};
use pscaf_platform::{PlatformContext, ProcessRunner};
use std::sync::Arc;

use crate::fetch::Fetcher;

/// Collaborators and settings of one scaffolding run
#[derive(Clone)]
pub struct ScaffoldContext {
    /// Event sender for progress reporting
    pub event_sender: EventSender,
    pub fetcher: Arc<dyn Fetcher>,
    pub runner: Arc<dyn ProcessRunner>,
    /// Program names for `tar` and `git`
    pub tools: ToolConfig,
    /// Echo commands and stream their output
    pub verbose: bool,
    /// Correlation id stamped on every event of the run
    pub run_id: String,
}

impl ScaffoldContext {
    #[must_use]
    pub fn new(
        event_sender: EventSender,
        fetcher: Arc<dyn Fetcher>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            event_sender,
            fetcher,
            runner,
            tools: ToolConfig::default(),
            verbose: false,
            run_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: ToolConfig) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Context handed to the process runner
    #[must_use]
    pub fn platform_context(&self) -> PlatformContext {
        PlatformContext::new(Some(self.event_sender.clone()), self.verbose)
            .with_correlation_id(self.run_id.clone())
    }
}

impl EventEmitter for ScaffoldContext {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.event_sender)
    }

    fn correlation_id(&self) -> Option<&str> {
        Some(&self.run_id)
    }
}
