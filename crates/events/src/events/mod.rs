use serde::{Deserialize, Serialize};

use crate::EventSource;
use pscaf_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod download;
pub mod general;
pub mod process;
pub mod scaffold;

pub use download::*;
pub use general::*;
pub use process::*;
pub use scaffold::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, debug logs)
    General(GeneralEvent),

    /// HTTP download lifecycle
    Download(DownloadEvent),

    /// External process echo and output streaming
    Process(ProcessEvent),

    /// Scaffolding workflow progress
    Scaffold(ScaffoldEvent),
}

impl AppEvent {
    /// Identify the source domain for this event.
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Download(_) => EventSource::DOWNLOAD,
            Self::Process(_) => EventSource::PROCESS,
            Self::Scaffold(_) => EventSource::SCAFFOLD,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Download(DownloadEvent::Failed { .. })
            | Self::Scaffold(
                ScaffoldEvent::PatchCheckFailed { .. }
                | ScaffoldEvent::PatchApplyFailed { .. }
                | ScaffoldEvent::Failed { .. },
            ) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Download(DownloadEvent::Progress { .. })
            | Self::Process(ProcessEvent::Completed { .. }) => Level::DEBUG,

            Self::Process(ProcessEvent::Output {
                stream: OutputStream::Stderr,
                ..
            }) => Level::WARN,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "pscaf::events::general",
            Self::Download(_) => "pscaf::events::download",
            Self::Process(_) => "pscaf::events::process",
            Self::Scaffold(_) => "pscaf::events::scaffold",
        }
    }
}
