//! Structured logging integration for events
//!
//! Every event consumed by the CLI is also written to tracing with the
//! metadata it was emitted with, so debug log files carry the full run.

use pscaf_events::{AppEvent, DownloadEvent, EventMessage, ProcessEvent, ScaffoldEvent};
use tracing::{debug, error, info, trace, warn};

/// Log an event at its level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Download(DownloadEvent::Completed {
            url,
            dest,
            bytes_downloaded,
        }) => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                url = %url,
                dest = %dest.display(),
                bytes_downloaded = bytes_downloaded,
                "Download completed"
            );
        }
        AppEvent::Download(DownloadEvent::Failed { url, failure }) => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                url = %url,
                retryable = failure.retryable,
                code = ?failure.code,
                error = %failure.message,
                hint = ?failure.hint,
                "Download failed"
            );
        }

        AppEvent::Process(ProcessEvent::Started { program, args }) => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                command = %ProcessEvent::command_line(program, args),
                "Process started"
            );
        }
        AppEvent::Process(ProcessEvent::Completed {
            program,
            exit_code,
            duration_ms,
        }) => {
            debug!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                program = %program,
                exit_code = ?exit_code,
                duration_ms = duration_ms,
                "Process completed"
            );
        }

        AppEvent::Scaffold(
            ScaffoldEvent::PatchCheckFailed {
                file_name,
                origin,
                diagnostics,
            }
            | ScaffoldEvent::PatchApplyFailed {
                file_name,
                origin,
                diagnostics,
            },
        ) => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                file_name = %file_name,
                origin = %origin,
                diagnostics = %diagnostics,
                "Patch failed"
            );
        }
        AppEvent::Scaffold(ScaffoldEvent::Failed { failure }) => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                retryable = failure.retryable,
                code = ?failure.code,
                error = %failure.message,
                hint = ?failure.hint,
                "Scaffolding failed"
            );
        }
        AppEvent::Scaffold(scaffold_event) => {
            let line = scaffold_event.message();
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                event = ?scaffold_event,
                "{}",
                line.trim_start()
            );
        }

        // Fallback for everything else, at the level it was emitted with
        _ => match meta.tracing_level() {
            tracing::Level::ERROR => {
                error!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
            }
            tracing::Level::WARN => {
                warn!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
            }
            tracing::Level::INFO => {
                info!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
            }
            tracing::Level::DEBUG => {
                debug!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
            }
            tracing::Level::TRACE => {
                trace!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
            }
        },
    }
}
