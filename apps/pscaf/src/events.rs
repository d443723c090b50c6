//! Event handling and console output

use console::{Style, Term};
use pscaf_config::ColorChoice;
use pscaf_events::{
    AppEvent, DownloadEvent, EventMessage, GeneralEvent, OutputStream, ProcessEvent,
    ScaffoldEvent, Tone,
};
use std::io::Write;

/// Turns events from a run into console lines
///
/// Progress goes to stdout, failures to stderr. In JSON mode nothing is
/// printed so that stdout carries the report alone.
pub struct EventHandler {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    colors: bool,
    json_output: bool,
    debug_enabled: bool,
}

impl EventHandler {
    /// Create new event handler writing to the terminal
    pub fn new(color_choice: ColorChoice, json_output: bool, debug_enabled: bool) -> Self {
        let stdout = Term::stdout();
        let colors = match color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stdout.features().colors_supported(),
        };
        Self::with_writers(
            Box::new(stdout),
            Box::new(Term::stderr()),
            colors,
            json_output,
            debug_enabled,
        )
    }

    /// Create an event handler over arbitrary writers
    pub fn with_writers(
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
        colors: bool,
        json_output: bool,
        debug_enabled: bool,
    ) -> Self {
        Self {
            out,
            err,
            colors,
            json_output,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        crate::logging::log_event_with_tracing(&message);

        if self.json_output {
            return;
        }

        match message.event {
            AppEvent::Scaffold(event) => self.handle_scaffold_event(&event),
            AppEvent::Process(event) => self.handle_process_event(event),
            AppEvent::General(event) => self.handle_general_event(event),
            AppEvent::Download(event) => self.handle_download_event(&event),
        }
    }

    fn handle_scaffold_event(&mut self, event: &ScaffoldEvent) {
        // The fatal error itself is printed once by main, with its hint
        if matches!(event, ScaffoldEvent::Failed { .. }) {
            return;
        }

        let line = event.message();
        match event.tone() {
            Tone::Info => {
                let line = self.style(Style::new().green()).apply_to(line).to_string();
                self.show_status(&line);
            }
            Tone::Comment => {
                let line = self.style(Style::new().yellow()).apply_to(line).to_string();
                self.show_status(&line);
            }
            Tone::Error => {
                let line = self.style(Style::new().red().bold()).apply_to(line).to_string();
                self.show_error(&line);
                if let Some(diagnostics) = event.diagnostics() {
                    for diag_line in diagnostics.lines() {
                        self.show_error(&format!("      {diag_line}"));
                    }
                }
            }
        }
    }

    fn handle_process_event(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Started { program, args } => {
                let line = format!("  $ {}", ProcessEvent::command_line(&program, &args));
                let line = self.style(Style::new().dim()).apply_to(line).to_string();
                self.show_status(&line);
            }
            ProcessEvent::Output {
                stream: OutputStream::Stdout,
                line,
            } => self.show_status(&line),
            ProcessEvent::Output {
                stream: OutputStream::Stderr,
                line,
            } => {
                let line = self.style(Style::new().red()).apply_to(line).to_string();
                self.show_error(&line);
            }
            ProcessEvent::Completed { .. } => {}
        }
    }

    fn handle_general_event(&mut self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                let mut line = format!("Warning: {message}");
                if let Some(context) = context {
                    line.push_str(&format!(" ({context})"));
                }
                let line = self.style(Style::new().yellow()).apply_to(line).to_string();
                self.show_error(&line);
            }
            GeneralEvent::DebugLog { message } => {
                if self.debug_enabled {
                    let line = self
                        .style(Style::new().dim())
                        .apply_to(format!("[debug] {message}"))
                        .to_string();
                    self.show_status(&line);
                }
            }
        }
    }

    // Scaffold events already announce every download; only failures get a line.
    fn handle_download_event(&mut self, event: &DownloadEvent) {
        if let DownloadEvent::Failed { url, failure } = event {
            if self.debug_enabled {
                self.show_error(&format!("  download of {url} failed: {}", failure.message));
            }
        }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors)
    }

    fn show_status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }

    fn show_error(&mut self, line: &str) {
        let _ = writeln!(self.err, "{line}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pscaf_events::{FailureContext, PatchOrigin};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory writer
    #[derive(Clone, Default)]
    pub(crate) struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn handler(json_output: bool, debug_enabled: bool) -> (EventHandler, Buffer, Buffer) {
        let out = Buffer::default();
        let err = Buffer::default();
        let handler = EventHandler::with_writers(
            Box::new(out.clone()),
            Box::new(err.clone()),
            false,
            json_output,
            debug_enabled,
        );
        (handler, out, err)
    }

    fn scaffold(event: ScaffoldEvent) -> EventMessage {
        EventMessage::from_event(AppEvent::Scaffold(event))
    }

    #[test]
    fn test_progress_goes_to_stdout_and_failures_to_stderr() {
        let (mut handler, out, err) = handler(false, false);

        handler.handle_event(scaffold(ScaffoldEvent::Started {
            version: "3.2.1".to_string(),
            build_dir: PathBuf::from("build"),
        }));
        handler.handle_event(scaffold(ScaffoldEvent::PatchCheckFailed {
            file_name: "fix.patch".to_string(),
            origin: PatchOrigin::Remote {
                description: "Fix".to_string(),
                url: "https://example.com/fix.patch".to_string(),
            },
            diagnostics: "error: patch failed: index.php:1\nerror: index.php: patch does not apply"
                .to_string(),
        }));

        assert_eq!(out.contents(), "Scaffolding platform 3.2.1.\n");
        let err = err.contents();
        assert!(err.starts_with("Error while applying a patch: fix.patch\n"));
        assert!(err.contains("      error: patch failed: index.php:1\n"));
        assert!(err.contains("      error: index.php: patch does not apply\n"));
    }

    #[test]
    fn test_fatal_failure_is_left_to_the_caller() {
        let (mut handler, out, err) = handler(false, false);

        handler.handle_event(scaffold(ScaffoldEvent::Failed {
            failure: FailureContext::new(None::<String>, "boom", None::<String>, false),
        }));

        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_json_mode_is_silent() {
        let (mut handler, out, err) = handler(true, true);

        handler.handle_event(EventMessage::from_event(AppEvent::General(
            GeneralEvent::warning_with_context(
                "artifact URL has no {version} placeholder",
                "https://example.com/platform.tar.gz",
            ),
        )));
        handler.handle_event(EventMessage::from_event(AppEvent::Process(
            ProcessEvent::Output {
                stream: OutputStream::Stderr,
                line: "tar: Error".to_string(),
            },
        )));
        handler.handle_event(scaffold(ScaffoldEvent::NoRemotePatches));

        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_debug_lines_need_debug_mode() {
        let (mut quiet, quiet_out, _) = handler(false, false);
        quiet.handle_event(EventMessage::from_event(AppEvent::General(
            GeneralEvent::debug("removed stale artifact"),
        )));
        assert!(quiet_out.contents().is_empty());

        let (mut debug, debug_out, _) = handler(false, true);
        debug.handle_event(EventMessage::from_event(AppEvent::General(
            GeneralEvent::debug("removed stale artifact"),
        )));
        assert_eq!(debug_out.contents(), "[debug] removed stale artifact\n");
    }
}
