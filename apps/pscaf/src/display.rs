//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use pscaf_config::ColorChoice;
use pscaf_events::PatchOrigin;
use pscaf_scaffold::{PatchOutcome, ScaffoldReport};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render the report of a finished run
    pub fn render_report(&self, report: &ScaffoldReport) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        if !report.patches.is_empty() {
            println!("{}", self.patch_table(report));
        }

        let summary = format!(
            "{} applied, {} failed, {} patch file(s) removed in {}ms",
            report.applied_count(),
            report.failed_count(),
            report.cleaned,
            report.duration_ms
        );
        let style = if report.has_failures() {
            Style::new().yellow()
        } else {
            Style::new().green()
        };
        println!("{}", self.apply(style).apply_to(summary));
        Ok(())
    }

    /// Render the resolved artifact URL
    pub fn render_uri(&self, url: &str) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::json!({ "artifact_url": url });
            println!("{}", serde_json::to_string_pretty(&json).map_err(io::Error::other)?);
        } else {
            println!("{url}");
        }
        Ok(())
    }

    fn patch_table(&self, report: &ScaffoldReport) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }

        table.set_header(vec![
            Cell::new("Patch").add_attribute(Attribute::Bold),
            Cell::new("Origin").add_attribute(Attribute::Bold),
            Cell::new("Outcome").add_attribute(Attribute::Bold),
        ]);

        for patch in &report.patches {
            let origin = match &patch.origin {
                PatchOrigin::Local { .. } => "local".to_string(),
                PatchOrigin::Remote { description, .. } => description.clone(),
            };
            let outcome = match &patch.outcome {
                PatchOutcome::Applied => Cell::new("applied").fg(Color::Green),
                PatchOutcome::CheckFailed { .. } => Cell::new("check failed").fg(Color::Red),
                PatchOutcome::ApplyFailed { .. } => Cell::new("apply failed").fg(Color::Red),
            };
            table.add_row(vec![Cell::new(&patch.file_name), Cell::new(origin), outcome]);
        }

        table
    }

    fn apply(&self, style: Style) -> Style {
        style.force_styling(self.supports_color())
    }

    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
