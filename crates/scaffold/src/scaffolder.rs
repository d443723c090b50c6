//! Orchestration of a scaffolding run

use pscaf_config::ScaffoldOptions;
use pscaf_errors::{Error, ScaffoldError};
use pscaf_events::{EventEmitter, FailureContext, ScaffoldEvent};
use pscaf_platform::{CommandOutput, PlatformCommand};
use std::time::Instant;

use crate::context::ScaffoldContext;
use crate::paths::ScaffoldPaths;
use crate::report::ScaffoldReport;

/// Runs the scaffolding workflow for one set of options
///
/// Every step is awaited before the next starts. A step that fails fatally
/// aborts the run and leaves whatever state it reached on disk.
pub struct Scaffolder {
    pub(crate) options: ScaffoldOptions,
    pub(crate) paths: ScaffoldPaths,
    pub(crate) ctx: ScaffoldContext,
}

impl Scaffolder {
    #[must_use]
    pub fn new(options: ScaffoldOptions, paths: ScaffoldPaths, ctx: ScaffoldContext) -> Self {
        Self {
            options,
            paths,
            ctx,
        }
    }

    /// Run the whole workflow
    ///
    /// Patch failures are recorded in the report and do not fail the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a required tool is missing, the artifact cannot be
    /// downloaded or extracted, a remote patch cannot be downloaded, or the
    /// build directory cannot be staged. A [`ScaffoldEvent::Failed`] event is
    /// emitted before returning.
    pub async fn run(&self) -> Result<ScaffoldReport, Error> {
        match self.run_steps().await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.ctx.emit_scaffold(ScaffoldEvent::Failed {
                    failure: FailureContext::from_error(&e),
                });
                Err(e)
            }
        }
    }

    async fn run_steps(&self) -> Result<ScaffoldReport, Error> {
        let start = Instant::now();

        self.preflight().await?;
        self.ctx.emit_scaffold(ScaffoldEvent::Started {
            version: self.options.version.clone(),
            build_dir: self.paths.build_dir.clone(),
        });

        let artifact_url = self.download_artifact().await?;
        self.extract_artifact().await?;
        self.remove_artifact_file().await?;

        let mut patches = self.apply_local_patches().await?;
        patches.extend(self.download_and_apply_patches().await?);
        let cleaned = self.remove_downloaded_patches().await?;

        let report = ScaffoldReport {
            artifact_url,
            build_dir: self.paths.build_dir.clone(),
            patches,
            cleaned,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        self.ctx.emit_scaffold(ScaffoldEvent::Completed {
            applied: report.applied_count(),
            failed: report.failed_count(),
            duration_ms: report.duration_ms,
        });

        Ok(report)
    }

    /// Make sure `tar` and `git` resolve before anything is touched
    async fn preflight(&self) -> Result<(), Error> {
        for tool in [&self.ctx.tools.tar, &self.ctx.tools.git] {
            let path = self
                .ctx
                .runner
                .which(tool)
                .await
                .map_err(|_| ScaffoldError::MissingTool { tool: tool.clone() })?;
            tracing::debug!(tool = %tool, path = %path.display(), "found tool");
        }
        Ok(())
    }

    /// Run an external program with its ordered argument list
    ///
    /// The exit status is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        self.ctx
            .runner
            .execute(&self.ctx.platform_context(), cmd)
            .await
    }
}

/// Text worth showing for a failed command: stderr, else stdout
pub(crate) fn diagnostics_of(output: &CommandOutput) -> String {
    let stderr = output.stderr_text();
    let text = if stderr.trim().is_empty() {
        output.stdout_text()
    } else {
        stderr
    };
    text.trim_end().to_string()
}
