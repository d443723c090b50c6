//! Staging, applying and cleaning up patches

use pscaf_config::constants::PATCH_GLOB;
use pscaf_errors::{Error, ScaffoldError};
use pscaf_events::{EventEmitter, PatchOrigin, ScaffoldEvent};
use pscaf_platform::{fs, PlatformCommand};

use crate::report::{PatchOutcome, PatchReport};
use crate::scaffolder::{diagnostics_of, Scaffolder};
use crate::uri::patch_file_name;

impl Scaffolder {
    /// Apply every file found below the bundled patch directory
    ///
    /// Files are copied into the build directory under their own name
    /// first. A missing directory means there is nothing to apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed, a patch cannot be
    /// copied, or `git` cannot be started.
    pub async fn apply_local_patches(&self) -> Result<Vec<PatchReport>, Error> {
        let patches_dir = &self.paths.patches_dir;
        if !tokio::fs::metadata(patches_dir)
            .await
            .is_ok_and(|meta| meta.is_dir())
        {
            self.ctx.emit_scaffold(ScaffoldEvent::LocalPatchesMissing {
                patches_dir: patches_dir.clone(),
            });
            return Ok(Vec::new());
        }

        let sources = fs::list_files(patches_dir).await?;
        self.ctx.emit_scaffold(ScaffoldEvent::LocalPatchesStarted {
            patches_dir: patches_dir.clone(),
            count: sources.len(),
        });

        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            let file_name = fs::copy_into(&source, &self.paths.build_dir).await?;
            self.ctx.emit_scaffold(ScaffoldEvent::LocalPatchApplying {
                file_name: file_name.clone(),
            });
            let origin = PatchOrigin::Local { source };
            let outcome = self.apply_patch(&file_name, &origin).await?;
            reports.push(PatchReport {
                file_name,
                origin,
                outcome,
            });
        }

        Ok(reports)
    }

    /// Download each declared patch into the build directory and apply it
    ///
    /// Patches are processed in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a patch URL has no file name, a download fails,
    /// or `git` cannot be started.
    pub async fn download_and_apply_patches(&self) -> Result<Vec<PatchReport>, Error> {
        let Some(declared) = self.options.patches.as_ref().filter(|p| !p.is_empty()) else {
            self.ctx.emit_scaffold(ScaffoldEvent::NoRemotePatches);
            return Ok(Vec::new());
        };

        self.ctx.emit_scaffold(ScaffoldEvent::RemotePatchesStarted {
            count: declared.len(),
        });

        let mut reports = Vec::with_capacity(declared.len());
        for (description, url) in declared {
            let file_name = patch_file_name(url)?;
            self.ctx.emit_scaffold(ScaffoldEvent::RemotePatchDownloading {
                description: description.clone(),
                url: url.clone(),
            });

            let dest = self.paths.build_dir.join(&file_name);
            self.ctx
                .fetcher
                .fetch(url, &dest, &self.ctx.event_sender)
                .await
                .map_err(|e| ScaffoldError::PatchDownloadFailed {
                    description: description.clone(),
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            self.ctx.emit_scaffold(ScaffoldEvent::RemotePatchApplying {
                file_name: file_name.clone(),
            });
            let origin = PatchOrigin::Remote {
                description: description.clone(),
                url: url.clone(),
            };
            let outcome = self.apply_patch(&file_name, &origin).await?;
            reports.push(PatchReport {
                file_name,
                origin,
                outcome,
            });
        }

        Ok(reports)
    }

    /// Delete every `*.patch` file directly inside the build directory
    ///
    /// # Errors
    ///
    /// Returns an error if the build directory cannot be read or a file
    /// cannot be removed.
    pub async fn remove_downloaded_patches(&self) -> Result<usize, Error> {
        let removed = fs::remove_matching(&self.paths.build_dir, PATCH_GLOB).await?;
        self.ctx.emit_scaffold(ScaffoldEvent::PatchesCleaned {
            build_dir: self.paths.build_dir.clone(),
            removed,
        });
        Ok(removed)
    }

    /// Dry-run a staged patch and apply it when the check passes
    ///
    /// `file_name` is relative to the build directory. A failed check skips
    /// the real apply. Neither failure is an error; both are reported as
    /// events and returned as the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only if `git` cannot be started.
    pub async fn apply_patch(
        &self,
        file_name: &str,
        origin: &PatchOrigin,
    ) -> Result<PatchOutcome, Error> {
        let git = || {
            PlatformCommand::new(&self.ctx.tools.git)
                .arg("-C")
                .path_arg(&self.paths.build_dir)
                .arg("apply")
        };

        let check = self
            .execute_command(git().args(["--check", "-v", file_name]))
            .await?;
        if !check.success() {
            let diagnostics = diagnostics_of(&check);
            self.ctx.emit_scaffold(ScaffoldEvent::PatchCheckFailed {
                file_name: file_name.to_string(),
                origin: origin.clone(),
                diagnostics: diagnostics.clone(),
            });
            return Ok(PatchOutcome::CheckFailed { diagnostics });
        }

        let apply = self.execute_command(git().arg(file_name)).await?;
        if !apply.success() {
            let diagnostics = diagnostics_of(&apply);
            self.ctx.emit_scaffold(ScaffoldEvent::PatchApplyFailed {
                file_name: file_name.to_string(),
                origin: origin.clone(),
                diagnostics: diagnostics.clone(),
            });
            return Ok(PatchOutcome::ApplyFailed { diagnostics });
        }

        self.ctx.emit_scaffold(ScaffoldEvent::PatchApplied {
            file_name: file_name.to_string(),
            origin: origin.clone(),
        });
        Ok(PatchOutcome::Applied)
    }
}
