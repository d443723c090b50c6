//! Download, extraction and removal of the release artifact

use pscaf_errors::{Error, ScaffoldError};
use pscaf_events::{EventEmitter, ScaffoldEvent};
use pscaf_platform::{fs, PlatformCommand};

use crate::scaffolder::{diagnostics_of, Scaffolder};
use crate::uri::artifact_uri;

impl Scaffolder {
    /// Download the artifact to its fixed location, returning the URL used
    ///
    /// # Errors
    ///
    /// Returns an error if a stale artifact cannot be removed or the
    /// download fails.
    pub async fn download_artifact(&self) -> Result<String, Error> {
        let dest = &self.paths.artifact;
        if fs::remove_file_if_exists(dest).await? {
            self.ctx
                .emit_debug(format!("removed stale artifact {}", dest.display()));
        }

        let url = artifact_uri(&self.options);
        self.ctx.emit_scaffold(ScaffoldEvent::ArtifactDownloading {
            url: url.clone(),
            dest: dest.clone(),
        });

        self.ctx
            .fetcher
            .fetch(&url, dest, &self.ctx.event_sender)
            .await
            .map_err(|e| ScaffoldError::ArtifactDownloadFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(url)
    }

    /// Recreate the build directory and unpack the artifact into it
    ///
    /// # Errors
    ///
    /// Returns an error if the build directory cannot be recreated or `tar`
    /// exits non-zero.
    pub async fn extract_artifact(&self) -> Result<(), Error> {
        let build_dir = &self.paths.build_dir;
        fs::recreate_dir(build_dir).await?;

        self.ctx.emit_scaffold(ScaffoldEvent::ArtifactExtracting {
            archive: self.paths.artifact.clone(),
            build_dir: build_dir.clone(),
        });

        let tar = PlatformCommand::new(&self.ctx.tools.tar)
            .arg("-xzvf")
            .path_arg(&self.paths.artifact)
            .arg("--directory")
            .path_arg(build_dir);
        let output = self.execute_command(tar).await?;

        if !output.success() {
            let mut message = diagnostics_of(&output);
            if message.is_empty() {
                message = match output.status.code() {
                    Some(code) => format!("tar exited with status {code}"),
                    None => "tar was terminated by a signal".to_string(),
                };
            }
            return Err(ScaffoldError::ExtractionFailed { message }.into());
        }

        Ok(())
    }

    /// Delete the artifact once it has been extracted
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be removed.
    pub async fn remove_artifact_file(&self) -> Result<(), Error> {
        fs::remove_file(&self.paths.artifact).await?;
        self.ctx.emit_scaffold(ScaffoldEvent::ArtifactRemoved {
            path: self.paths.artifact.clone(),
        });
        Ok(())
    }
}
