//! Scaffolding workflow error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ScaffoldError {
    #[error("artifact download failed from {url}: {message}")]
    ArtifactDownloadFailed { url: String, message: String },

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("patch download failed for {description} ({url}): {message}")]
    PatchDownloadFailed {
        description: String,
        url: String,
        message: String,
    },

    #[error("cannot derive a patch file name from {url}")]
    InvalidPatchUrl { url: String },

    #[error("required tool not available: {tool}")]
    MissingTool { tool: String },
}

impl UserFacingError for ScaffoldError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ArtifactDownloadFailed { .. } => {
                Some("Check artifact.url and version in the manifest, then retry.")
            }
            Self::ExtractionFailed { .. } => {
                Some("Make sure the artifact is a gzip-compressed tarball.")
            }
            Self::PatchDownloadFailed { .. } => Some("Check the patch URL in the manifest."),
            Self::InvalidPatchUrl { .. } => {
                Some("Patch URLs must end with the patch file name, e.g. https://host/fix.patch.")
            }
            Self::MissingTool { .. } => Some("Install tar and git, or configure their paths."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ArtifactDownloadFailed { .. } | Self::PatchDownloadFailed { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ArtifactDownloadFailed { .. } => "scaffold.artifact_download_failed",
            Self::ExtractionFailed { .. } => "scaffold.extraction_failed",
            Self::PatchDownloadFailed { .. } => "scaffold.patch_download_failed",
            Self::InvalidPatchUrl { .. } => "scaffold.invalid_patch_url",
            Self::MissingTool { .. } => "scaffold.missing_tool",
        };
        Some(code)
    }
}
