use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::FailureContext;

/// Where a patch came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatchOrigin {
    /// Bundled with the tool
    Local { source: PathBuf },
    /// Declared in the manifest and downloaded
    Remote { description: String, url: String },
}

impl fmt::Display for PatchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { .. } => f.write_str("local"),
            Self::Remote { description, .. } => write!(f, "remote ({description})"),
        }
    }
}

/// Console severity marker of a scaffold event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Comment,
    Error,
}

/// Scaffolding workflow events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScaffoldEvent {
    Started {
        version: String,
        build_dir: PathBuf,
    },

    ArtifactDownloading {
        url: String,
        dest: PathBuf,
    },

    ArtifactExtracting {
        archive: PathBuf,
        build_dir: PathBuf,
    },

    ArtifactRemoved {
        path: PathBuf,
    },

    LocalPatchesStarted {
        patches_dir: PathBuf,
        count: usize,
    },

    /// The bundled patch directory does not exist
    LocalPatchesMissing {
        patches_dir: PathBuf,
    },

    LocalPatchApplying {
        file_name: String,
    },

    RemotePatchesStarted {
        count: usize,
    },

    NoRemotePatches,

    RemotePatchDownloading {
        description: String,
        url: String,
    },

    RemotePatchApplying {
        file_name: String,
    },

    PatchApplied {
        file_name: String,
        origin: PatchOrigin,
    },

    /// `git apply --check` rejected the patch; the real apply was skipped
    PatchCheckFailed {
        file_name: String,
        origin: PatchOrigin,
        diagnostics: String,
    },

    /// The check passed but the real apply exited non-zero
    PatchApplyFailed {
        file_name: String,
        origin: PatchOrigin,
        diagnostics: String,
    },

    PatchesCleaned {
        build_dir: PathBuf,
        removed: usize,
    },

    Completed {
        applied: usize,
        failed: usize,
        duration_ms: u64,
    },

    Failed {
        failure: FailureContext,
    },
}

impl ScaffoldEvent {
    /// Severity marker used by the console renderer
    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Started { .. }
            | Self::NoRemotePatches
            | Self::PatchesCleaned { .. }
            | Self::Completed { .. } => Tone::Info,
            Self::PatchCheckFailed { .. } | Self::PatchApplyFailed { .. } | Self::Failed { .. } => {
                Tone::Error
            }
            _ => Tone::Comment,
        }
    }

    /// Human-readable progress line
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Started { version, .. } => format!("Scaffolding platform {version}."),
            Self::ArtifactDownloading { url, .. } => format!("  Downloading artifact: {url}"),
            Self::ArtifactExtracting { build_dir, .. } => {
                format!("  Extracting artifact into {}", build_dir.display())
            }
            Self::ArtifactRemoved { path } => format!("  Removed {}", path.display()),
            Self::LocalPatchesStarted { .. } => "  Applying local patches".to_string(),
            Self::LocalPatchesMissing { patches_dir } => format!(
                "  No local patches directory at {}",
                patches_dir.display()
            ),
            Self::LocalPatchApplying { file_name } => {
                format!("    Applying local patch: {file_name}")
            }
            Self::RemotePatchesStarted { .. } => "  Downloading and applying patches".to_string(),
            Self::NoRemotePatches => "There are no remote patches to apply.".to_string(),
            Self::RemotePatchDownloading { description, .. } => {
                format!("    Downloading patch: {description}")
            }
            Self::RemotePatchApplying { .. } => "    Applying...".to_string(),
            Self::PatchApplied { file_name, .. } => format!("    Applied {file_name}"),
            Self::PatchCheckFailed { file_name, .. } => {
                format!("Error while applying a patch: {file_name}")
            }
            Self::PatchApplyFailed { file_name, .. } => {
                format!("Patch passed the check but did not apply: {file_name}")
            }
            Self::PatchesCleaned { removed, .. } => format!("  Removed {removed} patch file(s)"),
            Self::Completed { failed: 0, .. } => "Scaffolding process completed.".to_string(),
            Self::Completed { failed, .. } => {
                format!("Scaffolding process completed with {failed} failed patch(es).")
            }
            Self::Failed { failure } => format!("Scaffolding failed: {}", failure.message),
        }
    }

    /// Captured diagnostic text, when the event carries any
    #[must_use]
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::PatchCheckFailed { diagnostics, .. }
            | Self::PatchApplyFailed { diagnostics, .. } => Some(diagnostics.as_str()),
            _ => None,
        }
    }
}
