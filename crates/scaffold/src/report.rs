//! Outcome of a scaffolding run

use pscaf_events::PatchOrigin;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of applying one patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchOutcome {
    Applied,
    /// `git apply --check` rejected the patch; it was not applied
    CheckFailed { diagnostics: String },
    /// The check passed but the real apply did not
    ApplyFailed { diagnostics: String },
}

impl PatchOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Applied => None,
            Self::CheckFailed { diagnostics } | Self::ApplyFailed { diagnostics } => {
                Some(diagnostics)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchReport {
    pub file_name: String,
    pub origin: PatchOrigin,
    pub outcome: PatchOutcome,
}

/// Summary of a completed run, local patches first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldReport {
    pub artifact_url: String,
    pub build_dir: PathBuf,
    pub patches: Vec<PatchReport>,
    /// Number of `*.patch` files removed from the build directory
    pub cleaned: usize,
    pub duration_ms: u64,
}

impl ScaffoldReport {
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.patches.iter().filter(|p| p.outcome.is_applied()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.patches.len() - self.applied_count()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}
