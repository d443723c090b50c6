use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// HTTP download lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    Started {
        url: String,
        dest: PathBuf,
        total_bytes: Option<u64>,
    },

    Progress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    Completed {
        url: String,
        dest: PathBuf,
        bytes_downloaded: u64,
    },

    Failed {
        url: String,
        failure: FailureContext,
    },
}
