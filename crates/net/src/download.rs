//! Streaming file download with progress events

use futures::StreamExt;
use pscaf_errors::{Error, NetworkError};
use pscaf_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::NetClient;

/// Bytes between two progress events
const PROGRESS_INTERVAL: u64 = 256 * 1024;

/// Download operation handle
pub struct Download {
    url: Url,
}

/// Result of a download operation
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub url: String,
    pub size: u64,
}

impl Download {
    /// Create a new download
    ///
    /// # Errors
    ///
    /// Returns an error if the provided URL cannot be parsed.
    pub fn new(url: &str) -> Result<Self, Error> {
        let url = crate::parse_url(url)?;
        Ok(Self { url })
    }

    /// Execute the download, writing the body to `dest`
    ///
    /// An existing file at `dest` is overwritten. On failure nothing is left
    /// at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the file cannot be written.
    pub async fn execute(
        self,
        client: &NetClient,
        dest: &Path,
        tx: &EventSender,
    ) -> Result<DownloadResult, Error> {
        let url = self.url.to_string();

        match self.stream_to_file(client, &url, dest, tx).await {
            Ok(size) => {
                tx.emit(AppEvent::Download(DownloadEvent::Completed {
                    url: url.clone(),
                    dest: dest.to_path_buf(),
                    bytes_downloaded: size,
                }));
                Ok(DownloadResult { url, size })
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(dest).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %dest.display(), error = %cleanup, "failed to remove partial download");
                    }
                }
                tx.emit(AppEvent::Download(DownloadEvent::Failed {
                    url,
                    failure: FailureContext::from_error(&e),
                }));
                Err(e)
            }
        }
    }

    async fn stream_to_file(
        &self,
        client: &NetClient,
        url: &str,
        dest: &Path,
        tx: &EventSender,
    ) -> Result<u64, Error> {
        let response = client.get(self.url.as_str()).await?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            }
            .into());
        }

        let total_bytes = response.content_length();
        tx.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            total_bytes,
        }));

        let mut file = File::create(dest)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;
        let mut last_reported = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::io_with_path(&e, dest))?;

            downloaded += chunk.len() as u64;
            if downloaded - last_reported >= PROGRESS_INTERVAL {
                last_reported = downloaded;
                tx.emit(AppEvent::Download(DownloadEvent::Progress {
                    url: url.to_string(),
                    bytes_downloaded: downloaded,
                    total_bytes,
                }));
            }
        }

        file.flush()
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;

        Ok(downloaded)
    }
}
