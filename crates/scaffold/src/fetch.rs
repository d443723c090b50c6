//! Download seam of the workflow

use async_trait::async_trait;
use pscaf_errors::Error;
use pscaf_events::EventSender;
use pscaf_net::NetClient;
use std::path::Path;

/// Saves the body behind a URL to a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` to `dest`, overwriting it, and return the byte count
    ///
    /// Nothing is left at `dest` when the download fails.
    async fn fetch(&self, url: &str, dest: &Path, tx: &EventSender) -> Result<u64, Error>;
}

/// HTTP fetcher backed by [`NetClient`]
#[derive(Clone)]
pub struct NetFetcher {
    client: NetClient,
}

impl NetFetcher {
    #[must_use]
    pub fn new(client: NetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for NetFetcher {
    async fn fetch(&self, url: &str, dest: &Path, tx: &EventSender) -> Result<u64, Error> {
        let result = pscaf_net::download_file(&self.client, url, dest, tx).await?;
        Ok(result.size)
    }
}
