use crate::error::{CoordError, Result};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Remote document fetch collaborator.
///
/// Given a remote URL, produces a local path holding the document's bytes.
/// Failures surface as resolution failures on the indexing path.
pub trait Fetcher: Send + Sync {
    /// Download `url` and return the local path of the fetched copy.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// HTTP fetcher spooling downloads into a local directory.
///
/// Spool file names are unique per download but keep the source file name,
/// so extension-based classification still applies to fetched documents.
pub struct HttpFetcher {
    client: reqwest::Client,
    spool_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(spool_dir: PathBuf, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self { client, spool_dir }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PathBuf> {
        log::info!("downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoordError::Resolution(format!("download of {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoordError::Resolution(format!(
                "download of {} failed with status {}",
                url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoordError::Resolution(format!("download of {} failed: {}", url, e)))?;

        tokio::fs::create_dir_all(&self.spool_dir).await?;
        let path = self.spool_dir.join(spool_file_name(url));
        tokio::fs::write(&path, &bytes).await?;
        log::debug!("spooled {} to {}", url, path.display());
        Ok(path)
    }
}

/// Unique spool file name preserving the source file name.
fn spool_file_name(url: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or("");
    let source_name = last_segment
        .split(['?', '#'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{}-{}", Uuid::new_v4(), source_name)
}
