//! Document reference resolution: local paths pass through unchanged, remote
//! references go through the fetch collaborator.

use crate::error::Result;
use crate::fetch::Fetcher;
use std::path::PathBuf;

/// Scheme prefix classifying a reference as remote.
const REMOTE_SCHEME: &str = "http://";

/// A document reference as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReference {
    Local(PathBuf),
    Remote(String),
}

impl DocumentReference {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(REMOTE_SCHEME) {
            DocumentReference::Remote(raw.to_string())
        } else {
            DocumentReference::Local(PathBuf::from(raw))
        }
    }
}

/// Resolve a reference to a local path ready for ingestion.
///
/// Fetch failures propagate as resolution failures. Existence of the
/// resolved path is deliberately not checked here; the dispatcher validates
/// it before building the update request.
pub async fn resolve<F: Fetcher>(reference: &str, fetcher: &F) -> Result<PathBuf> {
    match DocumentReference::parse(reference) {
        DocumentReference::Remote(url) => fetcher.fetch(&url).await,
        DocumentReference::Local(path) => Ok(path),
    }
}
