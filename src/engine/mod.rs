pub mod wire;

use crate::cluster::{NodeAddress, ShardSet};
use crate::error::{CoordError, Result};
use crate::ingest::classifier::IngestionProfile;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Call-local HTTP session against one search-engine node.
///
/// Constructed for a single indexing or query call and dropped afterwards;
/// no connection state is shared across calls, so concurrent callers never
/// contend on a session.
#[derive(Debug)]
pub struct EngineSession {
    client: reqwest::Client,
    base: Url,
}

impl EngineSession {
    /// Establish a session against the node.
    ///
    /// Fails only when the address cannot be parsed into a base URL; no
    /// network traffic happens here.
    pub fn connect(addr: &NodeAddress, timeout: Duration) -> Result<Self> {
        let raw = addr.base_url();
        log::info!("creating session with {}", raw);
        let base = Url::parse(&raw).map_err(|source| {
            log::error!("malformed node address {}", addr);
            CoordError::MalformedEndpoint {
                address: addr.as_str().to_string(),
                source,
            }
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|source| CoordError::MalformedEndpoint {
            address: self.base.to_string(),
            source,
        })
    }

    /// Submit a document for indexing, committing and optimizing as part of
    /// the same request.
    ///
    /// Carries the file bytes, the derived identifier as a literal field, and
    /// the directive mapping extracted content into the single searchable
    /// content field. Does not return success until the engine acknowledges.
    pub async fn update(
        &self,
        profile: IngestionProfile,
        file: &Path,
        identity: &str,
    ) -> Result<()> {
        let mut url = self.endpoint(profile.endpoint())?;
        url.query_pairs_mut()
            .append_pair("literal.id", identity)
            .append_pair("fmap.content", "attr_content")
            .append_pair("commit", "true")
            .append_pair("optimize", "true");

        let bytes = tokio::fs::read(file).await?;

        let response = self
            .client
            .post(url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| CoordError::Engine(format!("update request to {} failed: {}", self.base, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CoordError::Engine(format!(
                "engine update error {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    /// Execute one query against this node.
    ///
    /// The full shard set rides along as the `shards` parameter, so the
    /// engine performs its own fan-out and merge; exactly one HTTP query is
    /// issued regardless of shard count. `include_contents` widens the
    /// returned field list from the identifier alone to identifier plus
    /// extracted content.
    pub async fn query(
        &self,
        query: &str,
        shards: Option<&ShardSet>,
        include_contents: bool,
    ) -> Result<Vec<String>> {
        let mut url = self.endpoint("/select")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(shards) = shards.filter(|s| !s.is_empty()) {
                pairs.append_pair("shards", shards.as_param());
            }
            let fl = if include_contents { "id,attr_content" } else { "id" };
            pairs.append_pair("fl", fl);
            pairs.append_pair("wt", "json");
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoordError::Engine(format!("query to {} failed: {}", self.base, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CoordError::Engine(format!(
                "engine query error {}: {}",
                status, body
            )));
        }

        let parsed: wire::SelectResponse = response
            .json()
            .await
            .map_err(|e| CoordError::Engine(format!("Failed to parse query response: {}", e)))?;

        if let Some(header) = &parsed.header {
            log::debug!("engine reported QTime {} ms", header.q_time);
        }
        Ok(parsed.doc_ids())
    }

    /// Remove every document from the index, with commit.
    pub async fn delete_all(&self) -> Result<()> {
        let mut url = self.endpoint("/update/json")?;
        url.query_pairs_mut().append_pair("commit", "true");
        let body = serde_json::json!({ "delete": { "query": "*:*" } });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoordError::Engine(format!("delete request to {} failed: {}", self.base, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CoordError::Engine(format!(
                "engine delete error {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}
