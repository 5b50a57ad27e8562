pub mod classifier;
pub mod resolver;

pub use classifier::{classify, IngestionProfile};
pub use resolver::{resolve, DocumentReference};

use crate::cluster::ClusterHealth;
use crate::config::Config;
use crate::engine::EngineSession;
use crate::error::{CoordError, Result};
use crate::fetch::Fetcher;
use std::time::Duration;

/// Identity components stamped onto every ingested document.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user: config.cluster.user.clone(),
            host: config.cluster.host.clone(),
        }
    }

    /// Engine-visible primary key for a document: `user@host:reference`.
    ///
    /// Derived from the original reference, not the resolved spool path, so
    /// the identifier stays stable for a given source.
    pub fn document_id(&self, reference: &str) -> String {
        format!("{}@{}:{}", self.user, self.host, reference)
    }
}

/// Indexing dispatcher: routes one document to the currently healthy master.
///
/// Stateless across calls; every invocation performs its own master lookup,
/// session setup, and teardown, so concurrent calls are independent.
pub struct Dispatcher<H, F> {
    health: H,
    fetcher: F,
    identity: Identity,
    timeout: Duration,
}

impl<H: ClusterHealth, F: Fetcher> Dispatcher<H, F> {
    pub fn new(health: H, fetcher: F, config: &Config) -> Self {
        Self {
            health,
            fetcher,
            identity: Identity::from_config(config),
            timeout: config.engine_timeout(),
        }
    }

    /// Index one document against the currently healthy master.
    ///
    /// Atomic from the caller's perspective: either the engine acknowledges
    /// the committed and optimized update, or the whole call fails. No
    /// retries happen at this layer; re-invoking performs a fresh master
    /// lookup, which is the right thing when liveness may have changed.
    pub async fn index(&self, reference: &str) -> Result<()> {
        let master = self.health.healthy_master().ok_or_else(|| {
            log::error!("index {}: no healthy master", reference);
            CoordError::NoHealthyMaster
        })?;

        let session = EngineSession::connect(&master, self.timeout)?;

        match DocumentReference::parse(reference) {
            DocumentReference::Remote(_) => {
                log::info!("remote document {} to host {}", reference, master)
            }
            DocumentReference::Local(_) => {
                log::info!("local document {} to host {}", reference, master)
            }
        }

        let local = resolver::resolve(reference, &self.fetcher).await.map_err(|e| {
            log::error!("index {}: {}", reference, e);
            e
        })?;

        if !local.exists() {
            log::error!(
                "index {}: resolved file not found at {}",
                reference,
                local.display()
            );
            return Err(CoordError::Resolution(format!(
                "file not found: {}",
                local.display()
            )));
        }

        let file_name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let profile = classifier::classify(&file_name);
        let identity = self.identity.document_id(reference);

        session.update(profile, &local, &identity).await.map_err(|e| {
            log::error!("index {} via {}: {}", reference, master, e);
            e
        })?;

        log::info!("indexed {} as {}", reference, identity);
        Ok(())
    }

    /// Remove every document from the index on the currently healthy master.
    pub async fn delete_all(&self) -> Result<()> {
        let master = self.health.healthy_master().ok_or_else(|| {
            log::error!("delete-all: no healthy master");
            CoordError::NoHealthyMaster
        })?;
        let session = EngineSession::connect(&master, self.timeout)?;
        session.delete_all().await.map_err(|e| {
            log::error!("delete-all via {}: {}", master, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{NodeAddress, StaticClusterView};
    use crate::config::ClusterConfig;
    use crate::testutil::spawn_engine_stub;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct PanicFetcher;

    impl Fetcher for PanicFetcher {
        async fn fetch(&self, url: &str) -> Result<PathBuf> {
            panic!("fetch must not be called for {}", url);
        }
    }

    struct FailingFetcher;

    impl Fetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<PathBuf> {
            Err(CoordError::Resolution(format!("download of {} failed", url)))
        }
    }

    fn test_config() -> Config {
        Config {
            cluster: ClusterConfig {
                master: None,
                shards: vec![],
                user: "alice".to_string(),
                host: "h1".to_string(),
            },
            fetch: Default::default(),
            engine: Default::default(),
        }
    }

    fn view_with_master(addr: &str) -> StaticClusterView {
        StaticClusterView::new(Some(NodeAddress::new(addr)), None)
    }

    #[test]
    fn test_document_id_format() {
        let identity = Identity {
            user: "alice".to_string(),
            host: "h1".to_string(),
        };
        assert_eq!(
            identity.document_id("/tmp/doc.json"),
            "alice@h1:/tmp/doc.json"
        );
    }

    #[tokio::test]
    async fn test_index_without_master_fails_before_resolution() {
        let view = StaticClusterView::new(None, None);
        let dispatcher = Dispatcher::new(view, PanicFetcher, &test_config());
        let err = dispatcher.index("http://h1/doc.json").await.unwrap_err();
        assert!(matches!(err, CoordError::NoHealthyMaster));
    }

    #[tokio::test]
    async fn test_index_malformed_master_address() {
        let view = view_with_master("localhost:notaport");
        let dispatcher = Dispatcher::new(view, PanicFetcher, &test_config());
        let err = dispatcher.index("/tmp/doc.json").await.unwrap_err();
        assert!(matches!(err, CoordError::MalformedEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_index_missing_local_file_skips_submission() {
        // 127.0.0.1:9 has no listener; a submission attempt would error
        // differently, so a Resolution error proves we never got that far.
        let view = view_with_master("127.0.0.1:9");
        let dispatcher = Dispatcher::new(view, PanicFetcher, &test_config());
        let err = dispatcher
            .index("/definitely/not/a/real/file.json")
            .await
            .unwrap_err();
        assert!(matches!(err, CoordError::Resolution(_)));
    }

    #[tokio::test]
    async fn test_index_remote_fetch_failure_skips_submission() {
        let view = view_with_master("127.0.0.1:9");
        let dispatcher = Dispatcher::new(view, FailingFetcher, &test_config());
        let err = dispatcher.index("http://h9/doc.json").await.unwrap_err();
        assert!(matches!(err, CoordError::Resolution(_)));
    }

    #[tokio::test]
    async fn test_index_local_document() {
        let mut stub = spawn_engine_stub("200 OK", String::new()).await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"title": "hello"}"#).unwrap();
        let reference = path.to_string_lossy().into_owned();

        let dispatcher =
            Dispatcher::new(view_with_master(&stub.address()), PanicFetcher, &test_config());
        dispatcher.index(&reference).await.unwrap();

        let raw = stub.requests.recv().await.unwrap();
        assert!(raw.starts_with("POST /update/json"));
        assert!(raw.contains("literal.id=alice%40h1%3A"));
        assert!(raw.contains("commit=true"));
        assert!(raw.contains("optimize=true"));
    }

    #[tokio::test]
    async fn test_index_engine_rejection_is_engine_failure() {
        let mut stub = spawn_engine_stub("500 Internal Server Error", String::new()).await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "plain text").unwrap();

        let dispatcher =
            Dispatcher::new(view_with_master(&stub.address()), PanicFetcher, &test_config());
        let err = dispatcher
            .index(&path.to_string_lossy())
            .await
            .unwrap_err();
        assert!(matches!(err, CoordError::Engine(_)));
        let _ = stub.requests.recv().await;
    }

    #[tokio::test]
    async fn test_delete_all_without_master() {
        let view = StaticClusterView::new(None, None);
        let dispatcher = Dispatcher::new(view, PanicFetcher, &test_config());
        let err = dispatcher.delete_all().await.unwrap_err();
        assert!(matches!(err, CoordError::NoHealthyMaster));
    }

    #[tokio::test]
    async fn test_delete_all_targets_master() {
        let mut stub = spawn_engine_stub("200 OK", String::new()).await;
        let dispatcher =
            Dispatcher::new(view_with_master(&stub.address()), PanicFetcher, &test_config());
        dispatcher.delete_all().await.unwrap();

        let raw = stub.requests.recv().await.unwrap();
        assert!(raw.starts_with("POST /update/json"));
    }
}
