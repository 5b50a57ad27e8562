use crate::cluster::{ClusterHealth, NodeAddress, ShardSet};
use crate::config::Config;
use crate::engine::EngineSession;
use crate::error::Result;
use std::time::{Duration, Instant};

/// One query's assembled results.
///
/// Constructed fresh per call and handed to the caller; the coordinator
/// retains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Client-measured elapsed time of the engine round trip, in milliseconds.
    pub elapsed_ms: u128,
    /// Matched document identifiers in engine order, bounded by the engine's
    /// default page size.
    pub matches: Vec<String>,
}

impl SearchResult {
    /// Flat row view: elapsed time as a decimal string first, then one
    /// identifier per matched document.
    pub fn rows(&self) -> Vec<String> {
        std::iter::once(self.elapsed_ms.to_string())
            .chain(self.matches.iter().cloned())
            .collect()
    }
}

/// Query target selection: the healthy master when one exists, otherwise the
/// only (or first) listed shard, otherwise nothing.
fn select_target(master: Option<NodeAddress>, shards: Option<&ShardSet>) -> Option<NodeAddress> {
    if let Some(master) = master {
        return Some(master);
    }
    let shards = shards?;
    if shards.is_empty() {
        return None;
    }
    Some(shards.first())
}

/// Query fan-out coordinator.
///
/// Issues exactly one HTTP query per call, carrying the full shard set so
/// the engine merges across shards itself. Stateless across calls.
pub struct Coordinator<H> {
    health: H,
    timeout: Duration,
}

impl<H: ClusterHealth> Coordinator<H> {
    pub fn new(health: H, config: &Config) -> Self {
        Self {
            health,
            timeout: config.engine_timeout(),
        }
    }

    /// Execute one query across the cluster.
    ///
    /// Returns `Ok(None)` when no node is reachable at all (distinct from an
    /// empty match set) and `Ok(Some(..))` once the engine answered. Engine
    /// failures are errors: an unreachable engine is never reported as zero
    /// matches.
    pub async fn search(
        &self,
        query: &str,
        include_contents: bool,
    ) -> Result<Option<SearchResult>> {
        let master = self.health.healthy_master();
        let shards = self.health.shard_list();

        let Some(target) = select_target(master, shards.as_ref()) else {
            log::warn!("search {:?}: no healthy master and no shards", query);
            return Ok(None);
        };

        let session = EngineSession::connect(&target, self.timeout)?;

        let started = Instant::now();
        let matches = session
            .query(query, shards.as_ref(), include_contents)
            .await?;
        let elapsed = started.elapsed();
        log::debug!("query {:?} via {} took {:?}", query, target, elapsed);

        Ok(Some(SearchResult {
            elapsed_ms: elapsed.as_millis(),
            matches,
        }))
    }
}
