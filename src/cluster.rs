use crate::config::ClusterConfig;
use std::fmt;

/// A reachable search-engine endpoint, `host[:port]`.
///
/// Transient: resolved fresh from the health oracle on every operation and
/// never cached by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddress(String);

impl NodeAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL for an HTTP session against this node.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered shard address list, kept in its comma-joined transport encoding.
///
/// Semantically a set, but order matters on the wire: when no master is
/// available the first address is the fallback query target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSet(String);

impl ShardSet {
    /// Build from the comma-joined transport form.
    pub fn from_param(param: impl Into<String>) -> Self {
        Self(param.into())
    }

    /// Build from individual node addresses, preserving order.
    pub fn from_nodes(nodes: &[String]) -> Self {
        Self(nodes.join(","))
    }

    /// The comma-joined form sent as the engine's `shards` parameter.
    pub fn as_param(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first address by string position, before the first separator.
    /// When the set holds a single address this is the whole string.
    pub fn first(&self) -> NodeAddress {
        match self.0.find(',') {
            Some(idx) => NodeAddress::new(&self.0[..idx]),
            None => NodeAddress::new(self.0.as_str()),
        }
    }
}

impl fmt::Display for ShardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cluster health oracle consumed by the coordinator.
///
/// Implementations expose a current view of cluster membership; the refresh
/// policy behind that view is theirs. The coordinator asks fresh on every
/// call and never caches an answer.
pub trait ClusterHealth: Send + Sync {
    /// Address of the currently healthy master, if any.
    fn healthy_master(&self) -> Option<NodeAddress>;

    /// Current shard address list, if known.
    fn shard_list(&self) -> Option<ShardSet>;
}

/// Fixed cluster view loaded from configuration.
///
/// Suitable for deployments where membership is managed out of band; it
/// never refreshes. Anything that tracks liveness for real implements
/// [`ClusterHealth`] over its own membership state.
#[derive(Debug, Clone)]
pub struct StaticClusterView {
    master: Option<NodeAddress>,
    shards: Option<ShardSet>,
}

impl StaticClusterView {
    pub fn new(master: Option<NodeAddress>, shards: Option<ShardSet>) -> Self {
        Self { master, shards }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        let master = config.master.as_deref().map(NodeAddress::new);
        let shards = if config.shards.is_empty() {
            None
        } else {
            Some(ShardSet::from_nodes(&config.shards))
        };
        Self { master, shards }
    }
}

impl ClusterHealth for StaticClusterView {
    fn healthy_master(&self) -> Option<NodeAddress> {
        self.master.clone()
    }

    fn shard_list(&self) -> Option<ShardSet> {
        self.shards.clone()
    }
}
