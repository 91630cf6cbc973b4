//! Graph snapshot caching.
//!
//! Building a [`RouteGraph`] requires a full source fetch, so built snapshots
//! are cached per service day with a TTL. Snapshots are immutable `Arc`s:
//! requests in flight keep whatever snapshot they started with, and a
//! concurrent rebuild simply replaces the cache entry. Two racing rebuilds
//! produce identical graphs from the same source data, so last-writer-wins
//! is safe.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::ServiceDay;
use crate::schedule::RouteGraph;
use crate::source::{ScheduleSource, SourceError};

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached snapshots.
    pub ttl: Duration,

    /// Maximum number of cached snapshots (one per service day in practice).
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 8,
        }
    }
}

/// Caches built [`RouteGraph`] snapshots in front of a schedule source.
pub struct ScheduleCache {
    source: ScheduleSource,
    hub_stop_name: String,
    graphs: MokaCache<ServiceDay, Arc<RouteGraph>>,
}

impl ScheduleCache {
    /// Create a new cache over the given source.
    ///
    /// `hub_stop_name` is resolved against the stop directory on every
    /// rebuild, keeping the hub reference configuration-driven.
    pub fn new(
        source: ScheduleSource,
        hub_stop_name: impl Into<String>,
        config: &CacheConfig,
    ) -> Self {
        let graphs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            source,
            hub_stop_name: hub_stop_name.into(),
            graphs,
        }
    }

    /// The graph snapshot for a service day, fetching and building on miss.
    pub async fn graph_for(&self, day: ServiceDay) -> Result<Arc<RouteGraph>, SourceError> {
        if let Some(graph) = self.graphs.get(&day).await {
            return Ok(graph);
        }

        debug!(?day, "rebuilding route graph");
        let raw = self.source.fetch().await?;
        let graph = Arc::new(RouteGraph::build(raw, day, Some(&self.hub_stop_name)));

        self.graphs.insert(day, graph.clone()).await;
        Ok(graph)
    }

    /// Drop all cached snapshots, forcing a refetch on next use.
    pub fn invalidate_all(&self) {
        self.graphs.invalidate_all();
    }

    /// Number of cached snapshots (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.graphs.entry_count()
    }
}
