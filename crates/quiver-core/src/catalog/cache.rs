//! TTL cache for catalog lookups.
//!
//! Keyed by (namespace, external id, client type); owned by the provider
//! adapter that interposes it, not by any global state.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::ClientType;

use super::AddonSearchResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    namespace: String,
    external_id: String,
    client_type: ClientType,
}

#[derive(Debug)]
struct CacheEntry {
    result: AddonSearchResult,
    cached_at: DateTime<Utc>,
}

/// Memoizes full search results for a bounded time.
///
/// An entry is fresh while `now - cached_at < ttl`; a zero TTL disables
/// caching entirely.
#[derive(Debug)]
pub struct SearchResultCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl SearchResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_ttl_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh entry. Stale entries are treated as misses and
    /// left in place for the next insert to replace.
    pub async fn get(
        &self,
        namespace: &str,
        external_id: &str,
        client_type: ClientType,
    ) -> Option<AddonSearchResult> {
        let key = CacheKey {
            namespace: namespace.to_string(),
            external_id: external_id.to_string(),
            client_type,
        };

        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if Utc::now() - entry.cached_at < self.ttl {
            debug!(namespace, external_id, %client_type, "catalog cache hit");
            Some(entry.result.clone())
        } else {
            debug!(namespace, external_id, %client_type, "catalog cache entry expired");
            None
        }
    }

    pub async fn insert(
        &self,
        namespace: &str,
        external_id: &str,
        client_type: ClientType,
        result: AddonSearchResult,
    ) {
        let key = CacheKey {
            namespace: namespace.to_string(),
            external_id: external_id.to_string(),
            client_type,
        };

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                result,
                cached_at: Utc::now(),
            },
        );
    }

    /// Drop every entry older than the TTL.
    pub async fn purge_expired(&self) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now - entry.cached_at < self.ttl);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
