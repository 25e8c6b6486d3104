//! Catalog provider boundary
//!
//! Defines the records returned by external add-on catalogs and the
//! capability trait every catalog backend implements.

pub mod cache;
pub mod curse;
pub mod registry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ChannelType, ClientType};

pub use registry::ProviderRegistry;

/// A lightweight catalog search hit used for discovery and browsing.
///
/// Not tied to any local folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialAddon {
    pub provider_name: String,
    pub external_id: String,
    pub name: String,
    pub author: Option<String>,
    pub thumbnail_url: Option<String>,
    pub external_url: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub download_count: u64,
}

/// One downloadable release of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSearchResultFile {
    pub channel_type: ChannelType,
    pub version: String,
    pub download_url: String,
    pub game_version: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

/// Full catalog record for one external id.
///
/// `files` ordering is provider-defined; the engine trusts it to list
/// releases newest-first within each channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSearchResult {
    pub provider_name: String,
    pub external_id: String,
    pub name: String,
    pub author: Option<String>,
    pub thumbnail_url: Option<String>,
    pub external_url: Option<String>,
    pub files: Vec<AddonSearchResultFile>,
}

/// Catalog failures callers may need to match on. Everything else flows
/// as a plain `anyhow::Error`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog entry for {namespace}:{external_id}")]
    NotFound {
        namespace: String,
        external_id: String,
    },

    #[error("catalog request failed with HTTP {status}: {url}")]
    Http { status: u16, url: String },
}

/// Capability interface implemented by every catalog backend.
///
/// Reads must be idempotent; caching is the implementation's own policy
/// (see [`cache::SearchResultCache`] for the injected capability the
/// bundled adapter uses).
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The external-id namespace this provider owns in descriptor
    /// metadata (e.g. `"curse"`).
    fn name(&self) -> &'static str;

    /// Provider-curated featured listing in the provider's own ranking.
    /// Must not fail on empty results.
    async fn get_featured(&self, client_type: ClientType) -> anyhow::Result<Vec<PotentialAddon>>;

    /// Free-text search in the provider's own ranking.
    async fn search(
        &self,
        query: &str,
        client_type: ClientType,
    ) -> anyhow::Result<Vec<PotentialAddon>>;

    /// Full record for one external id, with every known file tagged
    /// with channel and version.
    async fn get_by_id(
        &self,
        external_id: &str,
        client_type: ClientType,
    ) -> anyhow::Result<AddonSearchResult>;
}
