//! ForgeSvc ("curse") catalog adapter
//!
//! Talks to the addons-ecs.forgesvc.net v2 API and maps its records onto
//! the catalog model. Full-record lookups are interposed through the
//! injected TTL cache.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::types::{ChannelType, ClientType};

use super::cache::SearchResultCache;
use super::{
    AddonSearchResult, AddonSearchResultFile, CatalogError, CatalogProvider, PotentialAddon,
};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://addons-ecs.forgesvc.net/api/v2";

/// ForgeSvc game id for the supported game.
const GAME_ID: u32 = 1;

const FEATURED_COUNT: u32 = 6;
const POPULAR_COUNT: u32 = 50;
const SEARCH_PAGE_SIZE: u32 = 50;

/// Catalog provider backed by the ForgeSvc API.
pub struct CurseProvider {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<SearchResultCache>,
}

impl CurseProvider {
    pub fn new(cache: Arc<SearchResultCache>) -> anyhow::Result<Self> {
        Self::with_base_url(
            Url::parse(DEFAULT_BASE_URL).context("Failed to parse default catalog URL")?,
            cache,
        )
    }

    pub fn with_base_url(base_url: Url, cache: Arc<SearchResultCache>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quiver/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            cache,
        })
    }

    async fn fetch_addon(
        &self,
        external_id: &str,
        client_type: ClientType,
    ) -> anyhow::Result<AddonSearchResult> {
        let url = format!("{}/addon/{}", self.base_url, external_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                namespace: self.name().to_string(),
                external_id: external_id.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(CatalogError::Http {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let addon: CurseAddon = response
            .json()
            .await
            .with_context(|| format!("Failed to parse catalog response from {}", url))?;

        Ok(map_search_result(addon, client_type))
    }
}

#[async_trait]
impl CatalogProvider for CurseProvider {
    fn name(&self) -> &'static str {
        "curse"
    }

    async fn get_featured(&self, client_type: ClientType) -> anyhow::Result<Vec<PotentialAddon>> {
        let url = format!("{}/addon/featured", self.base_url);
        let body = serde_json::json!({
            "gameId": GAME_ID,
            "featuredCount": FEATURED_COUNT,
            "popularCount": POPULAR_COUNT,
            "updatedCount": 0,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", url))?;
        if !response.status().is_success() {
            return Err(CatalogError::Http {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let featured: CurseFeaturedResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse catalog response from {}", url))?;

        let mut seen = std::collections::HashSet::new();
        let addons = featured
            .featured
            .into_iter()
            .chain(featured.popular)
            .filter(|addon| seen.insert(addon.id))
            .filter(|addon| supports_client_type(addon, client_type))
            .map(map_potential_addon)
            .collect();
        Ok(addons)
    }

    async fn search(
        &self,
        query: &str,
        client_type: ClientType,
    ) -> anyhow::Result<Vec<PotentialAddon>> {
        let url = format!("{}/addon/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("gameId", GAME_ID.to_string()),
                ("pageSize", SEARCH_PAGE_SIZE.to_string()),
                ("searchFilter", query.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", url))?;
        if !response.status().is_success() {
            return Err(CatalogError::Http {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let addons: Vec<CurseAddon> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse catalog response from {}", url))?;

        Ok(addons
            .into_iter()
            .filter(|addon| supports_client_type(addon, client_type))
            .map(map_potential_addon)
            .collect())
    }

    async fn get_by_id(
        &self,
        external_id: &str,
        client_type: ClientType,
    ) -> anyhow::Result<AddonSearchResult> {
        if let Some(cached) = self.cache.get(self.name(), external_id, client_type).await {
            return Ok(cached);
        }

        debug!(external_id, %client_type, "catalog cache miss, fetching");
        let result = self.fetch_addon(external_id, client_type).await?;
        self.cache
            .insert(self.name(), external_id, client_type, result.clone())
            .await;
        Ok(result)
    }
}

/// The version flavor tag ForgeSvc attaches to files.
fn game_version_flavor(client_type: ClientType) -> &'static str {
    match client_type {
        ClientType::Retail | ClientType::RetailPtr | ClientType::Beta => "wow_retail",
        ClientType::Classic | ClientType::ClassicPtr => "wow_classic",
    }
}

fn map_channel(release_type: u8) -> ChannelType {
    match release_type {
        1 => ChannelType::Stable,
        2 => ChannelType::Beta,
        _ => ChannelType::Alpha,
    }
}

fn supports_client_type(addon: &CurseAddon, client_type: ClientType) -> bool {
    let flavor = game_version_flavor(client_type);
    addon.latest_files.iter().any(|file| {
        file.game_version_flavor
            .as_deref()
            .map(|f| f == flavor)
            .unwrap_or(true)
    })
}

fn map_search_result(addon: CurseAddon, client_type: ClientType) -> AddonSearchResult {
    let flavor = game_version_flavor(client_type);
    let mut files: Vec<&CurseFile> = addon
        .latest_files
        .iter()
        .filter(|file| !file.is_alternate)
        .filter(|file| {
            file.game_version_flavor
                .as_deref()
                .map(|f| f == flavor)
                .unwrap_or(true)
        })
        .collect();

    // ForgeSvc does not guarantee ordering; newest-first is restored from
    // the file dates before the result leaves the adapter.
    files.sort_by(|a, b| b.file_date.cmp(&a.file_date));

    let files = files
        .into_iter()
        .map(|file| AddonSearchResultFile {
            channel_type: map_channel(file.release_type),
            version: file.display_name.clone(),
            download_url: file.download_url.clone(),
            game_version: file.game_version.first().cloned(),
            release_date: file.file_date,
        })
        .collect();

    AddonSearchResult {
        provider_name: "curse".to_string(),
        external_id: addon.id.to_string(),
        name: addon.name,
        author: addon.authors.first().map(|a| a.name.clone()),
        thumbnail_url: default_attachment_url(&addon.attachments),
        external_url: addon.website_url,
        files,
    }
}

fn map_potential_addon(addon: CurseAddon) -> PotentialAddon {
    PotentialAddon {
        provider_name: "curse".to_string(),
        external_id: addon.id.to_string(),
        thumbnail_url: default_attachment_url(&addon.attachments),
        author: addon.authors.first().map(|a| a.name.clone()),
        external_url: addon.website_url,
        summary: addon.summary,
        download_count: addon.download_count.unwrap_or(0.0) as u64,
        name: addon.name,
    }
}

fn default_attachment_url(attachments: &[CurseAttachment]) -> Option<String> {
    attachments
        .iter()
        .find(|a| a.is_default)
        .or_else(|| attachments.first())
        .and_then(|a| a.thumbnail_url.clone().or_else(|| a.url.clone()))
}

// Wire DTOs. Field names follow the ForgeSvc JSON verbatim.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseAddon {
    id: u64,
    name: String,
    #[serde(default)]
    authors: Vec<CurseAuthor>,
    #[serde(default)]
    attachments: Vec<CurseAttachment>,
    website_url: Option<String>,
    summary: Option<String>,
    download_count: Option<f64>,
    #[serde(default)]
    latest_files: Vec<CurseFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseAttachment {
    #[serde(default)]
    is_default: bool,
    thumbnail_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseFile {
    display_name: String,
    download_url: String,
    release_type: u8,
    game_version_flavor: Option<String>,
    #[serde(default)]
    game_version: Vec<String>,
    file_date: Option<DateTime<Utc>>,
    #[serde(default)]
    is_alternate: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseFeaturedResponse {
    #[serde(default)]
    featured: Vec<CurseAddon>,
    #[serde(default)]
    popular: Vec<CurseAddon>,
}
