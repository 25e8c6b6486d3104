//! Shared fakes for exercising the resolution engine without any
//! filesystem or network.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use quiver_core::prelude::*;

/// Folder source returning a fixed folder list and counting calls.
#[derive(Default)]
pub struct FakeFolderSource {
    folders: Vec<AddonFolder>,
    calls: AtomicUsize,
}

impl FakeFolderSource {
    pub fn new(folders: Vec<AddonFolder>) -> Self {
        Self {
            folders,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddonFolderSource for FakeFolderSource {
    async fn list_addon_folders(
        &self,
        _client_type: ClientType,
    ) -> anyhow::Result<Vec<AddonFolder>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.folders.clone())
    }
}

/// Configurable in-memory catalog provider.
///
/// Serves canned search results by external id, canned featured/search
/// listings, and can be told to fail or to delay its answers.
pub struct FakeProvider {
    namespace: &'static str,
    results: HashMap<String, AddonSearchResult>,
    potential: Vec<PotentialAddon>,
    fail: bool,
    delay: Option<Duration>,
    get_by_id_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            results: HashMap::new(),
            potential: Vec::new(),
            fail: false,
            delay: None,
            get_by_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_result(mut self, external_id: &str, result: AddonSearchResult) -> Self {
        self.results.insert(external_id.to_string(), result);
        self
    }

    pub fn with_potential(mut self, potential: Vec<PotentialAddon>) -> Self {
        self.potential = potential;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_by_id_calls(&self) -> usize {
        self.get_by_id_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CatalogProvider for FakeProvider {
    fn name(&self) -> &'static str {
        self.namespace
    }

    async fn get_featured(&self, _client_type: ClientType) -> anyhow::Result<Vec<PotentialAddon>> {
        self.pause().await;
        if self.fail {
            anyhow::bail!("{} catalog is down", self.namespace);
        }
        Ok(self.potential.clone())
    }

    async fn search(
        &self,
        query: &str,
        _client_type: ClientType,
    ) -> anyhow::Result<Vec<PotentialAddon>> {
        self.pause().await;
        if self.fail {
            anyhow::bail!("{} catalog is down", self.namespace);
        }
        Ok(self
            .potential
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query.to_lowercase()))
            .cloned()
            .collect())
    }

    async fn get_by_id(
        &self,
        external_id: &str,
        _client_type: ClientType,
    ) -> anyhow::Result<AddonSearchResult> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail {
            anyhow::bail!("{} catalog is down", self.namespace);
        }
        self.results
            .get(external_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no entry for {}:{}", self.namespace, external_id))
    }
}

pub fn folder(name: &str, namespace: &str, external_id: &str) -> AddonFolder {
    let mut toc = Toc::default();
    toc.external_ids
        .insert(namespace.to_string(), external_id.to_string());
    AddonFolder {
        name: name.to_string(),
        toc,
    }
}

pub fn folder_without_id(name: &str) -> AddonFolder {
    AddonFolder {
        name: name.to_string(),
        toc: Toc::default(),
    }
}

pub fn search_result(
    namespace: &str,
    external_id: &str,
    name: &str,
    files: Vec<(ChannelType, &str)>,
) -> AddonSearchResult {
    AddonSearchResult {
        provider_name: namespace.to_string(),
        external_id: external_id.to_string(),
        name: name.to_string(),
        author: Some("Author".to_string()),
        thumbnail_url: None,
        external_url: None,
        files: files
            .into_iter()
            .map(|(channel_type, version)| AddonSearchResultFile {
                channel_type,
                version: version.to_string(),
                download_url: format!("https://cdn.example.com/{version}.zip"),
                game_version: Some("9.2.7".to_string()),
                release_date: None,
            })
            .collect(),
    }
}

pub fn potential(namespace: &str, external_id: &str, name: &str) -> PotentialAddon {
    PotentialAddon {
        provider_name: namespace.to_string(),
        external_id: external_id.to_string(),
        name: name.to_string(),
        author: None,
        thumbnail_url: None,
        external_url: None,
        summary: None,
        download_count: 0,
    }
}

/// Build a service over the given fakes with a memory store.
pub fn service(
    folder_source: Arc<FakeFolderSource>,
    providers: Vec<Arc<FakeProvider>>,
    store: Arc<MemoryAddonStore>,
) -> AddonService {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(provider);
    }
    AddonService::new(folder_source, registry, store)
}
