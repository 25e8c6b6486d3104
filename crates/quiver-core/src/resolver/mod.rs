//! The add-on resolution engine.
//!
//! Orchestrates folder scanning, catalog lookups, and the store to
//! produce the authoritative add-on list per client type, and aggregates
//! discovery listings across every registered provider.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::addon::{Addon, AddonFolder};
use crate::catalog::{
    AddonSearchResult, AddonSearchResultFile, CatalogProvider, PotentialAddon, ProviderRegistry,
};
use crate::scan::AddonFolderSource;
use crate::store::AddonStore;
use crate::types::{ChannelType, ClientType};

/// Aggregated discovery results with per-provider failure reporting.
///
/// One provider failing does not abort the aggregation; its error lands
/// in `failures` and the other providers' results are returned.
#[derive(Debug, Default)]
pub struct FeaturedAddons {
    pub addons: Vec<PotentialAddon>,
    pub failures: Vec<ProviderFailure>,
}

/// One provider's failed contribution to an aggregation.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider_name: String,
    pub error: anyhow::Error,
}

/// Select the latest file at or below the requested channel.
///
/// "Latest" is defined by the provider-supplied file ordering: the first
/// surviving entry wins. No version strings are compared.
pub fn latest_file(
    search_result: &AddonSearchResult,
    channel: ChannelType,
) -> Option<&AddonSearchResultFile> {
    search_result
        .files
        .iter()
        .find(|file| file.channel_type <= channel)
}

/// The resolution engine.
pub struct AddonService {
    folder_source: Arc<dyn AddonFolderSource>,
    providers: ProviderRegistry,
    store: Arc<dyn AddonStore>,
    default_channel: ChannelType,
}

impl AddonService {
    pub fn new(
        folder_source: Arc<dyn AddonFolderSource>,
        providers: ProviderRegistry,
        store: Arc<dyn AddonStore>,
    ) -> Self {
        Self {
            folder_source,
            providers,
            store,
            default_channel: ChannelType::Stable,
        }
    }

    /// Override the channel used for selection during rescans.
    pub fn with_default_channel(mut self, channel: ChannelType) -> Self {
        self.default_channel = channel;
        self
    }

    pub fn default_channel(&self) -> ChannelType {
        self.default_channel
    }

    /// The authoritative add-on list for a client type.
    ///
    /// Returns stored records verbatim when the store has any and no
    /// rescan is forced — zero scan or catalog work. Otherwise clears
    /// the stored records for the client type, resolves every discovered
    /// folder, persists the outcome in one bulk write, and returns it.
    /// Records are persisted only after the whole folder loop completes,
    /// so an abandoned rescan never leaves a partial collection behind.
    pub async fn get_addons(
        &self,
        client_type: ClientType,
        rescan: bool,
    ) -> anyhow::Result<Vec<Addon>> {
        let stored = self.store.get_all_for_client_type(client_type).await?;
        if !rescan && !stored.is_empty() {
            debug!(%client_type, count = stored.len(), "serving addons from store");
            return Ok(stored);
        }

        self.store.remove_for_client_type(client_type).await?;
        let addons = self.resolve_local_addons(client_type, &stored).await?;
        self.store.set_all(addons.clone()).await?;
        info!(%client_type, count = addons.len(), "rescan complete");
        Ok(addons)
    }

    /// Featured listings from every registered provider, concatenated in
    /// registration order regardless of which provider answers first.
    pub async fn get_featured_addons(
        &self,
        client_type: ClientType,
    ) -> anyhow::Result<FeaturedAddons> {
        self.fan_out(|provider| async move { provider.get_featured(client_type).await })
            .await
    }

    /// Free-text search across every registered provider, with the same
    /// ordering and failure semantics as the featured listing.
    pub async fn search_addons(
        &self,
        query: &str,
        client_type: ClientType,
    ) -> anyhow::Result<FeaturedAddons> {
        self.fan_out(|provider| {
            let query = query.to_string();
            async move { provider.search(&query, client_type).await }
        })
        .await
    }

    async fn fan_out<F, Fut>(&self, call: F) -> anyhow::Result<FeaturedAddons>
    where
        F: Fn(Arc<dyn CatalogProvider>) -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<PotentialAddon>>>,
    {
        let calls = self.providers.all().iter().map(|provider| {
            let name = provider.name();
            let fut = call(Arc::clone(provider));
            async move { (name, fut.await) }
        });

        let mut aggregated = FeaturedAddons::default();
        for (provider_name, outcome) in join_all(calls).await {
            match outcome {
                Ok(addons) => aggregated.addons.extend(addons),
                Err(error) => {
                    warn!(provider_name, %error, "provider failed during fan-out");
                    aggregated.failures.push(ProviderFailure {
                        provider_name: provider_name.to_string(),
                        error,
                    });
                }
            }
        }
        Ok(aggregated)
    }

    /// Full local rescan: resolve each discovered folder in sequence.
    /// A failure while resolving one folder is logged and skips only
    /// that folder.
    async fn resolve_local_addons(
        &self,
        client_type: ClientType,
        previous: &[Addon],
    ) -> anyhow::Result<Vec<Addon>> {
        let folders = self.folder_source.list_addon_folders(client_type).await?;
        debug!(%client_type, count = folders.len(), "resolving discovered folders");

        let mut addons = Vec::new();
        for folder in folders {
            match self.resolve_folder(&folder, client_type).await {
                Ok(Some(mut addon)) => {
                    carry_over_identity(&mut addon, previous);
                    addons.push(addon);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(folder = %folder.name, %error, "skipping folder after resolution failure");
                }
            }
        }
        Ok(addons)
    }

    /// Resolve one folder to an add-on record, or `None` when the folder
    /// has no catalog identifier or no file survives channel selection.
    async fn resolve_folder(
        &self,
        folder: &AddonFolder,
        client_type: ClientType,
    ) -> anyhow::Result<Option<Addon>> {
        let Some((provider, external_id)) = self.providers.provider_for(&folder.toc) else {
            debug!(folder = %folder.name, "no catalog identifier, skipping");
            return Ok(None);
        };

        let search_result = provider.get_by_id(external_id, client_type).await?;
        let Some(file) = latest_file(&search_result, self.default_channel) else {
            debug!(
                folder = %folder.name,
                channel = %self.default_channel,
                "no file at or below channel, skipping"
            );
            return Ok(None);
        };

        Ok(Some(Addon::from_search_result(
            &folder.name,
            &search_result,
            file,
            client_type,
            self.default_channel,
        )))
    }
}

/// A rescan that re-matches an already-tracked folder keeps its identity
/// and user flags; everything else in the record is rebuilt fresh.
fn carry_over_identity(addon: &mut Addon, previous: &[Addon]) {
    let matched = previous.iter().find(|prev| {
        prev.folder_name == addon.folder_name
            && prev.provider_name == addon.provider_name
            && prev.external_id == addon.external_id
    });
    if let Some(prev) = matched {
        addon.id = prev.id.clone();
        addon.is_ignored = prev.is_ignored;
        addon.auto_update_enabled = prev.auto_update_enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_files(files: Vec<(ChannelType, &str)>) -> AddonSearchResult {
        AddonSearchResult {
            provider_name: "curse".to_string(),
            external_id: "1".to_string(),
            name: "Test".to_string(),
            author: None,
            thumbnail_url: None,
            external_url: None,
            files: files
                .into_iter()
                .map(|(channel_type, version)| AddonSearchResultFile {
                    channel_type,
                    version: version.to_string(),
                    download_url: format!("https://cdn.example.com/{version}.zip"),
                    game_version: None,
                    release_date: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_latest_file_skips_less_stable_entries() {
        let result = result_with_files(vec![
            (ChannelType::Beta, "2.1b"),
            (ChannelType::Stable, "2.0"),
            (ChannelType::Alpha, "2.2a"),
        ]);

        let file = latest_file(&result, ChannelType::Stable).expect("stable file exists");
        assert_eq!(file.version, "2.0");
    }

    #[test]
    fn test_latest_file_takes_first_in_provider_order() {
        let result = result_with_files(vec![
            (ChannelType::Beta, "2.1b"),
            (ChannelType::Stable, "2.0"),
        ]);

        let file = latest_file(&result, ChannelType::Beta).expect("beta file exists");
        assert_eq!(file.version, "2.1b");

        let file = latest_file(&result, ChannelType::Alpha).expect("alpha accepts anything");
        assert_eq!(file.version, "2.1b");
    }

    #[test]
    fn test_latest_file_none_when_all_files_less_stable() {
        let result = result_with_files(vec![
            (ChannelType::Alpha, "3.0a"),
            (ChannelType::Beta, "2.1b"),
        ]);

        assert!(latest_file(&result, ChannelType::Stable).is_none());
    }

    #[test]
    fn test_latest_file_none_on_empty_files() {
        let result = result_with_files(vec![]);
        assert!(latest_file(&result, ChannelType::Alpha).is_none());
    }

    #[test]
    fn test_carry_over_identity_preserves_flags_on_match() {
        let result = result_with_files(vec![(ChannelType::Stable, "2.0")]);
        let mut fresh = Addon::from_search_result(
            "DBM",
            &result,
            &result.files[0],
            ClientType::Retail,
            ChannelType::Stable,
        );

        let mut prev = fresh.clone();
        prev.id = "prev-id".to_string();
        prev.is_ignored = true;
        prev.auto_update_enabled = true;
        prev.latest_version = "1.0".to_string();

        carry_over_identity(&mut fresh, &[prev]);
        assert_eq!(fresh.id, "prev-id");
        assert!(fresh.is_ignored);
        assert!(fresh.auto_update_enabled);
        // Catalog-derived fields stay fresh.
        assert_eq!(fresh.latest_version, "2.0");
    }

    #[test]
    fn test_carry_over_identity_ignores_different_folder() {
        let result = result_with_files(vec![(ChannelType::Stable, "2.0")]);
        let mut fresh = Addon::from_search_result(
            "DBM",
            &result,
            &result.files[0],
            ClientType::Retail,
            ChannelType::Stable,
        );
        let original_id = fresh.id.clone();

        let mut prev = fresh.clone();
        prev.id = "prev-id".to_string();
        prev.folder_name = "OtherFolder".to_string();

        carry_over_identity(&mut fresh, &[prev]);
        assert_eq!(fresh.id, original_id);
    }
}
