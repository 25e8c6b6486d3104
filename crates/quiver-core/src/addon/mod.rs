//! Local add-on records: discovered folders and resolved add-ons.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{AddonSearchResult, AddonSearchResultFile};
use crate::types::{ChannelType, ClientType};

/// Parsed descriptor (`.toc`) metadata for a discovered folder.
///
/// Produced by the scanning layer; the engine only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Toc {
    pub title: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,

    /// Catalog namespace -> external id, as declared by the descriptor
    /// (e.g. `curse -> 3358`). Empty when the folder carries no catalog
    /// identifier at all.
    #[serde(default)]
    pub external_ids: BTreeMap<String, String>,
}

impl Toc {
    /// Look up the external id this descriptor declares for a namespace.
    pub fn external_id(&self, namespace: &str) -> Option<&str> {
        self.external_ids.get(namespace).map(String::as_str)
    }
}

/// A locally discovered add-on directory.
///
/// Produced fresh on each scan and never persisted; persistence applies
/// to the resolved [`Addon`] records only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonFolder {
    pub name: String,
    pub toc: Toc,
}

/// The resolved, persistable add-on record the rest of the system
/// consumes. Created by the resolution engine, owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub latest_version: String,
    pub client_type: ClientType,
    pub external_id: String,
    pub provider_name: String,
    pub folder_name: String,
    pub game_version: Option<String>,
    pub author: Option<String>,
    pub download_url: String,
    pub external_url: Option<String>,

    /// The channel used to select `latest_version`/`download_url`, not
    /// necessarily the channel of the globally newest file.
    pub channel_type: ChannelType,
    pub is_ignored: bool,
    pub auto_update_enabled: bool,
}

impl Addon {
    /// Build an add-on record from a matched folder and the file chosen
    /// by channel selection. Generates a fresh identifier; user flags
    /// start cleared.
    pub fn from_search_result(
        folder_name: &str,
        search_result: &AddonSearchResult,
        latest_file: &AddonSearchResultFile,
        client_type: ClientType,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: search_result.name.clone(),
            thumbnail_url: search_result.thumbnail_url.clone(),
            latest_version: latest_file.version.clone(),
            client_type,
            external_id: search_result.external_id.clone(),
            provider_name: search_result.provider_name.clone(),
            folder_name: folder_name.to_string(),
            game_version: latest_file.game_version.clone(),
            author: search_result.author.clone(),
            download_url: latest_file.download_url.clone(),
            external_url: search_result.external_url.clone(),
            channel_type,
            is_ignored: false,
            auto_update_enabled: false,
        }
    }
}
