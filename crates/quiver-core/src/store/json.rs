//! JSON-file-backed add-on store.
//!
//! Persists the full record map as a single JSON document, mirroring the
//! managed-store layout the desktop client keeps on disk. Every write
//! rewrites the document after the in-memory map is updated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::addon::Addon;
use crate::types::ClientType;

use super::AddonStore;

pub struct JsonAddonStore {
    path: PathBuf,
    records: RwLock<HashMap<String, Addon>>,
}

impl JsonAddonStore {
    /// Open a store at the given path, loading any existing document.
    /// A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read addon store: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse addon store: {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, records: &HashMap<String, Addon>) -> anyhow::Result<()> {
        let content =
            serde_json::to_string_pretty(records).context("Failed to serialize addon store")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write addon store: {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "addon store saved");
        Ok(())
    }
}

#[async_trait]
impl AddonStore for JsonAddonStore {
    async fn get_all_for_client_type(
        &self,
        client_type: ClientType,
    ) -> anyhow::Result<Vec<Addon>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|addon| addon.client_type == client_type)
            .cloned()
            .collect())
    }

    async fn remove_for_client_type(&self, client_type: ClientType) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        records.retain(|_, addon| addon.client_type != client_type);
        self.save(&records)
    }

    async fn set_all(&self, addons: Vec<Addon>) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        for addon in addons {
            records.insert(addon.id.clone(), addon);
        }
        self.save(&records)
    }
}
