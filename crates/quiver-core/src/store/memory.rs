//! In-memory add-on store for tests and embedding.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::addon::Addon;
use crate::types::ClientType;

use super::AddonStore;

/// Volatile store backed by a map from record id to record.
#[derive(Debug, Default)]
pub struct MemoryAddonStore {
    records: RwLock<HashMap<String, Addon>>,
}

impl MemoryAddonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddonStore for MemoryAddonStore {
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
        Ok(())
    }

    async fn set_all(&self, addons: Vec<Addon>) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        for addon in addons {
            records.insert(addon.id.clone(), addon);
        }
        Ok(())
    }
}
