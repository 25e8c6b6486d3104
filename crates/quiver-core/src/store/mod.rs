//! Persistence boundary for resolved add-on records.

pub mod json;
pub mod memory;

use async_trait::async_trait;

use crate::addon::Addon;
use crate::types::ClientType;

pub use json::JsonAddonStore;
pub use memory::MemoryAddonStore;

/// Key-value persistence for add-on records, keyed by client type.
///
/// Writes are bulk replacements; there is no partial-update API. The
/// store is the only shared mutable resource in the system and assumes
/// one writer at a time per client type.
#[async_trait]
pub trait AddonStore: Send + Sync {
    async fn get_all_for_client_type(
        &self,
        client_type: ClientType,
    ) -> anyhow::Result<Vec<Addon>>;

    async fn remove_for_client_type(&self, client_type: ClientType) -> anyhow::Result<()>;

    /// Insert every record, keyed by its id. Existing ids are replaced.
    async fn set_all(&self, addons: Vec<Addon>) -> anyhow::Result<()>;
}
