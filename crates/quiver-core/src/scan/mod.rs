//! Local add-on discovery boundary.

use async_trait::async_trait;

use crate::addon::AddonFolder;
use crate::types::ClientType;

/// Produces the discovered add-on folders for a client installation.
///
/// Directory traversal and descriptor parsing live behind this trait;
/// the engine only consumes the records it yields. Implementations must
/// be side-effect-free and re-entrant.
#[async_trait]
pub trait AddonFolderSource: Send + Sync {
    async fn list_addon_folders(
        &self,
        client_type: ClientType,
    ) -> anyhow::Result<Vec<AddonFolder>>;
}
