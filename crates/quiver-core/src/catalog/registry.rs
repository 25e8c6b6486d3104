//! Provider registry for mapping external-id namespaces to catalog
//! providers.
//!
//! The registry is the only folder-to-provider matching mechanism:
//! lookups go by the namespace each provider declares, never by
//! inspecting concrete types. Registration order is preserved and
//! meaningful — aggregations concatenate per-provider results in this
//! order.

use std::sync::Arc;

use tracing::warn;

use crate::addon::Toc;

use super::CatalogProvider;

/// Registry of catalog providers, looked up by namespace.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn CatalogProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider. Returns false and keeps the existing entry
    /// when the namespace is already taken.
    pub fn register(&mut self, provider: Arc<dyn CatalogProvider>) -> bool {
        let namespace = provider.name();
        if self.get(namespace).is_some() {
            warn!(namespace, "provider namespace already registered");
            return false;
        }
        self.providers.push(provider);
        true
    }

    /// Get a provider by the namespace it owns.
    pub fn get(&self, namespace: &str) -> Option<&Arc<dyn CatalogProvider>> {
        self.providers.iter().find(|p| p.name() == namespace)
    }

    /// Match a descriptor to the first registered provider whose
    /// namespace it declares an id for. Returns the provider together
    /// with that id.
    pub fn provider_for<'a>(
        &'a self,
        toc: &'a Toc,
    ) -> Option<(&'a Arc<dyn CatalogProvider>, &'a str)> {
        self.providers.iter().find_map(|provider| {
            toc.external_id(provider.name())
                .map(|external_id| (provider, external_id))
        })
    }

    /// All providers in registration order.
    pub fn all(&self) -> &[Arc<dyn CatalogProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
