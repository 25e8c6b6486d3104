//! Quiver Core Library
//!
//! Provides the domain logic for game add-on management: matching
//! locally discovered add-on folders against remote catalogs and
//! resolving the installable release per channel policy.

pub mod addon;
pub mod catalog;
pub mod config;
pub mod resolver;
pub mod scan;
pub mod store;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Records
    pub use crate::addon::{Addon, AddonFolder, Toc};
    pub use crate::types::{ChannelType, ClientType};

    // Catalog
    pub use crate::catalog::cache::SearchResultCache;
    pub use crate::catalog::curse::CurseProvider;
    pub use crate::catalog::{
        AddonSearchResult, AddonSearchResultFile, CatalogError, CatalogProvider, PotentialAddon,
        ProviderRegistry,
    };

    // Engine
    pub use crate::resolver::{AddonService, FeaturedAddons, ProviderFailure, latest_file};

    // Boundaries
    pub use crate::scan::AddonFolderSource;
    pub use crate::store::{AddonStore, JsonAddonStore, MemoryAddonStore};

    // Configuration
    pub use crate::config::{ProviderConfig, QuiverConfig};
}
