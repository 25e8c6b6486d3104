//! Shared core types used across scanning, catalog, and storage layers.

use serde::{Deserialize, Serialize};

/// Game client installation flavors a record can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    /// Current retail client.
    Retail,
    /// Retail public test realm.
    RetailPtr,
    /// Retail beta client.
    Beta,
    /// Classic client.
    Classic,
    /// Classic public test realm.
    ClassicPtr,
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retail => write!(f, "retail"),
            Self::RetailPtr => write!(f, "retail-ptr"),
            Self::Beta => write!(f, "beta"),
            Self::Classic => write!(f, "classic"),
            Self::ClassicPtr => write!(f, "classic-ptr"),
        }
    }
}

/// Release stability tiers, ordered from most to least stable.
///
/// The derived ordering carries the channel-selection invariant:
/// `Stable < Beta < Alpha`, and a file is eligible for a requested
/// channel when `file.channel_type <= requested`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelType {
    #[default]
    Stable,
    Beta,
    Alpha,
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Beta => write!(f, "beta"),
            Self::Alpha => write!(f, "alpha"),
        }
    }
}
