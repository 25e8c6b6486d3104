//! Configuration for the resolution engine and provider adapters,
//! loaded from quiver.toml.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::ChannelType;

/// Top-level quiver.toml schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QuiverConfig {
    /// Channel the engine resolves against when no per-addon override
    /// exists.
    pub default_channel: ChannelType,

    /// How long catalog lookups stay fresh in the provider cache.
    pub cache_ttl_minutes: i64,

    /// Per-provider settings, keyed by namespace.
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            default_channel: ChannelType::Stable,
            cache_ttl_minutes: 10,
            providers: BTreeMap::new(),
        }
    }
}

/// Settings for one catalog provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderConfig {
    /// Override for the provider's API base URL.
    pub url: Option<Url>,

    /// Whether this provider participates in resolution and fan-out.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: None,
            enabled: true,
        }
    }
}

/// Default config location under the platform config directory.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(base.join("quiver").join("quiver.toml"))
}

impl QuiverConfig {
    /// Load from the given path; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Settings for a provider namespace, falling back to defaults when
    /// the config carries no entry.
    pub fn provider(&self, namespace: &str) -> ProviderConfig {
        self.providers.get(namespace).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = QuiverConfig::load_or_default(&dir.path().join("absent.toml"))
            .expect("load should succeed");

        assert_eq!(config.default_channel, ChannelType::Stable);
        assert_eq!(config.cache_ttl_minutes, 10);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("quiver.toml");
        std::fs::write(
            &path,
            r#"
            default-channel = "beta"
            cache-ttl-minutes = 30

            [providers.curse]
            url = "https://staging.example.com/api/v2"
            "#,
        )
        .expect("write");

        let config = QuiverConfig::load_or_default(&path).expect("load should succeed");
        assert_eq!(config.default_channel, ChannelType::Beta);
        assert_eq!(config.cache_ttl_minutes, 30);

        let curse = config.provider("curse");
        assert!(curse.enabled);
        assert_eq!(
            curse.url.map(|u| u.to_string()),
            Some("https://staging.example.com/api/v2".to_string())
        );
    }

    #[test]
    fn test_unknown_provider_falls_back_to_defaults() {
        let config = QuiverConfig::default();
        let provider = config.provider("wowi");
        assert!(provider.enabled);
        assert!(provider.url.is_none());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("quiver.toml");

        let mut config = QuiverConfig::default();
        config.default_channel = ChannelType::Alpha;
        config
            .providers
            .insert("curse".to_string(), ProviderConfig::default());
        config.save(&path).expect("save should succeed");

        let reloaded = QuiverConfig::load_or_default(&path).expect("load should succeed");
        assert_eq!(reloaded.default_channel, ChannelType::Alpha);
        assert!(reloaded.providers.contains_key("curse"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("quiver.toml");
        std::fs::write(&path, "default-channel = ").expect("write");

        assert!(QuiverConfig::load_or_default(&path).is_err());
    }
}
