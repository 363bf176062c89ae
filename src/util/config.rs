//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.modrules/config.toml` - User-wide defaults
//! - Project: `.modrules/config.toml` next to the manifest - Project overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::context::{InvalidContext, Platform, TargetContext};

/// Tier used when neither the command line nor config names one.
pub const DEFAULT_TIER: &str = "development";

/// Configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default target context values
    pub context: ContextConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Default values for the target context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Configuration tier (debug, development, test, shipping)
    pub tier: Option<String>,

    /// Request editor support
    pub editor: Option<bool>,

    /// Platform identifier (defaults to the host OS)
    pub platform: Option<String>,
}

/// Descriptor output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default descriptor format
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.context.tier.is_some() {
            self.context.tier = other.context.tier;
        }
        if other.context.editor.is_some() {
            self.context.editor = other.context.editor;
        }
        if other.context.platform.is_some() {
            self.context.platform = other.context.platform;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
    }

    /// Build a target context, preferring explicit values over config.
    ///
    /// `editor` is the command-line flag; when it is `None` the configured
    /// value applies.
    pub fn target_context(
        &self,
        tier: Option<&str>,
        editor: Option<bool>,
        platform: Option<&str>,
    ) -> Result<TargetContext, InvalidContext> {
        let tier = tier
            .or(self.context.tier.as_deref())
            .unwrap_or(DEFAULT_TIER);
        let editor = editor.or(self.context.editor).unwrap_or(false);
        let platform = platform
            .or(self.context.platform.as_deref())
            .map(Platform::new)
            .unwrap_or_else(Platform::host);

        TargetContext::from_parts(tier, editor, platform)
    }

    /// Output format, preferring an explicit value over config.
    pub fn output_format(&self, explicit: Option<OutputFormat>) -> OutputFormat {
        explicit.or(self.output.format).unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.modrules/config.toml)
/// 2. Global config (~/.modrules/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.modrules).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".modrules"))
}

/// Get the global config path (~/.modrules/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.modrules/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".modrules").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ConfigurationTier;
    use tempfile::TempDir;

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(
            &global,
            "[context]\ntier = \"debug\"\nplatform = \"linux\"\n[output]\nformat = \"toml\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[context]\ntier = \"shipping\"\n").unwrap();

        let config = load_config(Some(global.as_path()), &project);
        assert_eq!(config.context.tier.as_deref(), Some("shipping"));
        assert_eq!(config.context.platform.as_deref(), Some("linux"));
        assert_eq!(config.output_format(None), OutputFormat::Toml);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("missing.toml"));

        let ctx = config.target_context(None, None, None).unwrap();
        assert_eq!(ctx.configuration_tier(), ConfigurationTier::Development);
        assert!(!ctx.editor_requested());
        assert_eq!(ctx.platform(), &Platform::host());
        assert_eq!(config.output_format(None), OutputFormat::Json);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[context\n").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.context.tier.is_none());
    }

    #[test]
    fn test_explicit_values_win() {
        let config = Config {
            context: ContextConfig {
                tier: Some("debug".to_string()),
                editor: Some(true),
                platform: Some("linux".to_string()),
            },
            output: OutputConfig::default(),
        };

        let ctx = config
            .target_context(Some("test"), None, Some("win64"))
            .unwrap();
        assert_eq!(ctx.configuration_tier(), ConfigurationTier::Test);
        assert!(ctx.editor_requested());
        assert_eq!(ctx.platform().as_str(), "win64");

        let ctx = config.target_context(None, Some(false), None).unwrap();
        assert!(!ctx.editor_requested());
    }

    #[test]
    fn test_bad_configured_tier_is_invalid_context() {
        let config = Config {
            context: ContextConfig {
                tier: Some("profile".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.target_context(None, None, None).is_err());
    }
}
