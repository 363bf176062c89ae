//! Target context - the facts a resolution may branch on.
//!
//! A TargetContext is built once per build invocation by the invoker and is
//! read-only afterwards. The resolver only ever borrows it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a target context cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration tier `{tier}`, valid values: debug, development, test, shipping")]
pub struct InvalidContext {
    /// The unrecognized tier string
    pub tier: String,
}

/// Build configuration tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationTier {
    /// Unoptimized, full debug information
    #[serde(alias = "Debug")]
    Debug,
    /// Optimized with development tooling
    #[serde(alias = "Development", alias = "dev")]
    Development,
    /// Shipping-like build with test hooks
    #[serde(alias = "Test")]
    Test,
    /// Final release build
    #[serde(alias = "Shipping")]
    Shipping,
}

impl ConfigurationTier {
    /// Every tier, in declaration order.
    pub const ALL: [ConfigurationTier; 4] = [
        ConfigurationTier::Debug,
        ConfigurationTier::Development,
        ConfigurationTier::Test,
        ConfigurationTier::Shipping,
    ];

    /// Get the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationTier::Debug => "debug",
            ConfigurationTier::Development => "development",
            ConfigurationTier::Test => "test",
            ConfigurationTier::Shipping => "shipping",
        }
    }
}

impl FromStr for ConfigurationTier {
    type Err = InvalidContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(ConfigurationTier::Debug),
            "development" | "dev" => Ok(ConfigurationTier::Development),
            "test" => Ok(ConfigurationTier::Test),
            "shipping" => Ok(ConfigurationTier::Shipping),
            _ => Err(InvalidContext {
                tier: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfigurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque platform identifier.
///
/// The core compares platforms for equality and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
    pub fn new(id: impl Into<String>) -> Self {
        Platform(id.into())
    }

    /// Identifier of the host operating system.
    pub fn host() -> Self {
        Platform(std::env::consts::OS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        Platform::new(s)
    }
}

/// Immutable facts about one build request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetContext {
    configuration_tier: ConfigurationTier,
    editor_requested: bool,
    platform: Platform,
}

impl TargetContext {
    /// Create a context from already-validated parts.
    pub fn new(
        configuration_tier: ConfigurationTier,
        editor_requested: bool,
        platform: impl Into<Platform>,
    ) -> Self {
        TargetContext {
            configuration_tier,
            editor_requested,
            platform: platform.into(),
        }
    }

    /// Create a context from a tier string as supplied on a command line.
    pub fn from_parts(
        tier: &str,
        editor_requested: bool,
        platform: impl Into<Platform>,
    ) -> Result<Self, InvalidContext> {
        let configuration_tier = tier.parse()?;
        Ok(TargetContext::new(
            configuration_tier,
            editor_requested,
            platform,
        ))
    }

    pub fn configuration_tier(&self) -> ConfigurationTier {
        self.configuration_tier
    }

    pub fn editor_requested(&self) -> bool {
        self.editor_requested
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

impl fmt::Display for TargetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}{})",
            self.platform,
            self.configuration_tier,
            if self.editor_requested { ", editor" } else { "" }
        )
    }
}
