//! Command implementations

pub mod check;
pub mod explain;
pub mod flags;
pub mod init;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};

use modrules::core::{find_manifest, Manifest, TargetContext};
use modrules::util::config::{global_config_path, load_config, project_config_path};
use modrules::util::diagnostic::suggestions;
use modrules::util::Config;

use crate::cli::ContextArgs;

/// Locate and load the manifest, then the config next to it.
pub fn load_manifest(explicit: Option<&Path>) -> Result<(Manifest, Config)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            find_manifest(&cwd).with_context(|| {
                format!(
                    "could not find Module.toml in `{}` or any parent directory\nhelp: {}",
                    cwd.display(),
                    suggestions::NO_MANIFEST
                )
            })?
        }
    };

    let manifest = Manifest::load(&path)?;

    let global = global_config_path();
    let config = load_config(global.as_deref(), &project_config_path(manifest.dir()));

    Ok((manifest, config))
}

/// Load the manifest and build the target context from flags and config.
pub fn load_with_context(args: &ContextArgs) -> Result<(Manifest, Config, TargetContext)> {
    let (manifest, config) = load_manifest(args.manifest.as_deref())?;

    let context = config.target_context(
        args.tier.as_deref(),
        args.editor(),
        args.platform.as_deref(),
    )?;

    tracing::debug!("resolving `{}` for {}", manifest.declaration.name, context);

    Ok((manifest, config, context))
}
