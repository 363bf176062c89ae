//! `modrules init` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::InitArgs;
use modrules::core::MANIFEST_NAME;

/// Determines the module name from the arguments or directory.
pub fn determine_module_name(name: Option<String>, path: &Path) -> String {
    name.unwrap_or_else(|| {
        path.canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Module")
            .to_string()
    })
}

/// Validates a module name.
pub fn validate_module_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("module name cannot be empty");
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err("module name may only contain letters, digits and underscores");
    }

    Ok(())
}

/// Starter manifest contents for a module.
pub fn template(name: &str) -> String {
    format!(
        r#"[module]
name = "{name}"

[include]
public = []

[dependencies]
public = ["Core"]
private = []
dynamic = []

[options]
pch-usage = "use-explicit-or-shared"
unity = true
rtti = false
exceptions = false

[[rule]]
when = {{ editor = true }}
private = ["UnrealEd"]

[[rule]]
when = {{ not-tier = ["shipping"] }}
define = ["WITH_DEBUG_TOOLS=1"]
otherwise = {{ define = ["WITH_DEBUG_TOOLS=0"] }}
"#
    )
}

pub fn execute(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let name = determine_module_name(args.name, &path);

    if let Err(msg) = validate_module_name(&name) {
        bail!("invalid module name `{}`: {}", name, msg);
    }

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists", manifest_path.display());
    }

    std::fs::create_dir_all(&path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;
    std::fs::write(&manifest_path, template(&name))
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    eprintln!("     Created module `{}` at {}", name, manifest_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modrules::core::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses() {
        let manifest = Manifest::parse(&template("Game"), Path::new(MANIFEST_NAME)).unwrap();
        assert_eq!(manifest.declaration.name, "Game");
        assert_eq!(manifest.declaration.conditional_rules.len(), 3);
    }

    #[test]
    fn test_module_name_from_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("ShooterCore");
        std::fs::create_dir(&dir).unwrap();

        assert_eq!(determine_module_name(None, &dir), "ShooterCore");
        assert_eq!(
            determine_module_name(Some("Other".to_string()), &dir),
            "Other"
        );
    }

    #[test]
    fn test_validate_module_name() {
        assert!(validate_module_name("SurvivalGame").is_ok());
        assert!(validate_module_name("").is_err());
        assert!(validate_module_name("my-module").is_err());
    }
}
