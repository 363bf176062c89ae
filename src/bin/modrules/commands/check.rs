//! `modrules check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use modrules::core::Platform;
use modrules::resolver::resolve_matrix;
use modrules::util::diagnostic::{self, suggestions, Diagnostic};

pub fn execute(args: CheckArgs, no_color: bool) -> Result<()> {
    let (manifest, config) = super::load_manifest(args.manifest.as_deref())?;
    let color = !no_color;

    let platform = args
        .platform
        .as_deref()
        .or(config.context.platform.as_deref())
        .map(Platform::new)
        .unwrap_or_else(Platform::host);

    let declaration = &manifest.declaration;
    if declaration.conditional_rules.is_empty() {
        diagnostic::emit(
            &Diagnostic::warning(format!(
                "module `{}` has no conditional rules; every context resolves identically",
                declaration.name
            ))
            .with_location(&manifest.path),
            color,
        );
    }

    let entries = resolve_matrix(declaration, &platform);

    println!("# Checking `{}` on {}:", declaration.name, platform);
    let mut failures = Vec::new();
    for entry in &entries {
        let tier = entry.context.configuration_tier().as_str();
        let editor = if entry.context.editor_requested() {
            "editor"
        } else {
            "game"
        };

        match &entry.result {
            Ok(descriptor) => {
                println!("  ok    {:<12} {:<7} {}", tier, editor, &descriptor.fingerprint()[..16]);
            }
            Err(err) => {
                println!("  FAIL  {:<12} {:<7} {}", tier, editor, err);
                failures.push(err);
            }
        }
    }

    if failures.is_empty() {
        return Ok(());
    }

    // Identical failures across contexts are reported once
    let mut unique = Vec::new();
    for err in failures {
        if !unique.contains(&err) {
            unique.push(err);
        }
    }
    for err in unique {
        diagnostic::emit(
            &err.to_diagnostic()
                .with_location(&manifest.path)
                .with_suggestion(suggestions::EXPLAIN_FAILURE),
            color,
        );
    }

    let failed = entries.iter().filter(|e| e.result.is_err()).count();
    bail!("{} of {} contexts failed to resolve", failed, entries.len());
}
