//! Test fixtures shared by unit tests.
//!
//! `survival_game()` and `SURVIVAL_GAME_MANIFEST` describe the same module,
//! once through the builder API and once as a Module.toml.

use crate::core::context::{ConfigurationTier, TargetContext};
use crate::core::declaration::{options, Condition, Effect, ModuleDeclaration, Rule};

/// A context on the `linux` platform.
pub fn context(tier: ConfigurationTier, editor: bool) -> TargetContext {
    TargetContext::new(tier, editor, "linux")
}

/// A gameplay module with editor-only and non-shipping rules.
pub fn survival_game() -> ModuleDeclaration {
    let editor = Condition::editor(true);
    let not_shipping = Condition::tier_not_in([ConfigurationTier::Shipping]);

    ModuleDeclaration::new("SurvivalGame")
        .with_public_include_paths([
            "SurvivalGame/Components",
            "SurvivalGame/Data",
            "SurvivalGame/Characters",
            "SurvivalGame/Enums",
        ])
        .with_public_dependencies([
            "Core",
            "CoreUObject",
            "Engine",
            "InputCore",
            "EnhancedInput",
            "GameplayAbilities",
            "GameplayTags",
            "GameplayTasks",
            "AIModule",
            "NavigationSystem",
            "CommonUI",
            "UMG",
            "Slate",
            "SlateCore",
            "CommonInput",
        ])
        .with_private_dependencies([
            "NetCore",
            "RenderCore",
            "DeveloperSettings",
            "PhysicsCore",
            "Chaos",
            "ChaosSolverEngine",
            "RHI",
            "AssetRegistry",
            "ApplicationCore",
        ])
        .with_dynamic_dependencies(["OnlineSubsystem", "OnlineSubsystemUtils"])
        .with_option(options::PCH_USAGE, "use-explicit-or-shared")
        .with_option(options::LEGACY_PUBLIC_INCLUDE_PATHS, false)
        .with_option(options::UNITY, false)
        .with_option(options::MIN_FILES_USING_PCH, 1i64)
        .with_option(options::RTTI, false)
        .with_option(options::EXCEPTIONS, false)
        .with_rule(Rule::when(editor.clone(), Effect::add_private("UnrealEd")))
        .with_rule(Rule::when(
            editor.clone(),
            Effect::add_private("EditorFramework"),
        ))
        .with_rule(Rule::when(editor.clone(), Effect::add_private("EditorStyle")))
        .with_rule(Rule::when(editor, Effect::add_private("EditorSubsystem")))
        .with_rule(Rule::when(
            not_shipping.clone(),
            Effect::add_public("GameplayDebugger"),
        ))
        .with_rule(Rule::when(
            not_shipping.clone(),
            Effect::define("WITH_GAMEPLAY_DEBUGGER", "1"),
        ))
        .with_rule(Rule::unless(
            not_shipping,
            Effect::define("WITH_GAMEPLAY_DEBUGGER", "0"),
        ))
}

/// Module.toml form of [`survival_game`].
pub const SURVIVAL_GAME_MANIFEST: &str = r#"
[module]
name = "SurvivalGame"

[include]
public = [
    "SurvivalGame/Components",
    "SurvivalGame/Data",
    "SurvivalGame/Characters",
    "SurvivalGame/Enums",
]

[dependencies]
public = [
    "Core", "CoreUObject", "Engine", "InputCore", "EnhancedInput",
    "GameplayAbilities", "GameplayTags", "GameplayTasks", "AIModule",
    "NavigationSystem", "CommonUI", "UMG", "Slate", "SlateCore", "CommonInput",
]
private = [
    "NetCore", "RenderCore", "DeveloperSettings", "PhysicsCore", "Chaos",
    "ChaosSolverEngine", "RHI", "AssetRegistry", "ApplicationCore",
]
dynamic = ["OnlineSubsystem", "OnlineSubsystemUtils"]

[options]
pch-usage = "use-explicit-or-shared"
legacy-public-include-paths = false
unity = false
min-files-using-pch = 1
rtti = false
exceptions = false

[[rule]]
when = { editor = true }
private = ["UnrealEd", "EditorFramework", "EditorStyle", "EditorSubsystem"]

[[rule]]
when = { not-tier = ["shipping"] }
public = ["GameplayDebugger"]
define = ["WITH_GAMEPLAY_DEBUGGER=1"]
otherwise = { define = ["WITH_GAMEPLAY_DEBUGGER=0"] }
"#;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::manifest::Manifest;

    #[test]
    fn test_manifest_fixture_matches_builder_fixture() {
        let manifest = Manifest::parse(SURVIVAL_GAME_MANIFEST, Path::new("Module.toml")).unwrap();
        assert_eq!(manifest.declaration, survival_game());
    }
}
