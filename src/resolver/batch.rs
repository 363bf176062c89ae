//! Parallel resolution of many declarations or many contexts.
//!
//! Each resolution reads only its own inputs, so calls fan out across the
//! rayon pool with no coordination. Results come back in input order.

use rayon::prelude::*;

use crate::core::context::{ConfigurationTier, Platform, TargetContext};
use crate::core::declaration::ModuleDeclaration;
use crate::core::descriptor::BuildDescriptor;
use crate::resolver::errors::ResolutionError;
use crate::resolver::resolve::resolve;

/// Resolve several modules under one context.
pub fn resolve_many(
    declarations: &[ModuleDeclaration],
    context: &TargetContext,
) -> Vec<Result<BuildDescriptor, ResolutionError>> {
    declarations
        .par_iter()
        .map(|decl| resolve(decl, context))
        .collect()
}

/// Outcome of resolving one declaration under one matrix context.
#[derive(Debug, Clone)]
pub struct MatrixEntry {
    pub context: TargetContext,
    pub result: Result<BuildDescriptor, ResolutionError>,
}

/// Every tier x editor combination for a platform.
///
/// Tiers in declaration order, editor off before editor on.
pub fn matrix_contexts(platform: &Platform) -> Vec<TargetContext> {
    ConfigurationTier::ALL
        .into_iter()
        .flat_map(|tier| {
            [false, true]
                .into_iter()
                .map(move |editor| TargetContext::new(tier, editor, platform.clone()))
        })
        .collect()
}

/// Resolve one declaration under every tier x editor combination.
pub fn resolve_matrix(declaration: &ModuleDeclaration, platform: &Platform) -> Vec<MatrixEntry> {
    matrix_contexts(platform)
        .into_par_iter()
        .map(|context| {
            let result = resolve(declaration, &context);
            MatrixEntry { context, result }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::declaration::{Condition, Effect, Rule};
    use crate::resolver::errors::ResolutionErrorKind;
    use crate::test_support::{context, survival_game};

    #[test]
    fn test_resolve_many_preserves_input_order() {
        let decls: Vec<_> = (0..32)
            .map(|i| ModuleDeclaration::new(format!("Module{i}")).with_public_dependencies(["Core"]))
            .collect();

        let results = resolve_many(&decls, &context(ConfigurationTier::Debug, false));
        assert_eq!(results.len(), 32);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().module(), format!("Module{i}"));
        }
    }

    #[test]
    fn test_resolve_many_keeps_failures_separate() {
        let decls = vec![
            ModuleDeclaration::new("Good").with_public_dependencies(["Core"]),
            ModuleDeclaration::new("Bad").with_private_dependencies(["Bad"]),
        ];

        let results = resolve_many(&decls, &context(ConfigurationTier::Debug, false));
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err().kind(),
            ResolutionErrorKind::SelfDependency
        );
    }

    #[test]
    fn test_matrix_order() {
        let contexts = matrix_contexts(&Platform::new("linux"));
        assert_eq!(contexts.len(), 8);
        assert_eq!(contexts[0], context(ConfigurationTier::Debug, false));
        assert_eq!(contexts[1], context(ConfigurationTier::Debug, true));
        assert_eq!(contexts[7], context(ConfigurationTier::Shipping, true));
    }

    #[test]
    fn test_matrix_finds_editor_only_conflict() {
        let decl = ModuleDeclaration::new("Game")
            .with_public_dependencies(["Slate"])
            .with_rule(Rule::when(Condition::editor(true), Effect::add_private("Slate")));

        let entries = resolve_matrix(&decl, &Platform::new("linux"));
        let failing: Vec<_> = entries
            .iter()
            .filter(|e| e.result.is_err())
            .map(|e| e.context.editor_requested())
            .collect();
        assert_eq!(failing, vec![true; 4]);
    }

    #[test]
    fn test_survival_game_matrix_is_clean() {
        let entries = resolve_matrix(&survival_game(), &Platform::new("win64"));
        assert!(entries.iter().all(|e| e.result.is_ok()));
    }
}
