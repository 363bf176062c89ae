//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::declaration::DependencyKind;
use crate::util::diagnostic::Diagnostic;

/// Error during module descriptor resolution.
///
/// Every variant is terminal: no partially resolved descriptor is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolutionError {
    #[error("module `{module}`: `{name}` appears in more than one dependency list ({})", join_kinds(.sets))]
    #[diagnostic(
        code(modrules::resolve::dependency_conflict),
        help("Keep each module name in exactly one of public, private or dynamic dependencies")
    )]
    DependencyConflict {
        module: String,
        name: String,
        sets: Vec<DependencyKind>,
    },

    #[error("module `{module}` lists itself as a {set} dependency")]
    #[diagnostic(
        code(modrules::resolve::self_dependency),
        help("Remove the module's own name from its dependency lists")
    )]
    SelfDependency { module: String, set: DependencyKind },
}

/// Discriminant of a [`ResolutionError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionErrorKind {
    DependencyConflict,
    SelfDependency,
}

fn join_kinds(kinds: &[DependencyKind]) -> String {
    kinds
        .iter()
        .map(DependencyKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResolutionError {
    pub fn kind(&self) -> ResolutionErrorKind {
        match self {
            ResolutionError::DependencyConflict { .. } => ResolutionErrorKind::DependencyConflict,
            ResolutionError::SelfDependency { .. } => ResolutionErrorKind::SelfDependency,
        }
    }

    /// Name of the module whose resolution failed.
    pub fn module(&self) -> &str {
        match self {
            ResolutionError::DependencyConflict { module, .. }
            | ResolutionError::SelfDependency { module, .. } => module,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolutionError::DependencyConflict { module, name, sets } => {
                let mut diag = Diagnostic::error(format!(
                    "dependency conflict for `{}` in module `{}`",
                    name, module
                ));

                for kind in sets {
                    diag = diag.with_context(format!("`{}` is a {} dependency", name, kind));
                }

                for kind in sets {
                    diag = diag.with_suggestion(format!(
                        "Keep `{}` only in {} dependencies and check the rules that add it",
                        name, kind
                    ));
                }

                diag
            }

            ResolutionError::SelfDependency { module, set } => Diagnostic::error(format!(
                "module `{}` depends on itself",
                module
            ))
            .with_context(format!("`{}` appears in its own {} dependencies", module, set))
            .with_suggestion(format!(
                "Remove `{}` from {} dependencies and from any rule adding it",
                module, set
            )),
        }
    }
}
