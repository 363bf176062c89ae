//! The conditional resolution pass.
//!
//! Resolution is a single linear pass:
//! 1. seed dependency lists, definitions and options from the declaration
//! 2. apply the effect of every satisfied rule, in declared order
//! 3. validate cross-list conflicts, then self-dependencies
//!
//! Dependency lists keep the position of the first occurrence of a name;
//! definitions and options take the value of the last rule that sets them.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::core::context::TargetContext;
use crate::core::declaration::{DependencyKind, Effect, ModuleDeclaration, OptionValue};
use crate::core::descriptor::BuildDescriptor;
use crate::resolver::errors::ResolutionError;

/// What applying one effect did to the pass state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Name appended to a dependency list
    Added,
    /// Name was already in that list; position unchanged
    AlreadyPresent,
    /// Definition set for the first time
    Defined,
    /// Definition replaced an earlier value
    Redefined { previous: String },
    /// Option set, replacing the previous value if there was one
    OptionSet { previous: Option<OptionValue> },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added => f.write_str("added"),
            Outcome::AlreadyPresent => f.write_str("already present"),
            Outcome::Defined => f.write_str("defined"),
            Outcome::Redefined { previous } => write!(f, "redefined (was {})", previous),
            Outcome::OptionSet { previous: None } => f.write_str("set"),
            Outcome::OptionSet {
                previous: Some(previous),
            } => write!(f, "overridden (was {})", previous),
        }
    }
}

/// Insertion-ordered set of module names.
#[derive(Debug, Default)]
struct DependencyList {
    names: Vec<String>,
    index: HashSet<String>,
}

impl DependencyList {
    fn insert(&mut self, name: &str) -> bool {
        if self.index.contains(name) {
            return false;
        }
        self.index.insert(name.to_string());
        self.names.push(name.to_string());
        true
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }
}

/// State of one resolution pass over a declaration.
pub(crate) struct Pass<'a> {
    declaration: &'a ModuleDeclaration,
    lists: [DependencyList; 3],
    definitions: BTreeMap<String, String>,
    options: BTreeMap<String, OptionValue>,
}

fn slot(kind: DependencyKind) -> usize {
    match kind {
        DependencyKind::Public => 0,
        DependencyKind::Private => 1,
        DependencyKind::Dynamic => 2,
    }
}

impl<'a> Pass<'a> {
    /// Seed the pass from the declaration's unconditional fields.
    pub(crate) fn seed(declaration: &'a ModuleDeclaration) -> Self {
        let mut lists: [DependencyList; 3] = Default::default();
        for kind in DependencyKind::ALL {
            let list = &mut lists[slot(kind)];
            for name in declaration.dependencies(kind) {
                list.insert(name);
            }
        }

        Pass {
            declaration,
            lists,
            definitions: BTreeMap::new(),
            options: declaration.base_compile_options.clone(),
        }
    }

    /// Apply one effect.
    pub(crate) fn apply(&mut self, effect: &Effect) -> Outcome {
        match effect {
            Effect::AddDependency { kind, name } => {
                if self.lists[slot(*kind)].insert(name) {
                    Outcome::Added
                } else {
                    Outcome::AlreadyPresent
                }
            }
            Effect::Define { name, value } => {
                match self.definitions.insert(name.clone(), value.clone()) {
                    Some(previous) => Outcome::Redefined { previous },
                    None => Outcome::Defined,
                }
            }
            Effect::SetOption { name, value } => Outcome::OptionSet {
                previous: self.options.insert(name.clone(), value.clone()),
            },
        }
    }

    /// Validate the final lists and produce the descriptor.
    pub(crate) fn finish(self) -> Result<BuildDescriptor, ResolutionError> {
        let module = &self.declaration.name;

        for kind in DependencyKind::ALL {
            for name in &self.lists[slot(kind)].names {
                let sets: Vec<DependencyKind> = DependencyKind::ALL
                    .into_iter()
                    .filter(|k| self.lists[slot(*k)].contains(name))
                    .collect();

                if sets.len() > 1 {
                    return Err(ResolutionError::DependencyConflict {
                        module: module.clone(),
                        name: name.clone(),
                        sets,
                    });
                }
            }
        }

        for kind in DependencyKind::ALL {
            if self.lists[slot(kind)].contains(module) {
                return Err(ResolutionError::SelfDependency {
                    module: module.clone(),
                    set: kind,
                });
            }
        }

        let [public, private, dynamic] = self.lists;
        Ok(BuildDescriptor::new(
            module.clone(),
            self.declaration.public_include_paths.clone(),
            [public.names, private.names, dynamic.names],
            self.definitions,
            self.options,
        ))
    }
}

/// Resolve a module declaration under a target context.
///
/// The declaration is only borrowed; the returned descriptor is freshly
/// allocated and shares nothing with it.
pub fn resolve(
    declaration: &ModuleDeclaration,
    context: &TargetContext,
) -> Result<BuildDescriptor, ResolutionError> {
    let mut pass = Pass::seed(declaration);

    for (index, rule) in declaration.conditional_rules.iter().enumerate() {
        if !rule.predicate.holds(context) {
            continue;
        }
        let outcome = pass.apply(&rule.effect);
        tracing::debug!(
            module = %declaration.name,
            rule = index,
            "{} -> {}",
            rule.effect,
            outcome
        );
    }

    pass.finish()
}
