//! Module declarations - the static, author-provided rules for one module.
//!
//! A declaration carries unconditional dependencies, include paths and
//! compile options plus an ordered list of conditional rules. Each rule is a
//! `(predicate, effect)` pair evaluated against a [`TargetContext`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::context::{ConfigurationTier, Platform, TargetContext};

/// Well-known compile option names.
pub mod options {
    /// Precompiled header strategy (text)
    pub const PCH_USAGE: &str = "pch-usage";
    /// Unity (jumbo) build batching (bool)
    pub const UNITY: &str = "unity";
    /// Minimum number of files before a PCH is used (integer)
    pub const MIN_FILES_USING_PCH: &str = "min-files-using-pch";
    /// Run-time type information (bool)
    pub const RTTI: &str = "rtti";
    /// C++ exception handling (bool)
    pub const EXCEPTIONS: &str = "exceptions";
    /// Legacy public include path behaviour (bool)
    pub const LEGACY_PUBLIC_INCLUDE_PATHS: &str = "legacy-public-include-paths";

    /// Options that must hold a boolean value.
    pub const BOOLEAN: &[&str] = &[UNITY, RTTI, EXCEPTIONS, LEGACY_PUBLIC_INCLUDE_PATHS];

    /// Options that must hold an integer value.
    pub const INTEGER: &[&str] = &[MIN_FILES_USING_PCH];

    /// Check whether an option name is one the build pipeline knows about.
    pub fn is_known(name: &str) -> bool {
        name == PCH_USAGE || BOOLEAN.contains(&name) || INTEGER.contains(&name)
    }
}

/// Which dependency list a module name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Propagates to dependents
    Public,
    /// Internal to this module
    Private,
    /// Loaded at runtime, not linked
    Dynamic,
}

impl DependencyKind {
    /// Every kind, in the order descriptors list them.
    pub const ALL: [DependencyKind; 3] = [
        DependencyKind::Public,
        DependencyKind::Private,
        DependencyKind::Dynamic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Public => "public",
            DependencyKind::Private => "private",
            DependencyKind::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar compile option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Integer(_) => "integer",
            OptionValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Integer(i)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

/// Facets of a target context a rule can test.
///
/// Every facet that is set must match; an empty condition matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Required editor flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<bool>,

    /// Tier must be one of these (if non-empty)
    #[serde(default, rename = "tier", skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<ConfigurationTier>,

    /// Tier must be none of these
    #[serde(default, rename = "not-tier", skip_serializing_if = "Vec::is_empty")]
    pub excluded_tiers: Vec<ConfigurationTier>,

    /// Platform must be one of these (if non-empty)
    #[serde(default, rename = "platform", skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Platform>,

    /// Platform must be none of these
    #[serde(default, rename = "not-platform", skip_serializing_if = "Vec::is_empty")]
    pub excluded_platforms: Vec<Platform>,
}

impl Condition {
    /// Condition on the editor flag.
    pub fn editor(requested: bool) -> Self {
        Condition {
            editor: Some(requested),
            ..Default::default()
        }
    }

    /// Condition requiring one of the given tiers.
    pub fn tier_in(tiers: impl IntoIterator<Item = ConfigurationTier>) -> Self {
        Condition {
            tiers: tiers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Condition excluding the given tiers.
    pub fn tier_not_in(tiers: impl IntoIterator<Item = ConfigurationTier>) -> Self {
        Condition {
            excluded_tiers: tiers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Condition requiring one of the given platforms.
    pub fn platform_in<P: Into<Platform>>(platforms: impl IntoIterator<Item = P>) -> Self {
        Condition {
            platforms: platforms.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check if this condition matches a target context.
    pub fn matches(&self, ctx: &TargetContext) -> bool {
        if let Some(editor) = self.editor {
            if editor != ctx.editor_requested() {
                return false;
            }
        }

        let tier = ctx.configuration_tier();
        if !self.tiers.is_empty() && !self.tiers.contains(&tier) {
            return false;
        }
        if self.excluded_tiers.contains(&tier) {
            return false;
        }

        let platform = ctx.platform();
        if !self.platforms.is_empty() && !self.platforms.contains(platform) {
            return false;
        }
        if self.excluded_platforms.contains(platform) {
            return false;
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self.editor.is_none()
            && self.tiers.is_empty()
            && self.excluded_tiers.is_empty()
            && self.platforms.is_empty()
            && self.excluded_platforms.is_empty()
    }
}

impl Condition {
    /// Human-readable facets, each negated when `negate` is set.
    fn facets(&self, negate: bool) -> Vec<String> {
        let join = |items: Vec<String>| items.join("|");
        let (is_in, not_in) = if negate {
            ("not in", "in")
        } else {
            ("in", "not in")
        };

        let mut parts = Vec::new();
        if let Some(editor) = self.editor {
            parts.push(format!("editor == {}", editor != negate));
        }
        if !self.tiers.is_empty() {
            parts.push(format!(
                "tier {} {}",
                is_in,
                join(self.tiers.iter().map(|t| t.to_string()).collect())
            ));
        }
        if !self.excluded_tiers.is_empty() {
            parts.push(format!(
                "tier {} {}",
                not_in,
                join(self.excluded_tiers.iter().map(|t| t.to_string()).collect())
            ));
        }
        if !self.platforms.is_empty() {
            parts.push(format!(
                "platform {} {}",
                is_in,
                join(self.platforms.iter().map(|p| p.to_string()).collect())
            ));
        }
        if !self.excluded_platforms.is_empty() {
            parts.push(format!(
                "platform {} {}",
                not_in,
                join(self.excluded_platforms.iter().map(|p| p.to_string()).collect())
            ));
        }
        parts
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.facets(false);
        if parts.is_empty() {
            f.write_str("always")
        } else {
            f.write_str(&parts.join(" && "))
        }
    }
}

/// When a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "condition", rename_all = "lowercase")]
pub enum Predicate {
    /// Applies under every context
    Always,
    /// Applies when the condition matches
    When(Condition),
    /// Applies when the condition does not match
    Unless(Condition),
}

impl Predicate {
    /// Evaluate against a target context.
    pub fn holds(&self, ctx: &TargetContext) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::When(cond) => cond.matches(ctx),
            Predicate::Unless(cond) => !cond.matches(ctx),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => f.write_str("always"),
            Predicate::When(cond) => write!(f, "when {}", cond),
            // Negation of a conjunction: any one facet failing is enough
            Predicate::Unless(cond) => {
                let parts = cond.facets(true);
                if parts.is_empty() {
                    f.write_str("never")
                } else {
                    write!(f, "when {}", parts.join(" || "))
                }
            }
        }
    }
}

/// What a satisfied rule does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Append a module name to a dependency list
    AddDependency { kind: DependencyKind, name: String },
    /// Set a preprocessor definition
    Define { name: String, value: String },
    /// Set a compile option
    SetOption { name: String, value: OptionValue },
}

impl Effect {
    pub fn add_dependency(kind: DependencyKind, name: impl Into<String>) -> Self {
        Effect::AddDependency {
            kind,
            name: name.into(),
        }
    }

    pub fn add_public(name: impl Into<String>) -> Self {
        Effect::add_dependency(DependencyKind::Public, name)
    }

    pub fn add_private(name: impl Into<String>) -> Self {
        Effect::add_dependency(DependencyKind::Private, name)
    }

    pub fn add_dynamic(name: impl Into<String>) -> Self {
        Effect::add_dependency(DependencyKind::Dynamic, name)
    }

    pub fn define(name: impl Into<String>, value: impl Into<String>) -> Self {
        Effect::Define {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn set_option(name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Effect::SetOption {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::AddDependency { kind, name } => {
                write!(f, "add `{}` to {} dependencies", name, kind)
            }
            Effect::Define { name, value } => write!(f, "define {}={}", name, value),
            Effect::SetOption { name, value } => write!(f, "set option {} = {}", name, value),
        }
    }
}

/// A conditional rule: an effect applied when its predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub predicate: Predicate,
    pub effect: Effect,
}

impl Rule {
    pub fn new(predicate: Predicate, effect: Effect) -> Self {
        Rule { predicate, effect }
    }

    pub fn always(effect: Effect) -> Self {
        Rule::new(Predicate::Always, effect)
    }

    pub fn when(condition: Condition, effect: Effect) -> Self {
        Rule::new(Predicate::When(condition), effect)
    }

    pub fn unless(condition: Condition, effect: Effect) -> Self {
        Rule::new(Predicate::Unless(condition), effect)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.predicate, self.effect)
    }
}

/// Errors found when validating a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("module name must not be empty")]
    EmptyName,

    #[error("module `{module}`: include path `{path}` is listed more than once")]
    DuplicateIncludePath { module: String, path: String },

    #[error("module `{module}`: `{name}` is listed more than once in {kind} dependencies")]
    DuplicateDependency {
        module: String,
        kind: DependencyKind,
        name: String,
    },

    #[error("module `{module}`: empty name in {kind} dependencies")]
    EmptyDependencyName { module: String, kind: DependencyKind },
}

/// The static declaration of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// The module's own name
    pub name: String,

    /// Public include paths, in declared order
    #[serde(default)]
    pub public_include_paths: Vec<String>,

    #[serde(default)]
    pub public_dependencies: Vec<String>,

    #[serde(default)]
    pub private_dependencies: Vec<String>,

    #[serde(default)]
    pub dynamic_dependencies: Vec<String>,

    /// Rules evaluated in order after the unconditional fields
    #[serde(default)]
    pub conditional_rules: Vec<Rule>,

    /// Option values before any rule applies
    #[serde(default)]
    pub base_compile_options: BTreeMap<String, OptionValue>,
}

impl ModuleDeclaration {
    /// Create an empty declaration for a module.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDeclaration {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_public_include_paths<S: Into<String>>(
        mut self,
        paths: impl IntoIterator<Item = S>,
    ) -> Self {
        self.public_include_paths
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_dependencies<S: Into<String>>(
        mut self,
        kind: DependencyKind,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.dependencies_mut(kind)
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_public_dependencies<S: Into<String>>(
        self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.with_dependencies(DependencyKind::Public, names)
    }

    pub fn with_private_dependencies<S: Into<String>>(
        self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.with_dependencies(DependencyKind::Private, names)
    }

    pub fn with_dynamic_dependencies<S: Into<String>>(
        self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.with_dependencies(DependencyKind::Dynamic, names)
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.base_compile_options.insert(name.into(), value.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.conditional_rules.push(rule);
        self
    }

    /// Get the unconditional dependencies of one kind.
    pub fn dependencies(&self, kind: DependencyKind) -> &[String] {
        match kind {
            DependencyKind::Public => &self.public_dependencies,
            DependencyKind::Private => &self.private_dependencies,
            DependencyKind::Dynamic => &self.dynamic_dependencies,
        }
    }

    fn dependencies_mut(&mut self, kind: DependencyKind) -> &mut Vec<String> {
        match kind {
            DependencyKind::Public => &mut self.public_dependencies,
            DependencyKind::Private => &mut self.private_dependencies,
            DependencyKind::Dynamic => &mut self.dynamic_dependencies,
        }
    }

    /// Check the declaration's own well-formedness.
    ///
    /// Cross-set overlap is not checked here; it is a resolution conflict and
    /// depends on which rules apply.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if self.name.trim().is_empty() {
            return Err(DeclarationError::EmptyName);
        }

        let mut seen = HashSet::new();
        for path in &self.public_include_paths {
            if !seen.insert(path.as_str()) {
                return Err(DeclarationError::DuplicateIncludePath {
                    module: self.name.clone(),
                    path: path.clone(),
                });
            }
        }

        for kind in DependencyKind::ALL {
            let mut seen = HashSet::new();
            for name in self.dependencies(kind) {
                if name.trim().is_empty() {
                    return Err(DeclarationError::EmptyDependencyName {
                        module: self.name.clone(),
                        kind,
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(DeclarationError::DuplicateDependency {
                        module: self.name.clone(),
                        kind,
                        name: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
