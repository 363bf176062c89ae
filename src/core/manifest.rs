//! Module.toml manifest parsing and schema.
//!
//! The manifest is the author-facing form of a [`ModuleDeclaration`]:
//!
//! ```toml
//! [module]
//! name = "SurvivalGame"
//!
//! [dependencies]
//! public = ["Core", "Engine"]
//!
//! [[rule]]
//! when = { not-tier = ["shipping"] }
//! define = ["WITH_GAMEPLAY_DEBUGGER=1"]
//! otherwise = { define = ["WITH_GAMEPLAY_DEBUGGER=0"] }
//! ```
//!
//! Each `[[rule]]` table expands into one rule per effect, in the order
//! public, private, dynamic, define, options. `otherwise` effects follow,
//! guarded by the negated condition.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::declaration::{
    options, Condition, DeclarationError, DependencyKind, Effect, ModuleDeclaration,
    OptionValue, Predicate, Rule,
};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Module.toml";

/// Errors from loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error("option `{name}` must be {expected}, found {found}")]
    InvalidOption {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid definition `{entry}`: expected NAME or NAME=VALUE")]
    InvalidDefinition { entry: String },

    #[error("rule #{rule} has `otherwise` effects but no `when` condition")]
    OtherwiseWithoutCondition { rule: usize },
}

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// The validated declaration
    pub declaration: ModuleDeclaration,

    /// Path the manifest was read from
    pub path: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    module: RawModule,

    #[serde(default)]
    include: RawInclude,

    #[serde(default)]
    dependencies: RawDependencies,

    #[serde(default)]
    options: BTreeMap<String, toml::Value>,

    #[serde(default, rename = "rule")]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModule {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInclude {
    #[serde(default)]
    public: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependencies {
    #[serde(default)]
    public: Vec<String>,

    #[serde(default)]
    private: Vec<String>,

    #[serde(default)]
    dynamic: Vec<String>,
}

/// Effects of one branch of a rule table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEffects {
    #[serde(default)]
    public: Vec<String>,

    #[serde(default)]
    private: Vec<String>,

    #[serde(default)]
    dynamic: Vec<String>,

    /// `NAME=VALUE` entries
    #[serde(default)]
    define: Vec<String>,

    #[serde(default)]
    options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    #[serde(default)]
    when: Option<Condition>,

    #[serde(default)]
    public: Vec<String>,

    #[serde(default)]
    private: Vec<String>,

    #[serde(default)]
    dynamic: Vec<String>,

    #[serde(default)]
    define: Vec<String>,

    #[serde(default)]
    options: BTreeMap<String, toml::Value>,

    #[serde(default)]
    otherwise: Option<RawEffects>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut base_compile_options = BTreeMap::new();
        for (name, value) in raw.options {
            let value = option_value(&name, value)?;
            base_compile_options.insert(name, value);
        }

        let mut rules = Vec::new();
        for (index, raw_rule) in raw.rules.into_iter().enumerate() {
            expand_rule(index, raw_rule, &mut rules)?;
        }

        let declaration = ModuleDeclaration {
            name: raw.module.name,
            public_include_paths: raw.include.public,
            public_dependencies: raw.dependencies.public,
            private_dependencies: raw.dependencies.private,
            dynamic_dependencies: raw.dependencies.dynamic,
            conditional_rules: rules,
            base_compile_options,
        };
        declaration.validate()?;

        tracing::debug!(
            module = %declaration.name,
            rules = declaration.conditional_rules.len(),
            "loaded manifest {}",
            path.display()
        );

        Ok(Manifest {
            declaration,
            path: path.to_path_buf(),
        })
    }

    /// Directory containing the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

fn expand_rule(index: usize, raw: RawRule, rules: &mut Vec<Rule>) -> Result<(), ManifestError> {
    let RawRule {
        when,
        public,
        private,
        dynamic,
        define,
        options,
        otherwise,
    } = raw;
    let then = RawEffects {
        public,
        private,
        dynamic,
        define,
        options,
    };
    let condition = when.filter(|c| !c.is_empty());

    let predicate = match &condition {
        Some(cond) => Predicate::When(cond.clone()),
        None => Predicate::Always,
    };
    expand_effects(&predicate, then, rules)?;

    if let Some(otherwise) = otherwise {
        let Some(cond) = condition else {
            return Err(ManifestError::OtherwiseWithoutCondition { rule: index });
        };
        expand_effects(&Predicate::Unless(cond), otherwise, rules)?;
    }

    Ok(())
}

fn expand_effects(
    predicate: &Predicate,
    effects: RawEffects,
    rules: &mut Vec<Rule>,
) -> Result<(), ManifestError> {
    let deps = [
        (DependencyKind::Public, effects.public),
        (DependencyKind::Private, effects.private),
        (DependencyKind::Dynamic, effects.dynamic),
    ];
    for (kind, names) in deps {
        for name in names {
            rules.push(Rule::new(
                predicate.clone(),
                Effect::add_dependency(kind, name),
            ));
        }
    }

    for entry in effects.define {
        let (name, value) = parse_definition(&entry)?;
        rules.push(Rule::new(predicate.clone(), Effect::define(name, value)));
    }

    for (name, value) in effects.options {
        let value = option_value(&name, value)?;
        rules.push(Rule::new(predicate.clone(), Effect::set_option(name, value)));
    }

    Ok(())
}

/// Split a `NAME=VALUE` definition; a bare `NAME` means `NAME=1`.
pub fn parse_definition(entry: &str) -> Result<(String, String), ManifestError> {
    let (name, value) = match entry.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (entry.trim(), "1"),
    };

    let valid_name = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_name {
        return Err(ManifestError::InvalidDefinition {
            entry: entry.to_string(),
        });
    }

    Ok((name.to_string(), value.to_string()))
}

/// Convert a raw TOML option value, rejecting types options cannot hold.
fn option_value(name: &str, value: toml::Value) -> Result<OptionValue, ManifestError> {
    let value = match value {
        toml::Value::Boolean(b) => OptionValue::Bool(b),
        toml::Value::Integer(i) => OptionValue::Integer(i),
        toml::Value::String(s) => OptionValue::Text(s),
        other => {
            return Err(ManifestError::InvalidOption {
                name: name.to_string(),
                expected: "a boolean, integer or string",
                found: other.type_str(),
            })
        }
    };

    check_option(name, &value)?;
    Ok(value)
}

fn check_option(name: &str, value: &OptionValue) -> Result<(), ManifestError> {
    let expected = if options::BOOLEAN.contains(&name) {
        value.as_bool().is_none().then_some("a boolean")
    } else if options::INTEGER.contains(&name) {
        value.as_integer().is_none().then_some("an integer")
    } else if name == options::PCH_USAGE {
        value.as_text().is_none().then_some("a string")
    } else {
        tracing::debug!("option `{}` is not a well-known option", name);
        None
    };

    match expected {
        Some(expected) => Err(ManifestError::InvalidOption {
            name: name.to_string(),
            expected,
            found: value.type_name(),
        }),
        None => Ok(()),
    }
}

/// Find Module.toml in `start` or any of its ancestors.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}
