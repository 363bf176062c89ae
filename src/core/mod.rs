//! Core data structures.
//!
//! This module contains the foundational types:
//! - Target contexts (what a build request looks like)
//! - Module declarations and their conditional rules
//! - Build descriptors (resolved output)
//! - Module.toml manifests

pub mod context;
pub mod declaration;
pub mod descriptor;
pub mod manifest;

pub use context::{ConfigurationTier, InvalidContext, Platform, TargetContext};
pub use declaration::{
    Condition, DeclarationError, DependencyKind, Effect, ModuleDeclaration, OptionValue,
    Predicate, Rule,
};
pub use descriptor::BuildDescriptor;
pub use manifest::{find_manifest, Manifest, ManifestError, MANIFEST_NAME};
