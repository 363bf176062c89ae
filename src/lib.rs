//! modrules - resolves declarative module rules into build descriptors
//!
//! A module declares its dependencies, include paths and compile options
//! together with conditional rules keyed on the build configuration tier,
//! the editor flag and the platform. This crate evaluates those rules for
//! one target context and produces a conflict-free, reproducible
//! [`BuildDescriptor`].

pub mod core;
pub mod resolver;
pub mod util;

/// Test fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    BuildDescriptor, ConfigurationTier, Manifest, ModuleDeclaration, Platform, TargetContext,
};

pub use resolver::{resolve, ResolutionError};
