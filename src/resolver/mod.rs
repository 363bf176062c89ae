//! Module descriptor resolution.
//!
//! Turns a [`ModuleDeclaration`](crate::core::ModuleDeclaration) and a
//! [`TargetContext`](crate::core::TargetContext) into a
//! [`BuildDescriptor`](crate::core::BuildDescriptor). The resolver holds no
//! state between calls.

pub mod batch;
pub mod errors;
pub mod explain;
mod resolve;

pub use batch::{matrix_contexts, resolve_many, resolve_matrix, MatrixEntry};
pub use errors::{ResolutionError, ResolutionErrorKind};
pub use explain::{explain, Explanation, RuleTrace};
pub use resolve::{resolve, Outcome};
