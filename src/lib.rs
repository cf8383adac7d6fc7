//! # Runtime PropTypes from static types
//!
//! Reads a TypeScript/TSX unit, finds React components whose props (and
//! context) are described by type annotations, and inserts equivalent
//! `prop-types` validators next to them.
//!
//! ## Pipeline
//!
//! 1. **Registry**: every type declaration and type-only import is recorded
//!    in a per-unit [`registry::TypeRegistry`] as it is encountered.
//! 2. **Projection**: annotations are lowered to [`types::TypeDescriptor`]s
//!    and projected to [`validator::ValidatorDescriptor`]s.
//! 3. **Building**: descriptors are rendered as `PropTypes.*` expressions.
//! 4. **Insertion**: validators are attached as a static class member or a
//!    `Component.propTypes = ...` assignment, merged with hand-written
//!    validators and optionally guarded for dead-code elimination.
//!
//! Exported types additionally get a `__proptype_<Name>` binding so other
//! units can reuse them through ordinary imports.

mod annotate;
mod builder;
mod context;
mod dce;
mod edits;
mod error;
mod imports;
mod js;
mod lower;
mod options;
mod project;
mod registry;
mod transform;
mod types;
mod validator;

#[cfg(test)]
mod project_tests;

pub use error::{TransformError, Warning, WarningKind};
pub use options::{DeadCode, PluginOptions};
pub use transform::{transform_source, TransformOutput};

#[cfg(feature = "napi")]
pub use transform::transform_native;
