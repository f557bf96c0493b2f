// crates/kryon-layout/src/lib.rs

//! Anchor constraints for Kryon layouts.
//!
//! `header.left = sidebar.right + 8` becomes a [`ConstraintDescriptor`]
//! describing `target = multiplier * source + offset`. Solving is left to
//! whatever [`ConstraintSink`] the host plugs into the registry.

pub mod builder;
pub mod constraints;
pub mod expression;
pub mod registry;
pub mod script;
pub mod sink;

pub use builder::*;
pub use constraints::*;
pub use expression::*;
pub use registry::*;
pub use script::*;
pub use sink::*;

pub use kryon_core::{
    Anchor, AssignOptions, Attribute, AttributeKind, AttributeReference, Axis, ConstraintError,
    ConstraintState, ConstraintWarning, ElementId, Priority,
};
