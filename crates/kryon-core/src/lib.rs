// crates/kryon-core/src/lib.rs
pub mod elements;
pub mod properties;

pub use elements::*;
pub use properties::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintError {
    #[error("Invalid operand: cannot scale positional attribute {attribute} by {factor}")]
    InvalidOperand { attribute: Attribute, factor: f32 },

    #[error("Unsupported constant target: {0} only accepts attribute references")]
    UnsupportedConstantTarget(AttributeReference),

    #[error("Self reference: {0} cannot be assigned to itself")]
    SelfReference(AttributeReference),

    #[error("Incompatible attributes: {target} cannot reference {referenced}")]
    IncompatibleAttributes {
        target: AttributeReference,
        referenced: AttributeReference,
    },

    #[error("Invalid priority: {0} (expected 1..=1000)")]
    InvalidPriority(u16),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ConstraintState,
        to: ConstraintState,
    },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Non-fatal findings reported alongside a successful assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConstraintWarning {
    /// Target and source lie on different axes, e.g. `left` tied to `top`.
    AxisMismatch {
        target: AttributeReference,
        source: AttributeReference,
    },
}

impl std::fmt::Display for ConstraintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintWarning::AxisMismatch { target, source } => write!(
                f,
                "axis mismatch: {} ({:?}) references {} ({:?})",
                target,
                target.attribute.axis(),
                source,
                source.attribute.axis()
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConstraintError>;
