// crates/kryon-layout/src/builder.rs

//! Canonicalization of `target = value` assignments.
//!
//! A value is either another attribute, a composed expression or a bare
//! number. The builder checks the pairing, produces a pending
//! [`ConstraintDescriptor`] and, through [`ConstraintBuilder::assign`],
//! registers it. Every check runs before the registry is touched, so a
//! failed assignment leaves no trace.

use kryon_core::{
    AssignOptions, AttributeReference, ConstraintError, ConstraintWarning, Priority, Result,
};
use tracing::warn;

use crate::{ConstraintDescriptor, ConstraintExpression, ConstraintRegistry};

/// Anything that may stand on the right-hand side of an assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignableValue {
    Reference(AttributeReference),
    Expression(ConstraintExpression),
    Constant(f32),
}

impl From<AttributeReference> for AssignableValue {
    fn from(reference: AttributeReference) -> Self {
        AssignableValue::Reference(reference)
    }
}

impl From<ConstraintExpression> for AssignableValue {
    fn from(expression: ConstraintExpression) -> Self {
        AssignableValue::Expression(expression)
    }
}

impl From<f32> for AssignableValue {
    fn from(value: f32) -> Self {
        AssignableValue::Constant(value)
    }
}

impl From<f64> for AssignableValue {
    fn from(value: f64) -> Self {
        AssignableValue::Constant(value as f32)
    }
}

impl From<i32> for AssignableValue {
    fn from(value: i32) -> Self {
        AssignableValue::Constant(value as f32)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintBuilder {
    options: AssignOptions,
}

impl ConstraintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AssignOptions) -> Self {
        Self { options }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.options.priority = priority;
        self
    }

    pub fn options(&self) -> AssignOptions {
        self.options
    }

    /// Builds a pending descriptor without registering it. Its id stays 0
    /// until the registry installs it.
    pub fn canonicalize(
        &self,
        target: AttributeReference,
        value: impl Into<AssignableValue>,
    ) -> Result<ConstraintDescriptor> {
        let source = match value.into() {
            AssignableValue::Constant(c) => ConstraintExpression::from_constant(c),
            AssignableValue::Reference(r) => ConstraintExpression::from_reference(r),
            AssignableValue::Expression(e) => match e.resolved_constant() {
                Some(c) => ConstraintExpression::from_constant(c),
                None => e,
            },
        };

        let warning = validate(target, &source)?;
        if let Some(warning) = warning {
            warn!("{}", warning);
        }

        Ok(ConstraintDescriptor::new(0, target, source, self.options.priority).with_warning(warning))
    }

    /// Canonicalizes and registers; returns the now active descriptor.
    pub fn assign(
        &self,
        registry: &mut ConstraintRegistry,
        target: AttributeReference,
        value: impl Into<AssignableValue>,
    ) -> Result<ConstraintDescriptor> {
        let descriptor = self.canonicalize(target, value)?;
        registry.register(descriptor)
    }
}

/// Checks that `source` may be assigned to `target`.
///
/// Shared by [`ConstraintBuilder::canonicalize`] and
/// [`ConstraintRegistry::register`], so descriptors built by hand obey the
/// same rules as built ones. An axis mismatch is returned, not logged.
pub fn validate(
    target: AttributeReference,
    source: &ConstraintExpression,
) -> Result<Option<ConstraintWarning>> {
    let Some(referenced) = source.reference else {
        if !target.attribute.is_size() {
            return Err(ConstraintError::UnsupportedConstantTarget(target));
        }
        return Ok(None);
    };

    if target.is_same_as(&referenced) {
        return Err(ConstraintError::SelfReference(target));
    }

    if target.attribute.kind() != referenced.attribute.kind() {
        return Err(ConstraintError::IncompatibleAttributes { target, referenced });
    }

    // Expressions built by hand can skip `scale`'s check.
    if referenced.attribute.is_positional() && source.multiplier != 1.0 {
        return Err(ConstraintError::InvalidOperand {
            attribute: referenced.attribute,
            factor: source.multiplier,
        });
    }

    Ok((referenced.attribute.is_positional()
        && target.attribute.axis() != referenced.attribute.axis())
    .then_some(ConstraintWarning::AxisMismatch {
        target,
        source: referenced,
    }))
}
