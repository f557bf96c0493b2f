// crates/kryon-layout/src/expression.rs

use std::fmt;

use kryon_core::{AttributeReference, ConstraintError, Result};
use serde::{Deserialize, Serialize};

/// Right-hand side of `target = multiplier * source + offset`.
///
/// Composition is a linear transform applied in call order, so
/// `e.offset_by(c).scale(k)` equals `e.scale(k).offset_by(k * c)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintExpression {
    pub reference: Option<AttributeReference>,
    pub multiplier: f32,
    pub offset: f32,
}

impl ConstraintExpression {
    pub fn from_reference(reference: AttributeReference) -> Self {
        Self {
            reference: Some(reference),
            multiplier: 1.0,
            offset: 0.0,
        }
    }

    /// A fixed value. Only size attributes accept it.
    pub fn from_constant(value: f32) -> Self {
        Self {
            reference: None,
            multiplier: 1.0,
            offset: value,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.reference.is_none()
    }

    /// Multiplies both multiplier and offset by `factor`.
    pub fn scale(self, factor: f32) -> Result<Self> {
        if let Some(reference) = self.reference {
            if reference.attribute.is_positional() && factor != 1.0 {
                return Err(ConstraintError::InvalidOperand {
                    attribute: reference.attribute,
                    factor,
                });
            }
        }

        Ok(Self {
            reference: self.reference,
            multiplier: self.multiplier * factor,
            offset: self.offset * factor,
        })
    }

    pub fn offset_by(self, amount: f32) -> Self {
        Self {
            offset: self.offset + amount,
            ..self
        }
    }

    /// The fixed value of a reference-less expression.
    pub fn resolved_constant(&self) -> Option<f32> {
        match self.reference {
            None => Some(self.offset),
            Some(_) => None,
        }
    }

    /// Applies the transform to a known source value.
    pub fn evaluate(&self, source_value: f32) -> f32 {
        match self.reference {
            Some(_) => self.multiplier * source_value + self.offset,
            None => self.offset,
        }
    }
}

impl From<AttributeReference> for ConstraintExpression {
    fn from(reference: AttributeReference) -> Self {
        ConstraintExpression::from_reference(reference)
    }
}

impl fmt::Display for ConstraintExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(reference) = self.reference else {
            return write!(f, "{}", self.offset);
        };

        write!(f, "{}", reference)?;
        if self.multiplier != 1.0 {
            write!(f, " * {}", self.multiplier)?;
        }
        if self.offset > 0.0 {
            write!(f, " + {}", self.offset)?;
        } else if self.offset < 0.0 {
            write!(f, " - {}", -self.offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kryon_core::{Anchor, Attribute};

    #[test]
    fn test_reference_defaults_to_identity() {
        let b = Anchor::new(2);
        let expr = ConstraintExpression::from(b.right());
        assert_eq!(expr.reference, Some(b.right()));
        assert_eq!(expr.multiplier, 1.0);
        assert_eq!(expr.offset, 0.0);
    }

    #[test]
    fn test_scaling_constant() {
        let expr = ConstraintExpression::from_constant(50.0)
            .offset_by(0.0)
            .scale(2.0)
            .unwrap();
        assert!(expr.is_constant());
        assert_eq!(expr.resolved_constant(), Some(100.0));
    }

    #[test]
    fn test_scaling_positional_is_rejected() {
        let a = Anchor::new(1);
        let err = ConstraintExpression::from(a.left()).scale(2.0).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::InvalidOperand {
                attribute: Attribute::Left,
                factor: 2.0,
            }
        );

        // Identity scale is harmless on any attribute.
        assert!(ConstraintExpression::from(a.baseline()).scale(1.0).is_ok());
    }

    #[test]
    fn test_composition_order() {
        let w = Anchor::new(3).width();
        let lhs = ConstraintExpression::from(w).offset_by(8.0).scale(0.5).unwrap();
        let rhs = ConstraintExpression::from(w).scale(0.5).unwrap().offset_by(0.5 * 8.0);
        assert_eq!(lhs, rhs);
        assert_eq!(lhs.multiplier, 0.5);
        assert_eq!(lhs.offset, 4.0);
        assert_eq!(lhs.evaluate(200.0), 104.0);
    }

    #[test]
    fn test_display() {
        let a = Anchor::new(1);
        assert_eq!(ConstraintExpression::from(a.right()).offset_by(8.0).to_string(), "#1.right + 8");
        assert_eq!(ConstraintExpression::from(a.top()).offset_by(-4.0).to_string(), "#1.top - 4");
        assert_eq!(
            ConstraintExpression::from(a.height()).scale(0.5).unwrap().to_string(),
            "#1.height * 0.5"
        );
        assert_eq!(ConstraintExpression::from_constant(50.0).to_string(), "50");
    }
}
