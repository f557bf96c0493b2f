// crates/kryon-layout/src/constraints.rs

use std::fmt;

use kryon_core::{AttributeReference, ConstraintState, ConstraintWarning, Priority, Result};
use serde::{Deserialize, Serialize};

use crate::ConstraintExpression;

pub type DescriptorId = u64;

/// One resolved constraint, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    pub id: DescriptorId,
    pub target: AttributeReference,
    pub source: ConstraintExpression,
    pub priority: Priority,
    pub state: ConstraintState,
    pub warning: Option<ConstraintWarning>,
}

impl ConstraintDescriptor {
    pub fn new(
        id: DescriptorId,
        target: AttributeReference,
        source: ConstraintExpression,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            target,
            source,
            priority,
            state: ConstraintState::Pending,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<ConstraintWarning>) -> Self {
        self.warning = warning;
        self
    }

    pub fn active(&self) -> bool {
        self.state == ConstraintState::Active
    }

    /// A fixed-size constraint has no source reference.
    pub fn is_fixed(&self) -> bool {
        self.source.is_constant()
    }

    pub(crate) fn advance(&mut self, next: ConstraintState) -> Result<()> {
        self.state = self.state.transition(next)?;
        Ok(())
    }
}

impl fmt::Display for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.source)?;
        if !self.priority.is_required() {
            write!(f, " @{}", self.priority)?;
        }
        Ok(())
    }
}
