// crates/kryon-core/src/properties.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ConstraintError, Result};

/// Constraint strength, 1 (weakest) to 1000 (required).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Priority(u16);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000);
    pub const HIGH: Priority = Priority(750);
    pub const LOW: Priority = Priority(250);

    pub fn new(value: u16) -> Result<Self> {
        if (1..=1000).contains(&value) {
            Ok(Priority(value))
        } else {
            Err(ConstraintError::InvalidPriority(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn is_required(self) -> bool {
        self == Priority::REQUIRED
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::REQUIRED
    }
}

impl TryFrom<u16> for Priority {
    type Error = ConstraintError;

    fn try_from(value: u16) -> Result<Self> {
        Priority::new(value)
    }
}

impl From<Priority> for u16 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_required() {
            write!(f, "required")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Options recognized at assignment time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignOptions {
    pub priority: Priority,
}

impl AssignOptions {
    pub fn with_priority(priority: Priority) -> Self {
        Self { priority }
    }
}

/// Lifecycle of a constraint descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintState {
    /// Built, not yet registered.
    Pending,
    /// Registered and visible to the host.
    Active,
    /// Replaced by a later assignment to the same attribute.
    Superseded,
    /// Cleared explicitly or torn down with its participant.
    Removed,
}

impl ConstraintState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConstraintState::Superseded | ConstraintState::Removed)
    }

    pub fn can_transition_to(self, next: ConstraintState) -> bool {
        matches!(
            (self, next),
            (ConstraintState::Pending, ConstraintState::Active)
                | (ConstraintState::Active, ConstraintState::Superseded)
                | (ConstraintState::Active, ConstraintState::Removed)
        )
    }

    pub fn transition(self, next: ConstraintState) -> Result<ConstraintState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ConstraintError::InvalidTransition { from: self, to: next })
        }
    }
}
