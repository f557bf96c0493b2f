// crates/kryon-layout/src/sink.rs

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::ConstraintDescriptor;

/// Host side of the registry. Translates descriptors into native constraints
/// and owns solving, activation and removal from the live layout pass.
pub trait ConstraintSink {
    fn activate(&mut self, descriptor: &ConstraintDescriptor);
    fn deactivate(&mut self, descriptor: &ConstraintDescriptor);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl ConstraintSink for NullSink {
    fn activate(&mut self, _descriptor: &ConstraintDescriptor) {}
    fn deactivate(&mut self, _descriptor: &ConstraintDescriptor) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SinkEvent {
    Activated(ConstraintDescriptor),
    Deactivated(ConstraintDescriptor),
}

/// Records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ConstraintSink for RecordingSink {
    fn activate(&mut self, descriptor: &ConstraintDescriptor) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Activated(descriptor.clone()));
    }

    fn deactivate(&mut self, descriptor: &ConstraintDescriptor) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Deactivated(descriptor.clone()));
    }
}
