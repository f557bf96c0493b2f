// crates/kryon-layout/src/registry.rs

//! Per-participant store of active constraints.
//!
//! Each participant owns an attribute-indexed slot array, so a second
//! assignment to the same attribute replaces the first instead of stacking
//! a conflicting constraint next to it. The registry keys participants by
//! [`ElementId`] only and never keeps the host element alive; the host calls
//! [`ConstraintRegistry::teardown`] when the element goes away.

use std::collections::HashMap;

use kryon_core::{
    AssignOptions, Attribute, AttributeReference, ConstraintState, ElementId, Priority, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    validate, AssignableValue, ConstraintBuilder, ConstraintDescriptor, ConstraintExpression,
    ConstraintSink, DescriptorId, NullSink,
};

/// Configuration for the constraint registry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Priority used by [`ConstraintRegistry::assign`]
    pub default_priority: Priority,
    /// Whether to log every register/supersede/remove
    pub debug_logging: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_priority: Priority::REQUIRED,
            debug_logging: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    sequence: u64,
    descriptor: ConstraintDescriptor,
}

type Slots = [Option<Slot>; Attribute::COUNT];

#[derive(Debug)]
struct ParticipantConstraints {
    slots: Slots,
}

impl ParticipantConstraints {
    fn new() -> Self {
        Self {
            slots: [const { None }; Attribute::COUNT],
        }
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

/// Active descriptors of one participant in insertion order.
///
/// Walks the slot array on demand; cloning restarts from the same point.
#[derive(Debug, Clone)]
pub struct ActiveConstraints<'a> {
    slots: Option<&'a Slots>,
    after: Option<u64>,
}

impl<'a> Iterator for ActiveConstraints<'a> {
    type Item = &'a ConstraintDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let after = self.after;
        let slot = self
            .slots?
            .iter()
            .flatten()
            .filter(|slot| after.map_or(true, |seq| slot.sequence > seq))
            .min_by_key(|slot| slot.sequence)?;
        self.after = Some(slot.sequence);
        Some(&slot.descriptor)
    }
}

pub struct ConstraintRegistry {
    participants: HashMap<ElementId, ParticipantConstraints>,
    sink: Box<dyn ConstraintSink>,
    config: RegistryConfig,
    next_id: DescriptorId,
    next_sequence: u64,
    superseded_total: usize,
    removed_total: usize,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            participants: HashMap::new(),
            sink: Box::new(NullSink),
            config,
            next_id: 1,
            next_sequence: 0,
            superseded_total: 0,
            removed_total: 0,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ConstraintSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Builder carrying the registry's default options.
    pub fn builder(&self) -> ConstraintBuilder {
        ConstraintBuilder::with_options(AssignOptions::with_priority(self.config.default_priority))
    }

    /// `target = value` with the default priority.
    pub fn assign(
        &mut self,
        target: AttributeReference,
        value: impl Into<AssignableValue>,
    ) -> Result<ConstraintDescriptor> {
        self.builder().assign(self, target, value)
    }

    /// Installs a pending descriptor, superseding whatever held its
    /// (participant, attribute) slot. Returns the active copy.
    ///
    /// Hand-built descriptors go through the same checks as
    /// [`ConstraintBuilder::canonicalize`]; a rejected one leaves the
    /// registry and the sink untouched.
    pub fn register(&mut self, mut descriptor: ConstraintDescriptor) -> Result<ConstraintDescriptor> {
        descriptor.warning = validate(descriptor.target, &descriptor.source)?;
        descriptor.advance(ConstraintState::Active)?;
        descriptor.id = self.next_id;
        self.next_id += 1;

        let target = descriptor.target;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let entry = self
            .participants
            .entry(target.participant)
            .or_insert_with(ParticipantConstraints::new);
        let slot = &mut entry.slots[target.attribute.index()];

        if let Some(mut previous) = slot.take() {
            previous.descriptor.advance(ConstraintState::Superseded)?;
            self.superseded_total += 1;
            if self.config.debug_logging {
                debug!(
                    "Superseded constraint {} ({}) by {}",
                    previous.descriptor.id, previous.descriptor, descriptor.id
                );
            }
            self.sink.deactivate(&previous.descriptor);
        }

        *slot = Some(Slot {
            sequence,
            descriptor: descriptor.clone(),
        });

        if self.config.debug_logging {
            debug!("Registered constraint {}: {}", descriptor.id, descriptor);
        }
        self.sink.activate(&descriptor);

        Ok(descriptor)
    }

    /// Clears one attribute. Does nothing when it holds no constraint.
    pub fn unregister(
        &mut self,
        participant: ElementId,
        attribute: Attribute,
    ) -> Option<ConstraintDescriptor> {
        let entry = self.participants.get_mut(&participant)?;
        let mut removed = entry.slots[attribute.index()].take()?.descriptor;
        if entry.is_empty() {
            self.participants.remove(&participant);
        }

        self.retire(&mut removed);
        Some(removed)
    }

    /// Drops every constraint of a destroyed participant, in insertion order.
    pub fn teardown(&mut self, participant: ElementId) -> Vec<ConstraintDescriptor> {
        let Some(entry) = self.participants.remove(&participant) else {
            return Vec::new();
        };

        let mut slots: Vec<Slot> = entry.slots.into_iter().flatten().collect();
        slots.sort_by_key(|slot| slot.sequence);

        let removed: Vec<ConstraintDescriptor> = slots
            .into_iter()
            .map(|slot| {
                let mut descriptor = slot.descriptor;
                self.retire(&mut descriptor);
                descriptor
            })
            .collect();

        if self.config.debug_logging {
            debug!("Tore down participant {} ({} constraints)", participant, removed.len());
        }
        removed
    }

    fn retire(&mut self, descriptor: &mut ConstraintDescriptor) {
        // Stored descriptors are always active.
        if descriptor.advance(ConstraintState::Removed).is_ok() {
            self.removed_total += 1;
            if self.config.debug_logging {
                debug!("Removed constraint {}: {}", descriptor.id, descriptor);
            }
            self.sink.deactivate(descriptor);
        }
    }

    pub fn all_for(&self, participant: ElementId) -> ActiveConstraints<'_> {
        ActiveConstraints {
            slots: self.participants.get(&participant).map(|entry| &entry.slots),
            after: None,
        }
    }

    pub fn get(&self, reference: AttributeReference) -> Option<&ConstraintDescriptor> {
        self.participants
            .get(&reference.participant)?
            .slots[reference.attribute.index()]
            .as_ref()
            .map(|slot| &slot.descriptor)
    }

    /// What `reference` is currently assigned to.
    pub fn expression_for(&self, reference: AttributeReference) -> Option<&ConstraintExpression> {
        self.get(reference).map(|descriptor| &descriptor.source)
    }

    pub fn len(&self) -> usize {
        self.participants.values().map(ParticipantConstraints::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            participant_count: self.participants.len(),
            active_count: self.len(),
            superseded_total: self.superseded_total,
            removed_total: self.removed_total,
        }
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub participant_count: usize,
    pub active_count: usize,
    pub superseded_total: usize,
    pub removed_total: usize,
}
