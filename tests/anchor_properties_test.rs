use kryon_layout::{
    Anchor, Attribute, ConstraintBuilder, ConstraintError, ConstraintExpression, ConstraintRegistry,
    ConstraintState, Priority, RecordingSink, SinkEvent,
};

#[test]
fn test_double_assignment_keeps_one_active_descriptor() {
    for attribute in Attribute::ALL {
        let mut registry = ConstraintRegistry::new();
        let a = Anchor::new(1);
        let b = Anchor::new(2);
        let c = Anchor::new(3);
        let target = a.attr(attribute);

        let (first, second) = if attribute.is_size() {
            (
                registry.assign(target, b.attr(attribute)).unwrap(),
                registry.assign(target, c.attr(attribute)).unwrap(),
            )
        } else {
            (
                registry.assign(target, b.left()).unwrap(),
                registry.assign(target, c.right()).unwrap(),
            )
        };

        let active: Vec<_> = registry.all_for(1).collect();
        assert_eq!(active.len(), 1, "{}", attribute);
        assert_eq!(active[0].id, second.id);
        assert!(active.iter().all(|d| d.id != first.id));
    }
}

#[test]
fn test_self_assignment_always_fails() {
    let mut registry = ConstraintRegistry::new();
    let a = Anchor::new(7);
    for attribute in Attribute::ALL {
        assert_eq!(
            registry.assign(a.attr(attribute), a.attr(attribute)),
            Err(ConstraintError::SelfReference(a.attr(attribute)))
        );
    }
    assert!(registry.is_empty());
}

#[test]
fn test_scaled_constant_width() {
    let mut registry = ConstraintRegistry::new();
    let a = Anchor::new(1);

    let value = ConstraintExpression::from_constant(50.0)
        .offset_by(0.0)
        .scale(2.0)
        .unwrap();
    let descriptor = registry.assign(a.width(), value).unwrap();

    assert!(descriptor.active());
    assert!(descriptor.source.reference.is_none());
    assert_eq!(descriptor.source.resolved_constant(), Some(100.0));
}

#[test]
fn test_constant_targets() {
    let mut registry = ConstraintRegistry::new();
    let a = Anchor::new(1);

    assert!(registry.assign(a.height(), 50).is_ok());
    assert_eq!(
        registry.assign(a.left(), 50),
        Err(ConstraintError::UnsupportedConstantTarget(a.left()))
    );
}

#[test]
fn test_unregister_without_descriptor_is_noop() {
    let mut registry = ConstraintRegistry::new();
    assert!(registry.unregister(1, Attribute::CenterY).is_none());
    assert_eq!(registry.stats().removed_total, 0);
}

#[test]
fn test_teardown_removes_everything() {
    let sink = RecordingSink::new();
    let mut registry = ConstraintRegistry::new().with_sink(Box::new(sink.clone()));
    let a = Anchor::new(1);
    let b = Anchor::new(2);

    let ids: Vec<_> = vec![
        registry.assign(a.top(), b.bottom()).unwrap().id,
        registry.assign(a.center_x(), b.center_x()).unwrap().id,
        registry.assign(a.height(), 30).unwrap().id,
    ];

    let removed = registry.teardown(1);
    assert_eq!(removed.iter().map(|d| d.id).collect::<Vec<_>>(), ids);
    assert!(removed.iter().all(|d| d.state == ConstraintState::Removed));
    assert_eq!(registry.all_for(1).count(), 0);

    let deactivated: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SinkEvent::Deactivated(d) => Some(d),
            SinkEvent::Activated(_) => None,
        })
        .collect();
    assert_eq!(deactivated.len(), 3);
    assert!(deactivated.iter().all(|d| d.state == ConstraintState::Removed));
}

#[test]
fn test_read_back_after_assignment() {
    let mut registry = ConstraintRegistry::new();
    let view_a = Anchor::new(1);
    let view_b = Anchor::new(2);

    registry.assign(view_a.left(), view_b.right()).unwrap();

    let expression = registry.expression_for(view_a.left()).unwrap();
    assert_eq!(
        *expression,
        ConstraintExpression {
            reference: Some(view_b.right()),
            multiplier: 1.0,
            offset: 0.0,
        }
    );
    // Reading a reference back does not change anything.
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_builder_priority_flows_into_registry() {
    let mut registry = ConstraintRegistry::new();
    let a = Anchor::new(1);
    let b = Anchor::new(2);

    let descriptor = ConstraintBuilder::new()
        .priority(Priority::new(500).unwrap())
        .assign(
            &mut registry,
            a.width(),
            ConstraintExpression::from(b.width()).scale(0.5).unwrap().offset_by(10.0),
        )
        .unwrap();

    let stored = registry.get(a.width()).unwrap();
    assert_eq!(stored, &descriptor);
    assert_eq!(stored.priority.value(), 500);
    assert_eq!(stored.source.evaluate(300.0), 160.0);
}
