//! Snapshot reconciler
//!
//! Maintains the live registry of tracked objects for one class and turns
//! each report into classified pending actions. The registry is keyed by the
//! transient protocol id, because that is what `alive` reports enumerate;
//! the stable output key only matters downstream in the debounce buffer.

use crate::streaming::messages::EventKind;
use crate::types::TrackedObject;
use std::collections::HashMap;

/// A classified action produced by the reconciler, consumed by the
/// debounce buffer within the same tick or carried to the next
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub kind: EventKind,
    /// Object state backing the action. For deletes this is the last known
    /// state before removal.
    pub object: TrackedObject,
}

impl PendingAction {
    /// Key this action is buffered under (stable output identity)
    pub fn key(&self) -> i32 {
        self.object.output_key()
    }
}

/// Per-class registry plus snapshot-to-diff logic
#[derive(Debug, Default)]
pub struct Reconciler {
    registry: HashMap<i32, TrackedObject>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
        }
    }

    /// Apply an `alive` report carrying the complete survivor list.
    ///
    /// Every registered object whose protocol id is absent from the list is
    /// gone: it is removed from the registry and a delete action carrying its
    /// last known state is returned. An empty survivor list is the "nothing
    /// is alive" signal and clears the whole registry. Objects present in
    /// the list are left untouched; their state changes arrive via `set`.
    pub fn apply_alive(&mut self, survivors: &[i32]) -> Vec<PendingAction> {
        let gone: Vec<i32> = self
            .registry
            .keys()
            .filter(|id| !survivors.contains(id))
            .copied()
            .collect();

        let mut actions = Vec::with_capacity(gone.len());
        for id in gone {
            if let Some(object) = self.registry.remove(&id) {
                actions.push(PendingAction {
                    kind: EventKind::Delete,
                    object,
                });
            }
        }
        actions
    }

    /// Apply a `set` report carrying one object's full current state.
    ///
    /// Returns an update action if the protocol id is already registered,
    /// otherwise a create. The registry entry is replaced wholesale either
    /// way.
    pub fn apply_set(&mut self, object: TrackedObject) -> PendingAction {
        let kind = if self.registry.contains_key(&object.session_id()) {
            EventKind::Update
        } else {
            EventKind::Create
        };
        self.registry.insert(object.session_id(), object);
        PendingAction { kind, object }
    }

    /// Number of currently registered objects
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaggedObject, TouchPoint};

    fn touch(id: i32, x: f32, y: f32) -> TrackedObject {
        TrackedObject::Touch(TouchPoint { id, x, y })
    }

    fn tag(id: i32, tag_id: i32) -> TrackedObject {
        TrackedObject::Tag(TaggedObject {
            id,
            tag_id,
            x: 1.0,
            y: 1.0,
            angle: 0.0,
        })
    }

    #[test]
    fn test_first_set_is_create() {
        let mut rec = Reconciler::new();
        let action = rec.apply_set(touch(5, 0.1, 0.2));
        assert_eq!(action.kind, EventKind::Create);
        assert_eq!(action.key(), 5);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_second_set_same_id_is_update() {
        let mut rec = Reconciler::new();
        rec.apply_set(touch(5, 0.1, 0.2));
        let action = rec.apply_set(touch(5, 0.3, 0.4));
        assert_eq!(action.kind, EventKind::Update);
        assert_eq!(action.object, touch(5, 0.3, 0.4));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_empty_alive_clears_registry() {
        let mut rec = Reconciler::new();
        rec.apply_set(touch(1, 0.0, 0.0));
        rec.apply_set(touch(2, 0.5, 0.5));

        let actions = rec.apply_alive(&[]);
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.kind == EventKind::Delete));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_empty_alive_on_empty_registry_is_noop() {
        let mut rec = Reconciler::new();
        assert!(rec.apply_alive(&[]).is_empty());
        assert!(rec.is_empty());
    }

    #[test]
    fn test_alive_deletes_absent_ids_only() {
        let mut rec = Reconciler::new();
        rec.apply_set(touch(1, 0.0, 0.0));
        rec.apply_set(touch(2, 0.5, 0.5));
        rec.apply_set(touch(3, 0.9, 0.9));

        let actions = rec.apply_alive(&[1, 3]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, EventKind::Delete);
        assert_eq!(actions[0].key(), 2);
        assert_eq!(actions[0].object, touch(2, 0.5, 0.5));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_alive_with_unknown_survivors_changes_nothing() {
        let mut rec = Reconciler::new();
        rec.apply_set(touch(1, 0.0, 0.0));
        // Survivor list may mention ids we have not seen a set for yet
        let actions = rec.apply_alive(&[1, 99]);
        assert!(actions.is_empty());
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_tag_delete_carries_last_state() {
        let mut rec = Reconciler::new();
        rec.apply_set(tag(9, 42));
        let actions = rec.apply_alive(&[]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].key(), 42);
        assert_eq!(actions[0].object, tag(9, 42));
    }
}
