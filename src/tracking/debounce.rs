//! Debounce buffer
//!
//! Tracking hardware flickers: an object is lost and re-detected across
//! adjacent frames, which the reconciler faithfully reports as delete then
//! create. This buffer absorbs that by holding every delete back for exactly
//! one tick. If any action for the same key arrives before the next
//! resolution, the delete is superseded and never leaves the process.
//!
//! It also collapses duplicate creates caused by protocol-id churn: once a
//! key has been externally created, every later emission for it is an update
//! until a delete is actually confirmed.

use crate::streaming::messages::{EventKind, EventMessage, EventPayload};
use crate::tracking::reconciler::PendingAction;
use std::collections::HashMap;

/// Shadow state for one key that has been emitted at least once
#[derive(Debug, Clone)]
struct ObjectStatus {
    /// Set when a delete was resolved without a same-tick resurrection;
    /// the delete is emitted next tick unless the key comes back first
    delete_flagged: bool,
    /// Payload to emit if the flagged delete is confirmed
    last_payload: EventPayload,
}

/// Two-stage buffer between the reconciler and the event sink for one class
#[derive(Debug, Default)]
pub struct DebounceBuffer {
    /// This tick's actions, last-write-wins per key
    pending: HashMap<i32, PendingAction>,
    /// Persistent shadow table, one entry per externally-created key
    status: HashMap<i32, ObjectStatus>,
}

impl DebounceBuffer {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            status: HashMap::new(),
        }
    }

    /// Buffer one reconciler action for the current tick.
    ///
    /// A later action for the same key within the same tick replaces the
    /// earlier one.
    pub fn push(&mut self, action: PendingAction) {
        self.pending.insert(action.key(), action);
    }

    /// Resolve one tick: decide final emissions and update shadow state.
    ///
    /// Pass 1 settles deletes flagged on the previous tick (emit, unless the
    /// key resurfaced in this tick's buffer). Pass 2 settles this tick's
    /// buffered actions. The buffer is cleared afterwards; the status table
    /// persists across ticks.
    pub fn resolve(&mut self) -> Vec<EventMessage> {
        let mut events = Vec::new();

        // Pass 1: previously-flagged deletes
        let flagged: Vec<i32> = self
            .status
            .iter()
            .filter(|(_, s)| s.delete_flagged)
            .map(|(key, _)| *key)
            .collect();
        for key in flagged {
            if self.pending.contains_key(&key) {
                // Came back before the delete was confirmed: superseded
                if let Some(status) = self.status.get_mut(&key) {
                    status.delete_flagged = false;
                }
            } else if let Some(status) = self.status.remove(&key) {
                events.push(EventMessage {
                    action: EventKind::Delete,
                    payload: status.last_payload,
                });
            }
        }

        // Pass 2: this tick's buffered actions
        for (key, action) in self.pending.drain() {
            match action.kind {
                EventKind::Create | EventKind::Update => {
                    // Once created externally, everything after is an update
                    let kind = if self.status.contains_key(&key) {
                        EventKind::Update
                    } else {
                        EventKind::Create
                    };
                    let payload = EventPayload::from(&action.object);
                    self.status.insert(
                        key,
                        ObjectStatus {
                            delete_flagged: false,
                            last_payload: payload.clone(),
                        },
                    );
                    events.push(EventMessage {
                        action: kind,
                        payload,
                    });
                }
                EventKind::Delete => {
                    // Never emitted immediately. Flag for next tick; a delete
                    // of a key that was never created is a no-op.
                    if let Some(status) = self.status.get_mut(&key) {
                        status.delete_flagged = true;
                        status.last_payload = EventPayload::from(&action.object);
                    }
                }
            }
        }

        events
    }

    /// Number of keys with live shadow state
    pub fn tracked(&self) -> usize {
        self.status.len()
    }
}
