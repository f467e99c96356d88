//! Per-class reconciliation contexts and frame/tick entry points
//!
//! One [`TrackingPipeline`] owns the registry, buffer, and status table for
//! both object classes. Frames and tick resolutions must be applied from a
//! single thread (the engine thread); frame diffs depend on the registry
//! state left by earlier frames, so processing is strictly serialized.

use crate::streaming::messages::EventMessage;
use crate::tracking::debounce::DebounceBuffer;
use crate::tracking::reconciler::Reconciler;
use crate::types::{Frame, ObjectClass, Report, TrackedObject};

/// Reconciler + debounce buffer for one object class
#[derive(Debug, Default)]
struct ClassPipeline {
    reconciler: Reconciler,
    buffer: DebounceBuffer,
}

impl ClassPipeline {
    fn apply_alive(&mut self, survivors: &[i32]) {
        for action in self.reconciler.apply_alive(survivors) {
            self.buffer.push(action);
        }
    }

    fn apply_set(&mut self, object: TrackedObject) {
        let action = self.reconciler.apply_set(object);
        self.buffer.push(action);
    }

    fn resolve(&mut self) -> Vec<EventMessage> {
        self.buffer.resolve()
    }
}

/// Full tracking pipeline, both classes
#[derive(Debug, Default)]
pub struct TrackingPipeline {
    touch: ClassPipeline,
    tag: ClassPipeline,
    frames_applied: u64,
}

impl TrackingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one decoded frame's reports to the registries and buffers
    pub fn apply_frame(&mut self, frame: Frame) {
        for report in frame.reports {
            match report {
                Report::Alive { class, survivors } => {
                    self.class_mut(class).apply_alive(&survivors);
                }
                Report::Set(object) => {
                    self.class_mut(object.class()).apply_set(object);
                }
            }
        }
        self.frames_applied += 1;
    }

    /// Run one debounce tick over both classes and collect final events
    pub fn resolve(&mut self) -> Vec<EventMessage> {
        let mut events = self.touch.resolve();
        events.extend(self.tag.resolve());
        events
    }

    /// Total frames applied since startup
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    fn class_mut(&mut self, class: ObjectClass) -> &mut ClassPipeline {
        match class {
            ObjectClass::Touch => &mut self.touch,
            ObjectClass::Tag => &mut self.tag,
        }
    }
}
