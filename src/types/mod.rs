//! Data types shared across the bridge

mod object;
mod report;

pub use object::{ObjectClass, TaggedObject, TouchPoint, TrackedObject};
pub use report::{Frame, Report};
