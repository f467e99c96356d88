//! Decoded tracking-frame model
//!
//! The transport decoder turns each UDP datagram into one [`Frame`] holding
//! the report groups it could decode. Reports the decoder does not recognize
//! never make it this far; by the time a frame reaches the reconciler it is
//! well-formed.

use crate::types::{ObjectClass, TrackedObject};

/// One report group from a tracking frame
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Complete list of currently-present protocol ids for one class.
    /// An empty list means nothing of that class is on the surface.
    Alive {
        class: ObjectClass,
        survivors: Vec<i32>,
    },
    /// Full current state of one object
    Set(TrackedObject),
}

/// One decoded tracking frame (one UDP datagram's worth of reports)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub reports: Vec<Report>,
}

impl Frame {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
