//! Tracked-object model
//!
//! TUIO reports two independent object classes on the surface: transient
//! touch points and physical markers carrying a fiducial tag. Both share
//! identity and position; tags add a stable logical id and an orientation.

/// Object class reported by the tracker
///
/// Touches and tags are fully independent streams: separate registries,
/// separate debounce state, no cross-class interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// Finger touch point (`/tuio/2Dcur`)
    Touch,
    /// Tagged physical object (`/tuio/2Dobj`)
    Tag,
}

/// A finger touch point on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Transient tracking id, unique within the touch class at any instant.
    /// May be reused by the tracker after a delete.
    pub id: i32,
    /// Position in protocol units, passed through unchanged
    pub x: f32,
    pub y: f32,
}

/// A tagged physical object on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedObject {
    /// Transient tracking id; churns when the marker is lost and re-detected
    pub id: i32,
    /// Stable logical identity of the physical marker. This, not `id`, is
    /// what clients key events on.
    pub tag_id: i32,
    /// Position in protocol units, passed through unchanged
    pub x: f32,
    pub y: f32,
    /// Orientation in protocol units
    pub angle: f32,
}

/// A tracked object of either class
///
/// Instances live only inside the per-class registry and are replaced
/// wholesale on every `set` report; there is no partial field mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackedObject {
    Touch(TouchPoint),
    Tag(TaggedObject),
}

impl TrackedObject {
    /// Class this object belongs to
    pub fn class(&self) -> ObjectClass {
        match self {
            Self::Touch(_) => ObjectClass::Touch,
            Self::Tag(_) => ObjectClass::Tag,
        }
    }

    /// Transient protocol id, the registry key
    pub fn session_id(&self) -> i32 {
        match self {
            Self::Touch(t) => t.id,
            Self::Tag(t) => t.id,
        }
    }

    /// Key identifying this object in output events and the debounce buffer:
    /// the protocol id for touches, the stable tag id for tagged objects
    pub fn output_key(&self) -> i32 {
        match self {
            Self::Touch(t) => t.id,
            Self::Tag(t) => t.tag_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_keys_match() {
        let obj = TrackedObject::Touch(TouchPoint {
            id: 5,
            x: 0.1,
            y: 0.2,
        });
        assert_eq!(obj.class(), ObjectClass::Touch);
        assert_eq!(obj.session_id(), 5);
        assert_eq!(obj.output_key(), 5);
    }

    #[test]
    fn test_tag_output_key_is_tag_id() {
        let obj = TrackedObject::Tag(TaggedObject {
            id: 9,
            tag_id: 42,
            x: 1.0,
            y: 1.0,
            angle: 0.0,
        });
        assert_eq!(obj.class(), ObjectClass::Tag);
        assert_eq!(obj.session_id(), 9);
        assert_eq!(obj.output_key(), 42);
    }
}
