//! End-to-end pipeline scenarios: decoded frames in, resolved events out.
//!
//! Drives the tracking pipeline exactly the way the engine thread does,
//! with explicit resolve calls standing in for the debounce ticker.

use tuio_bridge::streaming::messages::{EventKind, EventPayload};
use tuio_bridge::tracking::TrackingPipeline;
use tuio_bridge::transport::osc::decode_datagram;
use tuio_bridge::types::{Frame, ObjectClass, Report, TaggedObject, TouchPoint, TrackedObject};

fn set_touch(id: i32, x: f32, y: f32) -> Frame {
    Frame::new(vec![Report::Set(TrackedObject::Touch(TouchPoint {
        id,
        x,
        y,
    }))])
}

fn set_tag(id: i32, tag_id: i32, x: f32, y: f32, angle: f32) -> Frame {
    Frame::new(vec![Report::Set(TrackedObject::Tag(TaggedObject {
        id,
        tag_id,
        x,
        y,
        angle,
    }))])
}

fn alive(class: ObjectClass, survivors: Vec<i32>) -> Frame {
    Frame::new(vec![Report::Alive { class, survivors }])
}

#[test]
fn touch_lifecycle_with_lagging_delete() {
    let mut pipeline = TrackingPipeline::new();

    // Frame 1: new touch appears
    pipeline.apply_frame(set_touch(5, 0.1, 0.2));
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Create);
    assert_eq!(
        events[0].payload,
        EventPayload::Touch {
            id: 5,
            x: 0.1,
            y: 0.2
        }
    );

    // Frame 2: empty alive list, touch is gone internally but the delete
    // is held back for one tick
    pipeline.apply_frame(alive(ObjectClass::Touch, vec![]));
    assert!(pipeline.resolve().is_empty());

    // No resurrection: the delete surfaces on the next tick with the last
    // known payload
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Delete);
    assert_eq!(
        events[0].payload,
        EventPayload::Touch {
            id: 5,
            x: 0.1,
            y: 0.2
        }
    );

    // Quiescent afterwards
    assert!(pipeline.resolve().is_empty());
}

#[test]
fn tag_create_then_update_keyed_by_tag_id() {
    let mut pipeline = TrackingPipeline::new();

    pipeline.apply_frame(set_tag(9, 42, 1.0, 1.0, 0.0));
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Create);
    assert_eq!(
        events[0].payload,
        EventPayload::Tag {
            id: 42,
            x: 1.0,
            y: 1.0,
            angle: 0.0
        }
    );

    pipeline.apply_frame(set_tag(9, 42, 1.5, 1.0, 0.0));
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Update);
    assert_eq!(
        events[0].payload,
        EventPayload::Tag {
            id: 42,
            x: 1.5,
            y: 1.0,
            angle: 0.0
        }
    );
}

#[test]
fn tag_flicker_with_session_id_churn_never_emits_delete() {
    let mut pipeline = TrackingPipeline::new();

    pipeline.apply_frame(set_tag(9, 42, 1.0, 1.0, 0.0));
    pipeline.resolve();

    // Marker momentarily lost: tracker clears it...
    pipeline.apply_frame(alive(ObjectClass::Tag, vec![]));
    assert!(pipeline.resolve().is_empty());

    // ...and re-detects it with a fresh session id before the next tick.
    // The flagged delete is superseded; the client sees a plain update.
    pipeline.apply_frame(set_tag(11, 42, 1.1, 1.0, 0.1));
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Update);
    assert_eq!(
        events[0].payload,
        EventPayload::Tag {
            id: 42,
            x: 1.1,
            y: 1.0,
            angle: 0.1
        }
    );

    assert!(pipeline.resolve().is_empty());
}

#[test]
fn delete_without_prior_emission_is_silent() {
    let mut pipeline = TrackingPipeline::new();

    // Set and full clear land within the same tick: the touch never became
    // externally visible, so nothing is ever emitted for it
    pipeline.apply_frame(set_touch(7, 0.3, 0.3));
    pipeline.apply_frame(alive(ObjectClass::Touch, vec![]));
    let events = pipeline.resolve();
    // Last-write-wins in the buffer: the delete overrode the create, and a
    // delete of a never-created key is a no-op
    assert!(events.is_empty());
    assert!(pipeline.resolve().is_empty());
}

// OSC byte-level helpers for the datagram-driven scenario

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn osc_message(address: &str, tags: &str, args: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_str(&mut buf, address);
    push_str(&mut buf, &format!(",{}", tags));
    buf.extend_from_slice(args);
    buf
}

fn osc_bundle(messages: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"#bundle\0");
    buf.extend_from_slice(&[0u8; 8]);
    for msg in messages {
        buf.extend_from_slice(&(msg.len() as i32).to_be_bytes());
        buf.extend_from_slice(msg);
    }
    buf
}

#[test]
fn datagram_to_events_round() {
    let mut pipeline = TrackingPipeline::new();

    // A realistic TUIO frame: alive + set + fseq in one bundle
    let mut alive_args = Vec::new();
    push_str(&mut alive_args, "alive");
    alive_args.extend_from_slice(&5i32.to_be_bytes());

    let mut set_args = Vec::new();
    push_str(&mut set_args, "set");
    set_args.extend_from_slice(&5i32.to_be_bytes());
    set_args.extend_from_slice(&0.25f32.to_be_bytes());
    set_args.extend_from_slice(&0.75f32.to_be_bytes());

    let mut fseq_args = Vec::new();
    push_str(&mut fseq_args, "fseq");
    fseq_args.extend_from_slice(&100i32.to_be_bytes());

    let datagram = osc_bundle(&[
        osc_message("/tuio/2Dcur", "si", &alive_args),
        osc_message("/tuio/2Dcur", "siff", &set_args),
        osc_message("/tuio/2Dcur", "si", &fseq_args),
    ]);

    let frame = decode_datagram(&datagram);
    assert_eq!(frame.reports.len(), 2); // fseq skipped

    pipeline.apply_frame(frame);
    let events = pipeline.resolve();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventKind::Create);
    assert_eq!(
        events[0].payload,
        EventPayload::Touch {
            id: 5,
            x: 0.25,
            y: 0.75
        }
    );
}
