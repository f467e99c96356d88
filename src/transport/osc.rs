//! OSC decoder for TUIO datagrams
//!
//! TUIO trackers send OSC packets over UDP, usually as a `#bundle` wrapping
//! one message per report group. Only what the bridge needs is decoded:
//!
//! - addresses `/tuio/2Dcur` (touch) and `/tuio/2Dobj` (tag)
//! - verbs `alive` and `set` (`fseq` and `source` are skipped)
//! - argument types `i`, `f`, `s`
//!
//! `set` takes the leading arguments it needs and ignores TUIO's trailing
//! velocity/acceleration components. Anything that does not fit is skipped
//! silently; the protocol has no delivery guarantees and the stream
//! self-heals on the next snapshot.

use crate::types::{Frame, ObjectClass, Report, TaggedObject, TouchPoint, TrackedObject};
use log::trace;

const BUNDLE_HEADER: &[u8] = b"#bundle\0";
const TOUCH_ADDRESS: &str = "/tuio/2Dcur";
const TAG_ADDRESS: &str = "/tuio/2Dobj";
const ALIVE_VERB: &str = "alive";
const SET_VERB: &str = "set";

/// Nested bundles are legal OSC; TUIO never goes deep
const MAX_BUNDLE_DEPTH: usize = 4;

/// Decode one UDP datagram into a frame.
///
/// The frame contains every report group that decoded cleanly; it may be
/// empty.
pub fn decode_datagram(data: &[u8]) -> Frame {
    let mut reports = Vec::new();
    collect_packet(data, &mut reports, 0);
    Frame::new(reports)
}

fn collect_packet(data: &[u8], reports: &mut Vec<Report>, depth: usize) {
    if depth > MAX_BUNDLE_DEPTH {
        trace!("Bundle nesting too deep, skipping");
        return;
    }
    if data.starts_with(BUNDLE_HEADER) {
        collect_bundle(data, reports, depth);
    } else if let Some(report) = parse_message(data) {
        reports.push(report);
    }
}

/// Walk a `#bundle`: 8-byte header, 8-byte timetag, then size-prefixed
/// elements. The timetag is ignored; delivery time is arrival time.
fn collect_bundle(data: &[u8], reports: &mut Vec<Report>, depth: usize) {
    let mut pos = BUNDLE_HEADER.len() + 8;
    while pos + 4 <= data.len() {
        let size = i32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]);
        pos += 4;
        if size <= 0 {
            return;
        }
        let size = size as usize;
        if pos + size > data.len() {
            trace!("Truncated bundle element, skipping rest");
            return;
        }
        collect_packet(&data[pos..pos + size], reports, depth + 1);
        pos += size;
    }
}

/// One decoded OSC argument
#[derive(Debug, Clone, PartialEq)]
enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
}

impl OscArg {
    fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats are the norm; integers are widened since some trackers send
    /// whole-number coordinates as `i`
    fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse one OSC message into a report, or None if it is not a usable
/// TUIO report group
fn parse_message(data: &[u8]) -> Option<Report> {
    let mut reader = OscReader::new(data);

    let address = reader.read_string()?;
    let class = match address {
        TOUCH_ADDRESS => ObjectClass::Touch,
        TAG_ADDRESS => ObjectClass::Tag,
        _ => return None,
    };

    let tags = reader.read_string()?;
    let tags = tags.strip_prefix(',')?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'i' => OscArg::Int(reader.read_i32()?),
            'f' => OscArg::Float(reader.read_f32()?),
            's' => OscArg::Str(reader.read_string()?.to_string()),
            _ => {
                trace!("Unsupported OSC type tag '{}', skipping message", tag);
                return None;
            }
        };
        args.push(arg);
    }

    let verb = args.first()?.as_str()?;
    match verb {
        ALIVE_VERB => parse_alive(class, &args[1..]),
        SET_VERB => parse_set(class, &args[1..]),
        _ => None,
    }
}

fn parse_alive(class: ObjectClass, args: &[OscArg]) -> Option<Report> {
    let mut survivors = Vec::with_capacity(args.len());
    for arg in args {
        survivors.push(arg.as_i32()?);
    }
    Some(Report::Alive { class, survivors })
}

fn parse_set(class: ObjectClass, args: &[OscArg]) -> Option<Report> {
    let object = match class {
        ObjectClass::Touch => {
            if args.len() < 3 {
                return None;
            }
            TrackedObject::Touch(TouchPoint {
                id: args[0].as_i32()?,
                x: args[1].as_f32()?,
                y: args[2].as_f32()?,
            })
        }
        ObjectClass::Tag => {
            if args.len() < 5 {
                return None;
            }
            TrackedObject::Tag(TaggedObject {
                id: args[0].as_i32()?,
                tag_id: args[1].as_i32()?,
                x: args[2].as_f32()?,
                y: args[3].as_f32()?,
                angle: args[4].as_f32()?,
            })
        }
    };
    Some(Report::Set(object))
}

/// Cursor over one OSC packet's bytes
struct OscReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> OscReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read a NUL-terminated string padded to a 4-byte boundary
    fn read_string(&mut self) -> Option<&'a str> {
        let rest = self.data.get(self.pos..)?;
        let nul = rest.iter().position(|&b| b == 0)?;
        let s = std::str::from_utf8(&rest[..nul]).ok()?;
        let padded = (nul + 4) & !3;
        if padded > rest.len() {
            return None;
        }
        self.pos += padded;
        Some(s)
    }

    fn read_i32(&mut self) -> Option<i32> {
        let bytes = self.read_4()?;
        Some(i32::from_be_bytes(bytes))
    }

    fn read_f32(&mut self) -> Option<f32> {
        let bytes = self.read_4()?;
        Some(f32::from_be_bytes(bytes))
    }

    fn read_4(&mut self) -> Option<[u8; 4]> {
        let rest = self.data.get(self.pos..self.pos + 4)?;
        self.pos += 4;
        Some([rest[0], rest[1], rest[2], rest[3]])
    }
}
