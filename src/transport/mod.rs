//! Inbound tracking transport
//!
//! UDP listener plus OSC decoding. Everything lossy-tolerant: a datagram
//! that cannot be decoded, an unknown address, verb, or argument shape is
//! skipped without surfacing an error. Frames that do decode are delivered
//! to the engine in arrival order and are never dropped.

pub mod osc;
mod udp;

pub use udp::{spawn_receiver, OscReceiver};
