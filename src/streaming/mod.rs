//! Outbound event streaming
//!
//! JSON event messages pushed to WebSocket subscribers.

pub mod messages;
mod ws_publisher;

pub use ws_publisher::WsPublisher;
