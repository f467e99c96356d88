//! tuio-bridge - TUIO tracking to WebSocket push-event bridge
//!
//! Listens for TUIO/OSC tracking frames over UDP, reconciles the stateless
//! snapshot protocol into a live object registry, debounces tracking
//! flicker, and pushes a minimal stream of CREATE/UPDATE/DELETE events to
//! WebSocket subscribers.

pub mod app;
pub mod config;
pub mod error;
pub mod streaming;
pub mod tracking;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
