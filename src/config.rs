//! Configuration for the TUIO bridge daemon
//!
//! Loads configuration from a TOML file with the minimal parameters needed
//! to run the bridge: listen ports and the debounce tick rate.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Network configuration (listen ports)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Address both listeners bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// UDP port the TUIO tracker sends OSC packets to
    #[serde(default = "default_osc_port")]
    pub osc_port: u16,

    /// TCP port the WebSocket event stream is served on
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,
}

/// Reconciliation pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Debounce resolution rate in Hz
    ///
    /// Each tick resolves the buffered actions and flushes final events to
    /// connected clients. One tick interval is also the flicker-suppression
    /// window for deletes.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: f64,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_osc_port() -> u16 {
    3333
}

fn default_ws_port() -> u16 {
    9000
}

fn default_tick_rate_hz() -> f64 {
    60.0
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            osc_port: default_osc_port(),
            ws_port: default_ws_port(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast sanity checks on construction parameters
    pub fn validate(&self) -> Result<()> {
        if self.network.osc_port == 0 {
            return Err(Error::InvalidParameter("osc_port must be non-zero".into()));
        }
        if self.network.ws_port == 0 {
            return Err(Error::InvalidParameter("ws_port must be non-zero".into()));
        }
        if self.network.osc_port == self.network.ws_port {
            return Err(Error::InvalidParameter(format!(
                "osc_port and ws_port must differ (both {})",
                self.network.osc_port
            )));
        }
        if !self.pipeline.tick_rate_hz.is_finite() || self.pipeline.tick_rate_hz <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tick_rate_hz must be positive, got {}",
                self.pipeline.tick_rate_hz
            )));
        }
        Ok(())
    }

    /// OSC listener socket address
    pub fn osc_addr(&self) -> String {
        format!("{}:{}", self.network.bind_address, self.network.osc_port)
    }

    /// WebSocket listener socket address
    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.network.bind_address, self.network.ws_port)
    }
}

impl PipelineConfig {
    /// Duration of one debounce tick (default ~16.6ms at 60 Hz)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }
}
