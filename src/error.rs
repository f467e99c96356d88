//! Error types for the TUIO bridge

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge error types
///
/// Malformed protocol input is deliberately NOT represented here: the TUIO
/// stream is lossy-tolerant and undecodable reports are skipped at the
/// transport layer without surfacing an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Invalid configuration or construction parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal channel closed unexpectedly
    #[error("Channel disconnected: {0}")]
    ChannelDisconnected(&'static str),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
