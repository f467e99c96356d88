//! tuio-bridge daemon entry point
//!
//! ## Architecture
//!
//! - **UDP (port 3333)**: TUIO/OSC tracking frames in (lossy, stateless)
//! - **WebSocket (port 9000)**: debounced CREATE/UPDATE/DELETE events out

use std::env;
use std::path::Path;
use std::sync::atomic::Ordering;
use tuio_bridge::app::BridgeApp;
use tuio_bridge::config::AppConfig;
use tuio_bridge::error::{Error, Result};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `tuio-bridge <path>` (positional)
/// - `tuio-bridge --config <path>` (flag-based)
/// - `tuio-bridge -c <path>` (short flag)
///
/// Defaults to `/etc/tuio-bridge.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/tuio-bridge.toml".to_string()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("tuio-bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = parse_config_path();
    let config = if Path::new(&config_path).exists() {
        log::info!("Using config: {}", config_path);
        AppConfig::from_file(&config_path)?
    } else {
        log::info!("No config at {}, using defaults", config_path);
        AppConfig::default()
    };

    let mut app = BridgeApp::new(config)?;

    let running = app.running_flag();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        running.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    app.run()
}
