//! Application orchestration for the bridge daemon
//!
//! Wires the three threads together and owns shutdown:
//!
//! - `osc-receiver`: UDP datagrams -> decoded frames -> bounded channel
//! - `tracking-engine`: frame intake + periodic debounce resolution
//! - `ws-publisher`: event queue -> WebSocket broadcast
//!
//! The engine thread is the only place registries, buffers, and status
//! tables are touched, which gives the serialization the reconciler needs
//! without any locking.

use crate::config::AppConfig;
use crate::error::Result;
use crate::streaming::WsPublisher;
use crate::tracking::TrackingPipeline;
use crate::transport::spawn_receiver;
use crate::types::Frame;
use crossbeam_channel::{select, Receiver};
use log::{debug, info, warn};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Bounded frame queue between receiver and engine. Blocking send on the
/// receiver side: decodable frames are never dropped, only delayed.
const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Main application structure that manages all components
pub struct BridgeApp {
    config: AppConfig,
    publisher: WsPublisher,
    running: Arc<AtomicBool>,
    frames_applied: Arc<AtomicU64>,
}

impl BridgeApp {
    /// Create a new bridge instance.
    ///
    /// Validates configuration and binds the WebSocket listener so bad
    /// parameters fail here, not mid-run.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        info!("Setting up WebSocket publisher on {}", config.ws_addr());
        let publisher = WsPublisher::new(config.ws_addr())?;

        Ok(Self {
            config,
            publisher,
            running: Arc::new(AtomicBool::new(true)),
            frames_applied: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Shutdown flag handle for the signal handler
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Start all threads and block until shutdown is signaled
    pub fn run(&mut self) -> Result<()> {
        info!("Binding OSC listener on udp://{}", self.config.osc_addr());
        let socket = UdpSocket::bind(self.config.osc_addr())?;

        let (frame_tx, frame_rx) = crossbeam_channel::bounded(FRAME_CHANNEL_CAPACITY);
        let _receiver = spawn_receiver(socket, frame_tx, Arc::clone(&self.running))?;
        let engine = self.start_engine_thread(frame_rx)?;

        info!("Bridge running: OSC in on {}, events out on ws://{}",
            self.config.osc_addr(), self.config.ws_addr());
        info!("Press Ctrl+C to stop");

        let mut last_stats = Instant::now();
        while self.running.load(Ordering::Relaxed) {
            std::thread::sleep(Duration::from_millis(100));

            if last_stats.elapsed().as_secs() >= 10 {
                self.log_statistics();
                last_stats = Instant::now();
            }
        }

        info!("Shutdown signal received, stopping threads...");
        self.publisher.stop();
        let _ = engine.join();
        info!("Bridge stopped");
        Ok(())
    }

    /// Spawn the engine thread: serialized frame intake plus the periodic
    /// debounce tick, multiplexed over one `select!`
    fn start_engine_thread(&self, frame_rx: Receiver<Frame>) -> Result<JoinHandle<()>> {
        let queue = self.publisher.queue();
        let ticker = crossbeam_channel::tick(self.config.pipeline.tick_interval());
        let running = Arc::clone(&self.running);
        let frames_applied = Arc::clone(&self.frames_applied);

        let handle = std::thread::Builder::new()
            .name("tracking-engine".to_string())
            .spawn(move || {
                let mut pipeline = TrackingPipeline::new();
                debug!("Tracking engine started");

                while running.load(Ordering::Relaxed) {
                    select! {
                        recv(frame_rx) -> msg => match msg {
                            Ok(frame) => {
                                pipeline.apply_frame(frame);
                                frames_applied
                                    .store(pipeline.frames_applied(), Ordering::Relaxed);
                            }
                            Err(_) => {
                                debug!("Frame channel closed, engine exiting");
                                break;
                            }
                        },
                        recv(ticker) -> _ => {
                            for event in pipeline.resolve() {
                                if queue.push(event).is_err() {
                                    // Sink is fire-and-forget; a saturated
                                    // queue sheds load instead of blocking
                                    warn!("Event queue full, dropping event");
                                }
                            }
                        },
                    }
                }

                debug!(
                    "Tracking engine exiting ({} frames applied)",
                    pipeline.frames_applied()
                );
            })?;

        info!("✓ Tracking engine started");
        Ok(handle)
    }

    /// Log application statistics
    fn log_statistics(&self) {
        info!(
            "Stats: {} frames applied, {} events published, {} subscriber(s)",
            self.frames_applied.load(Ordering::Relaxed),
            self.publisher.events_published(),
            self.publisher.client_count()
        );
    }
}
