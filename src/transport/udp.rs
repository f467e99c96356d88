//! UDP listener feeding decoded frames to the engine
//!
//! Runs on its own thread. Datagrams are decoded inline and pushed into a
//! bounded channel with a blocking send: frames that decode are never
//! dropped, the channel just applies backpressure if the engine falls
//! behind. A read timeout keeps the loop responsive to shutdown.

use crate::error::{Error, Result};
use crate::transport::osc::decode_datagram;
use crate::types::Frame;
use crossbeam_channel::Sender;
use log::{error, info, trace, warn};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Largest datagram we accept; TUIO bundles are far smaller
const MAX_DATAGRAM_SIZE: usize = 65_536;

/// UDP receiver for OSC-encoded tracking frames
pub struct OscReceiver {
    socket: UdpSocket,
    frame_tx: Sender<Frame>,
    running: Arc<AtomicBool>,
    datagrams_received: u64,
    frames_decoded: u64,
}

impl OscReceiver {
    /// Wrap an already-bound socket. Binding happens in the app so address
    /// errors fail at startup.
    pub fn new(socket: UdpSocket, frame_tx: Sender<Frame>, running: Arc<AtomicBool>) -> Self {
        Self {
            socket,
            frame_tx,
            running,
            datagrams_received: 0,
            frames_decoded: 0,
        }
    }

    /// Run the receive loop until shutdown
    pub fn run(&mut self) -> Result<()> {
        self.socket
            .set_read_timeout(Some(Duration::from_millis(500)))?;

        let local = self.socket.local_addr()?;
        info!("OSC receiver listening on udp://{}", local);

        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        while self.running.load(Ordering::Relaxed) {
            match self.socket.recv_from(&mut buf) {
                Ok((len, addr)) => {
                    self.datagrams_received += 1;
                    let frame = decode_datagram(&buf[..len]);
                    if frame.is_empty() {
                        // Undecodable or irrelevant datagram, skip silently
                        trace!("No usable reports in {} bytes from {}", len, addr);
                        continue;
                    }
                    self.frames_decoded += 1;
                    self.frame_tx
                        .send(frame)
                        .map_err(|_| Error::ChannelDisconnected("frame channel"))?;
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    // Timeout, loop back and check the running flag
                }
                Err(e) => {
                    // Transient receive errors (e.g. ICMP-induced) are not fatal
                    warn!("UDP receive error: {}", e);
                }
            }
        }

        info!(
            "OSC receiver stopped ({} datagrams, {} frames decoded)",
            self.datagrams_received, self.frames_decoded
        );
        Ok(())
    }
}

/// Spawn the receiver on a named thread
pub fn spawn_receiver(
    socket: UdpSocket,
    frame_tx: Sender<Frame>,
    running: Arc<AtomicBool>,
) -> Result<std::thread::JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("osc-receiver".to_string())
        .spawn(move || {
            let mut receiver = OscReceiver::new(socket, frame_tx, running);
            if let Err(e) = receiver.run() {
                error!("OSC receiver error: {}", e);
            }
        })?;
    Ok(handle)
}
