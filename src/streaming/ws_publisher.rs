//! WebSocket event publisher
//!
//! A dedicated thread owns the TCP listener and every client session.
//! The engine thread pushes resolved events to a lock-free queue and never
//! blocks on the network; this thread drains the queue and broadcasts each
//! event as a JSON text frame to all connected subscribers.
//!
//! Subscribers are sinks only. Inbound frames are read solely to service
//! the protocol (ping/pong, close); their content is ignored.

use crate::error::Result;
use crate::streaming::messages::EventMessage;
use crossbeam_queue::ArrayQueue;
use log::{debug, error, info, trace, warn};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tungstenite::{Message, WebSocket};

/// Queue depth between engine and publisher. At 60 ticks/sec this is many
/// seconds of headroom; overflow means no client is draining fast enough
/// and events are dropped (the sink is fire-and-forget).
const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Broadcast batch limit per loop iteration, keeps accepts responsive
const MAX_BATCH: usize = 64;

/// WebSocket publisher that fans events out to all connected clients
pub struct WsPublisher {
    event_queue: Arc<ArrayQueue<EventMessage>>,
    publisher_thread: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    client_count: Arc<AtomicUsize>,
    events_published: Arc<AtomicU64>,
}

impl WsPublisher {
    /// Bind the listener and spawn the publisher thread.
    ///
    /// Binding happens here so a bad address fails at startup, not inside
    /// the thread.
    pub fn new(bind_address: String) -> Result<Self> {
        let listener = TcpListener::bind(&bind_address)?;
        listener.set_nonblocking(true)?;

        let event_queue = Arc::new(ArrayQueue::new(EVENT_QUEUE_CAPACITY));
        let shutdown = Arc::new(AtomicBool::new(false));
        let client_count = Arc::new(AtomicUsize::new(0));
        let events_published = Arc::new(AtomicU64::new(0));

        let queue_clone = Arc::clone(&event_queue);
        let shutdown_clone = Arc::clone(&shutdown);
        let count_clone = Arc::clone(&client_count);
        let published_clone = Arc::clone(&events_published);

        let publisher_thread = thread::Builder::new()
            .name("ws-publisher".to_string())
            .spawn(move || {
                Self::publisher_loop(
                    listener,
                    queue_clone,
                    shutdown_clone,
                    count_clone,
                    published_clone,
                );
            })?;

        info!("WebSocket publisher listening on {}", bind_address);

        Ok(Self {
            event_queue,
            publisher_thread: Some(publisher_thread),
            shutdown,
            client_count,
            events_published,
        })
    }

    /// Queue handle for the engine thread.
    ///
    /// `push` is non-blocking; on a full queue the event is dropped by the
    /// caller with a warning.
    pub fn queue(&self) -> Arc<ArrayQueue<EventMessage>> {
        Arc::clone(&self.event_queue)
    }

    /// Currently connected subscriber count
    pub fn client_count(&self) -> usize {
        self.client_count.load(Ordering::Relaxed)
    }

    /// Total events broadcast since startup
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Request publisher shutdown
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Publisher thread main loop: accept, pump, broadcast
    fn publisher_loop(
        listener: TcpListener,
        queue: Arc<ArrayQueue<EventMessage>>,
        shutdown: Arc<AtomicBool>,
        client_count: Arc<AtomicUsize>,
        events_published: Arc<AtomicU64>,
    ) {
        let mut clients: Vec<WebSocket<TcpStream>> = Vec::new();

        while !shutdown.load(Ordering::Relaxed) {
            // Accept new subscribers (non-blocking)
            match listener.accept() {
                Ok((stream, addr)) => {
                    if let Some(ws) = Self::handshake(stream) {
                        info!("WebSocket client connected: {}", addr);
                        clients.push(ws);
                    } else {
                        warn!("WebSocket handshake failed for {}", addr);
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => {
                    error!("Error accepting WebSocket connection: {}", e);
                }
            }

            // Service inbound protocol traffic and drop dead sessions
            clients.retain_mut(|ws| Self::pump_client(ws));

            // Broadcast pending events in batches
            let mut batch = 0;
            while let Some(event) = queue.pop() {
                match event.to_json() {
                    Ok(json) => {
                        Self::broadcast(&mut clients, &json);
                        events_published.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        // Should not happen for our own message types
                        error!("Failed to serialize event: {}", e);
                    }
                }
                batch += 1;
                if batch >= MAX_BATCH {
                    break;
                }
            }

            client_count.store(clients.len(), Ordering::Relaxed);

            if queue.is_empty() {
                thread::sleep(Duration::from_millis(5));
            }
        }

        for ws in clients.iter_mut() {
            let _ = ws.close(None);
        }
        info!(
            "WebSocket publisher exiting ({} events published)",
            events_published.load(Ordering::Relaxed)
        );
    }

    /// Perform the server handshake on a freshly accepted stream.
    ///
    /// The handshake runs blocking with a short read timeout so a
    /// misbehaving client cannot stall the loop; the session itself then
    /// switches to non-blocking.
    fn handshake(stream: TcpStream) -> Option<WebSocket<TcpStream>> {
        if stream.set_nonblocking(false).is_err() {
            return None;
        }
        if stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .is_err()
        {
            return None;
        }

        match tungstenite::accept(stream) {
            Ok(ws) => {
                if ws.get_ref().set_nonblocking(true).is_err() {
                    return None;
                }
                Some(ws)
            }
            Err(e) => {
                debug!("Handshake error: {:?}", e);
                None
            }
        }
    }

    /// Drain inbound frames for one client. Returns false when the session
    /// is finished and should be dropped.
    fn pump_client(ws: &mut WebSocket<TcpStream>) -> bool {
        // Bounded read loop per iteration
        for _ in 0..8 {
            match ws.read() {
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected (close frame)");
                    return false;
                }
                Ok(msg) => {
                    // Subscribers have nothing to say; ping/pong handled
                    // internally by tungstenite
                    trace!("Ignoring inbound WebSocket message: {:?}", msg);
                }
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break;
                }
                Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => {
                    info!("WebSocket client disconnected");
                    return false;
                }
                Err(e) => {
                    warn!("WebSocket client error: {}", e);
                    return false;
                }
            }
        }

        // Push out any frames still buffered from a previous broadcast
        match ws.flush() {
            Ok(()) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                true
            }
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                info!("WebSocket client disconnected");
                false
            }
            Err(e) => {
                warn!("WebSocket flush error: {}", e);
                false
            }
        }
    }

    /// Send one JSON event to every client, dropping dead sessions
    fn broadcast(clients: &mut Vec<WebSocket<TcpStream>>, json: &str) {
        clients.retain_mut(|ws| match ws.send(Message::Text(json.to_string())) {
            Ok(()) => true,
            // Frame is queued in tungstenite's write buffer; flushed later
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                true
            }
            Err(tungstenite::Error::WriteBufferFull(_)) => {
                // Slow subscriber: drop this event for them, keep the session
                warn!("WebSocket client write buffer full, dropping event");
                true
            }
            Err(e) => {
                info!("WebSocket client disconnected: {}", e);
                false
            }
        });
    }
}

impl Drop for WsPublisher {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.publisher_thread.take() {
            let _ = thread.join();
        }
    }
}
