// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TCP client: asynchronous connect with a deadline, background receive
//! loop, per-frame drain.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{NetError, NetworkError};
use crate::framing::{self, Defragmenter};
use crate::{HANDSHAKE, TIMEOUT_CODE};

/// How long the receive loop blocks in one `read` before re-checking the
/// shutdown flag.
const READ_TIMEOUT: Duration = Duration::from_millis(50);
/// Receive buffer size per read.
const RECV_CHUNK: usize = 256;

/// Where a client is in its connection lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection and none in flight.
    Idle,
    /// A connect attempt is running in the background.
    Connecting,
    /// Connected; the receive loop is live.
    Connected,
}

/// State shared with the background worker thread.
struct Shared {
    inbox: Mutex<Vec<u8>>,
    errors: Mutex<VecDeque<NetworkError>>,
    stream: Mutex<Option<TcpStream>>,
    connected: AtomicBool,
    shutdown: AtomicBool,
}

impl Shared {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inbox: Mutex::new(Vec::new()),
            errors: Mutex::new(VecDeque::new()),
            stream: Mutex::new(None),
            connected: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        })
    }

    fn push_error(&self, error: NetworkError) {
        lock(&self.errors).push_back(error);
    }
}

/// The thread-facing half of a connection: everything [`Client`] owns
/// except its (non-`Send`) callbacks. This is what the server's accept
/// thread builds and hands across to the main thread.
pub(crate) struct Connection {
    pub(crate) addr: SocketAddr,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Connection {
    /// Wraps an accepted, handshook server-side stream and spawns its
    /// receive loop.
    pub(crate) fn from_accepted(stream: TcpStream, addr: SocketAddr) -> std::io::Result<Self> {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        let shared = Shared::new();
        *lock(&shared.stream) = Some(stream.try_clone()?);
        shared.connected.store(true, Ordering::Release);

        let thread_shared = shared.clone();
        let worker = std::thread::Builder::new()
            .name(format!("viva-net-recv-{addr}"))
            .spawn(move || receive_loop(&thread_shared, stream))?;

        Ok(Self {
            addr,
            shared,
            worker: Some(worker),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Connect worker: TCP connect, consume and verify the handshake, then
/// run the receive loop on the same thread.
fn connect_worker(shared: &Arc<Shared>, addr: SocketAddr) {
    let mut stream = match TcpStream::connect(addr) {
        Ok(stream) => stream,
        Err(err) => {
            shared.push_error(NetworkError::from_io(&err));
            return;
        }
    };

    let mut hello = [0_u8; HANDSHAKE.len()];
    if let Err(err) = stream.read_exact(&mut hello) {
        shared.push_error(NetworkError::from_io(&err));
        return;
    }
    if &hello != HANDSHAKE {
        shared.push_error(NetworkError {
            message: String::from("handshake mismatch"),
            code: TIMEOUT_CODE,
        });
        return;
    }

    if stream.set_read_timeout(Some(READ_TIMEOUT)).is_err() {
        shared.push_error(NetworkError {
            message: String::from("failed to configure socket"),
            code: -1,
        });
        return;
    }
    match stream.try_clone() {
        Ok(clone) => *lock(&shared.stream) = Some(clone),
        Err(err) => {
            shared.push_error(NetworkError::from_io(&err));
            return;
        }
    }
    shared.connected.store(true, Ordering::Release);
    receive_loop(shared, stream);
}

/// Pushes raw bytes into the inbox until shutdown or a fatal transport
/// error.
fn receive_loop(shared: &Arc<Shared>, mut stream: TcpStream) {
    let mut buf = [0_u8; RECV_CHUNK];
    while !shared.shutdown.load(Ordering::Acquire) {
        match stream.read(&mut buf) {
            Ok(0) => {
                shared.push_error(NetworkError {
                    message: String::from("connection closed by peer"),
                    code: 0,
                });
                shared.connected.store(false, Ordering::Release);
                return;
            }
            Ok(n) => lock(&shared.inbox).extend_from_slice(&buf[..n]),
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut => {}
            Err(err) => {
                log::warn!("receive loop terminating: {err}");
                shared.push_error(NetworkError::from_io(&err));
                shared.connected.store(false, Ordering::Release);
                return;
            }
        }
    }
}

/// A TCP client whose callbacks all run on the thread that calls
/// [`tick`](Self::tick).
pub struct Client {
    addr: SocketAddr,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    state: ConnectionState,
    deadline: Option<Instant>,
    defrag: Defragmenter,
    connect_handler: Option<Box<dyn FnMut()>>,
    message_handler: Option<Box<dyn FnMut(&[u8])>>,
    error_handler: Option<Box<dyn FnMut(&NetworkError)>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("addr", &self.addr)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates an unconnected client for `addr`.
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            shared: Shared::new(),
            worker: None,
            state: ConnectionState::Idle,
            deadline: None,
            defrag: Defragmenter::new(),
            connect_handler: None,
            message_handler: None,
            error_handler: None,
        }
    }

    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self {
            addr: conn.addr,
            shared: conn.shared,
            worker: conn.worker,
            state: ConnectionState::Connected,
            deadline: None,
            defrag: Defragmenter::new(),
            connect_handler: None,
            message_handler: None,
            error_handler: None,
        }
    }

    /// The peer address.
    #[inline]
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Registers the callback fired once when a connect attempt succeeds.
    pub fn on_connect(&mut self, handler: impl FnMut() + 'static) {
        self.connect_handler = Some(Box::new(handler));
    }

    /// Registers the callback fired once per complete received frame.
    pub fn on_message(&mut self, handler: impl FnMut(&[u8]) + 'static) {
        self.message_handler = Some(Box::new(handler));
    }

    /// Registers the callback receiving queued transport faults.
    pub fn on_error(&mut self, handler: impl FnMut(&NetworkError) + 'static) {
        self.error_handler = Some(Box::new(handler));
    }

    /// Starts a background connect attempt with a deadline enforced by
    /// [`tick`](Self::tick). On timeout or handshake failure the socket is
    /// discarded and the client returns to [`ConnectionState::Idle`], so
    /// `connect` may be called again.
    ///
    /// # Errors
    ///
    /// [`NetError::AlreadyConnected`] if a connection is established or in
    /// flight.
    pub fn connect(&mut self, timeout: Duration) -> Result<(), NetError> {
        if self.state != ConnectionState::Idle {
            return Err(NetError::AlreadyConnected);
        }

        self.shared = Shared::new();
        self.defrag = Defragmenter::new();
        let shared = self.shared.clone();
        let addr = self.addr;
        let worker = std::thread::Builder::new()
            .name(format!("viva-net-connect-{addr}"))
            .spawn(move || connect_worker(&shared, addr))
            .map_err(NetError::Spawn)?;
        self.worker = Some(worker);
        self.deadline = Some(Instant::now() + timeout);
        self.state = ConnectionState::Connecting;
        Ok(())
    }

    /// Frames and sends a payload.
    ///
    /// # Errors
    ///
    /// [`NetError::NotConnected`] without an established connection,
    /// [`NetError::PayloadTooLarge`] past the u16 limit, or
    /// [`NetError::Send`] on socket failure.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), NetError> {
        let frame = framing::encode(payload)?;
        let mut guard = lock(&self.shared.stream);
        let stream = guard.as_mut().ok_or(NetError::NotConnected)?;
        stream.write_all(&frame).map_err(NetError::Send)
    }

    /// Drains the background queues: resolves an in-flight connect (success
    /// callback or timeout), parses complete frames out of the inbox into
    /// the message callback, and forwards queued errors.
    pub fn tick(&mut self) {
        if self.state == ConnectionState::Connecting {
            if self.shared.connected.load(Ordering::Acquire) {
                self.state = ConnectionState::Connected;
                self.deadline = None;
                if let Some(handler) = &mut self.connect_handler {
                    handler();
                }
            } else if self.connect_failed() {
                self.abandon_connect();
            }
        }

        if self.state == ConnectionState::Connected {
            let bytes = std::mem::take(&mut *lock(&self.shared.inbox));
            if !bytes.is_empty() {
                self.defrag.extend(&bytes);
            }
            while let Some(frame) = self.defrag.next_frame() {
                if let Some(handler) = &mut self.message_handler {
                    handler(&frame);
                }
            }
            if !self.shared.connected.load(Ordering::Acquire) {
                // The receive loop died; errors are already queued.
                self.state = ConnectionState::Idle;
            }
        }

        loop {
            let error = lock(&self.shared.errors).pop_front();
            let Some(error) = error else { break };
            if let Some(handler) = &mut self.error_handler {
                handler(&error);
            }
        }
    }

    /// Whether the in-flight connect has failed (worker error or deadline
    /// expiry). Queues the timeout error if the deadline passed.
    fn connect_failed(&self) -> bool {
        if !lock(&self.shared.errors).is_empty() {
            return true;
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.shared.push_error(NetworkError {
                message: String::from("connect timed out"),
                code: TIMEOUT_CODE,
            });
            return true;
        }
        false
    }

    /// Discards the in-flight connect attempt. The worker thread is told
    /// to shut down and detached — it may still be blocked inside the OS
    /// connect call, which cannot be interrupted portably.
    fn abandon_connect(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(stream) = lock(&self.shared.stream).take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.worker = None;
        self.deadline = None;
        self.state = ConnectionState::Idle;
    }

    /// Closes the connection: signals the receive loop, shuts the socket
    /// down, and joins the worker thread.
    pub fn disconnect(&mut self) {
        match self.state {
            ConnectionState::Idle => {}
            ConnectionState::Connecting => self.abandon_connect(),
            ConnectionState::Connected => {
                self.shared.shutdown.store(true, Ordering::Release);
                if let Some(stream) = lock(&self.shared.stream).take() {
                    let _ = stream.shutdown(Shutdown::Both);
                }
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                self.shared.connected.store(false, Ordering::Release);
                self.state = ConnectionState::Idle;
            }
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.disconnect();
    }
}
