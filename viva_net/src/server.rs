// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TCP server: background accept loop, handshake, per-frame client drain.

use std::collections::VecDeque;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::client::{Client, Connection};
use crate::error::{NetError, NetworkError};
use crate::HANDSHAKE;

/// Accept-loop poll interval while no connection is pending.
const ACCEPT_POLL: Duration = Duration::from_millis(5);

struct Shared {
    listener: TcpListener,
    pending: Mutex<VecDeque<Connection>>,
    errors: Mutex<VecDeque<NetworkError>>,
    shutdown: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Accepts connections, performs the handshake, and queues the resulting
/// connections for the main thread.
fn accept_loop(shared: &Arc<Shared>) {
    while !shared.shutdown.load(Ordering::Acquire) {
        match shared.listener.accept() {
            Ok((mut stream, addr)) => {
                log::debug!("accepted connection from {addr}");
                if stream.set_nonblocking(false).is_err() {
                    continue;
                }
                if let Err(err) = stream.write_all(HANDSHAKE) {
                    lock(&shared.errors).push_back(NetworkError::from_io(&err));
                    continue;
                }
                match Connection::from_accepted(stream, addr) {
                    Ok(conn) => lock(&shared.pending).push_back(conn),
                    Err(err) => lock(&shared.errors).push_back(NetworkError::from_io(&err)),
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(err) => {
                lock(&shared.errors).push_back(NetworkError::from_io(&err));
                std::thread::sleep(ACCEPT_POLL);
            }
        }
    }
}

/// A TCP server whose callbacks all run on the thread that calls
/// [`tick`](Self::tick).
///
/// Acceptance happens concurrently, but accepted peers only become visible
/// to game logic when `tick` moves them — one per call — from the pending
/// queue into the acknowledged list and fires the connect callback.
pub struct Server {
    shared: Arc<Shared>,
    accept_thread: Option<JoinHandle<()>>,
    clients: Vec<Client>,
    connect_handler: Option<Box<dyn FnMut(&mut Client)>>,
    error_handler: Option<Box<dyn FnMut(&NetworkError)>>,
    running: bool,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .field("running", &self.running)
            .field("clients", &self.clients.len())
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Binds the listening socket (non-blocking) without accepting yet.
    ///
    /// # Errors
    ///
    /// [`NetError::Bind`] if binding or configuring the socket fails.
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        let listener = TcpListener::bind(addr).map_err(NetError::Bind)?;
        listener.set_nonblocking(true).map_err(NetError::Bind)?;
        let local_addr = listener.local_addr().map_err(NetError::Bind)?;
        Ok(Self {
            shared: Arc::new(Shared {
                listener,
                pending: Mutex::new(VecDeque::new()),
                errors: Mutex::new(VecDeque::new()),
                shutdown: AtomicBool::new(false),
            }),
            accept_thread: None,
            clients: Vec::new(),
            connect_handler: None,
            error_handler: None,
            running: false,
            local_addr,
        })
    }

    /// The bound address (useful after binding port 0).
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Registers the callback fired when a pending client is acknowledged.
    pub fn on_connect(&mut self, handler: impl FnMut(&mut Client) + 'static) {
        self.connect_handler = Some(Box::new(handler));
    }

    /// Registers the callback receiving queued transport faults.
    pub fn on_error(&mut self, handler: impl FnMut(&NetworkError) + 'static) {
        self.error_handler = Some(Box::new(handler));
    }

    /// Starts the background accept loop.
    ///
    /// # Errors
    ///
    /// [`NetError::AlreadyRunning`] if already started, or
    /// [`NetError::Spawn`] if the thread cannot be created.
    pub fn start(&mut self) -> Result<(), NetError> {
        if self.running {
            return Err(NetError::AlreadyRunning);
        }
        let shared = self.shared.clone();
        let thread = std::thread::Builder::new()
            .name(format!("viva-net-accept-{}", self.local_addr))
            .spawn(move || accept_loop(&shared))
            .map_err(NetError::Spawn)?;
        self.accept_thread = Some(thread);
        self.running = true;
        Ok(())
    }

    /// Whether the accept loop is running.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Main-thread drain, once per frame: acknowledges at most one pending
    /// client (firing the connect callback), forwards queued accept
    /// errors, then ticks every acknowledged client.
    pub fn tick(&mut self) {
        let conn = lock(&self.shared.pending).pop_front();
        if let Some(conn) = conn {
            let mut client = Client::from_connection(conn);
            if let Some(handler) = &mut self.connect_handler {
                handler(&mut client);
            }
            self.clients.push(client);
        }

        loop {
            let error = lock(&self.shared.errors).pop_front();
            let Some(error) = error else { break };
            if let Some(handler) = &mut self.error_handler {
                handler(&error);
            }
        }

        for client in &mut self.clients {
            client.tick();
        }
    }

    /// The acknowledged clients.
    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Mutable access to the acknowledged clients (for sending).
    pub fn clients_mut(&mut self) -> &mut [Client] {
        &mut self.clients
    }

    /// Stops the accept loop and joins its thread. Acknowledged clients
    /// stay connected until dropped or disconnected individually.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.accept_thread.take() {
            let _ = thread.join();
        }
        self.running = false;
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use crate::ConnectionState;

    use super::*;

    fn pump(server: &mut Server, client: &mut Client, until: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !until() {
            assert!(Instant::now() < deadline, "test timed out");
            server.tick();
            client.tick();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn bind_start_stop() {
        let mut server = Server::bind("127.0.0.1:0").unwrap();
        server.start().unwrap();
        assert!(matches!(server.start(), Err(NetError::AlreadyRunning)));
        server.stop();
        assert!(!server.is_running());
        // Stopping twice is fine.
        server.stop();
    }

    #[test]
    fn loopback_handshake_and_messages_both_ways() {
        let mut server = Server::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr();
        server.start().unwrap();

        let server_connects = Rc::new(RefCell::new(0_u32));
        let sc = server_connects.clone();
        server.on_connect(move |_| *sc.borrow_mut() += 1);

        let server_messages: Rc<RefCell<Vec<Vec<u8>>>> = Rc::new(RefCell::new(Vec::new()));

        let mut client = Client::new(addr);
        let client_connected = Rc::new(RefCell::new(false));
        let cc = client_connected.clone();
        client.on_connect(move || *cc.borrow_mut() = true);
        let client_messages: Rc<RefCell<Vec<Vec<u8>>>> = Rc::new(RefCell::new(Vec::new()));
        let cm = client_messages.clone();
        client.on_message(move |payload| cm.borrow_mut().push(payload.to_vec()));

        client.connect(Duration::from_secs(5)).unwrap();

        {
            let connected = client_connected.clone();
            let acked = server_connects.clone();
            pump(&mut server, &mut client, || {
                *connected.borrow() && *acked.borrow() == 1
            });
        }
        assert_eq!(client.state(), ConnectionState::Connected);

        // Client → server.
        client.send(b"ping").unwrap();
        // The acknowledged client was created during pump; register its
        // message handler now.
        let sm = server_messages.clone();
        server.clients_mut()[0].on_message(move |payload| sm.borrow_mut().push(payload.to_vec()));
        {
            let sm = server_messages.clone();
            pump(&mut server, &mut client, || !sm.borrow().is_empty());
        }
        assert_eq!(server_messages.borrow()[0], b"ping");

        // Server → client.
        server.clients_mut()[0].send(b"pong").unwrap();
        {
            let cm = client_messages.clone();
            pump(&mut server, &mut client, || !cm.borrow().is_empty());
        }
        assert_eq!(client_messages.borrow()[0], b"pong");

        client.disconnect();
        assert_eq!(client.state(), ConnectionState::Idle);
        server.stop();
    }

    #[test]
    fn connect_timeout_reports_error_and_resets() {
        // RFC 5737 TEST-NET-1 address: connect attempts hang or fail, never
        // succeed.
        let addr: SocketAddr = "192.0.2.1:9".parse().unwrap();
        let mut client = Client::new(addr);
        let errors: Rc<RefCell<Vec<NetworkError>>> = Rc::new(RefCell::new(Vec::new()));
        let e = errors.clone();
        client.on_error(move |err| e.borrow_mut().push(err.clone()));

        client.connect(Duration::from_millis(100)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while errors.borrow().is_empty() {
            assert!(Instant::now() < deadline, "timeout error never delivered");
            client.tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(client.state(), ConnectionState::Idle);
        // A second attempt is allowed after the reset.
        client.connect(Duration::from_millis(50)).unwrap();
        client.disconnect();
    }

    #[test]
    fn send_without_connection_fails() {
        let mut client = Client::new("127.0.0.1:1".parse().unwrap());
        assert!(matches!(client.send(b"x"), Err(NetError::NotConnected)));
    }
}
