// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal TCP networking for frame-driven games.
//!
//! The threading model keeps game logic single-threaded: the only
//! background concurrency is the server's accept loop and each
//! connection's receive loop, both of which push into mutex-guarded
//! queues. The main thread drains those queues once per frame by calling
//! [`Server::tick`] / [`Client::tick`], which is where every user callback
//! runs.
//!
//! ```text
//! accept thread ──► pending-client queue ──┐
//! receive thread ──► raw byte inbox ───────┤ tick() ──► callbacks
//!                    error queue ──────────┘   (main thread, per frame)
//! ```
//!
//! # Wire format
//!
//! Application messages are framed as a little-endian `u16` payload length
//! followed by the payload ([`framing`]). On accept, the server sends the
//! fixed 5-byte ASCII handshake `"Hello"`, which the client consumes and
//! verifies before any user callback fires.
//!
//! # Errors
//!
//! Construction and send failures are ordinary [`NetError`] results.
//! Steady-state transport faults (a failed receive, a connect timeout)
//! never unwind through the frame loop: they are queued by the background
//! threads and delivered to the registered error handler as
//! [`NetworkError`] values on the next tick.

mod client;
mod error;
pub mod framing;
mod server;

pub use client::{Client, ConnectionState};
pub use error::{NetError, NetworkError};
pub use server::Server;

/// The fixed handshake the server sends immediately after accepting a
/// connection.
pub const HANDSHAKE: &[u8; 5] = b"Hello";

/// Error code delivered when a connect attempt times out (mirrors the
/// classic winsock `WSAETIMEDOUT`).
pub const TIMEOUT_CODE: i32 = 10060;
