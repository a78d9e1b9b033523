// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types: hard failures and queued transport faults.

use std::io;

use thiserror::Error;

/// Hard failures returned directly from networking calls.
#[derive(Debug, Error)]
pub enum NetError {
    /// Binding or configuring the listening socket failed.
    #[error("bind failed: {0}")]
    Bind(#[source] io::Error),

    /// The server's accept loop is already running.
    #[error("server already running")]
    AlreadyRunning,

    /// A connect attempt is already in flight or established.
    #[error("client already connected or connecting")]
    AlreadyConnected,

    /// Sending requires an established connection.
    #[error("not connected")]
    NotConnected,

    /// The payload exceeds the framing format's 65535-byte limit.
    #[error("payload of {0} bytes exceeds the u16 frame limit")]
    PayloadTooLarge(usize),

    /// Writing to the socket failed.
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    /// Spawning a background thread failed.
    #[error("thread spawn failed: {0}")]
    Spawn(#[source] io::Error),
}

/// A recoverable transport fault, queued by a background thread and
/// delivered through the error callback on the next tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkError {
    /// Human-readable description from the OS or this crate.
    pub message: String,
    /// OS error code where available, or a crate-defined code such as
    /// [`TIMEOUT_CODE`](crate::TIMEOUT_CODE).
    pub code: i32,
}

impl NetworkError {
    pub(crate) fn from_io(err: &io::Error) -> Self {
        Self {
            message: err.to_string(),
            code: err.raw_os_error().unwrap_or(-1),
        }
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "network error {}: {}", self.code, self.message)
    }
}
