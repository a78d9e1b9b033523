// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Length-prefixed message framing.
//!
//! Each application message travels as a little-endian `u16` length
//! followed by that many payload bytes. TCP delivers a byte stream, so
//! the receive side runs every chunk through a [`Defragmenter`] that
//! buffers partial frames and yields complete ones — regardless of how
//! the transport split them.

use crate::NetError;

/// Bytes of the length prefix.
pub const PREFIX_LEN: usize = 2;

/// Maximum payload size one frame can carry.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Frames a payload: little-endian `u16` length, then the bytes.
///
/// # Errors
///
/// [`NetError::PayloadTooLarge`] if the payload exceeds [`MAX_PAYLOAD`].
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, NetError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(NetError::PayloadTooLarge(payload.len()));
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "length checked against MAX_PAYLOAD above"
    )]
    let len = payload.len() as u16;
    let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Reassembles complete frames from arbitrarily chunked input.
#[derive(Clone, Debug, Default)]
pub struct Defragmenter {
    buffer: Vec<u8>,
}

impl Defragmenter {
    /// Creates an empty defragmenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes from the transport.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Pops the next complete frame's payload, or `None` if the buffered
    /// bytes do not yet form one.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        if self.buffer.len() < PREFIX_LEN {
            return None;
        }
        let len = usize::from(u16::from_le_bytes([self.buffer[0], self.buffer[1]]));
        if self.buffer.len() < PREFIX_LEN + len {
            return None;
        }
        let payload = self.buffer[PREFIX_LEN..PREFIX_LEN + len].to_vec();
        self.buffer.drain(..PREFIX_LEN + len);
        Some(payload)
    }

    /// Bytes buffered but not yet consumed as frames.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
