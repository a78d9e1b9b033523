// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable, surface, and font identity types.

use core::fmt;

/// Sentinel value meaning "no slot" in raw index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a drawable in a [`SceneStore`](super::SceneStore).
///
/// Contains both a slot index and a generation counter so that stale
/// handles are detected after a drawable is destroyed and its slot reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl DrawableId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawableId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to a surface in a [`SceneStore`](super::SceneStore).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SurfaceId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to a registered font.
///
/// Fonts are immutable after construction and never recycled, so a plain
/// index suffices. Index 0 is always the built-in default font.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FontId(pub u32);

impl fmt::Debug for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontId({})", self.0)
    }
}
