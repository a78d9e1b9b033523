// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! [`TraceSink`] is a trait with one method per frame-loop event; every
//! method defaults to a no-op, so sinks implement only what they care
//! about. [`Tracer`] wraps an optional sink reference: with the `trace`
//! feature **off**, every `Tracer` method compiles to nothing; with it
//! **on**, each call is a single `Option` branch before dispatch.

use crate::time::HostTime;

/// Which phase of the frame loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Camera integration and view-matrix rebuild.
    Camera,
    /// Routine scheduler pass.
    Routines,
    /// Scene integration and render-plan build.
    Build,
}

/// Emitted at the top of each frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time driving this frame.
    pub now: HostTime,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Seconds since engine start.
    pub game_time: f64,
}

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted once the render plan is built.
#[derive(Clone, Copy, Debug)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Number of draw items across all passes.
    pub item_count: usize,
    /// Number of surfaces composited.
    pub surface_count: usize,
}

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called at the top of each frame.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called once the render plan is built.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }
}

/// Zero-overhead wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut ()>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        #[cfg(feature = "trace")]
        return write!(f, "Tracer(enabled: {})", self.sink.is_some());
        #[cfg(not(feature = "trace"))]
        write!(f, "Tracer(compiled out)")
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<'a> Tracer<'a> {
    /// A tracer that drops every event.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: None,
            #[cfg(not(feature = "trace"))]
            _marker: core::marker::PhantomData,
        }
    }

    /// A tracer forwarding every event to `sink`.
    #[cfg(feature = "trace")]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Forwards a frame-begin event.
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a phase-begin event.
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a phase-end event.
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a frame-end event.
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<u64>,
        phases: Vec<PhaseKind>,
    }

    impl TraceSink for Recorder {
        fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
            self.frames.push(e.frame_index);
        }

        fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
            self.phases.push(e.phase);
        }
    }

    #[test]
    fn tracer_forwards_to_sink() {
        let mut recorder = Recorder::default();
        {
            let mut tracer = Tracer::new(&mut recorder);
            tracer.frame_begin(&FrameBeginEvent {
                frame_index: 3,
                now: HostTime(0),
                dt: 0.016,
                game_time: 1.0,
            });
            tracer.phase_begin(&PhaseBeginEvent {
                frame_index: 3,
                phase: PhaseKind::Build,
            });
        }
        assert_eq!(recorder.frames, alloc::vec![3]);
        assert_eq!(recorder.phases, alloc::vec![PhaseKind::Build]);
    }

    #[test]
    fn disabled_tracer_drops_events() {
        let mut tracer = Tracer::disabled();
        tracer.frame_begin(&FrameBeginEvent {
            frame_index: 0,
            now: HostTime(0),
            dt: 0.0,
            game_time: 0.0,
        });
    }
}
