// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and the per-frame clock.
//!
//! [`HostTime`] represents a point in time as platform-native monotonic
//! ticks (e.g. `QueryPerformanceCounter` on Windows, `mach_absolute_time`
//! on macOS). [`Timebase`] carries the rational conversion factor from
//! ticks to nanoseconds, so core code never assumes a tick resolution.
//!
//! [`FrameClock`] is fed a [`HostTime`] once per frame and derives the
//! quantities game logic consumes: seconds since start, seconds since the
//! previous frame, and frames per second.

use core::fmt;

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`. The correct instance for a given
/// platform comes from whatever drives the frame loop (for nanosecond-tick
/// sources, use [`Timebase::NANOS`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to seconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "frame timing does not need sub-nanosecond precision"
    )]
    pub fn ticks_to_seconds(self, ticks: u64) -> f64 {
        ticks as f64 * f64::from(self.numer) / f64::from(self.denom) / 1e9
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// Per-frame clock deriving game time and frame delta from host ticks.
///
/// Call [`advance`](Self::advance) exactly once per frame with the current
/// [`HostTime`]. The first `advance` establishes the start of game time and
/// reports a zero-length frame.
#[derive(Clone, Debug)]
pub struct FrameClock {
    timebase: Timebase,
    start: Option<HostTime>,
    prev: HostTime,
    game_time: f64,
    frame_time: f64,
}

impl FrameClock {
    /// Creates a clock for the given timebase.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            start: None,
            prev: HostTime(0),
            game_time: 0.0,
            frame_time: 0.0,
        }
    }

    /// Feeds the current host time, updating game time and frame delta.
    pub fn advance(&mut self, now: HostTime) {
        let Some(start) = self.start else {
            self.start = Some(now);
            self.prev = now;
            return;
        };
        self.frame_time = self
            .timebase
            .ticks_to_seconds(now.0.saturating_sub(self.prev.0));
        self.game_time = self
            .timebase
            .ticks_to_seconds(now.0.saturating_sub(start.0));
        self.prev = now;
    }

    /// Seconds elapsed since the first [`advance`](Self::advance).
    #[inline]
    #[must_use]
    pub const fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Seconds elapsed between the last two frames.
    #[inline]
    #[must_use]
    pub const fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Instantaneous frames per second (infinite on a zero-length frame).
    #[inline]
    #[must_use]
    pub fn fps(&self) -> f64 {
        1.0 / self.frame_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_is_zero_length() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        clock.advance(HostTime(5_000_000_000));
        assert_eq!(clock.game_time(), 0.0);
        assert_eq!(clock.frame_time(), 0.0);
    }

    #[test]
    fn nanosecond_ticks_to_seconds() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        clock.advance(HostTime(0));
        clock.advance(HostTime(16_000_000));
        let eps = 1e-12;
        assert!((clock.frame_time() - 0.016).abs() < eps);
        assert!((clock.game_time() - 0.016).abs() < eps);
        clock.advance(HostTime(48_000_000));
        assert!((clock.frame_time() - 0.032).abs() < eps);
        assert!((clock.game_time() - 0.048).abs() < eps);
    }

    #[test]
    fn rational_timebase() {
        // 24 MHz ticks, as on ARM Macs: 125/3 ticks → ns.
        let tb = Timebase::new(125, 3);
        let mut clock = FrameClock::new(tb);
        clock.advance(HostTime(0));
        clock.advance(HostTime(24_000_000));
        let eps = 1e-9;
        assert!((clock.game_time() - 1.0).abs() < eps, "24M ticks is 1s");
    }

    #[test]
    fn fps_is_reciprocal_of_frame_time() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        clock.advance(HostTime(0));
        clock.advance(HostTime(20_000_000));
        let eps = 1e-6;
        assert!((clock.fps() - 50.0).abs() < eps);
    }

    #[test]
    fn time_never_goes_backwards() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        clock.advance(HostTime(1000));
        clock.advance(HostTime(500));
        assert_eq!(clock.frame_time(), 0.0);
    }
}
