// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene graph, transform integration, and draw submission for viva.
//!
//! `viva_core` provides the data model of a small 2D engine: drawables
//! (sprites, wireframe polygons, bitmap text, sprite animations) organized
//! into offscreen surfaces that are composited back-to-front, with
//! physics-style transform integration and a cooperative per-frame
//! scheduler. It is `no_std` compatible (with `alloc`) and contains no
//! platform or GPU code; rendering backends implement the contracts in
//! [`backend`].
//!
//! # Architecture
//!
//! One frame flows through the crate like this:
//!
//! ```text
//!   platform tick (HostTime)
//!       │
//!       ▼
//!   FrameClock::advance() ──► dt, game time
//!       │
//!       ▼
//!   Camera::tick(dt) ──► view matrices
//!       │
//!       ▼
//!   RoutineManager::tick(game_time) ──► game logic callbacks
//!       │
//!       ▼
//!   SceneStore::build_frame() ──► RenderPlan ──► Presenter::present()
//! ```
//!
//! **[`scene`]** — Generational-arena storage for drawables and surfaces,
//! parent/child transform links, the two-pass draw builder.
//!
//! **[`transform`]** — Per-object spatial state with velocity/acceleration
//! channels, semi-implicit Euler integration, and world-matrix derivation.
//!
//! **[`camera`]** — Pixel/world-unit conversion and the pan/scale view
//! matrices consumed by transforms.
//!
//! **[`routines`]** — Pool-allocated delayed/repeating callbacks plus an
//! integer-keyed synchronous event bus.
//!
//! **[`font`]** — BMFont-subset metrics parsing and the embedded default
//! font.
//!
//! **[`backend`]** — [`ResourceFactory`](backend::ResourceFactory) and
//! [`Presenter`](backend::Presenter), the traits platform backends
//! implement.
//!
//! **[`engine`]** — An owning context struct that wires the pieces above
//! into the per-frame sequence, replacing the globals a typical C++ engine
//! of this shape would use.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) and a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper for frame-loop instrumentation.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod camera;
pub mod color;
pub mod engine;
pub mod font;
pub mod matrix;
pub mod routines;
pub mod scene;
pub mod time;
pub mod trace;
pub mod transform;
