// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning context that wires the frame loop together.
//!
//! [`Engine`] replaces the free-standing singletons a C++ engine of this
//! shape would use (camera, draw manager, routine manager, time) with one
//! struct constructed in dependency order and passed by reference.
//! [`World`] is the slice of it that routine callbacks may touch: the
//! scheduler cannot hand callbacks the whole engine (it is itself part of
//! it), so the world is split out as the callback context.
//!
//! Per-frame control flow, driven by [`Engine::frame`]:
//!
//! ```text
//! clock → camera → routines → scene build ⇒ RenderPlan
//! ```
//!
//! The caller hands the resulting plan to a
//! [`Presenter`](crate::backend::Presenter) and frees retired resources —
//! see the frame-loop pseudocode in [`backend`](crate::backend).

use kurbo::Size;

use crate::backend::{BackendError, ResourceFactory};
use crate::camera::{Camera, CameraConfig};
use crate::color::Color;
use crate::routines::RoutineManager;
use crate::scene::draw::RenderPlan;
use crate::scene::{SceneConfig, SceneStore};
use crate::time::{FrameClock, HostTime, Timebase};
use crate::trace::{
    FrameBeginEvent, FrameEndEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// Construction parameters for an [`Engine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Viewport (client area) size in pixels.
    pub client_size: Size,
    /// Pixels per world unit.
    pub unit: Size,
    /// Backbuffer clear color.
    pub background: Color,
    /// Routine pool capacity.
    pub routine_capacity: usize,
    /// Timebase of the host ticks fed to [`Engine::frame`].
    pub timebase: Timebase,
}

impl EngineConfig {
    /// Creates a config with default unit size, background, pool capacity,
    /// and a nanosecond timebase.
    #[must_use]
    pub const fn new(client_size: Size) -> Self {
        Self {
            client_size,
            unit: CameraConfig::DEFAULT_UNIT,
            background: Color::new(0, 64, 128, 255),
            routine_capacity: RoutineManager::<World>::DEFAULT_CAPACITY,
            timebase: Timebase::NANOS,
        }
    }
}

/// The game-visible state routine callbacks receive: everything in the
/// engine except the scheduler itself.
#[derive(Debug)]
pub struct World {
    /// Frame clock (read-only use expected; the engine advances it).
    pub clock: FrameClock,
    /// The camera.
    pub camera: Camera,
    /// The scene.
    pub scene: SceneStore,
    /// Backbuffer clear color.
    pub background: Color,
}

/// Owns the frame loop: clock, camera, scene, scheduler, and the retained
/// render plan.
#[derive(Debug)]
pub struct Engine {
    /// Camera, scene, clock, and background — the routine context.
    pub world: World,
    /// The cooperative scheduler.
    pub routines: RoutineManager<World>,
    plan: RenderPlan,
    frame_index: u64,
}

impl Engine {
    /// Constructs the engine in dependency order: camera first, then the
    /// scene (which creates its default surface and shared resources
    /// through `factory`).
    ///
    /// # Errors
    ///
    /// Backend resource-creation failures abort startup.
    pub fn new(
        factory: &mut dyn ResourceFactory,
        config: EngineConfig,
    ) -> Result<Self, BackendError> {
        let camera = Camera::new(CameraConfig {
            client_size: config.client_size,
            unit: config.unit,
        });
        let scene = SceneStore::new(
            factory,
            &camera,
            SceneConfig {
                client_size: config.client_size,
            },
        )?;
        Ok(Self {
            world: World {
                clock: FrameClock::new(config.timebase),
                camera,
                scene,
                background: config.background,
            },
            routines: RoutineManager::with_capacity(config.routine_capacity),
            plan: RenderPlan::new(),
            frame_index: 0,
        })
    }

    /// Runs one frame at host time `now` and returns the render plan.
    pub fn frame(&mut self, now: HostTime) -> &RenderPlan {
        self.frame_traced(now, &mut Tracer::disabled())
    }

    /// Like [`frame`](Self::frame), forwarding frame-loop events to
    /// `tracer`.
    pub fn frame_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> &RenderPlan {
        self.world.clock.advance(now);
        let dt = self.world.clock.frame_time();
        let game_time = self.world.clock.game_time();
        let frame_index = self.frame_index;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            now,
            dt,
            game_time,
        });

        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Camera,
        });
        self.world.camera.tick(dt);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Camera,
        });

        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Routines,
        });
        self.routines.tick(game_time, &mut self.world);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Routines,
        });

        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Build,
        });
        self.plan.background = self.world.background.to_linear();
        self.world
            .scene
            .build_frame(&self.world.camera, dt, &mut self.plan);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Build,
        });

        tracer.frame_end(&FrameEndEvent {
            frame_index,
            item_count: self.plan.item_count(),
            surface_count: self.plan.composites.len(),
        });
        self.frame_index += 1;
        &self.plan
    }

    /// Number of completed frames.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The most recently built render plan.
    #[inline]
    #[must_use]
    pub const fn plan(&self) -> &RenderPlan {
        &self.plan
    }
}
