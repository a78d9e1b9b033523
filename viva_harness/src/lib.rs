// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test and demo support: a recording backend and a headless frame driver.
//!
//! [`RecordingBackend`] implements both halves of the backend contract —
//! [`ResourceFactory`] with in-memory bookkeeping and [`Presenter`] by
//! keeping a clone of every presented [`RenderPlan`] — so engine behavior
//! can be asserted without a GPU. [`FrameDriver`] advances an [`Engine`]
//! at a fixed timestep and handles presentation plus retired-resource
//! cleanup, mirroring what a real platform loop does.

use std::collections::BTreeMap;

use kurbo::Point;

use viva_core::backend::{
    BackendError, BufferId, Presenter, ResourceFactory, Retired, ShaderId, TargetId, TextureId,
};
use viva_core::color::Color;
use viva_core::engine::Engine;
use viva_core::scene::draw::RenderPlan;
use viva_core::time::HostTime;

/// Shader id the recording backend reports as its built-in sprite shader.
pub const DEFAULT_SHADER: ShaderId = ShaderId(1);
/// Shader id the recording backend reports as its built-in composite
/// shader.
pub const DEFAULT_POST_SHADER: ShaderId = ShaderId(2);

/// A texture the recording backend holds in memory.
#[derive(Clone, Debug)]
pub struct RecordedTexture {
    /// The uploaded pixels.
    pub pixels: Vec<Color>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// In-memory backend: creates counter-based resource keys and records
/// every presented plan.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    /// Live textures by key.
    pub textures: BTreeMap<u64, RecordedTexture>,
    /// Live render targets by key (width, height).
    pub targets: BTreeMap<u64, (u32, u32)>,
    /// Live vertex buffers by key.
    pub buffers: BTreeMap<u64, Vec<Point>>,
    /// Compiled shader sources by key.
    pub shaders: BTreeMap<u64, String>,
    /// Resources destroyed via [`ResourceFactory::destroy`].
    pub destroyed: Vec<Retired>,
    /// Every plan handed to [`Presenter::present`], in order.
    pub presented: Vec<RenderPlan>,
}

impl RecordingBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        // Leave room below for the built-in shader ids.
        self.next_id += 1;
        self.next_id + 100
    }

    /// The most recently presented plan.
    #[must_use]
    pub fn last_plan(&self) -> Option<&RenderPlan> {
        self.presented.last()
    }
}

impl ResourceFactory for RecordingBackend {
    fn create_texture(
        &mut self,
        pixels: &[Color],
        width: u32,
        height: u32,
    ) -> Result<TextureId, BackendError> {
        if pixels.len() != (width * height) as usize {
            return Err(BackendError {
                message: format!(
                    "texture data is {} pixels, expected {}",
                    pixels.len(),
                    width * height
                ),
            });
        }
        let id = self.next_id();
        self.textures.insert(
            id,
            RecordedTexture {
                pixels: pixels.to_vec(),
                width,
                height,
            },
        );
        Ok(TextureId(id))
    }

    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, BackendError> {
        let id = self.next_id();
        self.targets.insert(id, (width, height));
        Ok(TargetId(id))
    }

    fn create_lines(&mut self, points: &[Point]) -> Result<BufferId, BackendError> {
        if points.is_empty() {
            return Err(BackendError {
                message: "empty vertex buffer".to_string(),
            });
        }
        let id = self.next_id();
        self.buffers.insert(id, points.to_vec());
        Ok(BufferId(id))
    }

    fn compile_shader(&mut self, source: &str) -> Result<ShaderId, BackendError> {
        if source.trim().is_empty() {
            // Stand-in for a real compiler diagnostic.
            return Err(BackendError {
                message: "shader source is empty".to_string(),
            });
        }
        let id = self.next_id();
        self.shaders.insert(id, source.to_string());
        Ok(ShaderId(id))
    }

    fn default_shader(&self) -> ShaderId {
        DEFAULT_SHADER
    }

    fn default_post_shader(&self) -> ShaderId {
        DEFAULT_POST_SHADER
    }

    fn destroy(&mut self, retired: Retired) {
        match retired {
            Retired::Texture(TextureId(id)) => {
                self.textures.remove(&id);
            }
            Retired::Target(TargetId(id)) => {
                self.targets.remove(&id);
            }
            Retired::Buffer(BufferId(id)) => {
                self.buffers.remove(&id);
            }
        }
        self.destroyed.push(retired);
    }
}

impl Presenter for RecordingBackend {
    fn present(&mut self, plan: &RenderPlan) {
        self.presented.push(plan.clone());
    }
}

/// Drives an [`Engine`] headlessly at a fixed timestep against a
/// [`RecordingBackend`].
#[derive(Debug)]
pub struct FrameDriver {
    /// The backend receiving plans and retired resources.
    pub backend: RecordingBackend,
    step_nanos: u64,
    now: u64,
}

impl FrameDriver {
    /// Creates a driver stepping `dt` seconds of nanosecond-tick host time
    /// per frame.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "test timesteps are small positive values"
    )]
    pub fn new(backend: RecordingBackend, dt: f64) -> Self {
        Self {
            backend,
            step_nanos: (dt * 1e9) as u64,
            now: 0,
        }
    }

    /// Runs `frames` frames: advance, present, free retired resources.
    pub fn run(&mut self, engine: &mut Engine, frames: u32) {
        for _ in 0..frames {
            let plan = engine.frame(HostTime(self.now));
            self.backend.present(plan);
            for retired in engine.world.scene.take_retired() {
                self.backend.destroy(retired);
            }
            self.now += self.step_nanos;
        }
    }
}
