// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform renderers.
//!
//! Viva splits platform-specific GPU work out of the core entirely. A
//! backend crate (or a test double such as `viva_harness`'s recording
//! backend) provides two pieces:
//!
//! - **[`ResourceFactory`]** — creates and destroys the GPU objects the
//!   scene refers to by opaque key: textures, offscreen render targets,
//!   line vertex buffers, and compiled pixel shaders. Shader *source* is
//!   text in the host GPU's shading language; compilation failures surface
//!   the platform's error string.
//!
//! - **[`Presenter`]** — consumes one [`RenderPlan`] per frame and turns it
//!   into native draw calls. Items in a plan are strictly ordered: the
//!   drawing model assumes shared per-frame constant slots that are
//!   overwritten immediately before each draw, so submission must be
//!   sequential.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     let plan = engine.frame(now);
//!     presenter.present(plan);
//!     for retired in engine.scene.take_retired() {
//!         factory.destroy(retired);
//!     }
//! }
//! ```

use alloc::string::String;
use core::fmt;

use kurbo::Point;

use crate::color::Color;
use crate::scene::draw::RenderPlan;

/// An opaque handle to a backend-managed texture.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u64);

/// An opaque handle to a backend-managed offscreen render target.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub u64);

/// An opaque handle to a backend-managed line vertex buffer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u64);

/// An opaque handle to a backend-compiled pixel shader.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderId(pub u64);

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", self.0)
    }
}

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

impl fmt::Debug for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderId({})", self.0)
    }
}

/// A GPU resource released by the scene and awaiting backend destruction.
///
/// Core cannot call into the backend from destructors, so destroy paths
/// push exclusively-owned resources here; the frame driver drains them via
/// [`SceneStore::take_retired`](crate::scene::SceneStore::take_retired) and
/// hands each to [`ResourceFactory::destroy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Retired {
    /// A texture no longer referenced by any drawable the scene owns.
    Texture(TextureId),
    /// An offscreen target of a destroyed surface.
    Target(TargetId),
    /// A vertex buffer exclusively owned by a destroyed polygon.
    Buffer(BufferId),
}

/// Failure to create a backend resource.
///
/// Carries the platform's error message (driver diagnostics, shader
/// compiler output). Construction-time failures are fatal to engine
/// startup; there is no per-frame recovery path for missing resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendError {
    /// Platform-provided description of the failure.
    pub message: String,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend resource creation failed: {}", self.message)
    }
}

impl core::error::Error for BackendError {}

/// Creates and destroys the GPU objects the scene references by key.
///
/// Keys are assigned by the backend; core passes them through without
/// interpretation.
pub trait ResourceFactory {
    /// Uploads RGBA8 pixels (top-to-bottom, left-to-right) as a texture.
    fn create_texture(
        &mut self,
        pixels: &[Color],
        width: u32,
        height: u32,
    ) -> Result<TextureId, BackendError>;

    /// Creates an offscreen render target sized to the viewport.
    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, BackendError>;

    /// Uploads a line-strip vertex buffer from world-space points.
    fn create_lines(&mut self, points: &[Point]) -> Result<BufferId, BackendError>;

    /// Compiles pixel-shader source text. Errors carry the platform
    /// compiler's message.
    fn compile_shader(&mut self, source: &str) -> Result<ShaderId, BackendError>;

    /// The backend's built-in textured-quad pixel shader.
    fn default_shader(&self) -> ShaderId;

    /// The backend's built-in surface-composite pixel shader.
    fn default_post_shader(&self) -> ShaderId;

    /// Releases a retired resource.
    fn destroy(&mut self, retired: Retired);
}

/// Applies one frame's [`RenderPlan`] to the platform renderer.
///
/// Implementations draw every [`SurfacePass`](crate::scene::draw::SurfacePass)
/// into its offscreen target (clearing depth and the target first), then
/// composite the surfaces onto the backbuffer in plan order and present.
pub trait Presenter {
    /// Renders and presents the plan. Must process items sequentially.
    fn present(&mut self, plan: &RenderPlan);
}
