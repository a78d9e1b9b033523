// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame render plan and the two-pass builder.
//!
//! [`SceneStore::build_frame`] turns the scene into a [`RenderPlan`]:
//!
//! 1. **Content passes** — one [`SurfacePass`] per surface, back to front.
//!    Every drawable integrates its transform, is skipped if invisible,
//!    and emits a [`DrawItem`] with GPU-ready constants.
//! 2. **Composite steps** — one [`CompositeStep`] per surface in the same
//!    back-to-front order, drawing each surface's target onto the
//!    backbuffer through its post-process shader.
//!
//! The split is load-bearing: compositing reads every surface's resolved
//! texture, so all content passes must land before the first composite.
//! Items are strictly ordered within a plan — the drawing model assumes
//! shared constant slots overwritten immediately before each draw call, so
//! backends must not reorder or parallelize submission.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::backend::{BufferId, ShaderId, TargetId, TextureId};
use crate::camera::Camera;
use crate::font::Glyph;

use crate::transform::Space;

use super::drawable::{DrawableKind, TextureFilter};
use super::id::INVALID;
use super::store::SceneStore;

/// A textured-quad draw: sprites, animations, and text glyphs.
#[derive(Clone, Debug)]
pub struct QuadItem {
    /// World-view matrix, transposed for the shared constant slot.
    pub transform: [f32; 16],
    /// Effective UV edges `[left, bottom, right, top]` in bottom-origin
    /// texture space, flips already applied.
    pub uv: [f32; 4],
    /// Linear RGBA color constant.
    pub color: [f32; 4],
    /// Texture to sample.
    pub texture: TextureId,
    /// Sampling filter.
    pub filter: TextureFilter,
    /// Pixel shader to bind.
    pub shader: ShaderId,
    /// Optional extra shader constants uploaded before the draw.
    pub extra: Option<Box<[f32]>>,
}

/// A line-strip draw over a polygon's vertex buffer.
#[derive(Clone, Debug)]
pub struct LineItem {
    /// World-view matrix, transposed for the shared constant slot.
    pub transform: [f32; 16],
    /// Linear RGBA color constant.
    pub color: [f32; 4],
    /// Vertex buffer holding the strip.
    pub buffer: BufferId,
    /// Number of vertices to draw.
    pub vertex_count: u32,
    /// Pixel shader to bind.
    pub shader: ShaderId,
}

/// One draw command inside a surface pass.
#[derive(Clone, Debug)]
pub enum DrawItem {
    /// Textured quad (6 indices, 2 triangles).
    Quad(QuadItem),
    /// Wireframe line strip.
    Lines(LineItem),
}

/// All draw commands targeting one surface's offscreen texture.
#[derive(Clone, Debug)]
pub struct SurfacePass {
    /// The surface's offscreen render target. Backends clear it (and the
    /// shared depth buffer) before drawing the items.
    pub target: TargetId,
    /// Draw commands in submission order.
    pub items: Vec<DrawItem>,
}

/// One composite draw: a surface's texture over the backbuffer as a
/// screen quad.
#[derive(Clone, Debug)]
pub struct CompositeStep {
    /// The surface texture to sample.
    pub source: TargetId,
    /// The surface's post-process shader.
    pub shader: ShaderId,
    /// Optional extra shader constants for the post-process pass.
    pub extra: Option<Box<[f32]>>,
}

/// An ordered list of passes and composite steps for a single frame.
///
/// Reused across frames via [`clear`](Self::clear) to avoid reallocation.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Backbuffer clear color (linear RGBA).
    pub background: [f32; 4],
    /// Content passes, back to front.
    pub passes: Vec<SurfacePass>,
    /// Composite steps, back to front.
    pub composites: Vec<CompositeStep>,
}

impl RenderPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears passes and composites for reuse.
    pub fn clear(&mut self) {
        self.passes.clear();
        self.composites.clear();
    }

    /// Total number of draw items across all passes.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.passes.iter().map(|p| p.items.len()).sum()
    }
}

/// Glyph-loop step: either a placed glyph or a line break.
enum TextStep {
    Glyph(Glyph),
    Newline,
}

impl SceneStore {
    /// Builds the frame's render plan.
    ///
    /// Every drawable's transform integrates with `dt` here, parents
    /// before children only insofar as draw order puts them there — a
    /// child drawn before its parent reads the parent's absolutes from the
    /// previous frame.
    pub fn build_frame(&mut self, camera: &Camera, dt: f64, plan: &mut RenderPlan) {
        plan.clear();

        // Back to front over the surface stack.
        let order: Vec<u32> = self.surface_order.iter().rev().copied().collect();
        for s in order {
            let (target, count) = {
                let data = self.surfaces[s as usize].as_ref().expect("live surface");
                (data.target, data.drawables.len())
            };

            let mut items = Vec::new();
            for k in 0..count {
                let idx = self.surfaces[s as usize]
                    .as_ref()
                    .expect("live surface")
                    .drawables[k];
                self.emit(idx, camera, dt, &mut items);
            }
            plan.passes.push(SurfacePass { target, items });

            let data = self.surfaces[s as usize].as_ref().expect("live surface");
            plan.composites.push(CompositeStep {
                source: data.target,
                shader: data.shader,
                extra: data.extra.clone(),
            });
        }
    }

    /// Integrates and emits one drawable.
    fn emit(&mut self, idx: u32, camera: &Camera, dt: f64, items: &mut Vec<DrawItem>) {
        let i = idx as usize;

        // Animation playback runs before integration and may rewrite the
        // sprite's UV; an animation without a current action draws nothing
        // and does not integrate.
        if let Some(DrawableKind::Animation(a)) = self.kinds[i].as_mut() {
            a.play(dt);
            if a.state.action().is_none() {
                return;
            }
        }

        self.transforms[i].integrate(dt);
        if !self.visible[i] {
            return;
        }

        let parent = self.parent_absolutes(idx);

        // Copy what the draw item needs before touching the transform, so
        // the matrix computation borrows freely.
        enum Emit {
            Lines(BufferId, u32, ShaderId),
            Quad(super::drawable::SpriteData),
            Text,
        }
        let emit = match self.kinds[i].as_ref().expect("live drawable") {
            DrawableKind::Polygon(p) => Emit::Lines(p.buffer, p.vertex_count, p.shader),
            DrawableKind::Sprite(s) => Emit::Quad(s.clone()),
            DrawableKind::Animation(a) => Emit::Quad(a.state.sprite.clone()),
            DrawableKind::Text(_) => Emit::Text,
        };

        match emit {
            Emit::Lines(buffer, vertex_count, shader) => {
                let matrix = self.transforms[i].render_matrix(camera, parent).to_gpu();
                items.push(DrawItem::Lines(LineItem {
                    transform: matrix,
                    color: self.colors[i].to_linear(),
                    buffer,
                    vertex_count,
                    shader,
                }));
            }
            Emit::Quad(sprite) => {
                let matrix = self.transforms[i].render_matrix(camera, parent).to_gpu();
                items.push(DrawItem::Quad(QuadItem {
                    transform: matrix,
                    uv: rect_to_uv(sprite.effective_uv()),
                    color: self.colors[i].to_linear(),
                    texture: sprite.texture.id,
                    filter: sprite.filter,
                    shader: sprite.shader,
                    extra: self.extras[i].clone(),
                }));
            }
            Emit::Text => self.emit_text(idx, camera, parent, items),
        }
    }

    /// Emits one quad per visible glyph, advancing a pen left to right and
    /// dropping down a line at embedded newlines. The transform's position
    /// is restored afterwards; scale is left at the last glyph's size,
    /// matching the engine this layout was lifted from.
    fn emit_text(
        &mut self,
        idx: u32,
        camera: &Camera,
        parent: Option<(Vec2, f64)>,
        items: &mut Vec<DrawItem>,
    ) {
        let i = idx as usize;
        let world_mode = self.transforms[i].space == Space::World;

        // Read-only pass: resolve glyphs and shared constants before the
        // transform starts mutating.
        let (steps, line_height, line_height_px, texture, filter, shader) = {
            let DrawableKind::Text(t) = self.kinds[i].as_ref().expect("live drawable") else {
                unreachable!("emit_text called on non-text drawable");
            };
            let font = self.font(t.font);
            let steps: Vec<TextStep> = t
                .text
                .chars()
                .filter_map(|c| {
                    if c == '\n' {
                        Some(TextStep::Newline)
                    } else {
                        // Codepoints the font does not cover are skipped;
                        // a missing glyph must not take the frame down.
                        font.glyph(c).copied().map(TextStep::Glyph)
                    }
                })
                .collect();
            (
                steps,
                font.line_height(),
                font.line_height_px(),
                t.sprite.texture.id,
                t.sprite.filter,
                t.sprite.shader,
            )
        };

        let color = self.colors[i].to_linear();
        let extra = self.extras[i].clone();
        let saved = self.transforms[i].position;

        // Glyph quads hang from their lower-right corner, so the pen
        // starts one glyph-extent in.
        let mut start = saved;
        if let Some(TextStep::Glyph(first)) = steps.first() {
            if world_mode {
                start.x += first.size.width;
                start.y += first.size.height;
            } else {
                start.x += first.size_px.width;
                start.y += first.size_px.height;
            }
        }

        let mut advance = 0.0;
        let mut line = 0.0;
        for step in &steps {
            let glyph = match step {
                TextStep::Newline => {
                    advance = 0.0;
                    line += if world_mode {
                        line_height
                    } else {
                        -line_height_px
                    };
                    continue;
                }
                TextStep::Glyph(g) => g,
            };

            {
                let t = &mut self.transforms[i];
                if world_mode {
                    t.position.x = start.x + advance + glyph.offset.x;
                    t.position.y = start.y - line - glyph.offset.y;
                    t.scale.x = glyph.size.width;
                    t.scale.y = glyph.size.height;
                } else {
                    t.position.x = start.x + advance + glyph.offset_px.x;
                    t.position.y = start.y - line - glyph.offset_px.y;
                    t.scale.x = glyph.size_px.width;
                    t.scale.y = glyph.size_px.height;
                }
            }
            advance += if world_mode {
                glyph.advance
            } else {
                glyph.advance_px
            };

            let matrix = self.transforms[i].render_matrix(camera, parent).to_gpu();
            items.push(DrawItem::Quad(QuadItem {
                transform: matrix,
                uv: rect_to_uv(glyph.uv),
                color,
                texture,
                filter,
                shader,
                extra: extra.clone(),
            }));
        }

        self.transforms[i].position = saved;
    }

    /// The evaluated absolutes of a drawable's parent, if it has one.
    fn parent_absolutes(&self, idx: u32) -> Option<(Vec2, f64)> {
        let p = self.links[idx as usize].parent;
        (p != INVALID).then(|| {
            let t = &self.transforms[p as usize];
            (t.absolute_position(), t.absolute_rotation())
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "f64 → f32 narrowing for GPU upload is intentional"
)]
fn rect_to_uv(r: Rect) -> [f32; 4] {
    [r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32]
}
