// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for drawables and surfaces.
//!
//! Drawables occupy slots in parallel arrays addressed by [`DrawableId`]
//! handles. Destroyed slots are recycled via a free list, and generation
//! counters make stale handles detectable: using a handle after destroy
//! panics instead of silently touching the slot's new occupant.
//!
//! Two failure classes are deliberately different: structural invariant
//! violations the caller can hit through normal API use return
//! [`SceneError`] (double-parenting, sprite operations on text), while
//! stale handles are programmer errors and panic.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size};

use crate::backend::{BackendError, BufferId, Retired, ResourceFactory, ShaderId, TargetId};
use crate::camera::Camera;
use crate::color::Color;
use crate::font::Font;
use crate::transform::Transform;

use super::drawable::{
    Action, AnimationData, AnimationHandler, DrawableKind, PolygonData, SpriteData, TextData,
    Texture, TextureFilter,
};
use super::id::{DrawableId, FontId, INVALID, SurfaceId};

/// Structural errors surfaced by scene operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneError {
    /// The drawable already has a parent; detach it first.
    AlreadyParented,
    /// The operation does not apply to this drawable kind (for example,
    /// UV or flip operations on text).
    Unsupported,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyParented => write!(f, "drawable already has a parent"),
            Self::Unsupported => write!(f, "operation not supported for this drawable kind"),
        }
    }
}

impl core::error::Error for SceneError {}

/// Construction parameters for a [`SceneStore`].
#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    /// Viewport size in pixels; offscreen surface targets match it.
    pub client_size: Size,
}

/// Parent/child links of one drawable's transform.
///
/// Children are an ordered list of raw slot indices; each child records its
/// slot in the parent's list so removal is a swap with the last entry.
#[derive(Clone, Debug)]
pub(crate) struct Links {
    pub(crate) parent: u32,
    pub(crate) child_slot: u32,
    pub(crate) children: Vec<u32>,
}

impl Links {
    const fn none() -> Self {
        Self {
            parent: INVALID,
            child_slot: INVALID,
            children: Vec::new(),
        }
    }
}

/// One surface: an ordered dense set of drawables rendered into an
/// offscreen target, then composited with a post-process shader.
#[derive(Debug)]
pub(crate) struct SurfaceData {
    pub(crate) drawables: Vec<u32>,
    pub(crate) shader: ShaderId,
    pub(crate) target: TargetId,
    pub(crate) extra: Option<Box<[f32]>>,
}

/// Arena of drawables and surfaces plus the shared default resources.
///
/// Replaces the free-standing manager singletons such an engine would
/// otherwise accumulate: one store is constructed per engine and passed by
/// reference into everything that needs it.
#[derive(Debug)]
pub struct SceneStore {
    // -- Drawable slots (parallel arrays) --
    pub(crate) transforms: Vec<Transform>,
    pub(crate) colors: Vec<Color>,
    pub(crate) visible: Vec<bool>,
    pub(crate) extras: Vec<Option<Box<[f32]>>>,
    pub(crate) surface_of: Vec<u32>,
    pub(crate) surface_slot: Vec<u32>,
    pub(crate) kinds: Vec<Option<DrawableKind>>,
    pub(crate) links: Vec<Links>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,

    // -- Surface slots --
    pub(crate) surfaces: Vec<Option<SurfaceData>>,
    surface_generation: Vec<u32>,
    surface_free: Vec<u32>,
    /// Surface stack, front (topmost) first.
    pub(crate) surface_order: Vec<u32>,
    default_surface: SurfaceId,

    // -- Shared resources --
    fonts: Vec<Font>,
    white_pixel: Texture,
    rect_buffer: BufferId,
    circle_buffer: BufferId,
    default_shader: ShaderId,
    pub(crate) post_shader: ShaderId,
    client_size: Size,
    /// Filter applied to newly created sprites.
    pub default_filter: TextureFilter,

    retired: Vec<Retired>,
}

/// Vertex count of the shared unit-rectangle outline buffer.
const RECT_VERTICES: u32 = 5;
/// Segment count of the shared unit-circle outline buffer.
const CIRCLE_SEGMENTS: u32 = 20;

impl SceneStore {
    /// Creates a store with its default surface and shared resources
    /// (white pixel, unit rectangle/circle outline buffers, built-in font).
    ///
    /// # Errors
    ///
    /// Propagates backend resource-creation failures; these are fatal to
    /// engine startup.
    pub fn new(
        factory: &mut dyn ResourceFactory,
        camera: &Camera,
        config: SceneConfig,
    ) -> Result<Self, BackendError> {
        let white = factory.create_texture(&[Color::WHITE], 1, 1)?;

        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, -1.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, 0.0),
        ];
        let rect_buffer = factory.create_lines(&square)?;

        let mut circle = Vec::with_capacity(CIRCLE_SEGMENTS as usize + 1);
        for i in 0..=CIRCLE_SEGMENTS {
            let angle = core::f64::consts::TAU / f64::from(CIRCLE_SEGMENTS) * f64::from(i);
            circle.push(Point::new(angle.sin() / 2.0, angle.cos() / 2.0));
        }
        let circle_buffer = factory.create_lines(&circle)?;

        let font = Font::builtin(factory, camera)?;

        let mut store = Self {
            transforms: Vec::new(),
            colors: Vec::new(),
            visible: Vec::new(),
            extras: Vec::new(),
            surface_of: Vec::new(),
            surface_slot: Vec::new(),
            kinds: Vec::new(),
            links: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            surfaces: Vec::new(),
            surface_generation: Vec::new(),
            surface_free: Vec::new(),
            surface_order: Vec::new(),
            default_surface: SurfaceId {
                idx: INVALID,
                generation: 0,
            },
            fonts: alloc::vec![font],
            white_pixel: Texture {
                id: white,
                size: Size::new(1.0, 1.0),
            },
            rect_buffer,
            circle_buffer,
            default_shader: factory.default_shader(),
            post_shader: factory.default_post_shader(),
            client_size: config.client_size,
            default_filter: TextureFilter::Point,
            retired: Vec::new(),
        };
        store.default_surface = store.create_surface(factory)?;
        Ok(store)
    }

    // -- Drawable creation --

    /// Creates a sprite over `texture` and adds it to `surface`.
    pub fn add_sprite(&mut self, texture: Texture, surface: SurfaceId) -> DrawableId {
        let sprite = SpriteData::new(texture, self.default_shader, self.default_filter);
        self.spawn(DrawableKind::Sprite(sprite), surface)
    }

    /// Creates a unicolor quad over the shared 1×1 white texture.
    pub fn add_fill_rectangle(&mut self, surface: SurfaceId) -> DrawableId {
        self.add_sprite(self.white_pixel, surface)
    }

    /// Creates a polygon with its own vertex buffer from world-space
    /// points.
    ///
    /// # Errors
    ///
    /// Propagates the backend's buffer-creation failure.
    pub fn add_polygon(
        &mut self,
        factory: &mut dyn ResourceFactory,
        points: &[Point],
        surface: SurfaceId,
    ) -> Result<DrawableId, BackendError> {
        let buffer = factory.create_lines(points)?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "vertex counts are far below u32::MAX"
        )]
        let polygon = PolygonData {
            buffer,
            vertex_count: points.len() as u32,
            owns_buffer: true,
            shader: self.default_shader,
        };
        Ok(self.spawn(DrawableKind::Polygon(polygon), surface))
    }

    /// Creates a polygon over a caller-managed shared buffer. The buffer
    /// must outlive the polygon; it is not retired on destroy.
    pub fn add_polygon_shared(
        &mut self,
        buffer: BufferId,
        vertex_count: u32,
        surface: SurfaceId,
    ) -> DrawableId {
        let polygon = PolygonData {
            buffer,
            vertex_count,
            owns_buffer: false,
            shader: self.default_shader,
        };
        self.spawn(DrawableKind::Polygon(polygon), surface)
    }

    /// Creates a unit-rectangle outline from the shared buffer.
    pub fn add_rectangle(&mut self, surface: SurfaceId) -> DrawableId {
        self.add_polygon_shared(self.rect_buffer, RECT_VERTICES, surface)
    }

    /// Creates a unit-circle outline from the shared buffer.
    pub fn add_circle(&mut self, surface: SurfaceId) -> DrawableId {
        self.add_polygon_shared(self.circle_buffer, CIRCLE_SEGMENTS + 1, surface)
    }

    /// Creates a circle outline with a custom segment count (own buffer).
    ///
    /// # Errors
    ///
    /// Propagates the backend's buffer-creation failure.
    pub fn add_circle_with(
        &mut self,
        factory: &mut dyn ResourceFactory,
        segments: u32,
        surface: SurfaceId,
    ) -> Result<DrawableId, BackendError> {
        let mut points = Vec::with_capacity(segments as usize + 1);
        for i in 0..=segments {
            let angle = core::f64::consts::TAU / f64::from(segments) * f64::from(i);
            points.push(Point::new(angle.sin(), angle.cos()));
        }
        self.add_polygon(factory, &points, surface)
    }

    /// Creates a text drawable and adds it to `surface`.
    ///
    /// Text starts with the source engine's origin convention: origin
    /// `(-1, 1)` so the string hangs down-right from its position.
    pub fn add_text(&mut self, text: &str, font: FontId, surface: SurfaceId) -> DrawableId {
        let atlas = Texture {
            id: self.fonts[font.0 as usize].texture(),
            size: self.fonts[font.0 as usize].texture_size(),
        };
        let sprite = SpriteData::new(atlas, self.default_shader, self.default_filter);
        let data = TextData {
            sprite,
            font,
            text: String::from(text),
        };
        let id = self.spawn(DrawableKind::Text(data), surface);
        let idx = id.idx as usize;
        self.transforms[idx].origin = kurbo::Vec2::new(-1.0, 1.0);
        id
    }

    /// Creates an animation (sprite driven by an action table) over
    /// `texture` and adds it to `surface`.
    pub fn add_animation(&mut self, texture: Texture, surface: SurfaceId) -> DrawableId {
        let sprite = SpriteData::new(texture, self.default_shader, self.default_filter);
        self.spawn(DrawableKind::Animation(AnimationData::new(sprite)), surface)
    }

    fn spawn(&mut self, kind: DrawableKind, surface: SurfaceId) -> DrawableId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.transforms[i] = Transform::new();
            self.colors[i] = Color::WHITE;
            self.visible[i] = true;
            self.extras[i] = None;
            self.surface_of[i] = INVALID;
            self.surface_slot[i] = INVALID;
            self.kinds[i] = Some(kind);
            self.links[i] = Links::none();
            idx
        } else {
            let idx = self.len;
            self.transforms.push(Transform::new());
            self.colors.push(Color::WHITE);
            self.visible.push(true);
            self.extras.push(None);
            self.surface_of.push(INVALID);
            self.surface_slot.push(INVALID);
            self.kinds.push(Some(kind));
            self.links.push(Links::none());
            self.generation.push(0);
            self.len += 1;
            idx
        };

        let id = DrawableId {
            idx,
            generation: self.generation[idx as usize],
        };
        self.add_to_surface(id, surface);
        id
    }

    /// Destroys a drawable: removes it from its surface, clears both sides
    /// of every parent/child relation, retires exclusively-owned GPU
    /// resources, and frees the slot.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_drawable(&mut self, id: DrawableId) {
        let idx = self.validate(id);
        self.detach_from_surface_raw(idx);
        self.detach_raw(idx);

        let children = mem::take(&mut self.links[idx as usize].children);
        for child in children {
            self.links[child as usize].parent = INVALID;
            self.links[child as usize].child_slot = INVALID;
        }

        if let Some(DrawableKind::Polygon(p)) = self.kinds[idx as usize].take() {
            if p.owns_buffer {
                self.retired.push(Retired::Buffer(p.buffer));
            }
        }

        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the handle refers to a live drawable.
    #[must_use]
    pub fn is_alive(&self, id: DrawableId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.kinds[id.idx as usize].is_some()
    }

    // -- Parenting --

    /// Makes `child`'s transform follow `parent`'s.
    ///
    /// # Errors
    ///
    /// [`SceneError::AlreadyParented`] if `child` already has a parent; the
    /// existing relation is left intact.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn set_parent(&mut self, child: DrawableId, parent: DrawableId) -> Result<(), SceneError> {
        let c = self.validate(child);
        let p = self.validate(parent);
        if self.links[c as usize].child_slot != INVALID {
            return Err(SceneError::AlreadyParented);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "child lists are far below u32::MAX entries"
        )]
        let slot = self.links[p as usize].children.len() as u32;
        self.links[c as usize].parent = p;
        self.links[c as usize].child_slot = slot;
        self.links[p as usize].children.push(c);
        Ok(())
    }

    /// The parent of `id`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent_of(&self, id: DrawableId) -> Option<DrawableId> {
        let idx = self.validate(id);
        let p = self.links[idx as usize].parent;
        (p != INVALID).then(|| DrawableId {
            idx: p,
            generation: self.generation[p as usize],
        })
    }

    /// The children of `id`, in attach order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children_of(&self, id: DrawableId) -> Vec<DrawableId> {
        let idx = self.validate(id);
        self.links[idx as usize]
            .children
            .iter()
            .map(|&c| DrawableId {
                idx: c,
                generation: self.generation[c as usize],
            })
            .collect()
    }

    /// Detaches `id` from its parent, clearing both sides of the relation.
    /// No-op if it has no parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach_from_parent(&mut self, id: DrawableId) {
        let idx = self.validate(id);
        self.detach_raw(idx);
    }

    fn detach_raw(&mut self, idx: u32) {
        let slot = self.links[idx as usize].child_slot;
        if slot == INVALID {
            return;
        }
        let parent = self.links[idx as usize].parent;
        let siblings = &mut self.links[parent as usize].children;
        assert!(
            siblings[slot as usize] == idx,
            "corrupt child index for drawable slot {idx}"
        );
        siblings.swap_remove(slot as usize);
        if let Some(&moved) = siblings.get(slot as usize) {
            self.links[moved as usize].child_slot = slot;
        }
        self.links[idx as usize].parent = INVALID;
        self.links[idx as usize].child_slot = INVALID;
    }

    // -- Common drawable state --

    /// Shared access to a drawable's transform.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn transform(&self, id: DrawableId) -> &Transform {
        let idx = self.validate(id);
        &self.transforms[idx as usize]
    }

    /// Mutable access to a drawable's transform.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn transform_mut(&mut self, id: DrawableId) -> &mut Transform {
        let idx = self.validate(id);
        &mut self.transforms[idx as usize]
    }

    /// The drawable's color.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn color(&self, id: DrawableId) -> Color {
        let idx = self.validate(id);
        self.colors[idx as usize]
    }

    /// Sets the drawable's color.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_color(&mut self, id: DrawableId, color: Color) {
        let idx = self.validate(id);
        self.colors[idx as usize] = color;
    }

    /// Whether the drawable is drawn. Invisible drawables still integrate
    /// their transforms each frame.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_visible(&self, id: DrawableId) -> bool {
        let idx = self.validate(id);
        self.visible[idx as usize]
    }

    /// Shows or hides the drawable.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visible(&mut self, id: DrawableId, visible: bool) {
        let idx = self.validate(id);
        self.visible[idx as usize] = visible;
    }

    /// Sets the opaque extra shader constants uploaded before this
    /// drawable's draw call (`None` to clear).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_extra(&mut self, id: DrawableId, extra: Option<Box<[f32]>>) {
        let idx = self.validate(id);
        self.extras[idx as usize] = extra;
    }

    /// Sets the pixel shader of any drawable kind.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_shader(&mut self, id: DrawableId, shader: ShaderId) {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Polygon(p) => p.shader = shader,
            DrawableKind::Sprite(s) => s.shader = shader,
            DrawableKind::Text(t) => t.sprite.shader = shader,
            DrawableKind::Animation(a) => a.state.sprite.shader = shader,
        }
    }

    // -- Sprite operations (sprites and animations; rejected for text) --

    /// Sets the UV sub-rectangle from a top-origin rect.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn set_uv(&mut self, id: DrawableId, uv: Rect) -> Result<(), SceneError> {
        self.with_sprite_mut(id, |s| s.set_uv(uv))
    }

    /// The stored bottom-origin UV rectangle (flips not applied).
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn uv(&self, id: DrawableId) -> Result<Rect, SceneError> {
        self.with_sprite(id, SpriteData::uv)
    }

    /// Sets the horizontal draw-time mirror flag.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn set_flip_h(&mut self, id: DrawableId, flip: bool) -> Result<(), SceneError> {
        self.with_sprite_mut(id, |s| s.flip_h = flip)
    }

    /// Sets the vertical draw-time mirror flag.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn set_flip_v(&mut self, id: DrawableId, flip: bool) -> Result<(), SceneError> {
        self.with_sprite_mut(id, |s| s.flip_v = flip)
    }

    /// The horizontal mirror flag.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn flip_h(&self, id: DrawableId) -> Result<bool, SceneError> {
        self.with_sprite(id, |s| s.flip_h)
    }

    /// The vertical mirror flag.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn flip_v(&self, id: DrawableId) -> Result<bool, SceneError> {
        self.with_sprite(id, |s| s.flip_v)
    }

    /// Sets the texture sampling filter.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn set_filter(&mut self, id: DrawableId, filter: TextureFilter) -> Result<(), SceneError> {
        self.with_sprite_mut(id, |s| s.filter = filter)
    }

    /// Sets the transform scale to the texture's native pixel size via the
    /// camera ratio (one-shot, like
    /// [`Transform::set_pixel_scale`]).
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn set_scale_to_texture_size(
        &mut self,
        id: DrawableId,
        camera: &Camera,
    ) -> Result<(), SceneError> {
        let idx = self.validate(id);
        let size = self.kinds[idx as usize]
            .as_ref()
            .expect("validated live")
            .sprite()
            .ok_or(SceneError::Unsupported)?
            .texture
            .size;
        self.transforms[idx as usize].set_pixel_scale(size, camera);
        Ok(())
    }

    /// The sprite's texture.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] unless the drawable is a sprite or an
    /// animation.
    pub fn texture(&self, id: DrawableId) -> Result<Texture, SceneError> {
        self.with_sprite(id, |s| s.texture)
    }

    fn with_sprite<R>(
        &self,
        id: DrawableId,
        f: impl FnOnce(&SpriteData) -> R,
    ) -> Result<R, SceneError> {
        let idx = self.validate(id);
        self.kinds[idx as usize]
            .as_ref()
            .expect("validated live")
            .sprite()
            .map(f)
            .ok_or(SceneError::Unsupported)
    }

    fn with_sprite_mut<R>(
        &mut self,
        id: DrawableId,
        f: impl FnOnce(&mut SpriteData) -> R,
    ) -> Result<R, SceneError> {
        let idx = self.validate(id);
        self.kinds[idx as usize]
            .as_mut()
            .expect("validated live")
            .sprite_mut()
            .map(f)
            .ok_or(SceneError::Unsupported)
    }

    // -- Animation operations --

    /// Runs `f` against the animation's playback state.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn with_animation<R>(
        &mut self,
        id: DrawableId,
        f: impl FnOnce(&mut super::drawable::AnimationState) -> R,
    ) -> Result<R, SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Animation(a) => Ok(f(&mut a.state)),
            _ => Err(SceneError::Unsupported),
        }
    }

    /// Appends an action to the animation and returns its index.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn add_action(&mut self, id: DrawableId, action: Action) -> Result<usize, SceneError> {
        self.with_animation(id, |s| s.add_action(action))
    }

    /// Registers a frame-changed handler, fired after every frame advance
    /// in registration order, before any loop handler.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn on_frame_changed(
        &mut self,
        id: DrawableId,
        handler: AnimationHandler,
    ) -> Result<(), SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Animation(a) => {
                a.frame_handlers.push(handler);
                Ok(())
            }
            _ => Err(SceneError::Unsupported),
        }
    }

    /// Registers an action-looped handler, fired exactly once per wrap in
    /// either direction.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn on_action_looped(
        &mut self,
        id: DrawableId,
        handler: AnimationHandler,
    ) -> Result<(), SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Animation(a) => {
                a.loop_handlers.push(handler);
                Ok(())
            }
            _ => Err(SceneError::Unsupported),
        }
    }

    /// Drops all frame-changed handlers.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn clear_frame_handlers(&mut self, id: DrawableId) -> Result<(), SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Animation(a) => {
                a.frame_handlers.clear();
                Ok(())
            }
            _ => Err(SceneError::Unsupported),
        }
    }

    /// Drops all action-looped handlers.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not an animation.
    pub fn clear_loop_handlers(&mut self, id: DrawableId) -> Result<(), SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Animation(a) => {
                a.loop_handlers.clear();
                Ok(())
            }
            _ => Err(SceneError::Unsupported),
        }
    }

    // -- Text operations --

    /// Replaces the text string.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not text.
    pub fn set_text(&mut self, id: DrawableId, text: &str) -> Result<(), SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_mut().expect("validated live") {
            DrawableKind::Text(t) => {
                t.text = String::from(text);
                Ok(())
            }
            _ => Err(SceneError::Unsupported),
        }
    }

    /// The current text string.
    ///
    /// # Errors
    ///
    /// [`SceneError::Unsupported`] if the drawable is not text.
    pub fn text(&self, id: DrawableId) -> Result<&str, SceneError> {
        let idx = self.validate(id);
        match self.kinds[idx as usize].as_ref().expect("validated live") {
            DrawableKind::Text(t) => Ok(&t.text),
            _ => Err(SceneError::Unsupported),
        }
    }

    // -- Fonts --

    /// Registers a font and returns its handle.
    pub fn add_font(&mut self, font: Font) -> FontId {
        self.fonts.push(font);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font counts are far below u32::MAX"
        )]
        let id = self.fonts.len() as u32 - 1;
        FontId(id)
    }

    /// Looks up a registered font.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of range.
    #[must_use]
    pub fn font(&self, id: FontId) -> &Font {
        &self.fonts[id.0 as usize]
    }

    /// The built-in default font.
    #[inline]
    #[must_use]
    pub const fn default_font(&self) -> FontId {
        FontId(0)
    }

    // -- Shared resources --

    /// The shared 1×1 white texture used by fill rectangles.
    #[inline]
    #[must_use]
    pub const fn white_pixel(&self) -> Texture {
        self.white_pixel
    }

    /// Viewport size surfaces are created at.
    #[inline]
    #[must_use]
    pub const fn client_size(&self) -> Size {
        self.client_size
    }

    /// Drains the GPU resources released since the last call; the frame
    /// driver hands each to [`ResourceFactory::destroy`].
    pub fn take_retired(&mut self) -> Vec<Retired> {
        mem::take(&mut self.retired)
    }

    pub(crate) fn retire(&mut self, retired: Retired) {
        self.retired.push(retired);
    }

    // -- Internal helpers --

    /// Maps a handle to its raw slot, panicking if stale.
    pub(crate) fn validate(&self, id: DrawableId) -> u32 {
        assert!(
            self.is_alive(id),
            "stale DrawableId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
        id.idx
    }

    pub(crate) fn id_at(&self, idx: u32) -> DrawableId {
        DrawableId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn surface_id_at(&self, idx: u32) -> SurfaceId {
        SurfaceId {
            idx,
            generation: self.surface_generation[idx as usize],
        }
    }

    // Surface arena internals live in surface.rs; these pieces are shared.

    pub(crate) fn create_surface_slot(&mut self, data: SurfaceData) -> SurfaceId {
        let idx = if let Some(idx) = self.surface_free.pop() {
            self.surfaces[idx as usize] = Some(data);
            idx
        } else {
            self.surfaces.push(Some(data));
            self.surface_generation.push(0);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "surface counts are far below u32::MAX"
            )]
            let idx = self.surfaces.len() as u32 - 1;
            idx
        };
        self.surface_order.push(idx);
        SurfaceId {
            idx,
            generation: self.surface_generation[idx as usize],
        }
    }

    pub(crate) fn free_surface_slot(&mut self, idx: u32) {
        self.surfaces[idx as usize] = None;
        self.surface_generation[idx as usize] += 1;
        self.surface_free.push(idx);
        self.surface_order.retain(|&s| s != idx);
    }

    /// Returns whether the handle refers to a live surface.
    #[must_use]
    pub fn is_surface_alive(&self, id: SurfaceId) -> bool {
        (id.idx as usize) < self.surfaces.len()
            && self.surface_generation[id.idx as usize] == id.generation
            && self.surfaces[id.idx as usize].is_some()
    }

    pub(crate) fn validate_surface(&self, id: SurfaceId) -> u32 {
        assert!(self.is_surface_alive(id), "stale SurfaceId: {id:?}");
        id.idx
    }

    /// The always-present default surface.
    #[inline]
    #[must_use]
    pub const fn default_surface(&self) -> SurfaceId {
        self.default_surface
    }
}
