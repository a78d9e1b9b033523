// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable kinds and their payloads.
//!
//! Drawables are a tagged union over four kinds. `Text` and `Animation`
//! *compose* a sprite — they embed [`SpriteData`] and delegate to it —
//! rather than forming an inheritance chain.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};

use crate::backend::{BufferId, ShaderId, TextureId};

use super::FontId;

/// Texture sampling filter for sprites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    /// Nearest-neighbor sampling.
    #[default]
    Point,
    /// Bilinear sampling.
    Linear,
}

/// A backend texture plus its pixel size.
///
/// Textures are caller-managed and freely shared between sprites; the
/// scene never retires them when a drawable is destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texture {
    /// Backend-assigned key.
    pub id: TextureId,
    /// Native size in pixels.
    pub size: Size,
}

/// Payload of a textured-quad drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteData {
    /// The texture to sample.
    pub texture: Texture,
    /// Pixel shader used for this sprite.
    pub shader: ShaderId,
    /// Stored UV sub-rectangle, bottom-origin. Full texture by default.
    pub(crate) uv: Rect,
    /// Mirror horizontally at draw time (stored UV is untouched).
    pub flip_h: bool,
    /// Mirror vertically at draw time (stored UV is untouched).
    pub flip_v: bool,
    /// Sampling filter.
    pub filter: TextureFilter,
}

impl SpriteData {
    pub(crate) fn new(texture: Texture, shader: ShaderId, filter: TextureFilter) -> Self {
        Self {
            texture,
            shader,
            uv: Rect::new(0.0, 0.0, 1.0, 1.0),
            flip_h: false,
            flip_v: false,
            filter,
        }
    }

    /// Sets the UV sub-rectangle from a *top-origin* rect (y grows down, as
    /// in image space); stored bottom-origin.
    pub(crate) fn set_uv(&mut self, uv: Rect) {
        self.uv = Rect::new(uv.x0, 1.0 - uv.y1, uv.x1, 1.0 - uv.y0);
    }

    /// The stored (bottom-origin) UV rectangle, without flips applied.
    pub(crate) const fn uv(&self) -> Rect {
        self.uv
    }

    /// The UV rectangle actually drawn: stored UV with flips applied by
    /// swapping edges.
    pub(crate) fn effective_uv(&self) -> Rect {
        let mut uv = self.uv;
        if self.flip_h {
            core::mem::swap(&mut uv.x0, &mut uv.x1);
        }
        if self.flip_v {
            core::mem::swap(&mut uv.y0, &mut uv.y1);
        }
        uv
    }
}

/// Payload of a wireframe (line-strip) drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonData {
    /// The vertex buffer holding the line strip.
    pub buffer: BufferId,
    /// Number of vertices in the strip.
    pub vertex_count: u32,
    /// Whether the polygon owns `buffer` exclusively. Owned buffers are
    /// retired on destroy; shared buffers are caller-managed and must
    /// outlive every polygon using them.
    pub owns_buffer: bool,
    /// Pixel shader used for this polygon.
    pub shader: ShaderId,
}

/// Payload of a bitmap-text drawable: a sprite drawn once per glyph.
#[derive(Clone, Debug)]
pub struct TextData {
    pub(crate) sprite: SpriteData,
    /// The font supplying glyph metrics and the atlas texture.
    pub font: FontId,
    pub(crate) text: String,
}

/// An ordered sequence of texture sub-rectangles forming one animation
/// cycle, plus a signed playback speed in frames per second (negative plays
/// backward).
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    uv_table: Vec<Rect>,
    /// Playback speed in frames per second; sign selects direction.
    pub speed: f64,
}

impl Action {
    /// Creates an action from explicit top-origin UV rectangles.
    #[must_use]
    pub const fn new(uv_table: Vec<Rect>, speed: f64) -> Self {
        Self { uv_table, speed }
    }

    /// Creates an action from a uniform `columns × rows` grid, covering
    /// cells `first..=last` in row-major order.
    #[must_use]
    pub fn from_grid(speed: f64, columns: u32, rows: u32, first: u32, last: u32) -> Self {
        let width = 1.0 / f64::from(columns);
        let height = 1.0 / f64::from(rows);
        let mut uv_table = Vec::new();
        'grid: for i in 0..rows {
            for j in 0..columns {
                let cell = columns * i + j;
                if cell >= first {
                    uv_table.push(Rect::new(
                        width * f64::from(j),
                        height * f64::from(i),
                        width * f64::from(j + 1),
                        height * f64::from(i + 1),
                    ));
                }
                if cell >= last {
                    break 'grid;
                }
            }
        }
        Self { uv_table, speed }
    }

    /// Creates an action from pixel-space rectangles on a texture of the
    /// given size.
    #[must_use]
    pub fn from_pixel_rects(speed: f64, texture_size: Size, rects_px: &[Rect]) -> Self {
        let uv_table = rects_px
            .iter()
            .map(|r| {
                Rect::new(
                    r.x0 / texture_size.width,
                    r.y0 / texture_size.height,
                    r.x1 / texture_size.width,
                    r.y1 / texture_size.height,
                )
            })
            .collect();
        Self { uv_table, speed }
    }

    /// Number of frames.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.uv_table.len()
    }

    /// Whether the action has no frames.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uv_table.is_empty()
    }

    /// The top-origin UV rectangle of frame `i`.
    #[inline]
    #[must_use]
    pub fn frame_uv(&self, i: usize) -> Rect {
        self.uv_table[i]
    }
}

/// A callback fired on animation frame changes and action loops.
///
/// Handlers receive the animation's mutable state and the current frame
/// index, so a handler may switch actions, change speed, or reposition the
/// playhead. Handlers cannot register further handlers — registration
/// needs the store, which is not reachable from inside a callback.
pub type AnimationHandler = Box<dyn FnMut(&mut AnimationState, usize)>;

/// The mutable playback state of an animation (everything except its
/// registered handlers).
#[derive(Clone, Debug)]
pub struct AnimationState {
    pub(crate) sprite: SpriteData,
    pub(crate) actions: Vec<Action>,
    pub(crate) current: Option<usize>,
    pub(crate) indicator: f64,
    pub(crate) frame: usize,
}

impl AnimationState {
    pub(crate) fn new(sprite: SpriteData) -> Self {
        Self {
            sprite,
            actions: Vec::new(),
            current: None,
            indicator: 0.0,
            frame: 0,
        }
    }

    /// Appends an action and returns its index.
    pub fn add_action(&mut self, action: Action) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// Selects the current action.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_action(&mut self, index: usize) {
        assert!(index < self.actions.len(), "action index out of range");
        self.current = Some(index);
    }

    /// Index of the current action, if any.
    #[inline]
    #[must_use]
    pub const fn action(&self) -> Option<usize> {
        self.current
    }

    /// Playback speed of the current action (`None` without one).
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        self.current.map(|i| self.actions[i].speed)
    }

    /// Sets the playback speed of the current action; no-op without one.
    pub fn set_speed(&mut self, speed: f64) {
        if let Some(i) = self.current {
            self.actions[i].speed = speed;
        }
    }

    /// The current frame index, always in `[0, len)` of the current action.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Repositions the playhead, wrapping into range; no-op without a
    /// current action.
    pub fn set_frame(&mut self, frame: usize) {
        if let Some(i) = self.current {
            self.frame = frame % self.actions[i].len();
        }
    }

    fn current_len(&self) -> Option<usize> {
        self.current.map(|i| self.actions[i].len())
    }
}

/// An animation's full payload: playback state plus registered handlers.
pub struct AnimationData {
    pub(crate) state: AnimationState,
    pub(crate) frame_handlers: Vec<AnimationHandler>,
    pub(crate) loop_handlers: Vec<AnimationHandler>,
}

impl AnimationData {
    pub(crate) fn new(sprite: SpriteData) -> Self {
        Self {
            state: AnimationState::new(sprite),
            frame_handlers: Vec::new(),
            loop_handlers: Vec::new(),
        }
    }

    /// Advances playback by `dt` seconds and writes the current frame's UV
    /// into the sprite.
    ///
    /// Crossing `indicator >= 1` advances one frame (remainder reset to 0);
    /// crossing below 0 steps back one frame (indicator reset to 1), so a
    /// single call moves at most one frame. Frame-changed handlers run
    /// before loop handlers; the action length is read before handlers run,
    /// so an action switch inside a handler takes effect on the next call.
    pub(crate) fn play(&mut self, dt: f64) {
        let speed = self.state.speed().unwrap_or(0.0);
        if speed != 0.0 {
            self.state.indicator += speed * dt;
            if self.state.indicator >= 1.0 {
                self.state.indicator = 0.0;
                self.next_frame();
            } else if self.state.indicator < 0.0 {
                self.state.indicator = 1.0;
                self.previous_frame();
            }
        }

        if let Some(i) = self.state.current {
            let uv = self.state.actions[i].frame_uv(self.state.frame);
            self.state.sprite.set_uv(uv);
        }
    }

    /// Steps forward one frame, firing changed handlers then, on wrapping
    /// past the last frame, loop handlers (exactly once per wrap).
    pub(crate) fn next_frame(&mut self) {
        let Some(len) = self.state.current_len() else {
            return;
        };

        self.state.frame += 1;
        let frame = self.state.frame;
        for handler in &mut self.frame_handlers {
            handler(&mut self.state, frame);
        }

        if self.state.frame >= len {
            self.state.frame = 0;
            for handler in &mut self.loop_handlers {
                handler(&mut self.state, 0);
            }
        }
    }

    /// Steps backward one frame, firing changed handlers then, on wrapping
    /// past the first frame, loop handlers (exactly once per wrap).
    pub(crate) fn previous_frame(&mut self) {
        let Some(len) = self.state.current_len() else {
            return;
        };

        let underflowed = self.state.frame == 0;
        if !underflowed {
            self.state.frame -= 1;
        }
        let frame = self.state.frame;
        for handler in &mut self.frame_handlers {
            handler(&mut self.state, frame);
        }

        if underflowed {
            self.state.frame = len - 1;
            let last = self.state.frame;
            for handler in &mut self.loop_handlers {
                handler(&mut self.state, last);
            }
        }
    }
}

impl fmt::Debug for AnimationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationData")
            .field("state", &self.state)
            .field("frame_handlers", &self.frame_handlers.len())
            .field("loop_handlers", &self.loop_handlers.len())
            .finish()
    }
}

/// The payload of one drawable slot.
#[derive(Debug)]
pub enum DrawableKind {
    /// Wireframe line strip.
    Polygon(PolygonData),
    /// Textured quad.
    Sprite(SpriteData),
    /// Bitmap text (sprite drawn per glyph).
    Text(TextData),
    /// Sprite driven by an action table.
    Animation(AnimationData),
}

impl DrawableKind {
    /// The sprite payload for kinds that delegate to one (`Sprite` and
    /// `Animation`). `Text` deliberately excluded: its sprite is an
    /// implementation detail and sprite operations on text are rejected.
    pub(crate) fn sprite(&self) -> Option<&SpriteData> {
        match self {
            Self::Sprite(s) => Some(s),
            Self::Animation(a) => Some(&a.state.sprite),
            _ => None,
        }
    }

    /// Mutable variant of [`sprite`](Self::sprite).
    pub(crate) fn sprite_mut(&mut self) -> Option<&mut SpriteData> {
        match self {
            Self::Sprite(s) => Some(s),
            Self::Animation(a) => Some(&mut a.state.sprite),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::backend::TextureId;

    use super::*;

    fn sprite() -> SpriteData {
        SpriteData::new(
            Texture {
                id: TextureId(1),
                size: Size::new(64.0, 64.0),
            },
            ShaderId(0),
            TextureFilter::Point,
        )
    }

    fn four_frame_animation(speed: f64) -> AnimationData {
        let mut anim = AnimationData::new(sprite());
        let idx = anim.state.add_action(Action::from_grid(speed, 4, 1, 0, 3));
        anim.state.set_action(idx);
        anim
    }

    #[test]
    fn grid_action_covers_requested_cells() {
        let action = Action::from_grid(10.0, 4, 2, 2, 5);
        assert_eq!(action.len(), 4); // cells 2, 3, 4, 5
        let first = action.frame_uv(0);
        let eps = 1e-12;
        assert!((first.x0 - 0.5).abs() < eps);
        assert!((first.y0 - 0.0).abs() < eps);
    }

    #[test]
    fn pixel_rect_action_normalizes() {
        let action = Action::from_pixel_rects(
            1.0,
            Size::new(100.0, 200.0),
            &[Rect::new(10.0, 20.0, 30.0, 60.0)],
        );
        let uv = action.frame_uv(0);
        assert_eq!(uv, Rect::new(0.1, 0.1, 0.3, 0.3));
    }

    #[test]
    fn effective_uv_flips_without_mutating_stored() {
        let mut s = sprite();
        s.set_uv(Rect::new(0.0, 0.0, 0.5, 0.5));
        let stored = s.uv();
        s.flip_h = true;
        let flipped = s.effective_uv();
        assert_eq!(flipped.x0, stored.x1);
        assert_eq!(flipped.x1, stored.x0);
        assert_eq!(s.uv(), stored, "stored UV must not change");
    }

    #[test]
    fn indicator_crossing_one_advances_a_single_frame() {
        let mut anim = four_frame_animation(10.0);
        anim.play(0.05); // indicator 0.5
        assert_eq!(anim.state.frame(), 0);
        anim.play(0.06); // crosses 1.0
        assert_eq!(anim.state.frame(), 1);
        assert_eq!(anim.state.indicator, 0.0);
    }

    #[test]
    fn wraparound_forward_fires_one_loop_notification() {
        let mut anim = four_frame_animation(10.0);
        anim.state.set_frame(3);

        let loops = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let loops2 = loops.clone();
        anim.loop_handlers
            .push(Box::new(move |_, _| loops2.set(loops2.get() + 1)));

        anim.play(0.1); // crosses 1.0: frame 3 -> wrap to 0
        assert_eq!(anim.state.frame(), 0);
        assert_eq!(loops.get(), 1);
    }

    #[test]
    fn wraparound_backward_fires_one_loop_notification() {
        let mut anim = four_frame_animation(-10.0);
        assert_eq!(anim.state.frame(), 0);

        let loops = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let loops2 = loops.clone();
        anim.loop_handlers
            .push(Box::new(move |_, frame| {
                assert_eq!(frame, 3, "backward wrap lands on the last frame");
                loops2.set(loops2.get() + 1);
            }));

        anim.play(0.1); // indicator -1.0: wraps below zero
        assert_eq!(anim.state.frame(), 3);
        assert_eq!(loops.get(), 1);
        assert_eq!(anim.state.indicator, 1.0);
    }

    #[test]
    fn changed_handlers_run_before_loop_handlers() {
        let mut anim = four_frame_animation(10.0);
        anim.state.set_frame(3);

        let order = alloc::rc::Rc::new(core::cell::RefCell::new(vec![]));
        let o1 = order.clone();
        let o2 = order.clone();
        anim.frame_handlers
            .push(Box::new(move |_, _| o1.borrow_mut().push("changed")));
        anim.loop_handlers
            .push(Box::new(move |_, _| o2.borrow_mut().push("looped")));

        anim.play(0.1);
        assert_eq!(*order.borrow(), vec!["changed", "looped"]);
    }

    #[test]
    fn action_switch_in_handler_applies_next_call() {
        let mut anim = four_frame_animation(10.0);
        let second = anim.state.add_action(Action::from_grid(10.0, 2, 1, 0, 1));
        anim.state.set_frame(3);
        anim.frame_handlers.push(Box::new(move |state, _| {
            state.set_action(second);
        }));

        // The wrap check still uses the action that was current when the
        // step began (length 4), so frame 4 wraps to 0.
        anim.play(0.1);
        assert_eq!(anim.state.frame(), 0);
        assert_eq!(anim.state.action(), Some(second));
    }

    #[test]
    fn play_writes_current_frame_uv() {
        let mut anim = four_frame_animation(0.0);
        anim.state.set_frame(2);
        anim.play(1.0); // speed 0: no advance, but UV is written
        let expected = {
            let mut s = sprite();
            s.set_uv(Rect::new(0.5, 0.0, 0.75, 1.0));
            s.uv()
        };
        assert_eq!(anim.state.sprite.uv(), expected);
    }

    #[test]
    fn set_frame_wraps_into_range() {
        let mut anim = four_frame_animation(1.0);
        anim.state.set_frame(7);
        assert_eq!(anim.state.frame(), 3);
    }

    #[test]
    fn no_action_means_no_motion() {
        let mut anim = AnimationData::new(sprite());
        anim.play(1.0);
        assert_eq!(anim.state.frame(), 0);
        assert_eq!(anim.state.speed(), None);
    }
}
