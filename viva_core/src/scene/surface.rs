// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface membership and the surface stack.
//!
//! A surface holds its drawables in a dense vector. Removal is O(1): the
//! removed entry is swapped with the last one and the moved drawable's
//! stored index is rewritten. The surface *stack* orders compositing,
//! front (topmost) first; composite emission walks it back-to-front.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::backend::{BackendError, ResourceFactory, Retired, ShaderId};

use super::id::{DrawableId, INVALID, SurfaceId};
use super::store::{SceneStore, SurfaceData};

impl SceneStore {
    /// Creates a new surface with its own offscreen target, placed at the
    /// back of the stack.
    ///
    /// # Errors
    ///
    /// Propagates the backend's target-creation failure.
    pub fn create_surface(
        &mut self,
        factory: &mut dyn ResourceFactory,
    ) -> Result<SurfaceId, BackendError> {
        let size = self.client_size();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "viewport sizes are small positive integers"
        )]
        let target = factory.create_target(size.width as u32, size.height as u32)?;
        let data = SurfaceData {
            drawables: Vec::new(),
            shader: self.post_shader,
            target,
            extra: None,
        };
        Ok(self.create_surface_slot(data))
    }

    /// Destroys a surface and every drawable it contains, retiring its
    /// offscreen target. Destroying the default surface is silently
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_surface(&mut self, id: SurfaceId) {
        let idx = self.validate_surface(id);
        if id == self.default_surface() {
            return;
        }
        self.clear_surface(id);
        let target = self.surfaces[idx as usize]
            .as_ref()
            .expect("validated live")
            .target;
        self.retire(Retired::Target(target));
        self.free_surface_slot(idx);
    }

    /// Moves a drawable into `surface`, detaching it from its current
    /// surface first (a drawable belongs to at most one surface).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_to_surface(&mut self, id: DrawableId, surface: SurfaceId) {
        let idx = self.validate(id);
        let s = self.validate_surface(surface);
        self.detach_from_surface_raw(idx);

        let list = &mut self.surfaces[s as usize]
            .as_mut()
            .expect("validated live")
            .drawables;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "surface contents are far below u32::MAX entries"
        )]
        let slot = list.len() as u32;
        list.push(idx);
        self.surface_of[idx as usize] = s;
        self.surface_slot[idx as usize] = slot;
    }

    /// Detaches a drawable from its surface without destroying it. No-op
    /// if it is not in one.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_from_surface(&mut self, id: DrawableId) {
        let idx = self.validate(id);
        self.detach_from_surface_raw(idx);
    }

    pub(crate) fn detach_from_surface_raw(&mut self, idx: u32) {
        let s = self.surface_of[idx as usize];
        if s == INVALID {
            return;
        }
        let slot = self.surface_slot[idx as usize];
        let list = &mut self.surfaces[s as usize]
            .as_mut()
            .expect("drawable points at a dead surface")
            .drawables;
        debug_assert_eq!(list[slot as usize], idx, "corrupt surface index");
        list.swap_remove(slot as usize);
        if let Some(&moved) = list.get(slot as usize) {
            self.surface_slot[moved as usize] = slot;
        }
        self.surface_of[idx as usize] = INVALID;
        self.surface_slot[idx as usize] = INVALID;
    }

    /// Detaches every drawable from `surface` without destroying any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_all(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        let list = core::mem::take(
            &mut self.surfaces[s as usize]
                .as_mut()
                .expect("validated live")
                .drawables,
        );
        for idx in list {
            self.surface_of[idx as usize] = INVALID;
            self.surface_slot[idx as usize] = INVALID;
        }
    }

    /// Destroys every drawable in `surface`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clear_surface(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        let list = core::mem::take(
            &mut self.surfaces[s as usize]
                .as_mut()
                .expect("validated live")
                .drawables,
        );
        for idx in list {
            self.surface_of[idx as usize] = INVALID;
            self.surface_slot[idx as usize] = INVALID;
            let id = self.id_at(idx);
            self.destroy_drawable(id);
        }
    }

    /// Destroys all non-default surfaces (with their drawables) and
    /// empties the default surface.
    ///
    /// This is the bulk-reset operation: any drawable handle the caller
    /// still holds afterwards is stale, including handles into the default
    /// surface — the classic pitfall is a persistent FPS counter created
    /// before the reset.
    pub fn clear(&mut self) {
        let default = self.default_surface();
        let order: Vec<u32> = self.surface_order.clone();
        for idx in order {
            let id = self.surface_id_at(idx);
            if id == default {
                self.clear_surface(id);
            } else {
                self.destroy_surface(id);
            }
        }
    }

    /// The number of drawables in `surface`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface_len(&self, surface: SurfaceId) -> usize {
        let s = self.validate_surface(surface);
        self.surfaces[s as usize]
            .as_ref()
            .expect("validated live")
            .drawables
            .len()
    }

    /// The drawables of `surface` in draw order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface_drawables(&self, surface: SurfaceId) -> Vec<DrawableId> {
        let s = self.validate_surface(surface);
        self.surfaces[s as usize]
            .as_ref()
            .expect("validated live")
            .drawables
            .iter()
            .map(|&idx| self.id_at(idx))
            .collect()
    }

    /// The surface a drawable currently belongs to, if any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface_of(&self, id: DrawableId) -> Option<SurfaceId> {
        let idx = self.validate(id);
        let s = self.surface_of[idx as usize];
        (s != INVALID).then(|| self.surface_id_at(s))
    }

    /// The drawable's index within its surface, if it is in one.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface_index(&self, id: DrawableId) -> Option<u32> {
        let idx = self.validate(id);
        let slot = self.surface_slot[idx as usize];
        (slot != INVALID).then_some(slot)
    }

    /// Sets the surface's post-process (composite) shader.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_surface_shader(&mut self, surface: SurfaceId, shader: ShaderId) {
        let s = self.validate_surface(surface);
        self.surfaces[s as usize]
            .as_mut()
            .expect("validated live")
            .shader = shader;
    }

    /// The surface's post-process shader.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface_shader(&self, surface: SurfaceId) -> ShaderId {
        let s = self.validate_surface(surface);
        self.surfaces[s as usize]
            .as_ref()
            .expect("validated live")
            .shader
    }

    /// Sets the extra shader constants uploaded before the surface's
    /// composite draw.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_surface_extra(&mut self, surface: SurfaceId, extra: Option<Box<[f32]>>) {
        let s = self.validate_surface(surface);
        self.surfaces[s as usize]
            .as_mut()
            .expect("validated live")
            .extra = extra;
    }

    /// The surface stack, front (topmost) first.
    #[must_use]
    pub fn surface_stack(&self) -> Vec<SurfaceId> {
        self.surface_order
            .iter()
            .map(|&idx| self.surface_id_at(idx))
            .collect()
    }

    /// Moves the surface one step toward the front. No-op if already
    /// frontmost.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_surface_up(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        let Some(pos) = self.surface_order.iter().position(|&x| x == s) else {
            return;
        };
        if pos == 0 {
            return;
        }
        self.surface_order.swap(pos, pos - 1);
    }

    /// Moves the surface one step toward the back. No-op if already
    /// backmost.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_surface_down(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        let Some(pos) = self.surface_order.iter().position(|&x| x == s) else {
            return;
        };
        if pos + 1 == self.surface_order.len() {
            return;
        }
        self.surface_order.swap(pos, pos + 1);
    }

    /// Moves the surface to the front of the stack. No-op if already
    /// there.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_surface_top(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        if self.surface_order.first() == Some(&s) {
            return;
        }
        self.surface_order.retain(|&x| x != s);
        self.surface_order.insert(0, s);
    }

    /// Moves the surface to the back of the stack. No-op if already there.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_surface_bottom(&mut self, surface: SurfaceId) {
        let s = self.validate_surface(surface);
        if self.surface_order.last() == Some(&s) {
            return;
        }
        self.surface_order.retain(|&x| x != s);
        self.surface_order.push(s);
    }
}
