// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World↔pixel conversion and the per-frame view matrices.
//!
//! The camera maps world units to clip space through a fixed pixels-per-unit
//! ratio and pans via a [`Transform`] (`look_at`) that integrates like any
//! other transform, so camera movement gets velocity and acceleration for
//! free.

use kurbo::{Point, Size, Vec2};

use crate::matrix::Mat4;
use crate::transform::Transform;

/// Construction parameters for a [`Camera`].
#[derive(Clone, Copy, Debug)]
pub struct CameraConfig {
    /// Viewport (client area) size in pixels.
    pub client_size: Size,
    /// Pixels per world unit. Components of zero fall back to
    /// [`CameraConfig::DEFAULT_UNIT`].
    pub unit: Size,
}

impl CameraConfig {
    /// Default pixels-per-unit ratio (32 px per world unit).
    pub const DEFAULT_UNIT: Size = Size::new(32.0, 32.0);

    /// Creates a config with the default unit size.
    #[must_use]
    pub const fn new(client_size: Size) -> Self {
        Self {
            client_size,
            unit: Self::DEFAULT_UNIT,
        }
    }
}

/// World↔screen conversion and view transform.
#[derive(Clone, Debug)]
pub struct Camera {
    look_at: Transform,
    view_scale: Mat4,
    view_panned: Mat4,
    client_size: Size,
    unit_to_pixel: Size,
    pixel_to_unit: Size,
    frustum_size: Size,
}

impl Camera {
    /// Creates a camera for the given viewport.
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        let unit = Size::new(
            if config.unit.width == 0.0 {
                CameraConfig::DEFAULT_UNIT.width
            } else {
                config.unit.width
            },
            if config.unit.height == 0.0 {
                CameraConfig::DEFAULT_UNIT.height
            } else {
                config.unit.height
            },
        );
        let client = config.client_size;
        let mut camera = Self {
            look_at: Transform::new(),
            view_scale: Mat4::IDENTITY,
            view_panned: Mat4::IDENTITY,
            client_size: client,
            unit_to_pixel: unit,
            pixel_to_unit: Size::new(1.0 / unit.width, 1.0 / unit.height),
            frustum_size: Size::new(client.width / unit.width, client.height / unit.height),
        };
        camera.rebuild();
        camera
    }

    /// Integrates the pan transform and rebuilds the view matrices.
    ///
    /// Runs once per frame, before any transform is evaluated.
    pub fn tick(&mut self, dt: f64) {
        self.look_at.integrate(dt);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let sx = 2.0 / self.client_size.width * self.unit_to_pixel.width;
        let sy = 2.0 / self.client_size.height * self.unit_to_pixel.height;
        self.view_scale = Mat4::from_scale(sx, sy, 1.0);
        let pan = self.look_at.position;
        self.view_panned = self.view_scale * Mat4::from_translation(-pan.x, pan.y, 0.0);
    }

    /// The pan transform. Mutate position/velocity/acceleration to move the
    /// camera.
    #[inline]
    pub fn look_at(&mut self) -> &mut Transform {
        &mut self.look_at
    }

    /// View matrix with panning applied — used by world-space transforms.
    #[inline]
    #[must_use]
    pub const fn view_panned(&self) -> Mat4 {
        self.view_panned
    }

    /// View matrix without panning — used by screen-space transforms.
    #[inline]
    #[must_use]
    pub const fn view_scale(&self) -> Mat4 {
        self.view_scale
    }

    /// Viewport size in world units.
    #[inline]
    #[must_use]
    pub const fn frustum_size(&self) -> Size {
        self.frustum_size
    }

    /// Viewport size in pixels.
    #[inline]
    #[must_use]
    pub const fn client_size(&self) -> Size {
        self.client_size
    }

    /// Converts a pixel extent to world units.
    #[inline]
    #[must_use]
    pub fn pixel_to_world(&self, px: Size) -> Size {
        Size::new(
            px.width * self.pixel_to_unit.width,
            px.height * self.pixel_to_unit.height,
        )
    }

    /// Converts a world-unit extent to pixels.
    #[inline]
    #[must_use]
    pub fn world_to_pixel(&self, world: Size) -> Size {
        Size::new(
            world.width * self.unit_to_pixel.width,
            world.height * self.unit_to_pixel.height,
        )
    }

    /// Converts a world-space point to screen pixels (origin top-left,
    /// +Y down), honoring the current pan.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let pan = self.look_at.position;
        Point::new(
            (world.x - pan.x) * self.unit_to_pixel.width + self.client_size.width / 2.0,
            self.client_size.height / 2.0 - (world.y - pan.y) * self.unit_to_pixel.height,
        )
    }

    /// Converts a screen-pixel point (origin top-left, +Y down) to world
    /// space, honoring the current pan.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let pan = self.look_at.position;
        Point::new(
            (screen.x - self.client_size.width / 2.0) * self.pixel_to_unit.width + pan.x,
            (self.client_size.height / 2.0 - screen.y) * self.pixel_to_unit.height + pan.y,
        )
    }

    /// Current pan position in world units.
    #[inline]
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.look_at.position
    }
}
