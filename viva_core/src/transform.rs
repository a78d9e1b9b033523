// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object spatial state with physics-style integration.
//!
//! A [`Transform`] carries four channel groups — position, rotation, scale,
//! and size — each with a velocity and an acceleration of the same shape.
//! [`integrate`](Transform::integrate) advances all of them with
//! semi-implicit Euler once per frame, immediately before the owning
//! drawable is emitted into the render plan.
//!
//! Fields are plain and public: there is no setter validation, and callers
//! may write values like negative scale, which renders as a mirror.
//!
//! World-matrix derivation uses the column-vector convention of
//! [`Mat4`]: translations negate Y so that +Y points up in world space
//! while render space keeps +Y down.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Size, Vec2};

use crate::camera::Camera;
use crate::matrix::Mat4;

/// Which coordinate space a transform's position and scale are expressed in.
///
/// `Screen`-mode transforms place themselves in pixel coordinates relative
/// to the top-left of the viewport and ignore both camera panning and their
/// parent chain. (A screen-mode child of a world-mode parent is allowed;
/// the child simply does not inherit the parent's frame. Its own children
/// still read its absolutes.)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Space {
    /// Camera/world units, subject to panning and the parent chain.
    #[default]
    World,
    /// Pixel-relative screen space, bypassing world panning.
    Screen,
}

/// Spatial state of one drawable: four integrated channel groups plus the
/// absolutes derived during frame evaluation.
#[derive(Clone, Debug)]
pub struct Transform {
    /// Coordinate space for position and scale.
    pub space: Space,
    /// Offset applied before scaling and rotation (pivot point).
    pub origin: Vec2,
    /// Position in world units (or pixels in [`Space::Screen`]).
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    /// Non-uniform scale; `(1, 1)` is unscaled, negative values mirror.
    pub scale: Vec2,
    /// Uniform size scalar. Integrated like the other channels but not part
    /// of the world matrix.
    pub size: f64,

    /// Rate of change of [`position`](Self::position) per second.
    pub velocity: Vec2,
    /// Rate of change of [`rotation`](Self::rotation) per second.
    pub angular_velocity: f64,
    /// Rate of change of [`scale`](Self::scale) per second.
    pub scale_velocity: Vec2,
    /// Rate of change of [`size`](Self::size) per second.
    pub size_velocity: f64,

    /// Rate of change of [`velocity`](Self::velocity) per second.
    pub acceleration: Vec2,
    /// Rate of change of [`angular_velocity`](Self::angular_velocity) per second.
    pub angular_acceleration: f64,
    /// Rate of change of [`scale_velocity`](Self::scale_velocity) per second.
    pub scale_acceleration: Vec2,
    /// Rate of change of [`size_velocity`](Self::size_velocity) per second.
    pub size_acceleration: f64,

    absolute_position: Vec2,
    absolute_rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Creates an identity transform (scale and size 1, everything else 0).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            space: Space::World,
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: 1.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            scale_velocity: Vec2::ZERO,
            size_velocity: 0.0,
            acceleration: Vec2::ZERO,
            angular_acceleration: 0.0,
            scale_acceleration: Vec2::ZERO,
            size_acceleration: 0.0,
            absolute_position: Vec2::ZERO,
            absolute_rotation: 0.0,
        }
    }

    /// Advances all channel groups by `dt` seconds with semi-implicit Euler:
    /// each velocity absorbs its acceleration before the value absorbs the
    /// velocity.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.angular_velocity += self.angular_acceleration * dt;
        self.rotation += self.angular_velocity * dt;
        self.scale_velocity += self.scale_acceleration * dt;
        self.scale += self.scale_velocity * dt;
        self.size_velocity += self.size_acceleration * dt;
        self.size += self.size_velocity * dt;
    }

    /// Sets [`scale`](Self::scale) so the unit quad covers `px` pixels,
    /// using the camera's current pixel↔world ratio.
    ///
    /// One-shot conversion: the scale is not kept in sync if the camera
    /// ratio later changes.
    pub fn set_pixel_scale(&mut self, px: Size, camera: &Camera) {
        let world = camera.pixel_to_world(px);
        self.scale.x = world.width;
        self.scale.y = world.height;
    }

    /// Absolute position derived from the parent chain during the current
    /// frame's evaluation.
    ///
    /// Valid only after this transform was evaluated this frame, and only if
    /// every ancestor was evaluated before it (evaluation runs in draw
    /// order).
    #[inline]
    #[must_use]
    pub const fn absolute_position(&self) -> Vec2 {
        self.absolute_position
    }

    /// Absolute rotation derived from the parent chain during the current
    /// frame's evaluation. Same validity rules as
    /// [`absolute_position`](Self::absolute_position).
    #[inline]
    #[must_use]
    pub const fn absolute_rotation(&self) -> f64 {
        self.absolute_rotation
    }

    /// The local world matrix: origin offset, then scale, then rotation,
    /// then translation, with Y negated into render space.
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.x, -self.position.y, 0.0)
            * Mat4::from_rotation(self.rotation)
            * Mat4::from_scale(self.scale.x, self.scale.y, 1.0)
            * Mat4::from_translation(self.origin.x, -self.origin.y, 0.0)
    }

    /// Evaluates this transform for rendering: updates the absolutes from
    /// `parent` (the parent's absolutes, if any) and returns the final
    /// matrix including the camera's view transform.
    ///
    /// In [`Space::Screen`] the parent is ignored and position/scale are
    /// converted from pixels relative to the frustum center.
    #[must_use]
    pub fn render_matrix(&mut self, camera: &Camera, parent: Option<(Vec2, f64)>) -> Mat4 {
        match self.space {
            Space::World => {
                let local = self.local_matrix();
                let world = if let Some((ppos, prot)) = parent {
                    self.absolute_rotation = self.rotation + prot;
                    self.absolute_position = ppos + rotate(self.position, prot);
                    Mat4::from_translation(ppos.x, -ppos.y, 0.0) * Mat4::from_rotation(prot) * local
                } else {
                    self.absolute_position = self.position;
                    self.absolute_rotation = self.rotation;
                    local
                };
                camera.view_panned() * world
            }
            Space::Screen => {
                self.absolute_position = self.position;
                self.absolute_rotation = self.rotation;
                camera.view_scale() * self.screen_matrix(camera)
            }
        }
    }

    /// The screen-space world matrix: pixel position/scale converted to
    /// world units, placed relative to the frustum center, Y down.
    fn screen_matrix(&self, camera: &Camera) -> Mat4 {
        let frustum = camera.frustum_size();
        let scale = camera.pixel_to_world(Size::new(self.scale.x, self.scale.y));
        let pos = camera.pixel_to_world(Size::new(self.position.x, self.position.y));
        let tx = pos.width - frustum.width / 2.0;
        let ty = -pos.height + frustum.height / 2.0;
        Mat4::from_translation(tx, -ty, 0.0)
            * Mat4::from_rotation(self.rotation)
            * Mat4::from_scale(scale.width, scale.height, 1.0)
            * Mat4::from_translation(self.origin.x, -self.origin.y, 0.0)
    }
}

/// Rotates `v` counter-clockwise by `radians`.
fn rotate(v: Vec2, radians: f64) -> Vec2 {
    let (s, c) = (radians.sin(), radians.cos());
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

#[cfg(test)]
mod tests {
    use crate::camera::{Camera, CameraConfig};

    use super::*;

    fn camera() -> Camera {
        Camera::new(CameraConfig::new(Size::new(800.0, 600.0)))
    }

    #[test]
    fn integration_is_deterministic() {
        let mut t = Transform::new();
        t.acceleration = Vec2::new(10.0, 0.0);

        t.integrate(1.0);
        assert_eq!(t.velocity, Vec2::new(10.0, 0.0));
        assert_eq!(t.position, Vec2::new(10.0, 0.0));

        t.integrate(1.0);
        assert_eq!(t.velocity, Vec2::new(20.0, 0.0));
        assert_eq!(t.position, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn integration_covers_all_channel_groups() {
        let mut t = Transform::new();
        t.angular_acceleration = 2.0;
        t.scale_acceleration = Vec2::new(0.5, 0.0);
        t.size_acceleration = 1.0;

        t.integrate(1.0);
        assert_eq!(t.angular_velocity, 2.0);
        assert_eq!(t.rotation, 2.0);
        assert_eq!(t.scale, Vec2::new(1.5, 1.0));
        assert_eq!(t.size_velocity, 1.0);
        assert_eq!(t.size, 2.0);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut t = Transform::new();
        t.velocity = Vec2::new(5.0, 5.0);
        t.acceleration = Vec2::new(1.0, 1.0);
        t.integrate(0.0);
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.velocity, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn local_matrix_positions_y_up() {
        let mut t = Transform::new();
        t.position = Vec2::new(3.0, 2.0);
        let (x, y) = t.local_matrix().apply(0.0, 0.0);
        assert_eq!((x, y), (3.0, -2.0));
    }

    #[test]
    fn negative_scale_mirrors() {
        let mut t = Transform::new();
        t.scale = Vec2::new(-1.0, 1.0);
        let (x, _) = t.local_matrix().apply(1.0, 0.0);
        assert_eq!(x, -1.0);
    }

    #[test]
    fn root_absolutes_mirror_locals() {
        let cam = camera();
        let mut t = Transform::new();
        t.position = Vec2::new(4.0, -1.0);
        t.rotation = 0.7;
        let _ = t.render_matrix(&cam, None);
        assert_eq!(t.absolute_position(), Vec2::new(4.0, -1.0));
        assert_eq!(t.absolute_rotation(), 0.7);
    }

    #[test]
    fn child_absolutes_compose_rotation_and_offset() {
        let cam = camera();
        let mut child = Transform::new();
        child.position = Vec2::new(1.0, 0.0);
        child.rotation = 0.25;

        let parent_pos = Vec2::new(10.0, 0.0);
        let parent_rot = core::f64::consts::FRAC_PI_2;
        let _ = child.render_matrix(&cam, Some((parent_pos, parent_rot)));

        let eps = 1e-9;
        let abs = child.absolute_position();
        assert!((abs.x - 10.0).abs() < eps, "x: {}", abs.x);
        assert!((abs.y - 1.0).abs() < eps, "y: {}", abs.y);
        assert!((child.absolute_rotation() - (0.25 + parent_rot)).abs() < eps);
    }

    #[test]
    fn screen_mode_ignores_parent() {
        let cam = camera();
        let mut t = Transform::new();
        t.space = Space::Screen;
        t.position = Vec2::new(400.0, 300.0);

        let with_parent = t.render_matrix(&cam, Some((Vec2::new(100.0, 100.0), 1.0)));
        let without = t.render_matrix(&cam, None);
        assert_eq!(with_parent, without);
    }

    #[test]
    fn screen_center_maps_to_clip_origin() {
        // Client 800x600, unit 32: a screen-mode point at the viewport
        // center lands at the clip-space origin.
        let cam = camera();
        let mut t = Transform::new();
        t.space = Space::Screen;
        t.position = Vec2::new(400.0, 300.0);
        let m = t.render_matrix(&cam, None);
        let (x, y) = m.apply(0.0, 0.0);
        let eps = 1e-9;
        assert!(x.abs() < eps && y.abs() < eps, "got ({x}, {y})");
    }

    #[test]
    fn pixel_scale_uses_camera_ratio() {
        let cam = camera();
        let mut t = Transform::new();
        t.set_pixel_scale(Size::new(64.0, 16.0), &cam);
        assert_eq!(t.scale, Vec2::new(2.0, 0.5));
    }
}
