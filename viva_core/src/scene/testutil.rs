// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate stub backend for scene tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

use crate::backend::{
    BackendError, BufferId, Retired, ResourceFactory, ShaderId, TargetId, TextureId,
};
use crate::camera::{Camera, CameraConfig};
use crate::color::Color;

use super::{SceneConfig, SceneStore};

/// Counts resource creations and records destructions; never fails.
#[derive(Debug, Default)]
pub(crate) struct StubFactory {
    next: u64,
    pub(crate) destroyed: Vec<Retired>,
}

impl StubFactory {
    fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl ResourceFactory for StubFactory {
    fn create_texture(
        &mut self,
        _pixels: &[Color],
        _width: u32,
        _height: u32,
    ) -> Result<TextureId, BackendError> {
        Ok(TextureId(self.next_id()))
    }

    fn create_target(&mut self, _width: u32, _height: u32) -> Result<TargetId, BackendError> {
        Ok(TargetId(self.next_id()))
    }

    fn create_lines(&mut self, points: &[Point]) -> Result<BufferId, BackendError> {
        if points.is_empty() {
            return Err(BackendError {
                message: String::from("empty vertex buffer"),
            });
        }
        Ok(BufferId(self.next_id()))
    }

    fn compile_shader(&mut self, _source: &str) -> Result<ShaderId, BackendError> {
        Ok(ShaderId(self.next_id()))
    }

    fn default_shader(&self) -> ShaderId {
        ShaderId(1_000_001)
    }

    fn default_post_shader(&self) -> ShaderId {
        ShaderId(1_000_002)
    }

    fn destroy(&mut self, retired: Retired) {
        self.destroyed.push(retired);
    }
}

/// A camera over an 800×600 viewport with the default 32 px unit.
pub(crate) fn test_camera() -> Camera {
    Camera::new(CameraConfig::new(kurbo::Size::new(800.0, 600.0)))
}

/// A store plus the factory that built it.
pub(crate) fn test_store() -> (SceneStore, StubFactory, Camera) {
    let camera = test_camera();
    let mut factory = StubFactory::default();
    let store = SceneStore::new(
        &mut factory,
        &camera,
        SceneConfig {
            client_size: kurbo::Size::new(800.0, 600.0),
        },
    )
    .expect("stub factory never fails");
    (store, factory, camera)
}
