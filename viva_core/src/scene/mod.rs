// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene data model: drawables, surfaces, and the draw builder.
//!
//! A *drawable* is one of four kinds — wireframe polygon, textured sprite,
//! bitmap text, or sprite animation — sharing a common record: transform,
//! RGBA color, visibility, optional extra shader constants, and surface
//! membership. `Text` and `Animation` are compositions over a sprite, not
//! subclasses.
//!
//! Drawables live in a [`SceneStore`] arena addressed by generational
//! [`DrawableId`] handles; surfaces likewise by [`SurfaceId`]. Stale
//! handles panic (use-after-destroy is a programmer error); structural
//! failures reachable through normal use — double-parenting, sprite
//! operations on text — return [`SceneError`].
//!
//! Each frame, [`SceneStore::build_frame`] produces a
//! [`RenderPlan`](draw::RenderPlan): per-surface content passes followed by
//! back-to-front composite steps (see [`draw`]).

pub mod draw;
mod drawable;
mod id;
mod store;
mod surface;

pub use drawable::{
    Action, AnimationData, AnimationHandler, AnimationState, DrawableKind, PolygonData,
    SpriteData, TextData, Texture, TextureFilter,
};
pub use id::{DrawableId, FontId, INVALID, SurfaceId};
pub use store::{SceneConfig, SceneError, SceneStore};

#[cfg(test)]
pub(crate) mod testutil;
#[cfg(test)]
mod tests;
