// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitmap fonts: metrics parsing and the embedded default font.
//!
//! A [`Font`] is a texture atlas plus per-codepoint metrics, built once
//! from a line-oriented text format (a subset of BMFont's text output) and
//! immutable afterwards. Recognized lines:
//!
//! ```text
//! common lineHeight=<number> ...
//! char id=<int> x=<int> y=<int> width=<int> height=<int> xoffset=<int> yoffset=<int> xadvance=<int> ...
//! ```
//!
//! Lines with any other prefix (`info`, `page`, `kernings`, …) are ignored.
//! Metrics are stored both in pixels and pre-converted to world units using
//! the camera ratio at construction time.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size, Vec2};

use crate::backend::{BackendError, ResourceFactory, TextureId};
use crate::camera::Camera;
use crate::color::Color;

/// Metrics for one glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Codepoint this glyph renders.
    pub id: u32,
    /// Texture sub-rectangle, bottom-origin (`y0` is the glyph's bottom
    /// edge in texture space).
    pub uv: Rect,
    /// Quad size in world units.
    pub size: Size,
    /// Quad size in pixels.
    pub size_px: Size,
    /// Pen offset in world units.
    pub offset: Vec2,
    /// Pen offset in pixels (Y negated into screen-space advance).
    pub offset_px: Vec2,
    /// Horizontal pen advance in world units.
    pub advance: f64,
    /// Horizontal pen advance in pixels.
    pub advance_px: f64,
}

/// Failure to parse font metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontError {
    /// A `common` or `char` line was present but could not be parsed.
    /// Carries the 1-based line number.
    MalformedLine(usize),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine(line) => write!(f, "malformed font metrics at line {line}"),
        }
    }
}

impl core::error::Error for FontError {}

/// A bitmap font: atlas texture plus per-codepoint metrics.
#[derive(Clone, Debug)]
pub struct Font {
    texture: TextureId,
    texture_size: Size,
    line_height: f64,
    line_height_px: f64,
    glyphs: Vec<Option<Glyph>>,
}

impl Font {
    /// Parses metrics text against an already-created atlas texture.
    ///
    /// `camera` supplies the pixel→world ratio; the conversion happens once
    /// here and is not kept in sync with later camera changes.
    ///
    /// # Errors
    ///
    /// [`FontError::MalformedLine`] if a recognized line fails to parse.
    pub fn parse(
        metrics: &str,
        texture: TextureId,
        texture_size: Size,
        camera: &Camera,
    ) -> Result<Self, FontError> {
        let mut line_height = 0.0;
        let mut line_height_px = 0.0;
        let mut glyphs: Vec<Glyph> = Vec::new();
        let mut max_id = 0_u32;

        for (index, line) in metrics.lines().enumerate() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("common ") {
                let px =
                    field_f64(rest, "lineHeight").ok_or(FontError::MalformedLine(index + 1))?;
                line_height_px = px;
                line_height = camera.pixel_to_world(Size::new(0.0, px)).height;
            } else if let Some(rest) = line.strip_prefix("char ") {
                let glyph = parse_char_line(rest, texture_size, camera)
                    .ok_or(FontError::MalformedLine(index + 1))?;
                max_id = max_id.max(glyph.id);
                glyphs.push(glyph);
            }
        }

        let mut table = vec![None; max_id as usize + 1];
        for glyph in glyphs {
            table[glyph.id as usize] = Some(glyph);
        }

        Ok(Self {
            texture,
            texture_size,
            line_height,
            line_height_px,
            glyphs: table,
        })
    }

    /// Builds the embedded default font: a 190×95 one-bit atlas covering
    /// ASCII 32–126 in a 19×5 grid of 10×19-pixel cells, line height 20.
    ///
    /// # Errors
    ///
    /// Propagates the backend's texture-creation failure.
    pub fn builtin(
        factory: &mut dyn ResourceFactory,
        camera: &Camera,
    ) -> Result<Self, BackendError> {
        let pixels = expand_builtin_atlas();
        let texture = factory.create_texture(&pixels, BUILTIN_ATLAS_WIDTH, BUILTIN_ATLAS_HEIGHT)?;

        let mut metrics = String::from("common lineHeight=20\n");
        let mut id = 32;
        for row in 0..5 {
            for col in 0..19 {
                metrics += &format!(
                    "char id={id} x={} y={} width=10 height=19 xoffset=0 yoffset=0 xadvance=10\n",
                    col * 10,
                    row * 19,
                );
                id += 1;
            }
        }

        let size = Size::new(
            f64::from(BUILTIN_ATLAS_WIDTH),
            f64::from(BUILTIN_ATLAS_HEIGHT),
        );
        Ok(Self::parse(&metrics, texture, size, camera).expect("builtin metrics are well-formed"))
    }

    /// The atlas texture.
    #[inline]
    #[must_use]
    pub const fn texture(&self) -> TextureId {
        self.texture
    }

    /// The atlas size in pixels.
    #[inline]
    #[must_use]
    pub const fn texture_size(&self) -> Size {
        self.texture_size
    }

    /// Line height in world units.
    #[inline]
    #[must_use]
    pub const fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Line height in pixels.
    #[inline]
    #[must_use]
    pub const fn line_height_px(&self) -> f64 {
        self.line_height_px
    }

    /// Looks up the glyph for a codepoint. `None` for codepoints the font
    /// does not cover — callers skip those rather than failing the frame.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(c as usize).and_then(Option::as_ref)
    }
}

/// Extracts `key=<number>` from a whitespace-separated field list.
fn field_f64(fields: &str, key: &str) -> Option<f64> {
    for token in fields.split_whitespace() {
        let (k, v) = token.split_once('=')?;
        if k == key {
            return v.parse().ok();
        }
    }
    None
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "id is validated as a non-negative integer before the cast"
)]
fn parse_char_line(rest: &str, texture_size: Size, camera: &Camera) -> Option<Glyph> {
    let id = field_f64(rest, "id")?;
    let x = field_f64(rest, "x")?;
    let y = field_f64(rest, "y")?;
    let width = field_f64(rest, "width")?;
    let height = field_f64(rest, "height")?;
    let xoffset = field_f64(rest, "xoffset")?;
    let yoffset = field_f64(rest, "yoffset")?;
    let xadvance = field_f64(rest, "xadvance")?;

    if id < 0.0 || id != id.trunc() {
        return None;
    }

    let offset = camera.pixel_to_world(Size::new(xoffset, yoffset));
    let size = camera.pixel_to_world(Size::new(width, height));
    Some(Glyph {
        id: id as u32,
        // Atlas rows count from the top; UVs are bottom-origin, so both
        // vertical edges flip.
        uv: Rect::new(
            x / texture_size.width,
            1.0 - (y + height) / texture_size.height,
            (x + width) / texture_size.width,
            1.0 - y / texture_size.height,
        ),
        size: Size::new(size.width, size.height),
        size_px: Size::new(width, height),
        offset: Vec2::new(offset.width, offset.height),
        offset_px: Vec2::new(xoffset, -yoffset),
        advance: camera.pixel_to_world(Size::new(xadvance, 0.0)).width,
        advance_px: xadvance,
    })
}

/// Width of the embedded atlas in pixels.
const BUILTIN_ATLAS_WIDTH: u32 = 190;
/// Height of the embedded atlas in pixels.
const BUILTIN_ATLAS_HEIGHT: u32 = 95;

/// Expands the run-length-encoded builtin atlas to RGBA pixels.
///
/// Each number is a run of consecutive pixels, alternating transparent and
/// white, starting transparent.
fn expand_builtin_atlas() -> Vec<Color> {
    let mut pixels = Vec::with_capacity((BUILTIN_ATLAS_WIDTH * BUILTIN_ATLAS_HEIGHT) as usize);
    let mut current = Color::TRANSPARENT;
    for &run in BUILTIN_ATLAS_RLE {
        for _ in 0..run {
            pixels.push(current);
        }
        current = if current.r == 0 {
            Color::WHITE
        } else {
            Color::TRANSPARENT
        };
    }
    pixels
}

/// Run lengths of the builtin 190×95 atlas (transparent first, alternating).
#[rustfmt::skip]
const BUILTIN_ATLAS_RLE: &[u16] = &[
    604, 1, 2, 1, 6, 1, 111, 1, 47, 1, 8, 2, 1, 2, 6, 1, 2, 1, 5, 5, 5, 2,
    18, 3, 11, 1, 4, 1, 11, 1, 51, 1, 6, 4, 7, 2, 6, 5, 17, 1, 8, 2, 1, 2,
    5, 1, 2, 1, 5, 1, 4, 1, 4, 1, 2, 1, 17, 3, 10, 1, 6, 1, 10, 1, 9, 1,
    40, 1, 6, 1, 4, 1, 4, 2, 1, 1, 5, 1, 5, 1, 16, 1, 8, 1, 2, 1, 6, 1,
    2, 1, 5, 1, 9, 1, 2, 1, 8, 3, 7, 1, 11, 1, 6, 1, 7, 7, 6, 1, 40, 1,
    6, 1, 4, 1, 7, 1, 5, 1, 5, 1, 16, 1, 8, 1, 2, 1, 4, 8, 3, 1, 10, 2,
    8, 1, 10, 1, 10, 1, 8, 1, 9, 1, 9, 1, 39, 1, 7, 1, 4, 1, 7, 1, 11, 1,
    16, 1, 18, 1, 2, 1, 6, 4, 8, 3, 5, 1, 10, 1, 10, 1, 8, 1, 8, 1, 1, 1,
    8, 1, 39, 1, 7, 1, 4, 1, 7, 1, 10, 1, 17, 1, 18, 1, 2, 1, 10, 1, 4, 3,
    8, 2, 20, 1, 8, 1, 7, 1, 3, 1, 4, 7, 13, 7, 15, 1, 8, 1, 4, 1, 7, 1,
    8, 2, 18, 1, 16, 8, 8, 1, 7, 2, 5, 1, 1, 1, 2, 1, 17, 1, 8, 1, 19, 1,
    38, 1, 8, 1, 4, 1, 7, 1, 7, 1, 39, 1, 2, 1, 10, 1, 6, 1, 2, 1, 4, 1,
    2, 2, 18, 1, 8, 1, 19, 1, 8, 2, 27, 1, 9, 1, 4, 1, 7, 1, 6, 1, 20, 3,
    17, 1, 2, 1, 5, 1, 4, 1, 6, 1, 2, 1, 4, 1, 3, 1, 18, 1, 8, 1, 19, 1,
    8, 1, 19, 2, 7, 1, 9, 1, 4, 1, 7, 1, 5, 1, 5, 1, 15, 3, 16, 1, 2, 1,
    6, 5, 8, 2, 6, 5, 18, 1, 6, 1, 20, 1, 7, 2, 19, 2, 6, 1, 11, 4, 5, 7,
    2, 7, 34, 1, 2, 1, 8, 1, 41, 1, 6, 1, 28, 1, 28, 1, 82, 1, 42, 1, 4, 1,
    29, 1, 1400, 4, 9, 1, 5, 5, 8, 4, 2, 7, 5, 4, 6, 4, 67, 4, 53, 2, 4, 1,
    7, 2, 5, 1, 11, 1, 6, 1, 5, 1, 4, 1, 4, 1, 4, 1, 4, 1, 29, 2, 12, 2,
    10, 4, 6, 1, 4, 1, 4, 3, 5, 6, 6, 4, 1, 1, 2, 6, 4, 7, 9, 1, 6, 1,
    1, 1, 5, 1, 10, 1, 13, 1, 4, 1, 4, 1, 4, 1, 4, 1, 28, 1, 16, 1, 8, 1,
    4, 1, 4, 1, 5, 1, 5, 2, 6, 1, 4, 1, 4, 1, 4, 2, 3, 1, 4, 1, 4, 1,
    4, 1, 9, 1, 5, 1, 2, 1, 5, 1, 9, 1, 13, 1, 5, 1, 4, 1, 4, 1, 4, 1,
    5, 2, 9, 2, 8, 2, 5, 8, 5, 2, 6, 1, 4, 1, 4, 1, 3, 3, 4, 1, 2, 1,
    5, 1, 4, 1, 3, 1, 6, 1, 3, 1, 5, 1, 3, 1, 4, 1, 6, 3, 6, 1, 2, 1,
    5, 5, 5, 1, 1, 4, 8, 1, 6, 4, 5, 1, 3, 2, 5, 2, 9, 2, 7, 1, 22, 1,
    10, 1, 4, 1, 2, 1, 2, 1, 4, 1, 2, 1, 5, 1, 4, 1, 3, 1, 10, 1, 5, 1,
    3, 1, 2, 1, 10, 1, 5, 1, 3, 1, 10, 1, 4, 2, 4, 1, 6, 1, 6, 1, 4, 1,
    5, 3, 1, 1, 23, 2, 24, 2, 7, 1, 5, 1, 2, 1, 2, 1, 4, 1, 2, 1, 5, 5,
    4, 1, 10, 1, 5, 1, 3, 4, 11, 1, 4, 6, 9, 1, 4, 1, 5, 1, 6, 1, 6, 1,
    4, 1, 9, 1, 25, 1, 7, 8, 7, 1, 8, 1, 6, 1, 2, 1, 2, 1, 3, 6, 4, 1,
    4, 1, 3, 1, 10, 1, 5, 1, 3, 1, 2, 1, 11, 1, 8, 1, 10, 1, 4, 1, 5, 1,
    6, 1, 6, 1, 4, 1, 8, 1, 17, 2, 8, 2, 18, 2, 16, 1, 3, 3, 3, 1, 4, 1,
    4, 1, 4, 1, 3, 1, 10, 1, 5, 1, 3, 1, 4, 1, 3, 1, 5, 1, 8, 1, 4, 1,
    5, 1, 4, 1, 5, 1, 5, 1, 7, 1, 4, 1, 7, 1, 7, 2, 9, 1, 11, 1, 16, 1,
    10, 2, 6, 1, 8, 1, 6, 1, 3, 1, 4, 1, 4, 1, 5, 1, 3, 1, 4, 1, 4, 1,
    4, 1, 4, 5, 7, 4, 4, 5, 6, 5, 6, 1, 8, 4, 5, 3, 8, 2, 8, 2, 12, 2,
    12, 2, 11, 2, 7, 1, 3, 1, 2, 3, 4, 3, 1, 6, 6, 5, 3, 6, 4, 7, 85, 1,
    50, 3, 1764, 7, 5, 4, 1, 1, 2, 3, 2, 3, 2, 7, 5, 6, 2, 3, 1, 4, 2, 5,
    4, 3, 3, 3, 1, 3, 3, 3, 4, 4, 5, 6, 5, 4, 4, 6, 6, 3, 1, 1, 3, 7,
    3, 3, 2, 3, 1, 3, 4, 7, 1, 4, 1, 3, 3, 3, 3, 1, 4, 1, 4, 1, 4, 2,
    3, 1, 4, 1, 6, 1, 11, 1, 5, 1, 3, 1, 6, 1, 7, 2, 3, 2, 3, 2, 4, 1,
    4, 1, 4, 1, 5, 1, 4, 1, 3, 1, 4, 1, 4, 1, 4, 1, 4, 1, 3, 2, 3, 1,
    2, 1, 2, 1, 4, 1, 4, 1, 3, 1, 6, 1, 2, 1, 5, 1, 3, 1, 5, 1, 4, 1,
    4, 1, 3, 1, 10, 1, 4, 1, 6, 1, 11, 1, 5, 1, 2, 1, 7, 1, 7, 1, 1, 1,
    1, 1, 1, 1, 3, 1, 1, 1, 3, 1, 3, 1, 6, 1, 4, 1, 4, 1, 2, 1, 6, 1,
    3, 1, 4, 1, 4, 1, 4, 1, 3, 1, 2, 1, 2, 1, 4, 1, 4, 1, 4, 1, 4, 1,
    3, 1, 2, 1, 2, 1, 4, 1, 3, 1, 5, 1, 2, 1, 5, 1, 10, 1, 4, 1, 6, 1,
    11, 1, 5, 1, 1, 1, 8, 1, 7, 1, 1, 1, 1, 1, 1, 1, 3, 1, 1, 1, 3, 1,
    3, 1, 6, 1, 4, 1, 4, 1, 2, 1, 6, 1, 3, 1, 4, 1, 4, 1, 8, 1, 2, 1,
    2, 1, 4, 1, 4, 1, 4, 1, 4, 1, 3, 1, 2, 1, 2, 1, 5, 1, 1, 1, 6, 4,
    5, 1, 10, 6, 6, 1, 11, 1, 5, 4, 7, 1, 7, 1, 1, 1, 1, 1, 1, 1, 3, 1,
    2, 1, 2, 1, 3, 1, 6, 1, 4, 1, 4, 1, 2, 1, 6, 1, 3, 5, 6, 4, 7, 1,
    7, 1, 4, 1, 5, 1, 2, 1, 4, 1, 1, 1, 1, 1, 1, 1, 6, 1, 7, 1, 2, 1,
    5, 1, 3, 5, 2, 1, 4, 1, 6, 1, 6, 1, 4, 1, 5, 1, 3, 1, 6, 1, 4, 1,
    2, 1, 2, 1, 2, 1, 3, 1, 3, 1, 1, 1, 3, 1, 6, 1, 4, 5, 3, 1, 6, 1,
    3, 1, 2, 1, 11, 1, 6, 1, 7, 1, 4, 1, 5, 1, 2, 1, 4, 1, 1, 1, 1, 1,
    1, 1, 5, 1, 1, 1, 6, 1, 8, 1, 6, 1, 3, 1, 4, 1, 6, 1, 6, 1, 4, 1,
    5, 1, 3, 1, 6, 1, 4, 1, 2, 1, 5, 1, 3, 1, 3, 1, 1, 1, 3, 1, 6, 1,
    4, 1, 7, 1, 6, 1, 3, 1, 3, 1, 5, 1, 4, 1, 6, 1, 7, 1, 4, 1, 5, 1,
    2, 1, 4, 1, 1, 1, 1, 1, 1, 1, 4, 1, 3, 1, 5, 1, 9, 1, 5, 1, 3, 1,
    4, 1, 6, 1, 6, 1, 4, 1, 5, 1, 4, 1, 5, 1, 4, 1, 2, 1, 5, 1, 3, 1,
    4, 2, 4, 1, 4, 1, 5, 1, 8, 1, 4, 1, 4, 1, 4, 1, 4, 2, 3, 1, 6, 1,
    7, 1, 4, 1, 6, 2, 5, 1, 1, 1, 1, 1, 1, 1, 3, 1, 5, 1, 3, 5, 7, 5,
    3, 3, 2, 3, 2, 7, 4, 4, 5, 3, 3, 2, 2, 8, 1, 3, 3, 3, 1, 3, 3, 2,
    5, 4, 5, 5, 6, 4, 4, 3, 3, 2, 3, 1, 1, 3, 5, 5, 6, 4, 7, 2, 6, 1,
    3, 1, 3, 3, 3, 3, 115, 5, 1432, 1, 22, 1, 109, 1, 10, 1, 38, 3, 4, 1, 10, 3,
    9, 1, 18, 1, 17, 2, 23, 2, 16, 5, 12, 2, 11, 1, 10, 1, 5, 2, 7, 3, 3, 3,
    3, 6, 6, 1, 7, 1, 11, 1, 8, 1, 1, 1, 18, 1, 17, 1, 24, 1, 15, 1, 18, 1,
    29, 1, 8, 1, 5, 1, 4, 1, 4, 1, 6, 1, 7, 1, 11, 1, 7, 1, 3, 1, 18, 1,
    16, 1, 24, 1, 15, 1, 18, 1, 29, 1, 9, 1, 3, 1, 9, 1, 7, 1, 8, 1, 10, 1,
    6, 1, 5, 1, 25, 4, 5, 1, 1, 3, 6, 4, 1, 1, 4, 3, 1, 1, 5, 3, 5, 7,
    5, 3, 1, 2, 3, 1, 1, 3, 5, 3, 7, 5, 5, 1, 2, 3, 5, 1, 1, 1, 9, 1,
    8, 1, 8, 1, 10, 1, 37, 1, 4, 1, 4, 2, 3, 1, 4, 1, 4, 2, 3, 1, 3, 2,
    4, 1, 3, 1, 6, 1, 8, 1, 3, 2, 4, 2, 3, 1, 6, 1, 11, 1, 5, 1, 2, 1,
    8, 1, 10, 1, 8, 1, 8, 1, 10, 1, 42, 1, 4, 1, 5, 1, 2, 1, 9, 1, 5, 1,
    3, 1, 5, 1, 5, 1, 7, 1, 5, 1, 4, 1, 4, 1, 6, 1, 11, 1, 5, 1, 1, 1,
    9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 37, 6, 4, 1, 5, 1, 2, 1, 9, 1, 5, 1,
    3, 7, 5, 1, 7, 1, 5, 1, 4, 1, 4, 1, 6, 1, 11, 1, 5, 3, 9, 1, 8, 1,
    3, 1, 6, 1, 9, 1, 9, 1, 36, 1, 5, 1, 4, 1, 5, 1, 2, 1, 9, 1, 5, 1,
    3, 1, 11, 1, 7, 1, 5, 1, 4, 1, 4, 1, 6, 1, 11, 1, 5, 1, 2, 1, 8, 1,
    7, 1, 4, 1, 6, 1, 10, 1, 8, 1, 36, 1, 4, 2, 4, 2, 3, 1, 4, 1, 5, 1,
    3, 1, 3, 2, 4, 1, 4, 1, 5, 1, 8, 1, 3, 2, 4, 1, 4, 1, 6, 1, 11, 1,
    5, 1, 3, 1, 5, 5, 5, 6, 6, 1, 10, 1, 8, 1, 37, 4, 1, 2, 2, 2, 1, 3,
    6, 5, 5, 3, 1, 2, 4, 4, 5, 5, 6, 3, 1, 1, 3, 3, 2, 3, 2, 7, 8, 1,
    4, 2, 2, 4, 25, 1, 11, 1, 7, 1, 102, 1, 28, 1, 37, 3, 15, 3, 102, 1, 28, 1,
    155, 5, 24, 5, 74, 10, 1072, 3, 159, 1, 29, 1, 77, 1, 72, 1, 8, 1, 9, 1, 19, 1,
    77, 1, 71, 1, 9, 1, 10, 1, 18, 1, 5, 2, 1, 1, 2, 1, 4, 2, 1, 3, 6, 3,
    5, 2, 1, 3, 6, 3, 1, 2, 3, 2, 2, 3, 3, 4, 1, 1, 2, 7, 4, 2, 3, 2,
    3, 3, 2, 3, 1, 3, 5, 2, 1, 3, 2, 3, 1, 3, 3, 3, 2, 7, 6, 1, 9, 1,
    10, 1, 18, 1, 6, 2, 1, 2, 1, 1, 4, 2, 3, 1, 4, 1, 3, 1, 5, 2, 3, 1,
    4, 1, 3, 2, 5, 3, 5, 1, 4, 2, 4, 1, 9, 1, 4, 1, 4, 1, 4, 1, 3, 1,
    3, 1, 3, 1, 2, 1, 4, 1, 3, 1, 5, 1, 3, 1, 4, 1, 7, 1, 9, 1, 10, 1,
    6, 2, 10, 1, 6, 1, 2, 1, 2, 1, 4, 1, 4, 1, 3, 1, 5, 1, 4, 1, 5, 1,
    2, 1, 5, 1, 5, 1, 7, 1, 10, 1, 9, 1, 4, 1, 5, 1, 2, 1, 4, 1, 3, 1,
    3, 1, 3, 1, 2, 1, 5, 1, 3, 1, 8, 1, 8, 1, 9, 1, 10, 1, 5, 1, 2, 1,
    2, 1, 6, 1, 6, 1, 2, 1, 2, 1, 4, 1, 4, 1, 3, 1, 5, 1, 4, 1, 5, 1,
    2, 1, 5, 1, 5, 1, 8, 5, 5, 1, 9, 1, 4, 1, 5, 1, 2, 1, 5, 1, 1, 1,
    1, 1, 1, 1, 5, 2, 6, 1, 3, 1, 7, 1, 8, 1, 10, 1, 11, 1, 8, 2, 7, 1,
    6, 1, 2, 1, 2, 1, 4, 1, 4, 1, 3, 1, 5, 1, 4, 1, 5, 1, 2, 1, 5, 1,
    5, 1, 13, 1, 4, 1, 9, 1, 4, 1, 5, 1, 2, 1, 5, 1, 1, 1, 1, 1, 1, 1,
    4, 1, 2, 1, 6, 1, 1, 1, 7, 1, 10, 1, 9, 1, 10, 1, 18, 1, 6, 1, 2, 1,
    2, 1, 4, 1, 4, 1, 4, 1, 3, 1, 5, 2, 3, 1, 4, 1, 3, 2, 5, 1, 7, 1,
    5, 1, 4, 1, 4, 1, 4, 1, 3, 2, 6, 2, 6, 1, 1, 1, 1, 1, 1, 1, 3, 1,
    4, 1, 5, 1, 1, 1, 6, 1, 4, 1, 6, 1, 9, 1, 10, 1, 15, 7, 2, 3, 1, 2,
    1, 2, 2, 3, 2, 3, 4, 3, 6, 1, 1, 3, 6, 3, 1, 1, 4, 5, 4, 6, 6, 4,
    6, 3, 1, 2, 5, 2, 7, 1, 3, 1, 3, 3, 2, 3, 5, 1, 6, 7, 6, 1, 9, 1,
    10, 1, 56, 1, 14, 1, 76, 1, 19, 1, 9, 1, 10, 1, 56, 1, 14, 1, 75, 1, 21, 1,
    8, 1, 9, 1, 56, 3, 12, 3, 71, 5, 435,
];
