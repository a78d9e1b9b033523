// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! File loading for viva: images and font metrics.
//!
//! Image decoding is delegated to the `png` crate; whatever the file's
//! color type, [`load_image`] hands back RGBA8 pixels top-to-bottom,
//! left-to-right — the layout [`ResourceFactory::create_texture`] expects.
//! Decode failures surface the decoder's own message.
//!
//! [`ResourceFactory::create_texture`]: viva_core::backend::ResourceFactory::create_texture

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use viva_core::camera::Camera;
use viva_core::color::Color;
use viva_core::font::{Font, FontError};
use viva_core::scene::Texture;

use kurbo::Size;

// Re-exported geometry crate, so callers do not need a direct kurbo
// dependency for sizes.
pub use kurbo;

/// Failure to load an asset file.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Opening or reading the file failed.
    #[error("could not read {path}: {source}")]
    Io {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The image decoder rejected the file; carries its message.
    #[error("could not decode {path}: {message}")]
    Decode {
        /// The offending path.
        path: String,
        /// The decoder's error message.
        message: String,
    },

    /// The font metrics text was malformed.
    #[error("font metrics in {path}: {source}")]
    Font {
        /// The offending path.
        path: String,
        /// The parse error.
        #[source]
        source: FontError,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> AssetError {
    AssetError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reads a whole file as a UTF-8 string.
///
/// # Errors
///
/// [`AssetError::Io`] on open/read failure or invalid UTF-8.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}

/// Reads a whole file as bytes.
///
/// # Errors
///
/// [`AssetError::Io`] on open/read failure.
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| io_err(path, e))
}

/// Decodes a PNG to RGBA8 pixels (top-to-bottom, left-to-right) plus its
/// pixel size.
///
/// Grayscale, palette, and RGB images are expanded to RGBA; missing alpha
/// becomes opaque.
///
/// # Errors
///
/// [`AssetError::Io`] on file errors, [`AssetError::Decode`] with the
/// decoder's message otherwise.
pub fn load_image(path: impl AsRef<Path>) -> Result<(Vec<Color>, Size), AssetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_err(path, e))?;

    let decode_err = |message: String| AssetError::Decode {
        path: path.display().to_string(),
        message,
    };

    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(|e| decode_err(e.to_string()))?;

    let mut buf = vec![0_u8; reader.output_buffer_size().expect("output buffer size overflows usize")];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| decode_err(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let pixel_count = info.width as usize * info.height as usize;
    let mut pixels = Vec::with_capacity(pixel_count);
    match info.color_type {
        png::ColorType::Rgba => {
            for px in buf.chunks_exact(4) {
                pixels.push(Color::new(px[0], px[1], px[2], px[3]));
            }
        }
        png::ColorType::Rgb => {
            for px in buf.chunks_exact(3) {
                pixels.push(Color::new(px[0], px[1], px[2], 255));
            }
        }
        png::ColorType::Grayscale => {
            for px in buf.chunks_exact(1) {
                pixels.push(Color::new(px[0], px[0], px[0], 255));
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for px in buf.chunks_exact(2) {
                pixels.push(Color::new(px[0], px[0], px[0], px[1]));
            }
        }
        other => {
            return Err(decode_err(format!(
                "unsupported color type after expansion: {other:?}"
            )));
        }
    }
    if pixels.len() != pixel_count {
        return Err(decode_err(format!(
            "decoded {} pixels, expected {pixel_count}",
            pixels.len()
        )));
    }

    log::debug!(
        "decoded {}x{} image from {}",
        info.width,
        info.height,
        path.display()
    );
    Ok((
        pixels,
        Size::new(f64::from(info.width), f64::from(info.height)),
    ))
}

/// Loads a BMFont-style metrics file against an already-created atlas
/// texture.
///
/// # Errors
///
/// [`AssetError::Io`] on file errors, [`AssetError::Font`] if the metrics
/// are malformed.
pub fn load_font(
    path: impl AsRef<Path>,
    atlas: Texture,
    camera: &Camera,
) -> Result<Font, AssetError> {
    let path = path.as_ref();
    let metrics = read_to_string(path)?;
    Font::parse(&metrics, atlas.id, atlas.size, camera).map_err(|source| AssetError::Font {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::BufWriter;

    use viva_core::backend::TextureId;
    use viva_core::camera::CameraConfig;

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("viva_assets_test_{}_{name}", std::process::id()));
        path
    }

    fn write_png(path: &Path, color_type: png::ColorType, width: u32, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, 1);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn rgba_png_round_trips() {
        let path = temp_path("rgba.png");
        write_png(&path, png::ColorType::Rgba, 2, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let (pixels, size) = load_image(&path).unwrap();
        assert_eq!(size, Size::new(2.0, 1.0));
        assert_eq!(pixels, vec![Color::new(1, 2, 3, 4), Color::new(5, 6, 7, 8)]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rgb_png_gains_opaque_alpha() {
        let path = temp_path("rgb.png");
        write_png(&path, png::ColorType::Rgb, 1, &[9, 8, 7]);

        let (pixels, _) = load_image(&path).unwrap();
        assert_eq!(pixels, vec![Color::new(9, 8, 7, 255)]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_image("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn garbage_file_reports_decoder_message() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"this is not a png").unwrap();

        let err = load_image(&path).unwrap_err();
        match err {
            AssetError::Decode { message, .. } => {
                assert!(!message.is_empty(), "decoder message should be carried")
            }
            other => panic!("expected Decode, got {other:?}"),
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn font_file_loads() {
        let path = temp_path("font.fnt");
        std::fs::write(
            &path,
            "common lineHeight=20\nchar id=65 x=0 y=0 width=10 height=19 xoffset=0 yoffset=0 xadvance=10\n",
        )
        .unwrap();

        let camera = Camera::new(CameraConfig::new(Size::new(640.0, 480.0)));
        let atlas = Texture {
            id: TextureId(1),
            size: Size::new(190.0, 95.0),
        };
        let font = load_font(&path, atlas, &camera).unwrap();
        assert!(font.glyph('A').is_some());
        assert_eq!(font.line_height_px(), 20.0);
        let _ = std::fs::remove_file(path);
    }
}
