//! # Moon Compositing
//!
//! Turns phase masks into finished images:
//!
//! - [`fill_icon`] / [`stroke_icon`]: two-color icons drawn onto a canvas the
//!   caller owns
//! - [`render`]: photographic rendering of a base texture, returning a new image
//! - [`draw`]: picks and resizes a texture from a [`TextureCatalog`] first
//!
//! ## Photographic pipeline
//! 1. An alpha mask is built from two coverages: the whole disc at `shadow`
//!    opacity (the unlit lune plus the lit lune) and the lit lune fully
//!    opaque. Each pixel takes the larger of the two, so the lit lune
//!    overwrites the ambient layer without a seam along the terminator.
//! 2. A black disc on a transparent background becomes the night side.
//! 3. The texture is composited over that disc through the mask, so unlit
//!    areas show the texture faintly over black and nothing leaks outside
//!    the disc.

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::mask::{check_dimensions, phase_mask};
use crate::phase::{check_phase, check_shadow};
use crate::raster::{blend_over, coverage, fill_path, stroke_path};
use crate::texture::TextureCatalog;

const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const BLACK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);

/// Outline width used by [`stroke_icon`].
pub const STROKE_WIDTH: u32 = 1;

/// Paint a two-color moon icon onto `canvas`.
///
/// The whole disc is filled with `shadow`, then the lit part with `light`.
/// Returns the same canvas for chaining.
pub fn fill_icon(
    canvas: &mut RgbaImage,
    light: Rgba<u8>,
    shadow: Rgba<u8>,
    phase: f64,
) -> Result<&mut RgbaImage> {
    let (width, height) = canvas.dimensions();
    let disc = phase_mask(width, height, 1.0)?;
    let lit = phase_mask(width, height, phase)?;

    fill_path(canvas, &disc, shadow);
    fill_path(canvas, &lit, light);
    Ok(canvas)
}

/// Like [`fill_icon`] but only outlines are drawn: the full disc in `shadow`,
/// then the lit boundary in `light`.
pub fn stroke_icon(canvas: &mut RgbaImage, light: Rgba<u8>, shadow: Rgba<u8>, phase: f64) -> Result<()> {
    let (width, height) = canvas.dimensions();
    let disc = phase_mask(width, height, 1.0)?;
    let lit = phase_mask(width, height, phase)?;

    stroke_path(canvas, &disc, shadow, STROKE_WIDTH);
    stroke_path(canvas, &lit, light, STROKE_WIDTH);
    Ok(())
}

/// Build the per-pixel alpha mask used by [`render`].
///
/// The unlit part of the disc gets `shadow·255` alpha, the lit lune 255, the
/// rest 0. Anti-aliased edges scale with coverage.
pub fn render_mask(width: u32, height: u32, phase: f64, shadow: f64) -> Result<RgbaImage> {
    check_dimensions(width, height)?;
    let phase = check_phase(phase)?;
    let shadow = check_shadow(shadow)?;

    let disc = coverage(&phase_mask(width, height, 1.0)?, width, height);
    let lit = coverage(&phase_mask(width, height, phase)?, width, height);
    let level = (shadow * 255.0) as u8 as u16;

    let mut mask = RgbaImage::new(width, height);
    for ((pixel, disc), lit) in mask.pixels_mut().zip(disc).zip(lit) {
        let ambient = (disc as u16 * level / 255) as u8;
        *pixel = Rgba([0xff, 0xff, 0xff, lit.max(ambient)]);
    }
    Ok(mask)
}

/// Render `texture` at `phase`, darkening the unlit side according to `shadow`.
///
/// `shadow` 0.0 leaves the unlit side pure black, 1.0 leaves it untouched.
/// The texture is not modified.
pub fn render(texture: &RgbaImage, phase: f64, shadow: f64) -> Result<RgbaImage> {
    let (width, height) = texture.dimensions();
    let mask = render_mask(width, height, phase, shadow)?;

    let mut result = RgbaImage::new(width, height);
    fill_path(&mut result, &phase_mask(width, height, 1.0)?, BLACK);
    composite_over(&mut result, texture, &mask);

    log::debug!(
        "rendered {}x{} moon phase={} shadow={}",
        width,
        height,
        phase,
        shadow
    );
    Ok(result)
}

/// Composite `src` over `dst`, weighting each source pixel by the alpha of
/// the matching `mask` pixel. Pixels outside any of the three images are skipped.
pub fn composite_over(dst: &mut RgbaImage, src: &RgbaImage, mask: &RgbaImage) {
    let width = dst.width().min(src.width()).min(mask.width());
    let height = dst.height().min(src.height()).min(mask.height());
    for y in 0..height {
        for x in 0..width {
            let alpha = mask.get_pixel(x, y)[3];
            if alpha == 0 {
                continue;
            }
            blend_over(
                dst.get_pixel_mut(x, y),
                *src.get_pixel(x, y),
                alpha as f32 / 255.0,
            );
        }
    }
}

/// Render a `size`×`size` moon from the best texture in `catalog`.
///
/// Returns `Ok(None)` when the catalog is empty.
pub fn draw(catalog: &TextureCatalog, size: u32, phase: f64, shadow: f64) -> Result<Option<RgbaImage>> {
    check_dimensions(size, size)?;
    if catalog.is_empty() {
        log::warn!("no base texture registered, nothing to draw");
        return Ok(None);
    }
    let Some(texture) = catalog.select(size) else {
        return Ok(None);
    };
    render(&texture, phase, shadow).map(Some)
}
