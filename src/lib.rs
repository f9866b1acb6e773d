//! # Moon Phase Rendering Library
//!
//! Draws the moon at any illumination phase, either as a photograph built
//! from a base texture or as a flat two-color icon, and answers simple
//! questions about where the moon is in the sky.
//!
//! ## Phase Convention
//!
//! A phase is a signed number in `[-1.0, 1.0]`:
//! - **Magnitude**: fraction of the disc that is lit
//! - **Sign**: negative while waxing, positive while waning
//! - `0.0` is a new moon; both `-1.0` and `1.0` are full moons
//!
//! One cycle runs `0.0 → -1.0` (waxing) and then `1.0 → 0.0` (waning). The
//! two full-moon values are deliberately distinct so waxing and waning stay
//! distinguishable.
//!
//! ## Pipeline
//! 1. **Mask**: [`mask::phase_mask`] builds the closed outline of the lit region
//!    as a `kurbo` Bézier path
//! 2. **Raster**: [`raster`] fills (through `tiny-skia` coverage masks) or
//!    strokes outlines onto RGBA canvases
//! 3. **Composite**: [`compositor`] combines masks with a texture or flat colors
//! 4. **Textures**: [`texture::TextureCatalog`] picks and resizes a base texture
//!
//! Image decoding and encoding stay with the caller; the library works on
//! [`image::RgbaImage`] values only.
//!
//! ## Example
//! ```
//! use image::{Rgba, RgbaImage};
//! use moon_phase_lib::{fill_icon, render, TextureCatalog};
//!
//! // Waxing crescent icon
//! let mut canvas = RgbaImage::new(32, 32);
//! fill_icon(&mut canvas, Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 255]), -0.25).unwrap();
//!
//! // Photographic waning gibbous
//! let catalog = TextureCatalog::procedural(&[64]);
//! let texture = catalog.select(64).unwrap();
//! let moon = render(&texture, 0.75, 0.2).unwrap();
//! assert_eq!(moon.dimensions(), (64, 64));
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod lunar;
pub mod mask;
pub mod phase;
pub mod preview;
pub mod raster;
pub mod texture;

pub use compositor::{draw, fill_icon, render, stroke_icon};
pub use error::{MoonError, Result};
pub use lunar::{information, Information, Location, PhaseCategory, SchaeferEphemeris};
pub use mask::phase_mask;
pub use texture::TextureCatalog;
