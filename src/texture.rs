//! # Base Texture Catalog
//!
//! Holds the pre-rendered moon textures that photographic renders start from.
//!
//! A catalog is built once during application setup and then only read:
//!
//! - **Sorted storage**: entries are kept ascending by size
//! - **Lookup**: the smallest texture at least as large as the request wins,
//!   found with a lower-bound search; if none is large enough the largest
//!   texture is scaled up
//! - **Resizing**: downscaling uses area averaging (each output pixel is the
//!   mean of the source pixels it covers); upscaling uses a triangle filter
//!
//! Texture files are named `moon-<size>.png`. When no asset directory is
//! configured, [`TextureCatalog::procedural`] generates a stand-in surface.

use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Result;

/// Sizes generated by [`TextureCatalog::procedural`] by default.
pub const DEFAULT_SIZES: [u32; 3] = [64, 256, 1024];

/// One registered texture.
#[derive(Clone, Debug)]
pub struct BaseTexture {
    pub size: u32,
    pub image: RgbaImage,
}

/// Read-only table of base textures, sorted ascending by size.
#[derive(Clone, Debug, Default)]
pub struct TextureCatalog {
    textures: Vec<BaseTexture>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Registered sizes in ascending order.
    pub fn sizes(&self) -> Vec<u32> {
        self.textures.iter().map(|t| t.size).collect()
    }

    /// Add a texture, keeping the table sorted.
    pub fn register(&mut self, size: u32, image: RgbaImage) {
        let at = self.textures.partition_point(|t| t.size <= size);
        self.textures.insert(at, BaseTexture { size, image });
    }

    /// Decode a PNG and register it.
    pub fn register_png(&mut self, size: u32, bytes: &[u8]) -> Result<()> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        self.register(size, image);
        Ok(())
    }

    /// Load every `moon-<size>.png` in `dir`.
    ///
    /// Any decode failure aborts the load: a broken asset is a packaging
    /// problem, not something to render around.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(size) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(texture_size)
            else {
                continue;
            };
            let bytes = fs::read(&path)?;
            catalog.register_png(size, &bytes)?;
            log::debug!("registered texture {} ({}px)", path.display(), size);
        }
        log::info!(
            "loaded {} textures from {}",
            catalog.len(),
            dir.as_ref().display()
        );
        Ok(catalog)
    }

    /// Build a catalog of generated textures at the given sizes.
    pub fn procedural(sizes: &[u32]) -> Self {
        let mut catalog = Self::new();
        for &size in sizes.iter().filter(|&&s| s > 0) {
            catalog.register(size, procedural_texture(size));
        }
        catalog
    }

    /// Texture for a `size`×`size` render, resized if needed.
    ///
    /// Returns `None` only when the catalog is empty.
    pub fn select(&self, size: u32) -> Option<RgbaImage> {
        let largest = self.textures.last()?;
        let at = self.textures.partition_point(|t| t.size < size);
        let base = self.textures.get(at).unwrap_or(largest);

        if base.image.dimensions() == (size, size) {
            return Some(base.image.clone());
        }
        log::debug!("resizing {}px texture to {}px", base.size, size);
        Some(resize(&base.image, size))
    }
}

/// Parse `moon-<size>.png`.
fn texture_size(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("moon-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
        .filter(|&size| size > 0)
}

/// Resize `image` to exactly `size`×`size`.
pub fn resize(image: &RgbaImage, size: u32) -> RgbaImage {
    if image.width() >= size && image.height() >= size {
        imageops::thumbnail(image, size, size)
    } else {
        imageops::resize(image, size, size, FilterType::Triangle)
    }
}

/// Cheap deterministic hash noise in `[0, 1)`.
fn noise(x: u32, y: u32) -> f64 {
    let mut h = x.wrapping_mul(0x27d4_eb2d) ^ y.wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    (h & 0xffff) as f64 / 65_536.0
}

/// Dark "maria" as (center x, center y, radius) in unit-disc coordinates.
const MARIA: [(f64, f64, f64); 5] = [
    (-0.25, -0.30, 0.28),
    (0.20, -0.15, 0.22),
    (-0.40, 0.20, 0.20),
    (0.10, 0.35, 0.15),
    (0.45, -0.45, 0.10),
];

/// A grey, softly shaded disc with darker maria on an opaque black sky.
fn procedural_texture(size: u32) -> RgbaImage {
    let r = size as f64 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let u = (x as f64 + 0.5 - r) / r;
        let v = (y as f64 + 0.5 - r) / r;
        let d2 = u * u + v * v;
        if d2 > 1.0 {
            return Rgba([0, 0, 0, 0xff]);
        }
        let mut level = 200.0 - 40.0 * d2;
        if MARIA
            .iter()
            .any(|(mx, my, mr)| (u - mx).powi(2) + (v - my).powi(2) < mr * mr)
        {
            level -= 60.0;
        }
        level += (noise(x, y) - 0.5) * 24.0;
        let l = level.clamp(0.0, 255.0) as u8;
        Rgba([l, l, l.saturating_sub(6), 0xff])
    })
}
