//! # Error Types
//!
//! Every fallible operation in the library reports through [`MoonError`].
//! Texture lookup misses are not errors: they surface as `None` so callers
//! can decide whether a missing image matters.

use std::io;
use thiserror::Error;

/// Errors that can occur while building masks, compositing, or querying the moon.
#[derive(Error, Debug)]
pub enum MoonError {
    /// Canvas or mask dimensions must both be positive
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Phase must lie in [-1.0, 1.0]
    #[error("phase {0} outside [-1, 1]")]
    PhaseOutOfRange(f64),

    /// Shadow must lie in [0.0, 1.0]
    #[error("shadow {0} outside [0, 1]")]
    ShadowOutOfRange(f64),

    /// Observer coordinates outside the valid latitude/longitude ranges
    #[error("invalid location lat={latitude} lon={longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// Image decoding or encoding failed
    #[error("image codec: {0}")]
    Image(#[from] image::ImageError),

    /// Texture asset directory could not be read
    #[error("texture IO: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, MoonError>;
