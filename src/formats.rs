//! Image family handling
//!
//! The action only touches two families: JPEG, which is re-encoded lossy at the
//! configured quality, and PNG, which is repacked losslessly.

use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFamily {
    /// JPEG, re-encoded at the configured quality
    Lossy,
    /// PNG, repacked with maximum effort
    Lossless,
}

impl ImageFamily {
    /// Detect the family from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            ImageFamily::Lossy => ImageFormat::Jpeg,
            ImageFamily::Lossless => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFamily::Lossy => "JPEG",
            ImageFamily::Lossless => "PNG",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageFamily {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFamily::Lossy),
            "png" => Ok(ImageFamily::Lossless),
            _ => Err(CompressionError::UnsupportedFormat(s.to_string())),
        }
    }
}
