use crate::batch::CompressionResult;
use crate::bridge::ActionBridge;
use crate::config::Settings;
use crate::constants::{
    MAX_FILE_SIZE, MAX_IMAGE_DIMENSION, PNG_OPTIMIZATION_PRESET, RESIZE_FILTER, TEMP_FILE_PREFIX,
};
use crate::error::{CompressionError, Result};
use crate::formats::ImageFamily;
use crate::utils::{calculate_compression_ratio, format_file_size};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub quality: u8,
    /// `None` leaves the dimensions alone.
    pub max_width: Option<u32>,
}

impl From<&Settings> for CompressionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            quality: settings.quality,
            max_width: settings.max_width,
        }
    }
}

/// What happened to one image that was re-encoded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOutcome {
    pub original_size: u64,
    pub compressed_size: u64,
    /// New dimensions when the image was scaled down.
    pub resized_to: Option<(u32, u32)>,
}

/// Loads an image file and returns it along with its size on disk.
///
/// # Arguments
/// * `input_path` - Path to the image file to load
///
/// # Returns
/// * `Ok((image, file_size))` - The decoded image and its file size in bytes
/// * `Err(CompressionError)` - If the file is missing, over the size or
///   dimension limits, or cannot be decoded
///
/// The format is sniffed from the file contents, so a PNG saved with a `.jpg`
/// name still decodes. An EXIF orientation tag is applied to the pixels, since
/// re-encoding does not carry the tag over.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    if !input_path.is_file() {
        return Err(CompressionError::FileNotFound(input_path.to_path_buf()));
    }

    let file_size = fs::metadata(input_path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    let mut decoder = ImageReader::open(input_path)?
        .with_guessed_format()?
        .into_decoder()?;

    let (width, height) = decoder.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    Ok((img, file_size))
}

/// Height that keeps the aspect ratio when `width` is scaled to `max_width`.
///
/// Equals `floor(height * max_width / width)`, computed in integers and never
/// below one pixel.
pub fn scaled_height(width: u32, height: u32, max_width: u32) -> u32 {
    if width == 0 {
        return height;
    }
    let scaled = u64::from(height) * u64::from(max_width) / u64::from(width);
    (scaled as u32).max(1)
}

/// Scale `img` down to `max_width` if it is wider. Returns the new dimensions
/// when a resize happened.
pub fn resize_to_max_width(img: &mut DynamicImage, max_width: Option<u32>) -> Option<(u32, u32)> {
    let max_width = max_width.filter(|&w| w > 0 && w < img.width())?;
    let new_height = scaled_height(img.width(), img.height(), max_width);

    *img = img.resize_exact(max_width, new_height, RESIZE_FILTER);
    Some((max_width, new_height))
}

/// Encode `img` for its family.
///
/// JPEGs use `quality`; images with alpha or high bit depth are flattened to
/// 8-bit RGB first since the JPEG encoder rejects them. PNGs are written by the
/// `image` encoder and then repacked by oxipng at its strongest preset.
pub fn encode_image(img: &DynamicImage, family: ImageFamily, quality: u8) -> Result<Vec<u8>> {
    match family {
        ImageFamily::Lossy => {
            let mut buf = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            match img.color() {
                ColorType::L8 | ColorType::Rgb8 => img.write_with_encoder(encoder)?,
                _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?,
            }
            Ok(buf)
        }
        ImageFamily::Lossless => {
            let mut png = Vec::new();
            img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

            let options = oxipng::Options::from_preset(PNG_OPTIMIZATION_PRESET);
            oxipng::optimize_from_memory(&png, &options)
                .map_err(|e| CompressionError::PngOptimization(e.to_string()))
        }
    }
}

/// Replace the contents of `path` with `bytes` without ever leaving a partial
/// file behind.
///
/// The bytes go to a temp file in the same directory, which then takes over
/// the original's permissions and is renamed over it. If anything fails the
/// temp file is removed and the original is untouched.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| CompressionError::Io(e.error))?;
    Ok(())
}

/// Load, optionally resize, re-encode and replace one image.
pub fn compress_in_place(
    path: &Path,
    options: &CompressionOptions,
    bridge: &dyn ActionBridge,
) -> Result<ImageOutcome> {
    let family = ImageFamily::from_path(path)
        .ok_or_else(|| CompressionError::UnsupportedFormat(path.display().to_string()))?;

    let (mut img, original_size) = load_image_with_metadata(path)?;
    let (width, height) = img.dimensions();

    let resized_to = resize_to_max_width(&mut img, options.max_width);
    if let Some((w, h)) = resized_to {
        bridge.debug(&format!(
            "Resized {} from {}x{} to {}x{}",
            path.display(),
            width,
            height,
            w,
            h
        ));
    }

    let bytes = encode_image(&img, family, options.quality)?;
    write_atomically(path, &bytes)?;

    let compressed_size = fs::metadata(path)?.len();
    Ok(ImageOutcome {
        original_size,
        compressed_size,
        resized_to,
    })
}

/// Compress one image and fold the result into `result`.
///
/// Never fails: any error is logged as a warning naming the file and the
/// image counts as unchanged.
pub fn process_image(
    path: &Path,
    options: &CompressionOptions,
    bridge: &dyn ActionBridge,
    result: &mut CompressionResult,
) {
    bridge.debug(&format!("Processing {}", path.display()));

    match compress_in_place(path, options, bridge) {
        Ok(outcome) if outcome.compressed_size < outcome.original_size => {
            result.record_savings(outcome.original_size, outcome.compressed_size);
            bridge.info(&format!(
                "Compressed {}: {} -> {} ({:.1}% saved)",
                path.display(),
                format_file_size(outcome.original_size),
                format_file_size(outcome.compressed_size),
                calculate_compression_ratio(outcome.original_size, outcome.compressed_size)
            ));
        }
        Ok(_) => {
            bridge.info(&format!("{} is already optimized", path.display()));
        }
        Err(e) => {
            bridge.warning(&format!("Failed to compress {}: {}", path.display(), e));
        }
    }
}
