use image::imageops::FilterType;

pub const DEFAULT_IMAGES_PATH: &str = "assets/images";

pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Extensions picked up from the diff, compared lower-cased.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

// Action inputs
pub const INPUT_IMAGES_PATH: &str = "images-path";
pub const INPUT_QUALITY: &str = "quality";
pub const INPUT_MAX_WIDTH: &str = "max-width";

// Action outputs
pub const OUTPUT_COMPRESSED_COUNT: &str = "compressed-count";
pub const OUTPUT_SAVED_BYTES: &str = "saved-bytes";

/// Files larger than this are skipped before decoding (100 MiB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// oxipng preset used for lossless re-encoding; 6 is the strongest preset.
pub const PNG_OPTIMIZATION_PRESET: u8 = 6;

pub const TEMP_FILE_PREFIX: &str = ".img-squeeze-";

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
