pub mod batch;
pub mod bridge;
pub mod changes;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod utils;

pub use batch::{select_candidates, CompressionResult, Compressor};
pub use bridge::{ActionBridge, ConsoleBridge, GitHubActionsBridge, LogLevel, MemoryBridge};
pub use changes::{changed_image_files, ChangeSource, GitDiff, StaticChangeSource};
pub use config::Settings;
pub use error::{CompressionError, Result};
pub use formats::ImageFamily;
pub use processing::{
    compress_in_place, encode_image, load_image_with_metadata, process_image, resize_to_max_width,
    scaled_height, write_atomically, CompressionOptions, ImageOutcome,
};
pub use utils::format_file_size;
