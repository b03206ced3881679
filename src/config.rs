//! Run configuration.
//!
//! Each setting is looked up in order: command-line flag, action input, then
//! the built-in default. All three layers are optional values, so an explicit
//! `0` is never mistaken for "not given".

use crate::bridge::ActionBridge;
use crate::cli::Args;
use crate::constants::{
    DEFAULT_IMAGES_PATH, DEFAULT_QUALITY, INPUT_IMAGES_PATH, INPUT_MAX_WIDTH, INPUT_QUALITY,
    MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub images_path: PathBuf,
    pub quality: u8,
    /// `None` disables resizing.
    pub max_width: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            images_path: PathBuf::from(DEFAULT_IMAGES_PATH),
            quality: DEFAULT_QUALITY,
            max_width: None,
        }
    }
}

impl Settings {
    pub fn new(images_path: PathBuf, quality: Option<u8>, max_width: Option<u32>) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            images_path,
            quality,
            max_width: max_width.filter(|&w| w > 0),
        })
    }

    pub fn resolve(args: &Args, bridge: &dyn ActionBridge) -> Result<Self> {
        let images_path = args
            .path
            .clone()
            .or_else(|| bridge.read_input(INPUT_IMAGES_PATH).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_PATH));

        let quality = match args.quality {
            Some(q) => Some(q),
            None => parse_input(bridge, INPUT_QUALITY)?,
        };

        let max_width = match args.max_width {
            Some(w) => Some(w),
            None => parse_input(bridge, INPUT_MAX_WIDTH)?,
        };

        Self::new(images_path, quality, max_width)
    }
}

fn parse_input<T: FromStr>(bridge: &dyn ActionBridge, name: &str) -> Result<Option<T>> {
    match bridge.read_input(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| CompressionError::InvalidInput {
                name: name.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryBridge;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["img-squeeze-action"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(&args(&[]), &MemoryBridge::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.images_path, PathBuf::from("assets/images"));
        assert_eq!(settings.quality, 85);
        assert_eq!(settings.max_width, None);
    }

    #[test]
    fn test_settings_flags_win_over_inputs() {
        let bridge = MemoryBridge::new()
            .with_input("images-path", "static/img")
            .with_input("quality", "40")
            .with_input("max-width", "800");
        let settings =
            Settings::resolve(&args(&["-p", "public", "-q", "70", "-w", "1920"]), &bridge).unwrap();

        assert_eq!(settings.images_path, PathBuf::from("public"));
        assert_eq!(settings.quality, 70);
        assert_eq!(settings.max_width, Some(1920));
    }

    #[test]
    fn test_settings_from_inputs() {
        let bridge = MemoryBridge::new()
            .with_input("images-path", "static/img")
            .with_input("quality", "40")
            .with_input("max-width", "800");
        let settings = Settings::resolve(&args(&[]), &bridge).unwrap();

        assert_eq!(settings.images_path, PathBuf::from("static/img"));
        assert_eq!(settings.quality, 40);
        assert_eq!(settings.max_width, Some(800));
    }

    #[test]
    fn test_settings_explicit_zero_width_disables_resize() {
        let settings = Settings::resolve(&args(&["-w", "0"]), &MemoryBridge::new()).unwrap();
        assert_eq!(settings.max_width, None);

        let bridge = MemoryBridge::new().with_input("max-width", "0");
        let settings = Settings::resolve(&args(&[]), &bridge).unwrap();
        assert_eq!(settings.max_width, None);
    }

    #[test]
    fn test_settings_explicit_zero_quality_is_rejected() {
        let result = Settings::resolve(&args(&["-q", "0"]), &MemoryBridge::new());
        assert!(matches!(result, Err(CompressionError::InvalidQuality(0))));

        let result = Settings::new(PathBuf::from("x"), Some(101), None);
        assert!(matches!(result, Err(CompressionError::InvalidQuality(101))));
    }

    #[test]
    fn test_settings_unparsable_input() {
        let bridge = MemoryBridge::new().with_input("quality", "high");
        let result = Settings::resolve(&args(&[]), &bridge);
        assert!(matches!(
            result,
            Err(CompressionError::InvalidInput { ref name, .. }) if name == "quality"
        ));

        let bridge = MemoryBridge::new().with_input("max-width", "-5");
        let result = Settings::resolve(&args(&[]), &bridge);
        assert!(matches!(result, Err(CompressionError::InvalidInput { .. })));
    }
}
