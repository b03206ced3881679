use crate::bridge::ActionBridge;
use crate::changes::{changed_image_files, ChangeSource};
use crate::config::Settings;
use crate::processing::{process_image, CompressionOptions};
use crate::utils::{create_progress_bar, format_file_size};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Counters for a single run.
///
/// `compressed_count <= total_images_processed` and `total_bytes_saved` only
/// ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionResult {
    /// Images whose re-encoded file is strictly smaller than the original.
    pub compressed_count: usize,
    pub total_bytes_saved: u64,
    /// Every candidate that was attempted, including failures.
    pub total_images_processed: usize,
}

impl CompressionResult {
    /// Count a shrunk image. Sizes that did not go down are ignored.
    pub fn record_savings(&mut self, original_size: u64, compressed_size: u64) {
        if compressed_size < original_size {
            self.compressed_count += 1;
            self.total_bytes_saved += original_size - compressed_size;
        }
    }
}

/// Runs the compression pass over the images changed by the latest commit.
pub struct Compressor<'a> {
    bridge: &'a dyn ActionBridge,
    changes: &'a dyn ChangeSource,
    show_progress: bool,
}

impl<'a> Compressor<'a> {
    pub fn new(bridge: &'a dyn ActionBridge, changes: &'a dyn ChangeSource) -> Self {
        Self {
            bridge,
            changes,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Compress every changed image under `settings.images_path`.
    ///
    /// A missing directory, no candidates, and per-file failures are all
    /// reported through the bridge; none of them stops the run.
    pub fn run(&self, settings: &Settings) -> CompressionResult {
        let start_time = Instant::now();
        let mut result = CompressionResult::default();
        let images_path = &settings.images_path;

        if !images_path.is_dir() {
            self.bridge.warning(&format!(
                "Images directory {} does not exist, nothing to compress",
                images_path.display()
            ));
            return result;
        }

        self.bridge.debug(&format!(
            "Looking for changed images under {}",
            images_path.display()
        ));

        let changed = changed_image_files(self.changes, self.bridge);
        let candidates = select_candidates(&changed, images_path);

        if candidates.is_empty() {
            self.bridge.info(&format!(
                "No changed images found under {}",
                images_path.display()
            ));
            return result;
        }

        self.bridge.info(&format!(
            "Found {} changed image(s) to compress",
            candidates.len()
        ));

        let options = CompressionOptions::from(settings);
        let progress = create_progress_bar(candidates.len() as u64, !self.show_progress);

        for path in &candidates {
            result.total_images_processed += 1;
            // Log lines go to the same terminal as the bar
            progress.suspend(|| process_image(path, &options, self.bridge, &mut result));
            progress.inc(1);
        }

        progress.finish_and_clear();

        self.bridge.info(&format!(
            "Compressed {} of {} image(s), saved {} in {:.2?}",
            result.compressed_count,
            result.total_images_processed,
            format_file_size(result.total_bytes_saved),
            start_time.elapsed()
        ));

        result
    }
}

/// Keep the paths that sit under `target_dir`.
///
/// The comparison is on path text, ignores letter case, treats `\` as `/`,
/// ignores a leading `./`, and only matches at a directory boundary.
pub fn select_candidates(changed: &[PathBuf], target_dir: &Path) -> Vec<PathBuf> {
    let target = normalize_path_text(target_dir);
    let target = target.trim_end_matches('/');

    changed
        .iter()
        .filter(|path| {
            if target.is_empty() || target == "." {
                return true;
            }
            let candidate = normalize_path_text(path);
            match candidate.strip_prefix(target) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
        .cloned()
        .collect()
}

fn normalize_path_text(path: &Path) -> String {
    let mut text = path.to_string_lossy().replace('\\', "/").to_lowercase();
    while let Some(rest) = text.strip_prefix("./") {
        text = rest.to_string();
    }
    text
}
