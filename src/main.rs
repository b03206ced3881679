use anyhow::{Context, Result};
use clap::Parser;
use img_squeeze_action::cli::Args;
use img_squeeze_action::constants::{OUTPUT_COMPRESSED_COUNT, OUTPUT_SAVED_BYTES};
use img_squeeze_action::logger::{self, Verbosity};
use img_squeeze_action::{
    ActionBridge, Compressor, ConsoleBridge, GitDiff, GitHubActionsBridge, Settings,
};
use std::process;

fn main() {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    logger::init(verbosity);

    let bridge: Box<dyn ActionBridge> = if GitHubActionsBridge::is_available() {
        Box::new(GitHubActionsBridge::from_env())
    } else {
        Box::new(ConsoleBridge)
    };

    if let Err(e) = run(&args, bridge.as_ref(), verbosity) {
        bridge.set_failed(&format!("{:#}", e));
        process::exit(1);
    }
}

fn run(args: &Args, bridge: &dyn ActionBridge, verbosity: Verbosity) -> Result<()> {
    let settings = Settings::resolve(args, bridge).context("invalid configuration")?;
    bridge.debug(&format!(
        "Settings: path={}, quality={}, max-width={}",
        settings.images_path.display(),
        settings.quality,
        settings
            .max_width
            .map(|w| w.to_string())
            .unwrap_or_else(|| "off".to_string())
    ));

    let changes = GitDiff::new();
    let result = Compressor::new(bridge, &changes)
        .with_progress(verbosity != Verbosity::Quiet)
        .run(&settings);

    bridge
        .set_output(OUTPUT_COMPRESSED_COUNT, &result.compressed_count.to_string())
        .context("failed to publish compressed-count")?;
    bridge
        .set_output(OUTPUT_SAVED_BYTES, &result.total_bytes_saved.to_string())
        .context("failed to publish saved-bytes")?;

    Ok(())
}
