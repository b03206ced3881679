use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-squeeze-action",
    about = "Recompress the images changed in the latest commit",
    long_about = "img-squeeze-action looks at the files added or modified by the latest commit, \
                  recompresses every JPEG and PNG among them that lives under the images directory, \
                  and reports how many images shrank and how many bytes were saved. \
                  JPEGs are re-encoded at the chosen quality; PNGs are repacked losslessly.",
    version,
    after_help = "EXAMPLES:\n  \
    img-squeeze-action\n  \
    img-squeeze-action --path assets/images -q 85 -w 1920\n  \
    img-squeeze-action --images-path static/img --quiet"
)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "path",
        visible_alias = "images-path",
        value_name = "DIR",
        help = "Directory holding the images (default: assets/images)",
        long_help = "Only changed images whose path starts with this directory are compressed. \
                     The comparison ignores letter case. Falls back to the 'images-path' action input."
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'q',
        long,
        value_name = "1-100",
        help = "JPEG quality (1-100, default: 85)",
        long_help = "Quality used when re-encoding JPEGs, from 1 (smallest) to 100 (best). \
                     PNGs are always repacked losslessly. Falls back to the 'quality' action input."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'w',
        long,
        value_name = "PIXELS",
        help = "Maximum width in pixels (0 or unset: no resizing)",
        long_help = "Images wider than this are scaled down to this width, keeping the aspect ratio. \
                     Falls back to the 'max-width' action input."
    )]
    pub max_width: Option<u32>,

    #[arg(short, long, help = "Show per-file debug output")]
    pub verbose: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only show warnings and errors")]
    pub quiet: bool,
}
