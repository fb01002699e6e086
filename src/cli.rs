use std::path::PathBuf;

use clap::Parser;

/// Make near-black pixels in every PNG of an iconset fully transparent.
///
/// With no arguments the DevTools.iconset directory next to the executable
/// is processed in place with a threshold of 30.
#[derive(Parser, Debug)]
#[command(name = "iconset-clean", version, about, long_about = None)]
pub struct Cli {
    /// Iconset directory to process instead of the default one
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Channel cutoff (0-255); pixels with R, G and B all below it are cleared [default: 30]
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// TOML settings file with a [clean] table
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
