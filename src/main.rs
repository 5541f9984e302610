//! Proxy Sheets - printable card sheets from folders of images
//!
//! Scans a folder for card images and lays them out into a grid PDF sized
//! for trading cards, optionally split across files under a size cap.

use std::path::PathBuf;

use clap::Parser;
use proxy_sheets::{collect_images, default_output_name, normalize_deck, write_deck, GridSpec};

/// Generate a printable card PDF from a folder of image files
#[derive(Parser, Debug)]
#[command(name = "proxy_sheets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing card images (JPG/PNG)
    folder: PathBuf,

    /// Output PDF path (default: derived from the folder name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep original pixel dimensions instead of rescaling to 750x1050
    #[arg(long, default_value_t = false)]
    no_scale: bool,

    /// Only collect images from the top-level folder
    #[arg(long, default_value_t = false)]
    no_subfolders: bool,

    /// Split the output into files no larger than this many megabytes
    #[arg(long)]
    max_size_mb: Option<u64>,
}

fn main() {
    // Initialize logging. Set RUST_LOG to control the log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> proxy_sheets::Result<()> {
    let args = Args::parse();

    let images = collect_images(&args.folder, !args.no_subfolders)?;
    if images.is_empty() {
        log::warn!(
            "No image files found under {}. Use JPG or PNG files, optionally with -xN names or a cards.txt sidecar.",
            args.folder.display()
        );
        return Ok(());
    }
    log::info!(
        "Collected {} cards from {}",
        images.len(),
        args.folder.display()
    );

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(&args.folder)));

    let deck = normalize_deck(&images, !args.no_scale)?;
    let max_bytes = args.max_size_mb.map(|mb| mb * 1024 * 1024);
    write_deck(&deck, &output, &GridSpec::default(), max_bytes)
}
