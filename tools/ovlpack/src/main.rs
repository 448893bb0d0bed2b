use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::util::SubscriberInitExt;

use ovlpack::batch::{convert_layout, run_batch, BatchConfig, GameOutcome};
use ovlpack::names::read_names;
use ovlpack::orientation::{Orientation, OrientationTable};
use ovlpack::overlay::OverlayBuffer;

#[derive(Parser)]
#[command(name = "ovlpack")]
#[command(version, about = "Arcade overlay layout packer", long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every listed game that has a layout
    Build {
        /// File with one game name per line
        #[arg(long, default_value = "names")]
        names: PathBuf,

        /// Directory containing <game>.lay files
        #[arg(long, default_value = "layout")]
        layouts: PathBuf,

        /// Where col_<game>.bin/.txt are written
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Treat GAME as a vertical (rotated) cabinet, on top of the built-in list
        #[arg(long, value_name = "GAME")]
        vertical: Vec<String>,

        /// Treat GAME as flipped, on top of the built-in list
        #[arg(long, value_name = "GAME")]
        flip: Vec<String>,

        /// Report failing games and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// Convert a single layout file
    Convert {
        /// Path to the .lay file
        layout: PathBuf,

        /// Game name for the output files (defaults to the file stem)
        #[arg(long)]
        game: Option<String>,

        /// Where col_<game>.bin/.txt are written
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Rotated cabinet
        #[arg(long)]
        vertical: bool,

        /// Mirrored on top of the rotation
        #[arg(long)]
        flip: bool,
    },

    /// Show an emitted col_<game>.bin as a stripe map
    Dump {
        bin: PathBuf,

        /// Print the hex text as well
        #[arg(long)]
        hex: bool,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .init();
}

fn do_build(
    names: &Path,
    layouts: PathBuf,
    out: PathBuf,
    vertical: Vec<String>,
    flip: Vec<String>,
    keep_going: bool,
) -> anyhow::Result<()> {
    let games = read_names(names)
        .with_context(|| format!("Failed to read name list {}", names.display()))?;

    let mut orientations = OrientationTable::builtin();
    for game in vertical {
        orientations.insert(game, Orientation::VERTICAL);
    }
    for game in flip {
        orientations.insert(game, Orientation::FLIP);
    }

    std::fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create output dir {}", out.display()))?;

    let config = BatchConfig { layout_dir: layouts, out_dir: out, orientations, keep_going };
    let report = run_batch(&games, &config)?;

    // each failure was already logged as it happened
    if !report.is_success() {
        bail!("{} of {} games failed", report.failed.len(), games.len());
    }
    Ok(())
}

fn do_convert(layout: &Path, game: Option<String>, out: &Path, vertical: bool, flip: bool) -> anyhow::Result<()> {
    let game = match game {
        Some(game) => game,
        None => layout
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .context("Could not derive a game name from the layout path")?,
    };

    let mut orientation = OrientationTable::builtin().get(&game);
    if vertical {
        orientation |= Orientation::VERTICAL;
    }
    if flip {
        orientation |= Orientation::FLIP;
    }

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output dir {}", out.display()))?;

    if let GameOutcome::Emitted { rects, skipped_rects } = convert_layout(&game, layout, orientation, out)? {
        info!("{}: {} rects ({} without color)", game, rects, skipped_rects);
    }
    Ok(())
}

fn do_dump(bin: &Path, hex: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(bin).with_context(|| format!("Failed to read {}", bin.display()))?;
    let overlay = OverlayBuffer::from_bytes(&bytes)?;

    print!("{}", overlay.stripe_map());
    if hex {
        println!("{}", overlay.to_hex_text());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Build { names, layouts, out, vertical, flip, keep_going } => {
            do_build(&names, layouts, out, vertical, flip, keep_going)
        }

        Commands::Convert { layout, game, out, vertical, flip } => {
            do_convert(&layout, game, &out, vertical, flip)
        }

        Commands::Dump { bin, hex } => do_dump(&bin, hex),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
