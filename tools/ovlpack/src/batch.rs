//! Per-game pipeline: layout -> transform -> rasterize -> emit.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{error_chain, GameError, GameErrorKind};
use crate::layout::{read_layout, RectRecord};
use crate::orientation::{transform, Orientation, OrientationTable};
use crate::overlay::{ColorBits, OverlayBuffer, ScreenRect};
use crate::emit::write_overlay;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub layout_dir: PathBuf,
    pub out_dir: PathBuf,
    pub orientations: OrientationTable,
    /// Report a failing game and move on instead of aborting the run.
    pub keep_going: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            layout_dir: PathBuf::from("layout"),
            out_dir: PathBuf::from("."),
            orientations: OrientationTable::builtin(),
            keep_going: false,
        }
    }
}

#[derive(Debug)]
pub enum GameOutcome {
    /// No `<game>.lay` in the layout directory.
    NoLayout,
    Emitted { rects: usize, skipped_rects: usize },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub emitted: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<GameError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn layout_path(layout_dir: &Path, game: &str) -> PathBuf {
    layout_dir.join(format!("{}.lay", game))
}

/// Rasterize parsed rects for a game mounted as `orientation`, in document order.
pub fn rasterize(rects: &[RectRecord], orientation: Orientation) -> OverlayBuffer {
    let mut overlay = OverlayBuffer::new();

    for rect in rects {
        match rect {
            RectRecord::FullScreen { color } => {
                debug!("<full screen> {:?}", color);
                overlay.fill_rect(ScreenRect::FULL, ColorBits::from_rgb(*color));
            }
            RectRecord::Bounded { bounds, color } => {
                let screen = transform(*bounds, orientation);
                debug!("{:?} {:?} -> {:?}", bounds, color, screen);
                overlay.fill_rect(screen, ColorBits::from_rgb(*color));
            }
            RectRecord::Skipped => debug!("rect without color, skipped"),
        }
    }

    overlay
}

/// Build the overlay for one layout file and write it out.
///
/// Nothing is written unless the whole layout parsed.
pub fn convert_layout(
    game: &str,
    layout: &Path,
    orientation: Orientation,
    out_dir: &Path,
) -> Result<GameOutcome, GameError> {
    let fail = |source: GameErrorKind| GameError {
        game: game.to_string(),
        layout: layout.to_path_buf(),
        source,
    };

    let rects = read_layout(layout).map_err(|e| fail(e.into()))?;
    if orientation.contains(Orientation::VERTICAL) {
        debug!("{} is mounted {:?}", game, orientation);
    }

    let overlay = rasterize(&rects, orientation);
    write_overlay(out_dir, game, &overlay).map_err(|e| fail(e.into()))?;

    let skipped_rects = rects.iter().filter(|r| matches!(r, RectRecord::Skipped)).count();
    Ok(GameOutcome::Emitted { rects: rects.len(), skipped_rects })
}

pub fn process_game(game: &str, config: &BatchConfig) -> Result<GameOutcome, GameError> {
    let layout = layout_path(&config.layout_dir, game);
    if !layout.exists() {
        debug!("no layout for {} ({})", game, layout.display());
        return Ok(GameOutcome::NoLayout);
    }

    info!("*{}", layout.display());
    convert_layout(game, &layout, config.orientations.get(game), &config.out_dir)
}

/// Run every game in `games`.
///
/// Without `keep_going` the first failure is returned as the error and the
/// run stops there; games already emitted stay on disk.
pub fn run_batch(games: &[String], config: &BatchConfig) -> Result<BatchReport, GameError> {
    let mut report = BatchReport::default();

    for game in games {
        match process_game(game, config) {
            Ok(GameOutcome::NoLayout) => report.skipped.push(game.clone()),
            Ok(GameOutcome::Emitted { rects, skipped_rects }) => {
                debug!("{}: {} rects ({} without color)", game, rects, skipped_rects);
                report.emitted.push(game.clone());
            }
            Err(e) if config.keep_going => {
                warn!("{}", error_chain(&e));
                report.failed.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "{} emitted, {} without layout, {} failed",
        report.emitted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}
