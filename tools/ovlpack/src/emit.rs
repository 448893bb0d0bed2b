//! Writes a finished overlay as `col_<game>.bin` and `col_<game>.txt`.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::overlay::OverlayBuffer;

pub fn bin_path(out_dir: &Path, game: &str) -> PathBuf {
    out_dir.join(format!("col_{}.bin", game))
}

pub fn txt_path(out_dir: &Path, game: &str) -> PathBuf {
    out_dir.join(format!("col_{}.txt", game))
}

/// Write `data` next to `path` and rename it into place, so readers never see a half-written file.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Emit both output files for `game`. Returns the paths written.
pub fn write_overlay(out_dir: &Path, game: &str, overlay: &OverlayBuffer) -> std::io::Result<[PathBuf; 2]> {
    let bin = bin_path(out_dir, game);
    write_atomic(&bin, overlay.as_bytes())?;
    info!("Created: {}", bin.display());

    let txt = txt_path(out_dir, game);
    write_atomic(&txt, overlay.to_hex_text().as_bytes())?;
    info!("Created: {}", txt.display());

    Ok([bin, txt])
}
