use crate::bank::Tile;
use image::{RgbImage, buffer::ConvertBuffer};
use log::{info, warn};
use std::{fs, path::Path};

/// Where resampled tiles go when debugging.
pub(crate) const SCALED_TILES_DIR: &str = "scaledTiles";

/// Writes each tile's output bitmap to `dir` as `<bank index>.jpeg`.
///
/// Failures are logged and skipped. Returns how many tiles were written.
pub(crate) fn save_tiles(tiles: &[Tile], dir: &Path) -> usize {
    if let Err(err) = fs::create_dir_all(dir) {
        warn!("failed to create tile directory {}: {err}", dir.display());
        return 0;
    }

    let mut saved = 0;
    for (index, tile) in tiles.iter().enumerate() {
        let path = dir.join(format!("{index}.jpeg"));
        let rgb: RgbImage = tile.output().convert();
        match rgb.save(&path) {
            Ok(()) => {
                info!("tile saved to {}", path.display());
                saved += 1;
            }
            Err(err) => warn!("tile {index} could not be saved to {}: {err}", path.display()),
        }
    }
    saved
}
