use anyhow::{Context, Result};
use image::DynamicImage;
use log::{debug, info};
use std::path::Path;
use walkdir::WalkDir;

pub(crate) fn load_target(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to load target image `{}`", path.display()))?;
    info!(
        "loaded target image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decodes every image under `dir`, walking in file name order.
///
/// Entries that cannot be read or decoded are skipped; a bad file only shrinks
/// the tile bank.
pub(crate) fn load_sources(dir: &Path) -> Vec<DynamicImage> {
    let images: Vec<_> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .inspect_err(|err| debug!("skipping unreadable entry: {err}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| match image::open(entry.path()) {
            Ok(image) => {
                debug!("loaded source image {}", entry.path().display());
                Some(image)
            }
            Err(err) => {
                debug!("skipping {}: {err}", entry.path().display());
                None
            }
        })
        .collect();

    info!("loaded {} source images from {}", images.len(), dir.display());
    images
}
