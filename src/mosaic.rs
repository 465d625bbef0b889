use crate::{
    bank::{Selector, Tile, TileBank},
    error::MosaicError,
    export::{SCALED_TILES_DIR, save_tiles},
    resample::resample,
};
use image::{GenericImageView, Rgba, RgbaImage, imageops};
use log::{debug, info};
use std::{
    fmt::{self, Display},
    panic,
    path::Path,
    sync::mpsc::{self, Receiver, SyncSender},
    thread,
};

/// Placements that may wait between selection and drawing.
const QUEUE_CAPACITY: usize = 10;
/// Cells drawn between progress reports.
const PROGRESS_INTERVAL: u64 = 100;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dimensions {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Dimensions {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MosaicConfig {
    /// Size each tile is drawn at in the mosaic.
    pub(crate) tile_size: Dimensions,
    /// Size of the target region each tile replaces.
    pub(crate) cell_size: Dimensions,
    /// Score surcharge per previous use of a tile.
    pub(crate) use_penalty: u64,
    /// Write the resampled tiles to [`SCALED_TILES_DIR`].
    pub(crate) debug: bool,
}

impl MosaicConfig {
    pub(crate) fn validate(&self) -> Result<(), MosaicError> {
        let dimensions = [
            ("tile width", self.tile_size.width),
            ("tile height", self.tile_size.height),
            ("cell width", self.cell_size.width),
            ("cell height", self.cell_size.height),
        ];
        match dimensions.into_iter().find(|&(_, value)| value == 0) {
            Some((parameter, _)) => Err(MosaicError::InvalidDimension { parameter }),
            None => Ok(()),
        }
    }
}

/// Number of cells across and down the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Grid {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
}

impl Grid {
    /// Smallest grid of `cell_size` cells covering `target`.
    pub(crate) fn covering(target: (u32, u32), cell_size: Dimensions) -> Self {
        Self {
            columns: target.0.div_ceil(cell_size.width),
            rows: target.1.div_ceil(cell_size.height),
        }
    }

    pub(crate) fn cell_count(self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Pixel size of the grid when every cell is `size`.
    pub(crate) fn scaled(self, size: Dimensions) -> Result<Dimensions, MosaicError> {
        let width = u64::from(self.columns) * u64::from(size.width);
        let height = u64::from(self.rows) * u64::from(size.height);
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(width), Ok(height)) => Ok(Dimensions::new(width, height)),
            _ => Err(MosaicError::OutputTooLarge { width, height }),
        }
    }

    /// Cell positions, row by row.
    fn positions(self) -> impl Iterator<Item = (u32, u32)> {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| (column, row)))
    }
}

/// A selected tile and the cell it fills.
#[derive(Debug, Clone, Copy)]
struct Placement {
    column: u32,
    row: u32,
    tile: usize,
}

/// Builds the tile bank from `sources` and assembles the mosaic of `target`.
pub(crate) fn create_mosaic<T, S>(
    target: &T,
    sources: &[S],
    config: &MosaicConfig,
) -> Result<RgbaImage, MosaicError>
where
    T: GenericImageView<Pixel = Rgba<u8>>,
    S: GenericImageView<Pixel = Rgba<u8>>,
{
    config.validate()?;

    let mut bank = TileBank::build(sources, config.tile_size, config.cell_size);
    if config.debug {
        save_tiles(bank.tiles(), Path::new(SCALED_TILES_DIR));
    }

    assemble(target, &mut bank, config)
}

/// Replaces every cell of `target` with its best tile from `bank`.
///
/// Selection runs on the calling thread in row-major order, so each cell sees
/// the use counts left by the cells before it. Drawing happens on a second
/// thread fed through a bounded queue. On error no mosaic is returned.
pub(crate) fn assemble<T>(
    target: &T,
    bank: &mut TileBank,
    config: &MosaicConfig,
) -> Result<RgbaImage, MosaicError>
where
    T: GenericImageView<Pixel = Rgba<u8>>,
{
    config.validate()?;

    let grid = Grid::covering(target.dimensions(), config.cell_size);
    let scaled_size = grid.scaled(config.cell_size)?;
    let mosaic_size = grid.scaled(config.tile_size)?;
    debug!(
        "target {}x{} -> {} grid of {} cells, mosaic {mosaic_size}",
        target.width(),
        target.height(),
        Dimensions::new(grid.columns, grid.rows),
        grid.cell_count(),
    );

    let scaled = resample(target, scaled_size.width, scaled_size.height);
    let mut selector = bank.selector(config.use_penalty);
    let tiles = selector.tiles();
    let tile_size = config.tile_size;
    let total = grid.cell_count();
    let (sender, receiver) = mpsc::sync_channel(QUEUE_CAPACITY);

    thread::scope(|scope| {
        let compositor =
            scope.spawn(move || draw(receiver, tiles, mosaic_size, tile_size, total));

        let selected = select_all(&scaled, &mut selector, grid, config.cell_size, sender);
        let mosaic = compositor
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        selected.map(|()| mosaic)
    })
}

/// Selector stage. Dropping `sender` on return closes the queue.
fn select_all(
    scaled: &RgbaImage,
    selector: &mut Selector<'_>,
    grid: Grid,
    cell_size: Dimensions,
    sender: SyncSender<Placement>,
) -> Result<(), MosaicError> {
    for (column, row) in grid.positions() {
        let cell = scaled.view(
            column * cell_size.width,
            row * cell_size.height,
            cell_size.width,
            cell_size.height,
        );
        let tile = selector.select(&*cell)?;
        if sender.send(Placement { column, row, tile }).is_err() {
            // compositor is gone; its panic surfaces on join
            break;
        }
    }
    Ok(())
}

/// Compositor stage. Sole writer of the mosaic; returns once the queue is
/// closed and drained.
fn draw(
    receiver: Receiver<Placement>,
    tiles: &[Tile],
    mosaic_size: Dimensions,
    tile_size: Dimensions,
    total: u64,
) -> RgbaImage {
    let mut mosaic = RgbaImage::new(mosaic_size.width, mosaic_size.height);
    let mut done = 0;

    for placement in receiver {
        imageops::replace(
            &mut mosaic,
            tiles[placement.tile].output(),
            i64::from(placement.column * tile_size.width),
            i64::from(placement.row * tile_size.height),
        );

        done += 1;
        if done % PROGRESS_INTERVAL == 0 || done == total {
            info!(
                "{done} / {total} cells ({:.1}%)",
                done as f64 / total as f64 * 100.0
            );
        }
    }

    mosaic
}
