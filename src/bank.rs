use crate::{error::MosaicError, mosaic::Dimensions, resample::resample, score::score};
use image::{GenericImageView, Rgba, RgbaImage};
use log::{debug, warn};

/// One candidate tile, stored at output and comparison resolution.
#[derive(Debug, Clone)]
pub(crate) struct Tile {
    output: RgbaImage,
    compare: RgbaImage,
}

impl Tile {
    pub(crate) fn new<I>(source: &I, tile_size: Dimensions, cell_size: Dimensions) -> Self
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        Self {
            output: resample(source, tile_size.width, tile_size.height),
            compare: resample(source, cell_size.width, cell_size.height),
        }
    }

    /// Bitmap drawn into the mosaic.
    pub(crate) fn output(&self) -> &RgbaImage {
        &self.output
    }

    /// Bitmap scored against target cells.
    pub(crate) fn compare(&self) -> &RgbaImage {
        &self.compare
    }
}

/// The fixed set of candidate tiles plus how often each one has won a cell.
///
/// Tiles are indexed by their position in the source sequence. That position is
/// also the tie-break when two tiles score equally.
#[derive(Debug, Clone, Default)]
pub(crate) struct TileBank {
    tiles: Vec<Tile>,
    use_counts: Vec<u32>,
}

impl TileBank {
    /// Builds one tile per source, in source order, with every use count at zero.
    ///
    /// An empty `sources` yields an empty bank; the build only fails once a
    /// tile has to be selected from it.
    pub(crate) fn build<I>(sources: &[I], tile_size: Dimensions, cell_size: Dimensions) -> Self
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        if sources.is_empty() {
            warn!("no source images supplied; tile bank is empty");
        }

        let tiles: Vec<_> = sources
            .iter()
            .map(|source| Tile::new(source, tile_size, cell_size))
            .collect();
        debug!(
            "built tile bank of {} tiles ({tile_size} output, {cell_size} compare)",
            tiles.len()
        );

        Self {
            use_counts: vec![0; tiles.len()],
            tiles,
        }
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn use_counts(&self) -> &[u32] {
        &self.use_counts
    }

    /// Hands out the only writer of the use counts. The tiles themselves stay
    /// shareable through [`Selector::tiles`] while the selector is alive.
    pub(crate) fn selector(&mut self, use_penalty: u64) -> Selector<'_> {
        Selector {
            tiles: &self.tiles,
            use_counts: &mut self.use_counts,
            use_penalty,
        }
    }
}

/// Picks the winning tile for each cell, in order, and records the win.
#[derive(Debug)]
pub(crate) struct Selector<'a> {
    tiles: &'a [Tile],
    use_counts: &'a mut [u32],
    use_penalty: u64,
}

impl<'a> Selector<'a> {
    pub(crate) fn tiles(&self) -> &'a [Tile] {
        self.tiles
    }

    /// Returns the index of the lowest-scoring tile for `cell` and bumps its use
    /// count. The first tile in bank order wins ties.
    pub(crate) fn select<C>(&mut self, cell: &C) -> Result<usize, MosaicError>
    where
        C: GenericImageView<Pixel = Rgba<u8>>,
    {
        let mut best: Option<(usize, u64)> = None;
        for (index, (tile, &use_count)) in self.tiles.iter().zip(self.use_counts.iter()).enumerate()
        {
            let candidate = score(cell, tile, use_count, self.use_penalty);
            if best.is_none_or(|(_, lowest)| candidate < lowest) {
                best = Some((index, candidate));
            }
        }

        let (winner, _) = best.ok_or(MosaicError::EmptyBank)?;
        self.use_counts[winner] += 1;
        Ok(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::TileBank;
    use crate::{error::MosaicError, mosaic::Dimensions};
    use image::{Rgba, RgbaImage};

    const TILE: Dimensions = Dimensions::new(8, 6);
    const CELL: Dimensions = Dimensions::new(2, 2);

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
        let [r, g, b] = color;
        RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))
    }

    #[test]
    fn build_keeps_order_and_resolutions() {
        let sources = vec![
            solid(3, 9, [255, 0, 0]),
            solid(40, 20, [0, 255, 0]),
            solid(1, 1, [0, 0, 255]),
        ];
        let bank = TileBank::build(&sources, TILE, CELL);

        assert_eq!(bank.tiles().len(), 3);
        assert_eq!(bank.use_counts(), &[0, 0, 0]);
        for (tile, source) in bank.tiles().iter().zip(&sources) {
            assert_eq!(tile.output().dimensions(), (8, 6));
            assert_eq!(tile.compare().dimensions(), (2, 2));
            assert_eq!(tile.output().get_pixel(0, 0), source.get_pixel(0, 0));
        }
    }

    #[test]
    fn empty_bank_fails_on_selection() {
        let mut bank = TileBank::build::<RgbaImage>(&[], TILE, CELL);
        assert!(bank.tiles().is_empty());

        let cell = solid(2, 2, [0, 0, 0]);
        assert_eq!(bank.selector(15).select(&cell), Err(MosaicError::EmptyBank));
    }

    #[test]
    fn picks_closest_color_without_penalty() {
        let sources = vec![
            solid(4, 4, [0, 0, 0]),
            solid(4, 4, [200, 40, 40]),
            solid(4, 4, [255, 255, 255]),
        ];
        let mut bank = TileBank::build(&sources, TILE, CELL);
        let mut selector = bank.selector(0);

        assert_eq!(selector.select(&solid(2, 2, [190, 50, 30])), Ok(1));
        assert_eq!(selector.select(&solid(2, 2, [240, 250, 250])), Ok(2));
        assert_eq!(selector.select(&solid(2, 2, [190, 50, 30])), Ok(1));
        assert_eq!(bank.use_counts(), &[0, 2, 1]);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let sources = vec![solid(4, 4, [90, 90, 90]), solid(4, 4, [90, 90, 90])];
        let mut bank = TileBank::build(&sources, TILE, CELL);
        let mut selector = bank.selector(0);

        for _ in 0..3 {
            assert_eq!(selector.select(&solid(2, 2, [10, 10, 10])), Ok(0));
        }
        assert_eq!(bank.use_counts(), &[3, 0]);
    }

    #[test]
    fn penalty_cycles_through_tiles() {
        let colors = [[100, 100, 100], [101, 100, 100], [100, 102, 100], [100, 100, 103]];
        let sources: Vec<_> = colors
            .into_iter()
            .map(|color| solid(4, 4, color))
            .collect();
        let mut bank = TileBank::build(&sources, TILE, CELL);
        let mut selector = bank.selector(1000);

        let cell = solid(2, 2, [100, 100, 100]);
        let picks = (0..8)
            .map(|_| selector.select(&cell))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(picks, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(bank.use_counts(), &[2, 2, 2, 2]);
    }
}
