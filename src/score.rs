use crate::bank::Tile;
use image::{GenericImageView, Rgba, RgbaImage};

/// Scores `tile` against one target cell. Lower is better.
///
/// The color distance is computed against the tile's comparison bitmap, then
/// `use_count * use_penalty` is added so frequently chosen tiles lose ground.
pub(crate) fn score<C>(cell: &C, tile: &Tile, use_count: u32, use_penalty: u64) -> u64
where
    C: GenericImageView<Pixel = Rgba<u8>>,
{
    color_distance(cell, tile.compare())
        .saturating_add(u64::from(use_count).saturating_mul(use_penalty))
}

/// Per-channel mean squared difference over R, G and B, summed, then square
/// rooted. Every division floors. Alpha does not participate.
pub(crate) fn color_distance<C>(cell: &C, compare: &RgbaImage) -> u64
where
    C: GenericImageView<Pixel = Rgba<u8>>,
{
    debug_assert_eq!(cell.dimensions(), compare.dimensions());

    let pixel_count = u64::from(compare.width()) * u64::from(compare.height());
    if pixel_count == 0 {
        return 0;
    }

    let mut channel_sums = [0_u64; 3];
    for (x, y, tile_pixel) in compare.enumerate_pixels() {
        let cell_pixel = cell.get_pixel(x, y);
        // zip stops after three channels
        for (sum, (&a, &b)) in channel_sums
            .iter_mut()
            .zip(tile_pixel.0.iter().zip(cell_pixel.0.iter()))
        {
            let diff = u64::from(a.abs_diff(b));
            *sum += diff * diff;
        }
    }

    channel_sums
        .iter()
        .map(|sum| sum / pixel_count)
        .sum::<u64>()
        .isqrt()
}
