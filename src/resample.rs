use image::{GenericImageView, Rgba, RgbaImage};

/// Resamples `source` to `width` by `height` with nearest-neighbor sampling.
///
/// Destination pixel `(x, y)` copies source pixel
/// `(x * source_width / width, y * source_height / height)`, truncating. Equal
/// sizes give an identical copy.
pub(crate) fn resample<I>(source: &I, width: u32, height: u32) -> RgbaImage
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (source_width, source_height) = source.dimensions();
    if source_width == 0 || source_height == 0 {
        return RgbaImage::new(width, height);
    }

    RgbaImage::from_fn(width, height, |x, y| {
        source.get_pixel(
            nearest(x, width, source_width),
            nearest(y, height, source_height),
        )
    })
}

fn nearest(position: u32, target_len: u32, source_len: u32) -> u32 {
    // position < target_len, so the quotient is < source_len and fits in u32
    (u64::from(position) * u64::from(source_len) / u64::from(target_len)) as u32
}
