use skelet_image::{Image, ImageError};

/// Paints every non-zero pixel of `mask` onto `img` with `color`, inplace.
///
/// Typical use is drawing a skeleton over the image it was extracted from.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `mask` - A single channel mask with the same size as `img`.
/// * `color` - The color of the painted pixels as an array of `C` elements.
///
/// # Returns
///
/// The number of painted pixels.
pub fn draw_mask_overlay<const C: usize>(
    img: &mut Image<u8, C>,
    mask: &Image<u8, 1>,
    color: [u8; C],
) -> Result<usize, ImageError> {
    if img.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            img.cols(),
            img.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    let mut painted = 0;
    img.as_slice_mut()
        .chunks_exact_mut(C)
        .zip(mask.as_slice())
        .filter(|(_, m)| **m != 0)
        .for_each(|(pixel, _)| {
            pixel.copy_from_slice(&color);
            painted += 1;
        });

    Ok(painted)
}
