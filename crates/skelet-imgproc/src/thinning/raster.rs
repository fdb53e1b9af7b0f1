use std::ops::Range;

use skelet_image::{Image, ImageSize};

use super::error::ThinningError;
use super::neighborhood::{Direction, Neighborhood};

/// Smallest image side that still has an interior pixel.
pub const MIN_SIDE: usize = 3;

/// A validated binary image, `true` meaning foreground.
///
/// The size never changes once built. The 1-pixel border is read as
/// neighborhood context but is never eligible for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    size: ImageSize,
    pixels: Vec<bool>,
}

impl BinaryRaster {
    /// Build a raster from a single channel image.
    ///
    /// # Arguments
    ///
    /// * `src` - The input image, each pixel either `0` or `foreground`.
    /// * `foreground` - The value marking object pixels.
    ///
    /// # Errors
    ///
    /// Fails if `foreground` is zero, if the image is empty or smaller than
    /// 3x3, or if any pixel holds another value.
    pub fn from_image(src: &Image<u8, 1>, foreground: u8) -> Result<Self, ThinningError> {
        if foreground == 0 {
            return Err(ThinningError::InvalidForeground);
        }
        Self::check_size(src.size())?;

        let width = src.width();
        let pixels = src
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &value)| match value {
                0 => Ok(false),
                v if v == foreground => Ok(true),
                _ => Err(ThinningError::NonBinaryPixel {
                    x: i % width,
                    y: i / width,
                    value,
                    foreground,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            size: src.size(),
            pixels,
        })
    }

    /// Build a raster by evaluating `f(x, y)` on every pixel.
    ///
    /// # Errors
    ///
    /// Fails if the size is empty or smaller than 3x3.
    pub fn from_fn(
        size: ImageSize,
        mut f: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self, ThinningError> {
        Self::check_size(size)?;

        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }

        Ok(Self { size, pixels })
    }

    fn check_size(size: ImageSize) -> Result<(), ThinningError> {
        if size.width == 0 || size.height == 0 {
            return Err(ThinningError::EmptyImage);
        }
        if size.width < MIN_SIDE || size.height < MIN_SIDE {
            return Err(ThinningError::ImageTooSmall {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    /// Write the raster into `dst`, using `foreground` for object pixels.
    ///
    /// # Errors
    ///
    /// Fails if `dst` does not have the raster size.
    pub fn write_to(&self, dst: &mut Image<u8, 1>, foreground: u8) -> Result<(), ThinningError> {
        if dst.size() != self.size {
            return Err(ThinningError::SizeMismatch(
                self.width(),
                self.height(),
                dst.width(),
                dst.height(),
            ));
        }

        dst.as_slice_mut()
            .iter_mut()
            .zip(&self.pixels)
            .for_each(|(d, &p)| *d = if p { foreground } else { 0 });

        Ok(())
    }

    /// Convert the raster into a new image using `foreground` for object pixels.
    pub fn to_image(&self, foreground: u8) -> Result<Image<u8, 1>, ThinningError> {
        let mut dst = Image::from_size_val(self.size, 0u8)?;
        self.write_to(&mut dst, foreground)?;
        Ok(dst)
    }

    /// Size of the raster in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Value at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels[y * self.width() + x])
    }

    /// Whether `(x, y)` is a foreground pixel. Outside the raster is background.
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    /// Whether `(x, y)` lies on the 1-pixel border or outside the raster.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        // width and height are at least MIN_SIDE
        x == 0 || y == 0 || x >= self.width() - 1 || y >= self.height() - 1
    }

    /// Rows that hold interior pixels.
    pub fn interior_rows(&self) -> Range<usize> {
        1..self.height() - 1
    }

    /// Columns that hold interior pixels.
    pub fn interior_cols(&self) -> Range<usize> {
        1..self.width() - 1
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Iterate over the coordinates of the foreground pixels in scan order.
    pub fn foreground_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width();
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(move |(i, _)| (i % width, i / width))
    }

    /// The 8-neighborhood of an interior pixel.
    ///
    /// # Errors
    ///
    /// [`ThinningError::BorderPixel`] if `(x, y)` is on the border or outside.
    pub fn neighborhood(&self, x: usize, y: usize) -> Result<Neighborhood, ThinningError> {
        if self.is_border(x, y) {
            return Err(ThinningError::BorderPixel { x, y });
        }

        let mut ring = [false; 8];
        for direction in Direction::CLOCKWISE {
            let (dx, dy) = direction.offset();
            let nx = x.wrapping_add_signed(dx);
            let ny = y.wrapping_add_signed(dy);
            ring[direction as usize] = self.pixels[ny * self.width() + nx];
        }

        Ok(Neighborhood::from_ring(ring))
    }

    /// Set `(x, y)` to background. Returns whether the pixel was foreground.
    pub(crate) fn clear(&mut self, x: usize, y: usize) -> bool {
        let idx = y * self.width() + x;
        std::mem::replace(&mut self.pixels[idx], false)
    }
}
