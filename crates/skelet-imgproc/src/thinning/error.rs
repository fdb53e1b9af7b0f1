use skelet_image::ImageError;

use crate::parallel::ParallelError;

/// Errors raised while validating or thinning a binary image.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ThinningError {
    /// The input image has zero width or height.
    #[error("Image is empty")]
    EmptyImage,

    /// The input image is smaller than the 3x3 neighborhood window.
    #[error("Image of size {width}x{height} is smaller than 3x3")]
    ImageTooSmall {
        /// Width of the rejected image.
        width: usize,
        /// Height of the rejected image.
        height: usize,
    },

    /// A pixel holds a value that is neither background nor the foreground value.
    #[error("Pixel ({x}, {y}) has value {value}, expected 0 or {foreground}")]
    NonBinaryPixel {
        /// Column of the offending pixel.
        x: usize,
        /// Row of the offending pixel.
        y: usize,
        /// Value found at the pixel.
        value: u8,
        /// Foreground value the image was declared with.
        foreground: u8,
    },

    /// The foreground value cannot be the background value.
    #[error("Foreground value must be non-zero")]
    InvalidForeground,

    /// Source and destination sizes differ.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    SizeMismatch(usize, usize, usize, usize),

    /// A pixel on the 1-pixel image border was classified.
    ///
    /// Border pixels have an incomplete 8-neighborhood and are never removal
    /// candidates; reaching this is a bug in the caller's scan bounds.
    #[error("Pixel ({x}, {y}) lies on the image border and has no full neighborhood")]
    BorderPixel {
        /// Column of the pixel.
        x: usize,
        /// Row of the pixel.
        y: usize,
    },

    /// Unknown thinning variant name.
    #[error("Unknown thinning variant: {0}")]
    UnknownVariant(String),

    /// The run was cancelled between two rounds.
    #[error("Thinning cancelled after {rounds} rounds")]
    Cancelled {
        /// Number of completed rounds.
        rounds: usize,
    },

    /// The optional round limit was reached before convergence.
    #[error("Thinning did not converge within {limit} rounds")]
    RoundLimitReached {
        /// The configured limit.
        limit: usize,
    },

    /// Error from the parallel executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// Error from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),
}
