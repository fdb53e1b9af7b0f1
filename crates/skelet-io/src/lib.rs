#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
///
/// Decoding and encoding are delegated to the `image` crate. See
/// [`functional::read_image_any_gray8`] for automatic format detection.
pub mod functional;

pub use error::IoError;
