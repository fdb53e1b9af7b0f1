#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

/// binary image thinning (skeletonization) module.
pub mod thinning;
