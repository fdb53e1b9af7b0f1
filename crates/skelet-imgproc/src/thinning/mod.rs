//! Iterative thinning of binary images.
//!
//! A round runs two complementary sub-iterations. Each sub-iteration first
//! marks every removable pixel against a frozen copy of the raster and then
//! deletes all marks at once. Rounds repeat until one removes nothing, which
//! leaves a skeleton one pixel wide that keeps the 8-connectivity of the
//! input. The removal rule is either [`ZhangSuen`] or [`GuoHall`], selected
//! at runtime through [`ThinningVariant`].
//!
//! Pixels on the 1-pixel image border are never removed.

mod driver;
mod error;
mod neighborhood;
mod pass;
mod raster;
mod rules;

pub use driver::{
    thin, thin_inplace, thin_with_config, ConvergenceState, RoundReport, Thinning,
    ThinningConfig, ThinningObserver, ThinningStats,
};
pub use error::ThinningError;
pub use neighborhood::{Direction, Neighborhood};
pub use pass::{commit, mark_candidates, run_pass, RemovalMarks};
pub use raster::{BinaryRaster, MIN_SIDE};
pub use rules::{GuoHall, RemovalRule, SubIteration, ThinningVariant, ZhangSuen};
