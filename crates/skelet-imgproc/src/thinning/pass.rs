use crate::parallel::{self, ExecutionStrategy};

use super::error::ThinningError;
use super::raster::BinaryRaster;
use super::rules::{RemovalRule, SubIteration};

/// Pixels selected for deletion by one sub-iteration, as `(x, y)` in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalMarks(Vec<(usize, usize)>);

impl RemovalMarks {
    /// Number of marked pixels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pixel was marked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the marked coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.0.iter()
    }
}

/// Classify every interior foreground pixel of `raster` with `rule`.
///
/// The raster is only read, so every decision of the pass sees the same
/// state. Rows are independent and may be processed in parallel.
pub fn mark_candidates(
    raster: &BinaryRaster,
    rule: &dyn RemovalRule,
    step: SubIteration,
    strategy: ExecutionStrategy,
) -> Result<RemovalMarks, ThinningError> {
    let cols = raster.interior_cols();
    let marks = parallel::collect_rows(strategy, raster.interior_rows(), |y| {
        let mut row_marks = Vec::new();
        for x in cols.clone() {
            if !raster.is_foreground(x, y) {
                continue;
            }
            if rule.is_removable(&raster.neighborhood(x, y)?, step) {
                row_marks.push((x, y));
            }
        }
        Ok::<_, ThinningError>(row_marks)
    })?;

    Ok(RemovalMarks(marks))
}

/// Delete all marked pixels at once. Returns how many were cleared.
pub fn commit(raster: &mut BinaryRaster, marks: RemovalMarks) -> usize {
    marks
        .0
        .into_iter()
        .filter(|&(x, y)| raster.clear(x, y))
        .count()
}

/// Run one sub-iteration over the whole raster: mark, then commit.
///
/// # Arguments
///
/// * `raster` - The raster, updated inplace.
/// * `rule` - The removal rule.
/// * `step` - Which sub-iteration of the round this is.
/// * `strategy` - How the classify phase is scheduled.
///
/// # Returns
///
/// The number of removed pixels.
pub fn run_pass(
    raster: &mut BinaryRaster,
    rule: &dyn RemovalRule,
    step: SubIteration,
    strategy: ExecutionStrategy,
) -> Result<usize, ThinningError> {
    let marks = mark_candidates(raster, rule, step, strategy)?;
    let removed = commit(raster, marks);
    log::trace!("{step:?} sub-iteration removed {removed} pixels");
    Ok(removed)
}
