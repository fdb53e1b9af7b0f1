use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use skelet_image::Image;

use crate::parallel::ExecutionStrategy;

use super::error::ThinningError;
use super::pass::run_pass;
use super::raster::BinaryRaster;
use super::rules::{SubIteration, ThinningVariant};

/// Whether the driver still has rounds to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergenceState {
    /// At least one pixel was removed by the last round, or no round ran yet.
    #[default]
    Running,
    /// A full round removed nothing. The raster is final.
    Converged,
}

/// Summary of a single round, handed to the observer after the round commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round index.
    pub round: usize,
    /// Pixels removed by the first sub-iteration.
    pub first_pass_removed: usize,
    /// Pixels removed by the second sub-iteration.
    pub second_pass_removed: usize,
    /// Foreground pixels left after the round.
    pub foreground: usize,
    /// State of the driver after the round.
    pub state: ConvergenceState,
}

impl RoundReport {
    /// Pixels removed by the whole round.
    pub fn removed(&self) -> usize {
        self.first_pass_removed + self.second_pass_removed
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinningStats {
    /// Number of rounds run, including the final round that removed nothing.
    pub rounds: usize,
    /// Total number of removed pixels.
    pub removed: usize,
    /// Foreground pixels in the skeleton.
    pub foreground: usize,
}

/// Receives a report and the raster state after every round.
pub trait ThinningObserver {
    /// Called once per round, after both sub-iterations committed.
    fn on_round(&mut self, report: &RoundReport, raster: &BinaryRaster);
}

impl<F> ThinningObserver for F
where
    F: FnMut(&RoundReport, &BinaryRaster),
{
    fn on_round(&mut self, report: &RoundReport, raster: &BinaryRaster) {
        self(report, raster)
    }
}

/// Parameters of a thinning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinningConfig {
    /// The removal rule set.
    pub variant: ThinningVariant,
    /// Value of object pixels in the input and output images. Must be non-zero.
    pub foreground: u8,
    /// How the classify phase of each pass is scheduled.
    pub strategy: ExecutionStrategy,
    /// Fail with [`ThinningError::RoundLimitReached`] instead of running more rounds.
    pub max_rounds: Option<usize>,
}

impl Default for ThinningConfig {
    fn default() -> Self {
        Self {
            variant: ThinningVariant::default(),
            foreground: 255,
            strategy: ExecutionStrategy::default(),
            max_rounds: None,
        }
    }
}

/// Convergence driver: repeats rounds of two sub-iterations until a round
/// removes nothing.
///
/// # Examples
///
/// ```
/// use skelet_image::{Image, ImageSize};
/// use skelet_imgproc::thinning::{Thinning, ThinningVariant};
///
/// #[rustfmt::skip]
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 5, height: 5 },
///     vec![
///         0, 0, 0, 0, 0,
///         0, 255, 255, 255, 0,
///         0, 255, 255, 255, 0,
///         0, 255, 255, 255, 0,
///         0, 0, 0, 0, 0,
///     ],
/// ).unwrap();
///
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// let mut rounds = Vec::new();
/// let mut observer = |report: &skelet_imgproc::thinning::RoundReport,
///                     _: &skelet_imgproc::thinning::BinaryRaster| rounds.push(report.removed());
///
/// let stats = Thinning::new(ThinningVariant::GuoHall)
///     .observer(&mut observer)
///     .run(&src, &mut dst)
///     .unwrap();
///
/// assert_eq!(stats.foreground, 1);
/// assert_eq!(rounds, vec![8, 0]);
/// assert_eq!(dst.get_pixel(2, 2, 0), Ok(&255));
/// ```
pub struct Thinning<'a> {
    config: ThinningConfig,
    observer: Option<&'a mut dyn ThinningObserver>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Thinning<'a> {
    /// Create a driver for `variant` with the default configuration.
    pub fn new(variant: ThinningVariant) -> Self {
        Self::with_config(ThinningConfig {
            variant,
            ..Default::default()
        })
    }

    /// Create a driver from a full configuration.
    pub fn with_config(config: ThinningConfig) -> Self {
        Self {
            config,
            observer: None,
            cancel: None,
        }
    }

    /// Set the foreground sentinel.
    pub fn foreground(mut self, foreground: u8) -> Self {
        self.config.foreground = foreground;
        self
    }

    /// Set the execution strategy of the classify phase.
    pub fn strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Cap the number of rounds.
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = Some(max_rounds);
        self
    }

    /// Attach an observer called after every round.
    pub fn observer(mut self, observer: &'a mut dyn ThinningObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attach a flag that stops the run before the next round once set.
    pub fn cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The configuration of this driver.
    pub fn config(&self) -> &ThinningConfig {
        &self.config
    }

    /// Thin a binary image.
    ///
    /// The input is validated before the first pass. `dst` is only written
    /// once the run converged; on error it is left untouched.
    ///
    /// # Arguments
    ///
    /// * `src` - The binary input image with values `0` and the foreground sentinel.
    /// * `dst` - The output skeleton with the same size as `src`.
    ///
    /// # Returns
    ///
    /// The statistics of the run.
    pub fn run(
        &mut self,
        src: &Image<u8, 1>,
        dst: &mut Image<u8, 1>,
    ) -> Result<ThinningStats, ThinningError> {
        let mut raster = BinaryRaster::from_image(src, self.config.foreground)?;

        if src.size() != dst.size() {
            return Err(ThinningError::SizeMismatch(
                src.width(),
                src.height(),
                dst.width(),
                dst.height(),
            ));
        }

        let stats = self.run_raster(&mut raster)?;
        raster.write_to(dst, self.config.foreground)?;

        Ok(stats)
    }

    /// Thin a raster inplace.
    ///
    /// On cancellation or when the round limit is hit, the raster holds the
    /// state after the last completed round.
    pub fn run_raster(&mut self, raster: &mut BinaryRaster) -> Result<ThinningStats, ThinningError> {
        let rule = self.config.variant.rule();
        let initial = raster.foreground_count();

        log::debug!(
            "thinning {} image with {} foreground pixels using {}",
            raster.size(),
            initial,
            self.config.variant
        );

        let mut state = ConvergenceState::Running;
        let mut rounds = 0;

        while state == ConvergenceState::Running {
            if self.is_cancelled() {
                log::debug!("thinning cancelled after {rounds} rounds");
                return Err(ThinningError::Cancelled { rounds });
            }
            if let Some(limit) = self.config.max_rounds {
                if rounds >= limit {
                    return Err(ThinningError::RoundLimitReached { limit });
                }
            }

            let [first, second] = SubIteration::ROUND;
            let first_pass_removed = run_pass(raster, rule, first, self.config.strategy)?;
            let second_pass_removed = run_pass(raster, rule, second, self.config.strategy)?;
            rounds += 1;

            if first_pass_removed + second_pass_removed == 0 {
                state = ConvergenceState::Converged;
            }

            let report = RoundReport {
                round: rounds,
                first_pass_removed,
                second_pass_removed,
                foreground: raster.foreground_count(),
                state,
            };
            log::debug!(
                "round {}: removed {} + {}, {} left",
                report.round,
                report.first_pass_removed,
                report.second_pass_removed,
                report.foreground
            );

            if let Some(observer) = self.observer.as_mut() {
                observer.on_round(&report, raster);
            }
        }

        let foreground = raster.foreground_count();
        log::info!(
            "thinning converged after {rounds} rounds, {foreground} of {initial} pixels kept"
        );

        Ok(ThinningStats {
            rounds,
            removed: initial - foreground,
            foreground,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Thin a binary image with the given variant and the default configuration.
///
/// # Arguments
///
/// * `src` - The binary input image, `0` for background and `255` for foreground.
/// * `dst` - The output skeleton.
/// * `variant` - The removal rule set.
pub fn thin(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    variant: ThinningVariant,
) -> Result<ThinningStats, ThinningError> {
    Thinning::new(variant).run(src, dst)
}

/// Thin a binary image with a full configuration.
pub fn thin_with_config(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    config: &ThinningConfig,
) -> Result<ThinningStats, ThinningError> {
    Thinning::with_config(*config).run(src, dst)
}

/// Thin a raster inplace with the given variant.
pub fn thin_inplace(
    raster: &mut BinaryRaster,
    variant: ThinningVariant,
) -> Result<ThinningStats, ThinningError> {
    Thinning::new(variant).run_raster(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skelet_image::ImageSize;

    // 9x9 image holding a 5x5 square of foreground at rows and columns 2..=6
    fn square_image(foreground: u8) -> Result<Image<u8, 1>, ThinningError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let data = (0..size.area())
            .map(|i| {
                let (x, y) = (i % 9, i / 9);
                if (2..=6).contains(&x) && (2..=6).contains(&y) {
                    foreground
                } else {
                    0
                }
            })
            .collect();
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn test_square_collapses_to_center() -> Result<(), ThinningError> {
        let src = square_image(255)?;
        for variant in [ThinningVariant::ZhangSuen, ThinningVariant::GuoHall] {
            let mut dst = Image::from_size_val(src.size(), 0u8)?;
            let stats = thin(&src, &mut dst, variant)?;
            assert_eq!(stats.rounds, 3);
            assert_eq!(stats.removed, 24);
            assert_eq!(stats.foreground, 1);
            assert_eq!(dst.get_pixel(4, 4, 0)?, &255);
        }
        Ok(())
    }

    #[test]
    fn test_observer_sees_every_round() -> Result<(), ThinningError> {
        let src = square_image(255)?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let mut reports = Vec::new();
        let mut observer = |report: &RoundReport, raster: &BinaryRaster| {
            assert_eq!(report.foreground, raster.foreground_count());
            reports.push(*report);
        };
        Thinning::new(ThinningVariant::ZhangSuen)
            .strategy(ExecutionStrategy::Serial)
            .observer(&mut observer)
            .run(&src, &mut dst)?;

        let removed: Vec<_> = reports.iter().map(RoundReport::removed).collect();
        assert_eq!(removed, vec![17, 7, 0]);
        assert_eq!(reports[0].round, 1);
        assert_eq!(reports[1].state, ConvergenceState::Running);
        assert_eq!(reports[2].state, ConvergenceState::Converged);
        assert_eq!(reports[2].foreground, 1);
        Ok(())
    }

    #[test]
    fn test_empty_foreground_converges_in_one_round() -> Result<(), ThinningError> {
        let src = Image::from_size_val([6, 4].into(), 0u8)?;
        let mut dst = Image::from_size_val(src.size(), 7u8)?;
        let stats = thin(&src, &mut dst, ThinningVariant::GuoHall)?;
        assert_eq!(
            stats,
            ThinningStats {
                rounds: 1,
                removed: 0,
                foreground: 0
            }
        );
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_custom_foreground() -> Result<(), ThinningError> {
        let src = square_image(1)?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        let config = ThinningConfig {
            foreground: 1,
            ..Default::default()
        };
        thin_with_config(&src, &mut dst, &config)?;
        assert_eq!(dst.as_slice().iter().filter(|&&v| v == 1).count(), 1);

        // the default sentinel rejects the same image
        assert_eq!(
            thin(&src, &mut dst, ThinningVariant::ZhangSuen),
            Err(ThinningError::NonBinaryPixel {
                x: 2,
                y: 2,
                value: 1,
                foreground: 255
            })
        );
        Ok(())
    }

    #[test]
    fn test_size_mismatch_leaves_dst() -> Result<(), ThinningError> {
        let src = square_image(255)?;
        let mut dst = Image::from_size_val([8, 9].into(), 3u8)?;
        assert_eq!(
            thin(&src, &mut dst, ThinningVariant::ZhangSuen),
            Err(ThinningError::SizeMismatch(9, 9, 8, 9))
        );
        assert!(dst.as_slice().iter().all(|&v| v == 3));
        Ok(())
    }

    #[test]
    fn test_cancel_before_first_round() -> Result<(), ThinningError> {
        let src = square_image(255)?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        let flag = Arc::new(AtomicBool::new(true));
        let result = Thinning::new(ThinningVariant::ZhangSuen)
            .cancel_flag(flag)
            .run(&src, &mut dst);
        assert_eq!(result, Err(ThinningError::Cancelled { rounds: 0 }));
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_cancel_between_rounds() -> Result<(), ThinningError> {
        let mut raster = BinaryRaster::from_fn([9, 9].into(), |x, y| {
            (2..=6).contains(&x) && (2..=6).contains(&y)
        })?;

        let flag = Arc::new(AtomicBool::new(false));
        let trigger = flag.clone();
        let mut observer =
            move |_: &RoundReport, _: &BinaryRaster| trigger.store(true, Ordering::Relaxed);

        let result = Thinning::new(ThinningVariant::ZhangSuen)
            .observer(&mut observer)
            .cancel_flag(flag)
            .run_raster(&mut raster);
        assert_eq!(result, Err(ThinningError::Cancelled { rounds: 1 }));
        // the first round completed before the flag was seen
        assert_eq!(raster.foreground_count(), 25 - 17);
        Ok(())
    }

    #[test]
    fn test_round_limit() -> Result<(), ThinningError> {
        let src = square_image(255)?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let result = Thinning::new(ThinningVariant::ZhangSuen)
            .max_rounds(2)
            .run(&src, &mut dst);
        assert_eq!(result, Err(ThinningError::RoundLimitReached { limit: 2 }));

        let stats = Thinning::new(ThinningVariant::ZhangSuen)
            .max_rounds(3)
            .run(&src, &mut dst)?;
        assert_eq!(stats.rounds, 3);
        Ok(())
    }

    #[test]
    fn test_thin_inplace_is_idempotent() -> Result<(), ThinningError> {
        let mut raster = BinaryRaster::from_fn([12, 10].into(), |x, y| {
            (2..=9).contains(&x) && (3..=6).contains(&y)
        })?;
        thin_inplace(&mut raster, ThinningVariant::GuoHall)?;
        let skeleton = raster.clone();

        let stats = thin_inplace(&mut raster, ThinningVariant::GuoHall)?;
        assert_eq!(stats.rounds, 1);
        assert_eq!(stats.removed, 0);
        assert_eq!(raster, skeleton);
        Ok(())
    }

    #[test]
    fn test_config_builder() {
        let thinning = Thinning::new(ThinningVariant::GuoHall)
            .foreground(9)
            .strategy(ExecutionStrategy::Fixed(2))
            .max_rounds(4);
        assert_eq!(
            thinning.config(),
            &ThinningConfig {
                variant: ThinningVariant::GuoHall,
                foreground: 9,
                strategy: ExecutionStrategy::Fixed(2),
                max_rounds: Some(4),
            }
        );
    }
}
