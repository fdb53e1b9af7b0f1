use argh::FromArgs;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use skelet::io::functional as F;
use skelet::{
    image::Image,
    imgproc::{
        self,
        parallel::ExecutionStrategy,
        thinning::{
            BinaryRaster, RoundReport, Thinning, ThinningConfig, ThinningError, ThinningVariant,
        },
        threshold::ThresholdType,
    },
};

/// How the grayscale image is binarized.
#[derive(Debug, Clone, Copy)]
enum Threshold {
    Otsu,
    Fixed(u8),
}

impl FromStr for Threshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("otsu") {
            return Ok(Threshold::Otsu);
        }
        s.parse::<u8>()
            .map(Threshold::Fixed)
            .map_err(|_| format!("expected `otsu` or a value in 0..=255, got `{s}`"))
    }
}

#[derive(FromArgs, Debug)]
/// Binarize an image, thin it and write the skeleton
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory where the outputs are written
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// thinning variant: zhang-suen or guo-hall
    #[argh(option, default = "ThinningVariant::ZhangSuen")]
    variant: ThinningVariant,

    /// binarization threshold in 0..=255, or `otsu`
    #[argh(option, default = "Threshold::Otsu")]
    threshold: Threshold,

    /// treat dark pixels as foreground
    #[argh(switch)]
    invert: bool,

    /// classify pixels on the current thread only
    #[argh(switch)]
    serial: bool,

    /// fail if the skeleton is not reached within this many rounds
    #[argh(option)]
    max_rounds: Option<usize>,

    /// write the intermediate raster of every round
    #[argh(switch)]
    save_rounds: bool,
}

fn save_round(path: &Path, raster: &BinaryRaster) -> Result<(), Box<dyn std::error::Error>> {
    let image = raster.to_image(255)?;
    F::write_image_png_gray8(path, &image)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    std::fs::create_dir_all(&args.output_dir)?;

    // read the image and convert it to grayscale
    let image: Image<u8, 3> = F::read_image_any_rgb8(&args.image_path)?;
    let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
    imgproc::color::gray_from_rgb_u8(&image, &mut gray)?;

    // binarize to 0 / 255
    let mut bin = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    match (args.threshold, args.invert) {
        (Threshold::Otsu, invert) => {
            let thres_type = if invert {
                ThresholdType::BinaryInv
            } else {
                ThresholdType::Binary
            };
            let t = imgproc::threshold::otsu_threshold(&gray, &mut bin, thres_type, 255)?;
            log::info!("otsu threshold: {t}");
        }
        (Threshold::Fixed(t), false) => {
            imgproc::threshold::threshold_binary(&gray, &mut bin, t, 255)?;
        }
        (Threshold::Fixed(t), true) => {
            imgproc::threshold::threshold_binary_inverse(&gray, &mut bin, t, 255)?;
        }
    }
    F::write_image_png_gray8(args.output_dir.join("binary.png"), &bin)?;

    // stop between two rounds on Ctrl-C
    let cancel_token = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            println!("Received Ctrl-C signal. Stopping after the current round.");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    let config = ThinningConfig {
        variant: args.variant,
        strategy: if args.serial {
            ExecutionStrategy::Serial
        } else {
            ExecutionStrategy::ParallelRows
        },
        max_rounds: args.max_rounds,
        ..Default::default()
    };

    let rounds_dir = args.output_dir.join("rounds");
    if args.save_rounds {
        std::fs::create_dir_all(&rounds_dir)?;
    }
    let mut on_round = |report: &RoundReport, raster: &BinaryRaster| {
        log::info!(
            "round {}: removed {} pixels, {} left",
            report.round,
            report.removed(),
            report.foreground
        );
        if args.save_rounds {
            let path = rounds_dir.join(format!("round_{:03}.png", report.round));
            if let Err(e) = save_round(&path, raster) {
                log::warn!("failed to write {}: {e}", path.display());
            }
        }
    };

    let mut skeleton = Image::<u8, 1>::from_size_val(bin.size(), 0)?;
    let result = Thinning::with_config(config)
        .cancel_flag(cancel_token)
        .observer(&mut on_round)
        .run(&bin, &mut skeleton);

    let stats = match result {
        Ok(stats) => stats,
        Err(ThinningError::Cancelled { rounds }) => {
            log::warn!("thinning cancelled after {rounds} rounds, skeleton not written");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{}: {} rounds, {} pixels removed, {} skeleton pixels",
        args.variant, stats.rounds, stats.removed, stats.foreground
    );

    // draw the skeleton in red over the grayscale input
    let mut overlay = Image::<u8, 3>::from_size_val(gray.size(), 0)?;
    imgproc::color::rgb_from_gray(&gray, &mut overlay)?;
    imgproc::draw::draw_mask_overlay(&mut overlay, &skeleton, [255, 0, 0])?;

    F::write_image_png_gray8(args.output_dir.join("skeleton.png"), &skeleton)?;
    F::write_image_png_rgb8(args.output_dir.join("overlay.png"), &overlay)?;

    Ok(())
}
