//! soq - compare an image with a processed version of it
//!
//! Reports per-channel MSE, PSNR and SSIM between an original and a version
//! (recompressed, resized, colour converted, ...).

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use soq_core::{ChannelOrder, PixelBuffer};
use soq_ops::DiscardSink;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod compare;

/// Environment variable holding a log filter; overrides `-v`.
const LOG_ENV: &str = "SOQ_LOG";

#[derive(Parser, Debug)]
#[command(name = "soq")]
#[command(version, about = "Compare an image with a processed version of it")]
#[command(long_about = "
Measures how far a processed image deviates from its original, per channel.

The original is converted and resampled to the version's channel order and
size before comparison. Without a metric flag, PSNR is reported.

Examples:
  soq original.png version.jpg                # PSNR per channel
  soq --ssim --mse original.png version.png   # SSIM and MSE
  soq -C YUV original.png version.png         # compare in YUV
  soq -B 20 --ssim a.png b.png                # time 20 runs
")]
struct Cli {
    /// Original (reference) image
    original: PathBuf,

    /// Processed version of the original
    #[arg(id = "version_image", value_name = "VERSION")]
    version_image: PathBuf,

    /// Perform PSNR analysis
    #[arg(long, action = ArgAction::Count)]
    psnr: u8,

    /// Perform SSIM analysis
    #[arg(long, action = ArgAction::Count)]
    ssim: u8,

    /// Perform MSE analysis
    #[arg(long, action = ArgAction::Count)]
    mse: u8,

    /// Run the analysis N times, printing results once
    #[arg(short = 'B', long, value_name = "N", default_value_t = 1)]
    benchmark: u64,

    /// Convert the version to this channel order first (RGB/BGR/YUV)
    #[arg(
        short = 'C',
        long = "colourspace",
        visible_alias = "colorspace",
        value_name = "ORDER"
    )]
    colourspace: Option<String>,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if let Err(io_err) = err.print() {
                eprintln!("{err}\nCould not print usage: {io_err}");
            }
            return usage_exit(err.kind());
        }
    };

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Help goes to stdout and, like any usage problem, fails.
fn usage_exit(kind: ErrorKind) -> ExitCode {
    ExitCode::from(usage_status(kind))
}

fn usage_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let metrics = compare::selected_metrics(cli.psnr > 0, cli.ssim > 0, cli.mse > 0);
    debug!(?metrics, iterations = cli.benchmark, "selected metrics");

    let mut original = load_image(&cli.original)?;
    let mut version = load_image(&cli.version_image)?;

    if let Some(label) = &cli.colourspace {
        soq_ops::convert_channel_order(&mut version, ChannelOrder::parse(label))?;
    }

    let alignment = soq_ops::align(&mut original, &version)?;
    if alignment.changed() {
        info!(
            order = %version.order(),
            width = version.width(),
            height = version.height(),
            "original adjusted to match version"
        );
    }

    let stdout = io::stdout();
    compare::run(
        &original,
        &version,
        &metrics,
        cli.benchmark,
        &mut stdout.lock(),
        &mut DiscardSink,
    )
    .context("Could not write results")?;
    Ok(())
}

/// Load image from path
fn load_image(path: &Path) -> Result<PixelBuffer> {
    let image = soq_io::read(path)
        .with_context(|| format!("Could not read image file {}", path.display()))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        order = %image.order(),
        "loaded"
    );
    Ok(image)
}
