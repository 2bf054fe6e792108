//! Metric selection and the (benchmark) comparison loop.

use soq_core::PixelBuffer;
use soq_ops::{Metric, PrintSink, ResultSink};
use std::io::{self, Write};
use std::time::Instant;
use tracing::debug;

/// Metrics to run, in output order: PSNR, SSIM, MSE.
///
/// PSNR also runs when nothing was requested.
pub fn selected_metrics(psnr: bool, ssim: bool, mse: bool) -> Vec<Metric> {
    let mut metrics = Vec::with_capacity(3);
    if psnr || !(ssim || mse) {
        metrics.push(Metric::Psnr);
    }
    if ssim {
        metrics.push(Metric::Ssim);
    }
    if mse {
        metrics.push(Metric::Mse);
    }
    metrics
}

/// Runs `metrics` over the aligned pair `iterations` times.
///
/// Only the first iteration writes results to `out`; the rest report into
/// `repeats` (a [`DiscardSink`](soq_ops::DiscardSink) for the CLI).
/// More than one iteration prints a banner first.
pub fn run<W: Write>(
    original: &PixelBuffer,
    version: &PixelBuffer,
    metrics: &[Metric],
    iterations: u64,
    out: &mut W,
    repeats: &mut dyn ResultSink,
) -> io::Result<()> {
    if iterations > 1 {
        writeln!(out, "Benchmark mode; looping {iterations} times")?;
    }

    let start = Instant::now();
    for i in 0..iterations {
        for &metric in metrics {
            if i == 0 {
                let mut sink = PrintSink::new(metric.name(), &mut *out);
                metric.run(original, version, &mut sink);
                sink.finish()?;
            } else {
                metric.run(original, version, repeats);
            }
        }
    }

    if iterations > 0 {
        debug!(
            iterations,
            elapsed = ?start.elapsed(),
            per_iteration_ms = start.elapsed().as_secs_f64() * 1e3 / iterations as f64,
            "comparison done"
        );
    }
    Ok(())
}
