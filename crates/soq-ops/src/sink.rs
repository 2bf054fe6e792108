//! Destinations for per-channel metric results.
//!
//! Metrics report each channel through [`ResultSink::emit`] with the channel's
//! label from its [`ChannelOrder`](soq_core::ChannelOrder) tag. The sink
//! decides what happens next: print it, keep it, or drop it.
//!
//! # Object safety
//!
//! [`ResultSink`] is object-safe; [`Metric::run`](crate::Metric::run) takes
//! `&mut dyn ResultSink`.
//!
//! ```rust
//! use soq_ops::sink::{CollectSink, PsnrSink, ResultSink};
//!
//! let mut collected = CollectSink::new();
//! PsnrSink::new(&mut collected).emit('R', 0.0);
//! assert_eq!(collected.values(), vec![f64::INFINITY]);
//! ```

use std::io::{self, Write};

use crate::metrics::psnr_from_mse;

/// Receives one `(label, value)` pair per channel.
pub trait ResultSink {
    /// Accepts the result for channel `label`.
    fn emit(&mut self, label: char, value: f64);
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    #[inline]
    fn emit(&mut self, label: char, value: f64) {
        (**self).emit(label, value);
    }
}

/// Writes `<prefix>.<label>: <value>` lines with four decimals.
///
/// `emit` cannot fail, so the first write error is kept and reported by
/// [`PrintSink::finish`]; later emissions are skipped.
#[derive(Debug)]
pub struct PrintSink<W: Write> {
    prefix: String,
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> PrintSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer,
            error: None,
        }
    }

    /// Flushes and returns the writer, or the first error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ResultSink for PrintSink<W> {
    fn emit(&mut self, label: char, value: f64) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{}.{}: {:.4}", self.prefix, label, value) {
            self.error = Some(err);
        }
    }
}

/// Drops every result.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ResultSink for DiscardSink {
    #[inline]
    fn emit(&mut self, _label: char, _value: f64) {}
}

/// Records results in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectSink {
    results: Vec<(char, f64)>,
}

impl CollectSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(label, value)` pairs so far.
    pub fn results(&self) -> &[(char, f64)] {
        &self.results
    }

    /// Values only, in emission order.
    pub fn values(&self) -> Vec<f64> {
        self.results.iter().map(|&(_, v)| v).collect()
    }

    /// Labels only, as a string.
    pub fn labels(&self) -> String {
        self.results.iter().map(|&(l, _)| l).collect()
    }
}

impl ResultSink for CollectSink {
    fn emit(&mut self, label: char, value: f64) {
        self.results.push((label, value));
    }
}

/// Converts MSE values to PSNR before forwarding them.
#[derive(Debug)]
pub struct PsnrSink<S> {
    inner: S,
}

impl<S: ResultSink> PsnrSink<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: ResultSink> ResultSink for PsnrSink<S> {
    fn emit(&mut self, label: char, value: f64) {
        self.inner.emit(label, psnr_from_mse(value));
    }
}
