//! Double-precision scalar fields.
//!
//! A [`Field`] is one channel's worth of `f64` samples, row-major. Windowed
//! statistics and the SSIM map are fields; planes of a
//! [`PixelBuffer`](soq_core::PixelBuffer) are promoted to fields before any
//! filtering so the squared and product terms keep their precision.

/// Row-major `f64` samples with a fixed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Wraps samples.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), width * height, "field size mismatch");
        Self { width, height, data }
    }

    /// Promotes one `f32` plane.
    pub fn from_plane(plane: &[f32], width: usize, height: usize) -> Self {
        Self::new(width, height, plane.iter().map(|&v| v as f64).collect())
    }

    /// A field with every sample equal to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self::new(width, height, vec![value; width * height])
    }

    /// Width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in samples.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples, row-major.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at (x, y).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Applies `f` to every sample.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Field {
        Field::new(self.width, self.height, self.data.iter().map(|&v| f(v)).collect())
    }

    /// Combines two fields sample by sample.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn zip_map(&self, other: &Field, f: impl Fn(f64, f64) -> f64) -> Field {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "field shape mismatch"
        );
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Field::new(self.width, self.height, data)
    }

    /// Arithmetic mean of all samples, summed in storage order.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}
