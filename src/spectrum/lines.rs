//! Synthetic absorption lines.

use crate::error::SpectrumError;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Shape of a single absorption line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineProfile {
    /// Gaussian optical depth: `exp(-τ exp(-x²/2σ²))`. The line bottoms out at
    /// `exp(-τ)` and recovers to the continuum in the wings.
    #[default]
    GaussianDepth,
    /// `1 - exp(-τ x²/2σ²)`. Every line reaches zero flux at its center and
    /// narrows as τ grows. This is the shape the classroom notebook used.
    SaturatedCore,
}

impl LineProfile {
    /// Transmission at `offset` from the line center, for a line of Gaussian
    /// sigma `width` (same units as `offset`) and depth `tau`.
    pub fn transmission(self, offset: f64, width: f64, tau: f64) -> f64 {
        let x = offset.powi(2) / (2. * width.powi(2));
        match self {
            LineProfile::GaussianDepth => f64::exp(-tau * f64::exp(-x)),
            LineProfile::SaturatedCore => 1. - f64::exp(-tau * x),
        }
    }
}

/// Center wavelengths (m) and depths of a set of absorption lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineList {
    centers: Vec<f64>,
    depths: Vec<f64>,
}

impl LineList {
    /// Build a line list. `centers` and `depths` must be the same length.
    pub fn new(centers: Vec<f64>, depths: Vec<f64>) -> Result<Self, SpectrumError> {
        if centers.len() != depths.len() {
            return Err(SpectrumError::InconsistentInputs);
        }
        Ok(Self { centers, depths })
    }

    /// Draw `n_lines` lines with centers uniform in `[first, last)` and depths
    /// uniform in `[0, max_depth)`.
    ///
    /// All centers are drawn before any depth.
    pub fn draw<R: Rng + ?Sized>(
        rng: &mut R,
        n_lines: usize,
        first: f64,
        last: f64,
        max_depth: f64,
    ) -> Self {
        let centers = Uniform::new(first, last);
        let depths = Uniform::new(0., max_depth);

        let centers: Vec<f64> = centers.sample_iter(&mut *rng).take(n_lines).collect();
        let depths: Vec<f64> = depths.sample_iter(&mut *rng).take(n_lines).collect();

        Self { centers, depths }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Whether there are no lines.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Line centers in m.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Line depths (peak optical depth).
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Combined transmission of every line at `wavelength` (m), for lines of
    /// Gaussian sigma `width` (m). An empty list transmits everything.
    pub fn transmission_at(&self, wavelength: f64, width: f64, profile: LineProfile) -> f64 {
        self.centers
            .iter()
            .zip(&self.depths)
            .map(|(&center, &tau)| profile.transmission(wavelength - center, width, tau))
            .product()
    }
}
