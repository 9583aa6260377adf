//! Toy three-pixel spectrum model.
//!
//! Each "pixel" is a closed-form function of two labels `a` and `b`. The
//! model is evaluated over a regular grid of labels to show how a spectrum
//! varies as a surface in label space.

use crate::error::SpectrumError;
use ndarray::{Array1, Array2, Array3, Axis};

/// Number of pixels in the toy spectrum.
pub const NUM_PIXELS: usize = 3;

/// Reference labels `(a0, b0)`.
pub const REFERENCE_LABELS: (f64, f64) = (2., 6.);

/// First pixel, linear in both labels.
pub fn px0(a: f64, b: f64) -> f64 {
    0.1 + 0.05 * a - 0.05 * b
}

/// Second pixel, linear in both labels.
pub fn px1(a: f64, b: f64) -> f64 {
    -0.5 - 0.1 * a - 0.11 * b
}

/// Third pixel, a saddle centered on the reference labels.
pub fn px2(a: f64, b: f64) -> f64 {
    0.9 * (a - 2.).powi(2) - 0.3 * (b - 6.).powi(2)
}

/// The three pixel values for labels `(a, b)`.
pub fn mini_spectrum(a: f64, b: f64) -> [f64; NUM_PIXELS] {
    [px0(a, b), px1(a, b), px2(a, b)]
}

/// A regular grid of `(a, b)` labels.
///
/// Like a `meshgrid`, `b` varies along rows and `a` along columns, so both
/// label arrays have shape `(num_b, num_a)`.
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    a: Array2<f64>,
    b: Array2<f64>,
}

impl ParameterGrid {
    /// Grid from 1D label axes.
    pub fn new(a: &Array1<f64>, b: &Array1<f64>) -> Result<Self, SpectrumError> {
        if a.is_empty() || b.is_empty() {
            return Err(SpectrumError::EmptyGrid);
        }
        Ok(Self::meshgrid(a, b))
    }

    /// `a` from 1 to 3 in 10 steps, `b` from 5 to 10 in 20 steps.
    pub fn standard() -> Self {
        Self::meshgrid(
            &Array1::linspace(1., 3., 10),
            &Array1::linspace(5., 10., 20),
        )
    }

    fn meshgrid(a: &Array1<f64>, b: &Array1<f64>) -> Self {
        let shape = (b.len(), a.len());
        Self {
            a: Array2::from_shape_fn(shape, |(_, j)| a[j]),
            b: Array2::from_shape_fn(shape, |(i, _)| b[i]),
        }
    }

    /// `a` label at each grid point.
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// `b` label at each grid point.
    pub fn b(&self) -> &Array2<f64> {
        &self.b
    }

    /// Shape `(num_b, num_a)`.
    pub fn dim(&self) -> (usize, usize) {
        self.a.dim()
    }

    /// Evaluate the toy model at every grid point. The result has shape
    /// `(NUM_PIXELS, num_b, num_a)`.
    pub fn evaluate(&self) -> Array3<f64> {
        let (rows, cols) = self.dim();
        let mut spectra = Array3::zeros((NUM_PIXELS, rows, cols));
        for (pixel, f) in [px0, px1, px2].into_iter().enumerate() {
            ndarray::Zip::from(spectra.index_axis_mut(Axis(0), pixel))
                .and(&self.a)
                .and(&self.b)
                .for_each(|out, &a, &b| *out = f(a, b));
        }
        spectra
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collapse the grid axes of an evaluated model, giving shape
/// `(NUM_PIXELS, num_b * num_a)`.
pub fn flatten(spectra: &Array3<f64>) -> Array2<f64> {
    let (pixels, rows, cols) = spectra.dim();
    Array2::from_shape_fn((pixels, rows * cols), |(p, k)| spectra[[p, k / cols, k % cols]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_spectrum() {
        let (a0, b0) = REFERENCE_LABELS;
        let spectrum = mini_spectrum(a0, b0);
        assert_relative_eq!(spectrum[0], -0.1, max_relative = 1e-12);
        assert_relative_eq!(spectrum[1], -1.36, max_relative = 1e-12);
        assert_eq!(spectrum[2], 0.);
    }

    #[test]
    fn standard_grid_layout() {
        let grid = ParameterGrid::standard();
        assert_eq!(grid.dim(), (20, 10));

        // a varies along columns, b along rows
        assert_eq!(grid.a()[[0, 0]], 1.);
        assert_relative_eq!(grid.a()[[19, 9]], 3., max_relative = 1e-12);
        assert_eq!(grid.a()[[5, 0]], 1.);
        assert_eq!(grid.b()[[0, 9]], 5.);
        assert_relative_eq!(grid.b()[[19, 0]], 10., max_relative = 1e-12);
    }

    #[test]
    fn evaluate_matches_pixel_functions() {
        let grid = ParameterGrid::standard();
        let spectra = grid.evaluate();
        assert_eq!(spectra.dim(), (3, 20, 10));

        let (i, j) = (7, 4);
        let (a, b) = (grid.a()[[i, j]], grid.b()[[i, j]]);
        assert_eq!(spectra[[0, i, j]], px0(a, b));
        assert_eq!(spectra[[1, i, j]], px1(a, b));
        assert_eq!(spectra[[2, i, j]], px2(a, b));
    }

    #[test]
    fn flatten_is_row_major() {
        let spectra = ParameterGrid::standard().evaluate();
        let flat = flatten(&spectra);
        assert_eq!(flat.dim(), (3, 200));
        assert_eq!(flat[[2, 0]], spectra[[2, 0, 0]]);
        assert_eq!(flat[[2, 13]], spectra[[2, 1, 3]]);
        assert_eq!(flat[[1, 199]], spectra[[1, 19, 9]]);
    }

    #[test]
    fn custom_grid() {
        let grid =
            ParameterGrid::new(&Array1::from(vec![0., 1.]), &Array1::from(vec![6.])).unwrap();
        assert_eq!(grid.dim(), (1, 2));
        assert!(ParameterGrid::new(&Array1::zeros(0), &Array1::from(vec![1.])).is_err());
    }
}
