//! Chart rendering with `plotters`.
//!
//! Every figure is drawn against a generic [`DrawingBackend`], so the same
//! code writes PNG (bitmap) or SVG output depending on the file extension.

use crate::error::{plot_error, SpectrumError};
use crate::spectrum::SpectrumOutputs;
use crate::toy_model::{ParameterGrid, NUM_PIXELS};
use log::info;
use ndarray::{Array1, Array2};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Visible magnitude range of the spectrum chart as `(bright, faint)`.
pub const MAGNITUDE_DOMAIN: (f64, f64) = (-0.1, 5.);

/// Size of the spectrum chart in pixels.
pub const SPECTRUM_CHART_SIZE: (u32, u32) = (600, 400);

/// Size of the toy model charts in pixels.
pub const TOY_CHART_SIZE: (u32, u32) = (640, 480);

/// A chart that can be rendered.
#[derive(Debug, Clone, Copy)]
pub enum Figure<'a> {
    /// Measured magnitude against wavelength, magnitudes increasing downwards
    Spectrum {
        /// The synthesized spectrum
        spectrum: &'a SpectrumOutputs,
        /// Chart title, usually the slider readouts
        caption: &'a str,
    },
    /// The three toy pixels at the reference labels, as a line
    MiniSpectrum(&'a [f64; NUM_PIXELS]),
    /// Flattened toy model output of shape `(NUM_PIXELS, n)`, one dot per
    /// pixel and grid point
    GridScatter(&'a Array2<f64>),
    /// One toy pixel as a surface over the label grid
    Surface {
        /// Label grid
        grid: &'a ParameterGrid,
        /// Pixel values with the same shape as the grid
        values: &'a Array2<f64>,
    },
}

impl Figure<'_> {
    /// Natural size of the chart in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Figure::Spectrum { .. } => SPECTRUM_CHART_SIZE,
            _ => TOY_CHART_SIZE,
        }
    }

    /// Draw onto any drawing area.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), SpectrumError> {
        root.fill(&WHITE).map_err(plot_error)?;
        match *self {
            Figure::Spectrum { spectrum, caption } => draw_spectrum(root, spectrum, caption)?,
            Figure::MiniSpectrum(pixels) => draw_mini_spectrum(root, pixels)?,
            Figure::GridScatter(flat) => draw_grid_scatter(root, flat)?,
            Figure::Surface { grid, values } => draw_surface(root, grid, values)?,
        }
        root.present().map_err(plot_error)
    }

    /// Render to `path`. Files ending in `.svg` are written as SVG,
    /// everything else goes through the bitmap backend (PNG by default).
    pub fn save(&self, path: &Path) -> Result<(), SpectrumError> {
        let size = self.size();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            self.draw(&SVGBackend::new(path, size).into_drawing_area())?;
        } else {
            self.draw(&BitMapBackend::new(path, size).into_drawing_area())?;
        }
        info!("wrote {}", path.display());
        Ok(())
    }
}

fn draw_spectrum<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spectrum: &SpectrumOutputs,
    caption: &str,
) -> Result<(), SpectrumError> {
    let (first, last) = finite_range(spectrum.wavelength.iter().copied())
        .ok_or(SpectrumError::EmptyGrid)?;
    let (bright, faint) = MAGNITUDE_DOMAIN;

    // Plotted as -magnitude so brighter points sit higher
    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first..last, -faint..-bright)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{:.1}", magnitude_tick(*y)))
        .x_desc("wavelength (Å)")
        .y_desc("measurement")
        .draw()
        .map_err(plot_error)?;

    for segment in visible_segments(&spectrum.wavelength, &spectrum.magnitude, MAGNITUDE_DOMAIN) {
        chart
            .draw_series(LineSeries::new(
                segment.into_iter().map(|(wl, mag)| (wl, -mag)),
                &BLUE,
            ))
            .map_err(plot_error)?;
    }
    Ok(())
}

fn draw_mini_spectrum<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pixels: &[f64; NUM_PIXELS],
) -> Result<(), SpectrumError> {
    let (low, high) =
        padded(finite_range(pixels.iter().copied()).ok_or(SpectrumError::EmptyGrid)?);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..(NUM_PIXELS - 1) as f64, low..high)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc("pixel")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            pixels.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            &BLUE,
        ))
        .map_err(plot_error)?;
    Ok(())
}

fn draw_grid_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    flat: &Array2<f64>,
) -> Result<(), SpectrumError> {
    let (low, high) =
        padded(finite_range(flat.iter().copied()).ok_or(SpectrumError::EmptyGrid)?);
    let pixels = flat.nrows();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.2..(pixels as f64 - 0.8), low..high)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc("pixel")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(
            scatter_points(flat)
                .into_iter()
                .map(|point| Circle::new(point, 2, BLUE.filled())),
        )
        .map_err(plot_error)?;
    Ok(())
}

fn draw_surface<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &ParameterGrid,
    values: &Array2<f64>,
) -> Result<(), SpectrumError> {
    if values.dim() != grid.dim() {
        return Err(SpectrumError::InconsistentInputs);
    }
    let a_range = finite_range(grid.a().iter().copied()).ok_or(SpectrumError::EmptyGrid)?;
    let b_range = finite_range(grid.b().iter().copied()).ok_or(SpectrumError::EmptyGrid)?;
    let v_range = padded(finite_range(values.iter().copied()).ok_or(SpectrumError::EmptyGrid)?);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .build_cartesian_3d(
            a_range.0..a_range.1,
            v_range.0..v_range.1,
            b_range.0..b_range.1,
        )
        .map_err(plot_error)?;
    chart.with_projection(|mut projection| {
        projection.pitch = 0.5;
        projection.yaw = 0.6;
        projection.scale = 0.8;
        projection.into_matrix()
    });
    chart.configure_axes().draw().map_err(plot_error)?;

    let limit = values.iter().fold(0f64, |limit, v| limit.max(v.abs()));
    chart
        .draw_series(surface_cells(grid, values).into_iter().map(|cell| {
            let t = if limit > 0. {
                0.5 + 0.5 * cell.value / limit
            } else {
                0.5
            };
            Polygon::new(cell.corners.to_vec(), seismic(t).filled())
        }))
        .map_err(plot_error)?;
    Ok(())
}

/// Split a spectrum into runs of consecutive samples whose magnitude is
/// finite and inside `(bright, faint)`. Off-chip samples and NaNs break the
/// line instead of being drawn.
pub fn visible_segments(
    wavelength: &Array1<f64>,
    magnitude: &Array1<f64>,
    (bright, faint): (f64, f64),
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&wl, &mag) in wavelength.iter().zip(magnitude) {
        if mag.is_finite() && (bright..=faint).contains(&mag) {
            current.push((wl, mag));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// `(pixel index, value)` for every entry of a `(NUM_PIXELS, n)` array.
pub fn scatter_points(flat: &Array2<f64>) -> Vec<(f64, f64)> {
    flat.indexed_iter()
        .map(|((pixel, _), &v)| (pixel as f64, v))
        .collect()
}

/// A quadrilateral patch of a surface plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCell {
    /// Corners as `(a, value, b)`, in drawing order
    pub corners: [(f64, f64, f64); 4],
    /// Mean of the corner values, used for coloring
    pub value: f64,
}

/// Tile the label grid into one cell per neighbouring 2×2 block of samples.
pub fn surface_cells(grid: &ParameterGrid, values: &Array2<f64>) -> Vec<SurfaceCell> {
    let (rows, cols) = grid.dim();
    let corner = |i: usize, j: usize| (grid.a()[[i, j]], values[[i, j]], grid.b()[[i, j]]);

    let mut cells = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
    for i in 1..rows {
        for j in 1..cols {
            let corners = [
                corner(i - 1, j - 1),
                corner(i - 1, j),
                corner(i, j),
                corner(i, j - 1),
            ];
            let value = corners.iter().map(|c| c.1).sum::<f64>() / 4.;
            cells.push(SurfaceCell { corners, value });
        }
    }
    cells
}

/// Diverging blue-white-red color map. `t` is clamped to `[0, 1]`; 0.5 is
/// white.
pub fn seismic(t: f64) -> RGBColor {
    const STOPS: [(f64, [f64; 3]); 5] = [
        (0.00, [0.0, 0.0, 0.3]),
        (0.25, [0.0, 0.0, 1.0]),
        (0.50, [1.0, 1.0, 1.0]),
        (0.75, [1.0, 0.0, 0.0]),
        (1.00, [0.5, 0.0, 0.0]),
    ];
    let t = if t.is_nan() { 0.5 } else { t.clamp(0., 1.) };

    let upper = STOPS
        .iter()
        .position(|&(stop, _)| t <= stop)
        .unwrap_or(STOPS.len() - 1)
        .max(1);
    let (t0, c0) = STOPS[upper - 1];
    let (t1, c1) = STOPS[upper];
    let frac = (t - t0) / (t1 - t0);

    let channel = |k: usize| ((c0[k] + (c1[k] - c0[k]) * frac) * 255.).round() as u8;
    RGBColor(channel(0), channel(1), channel(2))
}

/// Magnitude shown at a tick of the negated y axis, without printing `-0.0`.
fn magnitude_tick(y: f64) -> f64 {
    if y == 0. {
        0.
    } else {
        -y
    }
}

/// Minimum and maximum of the finite values, or `None` if there are none.
fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((low, high)) => Some((low.min(v), high.max(v))),
        })
}

/// Widen a range by 5% on each side, or by 1 if it is degenerate.
fn padded((low, high): (f64, f64)) -> (f64, f64) {
    let pad = if high > low { 0.05 * (high - low) } else { 1. };
    (low - pad, high + pad)
}
