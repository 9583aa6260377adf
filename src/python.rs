//! Python bindings.
//!
//! NOTE: this module is the only place that uses `pyo3`. It converts between
//! numpy arrays and the plain Rust types of the other modules.

use crate::error::SpectrumError;
use crate::session::SpectrumSession;
use crate::spectrum::{self, LineProfile, SpectrumOutputs, SynthesisParameters, WavelengthGrid};
use crate::toy_model::ParameterGrid;
use log::info;
use numpy::{PyArray1, PyArray3, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<SpectrumError> for PyErr {
    fn from(e: SpectrumError) -> Self {
        match e {
            SpectrumError::InvalidParameter(_) => PyValueError::new_err(e.to_string()),
            SpectrumError::InconsistentInputs => PyValueError::new_err(e.to_string()),
            SpectrumError::EmptyGrid => PyValueError::new_err(e.to_string()),
            SpectrumError::ThreadPool(_) => PyValueError::new_err(e.to_string()),
            SpectrumError::Plot(_) => PyValueError::new_err(e.to_string()),
        }
    }
}

/// A synthesized spectrum.
///
/// This is just a container of numpy arrays, each dimensioned as
/// (`num_samples`, ), plus the drawn line list.
#[pyclass]
struct MeasuredSpectrum {
    outputs: SpectrumOutputs,
}

/// Implement all the "getters" for the Python properties
#[pymethods]
impl MeasuredSpectrum {
    #[getter]
    fn wavelength<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.wavelength.to_pyarray(py)
    }

    #[getter]
    fn measurement<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.magnitude.to_pyarray(py)
    }

    #[getter]
    fn continuum<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.continuum.to_pyarray(py)
    }

    #[getter]
    fn transmission<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.transmission.to_pyarray(py)
    }

    #[getter]
    fn gain<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.gain.to_pyarray(py)
    }

    #[getter]
    fn noise<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.noise.to_pyarray(py)
    }

    /// Line centers in m
    #[getter]
    fn line_centers<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.lines.centers().to_pyarray(py)
    }

    /// Line depths (peak optical depth)
    #[getter]
    fn line_depths<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.outputs.lines.depths().to_pyarray(py)
    }
}

fn parse_profile(profile: &str) -> PyResult<LineProfile> {
    match profile {
        "gaussian" => Ok(LineProfile::GaussianDepth),
        "saturated" => Ok(LineProfile::SaturatedCore),
        _ => Err(PyValueError::new_err(format!(
            "unknown line profile {profile:?}, expected \"gaussian\" or \"saturated\""
        ))),
    }
}

/// Synthesize a mock stellar spectrum on the standard 15000-17000 Å grid.
///
/// `n_lines` absorption lines are drawn at random, the gain ripple has a
/// period of `gain_freq` Å. `profile` is either `"gaussian"` (Gaussian optical
/// depth) or `"saturated"`.
///
/// The number of worker threads is controlled by `num_threads`. It must be a
/// positive integer, or `None` to automatically choose the number of threads.
#[pyfunction]
#[pyo3(signature = (n_lines, gain_freq, seed=0, temperature=6000.0, profile="gaussian", num_threads=None))]
fn synthesize_spectrum(
    py: Python<'_>,
    n_lines: usize,
    gain_freq: f64,
    seed: u64,
    temperature: f64,
    profile: &str,
    num_threads: Option<usize>,
) -> PyResult<MeasuredSpectrum> {
    let params = SynthesisParameters {
        temperature,
        profile: parse_profile(profile)?,
        ..SynthesisParameters::new(n_lines, gain_freq).with_seed(seed)
    };
    info!("Synthesizing spectrum with {n_lines} lines and a {gain_freq} Å gain ripple");

    let grid = WavelengthGrid::standard();
    let outputs = py.allow_threads(|| spectrum::synthesize(&params, &grid, num_threads))?;
    Ok(MeasuredSpectrum { outputs })
}

/// Planck spectral radiance (W sr⁻¹ m⁻³) for a temperature in K, evaluated at
/// each wavelength in m.
#[pyfunction]
fn planck<'py>(
    py: Python<'py>,
    temperature: f64,
    wavelength: numpy::PyReadonlyArray1<'py, f64>,
) -> Bound<'py, PyArray1<f64>> {
    wavelength
        .as_array()
        .mapv(|wl| spectrum::planck(temperature, wl))
        .to_pyarray(py)
}

/// Evaluate the toy three-pixel model over the standard label grid. Returns an
/// array of shape (3, 20, 10).
#[pyfunction]
fn toy_model_grid(py: Python<'_>) -> Bound<'_, PyArray3<f64>> {
    ParameterGrid::standard().evaluate().to_pyarray(py)
}

/// Slider-driven spectrum, recomputed only when a slider moves.
#[pyclass]
struct SpectrumExplorer {
    session: SpectrumSession,
}

#[pymethods]
impl SpectrumExplorer {
    #[new]
    #[pyo3(signature = (seed=0, num_threads=None))]
    fn new(seed: u64, num_threads: Option<usize>) -> Self {
        Self {
            session: SpectrumSession::new(seed).with_num_threads(num_threads),
        }
    }

    #[getter]
    fn n_lines(&self) -> f64 {
        self.session.n_lines().value()
    }

    #[setter]
    fn set_n_lines(&mut self, value: f64) {
        self.session.set_n_lines(value);
    }

    #[getter]
    fn gain_freq(&self) -> f64 {
        self.session.gain_freq().value()
    }

    #[setter]
    fn set_gain_freq(&mut self, value: f64) {
        self.session.set_gain_freq(value);
    }

    /// The slider readouts, e.g. `NLINES: 10`
    fn readouts(&self) -> (String, String) {
        (
            self.session.n_lines().to_string(),
            self.session.gain_freq().to_string(),
        )
    }

    /// The spectrum for the current slider positions
    fn spectrum(&mut self) -> PyResult<MeasuredSpectrum> {
        let outputs = self.session.spectrum()?.clone();
        Ok(MeasuredSpectrum { outputs })
    }
}

/// A Python module implemented in Rust.
#[pymodule]
fn mock_spectra(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(synthesize_spectrum, m)?)?;
    m.add_function(wrap_pyfunction!(planck, m)?)?;
    m.add_function(wrap_pyfunction!(toy_model_grid, m)?)?;
    m.add_class::<MeasuredSpectrum>()?;
    m.add_class::<SpectrumExplorer>()?;
    Ok(())
}
