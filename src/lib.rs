//! Mock stellar spectrum synthesis
//!
//! Builds a blackbody continuum, multiplies in random absorption lines and a
//! rippling instrument gain, adds noise, and converts the result to
//! magnitudes on a three-chip near-infrared detector. A small toy model of a
//! three-pixel spectrum rides along for surface-plot demonstrations.
//!
//! NOTE: the Python interface lives in `python` and is only built with the
//! `python` feature. The real work happens in the other modules, and they do
//! not use `pyo3`.

pub mod error;
pub mod plot;
pub mod session;
pub mod slider;
pub mod spectrum;
pub mod toy_model;

#[cfg(feature = "python")]
mod python;

pub use error::SpectrumError;
pub use session::SpectrumSession;
pub use slider::Slider;
pub use spectrum::{synthesize, SpectrumOutputs, SynthesisParameters, WavelengthGrid};
