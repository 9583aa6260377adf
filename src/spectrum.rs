//! Mock stellar spectrum synthesis for a three-chip near-infrared spectrograph

mod core;
mod detector;
mod lines;

#[cfg(test)]
mod tests;

pub use self::core::{gain_ripple, measured_magnitude, planck};
pub use self::detector::ChipLayout;
pub use self::lines::{LineList, LineProfile};

use crate::error::SpectrumError;
use log::debug;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

/// One ångström in metres
pub const ANGSTROM: f64 = 1e-10;

/// Magnitude reported for samples that fall between (or outside of) the chips
pub const OFF_CHIP_MAGNITUDE: f64 = 10.;

/// Parameters for a single spectrum synthesis.
///
/// Wavelength-like quantities (`gain_freq`, `line_width`) are in Å, the
/// temperature is in K.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParameters {
    /// Number of absorption lines to draw
    pub n_lines: usize,
    /// Period of the gain ripple in Å
    pub gain_freq: f64,
    /// Effective temperature of the star in K
    pub temperature: f64,
    /// Gaussian sigma of each absorption line in Å
    pub line_width: f64,
    /// Line depths are drawn uniformly from `[0, max_depth)`
    pub max_depth: f64,
    /// Fractional amplitude of the gain ripple
    pub gain_amplitude: f64,
    /// Overall instrument gain
    pub gain_scale: f64,
    /// Standard deviation of the additive noise
    pub noise_sigma: f64,
    /// Shape of the absorption lines
    pub profile: LineProfile,
    /// Seed for the line list and noise draws
    pub seed: u64,
}

impl SynthesisParameters {
    /// Parameters for `n_lines` absorption lines and a gain ripple period of
    /// `gain_freq` Å, everything else at the default values.
    pub fn new(n_lines: usize, gain_freq: f64) -> Self {
        Self {
            n_lines,
            gain_freq,
            temperature: 6000.,
            line_width: 1.5,
            max_depth: 3.,
            gain_amplitude: 0.1,
            gain_scale: 1e-13,
            noise_sigma: 1e-6,
            profile: LineProfile::default(),
            seed: 0,
        }
    }

    /// Replace the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the parameters describe something physical.
    pub fn validate(&self) -> Result<(), SpectrumError> {
        let positive = [
            (self.gain_freq, "gain_freq"),
            (self.temperature, "temperature"),
            (self.line_width, "line_width"),
            (self.max_depth, "max_depth"),
        ];
        if let Some(&(_, name)) = positive.iter().find(|(v, _)| !(v.is_finite() && *v > 0.)) {
            return Err(SpectrumError::InvalidParameter(name));
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.) {
            return Err(SpectrumError::InvalidParameter("noise_sigma"));
        }
        Ok(())
    }
}

/// Wavelength samples of the spectrograph along with which ones land on a
/// detector chip.
#[derive(Debug, Clone)]
pub struct WavelengthGrid {
    /// Wavelengths in m
    wavelength: Array1<f64>,
    /// Whether each sample is on a chip
    on_chip: Array1<bool>,
}

impl WavelengthGrid {
    /// Evenly spaced grid of `num_samples` from `start` to `stop` Å
    /// (inclusive).
    pub fn new(
        start: f64,
        stop: f64,
        num_samples: usize,
        layout: &ChipLayout,
    ) -> Result<Self, SpectrumError> {
        if num_samples < 2 {
            return Err(SpectrumError::EmptyGrid);
        }
        if !(start.is_finite() && stop.is_finite() && start > 0. && stop > start) {
            return Err(SpectrumError::InvalidParameter("wavelength range"));
        }

        // The chip mask is evaluated in Å, before converting to metres
        let angstroms = Array1::linspace(start, stop, num_samples);
        let on_chip = layout.on_chip_mask(&angstroms);

        Ok(Self {
            wavelength: angstroms * ANGSTROM,
            on_chip,
        })
    }

    /// The 15000 Å to 17000 Å grid at 1 Å sampling on the default chips.
    pub fn standard() -> Self {
        let layout = ChipLayout::default();
        let angstroms = Array1::linspace(15000., 17000., 2001);
        Self {
            on_chip: layout.on_chip_mask(&angstroms),
            wavelength: angstroms * ANGSTROM,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    /// Whether the grid has no samples. Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// Sample wavelengths in m.
    pub fn wavelength(&self) -> &Array1<f64> {
        &self.wavelength
    }

    /// Sample wavelengths in Å.
    pub fn wavelength_angstrom(&self) -> Array1<f64> {
        &self.wavelength / ANGSTROM
    }

    /// On-chip mask, one entry per sample.
    pub fn on_chip(&self) -> &Array1<bool> {
        &self.on_chip
    }

    /// Number of samples that land on a chip.
    pub fn num_on_chip(&self) -> usize {
        self.on_chip.iter().filter(|&&on| on).count()
    }

    fn bounds(&self) -> (f64, f64) {
        (self.wavelength[0], self.wavelength[self.len() - 1])
    }
}

impl Default for WavelengthGrid {
    fn default() -> Self {
        Self::standard()
    }
}

/// Everything computed for one synthesized spectrum. Each array has one
/// entry per grid sample.
#[derive(Debug, Clone)]
pub struct SpectrumOutputs {
    /// Wavelength in Å
    pub wavelength: Array1<f64>,
    /// Blackbody continuum radiance in W sr⁻¹ m⁻³
    pub continuum: Array1<f64>,
    /// Combined transmission of all absorption lines
    pub transmission: Array1<f64>,
    /// Instrument gain including the ripple
    pub gain: Array1<f64>,
    /// Additive noise
    pub noise: Array1<f64>,
    /// Measured magnitude, set to [`OFF_CHIP_MAGNITUDE`] off the chips
    pub magnitude: Array1<f64>,
    /// The absorption lines that were drawn
    pub lines: LineList,
}

/// Combined transmission of every line in `lines` at each wavelength (m),
/// for lines of Gaussian sigma `width` (m).
///
/// Samples are evaluated in parallel on the current rayon pool.
pub fn line_transmission(
    wavelength: &[f64],
    lines: &LineList,
    width: f64,
    profile: LineProfile,
) -> Array1<f64> {
    let transmission: Vec<f64> = wavelength
        .par_iter()
        .map(|&wl| lines.transmission_at(wl, width, profile))
        .collect();
    Array1::from_vec(transmission)
}

/// Synthesize a measured spectrum on `grid`.
///
/// The line list and noise are drawn serially from an RNG seeded with
/// `params.seed`, so the output doesn't depend on `num_threads`. The
/// per-sample work runs on a rayon pool of `num_threads` workers, or the
/// global pool for `None`.
pub fn synthesize(
    params: &SynthesisParameters,
    grid: &WavelengthGrid,
    num_threads: Option<usize>,
) -> Result<SpectrumOutputs, SpectrumError> {
    params.validate()?;
    if grid.is_empty() {
        return Err(SpectrumError::EmptyGrid);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let (first, last) = grid.bounds();
    let lines = LineList::draw(&mut rng, params.n_lines, first, last, params.max_depth);
    let noise: Array1<f64> = (0..grid.len())
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut rng);
            z * params.noise_sigma
        })
        .collect();
    debug!(
        "drew {} absorption lines and {} noise samples",
        lines.len(),
        noise.len()
    );

    let wavelength = grid
        .wavelength()
        .as_slice()
        .ok_or(SpectrumError::InconsistentInputs)?;

    let compute = || -> (Array1<f64>, Array1<f64>, Array1<f64>) {
        let continuum: Vec<f64> = wavelength
            .par_iter()
            .map(|&wl| planck(params.temperature, wl))
            .collect();
        let transmission = line_transmission(
            wavelength,
            &lines,
            params.line_width * ANGSTROM,
            params.profile,
        );
        let gain: Vec<f64> = wavelength
            .par_iter()
            .map(|&wl| gain_ripple(wl, params.gain_freq, params.gain_amplitude, params.gain_scale))
            .collect();
        (Array1::from_vec(continuum), transmission, Array1::from_vec(gain))
    };

    let (continuum, transmission, gain) = match num_threads {
        Some(num_threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| SpectrumError::ThreadPool(e.to_string()))?
            .install(compute),
        None => compute(),
    };

    let flux = &gain * &(&continuum * &transmission) + &noise;
    let magnitude: Array1<f64> = flux
        .iter()
        .zip(grid.on_chip())
        .map(|(&flux, &on_chip)| {
            if on_chip {
                measured_magnitude(flux)
            } else {
                OFF_CHIP_MAGNITUDE
            }
        })
        .collect();

    Ok(SpectrumOutputs {
        wavelength: grid.wavelength_angstrom(),
        continuum,
        transmission,
        gain,
        noise,
        magnitude,
        lines,
    })
}
