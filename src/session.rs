//! Reactive spectrum session.
//!
//! Holds the two sliders and the spectrum that depends on them. Moving a
//! slider only marks the spectrum stale; the next read recomputes it.

use crate::error::SpectrumError;
use crate::slider::Slider;
use crate::spectrum::{synthesize, SpectrumOutputs, SynthesisParameters, WavelengthGrid};
use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Slider-driven spectrum that is recomputed whenever a slider moves.
#[derive(Debug)]
pub struct SpectrumSession {
    n_lines: Slider,
    gain_freq: Slider,
    grid: WavelengthGrid,
    template: SynthesisParameters,
    num_threads: Option<usize>,
    /// Number of times the spectrum was recomputed, mixed with the base seed
    /// so every redraw gets a fresh line list
    redraws: u64,
    cached: Option<SpectrumOutputs>,
}

impl SpectrumSession {
    /// A session on the standard grid with both sliders at their initial
    /// positions.
    pub fn new(seed: u64) -> Self {
        let n_lines = Slider::n_lines();
        let gain_freq = Slider::gain_freq();
        let template =
            SynthesisParameters::new(n_lines.value() as usize, gain_freq.value()).with_seed(seed);
        Self {
            n_lines,
            gain_freq,
            grid: WavelengthGrid::standard(),
            template,
            num_threads: None,
            redraws: 0,
            cached: None,
        }
    }

    /// Use a dedicated pool of `num_threads` workers for recomputation.
    pub fn with_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// The number-of-lines slider.
    pub fn n_lines(&self) -> &Slider {
        &self.n_lines
    }

    /// The gain ripple period slider.
    pub fn gain_freq(&self) -> &Slider {
        &self.gain_freq
    }

    /// The wavelength grid the spectrum is computed on.
    pub fn grid(&self) -> &WavelengthGrid {
        &self.grid
    }

    /// Number of completed recomputations.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Whether the next [`Self::spectrum`] call will recompute.
    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// Move the number-of-lines slider. Returns whether it moved.
    pub fn set_n_lines(&mut self, value: f64) -> bool {
        let changed = self.n_lines.set(value);
        if changed {
            debug!("{} changed, invalidating spectrum", self.n_lines);
            self.cached = None;
        }
        changed
    }

    /// Move the gain ripple slider. Returns whether it moved.
    pub fn set_gain_freq(&mut self, value: f64) -> bool {
        let changed = self.gain_freq.set(value);
        if changed {
            debug!("{} changed, invalidating spectrum", self.gain_freq);
            self.cached = None;
        }
        changed
    }

    /// Parameters for the current slider positions.
    pub fn parameters(&self) -> SynthesisParameters {
        SynthesisParameters {
            n_lines: self.n_lines.value() as usize,
            gain_freq: self.gain_freq.value(),
            seed: redraw_seed(self.template.seed, self.redraws),
            ..self.template.clone()
        }
    }

    /// The spectrum for the current slider positions, recomputing it if a
    /// slider moved since the last call.
    pub fn spectrum(&mut self) -> Result<&SpectrumOutputs, SpectrumError> {
        if self.cached.is_none() {
            let params = self.parameters();
            let outputs = synthesize(&params, &self.grid, self.num_threads)?;
            self.redraws += 1;
            debug!("recomputed spectrum (redraw {})", self.redraws);
            self.cached = Some(outputs);
        }
        self.cached.as_ref().ok_or(SpectrumError::InconsistentInputs)
    }
}

/// Seed for redraw number `redraws` of a session with base seed `seed`.
///
/// Both values go into separate halves of the RNG key, so distinct
/// `(seed, redraws)` pairs never share a key.
fn redraw_seed(seed: u64, redraws: u64) -> u64 {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&redraws.to_le_bytes());
    StdRng::from_seed(key).next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_is_cached_until_a_slider_moves() {
        let mut session = SpectrumSession::new(11).with_num_threads(Some(2));
        assert!(session.is_stale());

        let first = session.spectrum().unwrap().magnitude.clone();
        assert_eq!(session.redraws(), 1);
        assert!(!session.is_stale());

        let again = session.spectrum().unwrap().magnitude.clone();
        assert_eq!(session.redraws(), 1);
        assert_eq!(first, again);

        // Snaps back onto the current position, nothing to redo
        assert!(!session.set_gain_freq(951.));
        assert!(!session.is_stale());

        assert!(session.set_gain_freq(1000.));
        assert!(session.is_stale());
        let redrawn = session.spectrum().unwrap();
        assert_eq!(redrawn.lines.len(), 10);
        assert_eq!(session.redraws(), 2);
    }

    #[test]
    fn n_lines_slider_drives_line_count() {
        let mut session = SpectrumSession::new(0);
        assert!(session.set_n_lines(123.4));
        assert_eq!(session.parameters().n_lines, 123);
        assert_eq!(session.spectrum().unwrap().lines.len(), 123);

        assert!(session.set_n_lines(1000.));
        assert_eq!(session.spectrum().unwrap().lines.len(), 300);
    }

    #[test]
    fn redraws_use_fresh_seeds() {
        let mut session = SpectrumSession::new(5);
        let first = session.parameters().seed;
        session.spectrum().unwrap();
        session.set_n_lines(20.);
        assert_ne!(session.parameters().seed, first);
    }

    #[test]
    fn neighbouring_base_seeds_do_not_share_redraws() {
        assert_ne!(redraw_seed(5, 1), redraw_seed(6, 0));
        assert_ne!(redraw_seed(0, 1), redraw_seed(1, 0));
        assert_eq!(redraw_seed(5, 1), redraw_seed(5, 1));

        // Second redraw of base seed 5 against the first of base seed 6
        let mut five = SpectrumSession::new(5).with_num_threads(Some(1));
        five.spectrum().unwrap();
        five.set_n_lines(20.);
        let five_lines = five.spectrum().unwrap().lines.clone();

        let mut six = SpectrumSession::new(6).with_num_threads(Some(1));
        six.set_n_lines(20.);
        let six_lines = six.spectrum().unwrap().lines.clone();

        assert_eq!(five_lines.len(), six_lines.len());
        assert_ne!(five_lines, six_lines);
    }
}
