//! Detector chip layout.

use ndarray::Array1;

/// Wavelength coverage of the spectrograph detector chips.
///
/// Each chip covers an open interval `(lower, upper)` in Å.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipLayout {
    chips: Vec<(f64, f64)>,
}

impl ChipLayout {
    /// A layout from `(lower, upper)` chip edges in Å.
    pub fn new(chips: Vec<(f64, f64)>) -> Self {
        Self { chips }
    }

    /// Chip edges in Å.
    pub fn chips(&self) -> &[(f64, f64)] {
        &self.chips
    }

    /// Whether `wavelength` (Å) falls strictly inside any chip.
    pub fn contains(&self, wavelength: f64) -> bool {
        self.chips
            .iter()
            .any(|&(lower, upper)| wavelength > lower && wavelength < upper)
    }

    /// Evaluate [`Self::contains`] for each wavelength (Å).
    pub fn on_chip_mask(&self, wavelength: &Array1<f64>) -> Array1<bool> {
        wavelength.mapv(|wl| self.contains(wl))
    }

    /// Number of wavelengths (Å) that fall on a chip.
    pub fn num_on_chip(&self, wavelength: &Array1<f64>) -> usize {
        wavelength.iter().filter(|&&wl| self.contains(wl)).count()
    }
}

impl Default for ChipLayout {
    fn default() -> Self {
        Self::new(vec![
            (15150., 15800.),
            (15890., 16430.),
            (16490., 16950.),
        ])
    }
}
