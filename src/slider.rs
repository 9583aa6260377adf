//! Bounded, stepped numeric inputs.

use crate::error::SpectrumError;
use std::fmt;

/// A numeric input restricted to `start..=stop` in multiples of `step` from
/// `start`.
///
/// Setting a value snaps it to the nearest step and clamps it into range, the
/// same way a UI slider would. The initial value is `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    start: f64,
    stop: f64,
    step: f64,
    value: f64,
    label: String,
    /// Short name used in the value readout
    readout: String,
}

impl Slider {
    /// Create a slider positioned at `start`.
    pub fn new(start: f64, stop: f64, step: f64, label: &str) -> Result<Self, SpectrumError> {
        if !(start.is_finite() && stop.is_finite() && stop >= start) {
            return Err(SpectrumError::InvalidParameter("slider range"));
        }
        if !(step.is_finite() && step > 0.) {
            return Err(SpectrumError::InvalidParameter("slider step"));
        }
        Ok(Self {
            start,
            stop,
            step,
            value: start,
            label: label.to_owned(),
            readout: label.to_owned(),
        })
    }

    /// Use a different name than the label in the value readout.
    pub fn with_readout(mut self, readout: &str) -> Self {
        self.readout = readout.to_owned();
        self
    }

    /// The number-of-absorption-lines slider: 10 to 300 in steps of 1.
    pub fn n_lines() -> Self {
        Self {
            start: 10.,
            stop: 300.,
            step: 1.,
            value: 10.,
            label: "NLINES".to_owned(),
            readout: "NLINES".to_owned(),
        }
    }

    /// The gain ripple period slider: 950 Å to 1050 Å in steps of 5.
    pub fn gain_freq() -> Self {
        Self {
            start: 950.,
            stop: 1050.,
            step: 5.,
            value: 950.,
            label: "gain frequency".to_owned(),
            readout: "gain freq".to_owned(),
        }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Lower bound.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound.
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Step size.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snap `value` to the slider's steps without changing the slider.
    ///
    /// NaN snaps to `start`.
    pub fn snap(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.start;
        }
        let steps = ((value - self.start) / self.step).round();
        let max_steps = ((self.stop - self.start) / self.step).floor();
        self.start + steps.clamp(0., max_steps) * self.step
    }

    /// Move the slider to the step nearest `value`. Returns whether the value
    /// changed.
    pub fn set(&mut self, value: f64) -> bool {
        let snapped = self.snap(value);
        let changed = snapped != self.value;
        self.value = snapped;
        changed
    }

    /// Whether `value` is exactly one of the slider's positions.
    pub fn accepts(&self, value: f64) -> bool {
        self.snap(value) == value
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.readout, self.value)
    }
}
