//! Core closed-form spectrum functions.

use super::ANGSTROM;

/// Planck constant (J s)
pub(crate) const PLANCK_CONSTANT: f64 = 6.62607015e-34;
/// Speed of light in vacuum (m/s)
pub(crate) const SPEED_OF_LIGHT: f64 = 299_792_458.;
/// Boltzmann constant (J/K)
pub(crate) const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

/// Planck's law.
///
/// For a blackbody temperature `temperature` in K and a wavelength
/// `wavelength` in m, compute the spectral radiance in W sr⁻¹ m⁻³.
///
/// Nothing is guarded: a zero wavelength or temperature produces the IEEE
/// result (NaN or zero) rather than an error.
pub fn planck(temperature: f64, wavelength: f64) -> f64 {
    const H: f64 = PLANCK_CONSTANT;
    const C: f64 = SPEED_OF_LIGHT;
    const K_B: f64 = BOLTZMANN_CONSTANT;

    2. * H * C.powi(2)
        / wavelength.powi(5)
        / (f64::exp(H * C / (wavelength * K_B * temperature)) - 1.)
}

/// Instrument gain with a periodic ripple.
///
/// For a wavelength in m and a ripple `period` in Å, the gain is
/// `scale * (1 + amplitude * cos(2π λ / period))`.
pub fn gain_ripple(wavelength: f64, period: f64, amplitude: f64, scale: f64) -> f64 {
    use std::f64::consts::TAU;

    scale * (1. + amplitude * f64::cos(TAU * wavelength / (period * ANGSTROM)))
}

/// Convert a measured flux into a magnitude, `-2.5 log10(flux)`.
///
/// Zero flux is `+inf` and negative flux is NaN.
pub fn measured_magnitude(flux: f64) -> f64 {
    -2.5 * flux.log10()
}
