use super::core::{BOLTZMANN_CONSTANT, SPEED_OF_LIGHT};
use super::*;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn planck_peaks_at_wien_wavelength() {
    const WIEN_B: f64 = 2.897771955e-3;
    let temperature = 6000.;
    let peak = WIEN_B / temperature;

    let at_peak = planck(temperature, peak);
    assert!(at_peak > planck(temperature, peak * 0.99));
    assert!(at_peak > planck(temperature, peak * 1.01));
}

#[test]
fn planck_rayleigh_jeans_limit() {
    // At long wavelengths B ≈ 2 c k T / λ⁴
    let temperature = 6000.;
    let wavelength: f64 = 1.;
    let rayleigh_jeans =
        2. * SPEED_OF_LIGHT * BOLTZMANN_CONSTANT * temperature / wavelength.powi(4);
    assert_relative_eq!(
        planck(temperature, wavelength),
        rayleigh_jeans,
        max_relative = 1e-5
    );
}

#[test]
fn planck_in_h_band() {
    // 6000 K at 1.6 µm
    assert_relative_eq!(planck(6000., 1.6e-6), 3.26e12, max_relative = 1e-2);
}

#[test]
fn gain_ripple_extremes() {
    // 16000 Å is a whole number of 1000 Å periods
    assert_relative_eq!(
        gain_ripple(16000. * ANGSTROM, 1000., 0.1, 1e-13),
        1.1e-13,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        gain_ripple(16500. * ANGSTROM, 1000., 0.1, 1e-13),
        0.9e-13,
        max_relative = 1e-9
    );
}

#[test]
fn magnitudes() {
    assert_relative_eq!(measured_magnitude(1.), 0.);
    assert_relative_eq!(measured_magnitude(0.01), 5.);
    assert_eq!(measured_magnitude(0.), f64::INFINITY);
    assert!(measured_magnitude(-1.).is_nan());
}

#[test]
fn standard_grid() {
    let grid = WavelengthGrid::standard();
    assert_eq!(grid.len(), 2001);

    let angstrom = grid.wavelength_angstrom();
    assert_relative_eq!(angstrom[0], 15000., max_relative = 1e-12);
    assert_relative_eq!(angstrom[2000], 17000., max_relative = 1e-12);
    assert_relative_eq!(angstrom[1] - angstrom[0], 1., max_relative = 1e-6);

    // (15150, 15800) + (15890, 16430) + (16490, 16950), edges excluded
    assert_eq!(grid.num_on_chip(), 649 + 539 + 459);
    assert_eq!(
        ChipLayout::default().num_on_chip(&ndarray::Array1::linspace(15000., 17000., 2001)),
        grid.num_on_chip()
    );
}

#[test]
fn chip_edges_are_excluded() {
    let layout = ChipLayout::default();
    assert!(!layout.contains(15150.));
    assert!(layout.contains(15151.));
    assert!(!layout.contains(15800.));
    assert!(!layout.contains(15850.));
    assert!(layout.contains(16900.));
    assert!(!layout.contains(17000.));
}

#[test]
fn grid_rejects_bad_ranges() {
    let layout = ChipLayout::default();
    assert!(matches!(
        WavelengthGrid::new(15000., 17000., 1, &layout),
        Err(SpectrumError::EmptyGrid)
    ));
    assert!(matches!(
        WavelengthGrid::new(17000., 15000., 10, &layout),
        Err(SpectrumError::InvalidParameter(_))
    ));
}

#[test]
fn parameter_validation() {
    assert!(SynthesisParameters::new(10, 1000.).validate().is_ok());

    let mut params = SynthesisParameters::new(10, 0.);
    assert!(matches!(
        params.validate(),
        Err(SpectrumError::InvalidParameter("gain_freq"))
    ));

    params.gain_freq = 1000.;
    params.temperature = -1.;
    assert!(matches!(
        params.validate(),
        Err(SpectrumError::InvalidParameter("temperature"))
    ));

    params.temperature = 6000.;
    params.noise_sigma = f64::NAN;
    assert!(matches!(
        params.validate(),
        Err(SpectrumError::InvalidParameter("noise_sigma"))
    ));
}

#[test]
fn line_profiles() {
    let width = 1.5;

    // Far wings are untouched by a Gaussian depth line
    assert_relative_eq!(
        LineProfile::GaussianDepth.transmission(100., width, 2.),
        1.,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        LineProfile::GaussianDepth.transmission(0., width, 2.),
        f64::exp(-2.),
        max_relative = 1e-12
    );

    // The saturated core always reaches zero at the center
    assert_eq!(LineProfile::SaturatedCore.transmission(0., width, 2.), 0.);
    assert!(LineProfile::SaturatedCore.transmission(10., width, 2.) > 0.99);
}

#[test]
fn line_list_draw() {
    let mut rng = StdRng::seed_from_u64(7);
    let lines = LineList::draw(&mut rng, 50, 1.5e-6, 1.7e-6, 3.);
    assert_eq!(lines.len(), 50);
    assert!(lines
        .centers()
        .iter()
        .all(|&c| (1.5e-6..1.7e-6).contains(&c)));
    assert!(lines.depths().iter().all(|&d| (0.0..3.0).contains(&d)));

    assert!(matches!(
        LineList::new(vec![1.], vec![]),
        Err(SpectrumError::InconsistentInputs)
    ));
}

#[test]
fn no_lines_means_full_transmission() {
    let grid = WavelengthGrid::standard();
    let params = SynthesisParameters::new(0, 1000.);
    let spectrum = synthesize(&params, &grid, Some(1)).unwrap();

    assert!(spectrum.lines.is_empty());
    assert!(spectrum.transmission.iter().all(|&t| t == 1.));
}

#[test]
fn synthesized_spectrum_shape_and_masking() {
    let grid = WavelengthGrid::standard();
    let params = SynthesisParameters::new(10, 1000.).with_seed(42);
    let spectrum = synthesize(&params, &grid, None).unwrap();

    for array in [
        &spectrum.wavelength,
        &spectrum.continuum,
        &spectrum.transmission,
        &spectrum.gain,
        &spectrum.noise,
        &spectrum.magnitude,
    ] {
        assert_eq!(array.len(), grid.len());
    }
    assert_eq!(spectrum.lines.len(), 10);

    for (&magnitude, &on_chip) in spectrum.magnitude.iter().zip(grid.on_chip()) {
        if on_chip {
            // The continuum is ~0.3 after the gain, far above the noise
            assert!(magnitude.is_finite());
            assert!(magnitude > 0., "{magnitude}");
        } else {
            assert_eq!(magnitude, OFF_CHIP_MAGNITUDE);
        }
    }
}

#[test]
fn synthesis_is_independent_of_thread_count() {
    let grid = WavelengthGrid::standard();
    let params = SynthesisParameters::new(120, 975.).with_seed(3);

    let serial = synthesize(&params, &grid, Some(1)).unwrap();
    let parallel = synthesize(&params, &grid, Some(4)).unwrap();

    assert_eq!(serial.lines, parallel.lines);
    assert_eq!(serial.noise, parallel.noise);
    assert_eq!(serial.transmission, parallel.transmission);
    assert_eq!(
        serial.magnitude.mapv(f64::to_bits),
        parallel.magnitude.mapv(f64::to_bits)
    );
}

#[test]
fn different_seeds_differ() {
    let grid = WavelengthGrid::standard();
    let a = synthesize(&SynthesisParameters::new(10, 1000.).with_seed(1), &grid, None).unwrap();
    let b = synthesize(&SynthesisParameters::new(10, 1000.).with_seed(2), &grid, None).unwrap();
    assert_ne!(a.lines, b.lines);
}

#[test]
fn noiseless_flux_matches_components() {
    let grid = WavelengthGrid::standard();
    let mut params = SynthesisParameters::new(25, 1000.).with_seed(5);
    params.noise_sigma = 0.;
    let spectrum = synthesize(&params, &grid, None).unwrap();

    let index = grid
        .on_chip()
        .iter()
        .position(|&on| on)
        .unwrap();
    let flux = spectrum.gain[index] * spectrum.continuum[index] * spectrum.transmission[index];
    assert_relative_eq!(
        spectrum.magnitude[index],
        measured_magnitude(flux),
        max_relative = 1e-12
    );
}

#[test]
fn line_transmission_of_a_single_line() {
    let lines = LineList::new(vec![16000. * ANGSTROM], vec![2.]).unwrap();
    let wavelength = [15000. * ANGSTROM, 16000. * ANGSTROM];
    let transmission =
        line_transmission(&wavelength, &lines, 1.5 * ANGSTROM, LineProfile::GaussianDepth);

    assert_eq!(transmission.len(), 2);
    assert_relative_eq!(transmission[0], 1., max_relative = 1e-12);
    assert_relative_eq!(transmission[1], f64::exp(-2.), max_relative = 1e-12);
}

#[test]
fn synthesized_transmission_matches_line_transmission() {
    let grid = WavelengthGrid::standard();
    let params = SynthesisParameters::new(40, 1000.).with_seed(9);
    let spectrum = synthesize(&params, &grid, Some(2)).unwrap();

    let expected = line_transmission(
        grid.wavelength().as_slice().unwrap(),
        &spectrum.lines,
        params.line_width * ANGSTROM,
        params.profile,
    );
    assert_eq!(spectrum.transmission, expected);
}
