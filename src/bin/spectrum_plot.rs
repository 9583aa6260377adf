//! Render mock stellar spectra and the toy three-pixel model.
//!
//! Usage:
//! ```
//! cargo run --bin spectrum_plot -- --n-lines 120 --gain-freq 1000
//! cargo run --bin spectrum_plot -- --sweep-gain --format svg
//! cargo run --bin spectrum_plot -- --toy
//! ```

use clap::{Parser, ValueEnum};
use log::{debug, info};
use mock_spectra::plot::Figure;
use mock_spectra::spectrum::LineProfile;
use mock_spectra::toy_model::{self, ParameterGrid, REFERENCE_LABELS};
use mock_spectra::{synthesize, SpectrumSession, Slider, SynthesisParameters, WavelengthGrid};
use ndarray::Axis;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    /// Gaussian optical depth lines
    Gaussian,
    /// Lines that reach zero flux at their center
    Saturated,
}

impl From<Profile> for LineProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Gaussian => LineProfile::GaussianDepth,
            Profile::Saturated => LineProfile::SaturatedCore,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Svg => "svg",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "spectrum_plot")]
#[command(about = "Synthesize and plot a mock stellar spectrum")]
#[command(version)]
struct Args {
    /// Number of absorption lines (10 to 300)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(10..=300))]
    n_lines: u32,

    /// Gain ripple period in Å (950 to 1050 in steps of 5)
    #[arg(long, default_value_t = 950.0, value_parser = parse_gain_freq)]
    gain_freq: f64,

    /// Random seed for the line list and noise
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Shape of the absorption lines
    #[arg(long, value_enum, default_value_t = Profile::Gaussian)]
    profile: Profile,

    /// Number of worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Render one spectrum per gain ripple slider position
    #[arg(long)]
    sweep_gain: bool,

    /// Also render the toy three-pixel model figures
    #[arg(long)]
    toy: bool,

    /// Directory for the rendered charts
    #[arg(long, default_value = "plots")]
    output_dir: PathBuf,

    /// Image format
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,
}

fn parse_gain_freq(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    let slider = Slider::gain_freq();
    if slider.accepts(value) {
        Ok(value)
    } else {
        Err(format!(
            "must be between {} and {} in steps of {}",
            slider.start(),
            slider.stop(),
            slider.step()
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();
    debug!("{args:?}");

    std::fs::create_dir_all(&args.output_dir)?;
    let ext = args.format.extension();

    if args.sweep_gain {
        render_gain_sweep(&args, ext)?;
    } else {
        let params = SynthesisParameters {
            profile: args.profile.into(),
            ..SynthesisParameters::new(args.n_lines as usize, args.gain_freq).with_seed(args.seed)
        };
        let spectrum = synthesize(&params, &WavelengthGrid::standard(), args.threads)?;

        let mut n_lines = Slider::n_lines();
        n_lines.set(args.n_lines as f64);
        let mut gain_freq = Slider::gain_freq();
        gain_freq.set(args.gain_freq);
        let caption = format!("{n_lines}, {gain_freq}");

        let path = args.output_dir.join(format!("spectrum.{ext}"));
        Figure::Spectrum {
            spectrum: &spectrum,
            caption: &caption,
        }
        .save(&path)?;
        println!("Plot saved to: {}", path.display());
    }

    if args.toy {
        render_toy_model(&args.output_dir, ext)?;
    }

    Ok(())
}

/// Step the gain slider across its range, redrawing after every move.
fn render_gain_sweep(args: &Args, ext: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SpectrumSession::new(args.seed).with_num_threads(args.threads);
    session.set_n_lines(args.n_lines as f64);

    let gain = session.gain_freq().clone();
    let positions = ((gain.stop() - gain.start()) / gain.step()).round() as usize + 1;
    info!("Sweeping {} over {positions} positions", gain.label());

    for position in 0..positions {
        session.set_gain_freq(gain.start() + position as f64 * gain.step());
        let caption = format!("{}, {}", session.n_lines(), session.gain_freq());
        let path = args
            .output_dir
            .join(format!("spectrum_gain_{:04}.{ext}", session.gain_freq().value()));

        let spectrum = session.spectrum()?;
        Figure::Spectrum {
            spectrum,
            caption: &caption,
        }
        .save(&path)?;
    }

    println!(
        "Rendered {} spectra to {}",
        session.redraws(),
        args.output_dir.display()
    );
    Ok(())
}

fn render_toy_model(output_dir: &Path, ext: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (a0, b0) = REFERENCE_LABELS;
    let mini = toy_model::mini_spectrum(a0, b0);

    let grid = ParameterGrid::standard();
    let spectra = grid.evaluate();
    let flat = toy_model::flatten(&spectra);
    let px2 = spectra.index_axis(Axis(0), 2).to_owned();

    let figures = [
        ("mini_spectrum", Figure::MiniSpectrum(&mini)),
        ("mini_spectrum_grid", Figure::GridScatter(&flat)),
        (
            "px2_surface",
            Figure::Surface {
                grid: &grid,
                values: &px2,
            },
        ),
    ];
    for (name, figure) in figures {
        let path = output_dir.join(format!("{name}.{ext}"));
        figure.save(&path)?;
        println!("Plot saved to: {}", path.display());
    }
    Ok(())
}
