/// Possible spectrum synthesis errors.
#[derive(Debug)]
pub enum SpectrumError {
    /// A synthesis parameter is outside of its physical range
    InvalidParameter(&'static str),
    /// The inputs don't have the expected shape(s)
    InconsistentInputs,
    /// The wavelength grid has no samples
    EmptyGrid,
    /// The worker thread pool couldn't be created
    ThreadPool(String),
    /// Rendering a chart failed
    Plot(String),
}

impl std::fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumError::InvalidParameter(name) => {
                write!(f, "parameter `{name}` is out of range")
            }
            SpectrumError::InconsistentInputs => {
                write!(f, "spectrum inputs have the wrong shape")
            }
            SpectrumError::EmptyGrid => write!(f, "wavelength grid is empty"),
            SpectrumError::ThreadPool(e) => write!(f, "couldn't build thread pool: {e}"),
            SpectrumError::Plot(e) => write!(f, "plotting failed: {e}"),
        }
    }
}

impl std::error::Error for SpectrumError {}

/// Convert any backend drawing error into a [`SpectrumError::Plot`].
pub(crate) fn plot_error<E: std::fmt::Display>(e: E) -> SpectrumError {
    SpectrumError::Plot(e.to_string())
}
