use super::intensities::SpectrumGenre;

/// A single conformer's broadened spectrum: intensity samples over a shared
/// abscissa.
///
/// Value object returned to the caller; the core keeps no reference to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub genre: SpectrumGenre,
    /// Sampling points, ascending. cm⁻¹ for vibrational genres, nm for
    /// electronic genres.
    pub abscissa: Vec<f64>,
    /// Intensity at each abscissa point.
    pub values: Vec<f64>,
}

impl Spectrum {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.abscissa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abscissa.is_empty()
    }
}

/// Population diagnostics for one conformer contributing to an average.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationContribution {
    pub key: String,
    /// Energy used for weighting, in hartree.
    pub energy: f64,
    /// Energy relative to the most stable conformer, in kcal/mol.
    pub delta_kcal: f64,
    /// Normalized Boltzmann weight.
    pub population: f64,
    /// Whether the contribution falls below the configured display floor.
    /// A floored contribution still participates in the average with its
    /// full weight; the flag is a reporting hint, never a renormalization.
    pub below_floor: bool,
}

/// The population-weighted average over a set of per-conformer spectra,
/// together with the weight assigned to each contributor.
///
/// Immutable once returned; one averaging call produces one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedSpectrum {
    pub genre: SpectrumGenre,
    pub abscissa: Vec<f64>,
    pub values: Vec<f64>,
    pub populations: Vec<PopulationContribution>,
}

/// The population-weighted average of a scalar genre across conformers.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedScalar {
    /// Name of the averaged genre.
    pub genre: String,
    pub value: f64,
    pub populations: Vec<PopulationContribution>,
}
