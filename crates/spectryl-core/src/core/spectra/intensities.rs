use std::fmt;
use std::str::FromStr;

/// Dipole strength (10⁻⁴⁰ esu²·cm²) to molar absorption coefficient, from
/// D = 91.84·10⁻⁴⁰ ∫(ε/ν̄)dν̄.
const DIPOLE_STRENGTH_DIVISOR: f64 = 91.84;

/// Rotatory strength (10⁻⁴⁰ esu²·cm²) to differential molar absorption
/// coefficient, from R = 22.96·10⁻⁴⁰ ∫(Δε/ν̄)dν̄.
const ROTATORY_STRENGTH_DIVISOR: f64 = 22.96;

/// Oscillator strength to molar absorption coefficient, the reciprocal of
/// f = 4.319·10⁻⁹ ∫ε dν̄.
const OSCILLATOR_TO_UV: f64 = 2.315351857e8;

const NM_TO_WAVENUMBER: f64 = 1.0e7;

/// Converts a dipole strength into an IR absorption contribution at
/// vibrational frequency `freq` (cm⁻¹).
#[inline]
pub fn dip_to_ir(dip: f64, freq: f64) -> f64 {
    dip * freq / DIPOLE_STRENGTH_DIVISOR
}

/// Converts a rotatory strength into a VCD contribution at vibrational
/// frequency `freq` (cm⁻¹).
#[inline]
pub fn rot_to_vcd(rot: f64, freq: f64) -> f64 {
    rot * freq / ROTATORY_STRENGTH_DIVISOR
}

/// Converts an oscillator strength into a UV absorption contribution.
#[inline]
pub fn osc_to_uv(osc: f64) -> f64 {
    osc * OSCILLATOR_TO_UV
}

/// Converts a rotatory strength into an ECD contribution at transition
/// wavelength `wavelen` (nm).
#[inline]
pub fn rot_to_ecd(rot: f64, wavelen: f64) -> f64 {
    if wavelen < 1e-6 {
        return 0.0;
    }
    rot * (NM_TO_WAVENUMBER / wavelen) / ROTATORY_STRENGTH_DIVISOR
}

/// Spectrum genres the synthesizer knows how to derive from transition bars.
///
/// Each genre names the pair of bar genres it reads (positions + intensities)
/// and applies its own physical scaling when converting raw quantum
/// properties into spectral intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectrumGenre {
    Ir,
    Vcd,
    Uv,
    Ecd,
    Raman,
    Roa,
}

impl SpectrumGenre {
    /// The `(positions, intensities)` bar-genre pair feeding this spectrum.
    pub fn bar_genres(&self) -> (&'static str, &'static str) {
        match self {
            SpectrumGenre::Ir => ("freq", "dip"),
            SpectrumGenre::Vcd => ("freq", "rot"),
            SpectrumGenre::Uv => ("wavelen", "vosc"),
            SpectrumGenre::Ecd => ("wavelen", "vrot"),
            SpectrumGenre::Raman => ("freq", "raman1"),
            SpectrumGenre::Roa => ("freq", "roa1"),
        }
    }

    /// Applies this genre's physical scaling to a raw bar intensity at the
    /// given bar position. Raman and ROA activities are used as-is.
    #[inline]
    pub fn convert_intensity(&self, intensity: f64, position: f64) -> f64 {
        match self {
            SpectrumGenre::Ir => dip_to_ir(intensity, position),
            SpectrumGenre::Vcd => rot_to_vcd(intensity, position),
            SpectrumGenre::Uv => osc_to_uv(intensity),
            SpectrumGenre::Ecd => rot_to_ecd(intensity, position),
            SpectrumGenre::Raman | SpectrumGenre::Roa => intensity,
        }
    }

    /// Whether the genre is conventionally plotted with a descending energy
    /// axis. Presentation hint only; intensities are never affected.
    pub fn reversed_axis(&self) -> bool {
        matches!(self, SpectrumGenre::Uv | SpectrumGenre::Ecd)
    }
}

impl fmt::Display for SpectrumGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpectrumGenre::Ir => "ir",
            SpectrumGenre::Vcd => "vcd",
            SpectrumGenre::Uv => "uv",
            SpectrumGenre::Ecd => "ecd",
            SpectrumGenre::Raman => "raman",
            SpectrumGenre::Roa => "roa",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SpectrumGenre {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "ir" => Ok(SpectrumGenre::Ir),
            "vcd" => Ok(SpectrumGenre::Vcd),
            "uv" => Ok(SpectrumGenre::Uv),
            "ecd" => Ok(SpectrumGenre::Ecd),
            "raman" => Ok(SpectrumGenre::Raman),
            "roa" => Ok(SpectrumGenre::Roa),
            other => Err(format!("unknown spectrum genre: '{other}'")),
        }
    }
}
