use std::fmt;
use std::str::FromStr;

/// Evaluates an area-normalized sum of Gaussian peaks at abscissa point `x`.
///
/// `width` is the half width at 1/e of the peak maximum; the underlying
/// standard deviation is `width / sqrt(2)`. `positions` and `intensities`
/// must be of equal length.
#[inline]
pub fn gaussian(intensities: &[f64], positions: &[f64], x: f64, width: f64) -> f64 {
    let sigma = width / std::f64::consts::SQRT_2;
    let denominator = sigma * (2.0 * std::f64::consts::PI).sqrt();
    intensities
        .iter()
        .zip(positions)
        .map(|(&intensity, &position)| {
            let arg = (x - position) / sigma;
            intensity * (-0.5 * arg * arg).exp()
        })
        .sum::<f64>()
        / denominator
}

/// Evaluates an area-normalized sum of Lorentzian peaks at abscissa point `x`.
///
/// `width` is the half width at half maximum. `positions` and `intensities`
/// must be of equal length.
#[inline]
pub fn lorentzian(intensities: &[f64], positions: &[f64], x: f64, width: f64) -> f64 {
    let hwhm_squared = width * width;
    let hwhm_over_pi = width / std::f64::consts::PI;
    intensities
        .iter()
        .zip(positions)
        .map(|(&intensity, &position)| {
            let offset = position - x;
            intensity / (offset * offset + hwhm_squared)
        })
        .sum::<f64>()
        * hwhm_over_pi
}

/// Broadening function convolved with transition bars to produce a
/// continuous spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineshape {
    Gaussian,
    Lorentzian,
}

impl Lineshape {
    /// Evaluates the summed lineshape of all bars at a single abscissa point.
    #[inline]
    pub fn evaluate(&self, intensities: &[f64], positions: &[f64], x: f64, width: f64) -> f64 {
        match self {
            Lineshape::Gaussian => gaussian(intensities, positions, x, width),
            Lineshape::Lorentzian => lorentzian(intensities, positions, x, width),
        }
    }
}

impl fmt::Display for Lineshape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lineshape::Gaussian => write!(f, "gaussian"),
            Lineshape::Lorentzian => write!(f, "lorentzian"),
        }
    }
}

impl FromStr for Lineshape {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(Lineshape::Gaussian),
            "lorentzian" => Ok(Lineshape::Lorentzian),
            other => Err(format!("unknown lineshape: '{other}'")),
        }
    }
}
