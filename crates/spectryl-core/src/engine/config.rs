use crate::core::spectra::intensities::SpectrumGenre;
use crate::core::spectra::lineshape::Lineshape;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Policy applied by the size-consistency filter when a conformer's array
/// length for the checked genre disagrees with the majority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Exclude the minority conformers from the kept set.
    DropConformer,
    /// Keep every conformer but exclude the genre itself from calculations.
    DropGenre,
}

/// Target of the size-consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCheck {
    pub genre: String,
    pub policy: SizePolicy,
}

/// Scalar window applied by the range filter, e.g. an energy window.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarWindow {
    pub genre: String,
    pub minimum: f64,
    pub maximum: f64,
}

/// Declarative trimming rules. All filters default to off: a default
/// `TrimSettings` excludes nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrimSettings {
    /// Conformers missing any of these genres are excluded. An empty list
    /// excludes nothing.
    pub required_genres: Vec<String>,
    /// Exclude conformers whose ordered elemental composition differs from
    /// the majority of the kept set.
    pub check_stoichiometry: bool,
    /// Exclude conformers reporting one or more imaginary frequencies.
    pub drop_imaginary_frequencies: bool,
    /// Exclude conformers whose calculation did not terminate normally.
    pub require_normal_termination: bool,
    /// Exclude conformers whose geometry optimization did not converge.
    pub require_optimized: bool,
    /// Majority-length check for one vector genre.
    pub size_check: Option<SizeCheck>,
    /// Keep only conformers whose scalar genre value falls inside a window.
    pub scalar_window: Option<ScalarWindow>,
}

/// Lineshape and abscissa settings for broadening one spectrum genre.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    pub lineshape: Lineshape,
    /// Half-width of the lineshape, in abscissa units.
    pub width: f64,
    /// Abscissa start, inclusive.
    pub start: f64,
    /// Abscissa stop, inclusive if it falls on a step.
    pub stop: f64,
    /// Abscissa sampling step.
    pub step: f64,
}

impl SynthesisConfig {
    /// Materializes the sampling points described by start/stop/step.
    pub fn abscissa(&self) -> Vec<f64> {
        let samples = ((self.stop - self.start) / self.step + 1e-9).floor() as usize + 1;
        (0..samples)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

#[derive(Default)]
pub struct SynthesisConfigBuilder {
    lineshape: Option<Lineshape>,
    width: Option<f64>,
    start: Option<f64>,
    stop: Option<f64>,
    step: Option<f64>,
}

impl SynthesisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lineshape(mut self, lineshape: Lineshape) -> Self {
        self.lineshape = Some(lineshape);
        self
    }
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
    pub fn start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }
    pub fn stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn build(self) -> Result<SynthesisConfig, ConfigError> {
        let config = SynthesisConfig {
            lineshape: self
                .lineshape
                .ok_or(ConfigError::MissingParameter("lineshape"))?,
            width: self.width.ok_or(ConfigError::MissingParameter("width"))?,
            start: self.start.ok_or(ConfigError::MissingParameter("start"))?,
            stop: self.stop.ok_or(ConfigError::MissingParameter("stop"))?,
            step: self.step.ok_or(ConfigError::MissingParameter("step"))?,
        };
        if config.width <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "width",
                reason: format!("must be positive, got {}", config.width),
            });
        }
        if config.step <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "step",
                reason: format!("must be positive, got {}", config.step),
            });
        }
        if config.start >= config.stop {
            return Err(ConfigError::InvalidParameter {
                name: "start",
                reason: format!("must be below stop, got {}..{}", config.start, config.stop),
            });
        }
        Ok(config)
    }
}

/// Energy genre, temperature, and reporting floor for Boltzmann averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragingConfig {
    /// Scalar energy genre supplying the relative energies, e.g. `gib`.
    pub energy_genre: String,
    /// Temperature in kelvin.
    pub temperature: f64,
    /// Contributions below this population are flagged in the report.
    /// Display floor only; weights are never renormalized around it.
    pub population_floor: Option<f64>,
}

#[derive(Default)]
pub struct AveragingConfigBuilder {
    energy_genre: Option<String>,
    temperature: Option<f64>,
    population_floor: Option<f64>,
}

impl AveragingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy_genre(mut self, genre: impl Into<String>) -> Self {
        self.energy_genre = Some(genre.into());
        self
    }
    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
    pub fn population_floor(mut self, floor: f64) -> Self {
        self.population_floor = Some(floor);
        self
    }

    pub fn build(self) -> Result<AveragingConfig, ConfigError> {
        let config = AveragingConfig {
            energy_genre: self
                .energy_genre
                .ok_or(ConfigError::MissingParameter("energy_genre"))?,
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            population_floor: self.population_floor,
        };
        if config.temperature <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "temperature",
                reason: format!("must be positive kelvin, got {}", config.temperature),
            });
        }
        Ok(config)
    }
}

/// Complete configuration of one averaged-spectrum calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageConfig {
    pub spectrum: SpectrumGenre,
    pub trimming: TrimSettings,
    pub synthesis: SynthesisConfig,
    pub averaging: AveragingConfig,
}

#[derive(Default)]
pub struct AverageConfigBuilder {
    spectrum: Option<SpectrumGenre>,
    trimming: Option<TrimSettings>,
    synthesis: Option<SynthesisConfig>,
    averaging: Option<AveragingConfig>,
}

impl AverageConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spectrum(mut self, genre: SpectrumGenre) -> Self {
        self.spectrum = Some(genre);
        self
    }
    pub fn trimming(mut self, settings: TrimSettings) -> Self {
        self.trimming = Some(settings);
        self
    }
    pub fn synthesis(mut self, config: SynthesisConfig) -> Self {
        self.synthesis = Some(config);
        self
    }
    pub fn averaging(mut self, config: AveragingConfig) -> Self {
        self.averaging = Some(config);
        self
    }

    pub fn build(self) -> Result<AverageConfig, ConfigError> {
        Ok(AverageConfig {
            spectrum: self
                .spectrum
                .ok_or(ConfigError::MissingParameter("spectrum"))?,
            trimming: self.trimming.unwrap_or_default(),
            synthesis: self
                .synthesis
                .ok_or(ConfigError::MissingParameter("synthesis"))?,
            averaging: self
                .averaging
                .ok_or(ConfigError::MissingParameter("averaging"))?,
        })
    }
}

#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid settings in '{path}': {message}")]
    Invalid { path: String, message: String },
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    spectrum: String,
    #[serde(default)]
    trimming: RawTrimming,
    synthesis: RawSynthesis,
    averaging: RawAveraging,
}

#[derive(Debug, Deserialize, Default)]
struct RawTrimming {
    #[serde(default)]
    required_genres: Vec<String>,
    #[serde(default)]
    check_stoichiometry: bool,
    #[serde(default)]
    drop_imaginary_frequencies: bool,
    #[serde(default)]
    require_normal_termination: bool,
    #[serde(default)]
    require_optimized: bool,
    size_check: Option<RawSizeCheck>,
    scalar_window: Option<RawScalarWindow>,
}

#[derive(Debug, Deserialize)]
struct RawSizeCheck {
    genre: String,
    policy: String,
}

#[derive(Debug, Deserialize)]
struct RawScalarWindow {
    genre: String,
    minimum: f64,
    maximum: f64,
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    lineshape: String,
    width: f64,
    start: f64,
    stop: f64,
    step: f64,
}

#[derive(Debug, Deserialize)]
struct RawAveraging {
    energy_genre: String,
    temperature: f64,
    population_floor: Option<f64>,
}

/// Loads a complete [`AverageConfig`] from a TOML settings file.
///
/// The file carries the whole explicit configuration surface: spectrum
/// genre, trimming rules, lineshape/abscissa settings, and the averaging
/// parameters. Nothing is read from ambient global state.
pub struct CalculationSettings;

impl CalculationSettings {
    pub fn load(path: &Path) -> Result<AverageConfig, SettingsLoadError> {
        let display = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SettingsLoadError::Io {
            path: display.clone(),
            source: e,
        })?;
        let raw: RawSettings = toml::from_str(&content).map_err(|e| SettingsLoadError::Toml {
            path: display.clone(),
            source: e,
        })?;
        Self::convert(raw, &display)
    }

    fn convert(raw: RawSettings, path: &str) -> Result<AverageConfig, SettingsLoadError> {
        let invalid = |message: String| SettingsLoadError::Invalid {
            path: path.to_string(),
            message,
        };

        let spectrum: SpectrumGenre = raw.spectrum.parse().map_err(invalid)?;
        let lineshape: Lineshape = raw.synthesis.lineshape.parse().map_err(invalid)?;

        let size_check = raw
            .trimming
            .size_check
            .map(|check| {
                let policy = match check.policy.as_str() {
                    "drop-conformer" => SizePolicy::DropConformer,
                    "drop-genre" => SizePolicy::DropGenre,
                    other => {
                        return Err(invalid(format!(
                            "unknown size-check policy '{other}', \
                             expected 'drop-conformer' or 'drop-genre'"
                        )));
                    }
                };
                Ok(SizeCheck {
                    genre: check.genre,
                    policy,
                })
            })
            .transpose()?;

        let trimming = TrimSettings {
            required_genres: raw.trimming.required_genres,
            check_stoichiometry: raw.trimming.check_stoichiometry,
            drop_imaginary_frequencies: raw.trimming.drop_imaginary_frequencies,
            require_normal_termination: raw.trimming.require_normal_termination,
            require_optimized: raw.trimming.require_optimized,
            size_check,
            scalar_window: raw.trimming.scalar_window.map(|window| ScalarWindow {
                genre: window.genre,
                minimum: window.minimum,
                maximum: window.maximum,
            }),
        };

        let synthesis = SynthesisConfigBuilder::new()
            .lineshape(lineshape)
            .width(raw.synthesis.width)
            .start(raw.synthesis.start)
            .stop(raw.synthesis.stop)
            .step(raw.synthesis.step)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        let mut averaging = AveragingConfigBuilder::new()
            .energy_genre(raw.averaging.energy_genre)
            .temperature(raw.averaging.temperature);
        if let Some(floor) = raw.averaging.population_floor {
            averaging = averaging.population_floor(floor);
        }
        let averaging = averaging.build().map_err(|e| invalid(e.to_string()))?;

        AverageConfigBuilder::new()
            .spectrum(spectrum)
            .trimming(trimming)
            .synthesis(synthesis)
            .averaging(averaging)
            .build()
            .map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn synthesis_builder_requires_all_parameters() {
        let err = SynthesisConfigBuilder::new()
            .lineshape(Lineshape::Gaussian)
            .width(6.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("start"));
    }

    #[test]
    fn synthesis_builder_rejects_non_positive_width() {
        let err = SynthesisConfigBuilder::new()
            .lineshape(Lineshape::Gaussian)
            .width(0.0)
            .start(800.0)
            .stop(2000.0)
            .step(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "width", .. }
        ));
    }

    #[test]
    fn synthesis_builder_rejects_inverted_range() {
        let err = SynthesisConfigBuilder::new()
            .lineshape(Lineshape::Lorentzian)
            .width(6.0)
            .start(2000.0)
            .stop(800.0)
            .step(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "start", .. }
        ));
    }

    #[test]
    fn abscissa_includes_both_endpoints_for_exact_ranges() {
        let config = SynthesisConfigBuilder::new()
            .lineshape(Lineshape::Gaussian)
            .width(6.0)
            .start(100.0)
            .stop(110.0)
            .step(2.0)
            .build()
            .unwrap();
        let abscissa = config.abscissa();
        assert_eq!(abscissa.len(), 6);
        assert_eq!(abscissa[0], 100.0);
        assert_eq!(abscissa[5], 110.0);
    }

    #[test]
    fn averaging_builder_rejects_non_positive_temperature() {
        let err = AveragingConfigBuilder::new()
            .energy_genre("gib")
            .temperature(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn default_trim_settings_enable_no_filters() {
        let settings = TrimSettings::default();
        assert!(settings.required_genres.is_empty());
        assert!(!settings.check_stoichiometry);
        assert!(settings.size_check.is_none());
    }

    #[test]
    fn settings_file_loads_full_configuration() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
spectrum = "ir"

[trimming]
required_genres = ["freq", "dip", "gib"]
check_stoichiometry = true
drop_imaginary_frequencies = true

[trimming.size_check]
genre = "freq"
policy = "drop-conformer"

[synthesis]
lineshape = "gaussian"
width = 6.0
start = 800.0
stop = 2100.0
step = 2.0

[averaging]
energy_genre = "gib"
temperature = 298.15
population_floor = 0.001
"#,
        )
        .expect("Failed to write settings file");

        let config = CalculationSettings::load(&path).unwrap();
        assert_eq!(config.spectrum, SpectrumGenre::Ir);
        assert_eq!(config.trimming.required_genres, vec!["freq", "dip", "gib"]);
        assert!(config.trimming.check_stoichiometry);
        assert_eq!(
            config.trimming.size_check,
            Some(SizeCheck {
                genre: "freq".to_string(),
                policy: SizePolicy::DropConformer,
            })
        );
        assert_eq!(config.synthesis.lineshape, Lineshape::Gaussian);
        assert_eq!(config.averaging.population_floor, Some(0.001));
    }

    #[test]
    fn settings_file_rejects_unknown_spectrum_genre() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
spectrum = "nmr"

[synthesis]
lineshape = "gaussian"
width = 6.0
start = 800.0
stop = 2100.0
step = 2.0

[averaging]
energy_genre = "gib"
temperature = 298.15
"#,
        )
        .expect("Failed to write settings file");

        let err = CalculationSettings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsLoadError::Invalid { .. }));
    }
}
