use crate::core::models::genre::{self, GenreShape};
use crate::core::models::store::{ConformerStore, StoreError};
use crate::core::spectra::spectrum::{AveragedScalar, AveragedSpectrum};
use crate::engine::config::{AverageConfig, AveragingConfig, TrimSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use crate::engine::tasks::{averaging, synthesis};
use crate::engine::trimming::{Exclusion, TrimmingEngine};
use tracing::{info, instrument};

/// Result of one averaged-spectrum calculation, with full trimming
/// diagnostics alongside the number itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageOutcome {
    pub averaged: AveragedSpectrum,
    /// Every conformer the trimming phase excluded, with the rule that
    /// fired.
    pub exclusions: Vec<Exclusion>,
    /// Genres excluded from calculations by a drop-genre size check.
    pub dropped_genres: Vec<&'static str>,
    /// Conformers that survived trimming and contributed to the average.
    pub kept: usize,
}

/// Result of one averaged-scalar calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarOutcome {
    pub averaged: AveragedScalar,
    pub exclusions: Vec<Exclusion>,
    pub dropped_genres: Vec<&'static str>,
    pub kept: usize,
}

/// Runs the complete averaged-spectrum pipeline over a conformer store.
///
/// Phase 1 applies the configured trimming rules and reports every
/// exclusion. Phase 2 synthesizes one broadened spectrum per kept
/// conformer. Phase 3 weights them by Boltzmann population and collapses
/// them into a single spectrum. The store itself is never modified.
#[instrument(skip_all, fields(spectrum = %config.spectrum, conformers = store.len()))]
pub fn spectrum(
    store: &ConformerStore,
    config: &AverageConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<AverageOutcome, EngineError> {
    let mut engine = TrimmingEngine::new(store);

    reporter.report(Progress::PhaseStart { phase: Phase::Trim });
    let exclusions = apply_trimming(&mut engine, &config.trimming)?;
    if !exclusions.is_empty() {
        reporter.report(Progress::Message(format!(
            "{} conformers excluded by trimming",
            exclusions.len()
        )));
    }
    reporter.report(Progress::PhaseFinish { phase: Phase::Trim });

    let (position_genre, intensity_genre) = config.spectrum.bar_genres();
    for genre in [position_genre, intensity_genre] {
        if engine.is_genre_dropped(genre) {
            return Err(EngineError::GenreExcluded { genre });
        }
    }

    let view = engine.view();
    info!(
        kept = view.len(),
        excluded = exclusions.len(),
        "Trimming finished."
    );

    reporter.report(Progress::PhaseStart {
        phase: Phase::Synthesize,
    });
    let spectra = synthesis::run(&view, config.spectrum, &config.synthesis, reporter)?;
    reporter.report(Progress::PhaseFinish {
        phase: Phase::Synthesize,
    });

    reporter.report(Progress::PhaseStart {
        phase: Phase::Average,
    });
    let contributions = averaging::populations(&view, &config.averaging)?;
    let averaged = averaging::average_spectra(&spectra, &contributions)?;
    reporter.report(Progress::PhaseFinish {
        phase: Phase::Average,
    });

    Ok(AverageOutcome {
        averaged,
        exclusions,
        dropped_genres: engine.dropped_genres().collect(),
        kept: view.len(),
    })
}

/// Runs trimming and population averaging for a single scalar genre, e.g.
/// a Boltzmann-averaged Gibbs free energy.
#[instrument(skip_all, fields(genre = %genre, conformers = store.len()))]
pub fn scalar(
    store: &ConformerStore,
    genre: &str,
    trimming: &TrimSettings,
    averaging_config: &AveragingConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<ScalarOutcome, EngineError> {
    let (name, definition) =
        genre::lookup(genre).ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
    if definition.shape != GenreShape::Scalar {
        return Err(StoreError::ShapeMismatch {
            genre: name,
            expected: GenreShape::Scalar,
            actual: definition.shape,
        }
        .into());
    }

    let mut engine = TrimmingEngine::new(store);

    reporter.report(Progress::PhaseStart { phase: Phase::Trim });
    let exclusions = apply_trimming(&mut engine, trimming)?;
    reporter.report(Progress::PhaseFinish { phase: Phase::Trim });

    if engine.is_genre_dropped(name) {
        return Err(EngineError::GenreExcluded { genre: name });
    }

    let view = engine.view();

    reporter.report(Progress::PhaseStart {
        phase: Phase::Average,
    });
    let contributions = averaging::populations(&view, averaging_config)?;
    let averaged = averaging::average_scalar(&view, name, &contributions)?;
    reporter.report(Progress::PhaseFinish {
        phase: Phase::Average,
    });

    Ok(ScalarOutcome {
        averaged,
        exclusions,
        dropped_genres: engine.dropped_genres().collect(),
        kept: view.len(),
    })
}

fn apply_trimming(
    engine: &mut TrimmingEngine<'_>,
    settings: &TrimSettings,
) -> Result<Vec<Exclusion>, EngineError> {
    let mut exclusions = Vec::new();

    if !settings.required_genres.is_empty() {
        let required: Vec<&str> = settings
            .required_genres
            .iter()
            .map(String::as_str)
            .collect();
        exclusions.extend(engine.trim_incomplete(&required));
    }
    if settings.check_stoichiometry {
        exclusions.extend(engine.trim_non_matching_stoichiometry());
    }
    if settings.drop_imaginary_frequencies {
        exclusions.extend(engine.trim_imaginary_frequencies());
    }
    if settings.require_normal_termination {
        exclusions.extend(engine.trim_abnormal_termination());
    }
    if settings.require_optimized {
        exclusions.extend(engine.trim_not_optimized());
    }
    if let Some(check) = &settings.size_check {
        exclusions.extend(engine.trim_inconsistent_sizes(&check.genre, check.policy)?);
    }
    if let Some(window) = &settings.scalar_window {
        exclusions.extend(engine.trim_to_range(&window.genre, window.minimum, window.maximum)?);
    }

    Ok(exclusions)
}
