use crate::core::models::store::StoreError;
use crate::core::spectra::intensities::SpectrumGenre;
use crate::core::spectra::spectrum::Spectrum;
use crate::engine::config::SynthesisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::view::TrimmedView;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One conformer's transition bars, scaled into spectral intensities and
/// ready for broadening.
struct BarSet {
    positions: Vec<f64>,
    intensities: Vec<f64>,
}

/// Synthesizes one broadened spectrum per conformer in the view.
///
/// Each conformer's bar pair for `genre` is validated (both genres present,
/// matching lengths), the raw intensities are scaled by the genre's physical
/// conversion, and the lineshape is evaluated over the configured abscissa.
/// Results come back in view order, one spectrum per kept conformer.
#[instrument(skip_all, fields(genre = %genre, conformers = view.len()))]
pub fn run(
    view: &TrimmedView<'_>,
    genre: SpectrumGenre,
    config: &SynthesisConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<Vec<Spectrum>, EngineError> {
    let (position_genre, intensity_genre) = genre.bar_genres();
    let abscissa = config.abscissa();

    // Bar extraction is validated up front so the broadening loop below is
    // infallible and can run in parallel without error plumbing.
    let work_list: Vec<BarSet> = view
        .iter()
        .map(|conformer| {
            let positions = conformer
                .get(position_genre)
                .and_then(|value| value.as_vector())
                .ok_or_else(|| StoreError::MissingGenre {
                    key: conformer.key().to_string(),
                    genre: position_genre.to_string(),
                })?;
            let raw_intensities = conformer
                .get(intensity_genre)
                .and_then(|value| value.as_vector())
                .ok_or_else(|| StoreError::MissingGenre {
                    key: conformer.key().to_string(),
                    genre: intensity_genre.to_string(),
                })?;
            if positions.len() != raw_intensities.len() {
                return Err(EngineError::InconsistentBars {
                    key: conformer.key().to_string(),
                    position_genre,
                    intensity_genre,
                    positions: positions.len(),
                    intensities: raw_intensities.len(),
                });
            }
            let intensities = positions
                .iter()
                .zip(raw_intensities)
                .map(|(&position, &intensity)| genre.convert_intensity(intensity, position))
                .collect();
            Ok(BarSet {
                positions: positions.to_vec(),
                intensities,
            })
        })
        .collect::<Result<_, EngineError>>()?;

    reporter.report(Progress::TaskStart {
        total: work_list.len() as u64,
    });

    let broaden = |bars: &BarSet| -> Spectrum {
        let values = abscissa
            .iter()
            .map(|&x| {
                config
                    .lineshape
                    .evaluate(&bars.intensities, &bars.positions, x, config.width)
            })
            .collect();
        reporter.report(Progress::TaskIncrement { amount: 1 });
        Spectrum {
            genre,
            abscissa: abscissa.clone(),
            values,
        }
    };

    #[cfg(feature = "parallel")]
    let spectra: Vec<Spectrum> = work_list.par_iter().map(broaden).collect();
    #[cfg(not(feature = "parallel"))]
    let spectra: Vec<Spectrum> = work_list.iter().map(broaden).collect();

    reporter.report(Progress::TaskFinish);
    debug!(
        spectra = spectra.len(),
        samples = abscissa.len(),
        "Spectrum synthesis finished."
    );
    Ok(spectra)
}
