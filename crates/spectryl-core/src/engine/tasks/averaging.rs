use crate::core::energies;
use crate::core::models::store::StoreError;
use crate::core::spectra::spectrum::{
    AveragedScalar, AveragedSpectrum, PopulationContribution, Spectrum,
};
use crate::engine::config::AveragingConfig;
use crate::engine::error::EngineError;
use crate::engine::view::TrimmedView;
use tracing::{debug, instrument};

/// Computes the normalized Boltzmann weight of every conformer in the view.
///
/// Every kept conformer must carry the configured energy genre; averaging an
/// empty view is an error rather than a silent zero spectrum. Weights always
/// sum to one. The optional population floor only sets the `below_floor`
/// reporting flag, it never removes or rescales a contribution.
#[instrument(skip_all, fields(energy_genre = %config.energy_genre, conformers = view.len()))]
pub fn populations(
    view: &TrimmedView<'_>,
    config: &AveragingConfig,
) -> Result<Vec<PopulationContribution>, EngineError> {
    if view.is_empty() {
        return Err(EngineError::EmptyDataset);
    }

    let mut keys = Vec::with_capacity(view.len());
    let mut energies_hartree = Vec::with_capacity(view.len());
    for conformer in view.iter() {
        let energy = conformer
            .get(&config.energy_genre)
            .and_then(|value| value.as_scalar())
            .ok_or_else(|| EngineError::MissingEnergy {
                key: conformer.key().to_string(),
                genre: config.energy_genre.clone(),
            })?;
        keys.push(conformer.key().to_string());
        energies_hartree.push(energy);
    }

    let deltas = energies::calculate_deltas(&energies_hartree);
    let weights = energies::calculate_populations(&energies_hartree, config.temperature);

    let contributions = keys
        .into_iter()
        .zip(energies_hartree)
        .zip(deltas)
        .zip(weights)
        .map(|(((key, energy), delta_kcal), population)| PopulationContribution {
            key,
            energy,
            delta_kcal,
            population,
            below_floor: config
                .population_floor
                .is_some_and(|floor| population < floor),
        })
        .collect();
    Ok(contributions)
}

/// Population-weighted average of per-conformer spectra sharing one abscissa.
///
/// `spectra` and `contributions` must be parallel over the same view, which
/// is how [`super::synthesis::run`] and [`populations`] produce them.
pub fn average_spectra(
    spectra: &[Spectrum],
    contributions: &[PopulationContribution],
) -> Result<AveragedSpectrum, EngineError> {
    let first = spectra.first().ok_or(EngineError::EmptyDataset)?;
    debug_assert_eq!(spectra.len(), contributions.len());

    let mut values = vec![0.0; first.len()];
    for (spectrum, contribution) in spectra.iter().zip(contributions) {
        for (accumulated, &value) in values.iter_mut().zip(&spectrum.values) {
            *accumulated += contribution.population * value;
        }
    }
    debug!(
        genre = %first.genre,
        contributors = contributions.len(),
        "Population averaging finished."
    );
    Ok(AveragedSpectrum {
        genre: first.genre,
        abscissa: first.abscissa.clone(),
        values,
        populations: contributions.to_vec(),
    })
}

/// Population-weighted average of a scalar genre over the view.
pub fn average_scalar(
    view: &TrimmedView<'_>,
    genre: &str,
    contributions: &[PopulationContribution],
) -> Result<AveragedScalar, EngineError> {
    if view.is_empty() {
        return Err(EngineError::EmptyDataset);
    }
    let values = view.scalars(genre).map_err(|err| match err {
        // A kept conformer without the requested scalar is an averaging
        // problem, not a lookup problem.
        EngineError::Store(StoreError::MissingGenre { key, genre }) => {
            EngineError::MissingEnergy { key, genre }
        }
        other => other,
    })?;
    debug_assert_eq!(values.len(), contributions.len());

    let value = values
        .iter()
        .zip(contributions)
        .map(|(&value, contribution)| contribution.population * value)
        .sum();
    Ok(AveragedScalar {
        genre: genre.to_string(),
        value,
        populations: contributions.to_vec(),
    })
}
