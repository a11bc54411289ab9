use nalgebra::Point3;
use phf::{Map, phf_map};

/// Value shape of a genre, as declared in the [`GENRE_CATALOG`].
///
/// The shape set is closed: every extracted value is a single number, an
/// ordered sequence of numbers, or a short fixed-shape record (per-atom data,
/// flags, and text annotations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreShape {
    Scalar,
    Vector,
    Record,
}

/// Semantic role of a genre, used to decide which consistency checks and
/// calculations apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreRole {
    /// A single energy value in hartree, usable for Boltzmann weighting.
    Energy,
    /// Per-transition data contributing discrete bars to a spectrum.
    TransitionBar,
    /// Data describing the molecular structure itself.
    Structural,
    /// Bookkeeping extracted alongside the calculation results.
    Metadata,
}

/// Catalog entry describing a registered genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreDef {
    pub shape: GenreShape,
    pub role: GenreRole,
}

const fn def(shape: GenreShape, role: GenreRole) -> GenreDef {
    GenreDef { shape, role }
}

/// Static registry of every genre the core understands.
///
/// Writes into the store are rejected for names absent from this map, and
/// value shapes are validated against the declared shape. Genre names follow
/// the vocabulary of Gaussian-style extraction tools: `scf`/`zpe`/`ten`/
/// `ent`/`gib` are total energies (hartree), `freq` holds vibrational
/// frequencies (cm⁻¹) with `iri`/`dip`/`rot`/`raman1`/`roa1` their per-mode
/// intensities, `wavelen` holds electronic transition wavelengths (nm) with
/// `vosc`/`vrot`/`losc`/`lrot` their per-transition strengths.
pub static GENRE_CATALOG: Map<&'static str, GenreDef> = phf_map! {
    // Energies.
    "scf" => def(GenreShape::Scalar, GenreRole::Energy),
    "zpe" => def(GenreShape::Scalar, GenreRole::Energy),
    "ten" => def(GenreShape::Scalar, GenreRole::Energy),
    "ent" => def(GenreShape::Scalar, GenreRole::Energy),
    "gib" => def(GenreShape::Scalar, GenreRole::Energy),
    // Vibrational transitions.
    "freq" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "iri" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "dip" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "rot" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "raman1" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "roa1" => def(GenreShape::Vector, GenreRole::TransitionBar),
    // Electronic transitions.
    "wavelen" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "vosc" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "vrot" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "losc" => def(GenreShape::Vector, GenreRole::TransitionBar),
    "lrot" => def(GenreShape::Vector, GenreRole::TransitionBar),
    // Structure.
    "atoms" => def(GenreShape::Record, GenreRole::Structural),
    "geometry" => def(GenreShape::Record, GenreRole::Structural),
    "charge" => def(GenreShape::Scalar, GenreRole::Structural),
    "multiplicity" => def(GenreShape::Scalar, GenreRole::Structural),
    // Metadata.
    "normal_termination" => def(GenreShape::Record, GenreRole::Metadata),
    "optimization_completed" => def(GenreShape::Record, GenreRole::Metadata),
    "stoichiometry" => def(GenreShape::Record, GenreRole::Metadata),
};

/// Looks up a genre by name, returning its canonical static name and definition.
pub fn lookup(genre: &str) -> Option<(&'static str, &'static GenreDef)> {
    GENRE_CATALOG
        .get_entry(genre)
        .map(|(name, definition)| (*name, definition))
}

/// An extracted property value owned by a conformer.
///
/// The variant set is closed; [`GenreValue::shape`] maps each variant onto the
/// catalog's three declared shapes so writes can be validated without
/// inspecting values at use sites.
#[derive(Debug, Clone, PartialEq)]
pub enum GenreValue {
    /// A single number (energies, charge, multiplicity).
    Scalar(f64),
    /// Per-mode or per-transition values.
    Vector(Vec<f64>),
    /// Atomic numbers in atom order.
    AtomicNumbers(Vec<u8>),
    /// Cartesian coordinates in atom order, in angstrom.
    Geometry(Vec<Point3<f64>>),
    /// A boolean annotation (e.g. normal termination).
    Flag(bool),
    /// A textual annotation (e.g. the stoichiometry string reported by the program).
    Text(String),
}

impl GenreValue {
    /// Returns the catalog shape this value satisfies.
    pub fn shape(&self) -> GenreShape {
        match self {
            GenreValue::Scalar(_) => GenreShape::Scalar,
            GenreValue::Vector(_) => GenreShape::Vector,
            GenreValue::AtomicNumbers(_)
            | GenreValue::Geometry(_)
            | GenreValue::Flag(_)
            | GenreValue::Text(_) => GenreShape::Record,
        }
    }

    /// Returns the element count for sequence-like values.
    ///
    /// Scalar, flag, and text values have no meaningful length and yield `None`.
    pub fn vector_len(&self) -> Option<usize> {
        match self {
            GenreValue::Vector(values) => Some(values.len()),
            GenreValue::AtomicNumbers(numbers) => Some(numbers.len()),
            GenreValue::Geometry(points) => Some(points.len()),
            GenreValue::Scalar(_) | GenreValue::Flag(_) | GenreValue::Text(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            GenreValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            GenreValue::Vector(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_atomic_numbers(&self) -> Option<&[u8]> {
        match self {
            GenreValue::AtomicNumbers(numbers) => Some(numbers),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            GenreValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_definition_for_registered_genre() {
        let (name, definition) = lookup("freq").unwrap();
        assert_eq!(name, "freq");
        assert_eq!(definition.shape, GenreShape::Vector);
        assert_eq!(definition.role, GenreRole::TransitionBar);
    }

    #[test]
    fn lookup_returns_none_for_unregistered_genre() {
        assert!(lookup("no_such_genre").is_none());
    }

    #[test]
    fn energies_are_scalar_energy_genres() {
        for genre in ["scf", "zpe", "ten", "ent", "gib"] {
            let (_, definition) = lookup(genre).unwrap();
            assert_eq!(definition.shape, GenreShape::Scalar);
            assert_eq!(definition.role, GenreRole::Energy);
        }
    }

    #[test]
    fn value_shape_maps_record_like_variants_to_record() {
        assert_eq!(GenreValue::Flag(true).shape(), GenreShape::Record);
        assert_eq!(GenreValue::Text("C2H4".into()).shape(), GenreShape::Record);
        assert_eq!(
            GenreValue::AtomicNumbers(vec![6, 1]).shape(),
            GenreShape::Record
        );
    }

    #[test]
    fn vector_len_is_defined_for_sequence_like_values_only() {
        assert_eq!(GenreValue::Vector(vec![1.0, 2.0]).vector_len(), Some(2));
        assert_eq!(GenreValue::AtomicNumbers(vec![6, 1, 1]).vector_len(), Some(3));
        assert_eq!(GenreValue::Scalar(1.0).vector_len(), None);
        assert_eq!(GenreValue::Flag(false).vector_len(), None);
    }
}
