use super::elements::symbol_of_element;
use std::collections::BTreeMap;
use std::fmt;

/// Elemental composition signature of a conformer, derived from its ordered
/// atomic-number sequence.
///
/// Equality and hashing are order-sensitive on the raw sequence: two
/// conformers only share a signature when their atoms are the same elements
/// in the same order, since downstream per-atom operations require matching
/// atom ordering. The [`fmt::Display`] rendering is a Hill-convention
/// molecular formula, intended for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stoichiometry(Vec<u8>);

impl Stoichiometry {
    pub fn new(atomic_numbers: impl Into<Vec<u8>>) -> Self {
        Self(atomic_numbers.into())
    }

    pub fn atomic_numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn atom_count(&self) -> usize {
        self.0.len()
    }
}

impl From<&[u8]> for Stoichiometry {
    fn from(atomic_numbers: &[u8]) -> Self {
        Self(atomic_numbers.to_vec())
    }
}

impl fmt::Display for Stoichiometry {
    /// Hill convention: carbon first, hydrogen second, remaining elements
    /// alphabetically by symbol.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for &z in &self.0 {
            let symbol = symbol_of_element(z).unwrap_or("?");
            *counts.entry(symbol).or_default() += 1;
        }
        let mut write_symbol = |f: &mut fmt::Formatter<'_>, symbol: &str, count: usize| {
            if count == 1 {
                write!(f, "{symbol}")
            } else {
                write!(f, "{symbol}{count}")
            }
        };
        for leading in ["C", "H"] {
            if let Some(&count) = counts.get(leading) {
                write_symbol(f, leading, count)?;
            }
        }
        for (symbol, &count) in &counts {
            if *symbol != "C" && *symbol != "H" {
                write_symbol(f, symbol, count)?;
            }
        }
        Ok(())
    }
}
