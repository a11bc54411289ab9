//! Imaginary-frequency detection.
//!
//! Quantum-chemistry programs report imaginary vibrational modes as negative
//! frequencies; their presence marks a structure that is not a true minimum.

/// Number of imaginary modes in a frequency list.
pub fn count_imaginary(frequencies: &[f64]) -> usize {
    frequencies.iter().filter(|&&freq| freq < 0.0).count()
}

/// Indices of imaginary modes in a frequency list.
pub fn find_imaginary(frequencies: &[f64]) -> Vec<usize> {
    frequencies
        .iter()
        .enumerate()
        .filter(|&(_, &freq)| freq < 0.0)
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_imaginary_counts_negative_frequencies() {
        assert_eq!(count_imaginary(&[100.0, 200.0, 300.0]), 0);
        assert_eq!(count_imaginary(&[-50.0, 200.0, -1.5]), 2);
        assert_eq!(count_imaginary(&[]), 0);
    }

    #[test]
    fn zero_frequency_is_not_imaginary() {
        assert_eq!(count_imaginary(&[0.0, 10.0]), 0);
    }

    #[test]
    fn find_imaginary_returns_mode_indices() {
        assert_eq!(find_imaginary(&[-50.0, 200.0, -1.5]), vec![0, 2]);
        assert!(find_imaginary(&[100.0]).is_empty());
    }
}
