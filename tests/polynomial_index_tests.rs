// tests/polynomial_index_tests.rs

use littlewood::math::complex::Complex;
use littlewood::math::polynomial::{digits_of, index_of, polynomial_at, total_polynomial_count};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(test)]
mod polynomial_index_tests {
    use super::*;

    fn palette(len: usize) -> Vec<Complex> {
        (0..len).map(|k| Complex::new(k as f64, -(k as f64) * 0.5)).collect()
    }

    /// Recovers the digits by looking each coefficient up in the palette.
    fn decode(coefficients: &[Complex], palette: &[Complex]) -> Vec<usize> {
        coefficients
            .iter()
            .map(|c| palette.iter().position(|p| p == c).expect("coefficient from palette"))
            .collect()
    }

    #[test]
    fn test_round_trip_exhaustive_small_spaces() {
        for palette_len in 1..5 {
            for degree in 0..5 {
                let p = palette(palette_len);
                let total = total_polynomial_count(degree, palette_len) as u64;
                for index in 0..total {
                    let coefficients = polynomial_at(index as f64, degree, &p);
                    assert_eq!(coefficients.len(), degree + 1);
                    let digits = decode(&coefficients, &p);
                    assert_eq!(index_of(&digits, palette_len), index as f64);
                    assert_eq!(digits, digits_of(index as f64, degree, palette_len));
                }
            }
        }
    }

    #[test]
    fn test_round_trip_large_exact_indices() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let palette_len = rng.random_range(2..31usize);
            let degree = rng.random_range(1..40usize);
            let total = total_polynomial_count(degree, palette_len);
            // stay in the exactly representable range
            let limit = total.min(2f64.powi(53)) as u64;
            let index = rng.random_range(0..limit) as f64;

            let digits = digits_of(index, degree, palette_len);
            assert_eq!(digits.len(), degree + 1);
            assert!(digits.iter().all(|&d| d < palette_len));
            assert_eq!(index_of(&digits, palette_len), index);
        }
    }

    #[test]
    fn test_total_count_exact_for_binary_palette() {
        for degree in 0..=52 {
            assert_eq!(total_polynomial_count(degree, 2), (1u64 << (degree + 1)) as f64);
        }
    }

    #[test]
    fn test_total_count_for_huge_spaces_is_finite() {
        let total = total_polynomial_count(31, 30);
        assert!(total.is_finite());
        assert!((total.log10() - 32.0 * 30f64.log10()).abs() < 1e-9);
    }

    #[test]
    fn test_huge_index_decodes_to_palette_entries() {
        let p = palette(30);
        let coefficients = polynomial_at(1.234e40, 31, &p);
        assert_eq!(coefficients.len(), 32);
        assert!(coefficients.iter().all(|c| p.contains(c)));
    }
}
