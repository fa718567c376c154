// src/math/roots.rs
//
// Durand-Kerner (Weierstrass) simultaneous root finding.
//
// All d roots of the monic polynomial are refined together:
//
//     x_i <- x_i - P(x_i) / prod_{j != i} (x_i - x_j)
//
// Estimates are seeded evenly on a circle whose radius bounds every root
// (Cauchy: 1 + max |a_i| for the monic coefficients) and updated in place, so a
// correction already sees the refreshed estimates of lower-numbered roots.
//
// The constants below are tuned against f64 precision and are not configurable.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::core::error::{ExplorerError, Result};
use crate::math::complex::{is_finite, magnitude, polar, Complex};
use crate::math::polynomial::evaluate;

/// Largest per-iteration root movement accepted as converged.
pub const TOLERANCE: f64 = 1e-6;

/// Pairwise distance below which two estimates are treated as coincident.
pub const NEAR_COINCIDENT_THRESHOLD: f64 = 1e-10;

/// Offset added to a near-coincident difference before it enters the product.
pub const PERTURBATION: Complex = Complex::new(1e-6, 1e-6);

/// A root is left untouched for the iteration when its product falls below this.
pub const MIN_DENOMINATOR_MAGNITUDE: f64 = 1e-15;

/// Phase of the first seed on the bounding circle.
///
/// Seeds starting on the real axis keep every iterate of a real polynomial real,
/// which can never reach a complex-conjugate pair.
pub const SEED_PHASE: f64 = 0.4;

/// Output of one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct RootSet {
    /// `degree` estimates, in the order the solver holds them (not sorted)
    pub roots: Vec<Complex>,
    pub converged: bool,
    pub iterations: usize,
}

impl RootSet {
    fn trivial(roots: Vec<Complex>) -> Self {
        RootSet {
            roots,
            converged: true,
            iterations: 0,
        }
    }
}

/// Iteration budget as a function of degree: `clamp(degree * per_degree, min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationPolicy {
    pub per_degree: usize,
    pub min: usize,
    pub max: usize,
}

impl IterationPolicy {
    /// The same budget for every degree.
    pub fn fixed(iterations: usize) -> Self {
        IterationPolicy {
            per_degree: 0,
            min: iterations,
            max: iterations,
        }
    }

    pub fn max_iterations(&self, degree: usize) -> usize {
        let upper = self.max.max(self.min);
        degree.saturating_mul(self.per_degree).clamp(self.min, upper)
    }
}

impl Default for IterationPolicy {
    fn default() -> Self {
        IterationPolicy {
            per_degree: 20,
            min: 40,
            max: 200,
        }
    }
}

/// Solves with the fixed [`TOLERANCE`].
pub fn solve(coefficients: &[Complex], max_iterations: usize) -> RootSet {
    solve_with_tolerance(coefficients, max_iterations, TOLERANCE)
}

/// Like [`solve`], but rejects NaN or infinite coefficients up front.
pub fn try_solve(coefficients: &[Complex], max_iterations: usize) -> Result<RootSet> {
    if let Some(position) = coefficients.iter().position(|&c| !is_finite(c)) {
        return Err(ExplorerError::NonFiniteCoefficient { position });
    }
    Ok(solve(coefficients, max_iterations))
}

/// Finds the `coefficients.len() - 1` roots of a constant-first coefficient slice.
///
/// Degenerate inputs have defined results instead of errors:
/// - fewer than two coefficients: no roots, converged
/// - zero leading coefficient: `degree` zeros, converged
///
/// A solve that exhausts `max_iterations`, or whose estimates stop being
/// finite, returns its last estimates with `converged == false`.
pub fn solve_with_tolerance(coefficients: &[Complex], max_iterations: usize, tolerance: f64) -> RootSet {
    let degree = coefficients.len().saturating_sub(1);
    if degree == 0 {
        return RootSet::trivial(Vec::new());
    }

    let leading = coefficients[degree];
    if magnitude(leading) == 0.0 {
        return RootSet::trivial(vec![Complex::new(0.0, 0.0); degree]);
    }

    let monic: Vec<Complex> = coefficients.iter().map(|&c| c / leading).collect();
    let radius = 1.0 + monic[..degree].iter().map(|&c| magnitude(c)).fold(0.0, f64::max);

    refine(&monic, seeds(radius, degree, SEED_PHASE), max_iterations, tolerance)
}

fn seeds(radius: f64, degree: usize, phase: f64) -> Vec<Complex> {
    (0..degree)
        .map(|i| polar(radius, phase + TAU * i as f64 / degree as f64))
        .collect()
}

/// Iterates from the given estimates until every correction is below `tolerance`.
fn refine(monic: &[Complex], mut roots: Vec<Complex>, max_iterations: usize, tolerance: f64) -> RootSet {
    for iteration in 0..max_iterations {
        let mut max_change = 0.0f64;

        for i in 0..roots.len() {
            if let Some(change) = update_root(monic, &mut roots, i) {
                max_change = max_change.max(change);
            }
        }

        if roots.iter().any(|&r| !is_finite(r)) {
            return RootSet {
                roots,
                converged: false,
                iterations: iteration + 1,
            };
        }

        if max_change < tolerance {
            return RootSet {
                roots,
                converged: true,
                iterations: iteration + 1,
            };
        }
    }

    RootSet {
        roots,
        converged: false,
        iterations: max_iterations,
    }
}

/// Applies one correction to `roots[i]` in place and returns its magnitude.
/// `None` leaves the estimate untouched for this iteration.
fn update_root(monic: &[Complex], roots: &mut [Complex], i: usize) -> Option<f64> {
    let x = roots[i];
    let value = evaluate(monic, x);

    let mut denominator = Complex::new(1.0, 0.0);
    for (j, &other) in roots.iter().enumerate() {
        if j == i {
            continue;
        }
        let mut difference = x - other;
        if magnitude(difference) < NEAR_COINCIDENT_THRESHOLD {
            difference += PERTURBATION;
        }
        denominator *= difference;
    }

    if magnitude(denominator) < MIN_DENOMINATOR_MAGNITUDE {
        return None;
    }

    let correction = value / denominator;
    roots[i] = x - correction;
    Some(magnitude(correction))
}
