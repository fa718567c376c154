// src/enumeration/batch.rs

use std::ops::Range;

use rayon::prelude::*;

use crate::config::BatchConfig;
use crate::math::complex::Complex;
use crate::math::polynomial::{compare_digits, index_of, polynomial_from_digits, PolynomialIndex};
use crate::math::roots::{solve, RootSet};
use crate::sampling::SamplingPlan;

/// Slots per unit, sized inversely to the per-polynomial cost (~ degree² · N)
/// so that a unit takes roughly the same wall-clock time for any polynomial
/// shape. Always a power of two before clamping.
pub fn batch_size(degree: usize, palette_len: usize, config: &BatchConfig) -> usize {
    let degree = degree.max(1) as f64;
    let cost = degree * degree * palette_len.max(1) as f64;
    let ideal = config.base_batch.max(1) as f64 * config.reference_cost.max(1.0) / cost;
    let nearest = 2f64.powf(ideal.log2().round());

    let min = config.min_batch.max(1);
    let max = config.max_batch.max(min);
    (nearest as usize).clamp(min, max)
}

/// One slot's polynomial and its solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedPolynomial {
    pub slot: u64,
    /// Exact below 2^53; `digits` is authoritative past that
    pub index: PolynomialIndex,
    /// Palette positions, constant term first
    pub digits: Vec<usize>,
    pub result: RootSet,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitResult {
    /// In polynomial-index order
    pub solved: Vec<SolvedPolynomial>,
    /// The sampling plan returned its sentinel inside this unit
    pub exhausted: bool,
}

/// Resolves and solves every slot in `slots`, stopping early at the sentinel.
///
/// With `parallel` the solves run on the rayon pool; the result order is the
/// polynomial-index order either way. Only pseudo-random sampling visits
/// indices out of slot order.
pub fn evaluate_unit(
    plan: &SamplingPlan,
    palette: &[Complex],
    slots: Range<u64>,
    max_iterations: usize,
    parallel: bool,
) -> UnitResult {
    let mut exhausted = false;
    let mut resolved = Vec::with_capacity((slots.end - slots.start) as usize);
    for slot in slots {
        let mut digits = Vec::with_capacity(plan.degree + 1);
        if !plan.digits_for(slot, &mut digits) {
            exhausted = true;
            break;
        }
        resolved.push((slot, digits));
    }
    // stable, so equal pseudo-random indices keep their slot order
    resolved.sort_by(|(_, a), (_, b)| compare_digits(a, b));

    let palette_len = palette.len();
    let solve_one = |coefficients: &mut Vec<Complex>, (slot, digits): &(u64, Vec<usize>)| {
        polynomial_from_digits(digits, palette, coefficients);
        SolvedPolynomial {
            slot: *slot,
            index: index_of(digits, palette_len),
            digits: digits.clone(),
            result: solve(coefficients, max_iterations),
        }
    };

    let degree = plan.degree;
    let solved = if parallel {
        resolved
            .par_iter()
            .map_init(|| Vec::with_capacity(degree + 1), solve_one)
            .collect()
    } else {
        let mut coefficients = Vec::with_capacity(degree + 1);
        resolved
            .iter()
            .map(|entry| solve_one(&mut coefficients, entry))
            .collect()
    };

    UnitResult { solved, exhausted }
}
