// src/sampling/plan.rs

use crate::math::polynomial::{index_of, total_polynomial_count, PolynomialIndex};
use crate::sampling::{
    base_stride, effective_count, next_digits, polynomials_needed, RenderBudget, SamplingConfig,
};

/// Constants derived once at the start of a run from degree, palette size,
/// sampling config and budget.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingPlan {
    pub degree: usize,
    pub palette_len: usize,
    pub config: SamplingConfig,
    pub budget: RenderBudget,
    /// Size of the whole space, possibly approximate
    pub total_count: f64,
    /// Polynomials the budget asks for (the whole space when unbounded)
    pub polynomials_needed: f64,
    pub stride: f64,
    /// Slots the driver walks; filter modes may hit the sentinel earlier
    pub slot_count: f64,
    pub effective_count: f64,
}

impl SamplingPlan {
    pub fn new(degree: usize, palette_len: usize, config: SamplingConfig, budget: RenderBudget) -> Self {
        let total_count = total_polynomial_count(degree, palette_len);
        let (needed, stride) = match budget {
            RenderBudget::Unbounded => (total_count, 1.0),
            RenderBudget::Limited(roots) => {
                let needed = polynomials_needed(roots, degree, total_count);
                (needed, base_stride(total_count, needed))
            }
        };

        SamplingPlan {
            degree,
            palette_len,
            config,
            budget,
            total_count,
            polynomials_needed: needed,
            stride,
            slot_count: needed,
            effective_count: effective_count(&config, total_count, palette_len, degree, budget),
        }
    }

    /// Index for `slot`, or `None` once the mode's subspace is exhausted.
    pub fn index_for(&self, slot: u64) -> Option<PolynomialIndex> {
        let mut digits = Vec::with_capacity(self.degree + 1);
        self.digits_for(slot, &mut digits)
            .then(|| index_of(&digits, self.palette_len))
    }

    /// Exact digit form of [`SamplingPlan::index_for`], written into `out`.
    pub fn digits_for(&self, slot: u64, out: &mut Vec<usize>) -> bool {
        if slot as f64 >= self.slot_count {
            out.clear();
            return false;
        }
        next_digits(
            slot,
            self.stride,
            &self.config,
            self.total_count,
            self.palette_len,
            self.degree,
            self.budget,
            out,
        )
    }

    /// Roots the run will emit at most; the host normalizes colors against it.
    pub fn effective_root_count(&self) -> f64 {
        self.effective_count * self.degree as f64
    }
}
