// src/sampling/mod.rs
//
// Sampling strategy engine: maps a slot counter (0, 1, 2, ...) to the index of
// the polynomial evaluated in that slot.
//
// Mode            Index for slot s                          Ends with sentinel
// ─────────────────────────────────────────────────────────────────────────────
// Uniform         floor(offset*(stride-1)) + s*stride       past the space
// FirstN          floor(offset*maxOffset) + s               past the space
// PseudoRandom    floor(s*stride*multiplier(s)) mod total   never
// FilterA0        target + s*stride*N                       past the space
// FilterAn        target*N^d + s*stride                     past the block
//
// With an unbounded budget every mode collapses to index == slot.
//
// The sums above are carried out on base-N digits (next_digits), so the pinned
// target digit and the +s of a first-N walk survive in spaces past 2^53.

pub mod plan;
pub mod step_table;

use serde::{Deserialize, Serialize};

use crate::math::polynomial::{add_to_digits, index_of, push_digits, sub_from_digits, PolynomialIndex};

pub use plan::SamplingPlan;

/// Traversal policy over the polynomial space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Evenly strided through the whole space
    #[serde(rename = "uniform")]
    Uniform,
    /// One contiguous block, no skipping
    #[serde(rename = "first")]
    FirstN,
    /// Strided with per-slot jitter from the step table
    #[serde(rename = "random")]
    PseudoRandom,
    /// Only indices whose constant-term digit equals the target
    #[serde(rename = "filter_a0")]
    FilterConstantTerm,
    /// Only indices whose leading-term digit equals the target
    #[serde(rename = "filter_an")]
    FilterLeadingTerm,
}

impl SamplingMode {
    pub fn name(&self) -> &str {
        match self {
            Self::Uniform => "uniform",
            Self::FirstN => "first-N",
            Self::PseudoRandom => "pseudo-random",
            Self::FilterConstantTerm => "filter a0",
            Self::FilterLeadingTerm => "filter an",
        }
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, Self::FilterConstantTerm | Self::FilterLeadingTerm)
    }
}

impl Default for SamplingMode {
    fn default() -> Self {
        SamplingMode::Uniform
    }
}

/// Sampling settings, snapshotted once per run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub mode: SamplingMode,
    /// Palette position the filtered digit must select (filter modes only)
    pub filter_coefficient: usize,
    /// Starting phase in [0, 1] for the uniform and first-N modes
    pub offset: f64,
}

impl SamplingConfig {
    pub fn new(mode: SamplingMode) -> Self {
        SamplingConfig {
            mode,
            filter_coefficient: 0,
            offset: 0.0,
        }
    }

    pub fn with_filter(mut self, filter_coefficient: usize) -> Self {
        self.filter_coefficient = filter_coefficient;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Offset clamped to [0, 1]; NaN reads as 0.
    pub fn clamped_offset(&self) -> f64 {
        if self.offset.is_nan() {
            0.0
        } else {
            self.offset.clamp(0.0, 1.0)
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig::new(SamplingMode::Uniform)
    }
}

/// Upper bound on the number of roots a run should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderBudget {
    Limited(u64),
    /// Visit every polynomial in index order
    Unbounded,
}

impl RenderBudget {
    /// `None` means unbounded.
    pub fn from_option(roots: Option<u64>) -> Self {
        roots.map_or(RenderBudget::Unbounded, RenderBudget::Limited)
    }
}

/// Polynomials a limited budget calls for: `ceil(roots / degree)`, capped at the space size.
pub fn polynomials_needed(budget_roots: u64, degree: usize, total_count: f64) -> f64 {
    let roots_per_polynomial = degree.max(1) as f64;
    (budget_roots as f64 / roots_per_polynomial).ceil().min(total_count.max(0.0))
}

/// Base stride: `max(1, floor(total / needed))`.
pub fn base_stride(total_count: f64, polynomials_needed: f64) -> f64 {
    if polynomials_needed <= 0.0 {
        return 1.0;
    }
    (total_count / polynomials_needed).floor().max(1.0)
}

/// Resolves `slot` to a polynomial index; `None` means there is no polynomial
/// for this slot (the mode's subspace is exhausted).
///
/// The index is exact below 2^53. Past that, [`next_digits`] is the exact form.
pub fn next_index(
    slot: u64,
    stride: f64,
    config: &SamplingConfig,
    total_count: f64,
    palette_len: usize,
    degree: usize,
    budget: RenderBudget,
) -> Option<PolynomialIndex> {
    let mut digits = Vec::with_capacity(degree + 1);
    next_digits(slot, stride, config, total_count, palette_len, degree, budget, &mut digits)
        .then(|| index_of(&digits, palette_len))
}

/// Digit form of [`next_index`]: writes the `degree + 1` base-N digits of the
/// slot's polynomial into `out`, constant term first. Returns `false` at the
/// sentinel.
///
/// Pinned digits (the filter target, the carry of a first-N walk) are placed
/// digit-wise and never pass through a float sum, so they stay exact in spaces
/// far beyond 2^53.
#[allow(clippy::too_many_arguments)]
pub fn next_digits(
    slot: u64,
    stride: f64,
    config: &SamplingConfig,
    total_count: f64,
    palette_len: usize,
    degree: usize,
    budget: RenderBudget,
    out: &mut Vec<usize>,
) -> bool {
    out.clear();
    if palette_len == 0 || total_count <= 0.0 {
        return false;
    }

    let width = degree + 1;
    let budget_roots = match budget {
        RenderBudget::Unbounded => {
            out.resize(width, 0);
            return add_to_digits(out, palette_len, slot);
        }
        RenderBudget::Limited(roots) => roots,
    };

    let stride = stride.max(1.0).floor();
    let offset = config.clamped_offset();
    let slot_value = slot as f64;

    match config.mode {
        SamplingMode::Uniform => {
            let index = (offset * (stride - 1.0)).floor() + slot_value * stride;
            index < total_count && push_digits(index, width, palette_len, out)
        }
        SamplingMode::FirstN => {
            let needed = polynomials_needed(budget_roots, degree, total_count);
            let max_offset = (total_count - needed).max(0.0);
            if !push_digits((offset * max_offset).floor(), width, palette_len, out) {
                // the rounded start fell past the space: walk the last block instead
                out.clear();
                out.resize(width, palette_len - 1);
                sub_from_digits(out, palette_len, (needed as u64).saturating_sub(1));
            }
            add_to_digits(out, palette_len, slot)
        }
        SamplingMode::PseudoRandom => {
            let multiplier = step_table::multiplier(slot);
            // decoding only reads degree+1 digits, so wrap explicitly
            let index = (slot_value * stride * multiplier).floor() % total_count;
            push_digits(index, width, palette_len, out);
            true
        }
        SamplingMode::FilterConstantTerm => {
            let target = config.filter_coefficient;
            if target >= palette_len {
                return false;
            }
            out.push(target);
            // remaining digits: the slot's position among indices ending in target
            push_digits(slot_value * stride, degree, palette_len, out)
        }
        SamplingMode::FilterLeadingTerm => {
            let target = config.filter_coefficient;
            if target >= palette_len {
                return false;
            }
            // stop at the end of the target's N^d block
            if !push_digits(slot_value * stride, degree, palette_len, out) {
                return false;
            }
            out.push(target);
            true
        }
    }
}

/// Number of polynomials the mode and budget will actually visit; used by the
/// host for progress and color normalization.
pub fn effective_count(
    config: &SamplingConfig,
    total_count: f64,
    palette_len: usize,
    degree: usize,
    budget: RenderBudget,
) -> f64 {
    if palette_len == 0 || total_count <= 0.0 {
        return 0.0;
    }
    let budget_roots = match budget {
        RenderBudget::Unbounded => return total_count,
        RenderBudget::Limited(roots) => roots,
    };
    let needed = polynomials_needed(budget_roots, degree, total_count);
    let radix = palette_len as f64;
    match config.mode {
        SamplingMode::Uniform | SamplingMode::FirstN | SamplingMode::PseudoRandom => needed,
        SamplingMode::FilterConstantTerm => (needed / radix).ceil(),
        SamplingMode::FilterLeadingTerm => (needed / radix).ceil().min(radix.powi(degree as i32)),
    }
}
