// src/sampling/step_table.rs
//
// Fixed step-size table behind the pseudo-random sampling mode.
//
// The table is not a PRNG: entry k is 10^e where e walks [-2, 2] in the order
// of the permutation k -> 607k mod 997, then the whole table is scaled to
// average exactly 1.0. Slot s reads entry s mod 997, so the same slot always
// gets the same multiplier.

use lazy_static::lazy_static;

pub const STEP_TABLE_SIZE: usize = 997;

/// Peak deviation of a sampling multiplier from 1.0.
pub const AMPLITUDE: f64 = 0.8;

const PERMUTATION_STEP: usize = 607;
const MIN_EXPONENT: f64 = -2.0;
const MAX_EXPONENT: f64 = 2.0;

lazy_static! {
    static ref STEP_TABLE: Vec<f64> = build_step_table();
    static ref MULTIPLIERS: Vec<f64> = rescale(&STEP_TABLE);
}

/// Raw step sizes, mean 1.0, spanning four orders of magnitude.
pub fn step_table() -> &'static [f64] {
    &STEP_TABLE
}

/// Multiplier for `slot`, within `1 ± AMPLITUDE`.
pub fn multiplier(slot: u64) -> f64 {
    MULTIPLIERS[(slot % STEP_TABLE_SIZE as u64) as usize]
}

fn build_step_table() -> Vec<f64> {
    let last = (STEP_TABLE_SIZE - 1) as f64;
    let raw: Vec<f64> = (0..STEP_TABLE_SIZE)
        .map(|k| {
            let position = (k * PERMUTATION_STEP) % STEP_TABLE_SIZE;
            let exponent = MIN_EXPONENT + (MAX_EXPONENT - MIN_EXPONENT) * position as f64 / last;
            10f64.powf(exponent)
        })
        .collect();
    let mean = raw.iter().sum::<f64>() / STEP_TABLE_SIZE as f64;
    raw.into_iter().map(|step| step / mean).collect()
}

// Linear rescale around 1.0 keeps the mean at 1.0.
fn rescale(table: &[f64]) -> Vec<f64> {
    let spread = table.iter().map(|step| (step - 1.0).abs()).fold(0.0, f64::max);
    if spread == 0.0 {
        return vec![1.0; table.len()];
    }
    table
        .iter()
        .map(|step| 1.0 + AMPLITUDE * (step - 1.0) / spread)
        .collect()
}
