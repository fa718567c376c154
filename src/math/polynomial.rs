// src/math/polynomial.rs
//
// Mixed-radix polynomial indexing.
//
// A polynomial of degree d over a palette of N coefficients is identified by an
// index in [0, N^(d+1)). Digit j of the index (base N, least significant first)
// selects palette[digit] as the coefficient of z^j, so incrementing the index
// changes the constant term first and carries into higher powers.
//
// Indices are integral-valued f64. The space N^(d+1) quickly outgrows any
// integer type (palette 30, degree 31 is ~1.9e47), and the sampling engine only
// needs relative magnitudes up there. Below 2^53 everything here is exact.

use std::cmp::Ordering;

use crate::math::complex::Complex;

/// Integral-valued index into the polynomial space.
pub type PolynomialIndex = f64;

/// Size of the polynomial space, `palette_len^(degree+1)`.
///
/// Exact whenever the result fits in a double's mantissa (e.g. palette 2,
/// degree <= 52); approximate beyond that.
pub fn total_polynomial_count(degree: usize, palette_len: usize) -> f64 {
    if palette_len == 0 {
        return 0.0;
    }
    (palette_len as f64).powi(degree as i32 + 1)
}

/// Splits `index` into its `degree + 1` base-`radix` digits, constant term first.
///
/// Only the lowest `degree + 1` digits are read, so an index beyond the space
/// decodes modulo the space size.
pub fn digits_of(index: PolynomialIndex, degree: usize, radix: usize) -> Vec<usize> {
    let mut digits = Vec::with_capacity(degree + 1);
    push_digits(index, degree + 1, radix, &mut digits);
    digits
}

/// Appends the lowest `count` base-`radix` digits of `value` to `out`, least
/// significant first. Returns `false` when `value` does not fit in `count`
/// digits (the appended digits are then the value modulo `radix^count`).
pub fn push_digits(value: f64, count: usize, radix: usize, out: &mut Vec<usize>) -> bool {
    if radix == 0 {
        return false;
    }
    let base = radix as f64;
    let mut rest = sanitize(value);
    for _ in 0..count {
        // fmod is exact; below 2^53 so is the division, and floor only
        // matters once the value is already approximate
        let digit = rest % base;
        out.push(digit as usize);
        rest = ((rest - digit) / base).floor();
    }
    rest == 0.0
}

/// Adds `amount` to a little-endian digit vector with carry. Returns `false`
/// when the sum no longer fits in `digits.len()` digits.
///
/// Exact at any magnitude, unlike adding to an `f64` index.
pub fn add_to_digits(digits: &mut [usize], radix: usize, amount: u64) -> bool {
    if radix == 0 {
        return amount == 0;
    }
    let radix = radix as u128;
    let mut carry = amount as u128;
    for digit in digits.iter_mut() {
        if carry == 0 {
            return true;
        }
        let sum = *digit as u128 + carry;
        *digit = (sum % radix) as usize;
        carry = sum / radix;
    }
    carry == 0
}

/// Subtracts `amount` from a little-endian digit vector with borrow. Returns
/// `false` (leaving the digits wrapped) when the result would be negative.
pub fn sub_from_digits(digits: &mut [usize], radix: usize, amount: u64) -> bool {
    if radix == 0 {
        return amount == 0;
    }
    let radix = radix as u128;
    let mut borrow = amount as u128;
    for digit in digits.iter_mut() {
        if borrow == 0 {
            return true;
        }
        let take = borrow % radix;
        borrow /= radix;
        let current = *digit as u128;
        if current >= take {
            *digit = (current - take) as usize;
        } else {
            *digit = (current + radix - take) as usize;
            borrow += 1;
        }
    }
    borrow == 0
}

/// Orders two digit vectors of equal width by the index they denote.
pub fn compare_digits(a: &[usize], b: &[usize]) -> Ordering {
    a.iter().rev().cmp(b.iter().rev())
}

/// Inverse of [`digits_of`].
pub fn index_of(digits: &[usize], radix: usize) -> PolynomialIndex {
    let base = radix as f64;
    digits
        .iter()
        .rev()
        .fold(0.0, |acc, &digit| acc * base + digit as f64)
}

/// Expands `index` into `degree + 1` coefficients, constant term first.
pub fn polynomial_at(index: PolynomialIndex, degree: usize, palette: &[Complex]) -> Vec<Complex> {
    let mut coefficients = Vec::with_capacity(degree + 1);
    polynomial_into(index, degree, palette, &mut coefficients);
    coefficients
}

/// Same as [`polynomial_at`] but reuses `out` so hot loops do not allocate.
///
/// An empty palette leaves `out` empty.
pub fn polynomial_into(
    index: PolynomialIndex,
    degree: usize,
    palette: &[Complex],
    out: &mut Vec<Complex>,
) {
    out.clear();
    if palette.is_empty() {
        return;
    }
    let base = palette.len() as f64;
    let mut rest = sanitize(index);
    for _ in 0..=degree {
        let digit = rest % base;
        out.push(palette[digit as usize]);
        rest = ((rest - digit) / base).floor();
    }
}

/// Coefficients selected by explicit digits, constant term first.
///
/// Digits outside the palette are skipped, so `out` is shorter than `digits`
/// only on malformed input.
pub fn polynomial_from_digits(digits: &[usize], palette: &[Complex], out: &mut Vec<Complex>) {
    out.clear();
    out.extend(digits.iter().filter_map(|&digit| palette.get(digit).copied()));
}

/// Horner evaluation of a constant-first coefficient slice at `z`.
pub fn evaluate(coefficients: &[Complex], z: Complex) -> Complex {
    coefficients
        .iter()
        .rev()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * z + c)
}

fn sanitize(index: PolynomialIndex) -> f64 {
    // NaN.max(0.0) is 0.0
    index.max(0.0).floor()
}
