// src/math/complex.rs
//
// Complex primitives. Arithmetic (add, sub, mul, div) comes from the operator
// impls on num's Complex64; division by an exact zero yields non-finite
// components per IEEE-754 and callers are expected to guard against it.

pub use num::complex::Complex64 as Complex;

/// Builds `r * e^(i*theta)`.
pub fn polar(r: f64, theta: f64) -> Complex {
    Complex::from_polar(r, theta)
}

/// Euclidean modulus.
pub fn magnitude(z: Complex) -> f64 {
    z.norm()
}

pub fn is_finite(z: Complex) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

/// True when `a` and `b` are within `eps` of each other (complex modulus).
pub fn approx_eq(a: Complex, b: Complex, eps: f64) -> bool {
    magnitude(a - b) <= eps
}
