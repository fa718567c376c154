// src/math/mod.rs

pub mod complex;
pub mod polynomial;
pub mod roots;

pub use complex::Complex;
pub use polynomial::{polynomial_at, total_polynomial_count, PolynomialIndex};
pub use roots::{solve, IterationPolicy, RootSet};
