// src/lib.rs

pub mod config;
pub mod core;
pub mod enumeration;
pub mod math;
pub mod sampling;
