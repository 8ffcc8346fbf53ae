//! # u-numbase
//!
//! Numerically robust building blocks for continuous probability.
//!
//! This crate provides elementary functions that stay accurate at extreme
//! arguments, an adaptive integrator for finite and infinite domains, and a
//! [`Distribution`](distribution::Distribution) trait whose derived
//! quantities default to numerical integration and root finding.
//!
//! ## Modules
//!
//! - [`elementary`] — Integer powers, overflow-safe hypotenuse, `sin(πx)` / `cos(πx)`,
//!   radian `sin` / `cos` for arguments of any magnitude
//! - [`interval`] — Closed, possibly unbounded intervals
//! - [`integrate`] — Adaptive Gauss–Kronrod quadrature with error control
//! - [`roots`] — Bracket expansion and Brent's method
//! - [`special`] — Gamma, beta and error functions
//! - [`distribution`] — The continuous distribution contract
//! - [`distributions`] — Uniform, Triangular, Normal, Exponential, LogNormal,
//!   ChiSquared, StudentT, PERT
//! - [`error`] — The crate-wide error type
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: exact argument reduction, scaled
//!   hypotenuse, tail probabilities computed without cancellation
//! - **Failures are explicit**: non-convergence and domain violations are
//!   errors, never silently inaccurate values
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod distribution;
pub mod distributions;
pub mod elementary;
pub mod error;
pub mod integrate;
pub mod interval;
pub mod roots;
pub mod special;

pub use error::{NumericsError, Result};
