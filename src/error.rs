//! Error types shared by every module of the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NumericsError>;

/// Errors raised by intervals, the integrator and distributions.
///
/// Floating-point special values (NaN, ±∞) are *not* errors: the elementary
/// functions propagate them per IEEE-754.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericsError {
    /// An argument lies outside the valid domain of the operation.
    #[error("domain error: {0}")]
    Domain(String),

    /// The adaptive integrator exhausted its subdivision budget.
    #[error(
        "integration did not converge after {subdivisions} subdivisions \
         (estimate {estimate:e}, error estimate {error_estimate:e})"
    )]
    Integration {
        subdivisions: usize,
        estimate: f64,
        error_estimate: f64,
    },

    /// The integrand returned NaN or an infinity somewhere in the domain.
    #[error("integrand is not finite on [{left}, {right}]")]
    NonFiniteIntegrand { left: f64, right: f64 },

    /// No sign change could be found while inverting a monotone function.
    #[error("could not bracket a solution for target value {target}")]
    RootNotBracketed { target: f64 },

    /// The root finder ran out of iterations inside a valid bracket.
    #[error(
        "root search for target value {target} did not converge after \
         {iterations} iterations (last estimate {estimate})"
    )]
    RootNotConverged {
        target: f64,
        iterations: usize,
        estimate: f64,
    },
}

impl NumericsError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        NumericsError::Domain(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_message() {
        let e = NumericsError::domain("p must lie in [0, 1], got 1.5");
        assert_eq!(e.to_string(), "domain error: p must lie in [0, 1], got 1.5");
    }

    #[test]
    fn test_integration_message_mentions_budget() {
        let e = NumericsError::Integration {
            subdivisions: 10,
            estimate: 1.0,
            error_estimate: 1e-3,
        };
        let msg = e.to_string();
        assert!(msg.contains("10 subdivisions"), "{msg}");
    }

    #[test]
    fn test_root_message_mentions_iterations() {
        let e = NumericsError::RootNotConverged {
            target: 0.5,
            iterations: 500,
            estimate: 0.25,
        };
        let msg = e.to_string();
        assert!(msg.contains("500 iterations"), "{msg}");
        assert!(msg.contains("0.25"), "{msg}");
    }
}
