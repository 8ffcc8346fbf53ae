//! The continuous distribution contract.
//!
//! A distribution only has to say where it lives ([`Distribution::support`])
//! and how dense it is there ([`Distribution::probability_density`]).
//! Every other quantity has a default derived numerically from those two:
//!
//! | Quantity | Default |
//! |---|---|
//! | `left_probability(x)` | `∫_{left}^{x} p(t) dt` |
//! | `right_probability(x)` | `1 − left_probability(x)` |
//! | `inverse_left_probability(p)` | bracket expansion + Brent root |
//! | `moment(n)` | `∫ xⁿ p(x) dx` |
//! | `moment_about_mean(n)` | `∫ (x − μ)ⁿ p(x) dx` |
//!
//! Concrete types in [`crate::distributions`] override the defaults with
//! closed forms where they exist. Overrides must agree with the defaults to
//! within numerical tolerance.

use crate::elementary::pow;
use crate::error::{NumericsError, Result};
use crate::integrate::integrate;
use crate::interval::Interval;
use crate::roots::{brent, expand_bracket, Direction};

/// Checks that `p` is a probability.
pub(crate) fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(NumericsError::domain(format!(
            "probability must lie in [0, 1], got {p}"
        )));
    }
    Ok(())
}

fn moment_order(n: u32) -> Result<i32> {
    i32::try_from(n).map_err(|_| NumericsError::domain(format!("moment order {n} is too large")))
}

/// A continuous probability distribution on the real line.
///
/// # Examples
/// ```
/// use u_numbase::distribution::Distribution;
/// use u_numbase::interval::Interval;
///
/// /// Density 2x on [0, 1].
/// struct Ramp;
///
/// impl Distribution for Ramp {
///     fn support(&self) -> Interval {
///         Interval::from_endpoints(0.0, 1.0).unwrap()
///     }
///     fn probability_density(&self, x: f64) -> f64 {
///         if self.support().contains(x) { 2.0 * x } else { 0.0 }
///     }
/// }
///
/// let d = Ramp;
/// assert!((d.mean().unwrap() - 2.0 / 3.0).abs() < 1e-12);
/// assert!((d.left_probability(0.5).unwrap() - 0.25).abs() < 1e-12);
/// assert!((d.median().unwrap() - 0.5_f64.sqrt()).abs() < 1e-10);
/// ```
pub trait Distribution {
    /// The closed interval outside of which the density is zero.
    fn support(&self) -> Interval;

    /// The density at `x`: non-negative, zero outside [`Self::support`].
    fn probability_density(&self, x: f64) -> f64;

    /// `P(X ≤ x)`.
    ///
    /// # Errors
    /// [`NumericsError::Domain`] for NaN `x`; integration failures are
    /// propagated.
    fn left_probability(&self, x: f64) -> Result<f64> {
        let support = self.support();
        if x <= support.left() {
            return Ok(0.0);
        }
        if x >= support.right() {
            return Ok(1.0);
        }
        let domain = Interval::from_endpoints(support.left(), x)?;
        let p = integrate(|t| self.probability_density(t), domain)?;
        Ok(p.clamp(0.0, 1.0))
    }

    /// `P(X > x)`.
    fn right_probability(&self, x: f64) -> Result<f64> {
        Ok(1.0 - self.left_probability(x)?)
    }

    /// The `x` with `P(X ≤ x) = p`.
    ///
    /// `p = 0` maps to the left end of the support and `p = 1` to the right
    /// end, either of which may be infinite.
    ///
    /// # Errors
    /// [`NumericsError::Domain`] if `p ∉ [0, 1]` or is NaN.
    /// [`NumericsError::RootNotBracketed`] if the search leaves the
    /// representable range.
    fn inverse_left_probability(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        let support = self.support();
        if p == 0.0 {
            return Ok(support.left());
        }
        if p == 1.0 {
            return Ok(support.right());
        }

        let cdf = |x: f64| self.left_probability(x);
        let (lo, hi) = match (support.is_left_bounded(), support.is_right_bounded()) {
            (true, true) => (support.left(), support.right()),
            (true, false) => {
                let hi = expand_bracket(cdf, p, support.left(), Direction::Above)?;
                (support.left(), hi)
            }
            (false, true) => {
                let lo = expand_bracket(cdf, p, support.right(), Direction::Below)?;
                (lo, support.right())
            }
            (false, false) => (
                expand_bracket(cdf, p, 0.0, Direction::Below)?,
                expand_bracket(cdf, p, 0.0, Direction::Above)?,
            ),
        };
        brent(cdf, p, lo, hi)
    }

    /// The `x` with `P(X > x) = q`.
    fn inverse_right_probability(&self, q: f64) -> Result<f64> {
        check_probability(q)?;
        self.inverse_left_probability(1.0 - q)
    }

    fn mean(&self) -> Result<f64> {
        self.expectation_value(&|x| x)
    }

    fn variance(&self) -> Result<f64> {
        self.moment_about_mean(2)
    }

    fn standard_deviation(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }

    fn median(&self) -> Result<f64> {
        self.inverse_left_probability(0.5)
    }

    /// Raw moment `E[Xⁿ]`. `n = 0` is exactly 1 and `n = 1` is [`Self::mean`].
    fn moment(&self, n: u32) -> Result<f64> {
        match n {
            0 => Ok(1.0),
            1 => self.mean(),
            _ => {
                let order = moment_order(n)?;
                self.expectation_value(&|x| pow(x, order))
            }
        }
    }

    /// Central moment `E[(X − μ)ⁿ]`. `n = 0` is exactly 1 and `n = 1` is
    /// exactly 0.
    fn moment_about_mean(&self, n: u32) -> Result<f64> {
        match n {
            0 => Ok(1.0),
            1 => Ok(0.0),
            _ => {
                let order = moment_order(n)?;
                let mu = self.mean()?;
                self.expectation_value(&|x| pow(x - mu, order))
            }
        }
    }

    /// `E[f(X)] = ∫ f(x) p(x) dx` over the support.
    ///
    /// Points of zero density contribute nothing, even where `f` is
    /// infinite.
    fn expectation_value(&self, f: &dyn Fn(f64) -> f64) -> Result<f64> {
        integrate(
            |x| {
                let p = self.probability_density(x);
                if p == 0.0 {
                    0.0
                } else {
                    p * f(x)
                }
            },
            self.support(),
        )
    }

    /// `E[(X − μ)³] / σ³`.
    fn skewness(&self) -> Result<f64> {
        let sigma = self.standard_deviation()?;
        Ok(self.moment_about_mean(3)? / pow(sigma, 3))
    }

    /// `E[(X − μ)⁴] / σ⁴ − 3`.
    fn excess_kurtosis(&self) -> Result<f64> {
        let sigma = self.standard_deviation()?;
        Ok(self.moment_about_mean(4)? / pow(sigma, 4) - 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Density `2x` on `[0, 1]`; relies on every default.
    struct Ramp;

    impl Distribution for Ramp {
        fn support(&self) -> Interval {
            Interval::from_endpoints(0.0, 1.0).unwrap()
        }
        fn probability_density(&self, x: f64) -> f64 {
            if self.support().contains(x) {
                2.0 * x
            } else {
                0.0
            }
        }
    }

    /// Standard logistic, density only: unbounded on both sides.
    struct Logistic;

    impl Distribution for Logistic {
        fn support(&self) -> Interval {
            Interval::REAL_LINE
        }
        fn probability_density(&self, x: f64) -> f64 {
            let e = (-x.abs()).exp();
            e / ((1.0 + e) * (1.0 + e))
        }
    }

    /// Rate-2 exponential, density only: bounded on the left.
    struct HalfLine;

    impl Distribution for HalfLine {
        fn support(&self) -> Interval {
            Interval::NON_NEGATIVE
        }
        fn probability_density(&self, x: f64) -> f64 {
            if x < 0.0 {
                0.0
            } else {
                2.0 * (-2.0 * x).exp()
            }
        }
    }

    /// Mirror of `HalfLine`: bounded on the right.
    struct NegativeHalfLine;

    impl Distribution for NegativeHalfLine {
        fn support(&self) -> Interval {
            Interval::from_endpoints(f64::NEG_INFINITY, 0.0).unwrap()
        }
        fn probability_density(&self, x: f64) -> f64 {
            HalfLine.probability_density(-x)
        }
    }

    /// Unit normal centred at 1000, density only: far from where the
    /// unbounded-domain maps place their first nodes.
    struct FarNormal;

    impl Distribution for FarNormal {
        fn support(&self) -> Interval {
            Interval::REAL_LINE
        }
        fn probability_density(&self, x: f64) -> f64 {
            let z = x - 1000.0;
            (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
        }
    }

    // --- probabilities ---

    #[test]
    fn test_left_probability_default() {
        let d = Ramp;
        assert_eq!(d.left_probability(-1.0).unwrap(), 0.0);
        assert_eq!(d.left_probability(0.0).unwrap(), 0.0);
        assert_relative_eq!(d.left_probability(0.5).unwrap(), 0.25, max_relative = 1e-12);
        assert_eq!(d.left_probability(1.0).unwrap(), 1.0);
        assert_eq!(d.left_probability(2.0).unwrap(), 1.0);
    }

    #[test]
    fn test_right_probability_default() {
        let d = Ramp;
        assert_relative_eq!(d.right_probability(0.5).unwrap(), 0.75, max_relative = 1e-12);
        assert_eq!(d.right_probability(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_nan_argument_is_domain_error() {
        assert!(matches!(Ramp.left_probability(f64::NAN), Err(NumericsError::Domain(_))));
    }

    #[test]
    fn test_unbounded_left_probability() {
        let d = Logistic;
        assert_relative_eq!(d.left_probability(0.0).unwrap(), 0.5, max_relative = 1e-12);
        let expected = 1.0 / (1.0 + (-1.5_f64).exp());
        assert_relative_eq!(d.left_probability(1.5).unwrap(), expected, max_relative = 1e-12);
    }

    // --- inverse ---

    #[test]
    fn test_inverse_bounded() {
        let d = Ramp;
        assert_eq!(d.inverse_left_probability(0.0).unwrap(), 0.0);
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), 1.0);
        assert_relative_eq!(d.inverse_left_probability(0.25).unwrap(), 0.5, max_relative = 1e-10);
        assert_relative_eq!(d.inverse_right_probability(0.75).unwrap(), 0.5, max_relative = 1e-10);
    }

    #[test]
    fn test_inverse_rejects_bad_probability() {
        for p in [-0.1, 1.1, f64::NAN] {
            assert!(matches!(
                Ramp.inverse_left_probability(p),
                Err(NumericsError::Domain(_))
            ));
            assert!(matches!(
                Ramp.inverse_right_probability(p),
                Err(NumericsError::Domain(_))
            ));
        }
    }

    #[test]
    fn test_inverse_half_lines() {
        let d = HalfLine;
        assert_eq!(d.inverse_left_probability(0.0).unwrap(), 0.0);
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), f64::INFINITY);
        let x = d.inverse_left_probability(0.9).unwrap();
        assert_relative_eq!(x, 10.0_f64.ln() / 2.0, max_relative = 1e-10);

        let m = NegativeHalfLine;
        assert_eq!(m.inverse_left_probability(0.0).unwrap(), f64::NEG_INFINITY);
        let y = m.inverse_left_probability(0.1).unwrap();
        assert_relative_eq!(y, -(10.0_f64.ln()) / 2.0, max_relative = 1e-10);
    }

    #[test]
    fn test_inverse_real_line() {
        let d = Logistic;
        assert_eq!(d.inverse_left_probability(0.0).unwrap(), f64::NEG_INFINITY);
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), f64::INFINITY);
        for p in [0.01, 0.3, 0.5, 0.8, 0.999] {
            let x = d.inverse_left_probability(p).unwrap();
            let logit = (p / (1.0 - p)).ln();
            assert!((x - logit).abs() < 1e-9, "p={p}: {x} vs {logit}");
        }
    }

    // --- moments ---

    #[test]
    fn test_moments_default() {
        let d = Ramp;
        assert_eq!(d.moment(0).unwrap(), 1.0);
        assert_relative_eq!(d.mean().unwrap(), 2.0 / 3.0, max_relative = 1e-12);
        assert_eq!(d.moment(1).unwrap(), d.mean().unwrap());
        // E[Xⁿ] = 2/(n+2)
        assert_relative_eq!(d.moment(2).unwrap(), 0.5, max_relative = 1e-12);
        assert_relative_eq!(d.moment(5).unwrap(), 2.0 / 7.0, max_relative = 1e-12);
    }

    #[test]
    fn test_central_moments_default() {
        let d = Ramp;
        assert_eq!(d.moment_about_mean(0).unwrap(), 1.0);
        assert_eq!(d.moment_about_mean(1).unwrap(), 0.0);
        assert_relative_eq!(d.variance().unwrap(), 1.0 / 18.0, max_relative = 1e-12);
        assert_relative_eq!(
            d.standard_deviation().unwrap(),
            (1.0_f64 / 18.0).sqrt(),
            max_relative = 1e-12
        );
        // Triangular(0, 1, 1): skewness −2√2/5, excess kurtosis −3/5
        assert_relative_eq!(d.skewness().unwrap(), -2.0 * 2.0_f64.sqrt() / 5.0, max_relative = 1e-10);
        assert_relative_eq!(d.excess_kurtosis().unwrap(), -0.6, max_relative = 1e-10);
    }

    #[test]
    fn test_logistic_moments() {
        let d = Logistic;
        assert!(d.mean().unwrap().abs() < 1e-12);
        assert_relative_eq!(d.variance().unwrap(), PI * PI / 3.0, max_relative = 1e-10);
        assert!(d.skewness().unwrap().abs() < 1e-10);
        assert_relative_eq!(d.excess_kurtosis().unwrap(), 1.2, max_relative = 1e-9);
        assert!(d.median().unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_expectation_value() {
        let d = HalfLine;
        // E[e^{X}] = 2 / (2 − 1)
        assert_relative_eq!(d.expectation_value(&|x| x.exp()).unwrap(), 2.0, max_relative = 1e-10);
        // Zero density dominates an infinite weight.
        let r = Ramp.expectation_value(&|x| 1.0 / x).unwrap();
        assert_relative_eq!(r, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_far_mass_is_not_missed() {
        let d = FarNormal;
        assert_relative_eq!(d.expectation_value(&|_| 1.0).unwrap(), 1.0, max_relative = 1e-10);
        assert_relative_eq!(d.mean().unwrap(), 1000.0, max_relative = 1e-10);
        assert_relative_eq!(d.left_probability(2000.0).unwrap(), 1.0, max_relative = 1e-10);
        // Φ(−1)
        assert_relative_eq!(
            d.left_probability(999.0).unwrap(),
            0.15865525393145707,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_trait_objects() {
        let all: Vec<Box<dyn Distribution>> = vec![Box::new(Ramp), Box::new(HalfLine)];
        for d in &all {
            assert_relative_eq!(d.moment(0).unwrap(), 1.0);
            let total = d.expectation_value(&|_| 1.0).unwrap();
            assert_relative_eq!(total, 1.0, max_relative = 1e-12);
        }
    }
}
