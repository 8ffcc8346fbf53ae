//! Scalar root finding for monotone functions.
//!
//! Used to invert cumulative distribution functions: [`expand_bracket`]
//! walks outward from a seed until the target value is straddled, then
//! [`brent`] solves inside the bracket.

use crate::error::{NumericsError, Result};

/// Iteration cap for [`brent`]. Brent's method bisects at least every few
/// steps, so a bracket of any finite width converges well before this.
const MAX_ITERATIONS: usize = 500;

/// Doubling steps available to [`expand_bracket`] before the step itself
/// overflows.
const MAX_EXPANSIONS: usize = 1100;

/// Direction in which [`expand_bracket`] searches from its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Decreasing `x`, looking for `f(x) ≤ target`.
    Below,
    /// Increasing `x`, looking for `f(x) ≥ target`.
    Above,
}

/// Finds an end of a bracket for `f(x) = target`, with `f` non-decreasing.
///
/// Starting at `seed`, tries `seed ∓ 1, seed ∓ 2, seed ∓ 4, …` until
/// `f(x) ≤ target` ([`Direction::Below`]) or `f(x) ≥ target`
/// ([`Direction::Above`]). The seed itself is returned if it already
/// qualifies.
///
/// # Errors
/// [`NumericsError::RootNotBracketed`] if `x` overflows before the target
/// is reached; errors from `f` are propagated.
///
/// # Examples
/// ```
/// use u_numbase::roots::{expand_bracket, Direction};
/// let hi = expand_bracket(|x: f64| Ok(x * x * x), 1000.0, 0.0, Direction::Above).unwrap();
/// assert!(hi * hi * hi >= 1000.0);
/// ```
pub fn expand_bracket<F>(mut f: F, target: f64, seed: f64, direction: Direction) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let reached = |y: f64| match direction {
        Direction::Below => y <= target,
        Direction::Above => y >= target,
    };
    if reached(f(seed)?) {
        return Ok(seed);
    }
    let mut step = 1.0_f64;
    for _ in 0..MAX_EXPANSIONS {
        let x = match direction {
            Direction::Below => seed - step,
            Direction::Above => seed + step,
        };
        if !x.is_finite() {
            break;
        }
        if reached(f(x)?) {
            log::debug!("bracketed target {target} at x={x} from seed {seed}");
            return Ok(x);
        }
        step *= 2.0;
    }
    Err(NumericsError::RootNotBracketed { target })
}

/// Solves `f(x) = target` for `x` between `lo` and `hi` by Brent's method.
///
/// `f(lo) − target` and `f(hi) − target` must not have the same strict
/// sign. The result is accurate to a few ulps of `x`.
///
/// # Errors
/// - [`NumericsError::RootNotBracketed`] if the endpoints do not straddle
///   `target` or `f` returns NaN.
/// - [`NumericsError::RootNotConverged`] if the bracket has not shrunk to
///   the tolerance after the iteration cap.
///
/// Errors from `f` are propagated.
///
/// # Examples
/// ```
/// use u_numbase::roots::brent;
/// let r = brent(|x: f64| Ok(x * x), 2.0, 0.0, 2.0).unwrap();
/// assert!((r - 2.0_f64.sqrt()).abs() < 1e-15);
/// ```
///
/// # Reference
/// Brent (1973), *Algorithms for Minimization without Derivatives*, ch. 4.
pub fn brent<F>(f: F, target: f64, lo: f64, hi: f64) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    brent_with_limit(f, target, lo, hi, MAX_ITERATIONS)
}

fn brent_with_limit<F>(
    mut f: F,
    target: f64,
    lo: f64,
    hi: f64,
    max_iterations: usize,
) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut g = |x: f64| -> Result<f64> { Ok(f(x)? - target) };
    let not_bracketed = || NumericsError::RootNotBracketed { target };

    let (mut a, mut b) = (lo, hi);
    let (mut fa, mut fb) = (g(a)?, g(b)?);
    if fa.is_nan() || fb.is_nan() {
        return Err(not_bracketed());
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(not_bracketed());
    }

    let floor = f64::EPSILON * f64::EPSILON * (hi - lo).abs();
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * floor;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two points are distinct.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = g(b)?;
        if fb.is_nan() {
            return Err(not_bracketed());
        }
    }

    log::warn!("brent stopped after {max_iterations} iterations at x={b} for target {target}");
    Err(NumericsError::RootNotConverged {
        target,
        iterations: max_iterations,
        estimate: b,
    })
}
