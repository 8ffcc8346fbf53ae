//! Adaptive numerical integration of real functions over an [`Interval`].
//!
//! # Algorithm
//!
//! 1. **Domain mapping.** Unbounded domains are mapped onto finite ones and
//!    the integrand is multiplied by the Jacobian of the map:
//!    - `[a, ∞)`: `x = a + t/(1−t)`, `t ∈ [0, 1)`
//!    - `(−∞, b]`: `x = b − t/(1−t)`, `t ∈ [0, 1)`
//!    - `(−∞, ∞)`: `x = t/((1−t)(1+t))`, `t ∈ (−1, 1)`
//! 2. **Local rule.** Each segment is evaluated with the 15-point Kronrod
//!    rule and its embedded 7-point Gauss rule. `|K15 − G7|` is the error
//!    indicator. All nodes are interior, so endpoints (including the images
//!    of ±∞ and integrable endpoint singularities) are never evaluated.
//! 3. **Global refinement.** Segments are kept in a max-heap keyed by error.
//!    While the summed error exceeds
//!    `max(absolute_tolerance, relative_tolerance · ∫|f|)`, the worst
//!    segment is bisected.
//! 4. **Blind segments.** A segment whose 15 samples are all zero says
//!    nothing about a narrow peak between its nodes. If the first pass is
//!    entirely zero, every segment is bisected level by level until some
//!    sample is non-zero. Afterwards a blind child of a segment with a
//!    non-zero error inherits half that error, for a bounded number of
//!    generations, so the neighbourhood of a faint tail keeps being
//!    refined until the peak behind it is found.
//! 5. **Failure.** Running out of subdivisions, or reaching a segment too
//!    narrow to bisect, is reported as [`NumericsError::Integration`].
//!
//! Reference: Piessens et al. (1983), *QUADPACK*, routines QK15 and QAGI.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::elementary::pow;
use crate::error::{NumericsError, Result};
use crate::interval::Interval;

/// Kronrod abscissae on `[0, 1]`; odd indices are the Gauss nodes.
#[allow(clippy::excessive_precision)]
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

/// Kronrod weights matching [`XGK`].
#[allow(clippy::excessive_precision)]
const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]` and the center.
#[allow(clippy::excessive_precision)]
const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

const KRONROD_POINTS: usize = 15;

/// Levels of uniform bisection tried when the first pass sees only zeros.
const MAX_ZERO_SEARCH_DEPTH: u32 = 14;

/// Generations a blind segment may inherit its parent's error.
const MAX_BLIND_GENERATIONS: u8 = 8;

/// Bisections of blind segments allowed outside the subdivision budget.
const MAX_BLIND_BISECTIONS: usize = 1 << 14;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Precision targets and budget for [`integrate_with_settings`].
///
/// Deserializable from any serde format; missing fields take their
/// defaults.
///
/// # Examples
/// ```
/// use u_numbase::integrate::IntegrationSettings;
/// let s = IntegrationSettings::default()
///     .with_relative_tolerance(1e-8)
///     .with_max_subdivisions(50);
/// assert!(s.validate().is_ok());
/// assert!(s.with_relative_tolerance(-1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    /// Stop once the error estimate is below this fraction of `∫|f|`.
    pub relative_tolerance: f64,
    /// Floor on the accepted error, for integrals that are nearly zero.
    pub absolute_tolerance: f64,
    /// Number of bisections allowed before giving up. Bisections of
    /// segments whose samples were all zero are not counted.
    pub max_subdivisions: usize,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            relative_tolerance: 1.0e-12,
            absolute_tolerance: 0.0,
            max_subdivisions: 1000,
        }
    }
}

impl IntegrationSettings {
    pub fn with_relative_tolerance(self, relative_tolerance: f64) -> Self {
        Self {
            relative_tolerance,
            ..self
        }
    }

    pub fn with_absolute_tolerance(self, absolute_tolerance: f64) -> Self {
        Self {
            absolute_tolerance,
            ..self
        }
    }

    pub fn with_max_subdivisions(self, max_subdivisions: usize) -> Self {
        Self {
            max_subdivisions,
            ..self
        }
    }

    /// Checks that the tolerances are usable.
    ///
    /// # Errors
    /// [`NumericsError::Domain`] if a tolerance is negative or not finite,
    /// the relative tolerance is `≥ 1`, both tolerances are zero, or the
    /// subdivision budget is zero.
    pub fn validate(&self) -> Result<()> {
        let rel = self.relative_tolerance;
        let abs = self.absolute_tolerance;
        if !rel.is_finite() || !(0.0..1.0).contains(&rel) {
            return Err(NumericsError::domain(format!(
                "relative tolerance must lie in [0, 1), got {rel}"
            )));
        }
        if !abs.is_finite() || abs < 0.0 {
            return Err(NumericsError::domain(format!(
                "absolute tolerance must be finite and non-negative, got {abs}"
            )));
        }
        if rel == 0.0 && abs == 0.0 {
            return Err(NumericsError::domain(
                "at least one of the tolerances must be positive",
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(NumericsError::domain("max_subdivisions must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of a converged integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationResult {
    pub value: f64,
    pub error_estimate: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    /// Number of bisections performed, including those of blind segments.
    pub subdivisions: usize,
}

// ---------------------------------------------------------------------------
// Domain mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Transform {
    Identity,
    /// `[a, ∞)`
    UpperTail(f64),
    /// `(−∞, b]`
    LowerTail(f64),
    /// `(−∞, ∞)`
    RealLine,
}

impl Transform {
    /// Chooses the map for `domain` and returns it with the finite range
    /// of the new variable.
    fn for_domain(domain: &Interval) -> (Self, f64, f64) {
        match (domain.is_left_bounded(), domain.is_right_bounded()) {
            (true, true) => (Transform::Identity, domain.left(), domain.right()),
            (true, false) => (Transform::UpperTail(domain.left()), 0.0, 1.0),
            (false, true) => (Transform::LowerTail(domain.right()), 0.0, 1.0),
            (false, false) => (Transform::RealLine, -1.0, 1.0),
        }
    }

    /// Evaluates `f(x(t)) · dx/dt`.
    fn apply<F: Fn(f64) -> f64>(self, f: &F, t: f64) -> f64 {
        let (x, jacobian) = match self {
            Transform::Identity => return f(t),
            Transform::UpperTail(a) => {
                let s = 1.0 - t;
                (a + t / s, pow(s, -2))
            }
            Transform::LowerTail(b) => {
                let s = 1.0 - t;
                (b - t / s, pow(s, -2))
            }
            Transform::RealLine => {
                let s = (1.0 - t) * (1.0 + t);
                (t / s, (1.0 + t * t) * pow(s, -2))
            }
        };
        // Points pushed to infinity by rounding lie outside every integrable tail.
        if !x.is_finite() {
            return 0.0;
        }
        let y = f(x);
        if y == 0.0 {
            0.0
        } else {
            y * jacobian
        }
    }
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Segment {
    left: f64,
    right: f64,
    value: f64,
    error: f64,
    /// `∫|f|` over the segment.
    magnitude: f64,
    /// Non-zero when `error` was inherited from a parent rather than
    /// measured: the number of blind ancestors including this segment.
    blind_generation: u8,
}

impl Segment {
    fn evaluate<G: Fn(f64) -> f64>(g: &G, left: f64, right: f64) -> Self {
        let center = 0.5 * left + 0.5 * right;
        let half = 0.5 * right - 0.5 * left;

        let fc = g(center);
        let mut kronrod = WGK[7] * fc;
        let mut gauss = WG[3] * fc;
        let mut magnitude = WGK[7] * fc.abs();

        for (j, (&x, &w)) in XGK[..7].iter().zip(&WGK[..7]).enumerate() {
            let dx = half * x;
            let f1 = g(center - dx);
            let f2 = g(center + dx);
            kronrod += w * (f1 + f2);
            magnitude += w * (f1.abs() + f2.abs());
            if j % 2 == 1 {
                gauss += WG[j / 2] * (f1 + f2);
            }
        }

        Self {
            left,
            right,
            value: kronrod * half,
            error: ((kronrod - gauss) * half).abs(),
            magnitude: magnitude * half,
            blind_generation: 0,
        }
    }

    fn is_blind(&self) -> bool {
        self.magnitude == 0.0
    }

    /// Gives a blind child half of its parent's error, so that the region
    /// stays a candidate for refinement.
    fn inherit_from(&mut self, parent: &Segment) {
        if self.is_blind() && parent.error > 0.0 && parent.blind_generation < MAX_BLIND_GENERATIONS
        {
            self.error = 0.5 * parent.error;
            self.blind_generation = parent.blind_generation + 1;
        }
    }

    fn midpoint(&self) -> Option<f64> {
        let mid = 0.5 * self.left + 0.5 * self.right;
        (self.left < mid && mid < self.right).then_some(mid)
    }
}

// Heap order is by error only.
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

/// Neumaier compensated summation.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Integrates `f` over `domain` with [`IntegrationSettings::default`].
///
/// # Errors
/// See [`integrate_with_settings`].
///
/// # Examples
/// ```
/// use u_numbase::integrate::integrate;
/// use u_numbase::interval::Interval;
/// let i = integrate(|x| (-x).exp(), Interval::NON_NEGATIVE).unwrap();
/// assert!((i - 1.0).abs() < 1e-12);
/// let g = integrate(|x| (-x * x).exp(), Interval::REAL_LINE).unwrap();
/// assert!((g - std::f64::consts::PI.sqrt()).abs() < 1e-12);
/// ```
pub fn integrate<F>(f: F, domain: Interval) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    integrate_with_settings(f, domain, &IntegrationSettings::default()).map(|r| r.value)
}

/// Integrates `f` over `domain` to the precision requested by `settings`.
///
/// A degenerate domain integrates to zero without evaluating `f`.
///
/// # Errors
/// - [`NumericsError::Domain`] if `settings` fails validation.
/// - [`NumericsError::NonFiniteIntegrand`] if `f` yields NaN or ±∞.
/// - [`NumericsError::Integration`] if the tolerance is not met within
///   `settings.max_subdivisions` bisections.
pub fn integrate_with_settings<F>(
    f: F,
    domain: Interval,
    settings: &IntegrationSettings,
) -> Result<IntegrationResult>
where
    F: Fn(f64) -> f64,
{
    settings.validate()?;
    if domain.width() == 0.0 {
        return Ok(IntegrationResult {
            value: 0.0,
            error_estimate: 0.0,
            evaluations: 0,
            subdivisions: 0,
        });
    }

    let non_finite = || NumericsError::NonFiniteIntegrand {
        left: domain.left(),
        right: domain.right(),
    };

    let (transform, lo, hi) = Transform::for_domain(&domain);
    let g = |t: f64| transform.apply(&f, t);

    let first = Segment::evaluate(&g, lo, hi);
    if !first.value.is_finite() {
        log::warn!("integrand is not finite on {domain}");
        return Err(non_finite());
    }

    let mut evaluations = KRONROD_POINTS;
    let mut subdivisions = 0;
    let mut charged = 0;
    let mut blind_bisections = 0;
    let mut initial = vec![first];

    // A zero first pass may just have stepped over a narrow peak.
    let mut depth = 0;
    while initial.iter().all(Segment::is_blind) && depth < MAX_ZERO_SEARCH_DEPTH {
        let mut next = Vec::with_capacity(2 * initial.len());
        for segment in &initial {
            match segment.midpoint() {
                Some(mid) => {
                    let left = Segment::evaluate(&g, segment.left, mid);
                    let right = Segment::evaluate(&g, mid, segment.right);
                    evaluations += 2 * KRONROD_POINTS;
                    subdivisions += 1;
                    if !left.value.is_finite() || !right.value.is_finite() {
                        log::warn!("integrand is not finite on {domain}");
                        return Err(non_finite());
                    }
                    next.push(left);
                    next.push(right);
                }
                None => next.push(*segment),
            }
        }
        if next.len() == initial.len() {
            break;
        }
        initial = next;
        depth += 1;
    }
    if depth > 0 {
        log::debug!(
            "zero first pass over {domain}; searched {depth} levels ({} segments)",
            initial.len()
        );
    }

    let mut value: f64 = initial.iter().map(|s| s.value).sum();
    let mut error: f64 = initial.iter().map(|s| s.error).sum();
    let mut magnitude: f64 = initial.iter().map(|s| s.magnitude).sum();
    let mut segments: BinaryHeap<Segment> = initial.into_iter().collect();

    loop {
        let tolerance = settings
            .absolute_tolerance
            .max(settings.relative_tolerance * magnitude);
        if error <= tolerance {
            // The running total drifts; confirm against a fresh sum.
            error = segments.iter().map(|s| s.error).sum();
            if error <= tolerance {
                break;
            }
        }

        let worst = match segments.peek() {
            Some(&worst) => worst,
            None => break,
        };
        let blind = worst.is_blind();
        let mid = match worst.midpoint() {
            Some(mid) if blind || charged < settings.max_subdivisions => mid,
            None if blind => {
                // Nothing left to look at; drop the inherited error.
                segments.pop();
                error -= worst.error;
                segments.push(Segment { error: 0.0, ..worst });
                continue;
            }
            _ => {
                log::warn!(
                    "integration over {domain} stopped after {subdivisions} subdivisions \
                     (estimate {value:e}, error {error:e}, tolerance {tolerance:e})"
                );
                return Err(NumericsError::Integration {
                    subdivisions,
                    estimate: value,
                    error_estimate: error,
                });
            }
        };
        segments.pop();

        let mut left = Segment::evaluate(&g, worst.left, mid);
        let mut right = Segment::evaluate(&g, mid, worst.right);
        evaluations += 2 * KRONROD_POINTS;
        subdivisions += 1;
        if !left.value.is_finite() || !right.value.is_finite() {
            log::warn!("integrand is not finite on {domain}");
            return Err(non_finite());
        }
        if blind {
            blind_bisections += 1;
        } else {
            charged += 1;
        }
        if blind_bisections <= MAX_BLIND_BISECTIONS {
            left.inherit_from(&worst);
            right.inherit_from(&worst);
        }

        value += left.value + right.value - worst.value;
        error += left.error + right.error - worst.error;
        magnitude += left.magnitude + right.magnitude - worst.magnitude;
        segments.push(left);
        segments.push(right);
    }

    let value = compensated_sum(segments.iter().map(|s| s.value));
    log::debug!(
        "integrated over {domain}: {value:e} ± {error:e} \
         ({subdivisions} subdivisions, {evaluations} evaluations)"
    );
    Ok(IntegrationResult {
        value,
        error_estimate: error,
        evaluations,
        subdivisions,
    })
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn additive_over_split(a in -5.0_f64..0.0, m in 0.0_f64..1.0, b in 1.0_f64..5.0) {
            let f = |x: f64| (x * 1.3).sin() + x * x;
            let whole = integrate(f, Interval::from_endpoints(a, b).unwrap()).unwrap();
            let left = integrate(f, Interval::from_endpoints(a, m).unwrap()).unwrap();
            let right = integrate(f, Interval::from_endpoints(m, b).unwrap()).unwrap();
            prop_assert!((whole - left - right).abs() < 1e-10 * (1.0 + whole.abs()));
        }

        #[test]
        fn exponential_tail(a in -10.0_f64..10.0, rate in 0.1_f64..10.0) {
            let v = integrate(|x| (-rate * (x - a)).exp(), Interval::from_endpoints(a, f64::INFINITY).unwrap()).unwrap();
            prop_assert!((v * rate - 1.0).abs() < 1e-10, "rate={rate}, v={v}");
        }

        #[test]
        fn gaussian_anywhere_on_line(mu in -20.0_f64..20.0, sigma in 0.2_f64..5.0) {
            let v = integrate(
                |x| (-0.5 * ((x - mu) / sigma).powi(2)).exp(),
                Interval::REAL_LINE,
            ).unwrap();
            let exact = sigma * (2.0 * std::f64::consts::PI).sqrt();
            prop_assert!(((v - exact) / exact).abs() < 1e-10, "mu={mu}, sigma={sigma}, v={v}");
        }
    }
}
