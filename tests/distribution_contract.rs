//! Properties every [`Distribution`] must satisfy, checked across all
//! concrete types through trait objects.

use approx::assert_relative_eq;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use u_numbase::distribution::Distribution;
use u_numbase::distributions::{
    ChiSquared, Exponential, LogNormal, Normal, Pert, StudentT, Triangular, Uniform,
};
use u_numbase::integrate::integrate;
use u_numbase::interval::Interval;

const PROBABILITIES: [f64; 5] = [1e-5, 0.05, 0.5, 0.95, 0.99999];

fn distributions() -> Vec<(&'static str, Box<dyn Distribution>)> {
    vec![
        ("uniform", Box::new(Uniform::new(-2.0, 1.0).unwrap())),
        ("normal", Box::new(Normal::new(3.0, 2.0).unwrap())),
        ("exponential", Box::new(Exponential::new(0.5).unwrap())),
        ("chi_squared", Box::new(ChiSquared::new(3.0).unwrap())),
        ("student_t", Box::new(StudentT::new(5.0).unwrap())),
        ("log_normal", Box::new(LogNormal::new(0.2, 0.4).unwrap())),
        ("triangular", Box::new(Triangular::new(1.0, 2.0, 6.0).unwrap())),
        ("pert", Box::new(Pert::new(0.0, 2.0, 10.0).unwrap())),
    ]
}

/// Relative agreement, falling back to absolute agreement near zero.
fn nearly_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn median_is_inverse_of_one_half() {
    for (name, d) in distributions() {
        let median = d.median().unwrap();
        let inverse = d.inverse_left_probability(0.5).unwrap();
        assert!(nearly_equal(median, inverse, 1e-10), "{name}: m={median}, P⁻¹(½)={inverse}");
    }
}

#[test]
fn moment_special_cases() {
    for (name, d) in distributions() {
        assert_eq!(d.moment(0).unwrap(), 1.0, "{name}");
        assert_eq!(d.moment(1).unwrap(), d.mean().unwrap(), "{name}");
        assert_eq!(d.moment_about_mean(0).unwrap(), 1.0, "{name}");
        assert_eq!(d.moment_about_mean(1).unwrap(), 0.0, "{name}");
        let sigma = d.standard_deviation().unwrap();
        let c2 = d.moment_about_mean(2).unwrap();
        assert!(nearly_equal(c2, sigma * sigma, 1e-10), "{name}: C2={c2}, σ²={}", sigma * sigma);
    }
}

#[test]
fn raw_and_central_moments_agree() {
    for (name, d) in distributions() {
        let m1 = d.moment(1).unwrap();
        let m2 = d.moment(2).unwrap();
        let m3 = d.moment(3).unwrap();
        let c2 = d.moment_about_mean(2).unwrap();
        let c3 = d.moment_about_mean(3).unwrap();
        // C2 = M2 − M1²
        assert!(nearly_equal(c2 + m1 * m1, m2, 1e-9), "{name}: C2={c2}, M1={m1}, M2={m2}");
        // C3 = M3 − 3 M2 M1 + 2 M1³
        assert!(
            nearly_equal(c3 + 3.0 * m2 * m1, m3 + 2.0 * m1 * m1 * m1, 1e-9),
            "{name}: C3={c3}, M1={m1}, M2={m2}, M3={m3}"
        );
    }
}

#[test]
fn mean_and_median_within_one_deviation() {
    for (name, d) in distributions() {
        let gap = (d.mean().unwrap() - d.median().unwrap()).abs();
        assert!(gap <= d.standard_deviation().unwrap(), "{name}: |mean − median| = {gap}");
    }
}

#[test]
fn inverse_is_strictly_increasing() {
    for (name, d) in distributions() {
        let xs: Vec<f64> = PROBABILITIES
            .iter()
            .map(|&p| d.inverse_left_probability(p).unwrap())
            .collect();
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1], "{name}: {xs:?}");
        }
    }
}

#[test]
fn inverse_round_trips() {
    for (name, d) in distributions() {
        for p in PROBABILITIES {
            let x = d.inverse_left_probability(p).unwrap();
            let back = d.left_probability(x).unwrap();
            assert!(((back - p) / p).abs() < 1e-8, "{name}: p={p}, x={x}, P(x)={back}");
            let q = d.inverse_right_probability(1.0 - p).unwrap();
            assert!(nearly_equal(q, x, 1e-8), "{name}: {q} vs {x}");
        }
    }
}

#[test]
fn inverse_endpoints_are_support_endpoints() {
    for (name, d) in distributions() {
        let support = d.support();
        assert_eq!(d.inverse_left_probability(0.0).unwrap(), support.left(), "{name}");
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), support.right(), "{name}");
        assert!(d.inverse_left_probability(-0.5).is_err(), "{name}");
        assert!(d.inverse_left_probability(f64::NAN).is_err(), "{name}");
    }
}

#[test]
fn probabilities_are_consistent() {
    for (name, d) in distributions() {
        // Some points fall outside the support; those must give 0 or 1.
        for x in (0..5).map(|i| 10.0_f64.powi(i - 2)) {
            for x in [x, -x] {
                let p = d.left_probability(x).unwrap();
                let q = d.right_probability(x).unwrap();
                assert!((0.0..=1.0).contains(&p), "{name}: P({x})={p}");
                assert!((0.0..=1.0).contains(&q), "{name}: Q({x})={q}");
                assert!(nearly_equal(p + q, 1.0, 1e-12), "{name}: P+Q={} at {x}", p + q);
                assert!(d.probability_density(x) >= 0.0, "{name}: p({x}) < 0");
            }
        }
    }
}

#[test]
fn density_integrates_to_one() {
    for (name, d) in distributions() {
        let m0 = integrate(|x| d.probability_density(x), d.support()).unwrap();
        assert!(nearly_equal(m0, 1.0, 1e-10), "{name}: ∫p = {m0}");
    }
}

#[test]
fn mean_matches_integral() {
    for (name, d) in distributions() {
        let mean = d.mean().unwrap();
        let m1 = integrate(|x| d.probability_density(x) * x, d.support()).unwrap();
        if mean == 0.0 {
            assert!(m1.abs() <= 1e-12, "{name}: ∫xp = {m1}");
        } else {
            assert!(nearly_equal(m1, mean, 1e-10), "{name}: mean={mean}, ∫xp={m1}");
        }
    }
}

#[test]
fn standard_deviation_matches_integral() {
    for (name, d) in distributions() {
        let mean = d.mean().unwrap();
        let c2 = integrate(
            |x| {
                let z = x - mean;
                d.probability_density(x) * z * z
            },
            d.support(),
        )
        .unwrap();
        let sigma = d.standard_deviation().unwrap();
        assert!(nearly_equal(c2.sqrt(), sigma, 1e-10), "{name}: σ={sigma}, √C2={}", c2.sqrt());
    }
}

#[test]
fn probabilities_match_split_integrals() {
    let mut rng = SmallRng::seed_from_u64(1);
    for (name, d) in distributions() {
        let support = d.support();
        for _ in 0..3 {
            // 1 − u lies in (0, 1], so the logarithm is finite.
            let tail = -(1.0 - rng.random::<f64>()).ln();
            let x = match (support.is_left_bounded(), support.is_right_bounded()) {
                (false, false) => {
                    if rng.random::<f64>() < 0.5 {
                        -tail
                    } else {
                        tail
                    }
                }
                (true, false) => support.left() + tail,
                _ => support.left() + rng.random::<f64>() * support.width(),
            };
            let left = Interval::from_endpoints(support.left(), x).unwrap();
            let right = Interval::from_endpoints(x, support.right()).unwrap();
            let p = integrate(|t| d.probability_density(t), left).unwrap();
            let q = integrate(|t| d.probability_density(t), right).unwrap();
            let (p_closed, q_closed) = (d.left_probability(x).unwrap(), d.right_probability(x).unwrap());
            assert!(nearly_equal(p, p_closed, 1e-10), "{name}: x={x}, ∫={p}, P={p_closed}");
            assert!(nearly_equal(q, q_closed, 1e-10), "{name}: x={x}, ∫={q}, Q={q_closed}");
        }
    }
}

#[test]
fn uniform_on_minus_two_to_one() {
    let u = Uniform::from_interval(Interval::from_endpoints(-2.0, 1.0).unwrap()).unwrap();
    assert_eq!(u.mean().unwrap(), -0.5);
    assert_eq!(u.median().unwrap(), -0.5);
    assert_relative_eq!(u.standard_deviation().unwrap(), 3.0 / 12.0_f64.sqrt(), max_relative = 1e-15);
    assert_eq!(u.left_probability(-2.0).unwrap(), 0.0);
    assert_eq!(u.left_probability(1.0).unwrap(), 1.0);
    assert_eq!(u.left_probability(-0.5).unwrap(), 0.5);
}

#[test]
fn distributions_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Uniform>();
    assert_send_sync::<Triangular>();
    assert_send_sync::<Normal>();
    assert_send_sync::<Exponential>();
    assert_send_sync::<LogNormal>();
    assert_send_sync::<ChiSquared>();
    assert_send_sync::<StudentT>();
    assert_send_sync::<Pert>();
    assert_send_sync::<Interval>();
}
