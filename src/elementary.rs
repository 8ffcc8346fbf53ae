//! Robust elementary functions.
//!
//! Replacements for naive floating-point formulas that lose precision,
//! overflow, or underflow for arguments that are perfectly representable.
//!
//! # Functions
//!
//! | Function | Naive formula | Failure avoided |
//! |---|---|---|
//! | [`pow`] | `exp(n·ln x)` | transcendental round-off for small integer `n` |
//! | [`hypot`] | `sqrt(x² + y²)` | overflow near `f64::MAX`, underflow near `f64::MIN_POSITIVE` |
//! | [`sin_pi`], [`cos_pi`] | `sin(π·x)`, `cos(π·x)` | rounding of `π·x` for large `x` |
//! | [`sin`], [`cos`] | `x − n·π/2` in double precision | cancellation for huge `x` |

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Binary expansion of 2/π after the binary point, most significant word
/// first. Enough bits to reduce every finite `f64`.
const TWO_OVER_PI: [u64; 20] = [
    0xa2f9_836e_4e44_1529,
    0xfc27_57d1_f534_ddc0,
    0xdb62_9599_3c43_9041,
    0xfe51_63ab_debb_c561,
    0xb724_6e3a_424d_d2e0,
    0x0649_2eea_09d1_921c,
    0xfe1d_eb1c_b129_a73e,
    0xe882_35f5_2ebb_4484,
    0xe99c_7026_b45f_7e41,
    0x3991_d639_8353_39f4,
    0x9c84_5f8b_bdf9_283b,
    0x1ff8_97ff_de05_980f,
    0xef2f_118b_5a0a_6d1f,
    0x6d36_7ecf_27cb_09b7,
    0x4f46_3f66_9e5f_ea2d,
    0x7527_bac7_ebe5_f17b,
    0x3d07_39f7_8a52_92ea,
    0x6bfb_5fb1_1f8d_5d08,
    0x5603_3046_fc7b_6bab,
    0xf0cf_bc20_9af4_361d,
];

/// 2⁻¹²⁶, the weight of the last bit kept by [`reduce_quarter_turns`].
const TWO_POW_MINUS_126: f64 = 1.1754943508222875e-38;

/// Integer power `xⁿ` by repeated squaring.
///
/// # Special values
/// - `pow(x, 0) == 1` for every `x`, including `0` and NaN (the exponent
///   limit is taken before the argument limit, so `0⁰ = 1`).
/// - `pow(x, 1) == x` and `pow(x, 2) == x * x` bit-exactly.
/// - Negative exponents return `1 / pow(x, |n|)`.
///
/// # Complexity
/// O(log |n|) multiplications.
///
/// # Examples
/// ```
/// use u_numbase::elementary::pow;
/// assert_eq!(pow(2.7, 2), 2.7 * 2.7);
/// assert_eq!(pow(0.0, 0), 1.0);
/// assert_eq!(pow(2.0, -3), 0.125);
/// ```
pub fn pow(x: f64, n: i32) -> f64 {
    if n < 0 {
        return 1.0 / pow_unsigned(x, n.unsigned_abs());
    }
    pow_unsigned(x, n.unsigned_abs())
}

fn pow_unsigned(x: f64, mut n: u32) -> f64 {
    let mut result = 1.0;
    let mut base = x;
    while n != 0 {
        if n & 1 == 1 {
            result *= base;
        }
        n >>= 1;
        if n != 0 {
            base *= base;
        }
    }
    result
}

/// Length of the hypotenuse `√(x² + y²)` without intermediate overflow or
/// underflow.
///
/// # Algorithm
/// Divides the smaller magnitude by the larger before squaring, so the
/// only square taken lies in `[0, 1]`:
/// ```text
/// hypot(x, y) = big · √(1 + (small/big)²)
/// ```
///
/// # Special values
/// - `hypot(0, 0) == 0`, `hypot(0, y) == |y|`.
/// - Symmetric in the sign of both arguments.
/// - An infinite argument gives `+∞` unless the other argument is NaN.
/// - Any NaN argument gives NaN. Infinity does **not** dominate NaN here.
///
/// # Examples
/// ```
/// use u_numbase::elementary::hypot;
/// let x = f64::MAX / 8.0;
/// let h = hypot(3.0 * x, 4.0 * x);
/// assert!(((h - 5.0 * x) / (5.0 * x)).abs() < 1e-15);
/// assert!(hypot(f64::INFINITY, f64::NAN).is_nan());
/// ```
pub fn hypot(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return f64::NAN;
    }
    let (x, y) = (x.abs(), y.abs());
    let (big, small) = if x >= y { (x, y) } else { (y, x) };
    if big == 0.0 {
        return 0.0;
    }
    if big.is_infinite() {
        return f64::INFINITY;
    }
    let ratio = small / big;
    big * (1.0 + ratio * ratio).sqrt()
}

/// Splits `|x| mod 2` into `k/2 + r` with `k ∈ {0,…,4}` and `|r| ≤ 1/4`.
///
/// Both steps are exact: `%` is exact in IEEE-754, and the subtraction of
/// `k/2` satisfies Sterbenz's lemma whenever `k > 0`.
fn reduce_half_turns(x: f64) -> (u8, f64) {
    let y = x.abs() % 2.0;
    let k = (2.0 * y).round();
    (k as u8, y - 0.5 * k)
}

fn sin_quadrant(k: u8, r: f64) -> f64 {
    match k % 4 {
        0 => r.sin(),
        1 => r.cos(),
        2 => -r.sin(),
        _ => -r.cos(),
    }
}

fn cos_quadrant(k: u8, r: f64) -> f64 {
    match k % 4 {
        0 => r.cos(),
        1 => -r.sin(),
        2 => -r.cos(),
        _ => r.sin(),
    }
}

/// `sin(π·x)` with exact argument reduction.
///
/// For every integer `x` the result is exactly zero, and for small `|x|`
/// it agrees with `(PI * x).sin()` to full relative precision. The
/// reduction modulo 2 happens before any multiplication by π.
///
/// Returns NaN for non-finite `x`.
///
/// # Examples
/// ```
/// use u_numbase::elementary::sin_pi;
/// assert_eq!(sin_pi(1.0e15), 0.0);
/// assert_eq!(sin_pi(0.5), 1.0);
/// assert_eq!(sin_pi(-0.5), -1.0);
/// ```
pub fn sin_pi(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    let (k, r) = reduce_half_turns(x);
    let s = sin_quadrant(k, PI * r);
    if x < 0.0 {
        -s
    } else {
        s
    }
}

/// `cos(π·x)` with exact argument reduction.
///
/// For every integer `x` the result is exactly `+1` (even) or `-1` (odd),
/// and for every half-integer it is exactly zero.
///
/// Returns NaN for non-finite `x`.
///
/// # Examples
/// ```
/// use u_numbase::elementary::cos_pi;
/// assert_eq!(cos_pi(1.0e15), 1.0);
/// assert_eq!(cos_pi(1.0e15 + 1.0), -1.0);
/// assert_eq!(cos_pi(1001.5), 0.0);
/// ```
pub fn cos_pi(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    let (k, r) = reduce_half_turns(x);
    cos_quadrant(k, PI * r)
}

/// 64 bits of 2/π starting at fraction bit `k`, where bit 1 weighs 1/2.
/// Bits at `k ≤ 0` lie before the binary point and are zero.
fn two_over_pi_bits(k: i32) -> u64 {
    let p = k - 1;
    if p <= -64 {
        return 0;
    }
    if p < 0 {
        return two_over_pi_bits(1) >> p.unsigned_abs();
    }
    let word = (p / 64) as usize;
    let shift = (p % 64) as u32;
    let head = TWO_OVER_PI[word] << shift;
    if shift == 0 {
        head
    } else {
        head | (TWO_OVER_PI[word + 1] >> (64 - shift))
    }
}

/// Payne–Hanek reduction: writes `|x| = (j + f)·π/2 (mod 2π)` with
/// `j ∈ {0,…,3}` and `|f| ≤ 1/2`, returning `j` and `f·π/2`.
///
/// `|x|` is `m·2^q` with a 53-bit integer `m`. Only the bits of 2/π that
/// land between weights 2¹ and 2⁻¹²⁶ in `m·2^q·(2/π)` are multiplied in;
/// higher bits contribute whole turns. Requires finite `|x| > π/4`.
///
/// Reference: Payne & Hanek (1983), "Radian reduction for trigonometric
/// functions", *ACM SIGNUM Newsletter* 18(1), pp. 19–24.
fn reduce_quarter_turns(x: f64) -> (u8, f64) {
    let bits = x.abs().to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = u128::from((bits & ((1 << 52) - 1)) | (1 << 52));
    let k = exponent - 1075 - 1;

    let hi = (u128::from(two_over_pi_bits(k)) << 64) | u128::from(two_over_pi_bits(k + 64));
    let lo = u128::from(two_over_pi_bits(k + 128));
    // Two integer bits and 126 fraction bits of |x|·2/π modulo 4.
    let y = mantissa.wrapping_mul(hi).wrapping_add((mantissa * lo) >> 64);

    let j = ((y.wrapping_add(1 << 125) >> 126) & 3) as u8;
    let f = y.wrapping_sub(u128::from(j) << 126) as i128;
    (j, f as f64 * FRAC_PI_2 * TWO_POW_MINUS_126)
}

/// Sine of `x` radians with exact argument reduction.
///
/// Every finite `x` is reduced modulo π/2 against a 1280-bit expansion of
/// 2/π, so the result is accurate for arguments as large as `f64::MAX`
/// independently of the platform math library.
///
/// Returns NaN for non-finite `x`.
///
/// # Examples
/// ```
/// use u_numbase::elementary::sin;
/// assert!((sin(1.0e22) - (-0.8522008497671888)).abs() < 1e-15);
/// assert_eq!(sin(0.0), 0.0);
/// ```
pub fn sin(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    if x.abs() <= FRAC_PI_4 {
        return x.sin();
    }
    let (j, r) = reduce_quarter_turns(x);
    let s = sin_quadrant(j, r);
    if x < 0.0 {
        -s
    } else {
        s
    }
}

/// Cosine of `x` radians with exact argument reduction. See [`sin`].
///
/// # Examples
/// ```
/// use u_numbase::elementary::cos;
/// assert!((cos(1.0e22) - 0.523214785395139).abs() < 1e-15);
/// assert_eq!(cos(0.0), 1.0);
/// ```
pub fn cos(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    if x.abs() <= FRAC_PI_4 {
        return x.cos();
    }
    let (j, r) = reduce_quarter_turns(x);
    cos_quadrant(j, r)
}

// ============================================================================
// Tests
// ============================================================================
