//! Closed real intervals, possibly unbounded on either side.

use std::fmt;

use crate::error::{NumericsError, Result};

/// An immutable closed interval `[left, right]`.
///
/// Either endpoint may be infinite, which is how unbounded integration
/// domains and distribution supports are expressed. Equal endpoints denote
/// a degenerate interval of width zero.
///
/// # Examples
/// ```
/// use u_numbase::interval::Interval;
/// let i = Interval::from_endpoints(-2.0, 1.0).unwrap();
/// assert_eq!(i.width(), 3.0);
/// assert!(i.contains(1.0));
/// assert!(Interval::from_endpoints(1.0, -2.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    left: f64,
    right: f64,
}

impl Interval {
    /// The whole real line `(−∞, +∞)`.
    pub const REAL_LINE: Interval = Interval {
        left: f64::NEG_INFINITY,
        right: f64::INFINITY,
    };

    /// The non-negative half line `[0, +∞)`.
    pub const NON_NEGATIVE: Interval = Interval {
        left: 0.0,
        right: f64::INFINITY,
    };

    /// Creates the interval `[left, right]`.
    ///
    /// # Errors
    /// Returns [`NumericsError::Domain`] if `left > right` or either
    /// endpoint is NaN.
    pub fn from_endpoints(left: f64, right: f64) -> Result<Self> {
        if left.is_nan() || right.is_nan() || left > right {
            return Err(NumericsError::domain(format!(
                "interval requires left <= right, got left={left}, right={right}"
            )));
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    /// `right − left`; `+∞` when either side is unbounded, exactly 0 when
    /// the endpoints coincide (including `[∞, ∞]`).
    pub fn width(&self) -> f64 {
        if self.left == self.right {
            0.0
        } else {
            self.right - self.left
        }
    }

    /// Midpoint of a bounded interval. NaN for the real line, ±∞ for a
    /// half line.
    pub fn midpoint(&self) -> f64 {
        if self.left == self.right {
            self.left
        } else {
            0.5 * self.left + 0.5 * self.right
        }
    }

    /// Closed membership test: both endpoints belong to the interval.
    pub fn contains(&self, x: f64) -> bool {
        self.left <= x && x <= self.right
    }

    pub fn is_left_bounded(&self) -> bool {
        self.left.is_finite()
    }

    pub fn is_right_bounded(&self) -> bool {
        self.right.is_finite()
    }

    /// True when both endpoints are finite.
    pub fn is_bounded(&self) -> bool {
        self.is_left_bounded() && self.is_right_bounded()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}
