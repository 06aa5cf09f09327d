//! Annuity formulas.
//!
//! For an interest rate `i` and `n` periods the future value of `n` unit
//! payments satisfies
//!
//! ```text
//! sum_{j=1}^{n} (1 + i)^(j - 1)  =  ((1 + i)^n - 1) / i
//! ```
//!
//! [`growth_factor`] is one term of the left side, [`annuity_sum`] the
//! closed form on the right, and [`verify_identity`] compares the two.

use core::fmt;

use tracing::debug;

use crate::Float;
use crate::report::format_general;

/// `(1 + rate)^(term - 1)`: the value after `term - 1` periods of one unit.
///
/// ```
/// # use linsys_core::annuity::growth_factor;
/// assert_eq!(growth_factor(0.05_f64, 1), 1.0);
/// assert_eq!(growth_factor(1.0_f64, 4), 8.0);
/// ```
pub fn growth_factor<T: Float>(rate: T, term: usize) -> T {
    (T::one() + rate).powf(T::from_usize(term) - T::one())
}

/// `((1 + rate)^n - 1) / rate`: the closed-form sum of `n` growth factors.
///
/// At `rate == 0` the quotient is `0 / 0`; the limit `n` is returned instead.
pub fn annuity_sum<T: Float>(rate: T, n: usize) -> T {
    if rate == T::zero() {
        debug!(n, "zero rate, using the limit of the annuity sum");
        return T::from_usize(n);
    }
    ((T::one() + rate).powf(T::from_usize(n)) - T::one()) / rate
}

/// Both sides of the annuity identity for one `(rate, n)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentityCheck<T> {
    pub rate: T,
    pub n: usize,
    /// `sum_{j=1}^{n} growth_factor(rate, j)`
    pub left: T,
    /// `annuity_sum(rate, n)`
    pub right: T,
}

impl<T: Float> IdentityCheck<T> {
    /// `|left - right| / |right|`, or the absolute difference when `right` is 0.
    pub fn relative_error(&self) -> T {
        let diff = (self.left - self.right).abs();
        if self.right == T::zero() {
            diff
        } else {
            diff / self.right.abs()
        }
    }

    pub fn holds(&self, tol: T) -> bool {
        self.relative_error() <= tol
    }
}

impl<T: Float> fmt::Display for IdentityCheck<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i = {:>5}, n = {}, left side:  {:>10}, right side: {:>10}",
            format_general(self.rate.to_f64(), 3),
            self.n,
            format_general(self.left.to_f64(), 5),
            format_general(self.right.to_f64(), 5),
        )
    }
}

/// Sum the growth factors for `j = 1..=n` and compare with the closed form.
///
/// ```
/// # use linsys_core::annuity::verify_identity;
/// let check = verify_identity(0.05_f64, 10);
/// assert!(check.holds(1e-12));
/// assert_eq!(
///     check.to_string(),
///     "i =  0.05, n = 10, left side:      12.578, right side:     12.578"
/// );
/// ```
pub fn verify_identity<T: Float>(rate: T, n: usize) -> IdentityCheck<T> {
    let left = (1..=n).map(|j| growth_factor(rate, j)).sum();
    let right = annuity_sum(rate, n);
    IdentityCheck {
        rate,
        n,
        left,
        right,
    }
}
