//! Linear systems assembled from the annuity identity.
//!
//! Row `r` uses the interest rate `r + 1`:
//!
//! ```text
//! a[r, c] = growth_factor(r + 1, c + 1) = (r + 2)^c
//! y[r]    = annuity_sum(r + 1, n)
//! ```
//!
//! so `a` is a Vandermonde matrix on the nodes `2, 3, ..., n + 1` and, by the
//! identity, the all-ones vector solves `a x = y` exactly.

use crate::Float;
use crate::annuity::{IdentityCheck, annuity_sum, growth_factor, verify_identity};
use crate::error::{LinsysError, Result};
use crate::tensor::Tensor;

/// A square coefficient matrix with its right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem<T: Float> {
    pub a: Tensor<T>,
    pub y: Tensor<T>,
}

impl<T: Float> LinearSystem<T> {
    /// Pair a matrix with a right-hand side after checking their shapes.
    pub fn new(a: Tensor<T>, y: Tensor<T>) -> Result<Self> {
        check_shapes(&a, &y)?;
        Ok(Self { a, y })
    }

    pub fn dim(&self) -> usize {
        self.y.numel()
    }
}

/// Overwrite an `n x n` matrix and a length-`n` vector with the annuity system.
pub fn fill_system<T: Float>(a: &mut Tensor<T>, y: &mut Tensor<T>) -> Result<()> {
    let n = check_shapes(a, y)?;
    let coefficients = a.as_mut_slice();
    let rhs = y.as_mut_slice();
    for row in 0..n {
        let rate = T::from_usize(row + 1);
        for col in 0..n {
            coefficients[row * n + col] = growth_factor(rate, col + 1);
        }
        rhs[row] = annuity_sum(rate, n);
    }
    Ok(())
}

/// Allocate and fill the `n`-dimensional annuity system.
///
/// ```
/// # use linsys_core::system::build_system;
/// let sys = build_system::<f64>(3).unwrap();
/// assert_eq!(sys.a.as_slice(), &[1.0, 2.0, 4.0, 1.0, 3.0, 9.0, 1.0, 4.0, 16.0]);
/// assert_eq!(sys.y.as_slice(), &[7.0, 13.0, 21.0]);
/// ```
pub fn build_system<T: Float>(n: usize) -> Result<LinearSystem<T>> {
    if n == 0 {
        return Err(LinsysError::InvalidArgument {
            reason: "system dimension must be at least 1",
        });
    }
    let mut a = Tensor::zeros(vec![n, n]);
    let mut y = Tensor::zeros(vec![n]);
    fill_system(&mut a, &mut y)?;
    Ok(LinearSystem { a, y })
}

/// Check the annuity identity for the rate of every row of the `n`-system.
pub fn check_system<T: Float>(n: usize) -> Vec<IdentityCheck<T>> {
    (1..=n)
        .map(|rate| verify_identity(T::from_usize(rate), n))
        .collect()
}

pub(crate) fn check_shapes<T: Float>(a: &Tensor<T>, y: &Tensor<T>) -> Result<usize> {
    let n = a.square_dim()?;
    let len = y.vector_len()?;
    if len != n {
        return Err(LinsysError::DimensionMismatch {
            expected: vec![n],
            got: vec![len],
        });
    }
    Ok(n)
}
