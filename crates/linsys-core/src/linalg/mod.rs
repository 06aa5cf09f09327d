//! Dense linear algebra.
//!
//! All routines are implemented from scratch, without BLAS/LAPACK
//! bindings:
//!
//! | Kind | Operations |
//! |------|-----------|
//! | vector | [`dot`], [`axpy`], [`nrm2`] |
//! | matrix-vector | [`gemv`], [`residual`] |
//! | matrix-matrix | [`gemm`] |
//!
//! Decompositions: [`LuDecomposition`] (partial pivoting, producing a
//! [`Permutation`]) and [`SvdDecomposition`] (one-sided Jacobi).

pub mod blas;
pub mod decomp;
pub mod permutation;

pub use blas::{axpy, dot, gemm, gemv, nrm2};
pub use decomp::{ConditionNumber, LuDecomposition, SvdDecomposition};
pub use permutation::Permutation;

use crate::Float;
use crate::error::Result;
use crate::tensor::Tensor;

/// Solve the linear system `Ax = b` for a square matrix `A`.
///
/// Uses LU decomposition with partial pivoting internally.
///
/// ```
/// # use linsys_core::tensor::Tensor;
/// # use linsys_core::linalg;
/// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 4.0], vec![2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5.0_f64, 6.0], vec![2]).unwrap();
/// let x = linalg::solve(&a, &b).unwrap();
/// assert!((x.as_slice()[0] - 2.0).abs() < 1e-10);
/// assert!((x.as_slice()[1] - 1.0).abs() < 1e-10);
/// ```
pub fn solve<T: Float>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    LuDecomposition::decompose(a)?.solve(b)
}

/// The residual `b - A x`.
///
/// ```
/// # use linsys_core::tensor::Tensor;
/// # use linsys_core::linalg;
/// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 3.0], vec![2, 2]).unwrap();
/// let x = Tensor::from_vec(vec![0.8_f64, 1.4], vec![2]).unwrap();
/// let b = Tensor::from_vec(vec![3.0_f64, 5.0], vec![2]).unwrap();
/// let r = linalg::residual(&a, &x, &b).unwrap();
/// assert!(r.as_slice().iter().all(|v| v.abs() < 1e-12));
/// ```
pub fn residual<T: Float>(a: &Tensor<T>, x: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    let mut r = b.clone();
    gemv(-T::one(), a, x, T::one(), &mut r)?;
    Ok(r)
}

impl<T: Float> Tensor<T> {
    /// Euclidean norm of a vector.
    pub fn norm(&self) -> Result<T> {
        nrm2(self)
    }

    /// Solve `self * x = b` for a square matrix `self`.
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        solve(self, b)
    }
}
