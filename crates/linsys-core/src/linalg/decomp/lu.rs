//! LU decomposition with partial pivoting.
//!
//! Decomposes a square matrix `A` into `PA = LU` where:
//! - `P` is a row [`Permutation`]
//! - `L` is lower triangular with unit diagonal
//! - `U` is upper triangular
//!
//! Pivot selection takes, for each column `k`, the row `i >= k` with the
//! largest `|a[i, k]|`; the first such row wins on ties. A zero pivot does
//! not abort the factorisation: the column is skipped, the factors remain
//! valid and [`LuDecomposition::is_singular`] reports it. Solving against a
//! singular factorisation fails with [`LinsysError::SingularMatrix`].

use tracing::debug;

use crate::Float;
use crate::error::{LinsysError, Result};
use crate::linalg::blas::axpy;
use crate::linalg::{Permutation, residual};
use crate::tensor::Tensor;

/// Result of an LU decomposition with partial pivoting.
///
/// `L` and `U` are packed into a single matrix (the unit diagonal of `L` is
/// implicit), the row exchanges are kept as a [`Permutation`].
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Float> {
    /// Packed factor: strict lower triangle holds L, upper triangle U.
    lu: Tensor<T>,
    permutation: Permutation,
    /// Matrix dimension (n x n).
    n: usize,
    singular: bool,
}

impl<T: Float> LuDecomposition<T> {
    /// Factor a square matrix. `a` itself is left untouched.
    ///
    /// ```
    /// # use linsys_core::tensor::Tensor;
    /// # use linsys_core::linalg::LuDecomposition;
    /// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 4.0], vec![2, 2]).unwrap();
    /// let lu = LuDecomposition::decompose(&a).unwrap();
    /// assert!((lu.det() - 7.0).abs() < 1e-10);
    /// ```
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        let n = a.square_dim()?;

        let mut lu = a.clone();
        let mut permutation = Permutation::identity(n);
        let mut singular = false;
        let data = lu.as_mut_slice();

        for k in 0..n {
            let mut max_val = data[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = data[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    data.swap(k * n + j, max_row * n + j);
                }
                permutation.swap(k, max_row);
            }

            let pivot = data[k * n + k];
            if pivot == T::zero() {
                singular = true;
                continue;
            }

            for i in (k + 1)..n {
                let factor = data[i * n + k] / pivot;
                data[i * n + k] = factor;

                for j in (k + 1)..n {
                    let ukj = data[k * n + j];
                    data[i * n + j] -= factor * ukj;
                }
            }
        }

        debug!(n, sign = permutation.sign(), singular, "LU factorisation done");

        Ok(Self {
            lu,
            permutation,
            n,
            singular,
        })
    }

    /// The packed `L\U` matrix as produced by elimination.
    pub fn packed(&self) -> &Tensor<T> {
        &self.lu
    }

    /// Extract the lower triangular matrix `L` (with unit diagonal).
    pub fn l(&self) -> Tensor<T> {
        let n = self.n;
        let src = self.lu.as_slice();
        let mut l = Tensor::eye(n);
        let dst = l.as_mut_slice();
        for i in 0..n {
            for j in 0..i {
                dst[i * n + j] = src[i * n + j];
            }
        }
        l
    }

    /// Extract the upper triangular matrix `U`.
    pub fn u(&self) -> Tensor<T> {
        let n = self.n;
        let src = self.lu.as_slice();
        let mut u = Tensor::zeros(vec![n, n]);
        let dst = u.as_mut_slice();
        for i in 0..n {
            for j in i..n {
                dst[i * n + j] = src[i * n + j];
            }
        }
        u
    }

    /// The row permutation `P`.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Whether elimination met an exactly zero pivot.
    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// `det(A) = sign(P) * product(diag(U))`.
    pub fn det(&self) -> T {
        let n = self.n;
        let src = self.lu.as_slice();
        let mut d = if self.permutation.sign() < 0 {
            -T::one()
        } else {
            T::one()
        };
        for i in 0..n {
            d *= src[i * n + i];
        }
        d
    }

    /// Solve `Ax = b` with the stored factors.
    ///
    /// `b` must be a vector of length `n`.
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        if self.singular {
            return Err(LinsysError::SingularMatrix);
        }
        let n = self.n;
        let lu = self.lu.as_slice();
        let mut x = self.permutation.apply(b)?;
        let xs = x.as_mut_slice();

        // Forward substitution: Ly = Pb
        #[allow(clippy::needless_range_loop)]
        for i in 1..n {
            for j in 0..i {
                let lij_xj = lu[i * n + j] * xs[j];
                xs[i] -= lij_xj;
            }
        }

        // Back substitution: Ux = y
        #[allow(clippy::needless_range_loop)]
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let uij_xj = lu[i * n + j] * xs[j];
                xs[i] -= uij_xj;
            }
            xs[i] /= lu[i * n + i];
        }

        Ok(x)
    }

    /// One step of iterative refinement of `x` against the original `a`.
    ///
    /// Computes `r = b - a x`, solves `LU d = r` and updates `x += d`.
    /// Returns the residual `r` that was corrected for.
    pub fn refine(&self, a: &Tensor<T>, b: &Tensor<T>, x: &mut Tensor<T>) -> Result<Tensor<T>> {
        if a.square_dim()? != self.n {
            return Err(LinsysError::DimensionMismatch {
                expected: vec![self.n, self.n],
                got: a.shape().to_vec(),
            });
        }
        let r = residual(a, x, b)?;
        let d = self.solve(&r)?;
        axpy(T::one(), &d, x)?;
        Ok(r)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn mat(data: &[f64], n: usize) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![n, n]).unwrap()
    }

    fn vector(data: &[f64]) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![data.len()]).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn assert_pa_eq_lu(a: &Tensor<f64>, tol: f64) {
        let lu = LuDecomposition::decompose(a).unwrap();
        let pa = lu.permutation().matrix::<f64>().matmul(a).unwrap();
        let prod = lu.l().matmul(&lu.u()).unwrap();
        assert!(approx_eq(pa.as_slice(), prod.as_slice(), tol));
    }

    #[test]
    fn test_lu_2x2() {
        assert_pa_eq_lu(&mat(&[2.0, 1.0, 1.0, 4.0], 2), 1e-12);
    }

    #[test]
    fn test_lu_3x3() {
        assert_pa_eq_lu(&mat(&[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0], 3), 1e-12);
    }

    #[test]
    fn test_lu_4x4() {
        let a = mat(
            &[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 2.0, 6.0, 4.0, 8.0, 3.0, 1.0, 1.0, 2.0,
            ],
            4,
        );
        assert_pa_eq_lu(&a, 1e-10);
    }

    #[test]
    fn test_partial_pivot_picks_largest() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert_eq!(lu.permutation().as_slice(), &[1, 0]);
        assert_eq!(lu.permutation().sign(), -1);
        // packed: U row 0 = [3, 4], L21 = 1/3, U22 = 2 - 4/3
        let packed = lu.packed().as_slice();
        assert_eq!(packed[0], 3.0);
        assert_eq!(packed[1], 4.0);
        assert!((packed[2] - 1.0 / 3.0).abs() < 1e-15);
        assert!((packed[3] - 2.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_pivot_tie_keeps_first_row() {
        let a = mat(&[-2.0, 1.0, 2.0, 5.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert_eq!(lu.permutation().as_slice(), &[0, 1]);
        assert_eq!(lu.permutation().sign(), 1);
    }

    #[test]
    fn test_input_untouched() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0], 2);
        let before = a.clone();
        let _ = LuDecomposition::decompose(&a).unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn test_det_3x3() {
        // >>> np.linalg.det([[6,1,1],[4,-2,5],[2,8,7]])
        // -306.0
        let a = mat(&[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert!((lu.det() - (-306.0)).abs() < 1e-10);
    }

    #[test]
    fn test_det_identity() {
        let lu = LuDecomposition::decompose(&Tensor::<f64>::eye(5)).unwrap();
        assert_eq!(lu.det(), 1.0);
    }

    #[test]
    fn test_singular_matrix_factors_but_does_not_solve() {
        let a = mat(&[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 0.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert!(lu.is_singular());
        assert_eq!(lu.det(), 0.0);
        assert!(matches!(
            lu.solve(&vector(&[1.0, 2.0, 3.0])),
            Err(LinsysError::SingularMatrix)
        ));
    }

    #[test]
    fn test_solve_2x2() {
        // 2x + y = 5, x + 4y = 6  =>  x = 2, y = 1
        let a = mat(&[2.0, 1.0, 1.0, 4.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let x = lu.solve(&vector(&[5.0, 6.0])).unwrap();
        assert!(approx_eq(x.as_slice(), &[2.0, 1.0], 1e-12));
    }

    #[test]
    fn test_solve_3x3() {
        // >>> np.linalg.solve([[1,2,3],[4,5,6],[7,8,10]], [1,2,3])
        // array([-0.33333333,  0.66666667,  0.        ])
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let x = lu.solve(&vector(&[1.0, 2.0, 3.0])).unwrap();
        assert!(approx_eq(x.as_slice(), &[-1.0 / 3.0, 2.0 / 3.0, 0.0], 1e-12));
    }

    #[test]
    fn test_refine_improves_perturbed_solution() {
        let a = mat(&[4.0, 1.0, 2.0, 1.0, 5.0, 1.0, 2.0, 1.0, 6.0], 3);
        let b = vector(&[7.0, 7.0, 9.0]);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let mut x = vector(&[1.01, 0.98, 1.02]);
        let r = lu.refine(&a, &b, &mut x).unwrap();
        assert!(r.as_slice().iter().any(|v| v.abs() > 1e-3));
        assert!(approx_eq(x.as_slice(), &[1.0, 1.0, 1.0], 1e-12));
    }

    #[test]
    fn test_refine_dimension_mismatch() {
        let a = mat(&[2.0, 1.0, 1.0, 4.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let mut x = vector(&[1.0, 1.0]);
        let bigger = Tensor::<f64>::eye(3);
        assert!(lu.refine(&bigger, &vector(&[1.0, 1.0]), &mut x).is_err());
    }

    #[test]
    fn test_not_square() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        assert!(matches!(
            LuDecomposition::decompose(&a),
            Err(LinsysError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_not_2d() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        assert!(LuDecomposition::decompose(&a).is_err());
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let a = mat(&[1.0, 0.0, 0.0, 1.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert!(lu.solve(&vector(&[1.0, 2.0, 3.0])).is_err());
    }
}
