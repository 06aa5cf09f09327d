//! BLAS-style kernels on [`Tensor`].
//!
//! Only the operations the solve pipeline needs: `dot`, `axpy` and `nrm2`
//! on vectors, `gemv` for residuals, `gemm` for reconstructing products.
//! Every function validates shapes and returns [`Result`].

use crate::error::{LinsysError, Result};
use crate::tensor::Tensor;
use crate::{Float, Scalar};

// ======================================================================
// Level 1: vector operations
// ======================================================================

/// Inner product of two 1-D tensors: `sum(x_i * y_i)`.
///
/// ```
/// # use linsys_core::tensor::Tensor;
/// # use linsys_core::linalg::dot;
/// let x = Tensor::from_vec(vec![1.0_f64, 2.0, 3.0], vec![3]).unwrap();
/// let y = Tensor::from_vec(vec![4.0_f64, 5.0, 6.0], vec![3]).unwrap();
/// assert!((dot(&x, &y).unwrap() - 32.0).abs() < 1e-12);
/// ```
pub fn dot<T: Scalar>(x: &Tensor<T>, y: &Tensor<T>) -> Result<T> {
    check_vectors(x, y)?;
    Ok(x.as_slice()
        .iter()
        .zip(y.as_slice())
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
}

/// `y = alpha * x + y`, updating `y` in place.
pub fn axpy<T: Scalar>(alpha: T, x: &Tensor<T>, y: &mut Tensor<T>) -> Result<()> {
    check_vectors(x, y)?;
    for (yi, &xi) in y.as_mut_slice().iter_mut().zip(x.as_slice()) {
        *yi += alpha * xi;
    }
    Ok(())
}

/// Euclidean norm of a 1-D tensor.
pub fn nrm2<T: Float>(x: &Tensor<T>) -> Result<T> {
    x.vector_len()?;
    let sum_sq = x.as_slice().iter().fold(T::zero(), |acc, &v| acc + v * v);
    Ok(sum_sq.sqrt())
}

// ======================================================================
// Level 2: matrix-vector
// ======================================================================

/// General matrix-vector multiply: `y = alpha * A * x + beta * y`.
///
/// `a` is `[m, n]`, `x` has length `n` and `y` has length `m`.
///
/// ```
/// # use linsys_core::tensor::Tensor;
/// # use linsys_core::linalg::gemv;
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
/// let x = Tensor::from_vec(vec![5.0, 6.0], vec![2]).unwrap();
/// let mut y = Tensor::<f64>::zeros(vec![2]);
/// gemv(1.0, &a, &x, 0.0, &mut y).unwrap();
/// assert_eq!(y.as_slice(), &[17.0, 39.0]);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn gemv<T: Scalar>(
    alpha: T,
    a: &Tensor<T>,
    x: &Tensor<T>,
    beta: T,
    y: &mut Tensor<T>,
) -> Result<()> {
    let (m, n) = a.matrix_dims()?;
    if x.vector_len()? != n {
        return Err(LinsysError::DimensionMismatch {
            expected: vec![n],
            got: x.shape().to_vec(),
        });
    }
    if y.vector_len()? != m {
        return Err(LinsysError::DimensionMismatch {
            expected: vec![m],
            got: y.shape().to_vec(),
        });
    }

    let x_data = x.as_slice();
    for (row, yi) in a.rows().zip(y.as_mut_slice()) {
        let sum = row
            .iter()
            .zip(x_data)
            .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj);
        *yi = alpha * sum + beta * *yi;
    }
    Ok(())
}

// ======================================================================
// Level 3: matrix-matrix
// ======================================================================

/// General matrix-matrix multiply: `C = alpha * A * B + beta * C`.
///
/// `a` is `[m, k]`, `b` is `[k, n]` and `c` is `[m, n]`.
#[allow(clippy::many_single_char_names)]
pub fn gemm<T: Scalar>(
    alpha: T,
    a: &Tensor<T>,
    b: &Tensor<T>,
    beta: T,
    c: &mut Tensor<T>,
) -> Result<()> {
    let (m, k) = a.matrix_dims()?;
    let (bk, n) = b.matrix_dims()?;
    if bk != k {
        return Err(LinsysError::DimensionMismatch {
            expected: vec![k, n],
            got: b.shape().to_vec(),
        });
    }
    if c.matrix_dims()? != (m, n) {
        return Err(LinsysError::DimensionMismatch {
            expected: vec![m, n],
            got: c.shape().to_vec(),
        });
    }

    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let c_data = c.as_mut_slice();

    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum += a_data[i * k + p] * b_data[p * n + j];
            }
            let idx = i * n + j;
            c_data[idx] = alpha * sum + beta * c_data[idx];
        }
    }
    Ok(())
}

impl<T: Scalar> Tensor<T> {
    /// Matrix-vector product `self @ x` as a new vector.
    pub fn matvec(&self, x: &Tensor<T>) -> Result<Tensor<T>> {
        let (m, _) = self.matrix_dims()?;
        let mut y = Tensor::zeros(vec![m]);
        gemv(T::one(), self, x, T::zero(), &mut y)?;
        Ok(y)
    }

    /// Matrix-matrix product `self @ other` as a new matrix.
    pub fn matmul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        let (m, _) = self.matrix_dims()?;
        let (_, n) = other.matrix_dims()?;
        let mut c = Tensor::zeros(vec![m, n]);
        gemm(T::one(), self, other, T::zero(), &mut c)?;
        Ok(c)
    }
}

fn check_vectors<T: Scalar>(x: &Tensor<T>, y: &Tensor<T>) -> Result<()> {
    if x.vector_len()? != y.vector_len()? {
        return Err(LinsysError::DimensionMismatch {
            expected: x.shape().to_vec(),
            got: y.shape().to_vec(),
        });
    }
    Ok(())
}
