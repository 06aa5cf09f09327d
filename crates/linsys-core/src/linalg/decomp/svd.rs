//! Singular Value Decomposition (SVD).
//!
//! Decomposes an `m x n` matrix `A` with `m >= n` into `A = U diag(s) V^T`:
//! - `U` is `m x n` with orthonormal columns
//! - `s` holds the `n` singular values in descending order
//! - `V` is an orthogonal `n x n` matrix
//!
//! Implementation uses the one-sided Jacobi method: pairs of columns of a
//! working copy are rotated until every pair is orthogonal to within
//! `100 * eps` relative to the pair's norms, for at most [`MAX_SWEEPS`]
//! sweeps.

use tracing::{debug, warn};

use crate::Float;
use crate::error::{LinsysError, Result};
use crate::tensor::Tensor;

/// Maximum number of Jacobi sweeps before giving up.
pub const MAX_SWEEPS: usize = 100;

/// Result of a Singular Value Decomposition.
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T: Float> {
    /// Left singular vectors (m x n).
    u: Tensor<T>,
    /// Singular values in descending order.
    s: Tensor<T>,
    /// Right singular vectors (n x n), not transposed.
    v: Tensor<T>,
    sweeps: usize,
    converged: bool,
}

/// `|max(s)| / |min(s)|` together with the two extremes it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionNumber<T> {
    pub max: T,
    pub min: T,
    pub value: T,
}

impl<T: Float> ConditionNumber<T> {
    /// Scan `values` once in index order, keeping the first minimum and the
    /// first maximum. A zero minimum gives an infinite condition number.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// ```
    /// # use linsys_core::linalg::ConditionNumber;
    /// let c = ConditionNumber::from_singular_values(&[4.0_f64, 1.0, 2.0]).unwrap();
    /// assert_eq!((c.max, c.min, c.value), (4.0, 1.0, 4.0));
    /// ```
    pub fn from_singular_values(values: &[T]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let (mut min, mut max) = (first, first);
        for &v in rest {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        let (max, min) = (max.abs(), min.abs());
        let value = if min == T::zero() {
            T::infinity()
        } else {
            max / min
        };
        Some(Self { max, min, value })
    }
}

#[allow(clippy::many_single_char_names)]
impl<T: Float> SvdDecomposition<T> {
    /// Compute the SVD of a matrix `A` with at least as many rows as columns.
    ///
    /// ```
    /// # use linsys_core::tensor::Tensor;
    /// # use linsys_core::linalg::SvdDecomposition;
    /// let a = Tensor::from_vec(vec![3.0_f64, 0.0, 0.0, 4.0], vec![2, 2]).unwrap();
    /// let svd = SvdDecomposition::decompose(&a).unwrap();
    /// let s = svd.singular_values();
    /// assert!((s[0] - 4.0).abs() < 1e-10);
    /// assert!((s[1] - 3.0).abs() < 1e-10);
    /// ```
    #[allow(clippy::too_many_lines)]
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        let (m, n) = a.matrix_dims()?;
        if m < n {
            return Err(LinsysError::InvalidArgument {
                reason: "SVD requires at least as many rows as columns",
            });
        }

        // Columns of `work` converge to U * diag(s).
        let mut work = a.as_slice().to_vec();
        let mut v = vec![T::zero(); n * n];
        for i in 0..n {
            v[i * n + i] = T::one();
        }

        let tol = T::epsilon() * T::from_f64(100.0);
        let norm_floor = T::epsilon() * max_abs(&work);
        let mut sweeps = 0;
        let mut converged = n < 2;

        while !converged && sweeps < MAX_SWEEPS {
            sweeps += 1;
            converged = true;

            for p in 0..n {
                for q in (p + 1)..n {
                    let np = column_norm(&work, m, n, p);
                    let nq = column_norm(&work, m, n, q);
                    if np == T::zero() || nq == T::zero() {
                        continue;
                    }
                    // Cosine of the angle between the columns, computed on
                    // normalised entries so that no square can overflow.
                    let cosine = (0..m).fold(T::zero(), |acc, i| {
                        acc + (work[i * n + p] / np) * (work[i * n + q] / nq)
                    });

                    if cosine.abs() <= tol {
                        continue;
                    }
                    converged = false;

                    // (|q|^2 - |p|^2) / (2 p.q) in terms of the norm ratio.
                    let ratio = nq / np;
                    let tau = (ratio - T::one() / ratio) / (cosine + cosine);
                    let t = if tau >= T::zero() {
                        T::one() / (tau + hypot1(tau))
                    } else {
                        -T::one() / (-tau + hypot1(tau))
                    };
                    let cs = T::one() / (T::one() + t * t).sqrt();
                    let sn = t * cs;

                    for i in 0..m {
                        let wp = work[i * n + p];
                        let wq = work[i * n + q];
                        work[i * n + p] = cs * wp - sn * wq;
                        work[i * n + q] = sn * wp + cs * wq;
                    }
                    for i in 0..n {
                        let vp = v[i * n + p];
                        let vq = v[i * n + q];
                        v[i * n + p] = cs * vp - sn * vq;
                        v[i * n + q] = sn * vp + cs * vq;
                    }
                }
            }
        }

        if converged {
            debug!(m, n, sweeps, "Jacobi SVD converged");
        } else {
            warn!(m, n, sweeps, "Jacobi SVD hit the sweep limit without converging");
        }

        // Column norms are the singular values; normalised columns form U.
        let mut s = vec![T::zero(); n];
        for (j, sj) in s.iter_mut().enumerate() {
            *sj = column_norm(&work, m, n, j);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| s[b].partial_cmp(&s[a]).unwrap_or(std::cmp::Ordering::Equal));

        let mut u_sorted = vec![T::zero(); m * n];
        let mut s_sorted = vec![T::zero(); n];
        let mut v_sorted = vec![T::zero(); n * n];
        for (new_j, &old_j) in order.iter().enumerate() {
            let norm = s[old_j];
            s_sorted[new_j] = norm;
            if norm > norm_floor {
                for i in 0..m {
                    u_sorted[i * n + new_j] = work[i * n + old_j] / norm;
                }
            }
            for i in 0..n {
                v_sorted[i * n + new_j] = v[i * n + old_j];
            }
        }

        Ok(Self {
            u: Tensor::from_vec(u_sorted, vec![m, n])?,
            s: Tensor::from_vec(s_sorted, vec![n])?,
            v: Tensor::from_vec(v_sorted, vec![n, n])?,
            sweeps,
            converged,
        })
    }

    /// The singular values in descending order.
    pub fn singular_values(&self) -> &[T] {
        self.s.as_slice()
    }

    /// The singular values as a vector.
    pub fn s(&self) -> &Tensor<T> {
        &self.s
    }

    /// The left singular vectors `U` (m x n).
    pub fn u(&self) -> &Tensor<T> {
        &self.u
    }

    /// The right singular vectors `V` (n x n).
    pub fn v(&self) -> &Tensor<T> {
        &self.v
    }

    /// Number of Jacobi sweeps performed.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Whether every column pair met the orthogonality tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Condition number from the singular values; `None` for a 0-column input.
    pub fn condition_number(&self) -> Option<ConditionNumber<T>> {
        ConditionNumber::from_singular_values(self.singular_values())
    }
}

/// Euclidean norm of column `j` of a row-major `m x n` buffer, accumulated
/// relative to the running largest entry so it stays finite for any finite
/// input.
fn column_norm<T: Float>(data: &[T], m: usize, n: usize, j: usize) -> T {
    let mut scale = T::zero();
    let mut ssq = T::one();
    for i in 0..m {
        let x = data[i * n + j].abs();
        if x == T::zero() {
            continue;
        }
        if scale < x {
            let r = scale / x;
            ssq = T::one() + ssq * r * r;
            scale = x;
        } else {
            let r = x / scale;
            ssq += r * r;
        }
    }
    scale * ssq.sqrt()
}

/// `sqrt(1 + x^2)` without squaring a large `x`.
fn hypot1<T: Float>(x: T) -> T {
    let x = x.abs();
    if x > T::one() {
        let r = T::one() / x;
        x * (T::one() + r * r).sqrt()
    } else {
        (T::one() + x * x).sqrt()
    }
}

fn max_abs<T: Float>(data: &[T]) -> T {
    data.iter()
        .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
}
