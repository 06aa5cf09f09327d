//! Row permutations produced by pivoting.

use crate::Scalar;
use crate::error::{LinsysError, Result};
use crate::tensor::Tensor;

/// A permutation of `n` row indices together with its sign.
///
/// Row `i` of the permuted matrix `PA` is row `order[i]` of `A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    order: Vec<usize>,
    sign: i8,
}

impl Permutation {
    /// The identity permutation of length `n` (sign `+1`).
    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            sign: 1,
        }
    }

    /// Exchange positions `i` and `j`, flipping the sign when `i != j`.
    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        if i != j {
            self.order.swap(i, j);
            self.sign = -self.sign;
        }
    }

    /// The row ordering.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `+1` for an even number of transpositions, `-1` for an odd number.
    pub fn sign(&self) -> i8 {
        self.sign
    }

    /// Compute `P b` for a vector `b`.
    ///
    /// ```
    /// # use linsys_core::tensor::Tensor;
    /// # use linsys_core::linalg::Permutation;
    /// let p = Permutation::identity(3);
    /// let b = Tensor::from_vec(vec![1.0_f64, 2.0, 3.0], vec![3]).unwrap();
    /// assert_eq!(p.apply(&b).unwrap().as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn apply<T: Scalar>(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        let n = b.vector_len()?;
        if n != self.len() {
            return Err(LinsysError::DimensionMismatch {
                expected: vec![self.len()],
                got: vec![n],
            });
        }
        let src = b.as_slice();
        Tensor::from_vec(self.order.iter().map(|&pi| src[pi]).collect(), vec![n])
    }

    /// The permutation as an explicit `n x n` matrix `P`.
    pub fn matrix<T: Scalar>(&self) -> Tensor<T> {
        let n = self.len();
        let mut p = Tensor::zeros(vec![n, n]);
        let data = p.as_mut_slice();
        for (i, &pi) in self.order.iter().enumerate() {
            data[i * n + pi] = T::one();
        }
        p
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_tracks_sign() {
        let mut p = Permutation::identity(3);
        p.swap(0, 2);
        assert_eq!(p.as_slice(), &[2, 1, 0]);
        assert_eq!(p.sign(), -1);
        p.swap(1, 1);
        assert_eq!(p.sign(), -1);
        p.swap(0, 1);
        assert_eq!(p.as_slice(), &[1, 2, 0]);
        assert_eq!(p.sign(), 1);
    }

    #[test]
    fn test_apply_matches_matrix() {
        let mut p = Permutation::identity(3);
        p.swap(0, 2);
        let b = Tensor::from_vec(vec![10.0_f64, 20.0, 30.0], vec![3]).unwrap();
        let direct = p.apply(&b).unwrap();
        let via_matrix = p.matrix::<f64>().matvec(&b).unwrap();
        assert_eq!(direct.as_slice(), &[30.0, 20.0, 10.0]);
        assert_eq!(direct, via_matrix);
    }

    #[test]
    fn test_apply_length_mismatch() {
        let p = Permutation::identity(2);
        let b = Tensor::from_vec(vec![1.0_f64, 2.0, 3.0], vec![3]).unwrap();
        assert!(p.apply(&b).is_err());
    }
}
