//! Allocation of zero-filled, constant and identity tensors.

use crate::Scalar;

use super::{Tensor, compute_strides};

impl<T: Scalar> Tensor<T> {
    /// Create a tensor filled with zeros.
    ///
    /// ```
    /// # use linsys_core::tensor::Tensor;
    /// let t = Tensor::<f64>::zeros(vec![2, 3]);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, T::zero())
    }

    /// Create a tensor filled with a constant value.
    pub fn full(shape: Vec<usize>, value: T) -> Self {
        let numel: usize = shape.iter().product();
        let strides = compute_strides(&shape);
        Self {
            data: vec![value; numel],
            shape,
            strides,
        }
    }

    /// Create an identity matrix of size `n x n`.
    ///
    /// ```
    /// # use linsys_core::tensor::Tensor;
    /// let eye = Tensor::<f64>::eye(3);
    /// assert_eq!(eye.shape(), &[3, 3]);
    /// assert_eq!(*eye.get(&[0, 0]).unwrap(), 1.0);
    /// assert_eq!(*eye.get(&[0, 1]).unwrap(), 0.0);
    /// ```
    pub fn eye(n: usize) -> Self {
        let mut t = Self::zeros(vec![n, n]);
        for i in 0..n {
            t.data[i * n + i] = T::one();
        }
        t
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::<f64>::zeros(vec![3, 4]);
        assert_eq!(t.shape(), &[3, 4]);
        assert_eq!(t.numel(), 12);
        assert!(t.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_full() {
        let t = Tensor::full(vec![2, 3], 7.0_f32);
        assert_eq!(t.strides(), &[3, 1]);
        assert!(t.iter().all(|&x| x == 7.0));
    }

    #[test]
    fn test_eye() {
        let t = Tensor::<f64>::eye(3);
        assert_eq!(t.shape(), &[3, 3]);
        assert_eq!(t.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_eye_empty() {
        let t = Tensor::<f64>::eye(0);
        assert!(t.is_empty());
        assert_eq!(t.shape(), &[0, 0]);
    }
}
