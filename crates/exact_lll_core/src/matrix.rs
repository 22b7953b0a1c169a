//! Dense matrix operations
//!
//! Row-major dense matrix representation. Integer matrices double as the
//! record of unimodular row operations applied during lattice reduction.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use rand::Rng;

use crate::error::{LatticeError, Result};

/// Dense matrix in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> Matrix<T> {
    /// Create a matrix from a flat vector (row-major order)
    pub fn from_flat(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LatticeError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Get matrix dimensions
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Access element at (i, j)
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }

    /// Mutable access to element at (i, j)
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[i * self.cols + j]
    }

    /// Get a row as a slice
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Swap rows i and j
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(i * self.cols + c, j * self.cols + c);
        }
    }

    /// Consume and return underlying data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl Matrix<BigInt> {
    /// Create a zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![BigInt::zero(); rows * cols],
            rows,
            cols,
        }
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            *m.get_mut(i, i) = BigInt::one();
        }
        m
    }

    /// Row operation: row_i = row_i - q * row_j
    pub fn sub_scaled_row(&mut self, i: usize, j: usize, q: &BigInt) {
        for c in 0..self.cols {
            let delta = q * &self.data[j * self.cols + c];
            self.data[i * self.cols + c] -= delta;
        }
    }

    /// Matrix product self * other
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(LatticeError::DimensionMismatch {
                expected: self.cols,
                actual: other.rows,
            });
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..other.cols {
                    *out.get_mut(i, j) += a * other.get(k, j);
                }
            }
        }
        Ok(out)
    }

    /// Exact determinant by Bareiss fraction-free elimination
    ///
    /// Every intermediate division is exact, so entries stay integral and
    /// bounded by minors of the input.
    pub fn determinant(&self) -> Result<BigInt> {
        if self.rows != self.cols {
            return Err(LatticeError::DimensionMismatch {
                expected: self.rows,
                actual: self.cols,
            });
        }
        let n = self.rows;
        if n == 0 {
            return Ok(BigInt::one());
        }

        let mut a = self.clone();
        let mut negate = false;
        let mut prev_pivot = BigInt::one();

        for k in 0..n - 1 {
            if a.get(k, k).is_zero() {
                match (k + 1..n).find(|&i| !a.get(i, k).is_zero()) {
                    Some(i) => {
                        a.swap_rows(k, i);
                        negate = !negate;
                    }
                    None => return Ok(BigInt::zero()),
                }
            }

            for i in k + 1..n {
                for j in k + 1..n {
                    let value = (a.get(i, j) * a.get(k, k) - a.get(i, k) * a.get(k, j)) / &prev_pivot;
                    *a.get_mut(i, j) = value;
                }
            }
            prev_pivot = a.get(k, k).clone();
        }

        let det = a.get(n - 1, n - 1).clone();
        Ok(if negate { -det } else { det })
    }

    /// Check whether this is a square integer matrix with determinant ±1
    pub fn is_unimodular(&self) -> bool {
        match self.determinant() {
            Ok(det) => det == BigInt::one() || det == -BigInt::one(),
            Err(_) => false,
        }
    }

    /// Random n×n unimodular matrix
    ///
    /// Built from `steps` elementary row operations on the identity: adding a
    /// multiple in `[-bound, bound]` of one row to another, or swapping two rows.
    pub fn random_unimodular<R: Rng>(n: usize, steps: usize, bound: i64, rng: &mut R) -> Self {
        let mut m = Self::identity(n);
        if n < 2 {
            return m;
        }

        for _ in 0..steps {
            let i = rng.gen_range(0..n);
            let mut j = rng.gen_range(0..n - 1);
            if j >= i {
                j += 1;
            }

            if rng.gen_bool(0.2) {
                m.swap_rows(i, j);
            } else {
                let q = rng.gen_range(-bound..=bound);
                if q != 0 {
                    m.sub_scaled_row(i, j, &BigInt::from(q));
                }
            }
        }
        m
    }
}
