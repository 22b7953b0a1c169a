//! Gram-Schmidt orthogonalization over the rationals
//!
//! # The Gram-Schmidt Process
//!
//! Given basis B = [b_0, ..., b_{n-1}], compute orthogonal vectors b*_i:
//!
//! ```text
//! b*_0 = b_0
//! b*_i = b_i - Σ_{j<i} proj(b*_j, b_i)
//! μ_ij = <b_i, b*_j> / <b*_j, b*_j>
//! ```
//!
//! The vectors are orthogonal but not normalized, so everything stays exact.
//!
//! # Degenerate rows
//!
//! When b_i lies in the span of b_0..b_{i-1}, b*_i comes out as the zero
//! vector. Projecting onto a zero b*_j contributes nothing, and μ_ij for a
//! zero b*_j is defined as 0. Neither case is an error here; callers that want
//! to refuse such bases can look at [`GramSchmidt::first_degenerate`].
//!
//! # Partial recomputation
//!
//! b*_i depends only on b_0..b_i. After a mutation that leaves rows
//! 0..start untouched, rows 0..start of the previous result are still valid
//! and only the suffix has to be recomputed; see [`gram_schmidt`] and
//! [`GramSchmidt::refresh_from`].

use super::basis::LatticeBasis;
use crate::error::{LatticeError, Result};
use crate::rational::Rational;
use crate::vector;

/// Gram-Schmidt orthogonalization data (exact rational representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GramSchmidt {
    /// Orthogonal vectors b*_i, one per basis row
    pub b_star: Vec<Vec<Rational>>,
    /// Squared norms ||b*_i||^2
    pub b_star_norms_sq: Vec<Rational>,
    /// Number of rows
    pub n: usize,
}

/// Orthogonalize `basis`, reusing rows `0..start` of `previous` when given.
///
/// With `start == 0` or no `previous`, every row is computed from scratch.
/// Otherwise `previous` must come from a basis whose first `start` rows are
/// identical to those of `basis`.
pub fn gram_schmidt(
    basis: &LatticeBasis,
    start: usize,
    previous: Option<&GramSchmidt>,
) -> Result<GramSchmidt> {
    GramSchmidt::recompute(basis, start, previous)
}

impl GramSchmidt {
    /// Compute Gram-Schmidt orthogonalization from a lattice basis
    pub fn compute(basis: &LatticeBasis) -> Result<Self> {
        Self::recompute(basis, 0, None)
    }

    /// Compute rows `start..n` on top of the first `start` rows of `previous`
    pub fn recompute(basis: &LatticeBasis, start: usize, previous: Option<&GramSchmidt>) -> Result<Self> {
        Self::check_start(basis, start)?;

        let mut gs = Self {
            b_star: Vec::with_capacity(basis.n),
            b_star_norms_sq: Vec::with_capacity(basis.n),
            n: basis.n,
        };

        if let (Some(prev), true) = (previous, start > 0) {
            let cached = prev.b_star.len().min(prev.b_star_norms_sq.len());
            if cached < start {
                return Err(LatticeError::DimensionMismatch {
                    expected: start,
                    actual: cached,
                });
            }
            if let Some(bad) = prev.b_star[..start].iter().find(|v| v.len() != basis.m) {
                return Err(LatticeError::DimensionMismatch {
                    expected: basis.m,
                    actual: bad.len(),
                });
            }
            gs.b_star.extend_from_slice(&prev.b_star[..start]);
            gs.b_star_norms_sq.extend_from_slice(&prev.b_star_norms_sq[..start]);
        }

        gs.extend(basis)?;
        Ok(gs)
    }

    /// Recompute rows `start..n` in place after rows `start..` of `basis` changed
    ///
    /// Returns the number of rows recomputed.
    pub fn refresh_from(&mut self, basis: &LatticeBasis, start: usize) -> Result<usize> {
        Self::check_start(basis, start)?;
        let cached = self.b_star.len().min(self.b_star_norms_sq.len());
        if cached < start {
            return Err(LatticeError::DimensionMismatch {
                expected: start,
                actual: cached,
            });
        }

        self.b_star.truncate(start);
        self.b_star_norms_sq.truncate(start);
        self.extend(basis)?;
        Ok(basis.n - start)
    }

    fn check_start(basis: &LatticeBasis, start: usize) -> Result<()> {
        if start > basis.n {
            return Err(LatticeError::InvalidParameter(format!(
                "recomputation start {} exceeds basis size {}",
                start, basis.n
            )));
        }
        Ok(())
    }

    /// Orthogonalize the rows of `basis` past the ones already computed
    fn extend(&mut self, basis: &LatticeBasis) -> Result<()> {
        for i in self.b_star.len()..basis.n {
            let b_i = basis.get(i);
            let mut v = b_i.to_vec();

            // b*_i = b_i - Σ_{j<i} (<b_i, b*_j> / ||b*_j||^2) b*_j
            for (b_star_j, norm_j) in self.b_star.iter().zip(&self.b_star_norms_sq) {
                if norm_j.is_zero() {
                    continue;
                }
                let coefficient = &vector::dot(b_i, b_star_j)? / norm_j;
                vector::sub_scaled(&mut v, b_star_j, &coefficient)?;
            }

            self.b_star_norms_sq.push(vector::norm_squared(&v));
            self.b_star.push(v);
        }
        self.n = basis.n;
        Ok(())
    }

    /// μ_ij = <b_i, b*_j> / ||b*_j||^2 for j < i, taken against the current b_i
    ///
    /// Returns 0 when b*_j is the zero vector.
    pub fn mu(&self, basis: &LatticeBasis, i: usize, j: usize) -> Result<Rational> {
        if j >= i {
            return Err(LatticeError::InvalidParameter(format!(
                "μ_ij only defined for j < i, got i={}, j={}",
                i, j
            )));
        }
        let norm_j = &self.b_star_norms_sq[j];
        if norm_j.is_zero() {
            return Ok(Rational::zero());
        }
        Ok(&vector::dot(basis.get(i), &self.b_star[j])? / norm_j)
    }

    /// Check if μ_ij needs size reduction (|μ_ij| > 1/2)
    pub fn needs_size_reduction(&self, basis: &LatticeBasis, i: usize, j: usize) -> Result<bool> {
        Ok(self.mu(basis, i, j)?.abs() > Rational::half())
    }

    /// Check Lovász condition at position k
    ///
    /// ||b*_k||^2 >= (δ - μ_{k,k-1}^2) ||b*_{k-1}||^2
    pub fn check_lovasz(&self, basis: &LatticeBasis, k: usize, delta: &Rational) -> Result<bool> {
        if k == 0 {
            return Ok(true);
        }
        let mu = self.mu(basis, k, k - 1)?;
        let rhs = &(delta - &mu.square()) * self.get_norm_sq(k - 1);
        Ok(*self.get_norm_sq(k) >= rhs)
    }

    /// Get ||b*_i||^2
    pub fn get_norm_sq(&self, i: usize) -> &Rational {
        &self.b_star_norms_sq[i]
    }

    /// Get b*_i
    pub fn get(&self, i: usize) -> &[Rational] {
        &self.b_star[i]
    }

    /// Index of the first zero orthogonal vector, if any
    pub fn first_degenerate(&self) -> Option<usize> {
        self.b_star_norms_sq.iter().position(Rational::is_zero)
    }

    /// Number of non-zero orthogonal vectors
    pub fn rank(&self) -> usize {
        self.b_star_norms_sq.iter().filter(|x| !x.is_zero()).count()
    }

    /// Gram determinant det(B B^T) = Π ||b*_i||^2
    ///
    /// Invariant under unimodular row operations; zero for dependent rows.
    pub fn volume_squared(&self) -> Rational {
        self.b_star_norms_sq
            .iter()
            .fold(Rational::one(), |acc, x| &acc * x)
    }

    /// The orthogonal vectors as a basis matrix (Q)
    pub fn orthogonal_basis(&self) -> Result<LatticeBasis> {
        LatticeBasis::new(self.b_star.clone())
    }
}
