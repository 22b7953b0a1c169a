//! Lattice basis representation
//!
//! An ordered list of n generator rows of common dimension m over the
//! rationals. Rows need not be linearly independent.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::error::{LatticeError, Result};
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::vector;

/// A lattice basis represented as a matrix of row vectors
///
/// Each row b_i is a basis vector in Q^m.
/// The lattice L(B) = {Σ x_i b_i : x_i ∈ Z}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeBasis {
    /// Basis vectors as rows (n vectors of dimension m)
    pub vectors: Vec<Vec<Rational>>,
    /// Number of basis vectors
    pub n: usize,
    /// Dimension of the ambient space
    pub m: usize,
}

impl LatticeBasis {
    /// Create a new lattice basis from row vectors
    ///
    /// Fails with `EmptyBasis` when there are no rows or the rows are empty,
    /// and with `DimensionMismatch` when row lengths differ.
    pub fn new(vectors: Vec<Vec<Rational>>) -> Result<Self> {
        let m = match vectors.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(LatticeError::EmptyBasis),
        };
        if let Some(bad) = vectors.iter().find(|v| v.len() != m) {
            return Err(LatticeError::DimensionMismatch {
                expected: m,
                actual: bad.len(),
            });
        }

        let n = vectors.len();
        Ok(Self { vectors, n, m })
    }

    /// Create a lattice basis from integer or rational rows
    pub fn from_rows<T: Into<Rational> + Clone>(rows: &[Vec<T>]) -> Result<Self> {
        let vectors: Vec<Vec<Rational>> = rows
            .iter()
            .map(|row| row.iter().map(|x| x.clone().into()).collect())
            .collect();
        Self::new(vectors)
    }

    /// Create a lattice basis from floating-point rows
    ///
    /// Each entry is converted exactly; NaN and infinities are rejected.
    pub fn from_f64_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let vectors = rows
            .iter()
            .map(|row| row.iter().map(|&x| Rational::from_f64(x)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Self::new(vectors)
    }

    /// Create a lattice basis from a flat array (row-major order)
    pub fn from_flat<T: Into<Rational> + Clone>(data: &[T], n: usize, m: usize) -> Result<Self> {
        if data.len() != n * m {
            return Err(LatticeError::DimensionMismatch {
                expected: n * m,
                actual: data.len(),
            });
        }
        let vectors: Vec<Vec<Rational>> = data
            .chunks(m.max(1))
            .map(|row| row.iter().map(|x| x.clone().into()).collect())
            .collect();
        Self::new(vectors)
    }

    /// Create a random integer lattice basis
    ///
    /// # Arguments
    /// * `n` - Number of basis vectors
    /// * `m` - Dimension of ambient space
    /// * `bits` - Entries are drawn uniformly from [-2^(bits-1), 2^(bits-1))
    pub fn random<R: Rng>(n: usize, m: usize, bits: usize, rng: &mut R) -> Result<Self> {
        if bits == 0 || bits > 63 {
            return Err(LatticeError::InvalidParameter(format!(
                "entry bit size must be in 1..=63, got {}",
                bits
            )));
        }
        let half = 1i64 << (bits - 1);

        let vectors: Vec<Vec<Rational>> = (0..n)
            .map(|_| {
                (0..m)
                    .map(|_| Rational::from(rng.gen_range(-half..half)))
                    .collect()
            })
            .collect();

        Self::new(vectors)
    }

    /// Create a knapsack/subset-sum lattice
    ///
    /// Given a = [a_1, ..., a_n] and target s, creates the lattice:
    /// ```text
    /// [ 2  0  0 ... 0  a_1 ]
    /// [ 0  2  0 ... 0  a_2 ]
    /// [ 0  0  2 ... 0  a_3 ]
    /// [ ...                ]
    /// [ 1  1  1 ... 1   s  ]
    /// ```
    pub fn knapsack(a: &[i64], s: i64) -> Result<Self> {
        let n = a.len() + 1;
        let m = a.len() + 1;

        let mut vectors = vec![vec![Rational::zero(); m]; n];

        // First n-1 rows: diagonal 2's with a_i in last column
        for (i, &a_i) in a.iter().enumerate() {
            vectors[i][i] = Rational::from(2i64);
            vectors[i][m - 1] = Rational::from(a_i);
        }

        // Last row: all 1's with s in last column
        for j in 0..a.len() {
            vectors[n - 1][j] = Rational::one();
        }
        vectors[n - 1][m - 1] = Rational::from(s);

        Self::new(vectors)
    }

    /// Get vector at index i
    pub fn get(&self, i: usize) -> &[Rational] {
        &self.vectors[i]
    }

    /// Replace vector i
    pub fn set(&mut self, i: usize, row: Vec<Rational>) -> Result<()> {
        if row.len() != self.m {
            return Err(LatticeError::DimensionMismatch {
                expected: self.m,
                actual: row.len(),
            });
        }
        self.vectors[i] = row;
        Ok(())
    }

    /// Swap two basis vectors
    pub fn swap(&mut self, i: usize, j: usize) {
        self.vectors.swap(i, j);
    }

    /// Compute inner product <b_i, b_j>
    pub fn inner_product(&self, i: usize, j: usize) -> Rational {
        self.vectors[i]
            .iter()
            .zip(&self.vectors[j])
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Compute squared norm ||b_i||^2
    pub fn norm_squared(&self, i: usize) -> Rational {
        vector::norm_squared(&self.vectors[i])
    }

    /// Update b_i = b_i - q * b_j (size reduction step)
    pub fn reduce_vector(&mut self, i: usize, j: usize, q: &BigInt) {
        if i == j {
            return;
        }
        for k in 0..self.m {
            let delta = self.vectors[j][k].mul_int(q);
            self.vectors[i][k] = &self.vectors[i][k] - &delta;
        }
    }

    /// Apply an integer row transformation: returns U * B
    pub fn transform(&self, u: &Matrix<BigInt>) -> Result<Self> {
        let (rows, cols) = u.dims();
        if cols != self.n {
            return Err(LatticeError::DimensionMismatch {
                expected: self.n,
                actual: cols,
            });
        }

        let vectors: Vec<Vec<Rational>> = (0..rows)
            .map(|i| {
                let mut row = vec![Rational::zero(); self.m];
                for (coefficient, b) in u.row(i).iter().zip(&self.vectors) {
                    if coefficient.is_one() {
                        for (acc, x) in row.iter_mut().zip(b) {
                            *acc = &*acc + x;
                        }
                    } else if !coefficient.is_zero() {
                        for (acc, x) in row.iter_mut().zip(b) {
                            *acc = &*acc + &x.mul_int(coefficient);
                        }
                    }
                }
                row
            })
            .collect();

        Self::new(vectors)
    }

    /// Indices of rows that are identically zero
    pub fn zero_rows(&self) -> Vec<usize> {
        (0..self.n).filter(|&i| vector::is_zero(&self.vectors[i])).collect()
    }
}

impl fmt::Display for LatticeBasis {
    /// One `[a, b, c]` row per line; the output parses back with `FromStr`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.vectors {
            writeln!(f, "{}", vector::format_row(v))?;
        }
        Ok(())
    }
}

impl FromStr for LatticeBasis {
    type Err = LatticeError;

    /// One row per line. Blank lines and `#` comments are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let vectors = s
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(vector::parse_row)
            .collect::<Result<Vec<_>>>()?;
        Self::new(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_basis_creation() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 0, 3],
            vec![0, 1, 5],
            vec![0, 0, 7],
        ])
        .unwrap();

        assert_eq!(basis.n, 3);
        assert_eq!(basis.m, 3);
    }

    #[test]
    fn test_invalid_shapes() {
        let ragged = LatticeBasis::from_rows(&[vec![1i64, 2, 3], vec![4, 5]]);
        assert_eq!(
            ragged,
            Err(LatticeError::DimensionMismatch { expected: 3, actual: 2 })
        );

        let empty: Vec<Vec<i64>> = Vec::new();
        assert_eq!(LatticeBasis::from_rows(&empty), Err(LatticeError::EmptyBasis));
        assert_eq!(
            LatticeBasis::from_rows(&[Vec::<i64>::new()]),
            Err(LatticeError::EmptyBasis)
        );
        assert!(LatticeBasis::from_flat(&[1i64, 2, 3], 2, 2).is_err());
    }

    #[test]
    fn test_inner_product() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 2, 3],
            vec![4, 5, 6],
        ])
        .unwrap();

        // <b_0, b_0> = 1 + 4 + 9 = 14
        assert_eq!(basis.norm_squared(0), Rational::from(14i64));

        // <b_0, b_1> = 4 + 10 + 18 = 32
        assert_eq!(basis.inner_product(0, 1), Rational::from(32i64));
    }

    #[test]
    fn test_reduce_vector_and_swap() {
        let mut basis = LatticeBasis::from_rows(&[
            vec![(1i64, 2), (0, 1)],
            vec![(3, 1), (1, 1)],
        ])
        .unwrap();

        basis.reduce_vector(1, 0, &BigInt::from(4));
        assert_eq!(basis.get(1), &[Rational::from(1i64), Rational::from(1i64)]);

        basis.swap(0, 1);
        assert_eq!(basis.get(0), &[Rational::from(1i64), Rational::from(1i64)]);
        assert_eq!(basis.get(1)[0], Rational::from_ratio(1, 2));
    }

    #[test]
    fn test_from_f64_rows() {
        let basis = LatticeBasis::from_f64_rows(&[vec![0.5, -2.0], vec![0.25, 3.0]]).unwrap();
        assert_eq!(basis.get(0)[0], Rational::from_ratio(1, 2));
        assert_eq!(basis.get(1)[0], Rational::from_ratio(1, 4));

        let err = LatticeBasis::from_f64_rows(&[vec![1.0, f64::NAN]]).unwrap_err();
        assert!(matches!(err, LatticeError::NonFiniteFloat(_)));
    }

    #[test]
    fn test_knapsack_lattice() {
        let a = vec![1i64, 2, 3];
        let s = 5i64;
        let basis = LatticeBasis::knapsack(&a, s).unwrap();

        assert_eq!(basis.n, 4);
        assert_eq!(basis.m, 4);

        // Check structure
        assert_eq!(basis.vectors[0][0], Rational::from(2i64));
        assert_eq!(basis.vectors[0][3], Rational::from(1i64));
        assert_eq!(basis.vectors[3][3], Rational::from(5i64));
    }

    #[test]
    fn test_random_is_seeded_and_bounded() {
        let a = LatticeBasis::random(4, 5, 6, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = LatticeBasis::random(4, 5, 6, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!((a.n, a.m), (4, 5));

        let bound = Rational::from(32i64);
        assert!(a.vectors.iter().flatten().all(|x| x.is_integer() && x.abs() <= bound));

        assert!(LatticeBasis::random(2, 2, 0, &mut StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_transform() {
        let basis = LatticeBasis::from_rows(&[vec![1i64, 0], vec![0, 2]]).unwrap();
        let u = Matrix::from_flat(
            vec![BigInt::from(1), BigInt::from(1), BigInt::from(0), BigInt::from(-1)],
            2,
            2,
        )
        .unwrap();

        let image = basis.transform(&u).unwrap();
        assert_eq!(image, LatticeBasis::from_rows(&[vec![1i64, 2], vec![0, -2]]).unwrap());

        let wrong = Matrix::identity(3);
        assert!(basis.transform(&wrong).is_err());
    }

    #[test]
    fn test_text_round_trip() {
        let text = "# cryptopals basis\n[-2, 0, 2, 0]\n1/2 -1 0 0\n\n-1, 0, -2, 0.5\n";
        let basis: LatticeBasis = text.parse().unwrap();
        assert_eq!(basis.n, 3);
        assert_eq!(basis.get(2)[3], Rational::from_ratio(1, 2));

        let printed = basis.to_string();
        assert_eq!(printed.lines().next(), Some("[-2, 0, 2, 0]"));
        assert_eq!(printed.parse::<LatticeBasis>().unwrap(), basis);

        assert!("1 2\n3".parse::<LatticeBasis>().is_err());
        assert_eq!("# nothing\n".parse::<LatticeBasis>(), Err(LatticeError::EmptyBasis));
    }

    #[test]
    fn test_set_checks_dimension() {
        let mut basis = LatticeBasis::from_rows(&[vec![1i64, 0], vec![0, 1]]).unwrap();
        basis.set(1, vec![Rational::from(3i64), Rational::from_ratio(1, 2)]).unwrap();
        assert_eq!(basis.get(1), &[Rational::from(3i64), Rational::from_ratio(1, 2)]);

        assert_eq!(
            basis.set(0, vec![Rational::one()]),
            Err(LatticeError::DimensionMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(basis.get(0), &[Rational::one(), Rational::zero()]);
    }

    #[test]
    fn test_zero_rows() {
        let basis = LatticeBasis::from_rows(&[vec![0i64, 0], vec![1, 1], vec![0, 0]]).unwrap();
        assert_eq!(basis.zero_rows(), vec![0, 2]);
    }
}
