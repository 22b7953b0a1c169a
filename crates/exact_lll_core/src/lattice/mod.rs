//! Lattice basis reduction algorithms
//!
//! Exact rational arithmetic for lattice operations.
//!
//! # Overview
//!
//! A lattice is given by a basis of row vectors over ℚ. Reduction replaces the
//! basis with one of short, nearly orthogonal vectors generating the same
//! lattice. All coefficients are exact rationals, so no floating-point error
//! can creep into the μ_ij or the Lovász test.
//!
//! # Key Components
//!
//! - [`LatticeBasis`] - Lattice basis representation
//! - [`GramSchmidt`] - Gram-Schmidt orthogonalization with partial refresh
//! - [`LLL`] - LLL lattice reduction algorithm
//! - [`gauss_reduce`] - Lagrange-Gauss reduction for two vectors
//!
//! # Example
//!
//! ```
//! use exact_lll_core::lattice::{LatticeBasis, LLL, LLLConfig};
//! use exact_lll_core::Rational;
//!
//! let basis = LatticeBasis::from_rows(&[
//!     vec![1i64, 1, 1],
//!     vec![-1, 0, 2],
//!     vec![3, 5, 6],
//! ]).unwrap();
//!
//! let config = LLLConfig::default();
//! let (reduced, stats) = LLL::reduce(&basis, &config).unwrap();
//! assert!(LLL::is_reduced(&reduced, &config.delta).unwrap());
//! assert_eq!(reduced.norm_squared(0), Rational::from(1));
//! # let _ = stats;
//! ```

pub mod basis;
pub mod gauss;
pub mod gram_schmidt;
pub mod lll;

pub use basis::LatticeBasis;
pub use gauss::gauss_reduce;
pub use gram_schmidt::{gram_schmidt, GramSchmidt};
pub use lll::{lll, validate_delta, DegeneratePolicy, LLLConfig, LLLStats, LLL};
