//! Exact LLL Core Library
//!
//! Exact rational arithmetic primitives for lattice basis reduction.
//!
//! # Overview
//!
//! This library provides the building blocks for reducing lattice bases without
//! any floating-point error: an arbitrary-precision rational type, vector
//! helpers over it, Gram-Schmidt orthogonalization and the LLL algorithm.
//!
//! # Key Components
//!
//! - [`rational`] - Exact rational number type
//! - [`vector`] - Dot products, norms and projections over rationals
//! - [`matrix`] - Dense matrices, used for unimodular transforms
//! - [`lattice`] - Lattice basis reduction (Gram-Schmidt, LLL, Gauss)
//! - [`error`] - Error type shared by every fallible operation

pub mod error;
pub mod rational;
pub mod vector;
pub mod matrix;
pub mod lattice;

pub use error::{LatticeError, Result};
pub use matrix::Matrix;
pub use rational::Rational;
pub use lattice::{
    gauss_reduce, gram_schmidt, lll, DegeneratePolicy, GramSchmidt, LLLConfig, LLLStats,
    LatticeBasis, LLL,
};
