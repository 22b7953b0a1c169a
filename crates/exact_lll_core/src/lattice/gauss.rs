//! Lagrange-Gauss reduction of a two-vector basis
//!
//! The two-dimensional special case of lattice reduction. Keeps the shorter
//! vector in front and subtracts the nearest integer multiple of it from the
//! longer one until the projection coefficient is at most 1/2 in magnitude.
//! The result is a shortest pair for the lattice the two vectors generate,
//! which makes it a convenient oracle for checking [`super::LLL`] on 2-row
//! inputs.

use crate::error::Result;
use crate::rational::Rational;
use crate::vector;

/// Reduce the pair (v1, v2), returning (shorter, longer)
///
/// A zero vector is treated as already reduced against: if either input is
/// zero it is returned first and the pair is otherwise untouched.
pub fn gauss_reduce(v1: &[Rational], v2: &[Rational]) -> Result<(Vec<Rational>, Vec<Rational>)> {
    vector::check_dims(v1, v2)?;

    let mut a = v1.to_vec();
    let mut b = v2.to_vec();
    let mut a_norm = vector::norm_squared(&a);
    let mut b_norm = vector::norm_squared(&b);

    loop {
        if b_norm < a_norm {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut a_norm, &mut b_norm);
        }
        if a_norm.is_zero() {
            break;
        }

        let mu = &vector::dot(&a, &b)? / &a_norm;
        // At |μ| = 1/2 another step leaves ||b|| unchanged and would cycle
        if mu.abs() <= Rational::half() {
            break;
        }

        let m = Rational::from(mu.round());
        vector::sub_scaled(&mut b, &a, &m)?;
        b_norm = vector::norm_squared(&b);
    }

    log::trace!("gauss_reduce: ||v1||^2 = {}, ||v2||^2 = {}", a_norm, b_norm);
    Ok((a, b))
}
