//! Exact vector operations
//!
//! Free functions over `[Rational]` slices. Binary operations check that both
//! operands have the same length and fail with
//! [`LatticeError::DimensionMismatch`] otherwise; nothing is truncated or
//! padded.

use crate::error::{LatticeError, Result};
use crate::rational::Rational;

/// Fail unless `u` and `v` have the same length
pub fn check_dims(u: &[Rational], v: &[Rational]) -> Result<()> {
    if u.len() != v.len() {
        return Err(LatticeError::DimensionMismatch {
            expected: u.len(),
            actual: v.len(),
        });
    }
    Ok(())
}

/// Inner product <u, v>
pub fn dot(u: &[Rational], v: &[Rational]) -> Result<Rational> {
    check_dims(u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a * b).sum())
}

/// ||u||^2
pub fn norm_squared(u: &[Rational]) -> Rational {
    u.iter().map(Rational::square).sum()
}

pub fn is_zero(u: &[Rational]) -> bool {
    u.iter().all(Rational::is_zero)
}

/// c * u
pub fn scale(u: &[Rational], c: &Rational) -> Vec<Rational> {
    u.iter().map(|x| x * c).collect()
}

/// u - v
pub fn sub(u: &[Rational], v: &[Rational]) -> Result<Vec<Rational>> {
    check_dims(u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a - b).collect())
}

/// u <- u - c * v, in place
pub fn sub_scaled(u: &mut [Rational], v: &[Rational], c: &Rational) -> Result<()> {
    check_dims(u, v)?;
    if c.is_zero() {
        return Ok(());
    }
    for (a, b) in u.iter_mut().zip(v) {
        *a = &*a - &(b * c);
    }
    Ok(())
}

/// Projection of `v` onto `u`: (<v, u> / <u, u>) * u
///
/// Projecting onto the zero vector yields the zero vector instead of dividing
/// by zero. This is how a linearly dependent basis row collapses to a zero
/// orthogonal vector during Gram-Schmidt.
pub fn proj(u: &[Rational], v: &[Rational]) -> Result<Vec<Rational>> {
    check_dims(u, v)?;
    let uu = norm_squared(u);
    if uu.is_zero() {
        return Ok(vec![Rational::zero(); u.len()]);
    }
    let coefficient = &dot(v, u)? / &uu;
    Ok(scale(u, &coefficient))
}

/// Parse a row of rationals separated by commas and/or whitespace.
///
/// Surrounding `[` `]` or `(` `)` are ignored, so `[1, -1/2, 0.25]` and
/// `1 -1/2 0.25` describe the same row.
pub fn parse_row(line: &str) -> Result<Vec<Rational>> {
    let body = line
        .trim()
        .trim_start_matches(|c: char| c == '[' || c == '(')
        .trim_end_matches(|c: char| c == ']' || c == ')');
    body.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<Rational>())
        .collect()
}

/// Format a row as `[a, b, c]`
pub fn format_row(u: &[Rational]) -> String {
    let entries: Vec<String> = u.iter().map(Rational::to_string).collect();
    format!("[{}]", entries.join(", "))
}
