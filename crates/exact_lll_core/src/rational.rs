//! Exact rational number type
//!
//! Arbitrary-precision fractions over `BigInt`, always kept in lowest terms
//! with a positive denominator. All lattice arithmetic in this crate runs on
//! this type; nothing is ever rounded except by an explicit call to
//! [`Rational::round`].

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{LatticeError, Result};

/// Exact rational number (numerator / denominator)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: BigInt,
    pub denominator: BigInt,
}

impl Rational {
    /// Create a new rational number from numerator and denominator
    ///
    /// # Panics
    /// Panics if `den` is zero.
    pub fn new(num: BigInt, den: BigInt) -> Self {
        assert!(!den.is_zero(), "Rational denominator cannot be zero");
        let mut r = Self {
            numerator: num,
            denominator: den,
        };
        r.reduce();
        r
    }

    /// Create a rational from a machine-integer fraction
    pub fn from_ratio(num: i64, den: i64) -> Self {
        Self::new(BigInt::from(num), BigInt::from(den))
    }

    /// Create a rational from an integer
    pub fn from_int<T: Into<BigInt>>(n: T) -> Self {
        Self {
            numerator: n.into(),
            denominator: BigInt::one(),
        }
    }

    /// Exact value of a finite `f64`.
    ///
    /// Every finite double is a dyadic rational, so the conversion is lossless:
    /// `0.1` becomes `3602879701896397/36028797018963968`, not `1/10`.
    pub fn from_f64(x: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(LatticeError::NonFiniteFloat(x));
        }
        if x == 0.0 {
            return Ok(Self::zero());
        }

        let bits = x.to_bits();
        let negative = bits >> 63 == 1;
        let biased_exp = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);

        // value = mantissa * 2^exp
        let (mantissa, exp) = if biased_exp == 0 {
            (fraction, -1074i64)
        } else {
            (fraction | (1u64 << 52), biased_exp - 1075)
        };

        let mut num = BigInt::from(mantissa);
        if negative {
            num = -num;
        }

        if exp >= 0 {
            Ok(Self::from_int(num << exp as usize))
        } else {
            Ok(Self::new(num, BigInt::one() << (-exp) as usize))
        }
    }

    /// Create zero
    pub fn zero() -> Self {
        Self {
            numerator: BigInt::zero(),
            denominator: BigInt::one(),
        }
    }

    /// Create one
    pub fn one() -> Self {
        Self {
            numerator: BigInt::one(),
            denominator: BigInt::one(),
        }
    }

    /// The constant 1/2, the size-reduction threshold
    pub fn half() -> Self {
        Self {
            numerator: BigInt::one(),
            denominator: BigInt::from(2),
        }
    }

    /// Check if this rational is zero
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    /// -1, 0 or 1
    pub fn signum(&self) -> i32 {
        match self.numerator.cmp(&BigInt::zero()) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self {
            numerator: self.numerator.abs(),
            denominator: self.denominator.clone(),
        }
    }

    /// `self * self`
    pub fn square(&self) -> Self {
        Self {
            numerator: &self.numerator * &self.numerator,
            denominator: &self.denominator * &self.denominator,
        }
    }

    /// Multiply by an integer
    pub fn mul_int(&self, q: &BigInt) -> Self {
        Self::new(&self.numerator * q, self.denominator.clone())
    }

    /// Nearest integer, ties broken away from zero
    ///
    /// round(5/2) = 3, round(-5/2) = -3, round(7/3) = 2
    pub fn round(&self) -> BigInt {
        // floor((2|n| + d) / 2d) on the magnitude, sign restored afterwards
        let two_den: BigInt = &self.denominator * 2;
        let magnitude = (self.numerator.abs() * BigInt::from(2) + &self.denominator).div_floor(&two_den);
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Reduce to lowest terms
    fn reduce(&mut self) {
        if self.numerator.is_zero() {
            self.denominator = BigInt::one();
            return;
        }

        let g = self.numerator.gcd(&self.denominator);
        self.numerator = &self.numerator / &g;
        self.denominator = &self.denominator / &g;

        // Ensure denominator is positive
        if self.denominator.is_negative() {
            self.numerator = -&self.numerator;
            self.denominator = -&self.denominator;
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for Rational {
    type Err = LatticeError;

    /// Parses `7`, `-3/4`, `0.99` or `-.5`. Decimals are converted exactly.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || LatticeError::Parse(format!("invalid rational literal '{}'", s));

        if let Some((num, den)) = s.split_once('/') {
            let num: BigInt = num.trim().parse().map_err(|_| invalid())?;
            let den: BigInt = den.trim().parse().map_err(|_| invalid())?;
            if den.is_zero() {
                return Err(LatticeError::Parse(format!("zero denominator in '{}'", s)));
            }
            return Ok(Self::new(num, den));
        }

        if let Some((int_part, frac_part)) = s.split_once('.') {
            let negative = int_part.starts_with('-');
            let int_digits = int_part.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(int_part);
            let all_digits = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
            if frac_part.is_empty() || !all_digits(frac_part) || !all_digits(int_digits) {
                return Err(invalid());
            }

            let int_value = if int_digits.is_empty() {
                BigInt::zero()
            } else {
                int_digits.parse::<BigInt>().map_err(|_| invalid())?
            };
            let frac_value: BigInt = frac_part.parse().map_err(|_| invalid())?;
            let scale = BigInt::from(10u32).pow(frac_part.len() as u32);

            let mut num = int_value * &scale + frac_value;
            if negative {
                num = -num;
            }
            return Ok(Self::new(num, scale));
        }

        let n: BigInt = s.parse().map_err(|_| invalid())?;
        Ok(Self::from_int(n))
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_int(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Self {
        Self::from_int(n)
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Self::from_ratio(num, den)
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplication preserves order
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: Self) -> Rational {
        if self.denominator == other.denominator {
            return Rational::new(&self.numerator + &other.numerator, self.denominator.clone());
        }
        let num = &self.numerator * &other.denominator + &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Rational::new(num, den)
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, other: Self) -> Rational {
        if self.denominator == other.denominator {
            return Rational::new(&self.numerator - &other.numerator, self.denominator.clone());
        }
        let num = &self.numerator * &other.denominator - &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Rational::new(num, den)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: Self) -> Rational {
        let num = &self.numerator * &other.numerator;
        let den = &self.denominator * &other.denominator;
        Rational::new(num, den)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl Div for &Rational {
    type Output = Rational;

    /// # Panics
    /// Panics when dividing by zero.
    fn div(self, other: Self) -> Rational {
        let num = &self.numerator * &other.denominator;
        let den = &self.denominator * &other.numerator;
        Rational::new(num, den)
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        &self / &other
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| &acc + &x)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| &acc + x)
    }
}
