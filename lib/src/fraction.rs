//! Exact fractions used by the Gaussian elimination of the algebraic balancer.

use crate::error::FractionError;
use malachite::num::arithmetic::traits::{Gcd, UnsignedAbs};
use malachite::num::basic::traits::{One, Zero};
use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::{Integer, Natural, Rational};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Arbitrary precision fraction, always stored in lowest terms
///
/// The sign is kept in the numerator, the denominator is always positive.
/// # Example
/// ```
/// use chembalance::RobustFraction;
///
/// let a = RobustFraction::new(2, -4).unwrap();
/// let b = RobustFraction::new(1, 3).unwrap();
///
/// assert_eq!(a.to_string(), "-1/2");
/// assert_eq!(a.add(&b), RobustFraction::new(-1, 6).unwrap());
/// assert!(RobustFraction::new(1, 0).is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RobustFraction {
    numerator: Integer,
    denominator: Natural,
}
impl RobustFraction {
    /// Creates a new fraction reduced to lowest terms
    /// # Returns
    /// * `Ok` - reduced fraction
    /// * `Err` - if the denominator is zero
    pub fn new(numerator: impl Into<Integer>, denominator: impl Into<Integer>) -> Result<Self, FractionError> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator == Integer::ZERO { return Err(FractionError::ZeroDenominator); }

        let negative = (numerator < Integer::ZERO) != (denominator < Integer::ZERO);
        Ok(Self::reduced(negative, numerator.unsigned_abs(), denominator.unsigned_abs()))
    }

    /// Creates a fraction with denominator 1
    pub fn from_integer(value: impl Into<Integer>) -> Self {
        Self {
            numerator: value.into(),
            denominator: Natural::ONE,
        }
    }

    /// Fraction 0/1
    pub fn zero() -> Self {
        Self::from_integer(Integer::ZERO)
    }

    /// Fraction 1/1
    pub fn one() -> Self {
        Self::from_integer(Integer::ONE)
    }

    // denominator is non-zero here
    fn reduced(negative: bool, numerator: Natural, denominator: Natural) -> Self {
        if numerator == Natural::ZERO {
            return Self::zero();
        }
        let divisor = numerator.clone().gcd(denominator.clone());
        let numerator = Integer::from(numerator / &divisor);
        let denominator = denominator / &divisor;
        Self {
            numerator: if negative { -numerator } else { numerator },
            denominator,
        }
    }

    fn from_parts(numerator: Integer, denominator: Natural) -> Self {
        let negative = numerator < Integer::ZERO;
        Self::reduced(negative, numerator.unsigned_abs(), denominator)
    }

    /// Numerator (carries the sign)
    pub fn numerator(&self) -> &Integer {
        &self.numerator
    }

    /// Denominator (always positive)
    pub fn denominator(&self) -> &Natural {
        &self.denominator
    }

    /// Returns `self + other`
    pub fn add(&self, other: &Self) -> Self {
        let numerator = &self.numerator * Integer::from(&other.denominator) + &other.numerator * Integer::from(&self.denominator);
        Self::from_parts(numerator, &self.denominator * &other.denominator)
    }

    /// Returns `self - other`
    pub fn subtract(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Returns `self * other`
    pub fn multiply(&self, other: &Self) -> Self {
        Self::from_parts(&self.numerator * &other.numerator, &self.denominator * &other.denominator)
    }

    /// Returns `self / other`
    /// # Returns
    /// * `Ok` - quotient
    /// * `Err` - if `other` is zero
    pub fn divide(&self, other: &Self) -> Result<Self, FractionError> {
        if other.is_zero() { return Err(FractionError::DivisionByZero); }
        let negative = (self.numerator < Integer::ZERO) != (other.numerator < Integer::ZERO);
        let numerator = (&self.numerator).unsigned_abs() * &other.denominator;
        let denominator = &self.denominator * (&other.numerator).unsigned_abs();
        Ok(Self::reduced(negative, numerator, denominator))
    }

    /// Returns `-self`
    pub fn negate(&self) -> Self {
        Self {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

    /// Returns `|self|`
    pub fn abs(&self) -> Self {
        Self {
            numerator: Integer::from((&self.numerator).unsigned_abs()),
            denominator: self.denominator.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == Integer::ZERO
    }

    pub fn is_one(&self) -> bool {
        self.numerator == Integer::ONE && self.denominator == Natural::ONE
    }

    pub fn is_negative(&self) -> bool {
        self.numerator < Integer::ZERO
    }

    pub fn is_positive(&self) -> bool {
        self.numerator > Integer::ZERO
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == Natural::ONE
    }

    /// Nearest `f64` to the fraction
    ///
    /// Only meant for display and rough magnitudes, never for arithmetic.
    pub fn to_decimal(&self) -> f64 {
        let value = Rational::from(&self.numerator) / Rational::from(&self.denominator);
        f64::rounding_from(&value, RoundingMode::Nearest).0
    }
}
impl Default for RobustFraction {
    fn default() -> Self {
        Self::zero()
    }
}
impl From<i64> for RobustFraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}
impl Ord for RobustFraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = &self.numerator * Integer::from(&other.denominator);
        let right = &other.numerator * Integer::from(&self.denominator);
        left.cmp(&right)
    }
}
impl PartialOrd for RobustFraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Display for RobustFraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> RobustFraction {
        RobustFraction::new(n, d).unwrap()
    }

    #[test]
    fn reduces_to_lowest_terms() {
        let f = frac(6, 8);
        assert_eq!(f.numerator(), &Integer::from(3));
        assert_eq!(f.denominator(), &Natural::from(4u32));

        let f = frac(-10, -4);
        assert_eq!(f.to_string(), "5/2");

        let f = frac(10, -4);
        assert_eq!(f.to_string(), "-5/2");
        assert!(f.is_negative());
    }

    #[test]
    fn zero_has_unit_denominator() {
        let f = frac(0, -7);
        assert!(f.is_zero());
        assert_eq!(f, RobustFraction::zero());
        assert_eq!(f.to_string(), "0");
    }

    #[test]
    fn zero_denominator_is_error() {
        assert_eq!(RobustFraction::new(3, 0), Err(FractionError::ZeroDenominator));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(frac(1, 2).add(&frac(1, 3)), frac(5, 6));
        assert_eq!(frac(1, 2).subtract(&frac(3, 4)), frac(-1, 4));
        assert_eq!(frac(-2, 3).multiply(&frac(9, 4)), frac(-3, 2));
        assert_eq!(frac(2, 3).divide(&frac(-4, 9)).unwrap(), frac(-3, 2));
        assert!(frac(7, 7).is_one());
        assert!(frac(7, 7).is_integer());
    }

    #[test]
    fn division_by_zero_is_error() {
        assert_eq!(frac(1, 2).divide(&RobustFraction::zero()), Err(FractionError::DivisionByZero));
    }

    #[test]
    fn ordering_and_decimal() {
        assert!(frac(1, 3) < frac(1, 2));
        assert!(frac(-1, 2) < frac(-1, 3));
        assert_eq!(frac(-3, 4).abs(), frac(3, 4));
        assert!((frac(-3, 4).to_decimal() + 0.75).abs() < 1e-12);
        approx::assert_abs_diff_eq!(frac(1, 3).to_decimal(), 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn tiny_values_still_compare() {
        let huge: Integer = format!("1{}", "0".repeat(400)).parse().unwrap();
        let tiny = RobustFraction::new(Integer::from(1), huge).unwrap();
        assert_eq!(tiny.to_decimal(), 0.0);
        assert!(tiny > RobustFraction::zero());
        assert!(tiny.negate().abs() > RobustFraction::zero());
    }

    #[test]
    fn large_values_stay_exact() {
        let big = RobustFraction::from_integer(i64::MAX);
        let sum = big.add(&big).add(&big);
        assert_eq!(sum.subtract(&big).subtract(&big), big);
        assert_eq!(sum.divide(&big).unwrap(), RobustFraction::from(3));
    }
}
