use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::{Kernel, Sign};

/// Exact rational kernel over `BigRational`.
///
/// Inputs are converted from `f64` without rounding (every finite double is a
/// dyadic rational). Rays are kept as primitive integer vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exact;

impl Kernel for Exact {
    type Scalar = BigRational;

    fn name(&self) -> &'static str {
        "exact"
    }

    #[inline]
    fn sign(&self, x: &BigRational) -> Sign {
        if x.is_positive() {
            Sign::Positive
        } else if x.is_negative() {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    fn from_f64(&self, x: f64) -> Option<BigRational> {
        BigRational::from_float(x)
    }

    /// Nearest double of the ratio itself, so huge numerators and
    /// denominators with a representable quotient still lower cleanly.
    fn to_f64(&self, x: &BigRational) -> f64 {
        ToPrimitive::to_f64(x).unwrap_or(f64::NAN)
    }

    /// Clear denominators, then divide out the gcd of the numerators.
    fn normalize(&self, v: &mut [BigRational]) {
        let lcm = v
            .iter()
            .fold(BigInt::one(), |acc, x| acc.lcm(x.denom()));
        let ints: Vec<BigInt> = v
            .iter()
            .map(|x| (x * BigRational::from_integer(lcm.clone())).to_integer())
            .collect();
        let g = ints.iter().fold(BigInt::zero(), |acc, x| acc.gcd(x));
        if g.is_zero() {
            return;
        }
        for (x, n) in v.iter_mut().zip(ints) {
            *x = BigRational::from_integer(n / &g);
        }
    }

    #[inline]
    fn prefer_pivot(&self, _candidate: &BigRational, _current: &BigRational) -> bool {
        false
    }
}
