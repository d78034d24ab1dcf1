use super::{Kernel, Sign};
use crate::cfg::{FLOAT_EPS, VERIFY_EPS};

/// Tolerance-based `f64` kernel.
///
/// Invariants:
/// - `0 <= eps <= verify_eps`.
/// - `|x| <= eps` is zero for the engine; `|x| <= verify_eps` is zero for verification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Float {
    pub eps: f64,
    pub verify_eps: f64,
}

impl Default for Float {
    fn default() -> Self {
        Self {
            eps: FLOAT_EPS,
            verify_eps: VERIFY_EPS,
        }
    }
}

impl Float {
    /// Engine tolerance `eps`; verification slack is kept at least as loose.
    pub fn with_eps(eps: f64) -> Self {
        let eps = eps.abs();
        Self {
            eps,
            verify_eps: VERIFY_EPS.max(eps),
        }
    }

    #[inline]
    fn sign_with(x: f64, eps: f64) -> Sign {
        if x > eps {
            Sign::Positive
        } else if x < -eps {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

impl Kernel for Float {
    type Scalar = f64;

    fn name(&self) -> &'static str {
        "float"
    }

    #[inline]
    fn sign(&self, x: &f64) -> Sign {
        Self::sign_with(*x, self.eps)
    }

    #[inline]
    fn verify_sign(&self, x: &f64) -> Sign {
        Self::sign_with(*x, self.verify_eps)
    }

    #[inline]
    fn from_f64(&self, x: f64) -> Option<f64> {
        x.is_finite().then_some(x)
    }

    #[inline]
    fn to_f64(&self, x: &f64) -> f64 {
        *x
    }

    #[inline]
    fn is_finite(&self, x: &f64) -> bool {
        x.is_finite()
    }

    /// Max-abs scaling; all-zero and non-finite vectors are left untouched.
    fn normalize(&self, v: &mut [f64]) {
        let m = v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if m > 0.0 && m.is_finite() {
            for x in v.iter_mut() {
                *x /= m;
            }
        }
    }

    #[inline]
    fn prefer_pivot(&self, candidate: &f64, current: &f64) -> bool {
        candidate.abs() > current.abs()
    }
}
