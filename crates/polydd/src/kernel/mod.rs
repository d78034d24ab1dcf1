//! Numeric kernels: the arithmetic strategy the DD engine runs on.
//!
//! Purpose
//! - Make the tolerance-based float vs exact rational trade-off a value the
//!   caller picks (`Float` or `Exact`), not a compile-time switch of the crate.
//! - Keep every sign decision of the engine behind `Kernel::sign`, so one
//!   tolerance policy governs partitioning, rank decisions and dedup.
//!
//! Conventions
//! - `normalize` rescales by a positive factor only; cone membership and sign
//!   patterns are preserved.
//! - `prefer_pivot` orders nonzero pivot candidates (largest magnitude for
//!   floats, first found for rationals).

mod exact;
mod float;

use std::fmt;

use num_traits::Signed;

pub use exact::Exact;
pub use float::Float;

/// Scalar types the engine can run on.
pub trait Scalar:
    Clone + fmt::Debug + PartialEq + PartialOrd + Signed + Send + Sync + 'static
{
}

impl<T> Scalar for T where
    T: Clone + fmt::Debug + PartialEq + PartialOrd + Signed + Send + Sync + 'static
{
}

/// Three-way sign under a kernel's zero test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// Arithmetic strategy used by the engine.
pub trait Kernel: Clone + fmt::Debug + Send + Sync + 'static {
    type Scalar: Scalar;

    /// Short label for logs and CLI output.
    fn name(&self) -> &'static str;

    /// Sign test used for partitioning, rank decisions and dedup.
    fn sign(&self, x: &Self::Scalar) -> Sign;

    /// Looser sign test used when verifying outputs against inputs.
    fn verify_sign(&self, x: &Self::Scalar) -> Sign {
        self.sign(x)
    }

    fn from_f64(&self, x: f64) -> Option<Self::Scalar>;

    fn to_f64(&self, x: &Self::Scalar) -> f64;

    fn is_finite(&self, _x: &Self::Scalar) -> bool {
        true
    }

    /// Rescale `v` by a positive factor into the kernel's canonical form.
    fn normalize(&self, v: &mut [Self::Scalar]);

    /// Whether `candidate` is a better pivot than `current` (both nonzero).
    fn prefer_pivot(&self, candidate: &Self::Scalar, current: &Self::Scalar) -> bool;
}

/// Inner product of two equal-length rows.
pub(crate) fn dot<S: Scalar>(a: &[S], b: &[S]) -> S {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(S::zero(), |acc, (x, y)| acc + x.clone() * y.clone())
}

/// Largest absolute entry (zero for an empty slice).
pub(crate) fn max_abs<S: Scalar>(v: &[S]) -> S {
    v.iter().fold(S::zero(), |acc, x| {
        let a = x.abs();
        if a > acc {
            a
        } else {
            acc
        }
    })
}

/// Divide every entry by `d` (caller guarantees `d > 0`).
pub(crate) fn scale_down<S: Scalar>(v: &mut [S], d: &S) {
    for x in v.iter_mut() {
        *x = x.clone() / d.clone();
    }
}
