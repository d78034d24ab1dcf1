//! Consistency checks between an H-form and a V-form.
//!
//! Both combined forms are built so that an H row `h` and a V row `g` of the
//! same polyhedron satisfy `h·g >= 0` (points and rays alike). The checks here
//! test exactly that, with a tolerance scaled by the row magnitudes.

use tracing::warn;

use crate::cfg::COMPARE_EPS;
use crate::error::ConversionError;
use crate::kernel::{dot, max_abs, scale_down, Kernel, Scalar, Sign};
use crate::matrix::{RepKind, RepMatrix};

/// Every output row against every input row, under `verify_sign`.
///
/// Both sides are compared max-abs normalized, so the float slack acts relative
/// to row scale. Reports the first violation.
pub(crate) fn check_dual<K: Kernel>(
    kernel: &K,
    input: &[Vec<K::Scalar>],
    output: &[Vec<K::Scalar>],
) -> Result<(), ConversionError> {
    let normalized = |rows: &[Vec<K::Scalar>]| -> Vec<Vec<K::Scalar>> {
        rows.iter()
            .map(|r| {
                let mut v = r.clone();
                unit_scale(&mut v);
                v
            })
            .collect()
    };
    let ins = normalized(input);
    let outs = normalized(output);
    for (o, g) in outs.iter().enumerate() {
        for (i, h) in ins.iter().enumerate() {
            let s = dot(h, g);
            if kernel.verify_sign(&s) == Sign::Negative {
                let residual = kernel.to_f64(&s);
                warn!(output = o, input = i, residual, "dual row violates input row");
                return Err(ConversionError::Inconsistent {
                    output: o,
                    input: i,
                    residual,
                });
            }
        }
    }
    Ok(())
}

fn unit_scale<S: Scalar>(v: &mut [S]) {
    let m = max_abs(v);
    if !m.is_zero() {
        scale_down(v, &m);
    }
}

/// Whether every H row `(b, a)` satisfies `a·v <= b + tol` for each point `v`
/// and `a·r <= tol` for each ray `r`, after max-abs scaling of both rows.
///
/// Returns the first violating pair as an `Inconsistent` error (`output` is the
/// V row, `input` the H row).
pub fn check_sign_convention(
    h: &RepMatrix<f64>,
    v: &RepMatrix<f64>,
    tol: f64,
) -> Result<(), ConversionError> {
    debug_assert_eq!(h.kind(), RepKind::H);
    debug_assert_eq!(v.kind(), RepKind::V);
    for (o, g) in v.rows().iter().enumerate() {
        let mut g = g.clone();
        unit_scale(&mut g);
        for (i, r) in h.rows().iter().enumerate() {
            let mut r = r.clone();
            unit_scale(&mut r);
            let s = dot(&r, &g);
            if s < -tol {
                return Err(ConversionError::Inconsistent {
                    output: o,
                    input: i,
                    residual: s,
                });
            }
        }
    }
    Ok(())
}

/// Canonical scale of a combined row: divide by `|row[0]|` when it is nonzero
/// (points, affine halfspaces), otherwise by the largest absolute entry.
pub fn canonical_row(row: &[f64], tol: f64) -> Vec<f64> {
    let lead = row.first().map_or(0.0, |x| x.abs());
    let d = if lead > tol {
        lead
    } else {
        row.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
    };
    if d > 0.0 {
        row.iter().map(|x| x / d).collect()
    } else {
        row.to_vec()
    }
}

/// Unordered row-set equality up to positive scaling, per-coordinate within `tol`.
pub fn same_rows_up_to_scaling(a: &RepMatrix<f64>, b: &RepMatrix<f64>, tol: f64) -> bool {
    if a.kind() != b.kind() || a.cols() != b.cols() || a.nrows() != b.nrows() {
        return false;
    }
    let cb: Vec<Vec<f64>> = b.rows().iter().map(|r| canonical_row(r, tol)).collect();
    let mut used = vec![false; cb.len()];
    a.rows().iter().all(|r| {
        let ca = canonical_row(r, tol);
        let hit = cb.iter().enumerate().position(|(j, c)| {
            !used[j] && ca.iter().zip(c).all(|(x, y)| (x - y).abs() <= tol)
        });
        match hit {
            Some(j) => {
                used[j] = true;
                true
            }
            None => false,
        }
    })
}

/// `same_rows_up_to_scaling` with the default comparison tolerance.
#[inline]
pub fn same_rows(a: &RepMatrix<f64>, b: &RepMatrix<f64>) -> bool {
    same_rows_up_to_scaling(a, b, COMPARE_EPS)
}
