//! Initial simplicial cone and lineality space via Gauss–Jordan elimination.
//!
//! Given the homogeneous system `M y >= 0`, pick `r = rank(M)` independent
//! rows `B` (in processing order) with pivot columns `P`. Then
//! - rays `y_j` satisfy `M_B y_j = e_j` and vanish off `P`;
//! - lines span `null(M)`: one per non-pivot column `c`, with `y_c = 1`.
//!
//! Every row of `M` is a combination of `M_B`, so all rows vanish on the lines
//! and the DD loop never has to touch them.

use crate::error::ConversionError;
use crate::kernel::{Kernel, Sign};

#[derive(Clone, Debug)]
pub(crate) struct Basis<S> {
    /// Indices into `M` of the basis rows; ray `j` is tight on all but `rows[j]`.
    pub(crate) rows: Vec<usize>,
    pub(crate) rays: Vec<Vec<S>>,
    pub(crate) lines: Vec<Vec<S>>,
}

pub(crate) fn initial_basis<K: Kernel>(
    kernel: &K,
    m: &[Vec<K::Scalar>],
    order: &[usize],
    cols: usize,
) -> Result<Basis<K::Scalar>, ConversionError> {
    let zero = <K::Scalar as num_traits::Zero>::zero();
    let one = <K::Scalar as num_traits::One>::one();

    // Row echelon pass to find basis rows and pivot columns.
    let mut reduced: Vec<(Vec<K::Scalar>, usize)> = Vec::new();
    let mut rows = Vec::new();
    for &i in order {
        if reduced.len() == cols {
            break;
        }
        let mut v = m[i].clone();
        for (e, p) in &reduced {
            if kernel.sign(&v[*p]) == Sign::Zero {
                continue;
            }
            let f = v[*p].clone() / e[*p].clone();
            for c in 0..cols {
                v[c] = v[c].clone() - f.clone() * e[c].clone();
            }
            v[*p] = zero.clone();
        }
        let mut best: Option<usize> = None;
        for c in 0..cols {
            if kernel.sign(&v[c]) == Sign::Zero || reduced.iter().any(|(_, p)| *p == c) {
                continue;
            }
            match best {
                Some(b) if !kernel.prefer_pivot(&v[c], &v[b]) => {}
                _ => best = Some(c),
            }
        }
        if let Some(p) = best {
            reduced.push((v, p));
            rows.push(i);
        }
    }

    let pivots: Vec<usize> = reduced.iter().map(|(_, p)| *p).collect();
    let r = rows.len();
    let square: Vec<Vec<K::Scalar>> = rows
        .iter()
        .map(|&i| pivots.iter().map(|&p| m[i][p].clone()).collect())
        .collect();
    let inv = invert(kernel, square).ok_or(ConversionError::SingularBasis)?;

    let mut rays = Vec::with_capacity(r);
    for j in 0..r {
        let mut y = vec![zero.clone(); cols];
        for (b, &p) in pivots.iter().enumerate() {
            y[p] = inv[b][j].clone();
        }
        kernel.normalize(&mut y);
        rays.push(y);
    }

    let mut lines = Vec::with_capacity(cols - r);
    for c in (0..cols).filter(|c| !pivots.contains(c)) {
        let mut y = vec![zero.clone(); cols];
        y[c] = one.clone();
        for (b, &p) in pivots.iter().enumerate() {
            let mut acc = zero.clone();
            for (a, &i) in rows.iter().enumerate() {
                acc = acc - inv[b][a].clone() * m[i][c].clone();
            }
            y[p] = acc;
        }
        kernel.normalize(&mut y);
        lines.push(y);
    }

    Ok(Basis { rows, rays, lines })
}

/// Gauss–Jordan inverse of a square matrix; `None` when a pivot is zero under the kernel.
pub(crate) fn invert<K: Kernel>(
    kernel: &K,
    mut a: Vec<Vec<K::Scalar>>,
) -> Option<Vec<Vec<K::Scalar>>> {
    let n = a.len();
    let zero = <K::Scalar as num_traits::Zero>::zero();
    let one = <K::Scalar as num_traits::One>::one();
    let mut inv: Vec<Vec<K::Scalar>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { one.clone() } else { zero.clone() })
                .collect()
        })
        .collect();
    for col in 0..n {
        let mut piv: Option<usize> = None;
        for r in col..n {
            if kernel.sign(&a[r][col]) == Sign::Zero {
                continue;
            }
            match piv {
                Some(b) if !kernel.prefer_pivot(&a[r][col], &a[b][col]) => {}
                _ => piv = Some(r),
            }
        }
        let p = piv?;
        a.swap(col, p);
        inv.swap(col, p);
        let d = a[col][col].clone();
        for c in 0..n {
            a[col][c] = a[col][c].clone() / d.clone();
            inv[col][c] = inv[col][c].clone() / d.clone();
        }
        let prow = a[col].clone();
        let pinv = inv[col].clone();
        for r in 0..n {
            if r == col {
                continue;
            }
            let f = a[r][col].clone();
            if kernel.sign(&f) == Sign::Zero {
                continue;
            }
            for c in 0..n {
                a[r][c] = a[r][c].clone() - f.clone() * prow[c].clone();
                inv[r][c] = inv[r][c].clone() - f.clone() * pinv[c].clone();
            }
        }
    }
    Some(inv)
}
