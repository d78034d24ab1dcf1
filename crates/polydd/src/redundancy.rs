//! Secondary redundancy pass over engine output.
//!
//! Only removes rows that repeat an earlier row up to positive scaling. The
//! engine already emits each extreme ray once; duplicates come from lineality
//! pairs colliding with rays and from near-parallel float rays.

use crate::kernel::{Kernel, Sign};

/// Indices of the rows to keep, in input order (first occurrence wins).
pub(crate) fn unique_rows<K: Kernel>(kernel: &K, rows: &[Vec<K::Scalar>]) -> Vec<usize> {
    let canon: Vec<Vec<K::Scalar>> = rows
        .iter()
        .map(|r| {
            let mut v = r.clone();
            kernel.normalize(&mut v);
            v
        })
        .collect();
    let mut keep: Vec<usize> = Vec::with_capacity(rows.len());
    for (i, c) in canon.iter().enumerate() {
        if !keep.iter().any(|&k| same(kernel, &canon[k], c)) {
            keep.push(i);
        }
    }
    keep
}

fn same<K: Kernel>(kernel: &K, a: &[K::Scalar], b: &[K::Scalar]) -> bool {
    a.iter()
        .zip(b)
        .all(|(x, y)| kernel.sign(&(x.clone() - y.clone())) == Sign::Zero)
}
