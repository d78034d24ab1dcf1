//! Incremental double-description loop over a homogeneous system `M y >= 0`.
//!
//! Invariants (between iterations)
//! - `rays` are exactly the extreme rays of the cone cut out by the processed
//!   rows, modulo the lineality space spanned by `lines`.
//! - A ray's zero set lists the processed rows it saturates; it is maintained
//!   combinatorially (parents' intersection plus the new row), never re-evaluated.

use tracing::trace;

use super::basis::initial_basis;
use super::order::processing_order;
use super::zero::ZeroSet;
use crate::cfg::DdCfg;
use crate::error::ConversionError;
use crate::kernel::{dot, Kernel, Sign};

#[derive(Clone, Debug)]
pub(crate) struct Ray<S> {
    pub(crate) vec: Vec<S>,
    pub(crate) zero: ZeroSet,
}

/// Extreme rays, lineality basis and rank of a converted cone.
#[derive(Clone, Debug)]
pub(crate) struct ConeOutput<S> {
    pub(crate) rays: Vec<Ray<S>>,
    pub(crate) lines: Vec<Vec<S>>,
    pub(crate) rank: usize,
}

struct Cone<'a, K: Kernel> {
    kernel: &'a K,
    m: &'a [Vec<K::Scalar>],
    rays: Vec<Ray<K::Scalar>>,
    rank: usize,
    max_rays: Option<usize>,
}

/// Generators of `{y : m y >= 0}`; `cols` is the common row width.
pub(crate) fn enumerate<K: Kernel>(
    kernel: &K,
    m: &[Vec<K::Scalar>],
    cols: usize,
    cfg: &DdCfg,
) -> Result<ConeOutput<K::Scalar>, ConversionError> {
    let order = processing_order(m, cfg.row_order);
    let basis = initial_basis(kernel, m, &order, cols)?;
    let rank = basis.rows.len();
    trace!(rank, lineality = basis.lines.len(), "initial basis");

    let rays = basis
        .rays
        .into_iter()
        .enumerate()
        .map(|(j, vec)| {
            let mut zero = ZeroSet::with_domain(m.len());
            for (a, &row) in basis.rows.iter().enumerate() {
                if a != j {
                    zero.insert(row);
                }
            }
            Ray { vec, zero }
        })
        .collect();

    let mut cone = Cone {
        kernel,
        m,
        rays,
        rank,
        max_rays: cfg.max_rays,
    };
    for &row in order.iter().filter(|r| !basis.rows.contains(r)) {
        cone.add_halfspace(row)?;
    }

    Ok(ConeOutput {
        rays: cone.rays,
        lines: basis.lines,
        rank,
    })
}

impl<K: Kernel> Cone<'_, K> {
    fn add_halfspace(&mut self, row: usize) -> Result<(), ConversionError> {
        let h = &self.m[row];
        let values: Vec<K::Scalar> = self.rays.iter().map(|r| dot(h, &r.vec)).collect();
        let signs: Vec<Sign> = values.iter().map(|v| self.kernel.sign(v)).collect();

        let pos: Vec<usize> = (0..signs.len()).filter(|&i| signs[i] == Sign::Positive).collect();
        let neg: Vec<usize> = (0..signs.len()).filter(|&i| signs[i] == Sign::Negative).collect();

        let mut fresh = Vec::new();
        for &p in &pos {
            for &n in &neg {
                if !self.adjacent(p, n) {
                    continue;
                }
                // s_p > 0 and -s_n > 0: a positive combination on the hyperplane of `row`.
                let sp = values[p].clone();
                let sn = values[n].clone();
                let mut vec: Vec<K::Scalar> = self.rays[n]
                    .vec
                    .iter()
                    .zip(&self.rays[p].vec)
                    .map(|(yn, yp)| sp.clone() * yn.clone() - sn.clone() * yp.clone())
                    .collect();
                if !vec.iter().all(|x| self.kernel.is_finite(x)) {
                    return Err(ConversionError::NonFinite { row });
                }
                if vec.iter().all(|x| self.kernel.sign(x) == Sign::Zero) {
                    return Err(ConversionError::DegenerateCombination { row });
                }
                self.kernel.normalize(&mut vec);
                let mut zero = self.rays[p].zero.intersection(&self.rays[n].zero);
                zero.insert(row);
                fresh.push(Ray { vec, zero });
            }
        }

        trace!(
            row,
            positive = pos.len(),
            negative = neg.len(),
            zero = signs.len() - pos.len() - neg.len(),
            created = fresh.len(),
            "halfspace added"
        );

        let mut kept = Vec::with_capacity(self.rays.len() - neg.len() + fresh.len());
        for (mut ray, sign) in std::mem::take(&mut self.rays).into_iter().zip(signs) {
            match sign {
                Sign::Negative => {}
                Sign::Zero => {
                    ray.zero.insert(row);
                    kept.push(ray);
                }
                Sign::Positive => kept.push(ray),
            }
        }
        kept.extend(fresh);
        self.rays = kept;

        if let Some(limit) = self.max_rays {
            if self.rays.len() > limit {
                return Err(ConversionError::RayLimit {
                    count: self.rays.len(),
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Combinatorial adjacency: the common zero set is large enough and no
    /// third ray saturates all of it.
    fn adjacent(&self, a: usize, b: usize) -> bool {
        let za = &self.rays[a].zero;
        let zb = &self.rays[b].zero;
        let common = za.intersection(zb);
        let count = common.len();
        if count + 2 < self.rank {
            return false;
        }
        if za.len().min(zb.len()) == count + 1 {
            return true;
        }
        !self
            .rays
            .iter()
            .enumerate()
            .any(|(i, r)| i != a && i != b && common.is_subset(&r.zero))
    }
}
