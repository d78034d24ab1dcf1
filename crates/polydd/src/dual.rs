//! One conversion: validation, mode selection, engine run and output assembly.
//!
//! Modes
//! - Homogeneous: width >= 2 and the leading column is zero on every row. The
//!   input is a cone with apex at the origin; the leading column is dropped for
//!   the engine and a zero column is put back on every output row.
//! - Affine: everything else. H input gets the implicit row `y0 >= 0` appended,
//!   and cone rays with `y0 > 0` read back as points.
//!
//! An affine H input whose cone has no ray with `y0 > 0` is the empty
//! polyhedron; that is a successful conversion with zero output rows.

use num_traits::Signed;
use tracing::debug;

use crate::cfg::{DdCfg, Redundancy};
use crate::context::Constants;
use crate::dd::{enumerate, Ray};
use crate::error::{DdError, StructuralError};
use crate::kernel::{Kernel, Scalar, Sign};
use crate::matrix::{RepKind, RepMatrix};
use crate::redundancy::unique_rows;
use crate::verify::check_dual;

/// Dual representation produced by one conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct DualResult<S> {
    output: RepMatrix<S>,
    incidence: Vec<Vec<usize>>,
    empty: bool,
    homogeneous: bool,
    rank: usize,
    lineality: usize,
}

impl<S: Clone> DualResult<S> {
    /// Dual matrix in combined form (`[b | -A]` or `[t | V]`).
    #[inline]
    pub fn output(&self) -> &RepMatrix<S> {
        &self.output
    }
    #[inline]
    pub fn into_output(self) -> RepMatrix<S> {
        self.output
    }
    /// For each output row, the sorted input rows it satisfies with equality.
    #[inline]
    pub fn incidence(&self) -> &[Vec<usize>] {
        &self.incidence
    }
    /// The input H-form is infeasible.
    #[inline]
    pub fn is_empty_polyhedron(&self) -> bool {
        self.empty
    }
    /// The input was treated as a cone with apex at the origin.
    #[inline]
    pub fn is_homogeneous(&self) -> bool {
        self.homogeneous
    }
    /// Rank of the homogeneous system handed to the engine.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }
    /// Dimension of the lineality space of that system.
    #[inline]
    pub fn lineality(&self) -> usize {
        self.lineality
    }
}

/// Reject malformed input before any engine work.
pub(crate) fn validate_input<K: Kernel>(
    kernel: &K,
    constants: &Constants<K::Scalar>,
    input: &RepMatrix<K::Scalar>,
) -> Result<(), StructuralError> {
    if input.is_empty() {
        return Err(StructuralError::NoRows);
    }
    if input.cols() == 0 {
        return Err(StructuralError::NoColumns);
    }
    for (row, r) in input.rows().iter().enumerate() {
        if let Some(col) = r.iter().position(|x| !kernel.is_finite(x)) {
            return Err(StructuralError::NonFinite { row, col });
        }
        if input.kind() == RepKind::V && r[0] != constants.zero && r[0] != constants.one {
            return Err(StructuralError::BadIndicator {
                row,
                value: kernel.to_f64(&r[0]),
            });
        }
    }
    Ok(())
}

pub(crate) fn convert<K: Kernel>(
    kernel: &K,
    constants: &Constants<K::Scalar>,
    input: &RepMatrix<K::Scalar>,
    cfg: &DdCfg,
) -> Result<DualResult<K::Scalar>, DdError> {
    validate_input(kernel, constants, input)?;
    let m = input.nrows();
    let cols = input.cols();
    // exact test: rows are not normalized yet
    let homogeneous = cols >= 2 && input.rows().iter().all(|r| r[0] == constants.zero);
    let skip = usize::from(homogeneous);
    let width = cols - skip;

    let mut system: Vec<Vec<K::Scalar>> = input
        .rows()
        .iter()
        .map(|r| {
            let mut v = r[skip..].to_vec();
            kernel.normalize(&mut v);
            v
        })
        .collect();
    if input.kind() == RepKind::H && !homogeneous {
        let mut y0 = vec![constants.zero.clone(); width];
        y0[0] = constants.one.clone();
        system.push(y0);
    }

    debug!(
        kernel = kernel.name(),
        kind = ?input.kind(),
        rows = m,
        cols,
        homogeneous,
        "conversion start"
    );
    let cone = enumerate(kernel, &system, width, cfg)?;

    let assembler = Assembler {
        kernel,
        constants,
        homogeneous,
    };
    let kind = input.kind().dual();
    let mut rows = Vec::new();
    let mut incidence = Vec::new();
    let mut empty = false;
    let saturated =
        |ray: &Ray<K::Scalar>| (0..m).filter(|&i| ray.zero.contains(i)).collect::<Vec<_>>();

    match input.kind() {
        RepKind::H => {
            let has_point = cone
                .rays
                .iter()
                .any(|r| kernel.sign(&r.vec[0]) == Sign::Positive);
            if homogeneous || has_point {
                for ray in &cone.rays {
                    rows.push(assembler.generator(ray.vec.clone()));
                    incidence.push(saturated(ray));
                }
                for line in &cone.lines {
                    for dir in [line.clone(), negated(line)] {
                        rows.push(assembler.generator(dir));
                        incidence.push((0..m).collect());
                    }
                }
            } else {
                empty = true;
            }
        }
        RepKind::V => {
            for ray in &cone.rays {
                rows.push(assembler.halfspace(ray.vec.clone()));
                incidence.push(saturated(ray));
            }
            for line in &cone.lines {
                for dir in [line.clone(), negated(line)] {
                    rows.push(assembler.halfspace(dir));
                    incidence.push((0..m).collect());
                }
            }
        }
    }

    if cfg.redundancy == Redundancy::RemoveDuplicates && rows.len() > 1 {
        let keep = unique_rows(kernel, &rows);
        if keep.len() < rows.len() {
            debug!(removed = rows.len() - keep.len(), "duplicate output rows removed");
            rows = keep.iter().map(|&i| rows[i].clone()).collect();
            incidence = keep.iter().map(|&i| incidence[i].clone()).collect();
        }
    }

    if cfg.verify {
        check_dual(kernel, input.rows(), &rows)?;
    }

    let mut output = RepMatrix::empty(kind, cols);
    for r in rows {
        output.push_row(r);
    }
    debug!(
        out_rows = output.nrows(),
        rank = cone.rank,
        lineality = cone.lines.len(),
        empty,
        "conversion done"
    );
    Ok(DualResult {
        output,
        incidence,
        empty,
        homogeneous,
        rank: cone.rank,
        lineality: cone.lines.len(),
    })
}

fn negated<S: Scalar>(v: &[S]) -> Vec<S> {
    v.iter().map(|x| -x.clone()).collect()
}

/// Turns engine vectors into output rows of the right width and scale.
struct Assembler<'a, K: Kernel> {
    kernel: &'a K,
    constants: &'a Constants<K::Scalar>,
    homogeneous: bool,
}

impl<K: Kernel> Assembler<'_, K> {
    /// V row: point `(1, y'/y0)` when `y0 > 0`, otherwise ray `(0, y')`.
    fn generator(&self, mut y: Vec<K::Scalar>) -> Vec<K::Scalar> {
        if self.homogeneous {
            return self.cone_row(y);
        }
        if self.kernel.sign(&y[0]) == Sign::Positive {
            let y0 = y[0].clone();
            for x in y.iter_mut().skip(1) {
                *x = x.clone() / y0.clone();
            }
            y[0] = self.constants.one.clone();
        } else {
            y[0] = self.constants.zero.clone();
            self.kernel.normalize(&mut y);
        }
        y
    }

    /// H row `[b | -a]`, scaled to `|b| = 1` when `b != 0`.
    fn halfspace(&self, mut z: Vec<K::Scalar>) -> Vec<K::Scalar> {
        if self.homogeneous {
            return self.cone_row(z);
        }
        if self.kernel.sign(&z[0]) == Sign::Zero {
            z[0] = self.constants.zero.clone();
            self.kernel.normalize(&mut z);
        } else {
            let b = Signed::abs(&z[0]);
            for x in z.iter_mut() {
                *x = x.clone() / b.clone();
            }
        }
        z
    }

    fn cone_row(&self, mut v: Vec<K::Scalar>) -> Vec<K::Scalar> {
        self.kernel.normalize(&mut v);
        v.insert(0, self.constants.zero.clone());
        v
    }
}
