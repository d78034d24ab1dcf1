//! Representation matrices and the sign convention.
//!
//! Conventions
//! - H-form row `(b, a)` encodes `a·x <= b` and is stored homogeneously as
//!   `[b | -a]`, so that `[b | -a]·(1, x) >= 0`.
//! - V-form row `(t, v)` is stored unchanged as `[t | v]`; `t = 1` is a point,
//!   `t = 0` a ray.
//! - Split-form readers (`to_split`) undo exactly this flip: `A = -M[:, 1..]`
//!   for H and `V = M[:, 1..]` for V. Getting it backwards yields the
//!   complement polyhedron, so nothing else in the crate re-derives it.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::StructuralError;
use crate::kernel::Kernel;

/// Which representation a matrix holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepKind {
    /// Half-spaces (inequalities).
    H,
    /// Vertices and rays (generators).
    V,
}

impl RepKind {
    #[inline]
    pub fn dual(self) -> Self {
        match self {
            RepKind::H => RepKind::V,
            RepKind::V => RepKind::H,
        }
    }
}

/// Row-major representation matrix in homogeneous (combined) form.
///
/// Invariants:
/// - Every row has exactly `cols` entries.
/// - Inputs have `cols >= 1`; outputs may have zero rows.
#[derive(Clone, Debug, PartialEq)]
pub struct RepMatrix<S> {
    kind: RepKind,
    cols: usize,
    rows: Vec<Vec<S>>,
}

impl<S: Clone> RepMatrix<S> {
    /// Matrix with no rows yet.
    #[inline]
    pub fn empty(kind: RepKind, cols: usize) -> Self {
        Self {
            kind,
            cols,
            rows: Vec::new(),
        }
    }

    /// Build from combined rows; rejects empty, zero-width and ragged input.
    pub fn from_rows(kind: RepKind, rows: Vec<Vec<S>>) -> Result<Self, StructuralError> {
        let Some(first) = rows.first() else {
            return Err(StructuralError::NoRows);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(StructuralError::NoColumns);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(StructuralError::RaggedRow {
                row,
                expected: cols,
                found: r.len(),
            });
        }
        Ok(Self { kind, cols, rows })
    }

    #[inline]
    pub fn kind(&self) -> RepKind {
        self.kind
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    #[inline]
    pub fn rows(&self) -> &[Vec<S>] {
        &self.rows
    }
    #[inline]
    pub fn row(&self, i: usize) -> Option<&[S]> {
        self.rows.get(i).map(Vec::as_slice)
    }
    #[inline]
    pub fn into_rows(self) -> Vec<Vec<S>> {
        self.rows
    }

    pub(crate) fn push_row(&mut self, row: Vec<S>) {
        debug_assert_eq!(row.len(), self.cols);
        self.rows.push(row);
    }

    /// Apply `f` entrywise, keeping shape and kind.
    pub fn try_map<T, E>(
        &self,
        mut f: impl FnMut(usize, usize, &S) -> Result<T, E>,
    ) -> Result<RepMatrix<T>, E> {
        let mut rows = Vec::with_capacity(self.rows.len());
        for (i, r) in self.rows.iter().enumerate() {
            let mut out = Vec::with_capacity(self.cols);
            for (j, x) in r.iter().enumerate() {
                out.push(f(i, j, x)?);
            }
            rows.push(out);
        }
        Ok(RepMatrix {
            kind: self.kind,
            cols: self.cols,
            rows,
        })
    }
}

impl<S: crate::kernel::Scalar> RepMatrix<S> {
    /// Exact kernel-native matrix from an `f64` one.
    pub fn lift<K: Kernel<Scalar = S>>(
        kernel: &K,
        m: &RepMatrix<f64>,
    ) -> Result<Self, StructuralError> {
        m.try_map(|row, col, x| {
            kernel
                .from_f64(*x)
                .ok_or(StructuralError::NonFinite { row, col })
        })
    }

    /// Lossy `f64` view of a kernel-native matrix.
    pub fn lower<K: Kernel<Scalar = S>>(&self, kernel: &K) -> RepMatrix<f64> {
        RepMatrix {
            kind: self.kind,
            cols: self.cols,
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(|x| kernel.to_f64(x)).collect())
                .collect(),
        }
    }
}

impl RepMatrix<f64> {
    /// Combined form: leading column is `b` (H, already `[b | -A]`) or `t` (V).
    pub fn from_dmatrix(m: &DMatrix<f64>, kind: RepKind) -> Result<Self, StructuralError> {
        if m.nrows() == 0 {
            return Err(StructuralError::NoRows);
        }
        if m.ncols() == 0 {
            return Err(StructuralError::NoColumns);
        }
        let rows = m
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect();
        Self::from_rows(kind, rows)
    }

    /// Split H-form `A x <= b`, stored as `[b | -A]`.
    pub fn from_h_split(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<Self, StructuralError> {
        Self::from_split(RepKind::H, a, b, -1.0)
    }

    /// Split V-form: generator rows `v` with indicators `t`, stored as `[t | V]`.
    pub fn from_v_split(v: &DMatrix<f64>, t: &DVector<f64>) -> Result<Self, StructuralError> {
        Self::from_split(RepKind::V, v, t, 1.0)
    }

    /// V-form where every row of `rays` is a ray (`t = 0`).
    pub fn from_rays(rays: &DMatrix<f64>) -> Result<Self, StructuralError> {
        Self::from_v_split(rays, &DVector::zeros(rays.nrows()))
    }

    /// V-form where every row of `points` is a point (`t = 1`).
    pub fn from_vertices(points: &DMatrix<f64>) -> Result<Self, StructuralError> {
        Self::from_v_split(points, &DVector::from_element(points.nrows(), 1.0))
    }

    fn from_split(
        kind: RepKind,
        coeffs: &DMatrix<f64>,
        lead: &DVector<f64>,
        sign: f64,
    ) -> Result<Self, StructuralError> {
        if coeffs.nrows() != lead.len() {
            return Err(StructuralError::SplitMismatch {
                rows: coeffs.nrows(),
                len: lead.len(),
            });
        }
        if coeffs.nrows() == 0 {
            return Err(StructuralError::NoRows);
        }
        let rows = coeffs
            .row_iter()
            .zip(lead.iter())
            .map(|(r, &l)| {
                let mut out = Vec::with_capacity(r.len() + 1);
                out.push(l);
                out.extend(r.iter().map(|x| sign * x));
                out
            })
            .collect();
        Self::from_rows(kind, rows)
    }

    /// Dense combined matrix; a zero-row matrix keeps its column count.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows.len(), self.cols, |i, j| self.rows[i][j])
    }

    /// Split form with the sign convention undone: `(A, b)` for H, `(V, t)` for V.
    pub fn to_split(&self) -> (DMatrix<f64>, DVector<f64>) {
        let sign = match self.kind {
            RepKind::H => -1.0,
            RepKind::V => 1.0,
        };
        let n = self.cols.saturating_sub(1);
        let coeffs = DMatrix::from_fn(self.rows.len(), n, |i, j| sign * self.rows[i][j + 1]);
        let lead = DVector::from_fn(self.rows.len(), |i, _| self.rows[i][0]);
        (coeffs, lead)
    }
}
