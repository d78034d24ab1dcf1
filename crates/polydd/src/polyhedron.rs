//! Polyhedron object: one input of record plus its converted dual.
//!
//! State machine
//! - `Empty` until the first successful `set_*`; reads return `0 × 0` matrices.
//! - `Converted` afterwards. A later `set_*` replaces input and dual together
//!   on success and leaves both untouched on failure.
//! - `last_error` holds the message of the most recent failed attempt and is
//!   cleared by the next attempt.

use nalgebra::{DMatrix, DVector};

use crate::cfg::DdCfg;
use crate::context::{ContextLease, NumericContext};
use crate::dual::DualResult;
use crate::error::{DdError, StructuralError};
use crate::kernel::Kernel;
use crate::matrix::{RepKind, RepMatrix};

#[derive(Debug)]
enum State<S> {
    Empty,
    Converted {
        input: RepMatrix<f64>,
        dual: DualResult<S>,
    },
}

/// Convex polyhedron known in one representation and converted to the other.
#[derive(Debug)]
pub struct Polyhedron<K: Kernel> {
    lease: ContextLease<K>,
    cfg: DdCfg,
    state: State<K::Scalar>,
    last_error: Option<String>,
}

impl<K: Kernel> Polyhedron<K> {
    /// Unconverted polyhedron registered with `ctx`, default configuration.
    pub fn new(ctx: &NumericContext<K>) -> Self {
        Self::with_cfg(ctx, DdCfg::default())
    }

    pub fn with_cfg(ctx: &NumericContext<K>, cfg: DdCfg) -> Self {
        Self {
            lease: ctx.acquire(),
            cfg,
            state: State::Empty,
            last_error: None,
        }
    }

    /// Build and convert in one step; fails with the conversion error.
    pub fn with_rep(
        ctx: &NumericContext<K>,
        m: &DMatrix<f64>,
        kind: RepKind,
    ) -> Result<Self, DdError> {
        let mut p = Self::new(ctx);
        match kind {
            RepKind::H => p.set_hrep(m)?,
            RepKind::V => p.set_vrep(m)?,
        }
        Ok(p)
    }

    /// Cone generated by the rows of `rays`.
    pub fn from_rays(ctx: &NumericContext<K>, rays: &DMatrix<f64>) -> Result<Self, DdError> {
        let mut p = Self::new(ctx);
        p.attempt(RepMatrix::from_rays(rays))?;
        Ok(p)
    }

    /// Convex hull of the rows of `points`.
    pub fn from_vertices(ctx: &NumericContext<K>, points: &DMatrix<f64>) -> Result<Self, DdError> {
        let mut p = Self::new(ctx);
        p.attempt(RepMatrix::from_vertices(points))?;
        Ok(p)
    }

    #[inline]
    pub fn cfg(&self) -> &DdCfg {
        &self.cfg
    }

    /// Applies to the next conversion; the current state is kept.
    #[inline]
    pub fn set_cfg(&mut self, cfg: DdCfg) {
        self.cfg = cfg;
    }

    #[inline]
    pub fn kernel(&self) -> &K {
        self.lease.kernel()
    }

    /// Combined H-form `[b | -A]`.
    pub fn set_hrep(&mut self, m: &DMatrix<f64>) -> Result<(), DdError> {
        self.attempt(RepMatrix::from_dmatrix(m, RepKind::H))
    }

    /// Combined V-form `[t | V]`.
    pub fn set_vrep(&mut self, m: &DMatrix<f64>) -> Result<(), DdError> {
        self.attempt(RepMatrix::from_dmatrix(m, RepKind::V))
    }

    /// `A x <= b`.
    pub fn set_hrep_split(&mut self, a: &DMatrix<f64>, b: &DVector<f64>) -> Result<(), DdError> {
        self.attempt(RepMatrix::from_h_split(a, b))
    }

    /// Generator rows `v` with indicators `t` (1 point, 0 ray).
    pub fn set_vrep_split(&mut self, v: &DMatrix<f64>, t: &DVector<f64>) -> Result<(), DdError> {
        self.attempt(RepMatrix::from_v_split(v, t))
    }

    /// Set from an already-built combined matrix of either kind.
    pub fn set(&mut self, m: &RepMatrix<f64>) -> Result<(), DdError> {
        self.attempt(Ok(m.clone()))
    }

    fn attempt(&mut self, input: Result<RepMatrix<f64>, StructuralError>) -> Result<(), DdError> {
        self.last_error = None;
        let res = input
            .map_err(DdError::from)
            .and_then(|m| self.lease.convert(&m, &self.cfg).map(|d| (m, d)));
        match res {
            Ok((input, dual)) => {
                self.state = State::Converted { input, dual };
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    #[inline]
    pub fn is_converted(&self) -> bool {
        matches!(self.state, State::Converted { .. })
    }

    /// Message of the most recent failed `set_*`, if the latest attempt failed.
    #[inline]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Input of record.
    pub fn input(&self) -> Option<&RepMatrix<f64>> {
        match &self.state {
            State::Converted { input, .. } => Some(input),
            State::Empty => None,
        }
    }

    /// Kernel-native conversion result.
    pub fn dual(&self) -> Option<&DualResult<K::Scalar>> {
        match &self.state {
            State::Converted { dual, .. } => Some(dual),
            State::Empty => None,
        }
    }

    /// The requested representation as an `f64` matrix (input or converted dual).
    pub fn representation(&self, kind: RepKind) -> Option<RepMatrix<f64>> {
        match &self.state {
            State::Empty => None,
            State::Converted { input, .. } if input.kind() == kind => Some(input.clone()),
            State::Converted { dual, .. } => Some(dual.output().lower(self.lease.kernel())),
        }
    }

    /// Combined H-form; `0 × 0` before any successful conversion.
    pub fn hrep(&self) -> DMatrix<f64> {
        self.combined(RepKind::H)
    }

    /// Combined V-form; `0 × 0` before any successful conversion.
    pub fn vrep(&self) -> DMatrix<f64> {
        self.combined(RepKind::V)
    }

    /// `(A, b)` with `A x <= b`.
    pub fn hrep_split(&self) -> (DMatrix<f64>, DVector<f64>) {
        self.split(RepKind::H)
    }

    /// `(V, t)` with `t = 1` for points and `t = 0` for rays.
    pub fn vrep_split(&self) -> (DMatrix<f64>, DVector<f64>) {
        self.split(RepKind::V)
    }

    fn combined(&self, kind: RepKind) -> DMatrix<f64> {
        self.representation(kind)
            .map_or_else(|| DMatrix::zeros(0, 0), |m| m.to_dmatrix())
    }

    fn split(&self, kind: RepKind) -> (DMatrix<f64>, DVector<f64>) {
        self.representation(kind)
            .map_or_else(|| (DMatrix::zeros(0, 0), DVector::zeros(0)), |m| m.to_split())
    }
}

#[cfg(test)]
mod tests;
