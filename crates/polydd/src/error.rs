//! Error taxonomy: structural (rejected before the engine runs), conversion
//! (engine could not produce a dual), and worker-level failures.

use std::time::Duration;

use thiserror::Error;

/// Malformed input. Raised before any engine work; callers' state is untouched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StructuralError {
    #[error("input has no rows")]
    NoRows,
    #[error("input has no columns")]
    NoColumns,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("entry ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
    #[error("row {row} has indicator {value}; V-form rows need 0 (ray) or 1 (point)")]
    BadIndicator { row: usize, value: f64 },
    #[error("coefficient matrix has {rows} rows but the leading vector has {len} entries")]
    SplitMismatch { rows: usize, len: usize },
}

/// The engine ran but could not produce a trustworthy dual representation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("initial basis matrix is singular under the active tolerance")]
    SingularBasis,
    #[error("combining adjacent rays on row {row} collapsed to the zero vector")]
    DegenerateCombination { row: usize },
    #[error("non-finite value produced while processing row {row}")]
    NonFinite { row: usize },
    #[error("ray count {count} exceeded the configured limit {limit}")]
    RayLimit { count: usize, limit: usize },
    #[error("generator {output} violates input row {input} (residual {residual:e})")]
    Inconsistent {
        output: usize,
        input: usize,
        residual: f64,
    },
}

/// Top-level error returned by every fallible operation of the crate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DdError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
    #[error("conversion did not finish within {0:?}")]
    Timeout(Duration),
    #[error("conversion worker stopped without reporting a result")]
    WorkerLost,
}

impl DdError {
    #[inline]
    pub fn is_structural(&self) -> bool {
        matches!(self, DdError::Structural(_))
    }
    #[inline]
    pub fn is_conversion(&self) -> bool {
        matches!(self, DdError::Conversion(_))
    }
}
