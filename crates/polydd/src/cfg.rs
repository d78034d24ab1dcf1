//! Tolerance defaults and the conversion configuration.
//!
//! Policy
//! - Float sign tests are absolute, applied to rows and rays that the engine
//!   keeps max-abs normalized, so the tolerance acts relative to row scale.
//! - Representation comparison (see `verify`) is per-coordinate absolute after
//!   canonical row scaling.

use serde::{Deserialize, Serialize};

use crate::dd::RowOrder;

/// Zero tolerance for float sign tests inside the engine.
pub const FLOAT_EPS: f64 = 1e-9;
/// Slack allowed when verifying outputs against inputs (float kernel).
pub const VERIFY_EPS: f64 = 1e-7;
/// Per-coordinate tolerance for comparing two representations.
pub const COMPARE_EPS: f64 = 1e-5;

/// Secondary redundancy pass applied to the engine output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redundancy {
    /// Emit every generator the engine produced.
    Keep,
    /// Drop rows equal to an earlier row up to positive scaling.
    #[default]
    RemoveDuplicates,
}

/// Conversion configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdCfg {
    /// Order in which input rows enter the initial basis and the DD loop.
    pub row_order: RowOrder,
    pub redundancy: Redundancy,
    /// Check every output generator against every input row after conversion.
    pub verify: bool,
    /// Abort with a conversion error once the intermediate ray set grows past this.
    pub max_rays: Option<usize>,
}

impl Default for DdCfg {
    fn default() -> Self {
        Self {
            row_order: RowOrder::MinIndex,
            redundancy: Redundancy::RemoveDuplicates,
            verify: true,
            max_rays: None,
        }
    }
}
