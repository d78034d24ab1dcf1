//! Double-description conversion between H- and V-representations of convex polyhedra.
//!
//! Overview
//! - `matrix`: combined-form matrices and the one sign convention (`[b | -A]`, `[t | V]`).
//! - `kernel`: numeric strategies (`Float` with tolerances, `Exact` rationals).
//! - `dd`: the cone engine; `dual`: modes and output assembly on top of it.
//! - `context`: explicit shared numeric context with leases.
//! - `polyhedron`: the user-facing object; `worker`: timeout wrapper.
//! - `verify`: sign-convention and representation comparison helpers.
//!
//! API Policy
//! - The curated surface is `api` and `prelude`. Module paths may move.

pub mod api;
pub mod cfg;
pub mod context;
pub mod dd;
pub mod dual;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod polyhedron;
mod redundancy;
pub mod verify;
pub mod worker;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{DdCfg, Redundancy};
pub use error::{ConversionError, DdError, StructuralError};
pub use nalgebra::{DMatrix, DVector};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{DdCfg, Redundancy};
    pub use crate::context::{ContextLease, NumericContext};
    pub use crate::dd::RowOrder;
    pub use crate::dual::DualResult;
    pub use crate::error::{ConversionError, DdError, StructuralError};
    pub use crate::kernel::{Exact, Float, Kernel};
    pub use crate::matrix::{RepKind, RepMatrix};
    pub use crate::polyhedron::Polyhedron;
    pub use nalgebra::{DMatrix, DVector};
}
