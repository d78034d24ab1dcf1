//! Curated API surface.
//!
//! Prefer these re-exports over deep module paths; internals may be
//! reorganized without notice.

// Data model
pub use crate::matrix::{RepKind, RepMatrix};
// Numeric kernels
pub use crate::kernel::{Exact, Float, Kernel, Scalar, Sign};
// Configuration
pub use crate::cfg::{DdCfg, Redundancy, COMPARE_EPS, FLOAT_EPS, VERIFY_EPS};
pub use crate::dd::RowOrder;
// Conversion
pub use crate::context::{ContextLease, NumericContext};
pub use crate::dual::DualResult;
pub use crate::polyhedron::Polyhedron;
pub use crate::worker::convert_with_timeout;
// Checks
pub use crate::verify::{canonical_row, check_sign_convention, same_rows, same_rows_up_to_scaling};
// Errors
pub use crate::error::{ConversionError, DdError, StructuralError};
