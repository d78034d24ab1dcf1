//! Double-description engine for homogeneous cones `{y : M y >= 0}`.
//!
//! Purpose
//! - Enumerate extreme rays and a lineality basis of a polyhedral cone given by
//!   inequality rows. Both conversion directions reduce to this: H→V runs on
//!   the homogenized inequalities, V→H runs on the generators (polar cone).
//!
//! Layout
//! - `basis`: rank, initial simplicial cone and lineality space.
//! - `cone`: incremental halfspace insertion with combinatorial adjacency.
//! - `order`: row processing orders.
//! - `zero`: bitset zero sets.
//!
//! References
//! - Fukuda, Prodon: "Double description method revisited" (1996).
//! - Motzkin, Raiffa, Thompson, Thrall: "The double description method" (1953).

mod basis;
mod cone;
mod order;
mod zero;

pub(crate) use cone::{enumerate, Ray};
pub use order::RowOrder;
