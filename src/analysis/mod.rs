//! Statement analysis.
//!
//! - `scope`: the analysis boundary queries are resolved against
//! - `enclosing`: loops and conditionals around an operation
//! - `affine`: bound expressions to affine expressions
//! - `domain`: per-operation index sets
//! - `stmt`: the statement operation set

pub mod scope;
pub mod enclosing;
pub mod affine;
pub mod domain;
pub mod stmt;

pub use scope::AnalysisScope;
pub use enclosing::{EnclosingOp, enclosing_chain, common_prefix};
pub use affine::{AffineLowering, BoundSide};
pub use domain::build_index_set;
pub use stmt::ScopStmtOpSet;
