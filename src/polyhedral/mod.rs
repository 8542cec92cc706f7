//! Polyhedral data structures.
//!
//! This module provides the constraint-system side of the analysis:
//! - Value-identified spaces
//! - Affine expressions and constraints
//! - Integer sets used as iteration domains

pub mod space;
pub mod expr;
pub mod constraint;
pub mod set;

pub use space::Space;
pub use expr::AffineExpr;
pub use constraint::{Constraint, ConstraintKind, ConstraintSystem};
pub use set::IntegerSet;
