//! # PolyStmt - Polyhedral Statement Operation Sets
//!
//! Groups IR operations into polyhedral statements and derives what the
//! polyhedral model needs from them:
//! - Membership with at most one store per statement
//! - The loops and conditionals every member shares
//! - The iteration domain the statement executes under
//!
//! ## Architecture
//!
//! ```text
//! IR (ops, bounds) → Enclosing chains → Affine lowering → Index sets → Statement domain
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use polystmt::prelude::*;
//!
//! let mut ir = IrContext::new();
//! let (func, args) = ir.create_func("copy", &["N", "A", "B"]);
//! let (body, i) = ir.append_for(Position::body(func), "i", 0, args[0], 1)?;
//! let (load, v) = ir.append_load(Position::body(body), args[1], vec![i.into()], "v")?;
//! let store = ir.append_store(Position::body(body), v, args[2], vec![i.into()])?;
//!
//! let mut stmt = ScopStmtOpSet::new();
//! stmt.insert(&ir, load)?;
//! stmt.insert(&ir, store)?;
//!
//! let scope = AnalysisScope::new(&ir, func)?;
//! let domain = stmt.domain(&scope)?;
//! assert_eq!(domain.to_string(), "[N] -> { [i] : i >= 0 and -i + N - 1 >= 0 }");
//! ```

#![warn(clippy::all)]

pub mod ir;
pub mod polyhedral;
pub mod analysis;
pub mod utils;

use serde::{Serialize, Deserialize};

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::ir::{
        IrContext, OpId, ValueId, Position, OpKind, BoundExpr, Condition, ConditionKind,
    };
    pub use crate::polyhedral::{
        AffineExpr, Constraint, ConstraintKind, IntegerSet, Space,
    };
    pub use crate::analysis::{AnalysisScope, EnclosingOp, ScopStmtOpSet};
    pub use crate::utils::errors::*;
    pub use crate::DomainConfig;
}

/// Configuration for domain construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Accept members that sit directly in the analysis root; they
    /// contribute a zero-dimensional domain
    pub allow_top_level_members: bool,
    /// Emit stride rows for loops with a non-unit step
    pub model_strides: bool,
    /// Constrain else-region members by the negated condition; when off,
    /// the condition is left out of their domain
    pub negate_else_conditions: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            allow_top_level_members: false,
            model_strides: true,
            negate_else_conditions: true,
        }
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
