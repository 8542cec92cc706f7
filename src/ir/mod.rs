//! Structured intermediate representation.
//!
//! A small arena-based IR with affine loops, conditionals, loads and stores:
//! - `ops`: handles, operation kinds and values
//! - `bound`: bound and condition expressions
//! - `context`: the arena and its builder API

pub mod ops;
pub mod bound;
pub mod context;

pub use ops::{OpId, ValueId, Position, OpKind, Operation, ValueDef, ValueInfo};
pub use bound::{BoundExpr, Condition, ConditionKind};
pub use context::IrContext;
