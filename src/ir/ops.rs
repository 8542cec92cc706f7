//! Operations and values of the structured IR.
//!
//! Operations live in an [`IrContext`](crate::ir::IrContext) arena and are
//! referred to by [`OpId`] handles. The set of operation kinds is closed:
//! classification is a match on [`OpKind`], never a runtime type check.

use crate::ir::bound::{BoundExpr, Condition};
use serde::{Serialize, Deserialize};
use std::fmt;

/// Handle to an operation in an IR arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpId(pub u32);

impl OpId {
    pub fn index(self) -> usize { self.0 as usize }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// Handle to an SSA value in an IR arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl ValueId {
    pub fn index(self) -> usize { self.0 as usize }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A region of an operation: the insertion point for new operations and the
/// parent link of existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub op: OpId,
    pub region: usize,
}

impl Position {
    pub fn new(op: OpId, region: usize) -> Self {
        Self { op, region }
    }

    /// The body of a function or loop.
    pub fn body(op: OpId) -> Self {
        Self::new(op, 0)
    }

    /// The then-region of a conditional.
    pub fn then_of(op: OpId) -> Self {
        Self::new(op, 0)
    }

    /// The else-region of a conditional.
    pub fn else_of(op: OpId) -> Self {
        Self::new(op, 1)
    }
}

/// The closed set of operation kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// A function; its body is the usual analysis root.
    Func { name: String },

    /// Affine loop over `[max(lower), min(upper))` with a constant positive step.
    AffineFor {
        iv: ValueId,
        lower: BoundExpr,
        upper: BoundExpr,
        step: i64,
    },

    /// Affine conditional; the then-region runs when every condition holds.
    AffineIf { conditions: Vec<Condition> },

    /// Memory read.
    AffineLoad {
        memref: ValueId,
        indices: Vec<BoundExpr>,
        result: ValueId,
    },

    /// Memory write.
    AffineStore {
        value: ValueId,
        memref: ValueId,
        indices: Vec<BoundExpr>,
    },

    /// Integer constant.
    Constant { value: i64, result: ValueId },

    /// Any other side-effect-free computation (arith.addf, arith.mulf, ...).
    Compute {
        name: String,
        operands: Vec<ValueId>,
        result: ValueId,
    },
}

impl OpKind {
    /// Dialect-qualified operation name.
    pub fn name(&self) -> &str {
        match self {
            OpKind::Func { .. } => "func.func",
            OpKind::AffineFor { .. } => "affine.for",
            OpKind::AffineIf { .. } => "affine.if",
            OpKind::AffineLoad { .. } => "affine.load",
            OpKind::AffineStore { .. } => "affine.store",
            OpKind::Constant { .. } => "arith.constant",
            OpKind::Compute { name, .. } => name,
        }
    }

    pub fn is_store(&self) -> bool {
        matches!(self, OpKind::AffineStore { .. })
    }

    pub fn is_load(&self) -> bool {
        matches!(self, OpKind::AffineLoad { .. })
    }

    pub fn is_affine_loop(&self) -> bool {
        matches!(self, OpKind::AffineFor { .. })
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, OpKind::AffineIf { .. })
    }

    /// Loops and conditionals: the operations that shape an iteration domain.
    pub fn is_control_flow(&self) -> bool {
        self.is_affine_loop() || self.is_conditional()
    }

    /// Number of single-block regions the operation owns.
    pub fn num_regions(&self) -> usize {
        match self {
            OpKind::Func { .. } | OpKind::AffineFor { .. } => 1,
            OpKind::AffineIf { .. } => 2,
            _ => 0,
        }
    }

    /// The value produced by the operation, if any.
    pub fn result(&self) -> Option<ValueId> {
        match self {
            OpKind::AffineLoad { result, .. }
            | OpKind::Constant { result, .. }
            | OpKind::Compute { result, .. } => Some(*result),
            _ => None,
        }
    }
}

/// An operation in the arena.
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OpKind,
    /// Enclosing region; `None` for roots and detached operations.
    pub parent: Option<Position>,
    /// Child operations, one list per region.
    pub regions: Vec<Vec<OpId>>,
}

impl Operation {
    pub(crate) fn new(kind: OpKind) -> Self {
        let regions = vec![Vec::new(); kind.num_regions()];
        Self { kind, parent: None, regions }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }
}

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueDef {
    /// Function argument.
    Argument { func: OpId, index: usize },
    /// Induction variable of an affine loop.
    InductionVar { loop_op: OpId },
    /// Result of an operation.
    OpResult { op: OpId },
}

/// An SSA value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueInfo {
    pub name: String,
    pub def: ValueDef,
}
