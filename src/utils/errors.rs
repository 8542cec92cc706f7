//! Error types for statement construction and domain queries.
//!
//! Failures are grouped the way callers act on them: a statement that breaks
//! the single-store invariant, a statement whose enclosing context cannot be
//! resolved, and a statement whose bounds are not affine.

use thiserror::Error;
use crate::ir::OpId;
use std::fmt;

/// Top-level error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolyStmtError {
    /// Error while building IR
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Error while populating or querying a statement
    #[error("Statement error: {0}")]
    Stmt(#[from] StmtError),
}

/// Misuse of the IR builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("unknown operation {0}")]
    UnknownOp(OpId),

    #[error("{op} has {available} region(s), no region {region}")]
    InvalidRegion { op: OpId, region: usize, available: usize },

    #[error("loop step must be positive, got {0}")]
    InvalidStep(i64),
}

/// Error raised by a statement operation set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct StmtError {
    /// The error message
    pub message: String,
    /// The kind of statement error
    pub kind: StmtErrorKind,
    /// The operation the error is about (if any)
    pub op: Option<OpId>,
}

impl StmtError {
    pub fn new(kind: StmtErrorKind, message: impl Into<String>) -> Self {
        Self { message: message.into(), kind, op: None }
    }

    pub fn with_op(mut self, op: OpId) -> Self {
        self.op = Some(op);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for StmtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = self.op {
            write!(f, "{} at {}", self.message, op)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtErrorKind {
    /// A second, distinct store was inserted
    SecondStore,
    /// No operations to derive a context from
    EmptySet,
    /// Handle does not name an operation of the IR
    UnknownOp,
    /// Handle does not name a value of the IR
    UnknownValue,
    /// Parent chain ends before reaching the analysis root
    DetachedOp,
    /// Members sit in loop nests that cannot share induction variables
    IrreconcilableContexts,
    /// Member is outside every loop and conditional
    NoEnclosingContext,
    /// Induction variable used outside the loop that defines it
    InvalidInductionVar,
    /// Bound or condition is not an affine expression
    NonAffineBound,
    /// Else-region of a condition set that has no convex complement
    NonConvexCondition,
}

/// The three failure classes a caller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Statement would map to more than one write
    InvariantViolation,
    /// Enclosing structure is missing or inconsistent
    MalformedContext,
    /// Domain cannot be expressed with affine constraints
    NonAffineBound,
}

impl StmtErrorKind {
    pub fn category(self) -> ErrorCategory {
        match self {
            StmtErrorKind::SecondStore => ErrorCategory::InvariantViolation,
            StmtErrorKind::EmptySet
            | StmtErrorKind::UnknownOp
            | StmtErrorKind::UnknownValue
            | StmtErrorKind::DetachedOp
            | StmtErrorKind::IrreconcilableContexts
            | StmtErrorKind::NoEnclosingContext
            | StmtErrorKind::InvalidInductionVar => ErrorCategory::MalformedContext,
            StmtErrorKind::NonAffineBound
            | StmtErrorKind::NonConvexCondition => ErrorCategory::NonAffineBound,
        }
    }
}

/// Result type using PolyStmtError.
pub type PolyResult<T> = Result<T, PolyStmtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StmtError::new(StmtErrorKind::SecondStore, "statement already has a store")
            .with_op(OpId(4));
        assert_eq!(format!("{}", err), "statement already has a store at op4");
        assert_eq!(err.category(), ErrorCategory::InvariantViolation);

        let top: PolyStmtError = err.into();
        assert!(format!("{}", top).starts_with("Statement error:"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(StmtErrorKind::DetachedOp.category(), ErrorCategory::MalformedContext);
        assert_eq!(StmtErrorKind::NonConvexCondition.category(), ErrorCategory::NonAffineBound);
        let ir: PolyStmtError = IrError::InvalidStep(0).into();
        assert_eq!(format!("{}", ir), "IR error: loop step must be positive, got 0");
    }
}
