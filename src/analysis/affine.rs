//! Lowering of bound expressions into affine expressions.
//!
//! A value used in a bound is one of:
//! - the induction variable of an enclosing loop (a set dimension)
//! - a constant (folded)
//! - a symbol: a value defined outside the analysis root, or directly in the
//!   root's region (a parameter, added on first use)
//!
//! Anything else, and any product of two non-constant terms, is not affine.

use crate::analysis::scope::AnalysisScope;
use crate::ir::{BoundExpr, OpId, OpKind, ValueDef, ValueId};
use crate::polyhedral::{AffineExpr, IntegerSet};
use crate::utils::errors::{StmtError, StmtErrorKind};

/// Which side of a loop a bound sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    /// Lower bounds take the maximum of their terms
    Lower,
    /// Upper bounds (exclusive) take the minimum of their terms
    Upper,
}

/// What a value turns into inside a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Dim(usize),
    Symbol(ValueId),
    Const(i64),
}

/// Bound-expression lowering against one analysis scope.
pub struct AffineLowering<'s, 'ir> {
    scope: &'s AnalysisScope<'ir>,
}

impl<'s, 'ir> AffineLowering<'s, 'ir> {
    pub fn new(scope: &'s AnalysisScope<'ir>) -> Self {
        Self { scope }
    }

    /// Lower an expression over the columns of `set`. Symbols not yet in the
    /// set are added as parameters.
    pub fn lower(&self, expr: &BoundExpr, set: &mut IntegerSet) -> Result<AffineExpr, StmtError> {
        let mut out = self.lower_rec(expr, set)?;
        out.resize(set.dim(), set.n_param());
        Ok(out)
    }

    /// Lower the terms of a loop bound. A `Max` lower bound or a `Min` upper
    /// bound yields one expression per term; any other bound yields one.
    pub fn bound_terms(
        &self,
        expr: &BoundExpr,
        side: BoundSide,
        set: &mut IntegerSet,
    ) -> Result<Vec<AffineExpr>, StmtError> {
        let terms: Vec<&BoundExpr> = match (side, expr) {
            (BoundSide::Lower, BoundExpr::Max(terms)) | (BoundSide::Upper, BoundExpr::Min(terms)) => {
                if terms.is_empty() {
                    return Err(StmtError::new(StmtErrorKind::NonAffineBound, "empty min/max bound"));
                }
                terms.iter().collect()
            }
            _ => vec![expr],
        };

        let mut lowered = Vec::with_capacity(terms.len());
        for term in terms {
            lowered.push(self.lower_rec(term, set)?);
        }
        for e in &mut lowered {
            e.resize(set.dim(), set.n_param());
        }
        Ok(lowered)
    }

    fn lower_rec(&self, expr: &BoundExpr, set: &mut IntegerSet) -> Result<AffineExpr, StmtError> {
        let (n_dim, n_param) = (set.dim(), set.n_param());
        match expr {
            BoundExpr::Const(c) => Ok(AffineExpr::constant(*c, n_dim, n_param)),

            BoundExpr::Value(v) => match self.classify(*v, set)? {
                Operand::Dim(d) => Ok(AffineExpr::var(d, n_dim, n_param)),
                Operand::Const(c) => Ok(AffineExpr::constant(c, n_dim, n_param)),
                Operand::Symbol(v) => {
                    let name = self.scope.ir().value_name(v);
                    let p = set.add_param(v, name);
                    Ok(AffineExpr::param(p, set.dim(), set.n_param()))
                }
            },

            BoundExpr::Add(l, r) => {
                let l = self.lower_rec(l, set)?;
                Ok(l + self.lower_rec(r, set)?)
            }

            BoundExpr::Sub(l, r) => {
                let l = self.lower_rec(l, set)?;
                Ok(l - self.lower_rec(r, set)?)
            }

            BoundExpr::Mul(l, r) => {
                let l = self.lower_rec(l, set)?;
                let r = self.lower_rec(r, set)?;
                // One side must be constant for affine
                if let Some(c) = l.as_constant() {
                    Ok(r.scale(c))
                } else if let Some(c) = r.as_constant() {
                    Ok(l.scale(c))
                } else {
                    Err(StmtError::new(
                        StmtErrorKind::NonAffineBound,
                        format!("non-affine multiplication in {}", expr),
                    ))
                }
            }

            BoundExpr::Neg(e) => Ok(-self.lower_rec(e, set)?),

            BoundExpr::Min(_) | BoundExpr::Max(_) => Err(StmtError::new(
                StmtErrorKind::NonAffineBound,
                format!("min/max is only allowed as a whole loop bound: {}", expr),
            )),
        }
    }

    fn classify(&self, v: ValueId, set: &IntegerSet) -> Result<Operand, StmtError> {
        if let Some(d) = set.find_dim(v) {
            return Ok(Operand::Dim(d));
        }
        let ir = self.scope.ir();
        let info = ir.value(v).ok_or_else(|| {
            StmtError::new(StmtErrorKind::UnknownValue, format!("unknown value {}", v))
        })?;
        match info.def {
            ValueDef::Argument { .. } => Ok(Operand::Symbol(v)),
            ValueDef::InductionVar { loop_op } => {
                if self.is_outside_root(loop_op) {
                    Ok(Operand::Symbol(v))
                } else {
                    Err(StmtError::new(
                        StmtErrorKind::InvalidInductionVar,
                        format!("induction variable {} used outside its loop", info.name),
                    )
                    .with_op(loop_op))
                }
            }
            ValueDef::OpResult { op } => {
                if let Some(OpKind::Constant { value, .. }) = ir.op(op).map(|o| &o.kind) {
                    Ok(Operand::Const(*value))
                } else if self.is_outside_root(op) || ir.parent_op(op) == Some(self.scope.root()) {
                    Ok(Operand::Symbol(v))
                } else {
                    Err(StmtError::new(
                        StmtErrorKind::NonAffineBound,
                        format!("{} is defined inside the analyzed region and is not a valid symbol", info.name),
                    )
                    .with_op(op))
                }
            }
        }
    }

    /// The root itself counts as outside: its values are fixed for the region.
    fn is_outside_root(&self, op: OpId) -> bool {
        let root = self.scope.root();
        op == root || !self.scope.ir().is_ancestor(root, op)
    }
}
