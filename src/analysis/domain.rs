//! Index-set construction for one operation.
//!
//! Walks an enclosing chain outermost first. Every affine loop contributes a
//! dimension bounded by its lower and upper bounds (and a stride for
//! non-unit steps); every conditional contributes its condition rows.

use crate::analysis::affine::{AffineLowering, BoundSide};
use crate::analysis::enclosing::EnclosingOp;
use crate::analysis::scope::AnalysisScope;
use crate::ir::{BoundExpr, Condition, ConditionKind, OpId, OpKind, ValueId};
use crate::polyhedral::{AffineExpr, Constraint, IntegerSet};
use crate::utils::errors::{StmtError, StmtErrorKind};

/// Build the iteration domain implied by `chain`.
pub fn build_index_set(scope: &AnalysisScope<'_>, chain: &[EnclosingOp]) -> Result<IntegerSet, StmtError> {
    let lowering = AffineLowering::new(scope);
    let mut set = IntegerSet::universe();

    for entry in chain {
        let op = scope.ir().op(entry.op).ok_or_else(|| {
            StmtError::new(StmtErrorKind::UnknownOp, "enclosing operation is not part of the IR").with_op(entry.op)
        })?;
        match &op.kind {
            OpKind::AffineFor { iv, lower, upper, step } => {
                let bounds = LoopBounds { iv: *iv, lower, upper, step: *step };
                add_loop(scope, &lowering, &mut set, entry.op, &bounds)
                    .map_err(|e| attach_op(e, entry.op))?;
            }
            OpKind::AffineIf { conditions } => {
                add_conditions(scope, &lowering, &mut set, conditions, entry.region)
                    .map_err(|e| attach_op(e, entry.op))?;
            }
            _ => {}
        }
    }

    Ok(set)
}

struct LoopBounds<'a> {
    iv: ValueId,
    lower: &'a BoundExpr,
    upper: &'a BoundExpr,
    step: i64,
}

fn attach_op(err: StmtError, op: OpId) -> StmtError {
    if err.op.is_some() { err } else { err.with_op(op) }
}

fn add_loop(
    scope: &AnalysisScope<'_>,
    lowering: &AffineLowering<'_, '_>,
    set: &mut IntegerSet,
    loop_op: OpId,
    bounds: &LoopBounds<'_>,
) -> Result<(), StmtError> {
    let lbs = lowering.bound_terms(bounds.lower, BoundSide::Lower, set)?;
    let ubs = lowering.bound_terms(bounds.upper, BoundSide::Upper, set)?;

    let d = set.add_dim(bounds.iv, scope.ir().value_name(bounds.iv));
    let iv = AffineExpr::var(d, set.dim(), set.n_param());

    // iv >= lb for every lower term, iv < ub for every upper term
    for lb in &lbs {
        set.add_constraint(Constraint::ge(iv.clone(), lb.clone()));
    }
    for ub in &ubs {
        set.add_constraint(Constraint::lt(iv.clone(), ub.clone()));
    }

    if bounds.step != 1 {
        match lbs.as_slice() {
            [lb] if scope.config().model_strides => {
                set.add_constraint(Constraint::stride(iv - lb.clone(), bounds.step));
            }
            _ => log::debug!(
                "{}: dropping step {} from the domain (over-approximation)",
                loop_op, bounds.step
            ),
        }
    }
    Ok(())
}

fn add_conditions(
    scope: &AnalysisScope<'_>,
    lowering: &AffineLowering<'_, '_>,
    set: &mut IntegerSet,
    conditions: &[Condition],
    region: usize,
) -> Result<(), StmtError> {
    let mut rows = Vec::with_capacity(conditions.len());
    for cond in conditions {
        let expr = lowering.lower(&cond.expr, set)?;
        rows.push(match cond.kind {
            ConditionKind::NonNegative => Constraint::ge_zero(expr),
            ConditionKind::Zero => Constraint::eq_zero(expr),
        });
    }

    if region == 0 {
        set.add_constraints(rows);
        return Ok(());
    }

    if !scope.config().negate_else_conditions {
        log::debug!("else-region: condition rows left out of the domain");
        return Ok(());
    }
    match rows.as_slice() {
        // The else-region of an always-true condition never runs.
        [] => {
            set.add_constraint(Constraint::ge_zero(AffineExpr::constant(-1, set.dim(), set.n_param())));
            Ok(())
        }
        [row] => match row.negate() {
            Some(neg) => {
                set.add_constraint(neg);
                Ok(())
            }
            None => Err(StmtError::new(
                StmtErrorKind::NonConvexCondition,
                "else-region of an equality condition is not convex",
            )),
        },
        _ => Err(StmtError::new(
            StmtErrorKind::NonConvexCondition,
            format!("else-region of a {}-constraint condition is not convex", rows.len()),
        )),
    }
}
