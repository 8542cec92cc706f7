//! Enclosing control-flow resolution.
//!
//! An operation's enclosing chain is the list of loops and conditionals that
//! lexically contain it, outermost first, up to (not including) the analysis
//! root. Each entry remembers the region the walk came through, so the then-
//! and else-regions of one conditional are different contexts.

use crate::analysis::scope::AnalysisScope;
use crate::ir::OpId;
use crate::utils::errors::{StmtError, StmtErrorKind};

/// One control-flow ancestor together with the region containing the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnclosingOp {
    pub op: OpId,
    pub region: usize,
}

/// Walk from `op` up to the analysis root, collecting loops and conditionals.
pub fn enclosing_chain(scope: &AnalysisScope<'_>, op: OpId) -> Result<Vec<EnclosingOp>, StmtError> {
    let ir = scope.ir();
    let root = scope.root();
    let start = ir.op(op).ok_or_else(|| {
        StmtError::new(StmtErrorKind::UnknownOp, "operation is not part of the IR").with_op(op)
    })?;
    if op == root {
        return Err(StmtError::new(StmtErrorKind::DetachedOp, "the analysis root cannot be a statement member")
            .with_op(op));
    }

    let mut chain: Vec<EnclosingOp> = Vec::new();
    let mut parent = start.parent;
    while let Some(pos) = parent {
        if pos.op == root {
            chain.reverse();
            log::trace!("{} enclosed by {:?}", op, chain.iter().map(|e| e.op).collect::<Vec<_>>());
            return Ok(chain);
        }
        let ancestor = ir.op(pos.op).ok_or_else(|| {
            StmtError::new(StmtErrorKind::UnknownOp, "parent is not part of the IR").with_op(pos.op)
        })?;
        if ancestor.kind.is_control_flow() {
            chain.push(EnclosingOp { op: pos.op, region: pos.region });
        }
        parent = ancestor.parent;
    }

    Err(StmtError::new(
        StmtErrorKind::DetachedOp,
        format!("parent chain does not reach the analysis root {}", root),
    )
    .with_op(op))
}

/// Longest prefix shared by every chain.
pub fn common_prefix(chains: &[Vec<EnclosingOp>]) -> Vec<EnclosingOp> {
    let Some((first, rest)) = chains.split_first() else {
        return Vec::new();
    };
    let len = rest.iter().fold(first.len(), |len, chain| {
        first.iter().zip(chain).take(len).take_while(|(a, b)| a == b).count()
    });
    first[..len].to_vec()
}

/// Check that `chain` is a prefix of `longest`.
pub fn is_prefix_of(chain: &[EnclosingOp], longest: &[EnclosingOp]) -> bool {
    chain.len() <= longest.len() && chain.iter().zip(longest).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Condition, IrContext, Position};

    #[test]
    fn test_chain_skips_non_control_flow() {
        let mut ir = IrContext::new();
        let (func, args) = ir.create_func("f", &["N", "A"]);
        let (li, i) = ir.append_for(Position::body(func), "i", 0, args[0], 1).unwrap();
        let cond = ir.append_if(Position::body(li), vec![Condition::ge(i, 1)]).unwrap();
        let (_, v) = ir.append_load(Position::else_of(cond), args[1], vec![i.into()], "v").unwrap();
        let store = ir.append_store(Position::else_of(cond), v, args[1], vec![i.into()]).unwrap();

        let scope = AnalysisScope::new(&ir, func).unwrap();
        let chain = enclosing_chain(&scope, store).unwrap();
        assert_eq!(chain, vec![
            EnclosingOp { op: li, region: 0 },
            EnclosingOp { op: cond, region: 1 },
        ]);
        assert!(enclosing_chain(&scope, li).unwrap().is_empty());
    }

    #[test]
    fn test_chain_stops_at_inner_root() {
        let mut ir = IrContext::new();
        let (func, _) = ir.create_func("f", &[]);
        let (li, _) = ir.append_for(Position::body(func), "i", 0, 8, 1).unwrap();
        let (lj, _) = ir.append_for(Position::body(li), "j", 0, 8, 1).unwrap();
        let (op, _) = ir.append_constant(Position::body(lj), 0, "c").unwrap();

        let scope = AnalysisScope::new(&ir, li).unwrap();
        let chain = enclosing_chain(&scope, op).unwrap();
        assert_eq!(chain, vec![EnclosingOp { op: lj, region: 0 }]);
    }

    #[test]
    fn test_detached_and_unknown() {
        let mut ir = IrContext::new();
        let (func, _) = ir.create_func("f", &[]);
        let (li, _) = ir.append_for(Position::body(func), "i", 0, 8, 1).unwrap();
        let (op, _) = ir.append_constant(Position::body(li), 0, "c").unwrap();
        ir.detach(li).unwrap();

        let scope = AnalysisScope::new(&ir, func).unwrap();
        let err = enclosing_chain(&scope, op).unwrap_err();
        assert_eq!(err.kind, StmtErrorKind::DetachedOp);
        assert_eq!(err.op, Some(op));

        let err = enclosing_chain(&scope, OpId(42)).unwrap_err();
        assert_eq!(err.kind, StmtErrorKind::UnknownOp);

        let err = enclosing_chain(&scope, func).unwrap_err();
        assert_eq!(err.kind, StmtErrorKind::DetachedOp);
    }

    #[test]
    fn test_common_prefix() {
        let a = EnclosingOp { op: OpId(1), region: 0 };
        let b = EnclosingOp { op: OpId(2), region: 0 };
        let c = EnclosingOp { op: OpId(3), region: 0 };
        let else_c = EnclosingOp { op: OpId(3), region: 1 };

        assert_eq!(common_prefix(&[vec![a, b], vec![a]]), vec![a]);
        assert_eq!(common_prefix(&[vec![a, b, c], vec![a, b, c]]), vec![a, b, c]);
        assert_eq!(common_prefix(&[vec![a, c], vec![a, else_c]]), vec![a]);
        assert!(common_prefix(&[vec![b], vec![a]]).is_empty());
        assert!(common_prefix(&[]).is_empty());

        assert!(is_prefix_of(&[a], &[a, b]));
        assert!(!is_prefix_of(&[a, c], &[a, b]));
        assert!(!is_prefix_of(&[a, b, c], &[a, b]));
    }
}
