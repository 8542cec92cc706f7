//! The IR arena and its builder API.

use crate::ir::bound::{BoundExpr, Condition};
use crate::ir::ops::{OpId, OpKind, Operation, Position, ValueDef, ValueId, ValueInfo};
use crate::utils::errors::IrError;

/// Arena owning every operation and value of a module.
///
/// Analyses hold [`OpId`]/[`ValueId`] handles into this arena and borrow it
/// for the duration of a query; they never own operations.
#[derive(Debug, Clone, Default)]
pub struct IrContext {
    ops: Vec<Operation>,
    values: Vec<ValueInfo>,
}

impl IrContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations ever created (detached ones included).
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    pub fn op(&self, id: OpId) -> Option<&Operation> {
        self.ops.get(id.index())
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueInfo> {
        self.values.get(id.index())
    }

    /// Display name of a value, or a placeholder for unknown handles.
    pub fn value_name(&self, id: ValueId) -> String {
        self.value(id)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| format!("{}", id))
    }

    pub fn parent(&self, id: OpId) -> Option<Position> {
        self.op(id).and_then(|op| op.parent)
    }

    pub fn parent_op(&self, id: OpId) -> Option<OpId> {
        self.parent(id).map(|p| p.op)
    }

    /// Operations of one region, in program order.
    pub fn region_ops(&self, at: Position) -> &[OpId] {
        self.op(at.op)
            .and_then(|op| op.regions.get(at.region))
            .map(|ops| ops.as_slice())
            .unwrap_or(&[])
    }

    /// Check whether `ancestor` strictly encloses `op`.
    pub fn is_ancestor(&self, ancestor: OpId, op: OpId) -> bool {
        let mut current = self.parent_op(op);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_op(p);
        }
        false
    }

    /// Create a function with one argument per name.
    pub fn create_func(&mut self, name: impl Into<String>, args: &[&str]) -> (OpId, Vec<ValueId>) {
        let func = self.next_op_id();
        self.ops.push(Operation::new(OpKind::Func { name: name.into() }));
        let args = args
            .iter()
            .enumerate()
            .map(|(index, arg)| self.new_value(*arg, ValueDef::Argument { func, index }))
            .collect();
        (func, args)
    }

    /// Append an affine loop; returns the loop and its induction variable.
    pub fn append_for(
        &mut self,
        at: Position,
        iv_name: &str,
        lower: impl Into<BoundExpr>,
        upper: impl Into<BoundExpr>,
        step: i64,
    ) -> Result<(OpId, ValueId), IrError> {
        if step <= 0 {
            return Err(IrError::InvalidStep(step));
        }
        self.check_position(at)?;
        let id = self.next_op_id();
        let iv = self.new_value(iv_name, ValueDef::InductionVar { loop_op: id });
        let kind = OpKind::AffineFor {
            iv,
            lower: lower.into(),
            upper: upper.into(),
            step,
        };
        self.push_op(at, kind)?;
        Ok((id, iv))
    }

    /// Append an affine conditional with the given conjunction of conditions.
    pub fn append_if(&mut self, at: Position, conditions: Vec<Condition>) -> Result<OpId, IrError> {
        self.push_op(at, OpKind::AffineIf { conditions })
    }

    pub fn append_load(
        &mut self,
        at: Position,
        memref: ValueId,
        indices: Vec<BoundExpr>,
        result_name: &str,
    ) -> Result<(OpId, ValueId), IrError> {
        self.check_position(at)?;
        let id = self.next_op_id();
        let result = self.new_value(result_name, ValueDef::OpResult { op: id });
        self.push_op(at, OpKind::AffineLoad { memref, indices, result })?;
        Ok((id, result))
    }

    pub fn append_store(
        &mut self,
        at: Position,
        value: ValueId,
        memref: ValueId,
        indices: Vec<BoundExpr>,
    ) -> Result<OpId, IrError> {
        self.push_op(at, OpKind::AffineStore { value, memref, indices })
    }

    pub fn append_constant(
        &mut self,
        at: Position,
        value: i64,
        result_name: &str,
    ) -> Result<(OpId, ValueId), IrError> {
        self.check_position(at)?;
        let id = self.next_op_id();
        let result = self.new_value(result_name, ValueDef::OpResult { op: id });
        self.push_op(at, OpKind::Constant { value, result })?;
        Ok((id, result))
    }

    pub fn append_compute(
        &mut self,
        at: Position,
        name: &str,
        operands: Vec<ValueId>,
        result_name: &str,
    ) -> Result<(OpId, ValueId), IrError> {
        self.check_position(at)?;
        let id = self.next_op_id();
        let result = self.new_value(result_name, ValueDef::OpResult { op: id });
        let kind = OpKind::Compute { name: name.to_string(), operands, result };
        self.push_op(at, kind)?;
        Ok((id, result))
    }

    /// Unlink an operation from its parent region. The operation and its
    /// nested regions stay in the arena but no longer reach any root.
    pub fn detach(&mut self, id: OpId) -> Result<(), IrError> {
        let parent = self.op(id).ok_or(IrError::UnknownOp(id))?.parent;
        if let Some(pos) = parent {
            if let Some(region) = self.ops[pos.op.index()].regions.get_mut(pos.region) {
                region.retain(|&child| child != id);
            }
            self.ops[id.index()].parent = None;
        }
        Ok(())
    }

    fn next_op_id(&self) -> OpId {
        OpId(self.ops.len() as u32)
    }

    fn new_value(&mut self, name: &str, def: ValueDef) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueInfo { name: name.to_string(), def });
        id
    }

    fn check_position(&self, at: Position) -> Result<(), IrError> {
        let parent = self.op(at.op).ok_or(IrError::UnknownOp(at.op))?;
        if at.region >= parent.regions.len() {
            return Err(IrError::InvalidRegion {
                op: at.op,
                region: at.region,
                available: parent.regions.len(),
            });
        }
        Ok(())
    }

    fn push_op(&mut self, at: Position, kind: OpKind) -> Result<OpId, IrError> {
        self.check_position(at)?;
        let id = self.next_op_id();
        let mut op = Operation::new(kind);
        op.parent = Some(at);
        self.ops.push(op);
        self.ops[at.op.index()].regions[at.region].push(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_nest() {
        let mut ir = IrContext::new();
        let (func, args) = ir.create_func("kernel", &["N", "A"]);
        let (outer, i) = ir.append_for(Position::body(func), "i", 0, args[0], 1).unwrap();
        let (load, v) = ir
            .append_load(Position::body(outer), args[1], vec![i.into()], "v")
            .unwrap();

        assert_eq!(ir.parent_op(outer), Some(func));
        assert_eq!(ir.parent_op(load), Some(outer));
        assert!(ir.is_ancestor(func, load));
        assert!(!ir.is_ancestor(load, func));
        assert_eq!(ir.region_ops(Position::body(outer)), &[load]);
        assert_eq!(ir.value(v).unwrap().def, ValueDef::OpResult { op: load });
        assert_eq!(ir.value(i).unwrap().def, ValueDef::InductionVar { loop_op: outer });
        assert_eq!(ir.value_name(args[0]), "N");
    }

    #[test]
    fn test_invalid_positions() {
        let mut ir = IrContext::new();
        let (func, args) = ir.create_func("f", &["A"]);
        let (_, c) = ir.append_constant(Position::body(func), 1, "c").unwrap();
        let store = ir.append_store(Position::body(func), c, args[0], vec![]).unwrap();

        let err = ir.append_if(Position::body(store), vec![]).unwrap_err();
        assert!(matches!(err, IrError::InvalidRegion { available: 0, .. }));

        let err = ir.append_for(Position::body(func), "i", 0, 10, 0).unwrap_err();
        assert!(matches!(err, IrError::InvalidStep(0)));

        let err = ir.append_if(Position::body(OpId(99)), vec![]).unwrap_err();
        assert!(matches!(err, IrError::UnknownOp(OpId(99))));
    }

    #[test]
    fn test_failed_append_leaves_arena_untouched() {
        let mut ir = IrContext::new();
        let (func, _) = ir.create_func("f", &[]);
        let before = ir.num_ops();
        assert!(ir.append_load(Position::new(func, 3), ValueId(0), vec![], "x").is_err());
        assert_eq!(ir.num_ops(), before);
        assert!(ir.value(ValueId(0)).is_none());
    }

    #[test]
    fn test_detach() {
        let mut ir = IrContext::new();
        let (func, _) = ir.create_func("f", &[]);
        let (lp, _) = ir.append_for(Position::body(func), "i", 0, 4, 1).unwrap();
        ir.detach(lp).unwrap();
        assert_eq!(ir.parent(lp), None);
        assert!(ir.region_ops(Position::body(func)).is_empty());
        // Detaching twice is a no-op.
        ir.detach(lp).unwrap();
    }
}
