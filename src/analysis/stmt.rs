//! Operation sets forming one polyhedral statement.
//!
//! A statement is an ordered, duplicate-free group of operations (typically
//! the loads feeding one store) that the polyhedral model treats as a single
//! unit. The set can report the control flow its members share and the
//! iteration domain they execute under.

use crate::analysis::domain::build_index_set;
use crate::analysis::enclosing::{common_prefix, enclosing_chain, is_prefix_of, EnclosingOp};
use crate::analysis::scope::AnalysisScope;
use crate::ir::{IrContext, OpId};
use crate::polyhedral::IntegerSet;
use crate::utils::errors::{StmtError, StmtErrorKind};
use indexmap::IndexSet;

/// The operations of one polyhedral statement, in insertion order.
///
/// At most one member is a store; that store is the statement's write target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopStmtOpSet {
    ops: IndexSet<OpId>,
    store: Option<OpId>,
}

impl ScopStmtOpSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an operation.
    ///
    /// Returns `Ok(false)` if the operation is already a member. Inserting a
    /// store into a set that already has a different store fails with
    /// [`StmtErrorKind::SecondStore`] and leaves the set unchanged.
    pub fn insert(&mut self, ir: &IrContext, op: OpId) -> Result<bool, StmtError> {
        let operation = ir.op(op).ok_or_else(|| {
            StmtError::new(StmtErrorKind::UnknownOp, "operation is not part of the IR").with_op(op)
        })?;

        if operation.kind.is_store() {
            if let Some(existing) = self.store.filter(|&s| s != op) {
                return Err(StmtError::new(
                    StmtErrorKind::SecondStore,
                    format!("statement already writes through {}", existing),
                )
                .with_op(op));
            }
        }

        let inserted = self.ops.insert(op);
        if operation.kind.is_store() && self.store.is_none() {
            log::debug!("{} designated as statement store", op);
            self.store = Some(op);
        }
        Ok(inserted)
    }

    /// The statement's store, if one has been inserted.
    pub fn store_op(&self) -> Option<OpId> {
        self.store
    }

    /// 1 if `op` is a member, 0 otherwise.
    pub fn count(&self, op: OpId) -> usize {
        usize::from(self.ops.contains(&op))
    }

    pub fn contains(&self, op: OpId) -> bool {
        self.ops.contains(&op)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Member at insertion position `i`.
    pub fn get(&self, i: usize) -> Option<OpId> {
        self.ops.get_index(i).copied()
    }

    /// Members in insertion order; `.rev()` walks them backwards.
    pub fn iter(&self) -> std::iter::Copied<indexmap::set::Iter<'_, OpId>> {
        self.ops.iter().copied()
    }

    /// Control flow shared by every member, outermost first.
    pub fn enclosing_ops(&self, scope: &AnalysisScope<'_>) -> Result<Vec<OpId>, StmtError> {
        let chains = self.member_chains(scope)?;
        let chains: Vec<Vec<EnclosingOp>> = chains.into_iter().map(|(_, chain)| chain).collect();
        Ok(common_prefix(&chains).into_iter().map(|e| e.op).collect())
    }

    /// Iteration domain of the statement.
    pub fn domain(&self, scope: &AnalysisScope<'_>) -> Result<IntegerSet, StmtError> {
        self.domain_with_enclosing_ops(scope).map(|(domain, _)| domain)
    }

    /// Iteration domain of the statement together with the operations its
    /// dimensions and constraints come from, outermost first.
    ///
    /// Every member contributes the domain of its own loop nest; the results
    /// are concatenated, with loops shared between members merged into one
    /// dimension.
    pub fn domain_with_enclosing_ops(
        &self,
        scope: &AnalysisScope<'_>,
    ) -> Result<(IntegerSet, Vec<OpId>), StmtError> {
        let chains = self.member_chains(scope)?;

        let longest = chains
            .iter()
            .map(|(_, chain)| chain)
            .max_by_key(|chain| chain.len())
            .cloned()
            .unwrap_or_default();

        for (op, chain) in &chains {
            if !is_prefix_of(chain, &longest) {
                return Err(StmtError::new(
                    StmtErrorKind::IrreconcilableContexts,
                    "members sit in loop nests that do not nest into each other",
                )
                .with_op(*op));
            }
            if chain.is_empty() && !scope.config().allow_top_level_members {
                return Err(StmtError::new(
                    StmtErrorKind::NoEnclosingContext,
                    "member is not enclosed by any loop or conditional",
                )
                .with_op(*op));
            }
        }

        let mut domain = IntegerSet::universe();
        for (_, chain) in &chains {
            domain.append(&build_index_set(scope, chain)?);
        }
        log::debug!("statement of {} op(s) has domain {}", self.len(), domain);

        Ok((domain, longest.into_iter().map(|e| e.op).collect()))
    }

    fn member_chains(&self, scope: &AnalysisScope<'_>) -> Result<Vec<(OpId, Vec<EnclosingOp>)>, StmtError> {
        if self.is_empty() {
            return Err(StmtError::new(
                StmtErrorKind::EmptySet,
                "statement has no operations to derive a context from",
            ));
        }
        self.iter()
            .map(|op| enclosing_chain(scope, op).map(|chain| (op, chain)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ScopStmtOpSet {
    type Item = OpId;
    type IntoIter = std::iter::Copied<indexmap::set::Iter<'a, OpId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
