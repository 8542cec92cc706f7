//! The analysis boundary a statement is resolved against.

use crate::ir::{IrContext, OpId};
use crate::utils::errors::{StmtError, StmtErrorKind};
use crate::DomainConfig;

/// IR, analysis root and configuration for statement queries.
///
/// The root is the operation whose regions form the region under analysis
/// (usually a function). Ancestor walks stop there; anything that cannot reach
/// it is malformed.
#[derive(Debug, Clone)]
pub struct AnalysisScope<'ir> {
    ir: &'ir IrContext,
    root: OpId,
    config: DomainConfig,
}

impl<'ir> AnalysisScope<'ir> {
    pub fn new(ir: &'ir IrContext, root: OpId) -> Result<Self, StmtError> {
        if ir.op(root).is_none() {
            return Err(StmtError::new(StmtErrorKind::UnknownOp, "unknown analysis root").with_op(root));
        }
        Ok(Self { ir, root, config: DomainConfig::default() })
    }

    pub fn with_config(mut self, config: DomainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ir(&self) -> &'ir IrContext {
        self.ir
    }

    pub fn root(&self) -> OpId {
        self.root
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }
}
