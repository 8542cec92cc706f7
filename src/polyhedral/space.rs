//! Polyhedral spaces define the dimensions of iteration domains.
//!
//! A space describes the columns of a constraint system:
//! - Set dimensions (loop induction variables)
//! - Parameter dimensions (symbolic constants)
//!
//! Every column is identified by the IR value it stands for, so two spaces
//! built from the same loop nest agree on which column is which.

use crate::ir::ValueId;
use serde::{Serialize, Deserialize};
use std::fmt;

/// A polyhedral set space with value-identified columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Value behind each set dimension
    pub dim_ids: Vec<ValueId>,
    /// Value behind each parameter
    pub param_ids: Vec<ValueId>,
    /// Names of dimensions (for printing)
    pub dim_names: Vec<String>,
    /// Names of parameters (for printing)
    pub param_names: Vec<String>,
}

impl Space {
    /// Create an empty space: no dimensions, no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of set dimensions.
    pub fn dim(&self) -> usize {
        self.dim_ids.len()
    }

    /// Get the number of parameters.
    pub fn n_param(&self) -> usize {
        self.param_ids.len()
    }

    /// Get the total number of columns.
    pub fn total_dim(&self) -> usize {
        self.dim() + self.n_param()
    }

    /// Position of the dimension bound to `value`.
    pub fn find_dim(&self, value: ValueId) -> Option<usize> {
        self.dim_ids.iter().position(|&v| v == value)
    }

    /// Position of the parameter bound to `value`.
    pub fn find_param(&self, value: ValueId) -> Option<usize> {
        self.param_ids.iter().position(|&v| v == value)
    }

    /// Append a dimension and return its position.
    pub fn push_dim(&mut self, value: ValueId, name: impl Into<String>) -> usize {
        self.dim_ids.push(value);
        self.dim_names.push(name.into());
        self.dim_ids.len() - 1
    }

    /// Append a parameter and return its position.
    pub fn push_param(&mut self, value: ValueId, name: impl Into<String>) -> usize {
        self.param_ids.push(value);
        self.param_names.push(name.into());
        self.param_ids.len() - 1
    }

    /// Get the name of a dimension.
    pub fn dim_name(&self, idx: usize) -> Option<&str> {
        self.dim_names.get(idx).map(|s| s.as_str())
    }

    /// Get the name of a parameter.
    pub fn param_name(&self, idx: usize) -> Option<&str> {
        self.param_names.get(idx).map(|s| s.as_str())
    }

    /// Get all dimension names with defaults.
    pub fn all_dim_names(&self) -> Vec<String> {
        (0..self.dim())
            .map(|i| {
                self.dim_names.get(i)
                    .filter(|s| !s.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("d{}", i))
            })
            .collect()
    }

    /// Get all parameter names with defaults.
    pub fn all_param_names(&self) -> Vec<String> {
        (0..self.n_param())
            .map(|i| {
                self.param_names.get(i)
                    .filter(|s| !s.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("p{}", i))
            })
            .collect()
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.dim())?;
        if self.n_param() > 0 {
            write!(f, " : {} params", self.n_param())?;
        }
        Ok(())
    }
}
