//! Linear constraints for polyhedral representation.
//!
//! A constraint is one row of an affine constraint system:
//! - Inequality: expr >= 0
//! - Equality: expr = 0
//! - Stride: expr ≡ 0 (mod s), used for loops with a non-unit step

use crate::polyhedral::expr::AffineExpr;
use serde::{Serialize, Deserialize};
use std::fmt;

/// A linear constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    /// The affine expression the constraint restricts
    pub expr: AffineExpr,
    /// Kind of constraint
    pub kind: ConstraintKind,
}

/// Kind of constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Greater than or equal: expr >= 0
    Inequality,
    /// Equal: expr = 0
    Equality,
    /// Divisible: expr ≡ 0 (mod stride), stride > 1
    Stride(i64),
}

impl Constraint {
    pub fn new(expr: AffineExpr, kind: ConstraintKind) -> Self {
        Self { expr, kind }
    }

    /// Create an inequality constraint: expr >= 0
    pub fn ge_zero(expr: AffineExpr) -> Self {
        Self::new(expr, ConstraintKind::Inequality)
    }

    /// Create an equality constraint: expr = 0
    pub fn eq_zero(expr: AffineExpr) -> Self {
        Self::new(expr, ConstraintKind::Equality)
    }

    /// Create a stride constraint: expr ≡ 0 (mod stride)
    pub fn stride(expr: AffineExpr, stride: i64) -> Self {
        Self::new(expr, ConstraintKind::Stride(stride))
    }

    /// Create a constraint: lhs >= rhs
    pub fn ge(lhs: AffineExpr, rhs: AffineExpr) -> Self {
        Self::ge_zero(lhs - rhs)
    }

    /// Create a constraint: lhs < rhs, i.e. rhs - lhs - 1 >= 0
    pub fn lt(lhs: AffineExpr, rhs: AffineExpr) -> Self {
        let mut expr = rhs - lhs;
        expr.constant -= 1;
        Self::ge_zero(expr)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self.kind, ConstraintKind::Equality)
    }

    pub fn is_inequality(&self) -> bool {
        matches!(self.kind, ConstraintKind::Inequality)
    }

    pub fn is_stride(&self) -> bool {
        matches!(self.kind, ConstraintKind::Stride(_))
    }

    /// Check if this constraint is satisfied by the given point.
    pub fn is_satisfied(&self, dim_values: &[i64], param_values: &[i64]) -> bool {
        let value = self.expr.evaluate(dim_values, param_values);
        match self.kind {
            ConstraintKind::Inequality => value >= 0,
            ConstraintKind::Equality => value == 0,
            ConstraintKind::Stride(s) => value.rem_euclid(s) == 0,
        }
    }

    /// Complement of a single inequality: expr >= 0 becomes -expr - 1 >= 0.
    /// Equalities and strides have no convex complement.
    pub fn negate(&self) -> Option<Self> {
        match self.kind {
            ConstraintKind::Inequality => {
                let mut neg_expr = -self.expr.clone();
                neg_expr.constant -= 1;
                Some(Self::ge_zero(neg_expr))
            }
            ConstraintKind::Equality | ConstraintKind::Stride(_) => None,
        }
    }

    /// Canonical form used for de-duplication.
    pub fn normalized(&self) -> Self {
        match self.kind {
            ConstraintKind::Inequality => Self::ge_zero(self.expr.normalize_inequality()),
            _ => self.clone(),
        }
    }

    /// Move the constraint's columns, see [`AffineExpr::remap`].
    pub fn remap(&self, dim_map: &[usize], param_map: &[usize], n_dim: usize, n_param: usize) -> Self {
        Self::new(self.expr.remap(dim_map, param_map, n_dim, n_param), self.kind)
    }

    pub fn n_dim(&self) -> usize {
        self.expr.n_dim()
    }

    pub fn n_param(&self) -> usize {
        self.expr.n_param()
    }

    /// Convert to string with given names.
    pub fn to_string_with_names(&self, dim_names: &[String], param_names: &[String]) -> String {
        let expr_str = self.expr.to_string_with_names(dim_names, param_names);
        match self.kind {
            ConstraintKind::Inequality => format!("{} >= 0", expr_str),
            ConstraintKind::Equality => format!("{} = 0", expr_str),
            ConstraintKind::Stride(s) => format!("{} mod {} = 0", expr_str, s),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_names(&[], &[]))
    }
}

/// A system of constraints over a fixed number of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSystem {
    /// All constraints in the system
    pub constraints: Vec<Constraint>,
    /// Number of dimensions
    pub n_dim: usize,
    /// Number of parameters
    pub n_param: usize,
}

impl ConstraintSystem {
    /// Create an empty constraint system.
    pub fn new(n_dim: usize, n_param: usize) -> Self {
        Self {
            constraints: Vec::new(),
            n_dim,
            n_param,
        }
    }

    /// Add a constraint, widening it to the system's columns. Rows that are
    /// already present (after normalization) are skipped.
    ///
    /// Returns `true` if the row was new.
    pub fn add(&mut self, constraint: Constraint) -> bool {
        let mut c = constraint.normalized();
        c.expr.resize(self.n_dim, self.n_param);
        if self.constraints.contains(&c) {
            return false;
        }
        self.constraints.push(c);
        true
    }

    /// Add multiple constraints.
    pub fn add_all(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        for c in constraints {
            self.add(c);
        }
    }

    /// Append a zero column for a new dimension.
    pub fn push_dim(&mut self) {
        self.n_dim += 1;
        for c in &mut self.constraints {
            c.expr.resize(self.n_dim, self.n_param);
        }
    }

    /// Append a zero column for a new parameter.
    pub fn push_param(&mut self) {
        self.n_param += 1;
        for c in &mut self.constraints {
            c.expr.resize(self.n_dim, self.n_param);
        }
    }

    pub fn equalities(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.is_equality())
    }

    pub fn inequalities(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.is_inequality())
    }

    pub fn strides(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.is_stride())
    }

    /// Check if a point satisfies all constraints.
    pub fn is_satisfied(&self, dim_values: &[i64], param_values: &[i64]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(dim_values, param_values))
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lt() {
        // i < 10
        let c = Constraint::lt(AffineExpr::var(0, 1, 0), AffineExpr::constant(10, 1, 0));
        assert!(c.is_satisfied(&[9], &[]));
        assert!(!c.is_satisfied(&[10], &[]));
    }

    #[test]
    fn test_stride() {
        // i - 2 ≡ 0 (mod 3)
        let mut expr = AffineExpr::var(0, 1, 0);
        expr.constant = -2;
        let c = Constraint::stride(expr, 3);
        assert!(c.is_satisfied(&[2], &[]));
        assert!(c.is_satisfied(&[5], &[]));
        assert!(c.is_satisfied(&[-1], &[]));
        assert!(!c.is_satisfied(&[3], &[]));
    }

    #[test]
    fn test_negate() {
        // i - 4 >= 0  ==>  -i + 3 >= 0
        let mut expr = AffineExpr::var(0, 1, 0);
        expr.constant = -4;
        let c = Constraint::ge_zero(expr);
        let n = c.negate().unwrap();
        assert!(n.is_satisfied(&[3], &[]));
        assert!(!n.is_satisfied(&[4], &[]));
        assert!(Constraint::eq_zero(AffineExpr::zero(1, 0)).negate().is_none());
    }

    #[test]
    fn test_system_dedup_and_widening() {
        let mut sys = ConstraintSystem::new(1, 0);
        assert!(sys.add(Constraint::ge_zero(AffineExpr::var(0, 1, 0))));
        // 2*i >= 0 normalizes to i >= 0
        assert!(!sys.add(Constraint::ge_zero(AffineExpr::var(0, 1, 0).scale(2))));
        assert_eq!(sys.len(), 1);

        sys.push_dim();
        sys.push_param();
        assert_eq!(sys.constraints[0].n_dim(), 2);
        assert_eq!(sys.constraints[0].n_param(), 1);

        // 0 <= j < N
        sys.add(Constraint::ge_zero(AffineExpr::var(1, 2, 1)));
        sys.add(Constraint::lt(AffineExpr::var(1, 2, 1), AffineExpr::param(0, 2, 1)));
        assert!(sys.is_satisfied(&[0, 4], &[5]));
        assert!(!sys.is_satisfied(&[0, 5], &[5]));
        assert_eq!(sys.inequalities().count(), 3);
        assert_eq!(sys.equalities().count(), 0);
    }
}
