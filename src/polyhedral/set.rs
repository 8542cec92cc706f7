//! Integer sets (polyhedra) for iteration domains.

use crate::ir::ValueId;
use crate::polyhedral::space::Space;
use crate::polyhedral::constraint::{Constraint, ConstraintSystem};
use serde::{Serialize, Deserialize};
use std::fmt;

/// An integer set defined by affine constraints over value-identified
/// dimensions and parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerSet {
    pub space: Space,
    pub constraints: ConstraintSystem,
}

impl IntegerSet {
    /// The unconstrained set with no dimensions and no parameters.
    pub fn universe() -> Self {
        Self::default()
    }

    pub fn dim(&self) -> usize { self.space.dim() }
    pub fn n_param(&self) -> usize { self.space.n_param() }

    pub fn find_dim(&self, value: ValueId) -> Option<usize> {
        self.space.find_dim(value)
    }

    pub fn find_param(&self, value: ValueId) -> Option<usize> {
        self.space.find_param(value)
    }

    /// Values behind the dimensions, outermost first.
    pub fn dim_values(&self) -> &[ValueId] {
        &self.space.dim_ids
    }

    /// Values behind the parameters, in order of first use.
    pub fn param_values(&self) -> &[ValueId] {
        &self.space.param_ids
    }

    /// Add a dimension for `value`. Existing constraints get a zero column.
    /// Returns the position of the dimension; a value that already has a
    /// dimension keeps it.
    pub fn add_dim(&mut self, value: ValueId, name: impl Into<String>) -> usize {
        if let Some(idx) = self.find_dim(value) {
            return idx;
        }
        self.constraints.push_dim();
        self.space.push_dim(value, name)
    }

    /// Add a symbolic parameter for `value`, or return the existing one.
    pub fn add_param(&mut self, value: ValueId, name: impl Into<String>) -> usize {
        if let Some(idx) = self.find_param(value) {
            return idx;
        }
        self.constraints.push_param();
        self.space.push_param(value, name)
    }

    /// Append a constraint row. Returns `false` if an equivalent row exists.
    pub fn add_constraint(&mut self, constraint: Constraint) -> bool {
        self.constraints.add(constraint)
    }

    pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        self.constraints.add_all(constraints);
    }

    /// Merge another set into this one.
    ///
    /// Dimensions and parameters are matched by value identity; the ones this
    /// set lacks are appended in `other`'s order. Every row of `other` is
    /// rewritten into this set's columns and appended unless already present.
    pub fn append(&mut self, other: &IntegerSet) {
        let dim_map: Vec<usize> = other.space.dim_ids
            .iter()
            .enumerate()
            .map(|(i, &v)| self.add_dim(v, other.space.dim_name(i).unwrap_or_default()))
            .collect();
        let param_map: Vec<usize> = other.space.param_ids
            .iter()
            .enumerate()
            .map(|(j, &v)| self.add_param(v, other.space.param_name(j).unwrap_or_default()))
            .collect();

        let (n_dim, n_param) = (self.dim(), self.n_param());
        for c in &other.constraints.constraints {
            self.add_constraint(c.remap(&dim_map, &param_map, n_dim, n_param));
        }
    }

    /// Intersection of two sets over the union of their columns.
    pub fn intersect(&self, other: &IntegerSet) -> IntegerSet {
        let mut result = self.clone();
        result.append(other);
        result
    }

    /// Check membership of a point; `point` follows [`dim_values`](Self::dim_values)
    /// and `params` follows [`param_values`](Self::param_values).
    pub fn contains(&self, point: &[i64], params: &[i64]) -> bool {
        point.len() == self.dim()
            && params.len() == self.n_param()
            && self.constraints.is_satisfied(point, params)
    }

    /// A constant row that can never hold.
    pub fn is_obviously_empty(&self) -> bool {
        self.constraints.constraints
            .iter()
            .any(|c| c.expr.is_constant() && !c.is_satisfied(&[], &[]))
    }

    pub fn dim_names(&self) -> Vec<String> { self.space.all_dim_names() }
    pub fn param_names(&self) -> Vec<String> { self.space.all_param_names() }
}

impl fmt::Display for IntegerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim_names = self.dim_names();
        let param_names = self.param_names();
        if !param_names.is_empty() {
            write!(f, "[{}] -> ", param_names.join(", "))?;
        }
        write!(f, "{{ [{}]", dim_names.join(", "))?;
        if !self.constraints.is_empty() {
            write!(f, " : ")?;
            for (i, c) in self.constraints.constraints.iter().enumerate() {
                if i > 0 { write!(f, " and ")?; }
                write!(f, "{}", c.to_string_with_names(&dim_names, &param_names))?;
            }
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedral::expr::AffineExpr;

    /// { [i] : 0 <= i < N } with i = %10, N = %1
    fn bounded_loop(iv: ValueId, name: &str, bound: ValueId, bound_name: &str) -> IntegerSet {
        let mut set = IntegerSet::universe();
        let p = set.add_param(bound, bound_name);
        let d = set.add_dim(iv, name);
        let (n_dim, n_param) = (set.dim(), set.n_param());
        set.add_constraint(Constraint::ge_zero(AffineExpr::var(d, n_dim, n_param)));
        set.add_constraint(Constraint::lt(
            AffineExpr::var(d, n_dim, n_param),
            AffineExpr::param(p, n_dim, n_param),
        ));
        set
    }

    #[test]
    fn test_add_dim_is_idempotent() {
        let mut set = IntegerSet::universe();
        assert_eq!(set.add_dim(ValueId(3), "i"), 0);
        assert_eq!(set.add_dim(ValueId(3), "i"), 0);
        assert_eq!(set.add_param(ValueId(1), "N"), 0);
        assert_eq!(set.add_param(ValueId(1), "N"), 0);
        assert_eq!(set.dim(), 1);
        assert_eq!(set.n_param(), 1);
    }

    #[test]
    fn test_append_merges_by_identity() {
        let outer = bounded_loop(ValueId(10), "i", ValueId(1), "N");
        let mut nest = outer.clone();
        nest.append(&bounded_loop(ValueId(11), "j", ValueId(2), "M"));

        let mut merged = outer.clone();
        merged.append(&nest);

        assert_eq!(merged.dim_values(), &[ValueId(10), ValueId(11)]);
        assert_eq!(merged.param_values(), &[ValueId(1), ValueId(2)]);
        // i-bounds appear once even though both inputs carry them.
        assert_eq!(merged.constraints.len(), 4);
        assert!(merged.contains(&[2, 3], &[5, 4]));
        assert!(!merged.contains(&[2, 4], &[5, 4]));
        assert!(!merged.contains(&[5, 0], &[5, 4]));
    }

    #[test]
    fn test_append_reorders_columns() {
        // Other set lists N after M; columns must still line up.
        let mut other = IntegerSet::universe();
        other.add_param(ValueId(2), "M");
        other.append(&bounded_loop(ValueId(10), "i", ValueId(1), "N"));

        let mut set = bounded_loop(ValueId(10), "i", ValueId(1), "N");
        set.append(&other);
        assert_eq!(set.param_values(), &[ValueId(1), ValueId(2)]);
        assert_eq!(set.constraints.len(), 2);
        assert!(set.contains(&[4], &[5, 0]));
        assert!(!set.contains(&[5], &[5, 0]));
    }

    #[test]
    fn test_intersect() {
        let rows = bounded_loop(ValueId(10), "i", ValueId(1), "N");
        let cols = bounded_loop(ValueId(11), "j", ValueId(1), "N");
        let both = rows.intersect(&cols);
        assert_eq!(both.dim_values(), &[ValueId(10), ValueId(11)]);
        assert_eq!(both.param_values(), &[ValueId(1)]);
        assert!(both.contains(&[1, 2], &[3]));
        assert!(!both.contains(&[1, 3], &[3]));
        // Inputs are untouched.
        assert_eq!(rows.dim(), 1);
    }

    #[test]
    fn test_obviously_empty() {
        let mut set = IntegerSet::universe();
        assert!(!set.is_obviously_empty());
        set.add_constraint(Constraint::ge_zero(AffineExpr::constant(-1, 0, 0)));
        assert!(set.is_obviously_empty());
    }

    #[test]
    fn test_display() {
        let set = bounded_loop(ValueId(10), "i", ValueId(1), "N");
        assert_eq!(format!("{}", set), "[N] -> { [i] : i >= 0 and -i + N - 1 >= 0 }");
    }
}
