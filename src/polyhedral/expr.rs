//! Affine expressions for polyhedral representation.
//!
//! An affine expression is a linear combination of dimensions and parameters
//! plus a constant:
//! `aff(x, p) = c0 + c1*x1 + ... + cn*xn + k1*p1 + ... + km*pm`

use num_integer::Integer;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Add, Sub, Neg};

/// An affine expression: constant + sum(coeff[i] * dim[i]) + sum(param_coeff[j] * param[j])
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffineExpr {
    /// Constant term
    pub constant: i64,
    /// Coefficients for each dimension (index = dimension index)
    pub coeffs: Vec<i64>,
    /// Coefficients for parameters (index = parameter index)
    pub param_coeffs: Vec<i64>,
}

impl AffineExpr {
    /// Create a zero expression.
    pub fn zero(n_dim: usize, n_param: usize) -> Self {
        Self::constant(0, n_dim, n_param)
    }

    /// Create a constant expression.
    pub fn constant(value: i64, n_dim: usize, n_param: usize) -> Self {
        Self {
            constant: value,
            coeffs: vec![0; n_dim],
            param_coeffs: vec![0; n_param],
        }
    }

    /// Create an expression for a single dimension variable.
    pub fn var(dim: usize, n_dim: usize, n_param: usize) -> Self {
        let mut expr = Self::zero(n_dim, n_param);
        expr.set_coeff(dim, 1);
        expr
    }

    /// Create an expression for a parameter.
    pub fn param(param_idx: usize, n_dim: usize, n_param: usize) -> Self {
        let mut expr = Self::zero(n_dim, n_param);
        expr.set_param_coeff(param_idx, 1);
        expr
    }

    /// Check if this is a constant expression.
    pub fn is_constant(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0) &&
        self.param_coeffs.iter().all(|&c| c == 0)
    }

    /// Get the constant value if this is a constant expression.
    pub fn as_constant(&self) -> Option<i64> {
        if self.is_constant() {
            Some(self.constant)
        } else {
            None
        }
    }

    pub fn n_dim(&self) -> usize {
        self.coeffs.len()
    }

    pub fn n_param(&self) -> usize {
        self.param_coeffs.len()
    }

    /// Get coefficient for a dimension.
    pub fn coeff(&self, dim: usize) -> i64 {
        self.coeffs.get(dim).copied().unwrap_or(0)
    }

    /// Get coefficient for a parameter.
    pub fn param_coeff(&self, idx: usize) -> i64 {
        self.param_coeffs.get(idx).copied().unwrap_or(0)
    }

    /// Set coefficient for a dimension.
    pub fn set_coeff(&mut self, dim: usize, value: i64) {
        if let Some(c) = self.coeffs.get_mut(dim) {
            *c = value;
        }
    }

    /// Set coefficient for a parameter.
    pub fn set_param_coeff(&mut self, idx: usize, value: i64) {
        if let Some(c) = self.param_coeffs.get_mut(idx) {
            *c = value;
        }
    }

    /// Widen the expression to `n_dim` dimensions and `n_param` parameters.
    /// New columns get a zero coefficient; existing columns keep their position.
    pub fn resize(&mut self, n_dim: usize, n_param: usize) {
        self.coeffs.resize(n_dim.max(self.coeffs.len()), 0);
        self.param_coeffs.resize(n_param.max(self.param_coeffs.len()), 0);
    }

    /// Move every column to a new position in a space of the given size.
    ///
    /// `dim_map[i]` is the new position of dimension `i`, `param_map[j]` the
    /// new position of parameter `j`.
    pub fn remap(&self, dim_map: &[usize], param_map: &[usize], n_dim: usize, n_param: usize) -> Self {
        let mut out = Self::constant(self.constant, n_dim, n_param);
        for (i, &c) in self.coeffs.iter().enumerate() {
            if let Some(&target) = dim_map.get(i) {
                out.coeffs[target] += c;
            }
        }
        for (j, &c) in self.param_coeffs.iter().enumerate() {
            if let Some(&target) = param_map.get(j) {
                out.param_coeffs[target] += c;
            }
        }
        out
    }

    /// Evaluate the expression given concrete values.
    ///
    /// Saturates at the `i64` range, so extreme inputs keep their sign
    /// instead of overflowing.
    pub fn evaluate(&self, dim_values: &[i64], param_values: &[i64]) -> i64 {
        let dims = self.coeffs.iter().zip(dim_values);
        let params = self.param_coeffs.iter().zip(param_values);
        dims.chain(params)
            .fold(self.constant, |acc, (&c, &v)| acc.saturating_add(c.saturating_mul(v)))
    }

    /// Scale the expression by a constant.
    pub fn scale(&self, factor: i64) -> Self {
        Self {
            constant: self.constant * factor,
            coeffs: self.coeffs.iter().map(|&c| c * factor).collect(),
            param_coeffs: self.param_coeffs.iter().map(|&c| c * factor).collect(),
        }
    }

    /// GCD of the variable coefficients (constant excluded).
    pub fn coeff_gcd(&self) -> i64 {
        self.coeffs
            .iter()
            .chain(&self.param_coeffs)
            .fold(0i64, |g, &c| g.gcd(&c))
    }

    /// Bring `expr >= 0` into canonical form: divide the variable part by its
    /// GCD and tighten the constant with a floor division.
    pub fn normalize_inequality(&self) -> Self {
        let g = self.coeff_gcd();
        if g <= 1 {
            return self.clone();
        }
        Self {
            constant: Integer::div_floor(&self.constant, &g),
            coeffs: self.coeffs.iter().map(|&c| c / g).collect(),
            param_coeffs: self.param_coeffs.iter().map(|&c| c / g).collect(),
        }
    }

    /// Convert to string with given dimension and parameter names.
    pub fn to_string_with_names(&self, dim_names: &[String], param_names: &[String]) -> String {
        fn term(out: &mut Vec<String>, c: i64, name: &str) {
            match c {
                0 => {}
                1 => out.push(name.to_string()),
                -1 => out.push(format!("-{}", name)),
                _ => out.push(format!("{}*{}", c, name)),
            }
        }

        let mut parts = Vec::new();
        for (i, &c) in self.coeffs.iter().enumerate() {
            let name = dim_names.get(i).cloned().unwrap_or_else(|| format!("d{}", i));
            term(&mut parts, c, &name);
        }
        for (j, &c) in self.param_coeffs.iter().enumerate() {
            let name = param_names.get(j).cloned().unwrap_or_else(|| format!("p{}", j));
            term(&mut parts, c, &name);
        }
        if self.constant != 0 || parts.is_empty() {
            parts.push(self.constant.to_string());
        }
        parts.join(" + ").replace("+ -", "- ")
    }
}

fn zip_with(a: &[i64], b: &[i64], f: impl Fn(i64, i64) -> i64) -> Vec<i64> {
    (0..a.len().max(b.len()))
        .map(|i| f(a.get(i).copied().unwrap_or(0), b.get(i).copied().unwrap_or(0)))
        .collect()
}

impl Add for AffineExpr {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            constant: self.constant + other.constant,
            coeffs: zip_with(&self.coeffs, &other.coeffs, |a, b| a + b),
            param_coeffs: zip_with(&self.param_coeffs, &other.param_coeffs, |a, b| a + b),
        }
    }
}

impl Sub for AffineExpr {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            constant: self.constant - other.constant,
            coeffs: zip_with(&self.coeffs, &other.coeffs, |a, b| a - b),
            param_coeffs: zip_with(&self.param_coeffs, &other.param_coeffs, |a, b| a - b),
        }
    }
}

impl Neg for AffineExpr {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1)
    }
}

impl fmt::Display for AffineExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_names(&[], &[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let expr = AffineExpr::constant(5, 2, 1);
        assert!(expr.is_constant());
        assert_eq!(expr.as_constant(), Some(5));
        assert_eq!(expr.evaluate(&[1, 2], &[3]), 5);
    }

    #[test]
    fn test_evaluate_saturates() {
        // -d0 + p0 - 1
        let mut e = AffineExpr::param(0, 1, 1) - AffineExpr::var(0, 1, 1);
        e.constant = -1;
        assert_eq!(e.evaluate(&[i64::MIN], &[i64::MAX]), i64::MAX);
        assert_eq!(e.evaluate(&[i64::MAX], &[0]), i64::MIN);
        assert_eq!(e.evaluate(&[2], &[5]), 2);
    }

    #[test]
    fn test_add_mismatched_widths() {
        let e1 = AffineExpr::var(0, 1, 0);
        let e2 = AffineExpr::var(1, 2, 1);
        let sum = e1 + e2;
        assert_eq!(sum.n_dim(), 2);
        assert_eq!(sum.n_param(), 1);
        assert_eq!(sum.evaluate(&[3, 4], &[0]), 7);
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut e = AffineExpr::var(0, 1, 1) + AffineExpr::param(0, 1, 1);
        e.resize(3, 2);
        assert_eq!(e.coeffs, vec![1, 0, 0]);
        assert_eq!(e.param_coeffs, vec![1, 0]);
    }

    #[test]
    fn test_remap() {
        // d0 + 2*d1 + p0, with d0 -> 1, d1 -> 0, p0 -> 2
        let mut e = AffineExpr::zero(2, 1);
        e.coeffs = vec![1, 2];
        e.param_coeffs = vec![1];
        let r = e.remap(&[1, 0], &[2], 3, 3);
        assert_eq!(r.coeffs, vec![2, 1, 0]);
        assert_eq!(r.param_coeffs, vec![0, 0, 1]);
    }

    #[test]
    fn test_normalize_inequality() {
        // 2*d0 - 3 >= 0  ==>  d0 - 2 >= 0
        let mut e = AffineExpr::var(0, 1, 0).scale(2);
        e.constant = -3;
        let n = e.normalize_inequality();
        assert_eq!(n.coeffs, vec![1]);
        assert_eq!(n.constant, -2);
    }

    #[test]
    fn test_display() {
        let mut expr = AffineExpr::zero(2, 1);
        expr.constant = -1;
        expr.coeffs = vec![2, -1];
        expr.param_coeffs = vec![1];

        let s = expr.to_string_with_names(
            &["i".to_string(), "j".to_string()],
            &["N".to_string()],
        );
        assert_eq!(s, "2*i - j + N - 1");
        assert_eq!(format!("{}", AffineExpr::zero(1, 0)), "0");
    }
}
