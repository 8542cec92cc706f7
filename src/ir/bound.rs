//! Bound and condition expressions.
//!
//! Loop bounds and conditional constraints are written as small expression
//! trees over IR values. Whether a tree is actually affine is decided later,
//! when it is lowered into a constraint system.

use crate::ir::ops::ValueId;
use std::fmt;
use std::ops::{Add, Sub, Mul, Neg};

/// An expression over IR values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundExpr {
    /// Integer literal
    Const(i64),
    /// Value reference (induction variable, symbol, constant)
    Value(ValueId),
    Add(Box<BoundExpr>, Box<BoundExpr>),
    Sub(Box<BoundExpr>, Box<BoundExpr>),
    Mul(Box<BoundExpr>, Box<BoundExpr>),
    Neg(Box<BoundExpr>),
    /// Minimum of the terms; only meaningful as a loop upper bound
    Min(Vec<BoundExpr>),
    /// Maximum of the terms; only meaningful as a loop lower bound
    Max(Vec<BoundExpr>),
}

impl BoundExpr {
    pub fn constant(value: i64) -> Self {
        BoundExpr::Const(value)
    }

    pub fn value(v: ValueId) -> Self {
        BoundExpr::Value(v)
    }

    pub fn min(terms: Vec<BoundExpr>) -> Self {
        BoundExpr::Min(terms)
    }

    pub fn max(terms: Vec<BoundExpr>) -> Self {
        BoundExpr::Max(terms)
    }

    /// Collect every value referenced by the expression, in order of first use.
    pub fn collect_values(&self, out: &mut Vec<ValueId>) {
        match self {
            BoundExpr::Const(_) => {}
            BoundExpr::Value(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            BoundExpr::Add(l, r) | BoundExpr::Sub(l, r) | BoundExpr::Mul(l, r) => {
                l.collect_values(out);
                r.collect_values(out);
            }
            BoundExpr::Neg(e) => e.collect_values(out),
            BoundExpr::Min(terms) | BoundExpr::Max(terms) => {
                for t in terms {
                    t.collect_values(out);
                }
            }
        }
    }
}

impl From<i64> for BoundExpr {
    fn from(value: i64) -> Self {
        BoundExpr::Const(value)
    }
}

impl From<i32> for BoundExpr {
    fn from(value: i32) -> Self {
        BoundExpr::Const(value as i64)
    }
}

impl From<ValueId> for BoundExpr {
    fn from(v: ValueId) -> Self {
        BoundExpr::Value(v)
    }
}

impl<T: Into<BoundExpr>> Add<T> for BoundExpr {
    type Output = BoundExpr;

    fn add(self, other: T) -> BoundExpr {
        BoundExpr::Add(Box::new(self), Box::new(other.into()))
    }
}

impl<T: Into<BoundExpr>> Sub<T> for BoundExpr {
    type Output = BoundExpr;

    fn sub(self, other: T) -> BoundExpr {
        BoundExpr::Sub(Box::new(self), Box::new(other.into()))
    }
}

impl<T: Into<BoundExpr>> Mul<T> for BoundExpr {
    type Output = BoundExpr;

    fn mul(self, other: T) -> BoundExpr {
        BoundExpr::Mul(Box::new(self), Box::new(other.into()))
    }
}

impl Neg for BoundExpr {
    type Output = BoundExpr;

    fn neg(self) -> BoundExpr {
        BoundExpr::Neg(Box::new(self))
    }
}

impl fmt::Display for BoundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundExpr::Const(c) => write!(f, "{}", c),
            BoundExpr::Value(v) => write!(f, "{}", v),
            BoundExpr::Add(l, r) => write!(f, "({} + {})", l, r),
            BoundExpr::Sub(l, r) => write!(f, "({} - {})", l, r),
            BoundExpr::Mul(l, r) => write!(f, "({} * {})", l, r),
            BoundExpr::Neg(e) => write!(f, "-{}", e),
            BoundExpr::Min(terms) | BoundExpr::Max(terms) => {
                let name = if matches!(self, BoundExpr::Min(_)) { "min" } else { "max" };
                write!(f, "{}(", name)?;
                for (i, t) in terms.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", t)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Kind of a conditional constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    /// expr >= 0
    NonNegative,
    /// expr == 0
    Zero,
}

/// One constraint of an `affine.if` condition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub expr: BoundExpr,
    pub kind: ConditionKind,
}

impl Condition {
    /// expr >= 0
    pub fn ge_zero(expr: BoundExpr) -> Self {
        Self { expr, kind: ConditionKind::NonNegative }
    }

    /// expr == 0
    pub fn eq_zero(expr: BoundExpr) -> Self {
        Self { expr, kind: ConditionKind::Zero }
    }

    /// lhs >= rhs
    pub fn ge(lhs: impl Into<BoundExpr>, rhs: impl Into<BoundExpr>) -> Self {
        let lhs: BoundExpr = lhs.into();
        Self::ge_zero(lhs - rhs)
    }

    /// lhs < rhs, i.e. rhs - lhs - 1 >= 0
    pub fn lt(lhs: impl Into<BoundExpr>, rhs: impl Into<BoundExpr>) -> Self {
        let rhs: BoundExpr = rhs.into();
        Self::ge_zero(rhs - lhs - 1)
    }

    /// lhs == rhs
    pub fn eq(lhs: impl Into<BoundExpr>, rhs: impl Into<BoundExpr>) -> Self {
        let lhs: BoundExpr = lhs.into();
        Self::eq_zero(lhs - rhs)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConditionKind::NonNegative => write!(f, "{} >= 0", self.expr),
            ConditionKind::Zero => write!(f, "{} == 0", self.expr),
        }
    }
}
