//! Domain and statement printing utilities.
//!
//! Human-readable dumps of iteration domains and statement operation sets,
//! mostly for debugging scop extraction.

use crate::analysis::{AnalysisScope, ScopStmtOpSet};
use crate::ir::IrContext;
use crate::polyhedral::set::IntegerSet;

/// Pretty printer for polyhedral objects.
pub struct PolyPrinter {
    /// Indentation level
    indent: usize,
    /// Output buffer
    buffer: String,
}

impl PolyPrinter {
    pub fn new() -> Self {
        Self {
            indent: 0,
            buffer: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.buffer
    }

    pub fn take_output(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buffer.push_str("  ");
        }
    }

    fn line(&mut self, text: &str) {
        self.write_indent();
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Print an integer set in ISL-like notation: `[N] -> { [i] : ... }`.
    pub fn print_set(&mut self, set: &IntegerSet) {
        self.buffer.push_str(&set.to_string());
    }

    /// Print a statement: its members (the store marked with `*`) and its
    /// domain, or the reason the domain could not be computed.
    pub fn print_stmt(&mut self, name: &str, stmt: &ScopStmtOpSet, scope: &AnalysisScope<'_>) {
        self.line(&format!("Statement {} ({} ops):", name, stmt.len()));
        self.indent += 1;

        for op in stmt {
            let marker = if stmt.store_op() == Some(op) { "*" } else { " " };
            let text = format!("{}{} {}", marker, op, op_name(scope.ir(), op));
            self.line(&text);
        }

        self.write_indent();
        self.buffer.push_str("Domain: ");
        match stmt.domain(scope) {
            Ok(domain) => self.print_set(&domain),
            Err(err) => self.buffer.push_str(&format!("<{}>", err)),
        }
        self.buffer.push('\n');

        self.indent -= 1;
    }
}

impl Default for PolyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn op_name(ir: &IrContext, op: crate::ir::OpId) -> &str {
    ir.op(op).map(|o| o.name()).unwrap_or("<unknown>")
}

/// Print a domain to a string.
pub fn print_domain(set: &IntegerSet) -> String {
    let mut printer = PolyPrinter::new();
    printer.print_set(set);
    printer.take_output()
}

/// Print a statement to a string.
pub fn print_stmt(name: &str, stmt: &ScopStmtOpSet, scope: &AnalysisScope<'_>) -> String {
    let mut printer = PolyPrinter::new();
    printer.print_stmt(name, stmt, scope);
    printer.take_output()
}

/// Enumerate the points of a domain inside the box `[lo, hi]^dim`, in
/// lexicographic order, stopping after `max_points`.
pub fn enumerate_points(
    set: &IntegerSet,
    params: &[i64],
    (lo, hi): (i64, i64),
    max_points: usize,
) -> Vec<Vec<i64>> {
    let mut points = Vec::new();
    let mut current = vec![lo; set.dim()];
    enumerate_recursive(set, params, (lo, hi), &mut current, 0, &mut points, max_points);
    points
}

fn enumerate_recursive(
    set: &IntegerSet,
    params: &[i64],
    bounds: (i64, i64),
    current: &mut Vec<i64>,
    dim: usize,
    points: &mut Vec<Vec<i64>>,
    max_points: usize,
) {
    if points.len() >= max_points {
        return;
    }
    if dim == current.len() {
        if set.contains(current, params) {
            points.push(current.clone());
        }
        return;
    }
    for val in bounds.0..=bounds.1 {
        current[dim] = val;
        enumerate_recursive(set, params, bounds, current, dim + 1, points, max_points);
        if points.len() >= max_points {
            return;
        }
    }
}
