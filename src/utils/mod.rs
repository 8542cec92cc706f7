//! Utility modules for statement analysis.
//!
//! This module contains common utilities used throughout the codebase:
//! - Error types
//! - Domain and statement printing

pub mod errors;
pub mod poly_print;

// Re-exports
pub use errors::*;
pub use poly_print::{print_domain, print_stmt, enumerate_points, PolyPrinter};
