//! # linsys
//!
//! Solve a dense linear system, refine the solution, estimate its condition
//! number and print every step as a fixed-width report.
//!
//! The numerical work lives in [`linsys_core`]; this crate re-exports it and
//! ships the `linsys` command-line tool.

pub use linsys_core as core;

/// Glob-import convenience: `use linsys::prelude::*;`
pub mod prelude {
    pub use linsys_core::prelude::*;
}
