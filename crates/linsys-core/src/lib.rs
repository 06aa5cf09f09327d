//! `linsys-core`: dense linear-system analysis.
//!
//! Builds the annuity system, solves it by LU decomposition with partial
//! pivoting, improves the solution by residual correction, estimates the
//! condition number from a singular value decomposition and writes every
//! intermediate result as a fixed-width text report.
//!
//! # Design
//!
//! - Linear algebra is implemented from scratch on a row-major [`Tensor`].
//! - Generic over `f32`/`f64` via the [`Scalar`] / [`Float`] traits.
//! - Inputs are borrowed; decompositions work on their own copies.
//!
//! ```
//! # use linsys_core::prelude::*;
//! let sys = build_system::<f64>(3).unwrap();
//! let report = LinearSolver::default().analyze(&sys.a, &sys.y).unwrap();
//! assert!(report.x().iter().all(|v| (v - 1.0).abs() < 1e-10));
//! ```
//!
//! [`Tensor`]: tensor::Tensor

pub mod annuity;
pub mod dtype;
pub mod error;
pub mod linalg;
pub mod report;
pub mod solver;
pub mod system;
pub mod tensor;

pub use dtype::{Float, Scalar};
pub use error::{LinsysError, Result};
pub use solver::solve;

/// Items intended for glob-import: `use linsys_core::prelude::*;`
pub mod prelude {
    pub use crate::annuity::{IdentityCheck, annuity_sum, growth_factor, verify_identity};
    pub use crate::dtype::{Float, Scalar};
    pub use crate::error::{LinsysError, Result};
    pub use crate::linalg::{ConditionNumber, LuDecomposition, Permutation, SvdDecomposition};
    pub use crate::report::{ReportFormat, Tee};
    pub use crate::solver::{LinearSolver, SolveReport, SolverOptions};
    pub use crate::system::{LinearSystem, build_system, check_system, fill_system};
    pub use crate::tensor::Tensor;
}
