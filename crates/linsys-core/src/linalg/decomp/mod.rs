//! Matrix decompositions.
//!
//! | Decomposition | Module  | Factorization       |
//! |---------------|---------|---------------------|
//! | LU            | [`lu`]  | `PA = LU`           |
//! | SVD           | [`svd`] | `A = U diag(s) V^T` |

pub mod lu;
pub mod svd;

pub use lu::LuDecomposition;
pub use svd::{ConditionNumber, SvdDecomposition};
