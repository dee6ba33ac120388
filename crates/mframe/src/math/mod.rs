//! Dense 2-D numeric container.
//!
//! [`Matrix`] is the storage every other module builds on: `DataFrame`
//! wraps one, the table reader produces one, and the regression trainer
//! expresses its whole update step through `matmul`, `transpose` and
//! element-wise arithmetic.
pub mod matrix;
mod ops;

pub use matrix::{Matrix, Operand};
