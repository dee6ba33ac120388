//! mframe: a small dense-matrix stack for tabular regression.
//!
//! The crate provides a row-major [`Matrix`] with checked arithmetic, a
//! labeled [`DataFrame`] on top of it, a reader for delimited numeric text
//! files, and a batch gradient-descent [`LinearRegression`] trainer that is
//! built from a serde-friendly [`config::ModelConfig`].
//!
//! ```
//! use mframe::{LinearRegression, Matrix};
//!
//! let x = Matrix::new(&[[1.0], [2.0], [3.0], [4.0]]).unwrap();
//! let y = Matrix::new(&[[2.0], [4.0], [6.0], [8.0]]).unwrap();
//! let mut model = LinearRegression::new(0.05, 2000);
//! model.fit(&x, &y).unwrap();
//! assert!((model.predict_row(&[5.0]).unwrap() - 10.0).abs() < 1e-3);
//! ```
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod stats;

pub use data_handling::{ColumnIndex, ColumnSlice, DataFrame};
pub use error::{Error, Result};
pub use math::Matrix;
pub use models::{LinearRegression, RegressorModel};
