//! Operator sugar over the fallible [`Matrix`] methods.
//!
//! These impls panic on shape mismatch, the same way slice indexing panics
//! out of bounds. Use `Matrix::add`, `Matrix::sub` and friends to get a
//! `Result` instead.
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::math::matrix::Matrix;

fn unwrap_shape<T>(result: crate::error::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

impl<'a, 'b> Add<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: &'b Matrix) -> Self::Output {
        unwrap_shape(Matrix::add(self, rhs))
    }
}

impl Add<f64> for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: f64) -> Self::Output {
        unwrap_shape(Matrix::add(self, rhs))
    }
}

impl<'a, 'b> Sub<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &'b Matrix) -> Self::Output {
        unwrap_shape(Matrix::sub(self, rhs))
    }
}

impl Sub<f64> for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: f64) -> Self::Output {
        unwrap_shape(Matrix::sub(self, rhs))
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Self::Output {
        self.mul_scalar(-1.0)
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        unwrap_shape(self.add_in_place(rhs));
    }
}

impl AddAssign<f64> for Matrix {
    fn add_assign(&mut self, rhs: f64) {
        unwrap_shape(self.add_in_place(rhs));
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        unwrap_shape(self.sub_in_place(rhs));
    }
}

impl SubAssign<f64> for Matrix {
    fn sub_assign(&mut self, rhs: f64) {
        unwrap_shape(self.sub_in_place(rhs));
    }
}

impl MulAssign<f64> for Matrix {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale_in_place(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_match_named_methods() {
        let a = Matrix::new(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let b = Matrix::new(&[[0.5, 0.5], [1.0, 1.0]]).unwrap();
        assert_eq!(&a + &b, a.add(&b).unwrap());
        assert_eq!(&a - 1.0, a.sub(1.0).unwrap());
        assert_eq!(&a * 2.0, a.mul_scalar(2.0));
        assert_eq!(-&a, a.mul_scalar(-1.0));
    }

    #[test]
    fn compound_assignment_mutates_in_place() {
        let mut a = Matrix::new(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::new(&[[1.0, 1.0]]).unwrap();
        a += &b;
        a -= 0.5;
        a *= 2.0;
        assert_eq!(a.to_vec2(), vec![vec![3.0, 5.0]]);
    }

    #[test]
    #[should_panic(expected = "shape mismatch in add")]
    fn mismatched_add_panics() {
        let a = Matrix::new(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::new(&[[1.0], [2.0]]).unwrap();
        let _ = &a + &b;
    }
}
