use rand::Rng;
use rand_distr::StandardNormal;
use std::ops::{Mul, Sub};

use crate::error::MatrixError;

/// Dense row-major matrix of `f64`.
///
/// Every operation returns a fresh matrix; inputs are never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. All rows must share the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix, MatrixError> {
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if data.is_empty() || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if let Some((row, found)) = data
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(MatrixError::Ragged { row, expected: cols, found });
        }

        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Builds a `rows × cols` matrix from a flat row-major slice.
    pub fn from_vec(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if values.len() != rows * cols {
            return Err(MatrixError::Length {
                rows,
                cols,
                expected: rows * cols,
                found: values.len(),
            });
        }

        Ok(Matrix {
            rows,
            cols,
            data: values.chunks(cols).map(|row| row.to_vec()).collect(),
        })
    }

    /// Every entry drawn independently from N(0, 1).
    pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.sample(StandardNormal)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Iterates over all entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter().flatten()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    ///
    /// # Panics
    /// Panics if `self.cols != rhs.rows`.
    pub fn dot(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Element-wise difference `self - rhs`.
    pub fn subtract(&self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Mean of the absolute values of all entries.
    pub fn mean_abs(&self) -> f64 {
        let count = (self.rows * self.cols) as f64;
        self.iter().map(|x| x.abs()).sum::<f64>() / count
    }

    fn zip_with<F>(&self, rhs: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            panic!(
                "element-wise op on mismatched shapes {:?} and {:?}",
                self.shape(),
                rhs.shape()
            )
        }

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a
                    .iter()
                    .zip(row_b.iter())
                    .map(|(&a, &b)| functor(a, b))
                    .collect()
            })
            .collect();

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.dot(rhs)
    }
}
