use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{NetworkError, Result};

/// Dense row-major matrix of `f64`.
///
/// Vectors flowing through the network are plain `Vec<f64>`; they become
/// single-column matrices only at the points where a matrix product needs them.
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

    /// Square identity matrix of side `n`.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Samples every entry uniformly from `[-range, range]`.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, range: f64, rng: &mut R) -> Matrix {
        let dist = Uniform::new_inclusive(-range, range);
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| dist.sample(rng)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from rows, rejecting ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NetworkError::DimensionMismatch {
                op: "from_data",
                left: (rows, cols),
                right: (1, bad.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Single-column matrix holding `values`.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Flattens a single-column matrix back into a vector.
    pub fn into_column(self) -> Result<Vec<f64>> {
        if self.cols != 1 {
            return Err(NetworkError::DimensionMismatch {
                op: "into_column",
                left: self.shape(),
                right: (self.rows, 1),
            });
        }
        Ok(self.data.into_iter().map(|row| row[0]).collect())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether `data` really holds `rows` rows of `cols` entries each.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
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

    /// Matrix product `self · rhs`. Requires `self.cols == rhs.rows`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NetworkError::DimensionMismatch {
                op: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
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

        Ok(res)
    }

    /// `self -= scale * rhs`, entry by entry.
    pub fn sub_scaled(&mut self, rhs: &Matrix, scale: f64) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(NetworkError::DimensionMismatch {
                op: "sub_scaled",
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, g) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= scale * g;
            }
        }
        Ok(())
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
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Element-wise (Hadamard) product of two equal-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(NetworkError::DimensionMismatch {
            op: "hadamard",
            left: (1, a.len()),
            right: (1, b.len()),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
}
