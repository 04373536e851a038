// Dweve Perfviz - Benchmark Result Analysis and Reporting
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Dense single-precision matrices for the reference validator.

use crate::error::{PerfvizError, Result};
use crate::records::check_sparsity;
use rand::Rng;

/// Dense row-major `f32` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`PerfvizError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(PerfvizError::ShapeMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Fills a matrix with uniform values in `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let data = (0..rows * cols).map(|_| rng.gen::<f32>()).collect();
        Self { rows, cols, data }
    }

    /// Like [`Matrix::random`], zeroing each element with probability `sparsity`.
    ///
    /// # Errors
    ///
    /// Returns an error if `sparsity` is outside `[0, 1]`.
    pub fn random_sparse<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        sparsity: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_sparsity(sparsity)?;
        let data = (0..rows * cols)
            .map(|_| {
                let value = rng.gen::<f32>();
                if rng.gen::<f64>() < sparsity {
                    0.0
                } else {
                    value
                }
            })
            .collect();
        Ok(Self { rows, cols, data })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major element storage.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major element storage.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Fraction of exactly-zero elements.
    pub fn zero_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let zeros = self.data.iter().filter(|&&v| v == 0.0).count();
        zeros as f64 / self.data.len() as f64
    }

    /// Checks that `self * other` is defined.
    pub(crate) fn check_multiply(&self, other: &Matrix) -> Result<()> {
        if self.cols != other.rows {
            return Err(PerfvizError::ShapeMismatch {
                op: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_vec_shape_check() {
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).is_ok());
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_zero_fraction() {
        let mut m = Matrix::zeros(2, 3);
        assert_eq!(m.zero_fraction(), 1.0);
        m.as_mut_slice()[5] = 5.0;
        assert_eq!(m.as_slice()[5], 5.0);
        assert!((m.zero_fraction() - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(Matrix::zeros(0, 0).zero_fraction(), 0.0);
    }

    #[test]
    fn test_random_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(16, 16, &mut rng);
        assert!(m.as_slice().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_random_sparse_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random_sparse(100, 100, 0.9, &mut rng).unwrap();
        let zeros = m.zero_fraction();
        assert!(zeros > 0.85 && zeros < 0.95, "zero fraction {}", zeros);

        let dense = Matrix::random_sparse(10, 10, 0.0, &mut rng).unwrap();
        assert!(dense.zero_fraction() < 0.05);

        assert!(Matrix::random_sparse(2, 2, 1.2, &mut rng).is_err());
    }

    #[test]
    fn test_check_multiply() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 4);
        assert!(a.check_multiply(&b).is_ok());
        assert!(b.check_multiply(&a).is_err());
    }
}
