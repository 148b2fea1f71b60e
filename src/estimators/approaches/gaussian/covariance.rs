// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{InfoError, Result};

/// Relative tolerance for the symmetry check of a supplied covariance.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A validated symmetric positive-definite covariance over the concatenated
/// variable dimensions, with the number of observations it summarises.
#[derive(Debug, Clone)]
pub struct Covariance {
    matrix: DMatrix<f64>,
    observations: usize,
}

impl Covariance {
    /// Sample covariance (denominator `n - 1`) of `samples x dimensions` data.
    pub fn from_samples(data: ArrayView2<'_, f64>) -> Result<Self> {
        let n = data.nrows();
        let d = data.ncols();
        if n < 2 {
            return Err(InfoError::insufficient("covariance estimation", 2, n));
        }
        if d == 0 {
            return Err(InfoError::config("data", "covariance needs at least one dimension"));
        }
        let means = column_means(data);
        let centred = &data - &means.view().insert_axis(Axis(0));
        let scatter = centred.t().dot(&centred) / (n - 1) as f64;
        let matrix = DMatrix::from_fn(d, d, |i, j| scatter[(i, j)]);
        let covariance = Self { matrix, observations: n };
        covariance.cholesky(&(0..d).collect::<Vec<_>>())?;
        Ok(covariance)
    }

    /// A user-supplied covariance summarising `observations` samples.
    ///
    /// Fails with [`InfoError::InvalidCovariance`] unless the matrix is square,
    /// finite, symmetric and positive-definite.
    pub fn from_matrix(matrix: ArrayView2<'_, f64>, observations: usize) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 {
            return Err(InfoError::InvalidCovariance(format!("expected a non-empty square matrix, got {rows}x{cols}")));
        }
        if observations < 2 {
            return Err(InfoError::insufficient("covariance observation count", 2, observations));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(InfoError::InvalidCovariance("matrix has non-finite entries".to_string()));
        }
        for i in 0..rows {
            for j in (i + 1)..cols {
                let (a, b) = (matrix[(i, j)], matrix[(j, i)]);
                if (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0) {
                    return Err(InfoError::InvalidCovariance(format!("matrix is not symmetric at ({i}, {j})")));
                }
            }
        }
        let covariance = Self {
            matrix: DMatrix::from_fn(rows, cols, |i, j| matrix[(i, j)]),
            observations,
        };
        covariance.cholesky(&(0..rows).collect::<Vec<_>>())?;
        Ok(covariance)
    }

    pub fn dims(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.dims(), self.dims()), |(i, j)| self.matrix[(i, j)])
    }

    /// Covariance restricted to `indices` (in that order).
    pub fn sub_matrix(&self, indices: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(indices.len(), indices.len(), |i, j| self.matrix[(indices[i], indices[j])])
    }

    pub(crate) fn cholesky(&self, indices: &[usize]) -> Result<Cholesky<f64, Dyn>> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.dims()) {
            return Err(InfoError::InvalidCovariance(format!(
                "index {bad} outside a {}-dimensional covariance",
                self.dims()
            )));
        }
        Cholesky::new(self.sub_matrix(indices)).ok_or_else(|| {
            InfoError::InvalidCovariance(format!("sub-matrix over dimensions {indices:?} is not positive-definite"))
        })
    }

    /// Natural log-determinant of the covariance restricted to `indices`;
    /// 0 for the empty set.
    pub fn log_det(&self, indices: &[usize]) -> Result<f64> {
        if indices.is_empty() {
            return Ok(0.0);
        }
        let chol = self.cholesky(indices)?;
        Ok(2.0 * chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>())
    }

    /// Per-sample `-ln f(x_t)` of the Gaussian over `indices`, for centred rows.
    pub(crate) fn local_entropies(&self, centred: ArrayView2<'_, f64>, indices: &[usize]) -> Result<Array1<f64>> {
        let n = centred.nrows();
        if indices.is_empty() {
            return Ok(Array1::zeros(n));
        }
        let chol = self.cholesky(indices)?;
        let l = chol.l();
        let log_det = 2.0 * l.diagonal().iter().map(|d| d.ln()).sum::<f64>();
        let constant = 0.5 * (indices.len() as f64 * (2.0 * std::f64::consts::PI).ln() + log_det);
        let mut out = Array1::zeros(n);
        for (t, row) in centred.axis_iter(Axis(0)).enumerate() {
            let x = DVector::from_iterator(indices.len(), indices.iter().map(|&c| row[c]));
            let z = l
                .solve_lower_triangular(&x)
                .ok_or_else(|| InfoError::InvalidCovariance("singular Cholesky factor".to_string()))?;
            out[t] = constant + 0.5 * z.dot(&z);
        }
        Ok(out)
    }
}

pub(crate) fn column_means(data: ArrayView2<'_, f64>) -> Array1<f64> {
    data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(data.ncols()))
}
