//! Sparse linear systems for one level.
//!
//! A level's system is assembled from `(row, col, value)` triplets (entries
//! for the same cell accumulate), compressed into CSR form, and solved with
//! restarted GMRES or, for small systems, dense Gaussian elimination.
//!
//! Both solvers either return a solution meeting the requested relative
//! residual or an explicit [`LinearError`]; a partially converged vector is
//! never returned.

use thiserror::Error;
use tracing::debug;

use crate::markov::config::{LinearMethod, SolverConfig};

/// Failure of a linear solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearError {
    /// GMRES used up its iteration budget without reaching the tolerance.
    #[error(
        "GMRES did not converge after {iterations} iterations \
         (relative residual {relative_residual:.3e}, tolerance {tolerance:.1e})"
    )]
    NonConvergence {
        /// Inner iterations performed.
        iterations: usize,
        /// Relative residual when the budget ran out.
        relative_residual: f64,
        /// Requested relative residual.
        tolerance: f64,
    },
    /// The Arnoldi process produced a degenerate Hessenberg column.
    #[error("GMRES breakdown at iteration {iteration}")]
    Breakdown {
        /// Inner iteration at which the breakdown occurred.
        iteration: usize,
    },
    /// Dense elimination found no usable pivot.
    #[error("matrix is singular at column {column}")]
    Singular {
        /// Column without a nonzero pivot.
        column: usize,
    },
}

/// Accumulates matrix entries and the right-hand side of a square system.
#[derive(Debug, Clone)]
pub struct SparseSystem {
    dim: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    rhs: Vec<f64>,
}

impl SparseSystem {
    /// Create an empty `dim x dim` system.
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, dim)
    }

    /// Create an empty system with room for `entries` triplets.
    pub fn with_capacity(dim: usize, entries: usize) -> Self {
        Self {
            dim,
            rows: Vec::with_capacity(entries),
            cols: Vec::with_capacity(entries),
            values: Vec::with_capacity(entries),
            rhs: vec![0.0; dim],
        }
    }

    /// System dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of triplets pushed so far (before duplicates are summed).
    pub fn num_triplets(&self) -> usize {
        self.values.len()
    }

    /// Add `value` to entry `(row, col)`.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.dim && col < self.dim, "entry ({}, {}) outside {}", row, col, self.dim);
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Set the right-hand side of `row`.
    #[inline]
    pub fn set_rhs(&mut self, row: usize, value: f64) {
        self.rhs[row] = value;
    }

    /// Right-hand side vector.
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Compress the triplets into a CSR matrix, returning it with the rhs.
    pub fn into_parts(self) -> (CsrMatrix, Vec<f64>) {
        let matrix = CsrMatrix::from_triplets(self.dim, &self.rows, &self.cols, &self.values);
        (matrix, self.rhs)
    }

    /// Compress and solve with the configured method.
    pub fn solve(self, config: &SolverConfig) -> Result<LinearSolution, LinearError> {
        let (matrix, rhs) = self.into_parts();
        let nonzeros = matrix.nonzeros();
        let mut solution = match config.method {
            LinearMethod::Gmres => gmres(
                &matrix,
                &rhs,
                config.tolerance,
                config.restart,
                config.max_iterations,
            )?,
            LinearMethod::Dense => dense_solve(&matrix, &rhs)?,
        };
        solution.nonzeros = nonzeros;
        Ok(solution)
    }
}

/// Compressed sparse row matrix.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    dim: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Build from triplets; entries for the same cell are summed.
    pub fn from_triplets(dim: usize, rows: &[usize], cols: &[usize], values: &[f64]) -> Self {
        // Counting sort by row
        let mut row_ptr = vec![0usize; dim + 1];
        for &r in rows {
            row_ptr[r + 1] += 1;
        }
        for i in 0..dim {
            row_ptr[i + 1] += row_ptr[i];
        }
        let mut next = row_ptr.clone();
        let mut col_idx = vec![0usize; values.len()];
        let mut vals = vec![0.0; values.len()];
        for ((&r, &c), &v) in rows.iter().zip(cols).zip(values) {
            let slot = next[r];
            col_idx[slot] = c;
            vals[slot] = v;
            next[r] += 1;
        }

        // Sort each row by column and merge duplicates in place
        let mut compact_ptr = vec![0usize; dim + 1];
        let mut write = 0;
        let mut entries: Vec<(usize, f64)> = Vec::new();
        for row in 0..dim {
            entries.clear();
            entries.extend(
                (row_ptr[row]..row_ptr[row + 1]).map(|i| (col_idx[i], vals[i])),
            );
            entries.sort_unstable_by_key(|&(c, _)| c);
            let mut i = 0;
            while i < entries.len() {
                let (col, mut sum) = entries[i];
                i += 1;
                while i < entries.len() && entries[i].0 == col {
                    sum += entries[i].1;
                    i += 1;
                }
                col_idx[write] = col;
                vals[write] = sum;
                write += 1;
            }
            compact_ptr[row + 1] = write;
        }
        col_idx.truncate(write);
        vals.truncate(write);

        Self {
            dim,
            row_ptr: compact_ptr,
            col_idx,
            values: vals,
        }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    pub fn nonzeros(&self) -> usize {
        self.values.len()
    }

    /// Entry `(row, col)`, zero if not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        match self.col_idx[range.clone()].binary_search(&col) {
            Ok(i) => self.values[range.start + i],
            Err(_) => 0.0,
        }
    }

    /// `y = A x`
    pub fn mul_vec_into(&self, x: &[f64], y: &mut [f64]) {
        for (row, out) in y.iter_mut().enumerate() {
            let mut acc = 0.0;
            for i in self.row_ptr[row]..self.row_ptr[row + 1] {
                acc += self.values[i] * x[self.col_idx[i]];
            }
            *out = acc;
        }
    }

    /// `A x`
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.dim];
        self.mul_vec_into(x, &mut y);
        y
    }
}

/// Result of a successful linear solve.
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Solution vector.
    pub x: Vec<f64>,
    /// Inner iterations performed (0 for dense).
    pub iterations: usize,
    /// Final relative residual.
    pub relative_residual: f64,
    /// Stored nonzeros of the solved matrix.
    pub nonzeros: usize,
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn residual(matrix: &CsrMatrix, b: &[f64], x: &[f64], out: &mut [f64]) {
    matrix.mul_vec_into(x, out);
    for (r, &bi) in out.iter_mut().zip(b) {
        *r = bi - *r;
    }
}

/// Restarted GMRES(m) with modified Gram-Schmidt and Givens rotations.
///
/// Stops once `||b - Ax|| <= tolerance * ||b||`. Running out of
/// `max_iterations` inner iterations first is a [`LinearError::NonConvergence`].
pub fn gmres(
    matrix: &CsrMatrix,
    b: &[f64],
    tolerance: f64,
    restart: usize,
    max_iterations: usize,
) -> Result<LinearSolution, LinearError> {
    let n = matrix.dim();
    let b_norm = norm(b);
    let mut x = vec![0.0; n];
    if b_norm == 0.0 {
        return Ok(LinearSolution { x, iterations: 0, relative_residual: 0.0, nonzeros: 0 });
    }

    let target = tolerance * b_norm;
    let m = restart.max(1).min(n.max(1));
    let mut r = vec![0.0; n];
    let mut w = vec![0.0; n];
    let mut iterations = 0;
    let mut cycle = 0;

    loop {
        residual(matrix, b, &x, &mut r);
        let beta = norm(&r);
        if beta <= target {
            return Ok(LinearSolution {
                x,
                iterations,
                relative_residual: beta / b_norm,
                nonzeros: 0,
            });
        }
        if iterations >= max_iterations {
            return Err(LinearError::NonConvergence {
                iterations,
                relative_residual: beta / b_norm,
                tolerance,
            });
        }

        // Krylov basis and Hessenberg columns (h[j] has j + 2 entries)
        let mut basis: Vec<Vec<f64>> = Vec::with_capacity(m + 1);
        basis.push(r.iter().map(|v| v / beta).collect());
        let mut h: Vec<Vec<f64>> = Vec::with_capacity(m);
        let mut cs: Vec<f64> = Vec::with_capacity(m);
        let mut sn: Vec<f64> = Vec::with_capacity(m);
        let mut g = vec![0.0; m + 1];
        g[0] = beta;

        let mut k = 0;
        while k < m {
            matrix.mul_vec_into(&basis[k], &mut w);
            let mut column = vec![0.0; k + 2];
            for (i, v) in basis.iter().enumerate() {
                let hik = dot(&w, v);
                column[i] = hik;
                for (wj, vj) in w.iter_mut().zip(v) {
                    *wj -= hik * vj;
                }
            }
            let h_next = norm(&w);
            column[k + 1] = h_next;

            // Apply previous rotations, then eliminate the subdiagonal
            for i in 0..k {
                let t = cs[i] * column[i] + sn[i] * column[i + 1];
                column[i + 1] = -sn[i] * column[i] + cs[i] * column[i + 1];
                column[i] = t;
            }
            let denom = column[k].hypot(column[k + 1]);
            if denom == 0.0 {
                return Err(LinearError::Breakdown { iteration: iterations });
            }
            let (c, s) = (column[k] / denom, column[k + 1] / denom);
            column[k] = denom;
            column[k + 1] = 0.0;
            g[k + 1] = -s * g[k];
            g[k] *= c;
            cs.push(c);
            sn.push(s);
            h.push(column);

            iterations += 1;
            k += 1;

            let estimate = g[k].abs();
            if estimate <= target || iterations >= max_iterations || h_next == 0.0 {
                break;
            }
            basis.push(w.iter().map(|v| v / h_next).collect());
        }

        // Back substitution for the k x k upper-triangular system
        let mut y = vec![0.0; k];
        for i in (0..k).rev() {
            let mut acc = g[i];
            for (l, yl) in y.iter().enumerate().skip(i + 1) {
                acc -= h[l][i] * yl;
            }
            y[i] = acc / h[i][i];
        }
        for (yi, v) in y.iter().zip(&basis) {
            for (xj, vj) in x.iter_mut().zip(v) {
                *xj += yi * vj;
            }
        }

        cycle += 1;
        debug!(
            cycle,
            iterations,
            estimate = g[k].abs() / b_norm,
            "GMRES restart cycle"
        );
    }
}

/// Dense Gaussian elimination with partial pivoting.
pub fn dense_solve(matrix: &CsrMatrix, b: &[f64]) -> Result<LinearSolution, LinearError> {
    let n = matrix.dim();
    let mut a = vec![0.0; n * n];
    for row in 0..n {
        for i in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
            a[row * n + matrix.col_idx[i]] = matrix.values[i];
        }
    }
    let mut x = b.to_vec();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i * n + col].abs().total_cmp(&a[j * n + col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row * n + col];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(LinearError::Singular { column: col });
        }
        if pivot_row != col {
            for j in 0..n {
                a.swap(col * n + j, pivot_row * n + j);
            }
            x.swap(col, pivot_row);
        }
        for row in col + 1..n {
            let factor = a[row * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[row * n + j] -= factor * a[col * n + j];
            }
            x[row] -= factor * x[col];
        }
    }
    for col in (0..n).rev() {
        let mut acc = x[col];
        for j in col + 1..n {
            acc -= a[col * n + j] * x[j];
        }
        x[col] = acc / a[col * n + col];
    }

    let b_norm = norm(b);
    let mut r = vec![0.0; n];
    residual(matrix, b, &x, &mut r);
    let relative_residual = if b_norm == 0.0 { 0.0 } else { norm(&r) / b_norm };
    Ok(LinearSolution { x, iterations: 0, relative_residual, nonzeros: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal() -> (CsrMatrix, Vec<f64>) {
        let mut system = SparseSystem::new(3);
        for (r, c, v) in [
            (0, 0, 2.0),
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 1, 3.0),
            (1, 2, 1.0),
            (2, 1, 1.0),
            (2, 2, 4.0),
        ] {
            system.add(r, c, v);
        }
        system.set_rhs(0, 1.0);
        system.set_rhs(1, 2.0);
        system.set_rhs(2, 3.0);
        system.into_parts()
    }

    #[test]
    fn test_duplicates_accumulate() {
        let mut system = SparseSystem::new(2);
        system.add(0, 0, 1.0);
        system.add(0, 1, -0.25);
        system.add(0, 1, -0.25);
        system.add(1, 1, 1.0);
        assert_eq!(system.num_triplets(), 4);

        let (matrix, _) = system.into_parts();
        assert_eq!(matrix.nonzeros(), 3);
        assert_eq!(matrix.get(0, 1), -0.5);
        assert_eq!(matrix.get(1, 0), 0.0);
        assert_eq!(matrix.mul_vec(&[2.0, 4.0]), vec![0.0, 4.0]);
    }

    #[test]
    fn test_gmres_solves_small_system() {
        let (matrix, b) = tridiagonal();
        let solution = gmres(&matrix, &b, 1e-12, 10, 100).unwrap();
        let ax = matrix.mul_vec(&solution.x);
        for (lhs, rhs) in ax.iter().zip(&b) {
            assert!((lhs - rhs).abs() < 1e-10);
        }
        assert!(solution.relative_residual <= 1e-12);
        assert!(solution.iterations <= 6);
    }

    #[test]
    fn test_gmres_with_short_restart() {
        let (matrix, b) = tridiagonal();
        let restarted = gmres(&matrix, &b, 1e-12, 1, 500).unwrap();
        let dense = dense_solve(&matrix, &b).unwrap();
        for (a, d) in restarted.x.iter().zip(&dense.x) {
            assert!((a - d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gmres_reports_non_convergence() {
        let (matrix, b) = tridiagonal();
        let err = gmres(&matrix, &b, 1e-14, 10, 1).unwrap_err();
        match err {
            LinearError::NonConvergence { iterations, relative_residual, .. } => {
                assert_eq!(iterations, 1);
                assert!(relative_residual > 1e-14);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_rhs_gives_zero_solution() {
        let (matrix, _) = tridiagonal();
        let solution = gmres(&matrix, &[0.0; 3], 1e-7, 10, 10).unwrap();
        assert_eq!(solution.x, vec![0.0; 3]);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_dense_matches_known_solution() {
        // 2x + y = 3, x + 3y = 5  =>  x = 0.8, y = 1.4
        let mut system = SparseSystem::new(2);
        system.add(0, 0, 2.0);
        system.add(0, 1, 1.0);
        system.add(1, 0, 1.0);
        system.add(1, 1, 3.0);
        system.set_rhs(0, 3.0);
        system.set_rhs(1, 5.0);
        let config = SolverConfig::default().with_method(LinearMethod::Dense);
        let solution = system.solve(&config).unwrap();
        assert!((solution.x[0] - 0.8).abs() < 1e-12);
        assert!((solution.x[1] - 1.4).abs() < 1e-12);
        assert_eq!(solution.nonzeros, 4);
    }

    #[test]
    fn test_dense_detects_singular() {
        let mut system = SparseSystem::new(2);
        system.add(0, 0, 1.0);
        system.add(0, 1, 1.0);
        system.add(1, 0, 1.0);
        system.add(1, 1, 1.0);
        let (matrix, b) = system.into_parts();
        assert!(matches!(dense_solve(&matrix, &b), Err(LinearError::Singular { column: 1 })));
    }
}
