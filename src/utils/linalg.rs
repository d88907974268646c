//! Dense symmetric factorization helpers.
//!
//! The Newton solver works with the negative Hessian, which is symmetric and
//! positive definite near a proper maximum. A Cholesky factorization doubles
//! as the positive-definiteness test the optimizer's state machine needs:
//! factorization failure signals a non-PD Hessian.

use faer::{Col, Mat};

/// Cholesky factorization `A = L L'` of a symmetric matrix.
///
/// Returns the lower-triangular factor, or `None` if the matrix is not
/// positive definite (a non-positive pivot is encountered).
pub fn cholesky(a: &Mat<f64>) -> Option<Mat<f64>> {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());

    let mut l: Mat<f64> = Mat::zeros(n, n);
    for j in 0..n {
        let mut diag = a[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return None;
        }
        l[(j, j)] = diag.sqrt();

        for i in (j + 1)..n {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / l[(j, j)];
        }
    }
    Some(l)
}

/// Solve `L L' x = b` given the Cholesky factor `L`.
pub fn cholesky_solve(l: &Mat<f64>, b: &Col<f64>) -> Col<f64> {
    let n = l.nrows();

    // Forward substitution: L y = b
    let mut y = Col::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[(i, k)] * y[k];
        }
        y[i] = sum / l[(i, i)];
    }

    // Back substitution: L' x = y
    let mut x = Col::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[(k, i)] * x[k];
        }
        x[i] = sum / l[(i, i)];
    }
    x
}

/// Invert `A = L L'` column by column from its Cholesky factor.
pub fn cholesky_inverse(l: &Mat<f64>) -> Mat<f64> {
    let n = l.nrows();
    let mut inv: Mat<f64> = Mat::zeros(n, n);

    for col in 0..n {
        let mut e = Col::zeros(n);
        e[col] = 1.0;
        let sol = cholesky_solve(l, &e);
        for i in 0..n {
            inv[(i, col)] = sol[i];
        }
    }
    inv
}
