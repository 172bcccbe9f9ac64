//! Interpolating tensor-product B-splines on rectangular grids.
//!
//! Knot placement follows FITPACK's `regrid` with zero smoothing: the
//! boundary knots are repeated `k + 1` times and the interior knots sit on
//! data points (odd `k`) or on midpoints between them (even `k`), so the
//! surface passes through every grid value.

use ndarray::{Array1, Array2};

use crate::axis::is_non_decreasing;
use crate::error::{EblError, GridAxis, Result};

pub const MAX_DEGREE: usize = 5;

/// Knot vector and degree of one spline axis.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<f64>,
    degree: usize,
}

impl KnotVector {
    /// Knots of the interpolating spline of degree `k` through the strictly
    /// increasing points `x`. Requires `x.len() > k`.
    pub fn interpolating(x: &[f64], k: usize) -> Self {
        let m = x.len();
        let mut knots = Vec::with_capacity(m + k + 1);
        knots.extend(std::iter::repeat_n(x[0], k + 1));
        let half = k / 2;
        for j in (half + 1)..(m - k + half) {
            if k % 2 == 1 {
                knots.push(x[j]);
            } else {
                knots.push(0.5 * (x[j - 1] + x[j]));
            }
        }
        knots.extend(std::iter::repeat_n(x[m - 1], k + 1));
        KnotVector { knots, degree: k }
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of B-spline coefficients along this axis.
    pub fn n_coefficients(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// The interval `[t_k, t_n]` the spline is defined on.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.n_coefficients()])
    }

    /// Index `l` of the knot span holding `x`, with `k <= l < n`.
    fn span(&self, x: f64) -> usize {
        let upper = self.knots.partition_point(|&t| t <= x);
        upper
            .saturating_sub(1)
            .clamp(self.degree, self.n_coefficients() - 1)
    }

    /// Non-zero basis functions `N_{l-k} .. N_l` at `x` (Cox-de Boor).
    ///
    /// `x` is clamped to the domain first, so evaluation outside the grid
    /// returns the boundary values.
    pub fn basis(&self, x: f64) -> (usize, Vec<f64>) {
        let (lo, hi) = self.domain();
        let x = x.clamp(lo, hi);
        let k = self.degree;
        let l = self.span(x);
        let t = &self.knots;

        let mut n = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];
        n[0] = 1.0;
        for j in 1..=k {
            left[j] = x - t[l + 1 - j];
            right[j] = t[l + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = n[r] / (right[r + 1] + left[j - r]);
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }
        (l - k, n)
    }

    /// Square collocation matrix `B[i][j] = N_j(x_i)`.
    fn collocation(&self, x: &[f64]) -> Array2<f64> {
        let n = self.n_coefficients();
        let mut b = Array2::zeros((x.len(), n));
        for (i, &xi) in x.iter().enumerate() {
            let (first, values) = self.basis(xi);
            for (r, v) in values.into_iter().enumerate() {
                b[[i, first + r]] = v;
            }
        }
        b
    }
}

/// Dense LU factorization with partial pivoting.
#[derive(Debug, Clone)]
struct LuDecomposition {
    lu: Array2<f64>,
    pivots: Vec<usize>,
}

impl LuDecomposition {
    fn factor(mut a: Array2<f64>) -> Result<Self> {
        let n = a.nrows();
        let mut pivots: Vec<usize> = (0..n).collect();
        for col in 0..n {
            let p = (col..n)
                .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
                .unwrap_or(col);
            if a[[p, col]].abs() < f64::MIN_POSITIVE {
                return Err(EblError::DataError("singular collocation matrix".to_string()));
            }
            if p != col {
                for c in 0..n {
                    a.swap([p, c], [col, c]);
                }
                pivots.swap(p, col);
            }
            let pivot = a[[col, col]];
            for row in (col + 1)..n {
                let factor = a[[row, col]] / pivot;
                if factor == 0.0 {
                    continue;
                }
                a[[row, col]] = factor;
                for c in (col + 1)..n {
                    a[[row, c]] -= factor * a[[col, c]];
                }
            }
        }
        Ok(LuDecomposition { lu: a, pivots })
    }

    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.pivots.len();
        let mut x: Vec<f64> = self.pivots.iter().map(|&p| b[p]).collect();
        for i in 0..n {
            for j in 0..i {
                x[i] -= self.lu[[i, j]] * x[j];
            }
        }
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] -= self.lu[[i, j]] * x[j];
            }
            x[i] /= self.lu[[i, i]];
        }
        x
    }
}

/// A fitted surface `S(x, y) = Σᵢ Σⱼ cᵢⱼ Bᵢ(x) Bⱼ(y)`.
///
/// In this crate `x` is log10 wavelength and `y` is redshift.
#[derive(Debug, Clone, PartialEq)]
pub struct BivariateSpline {
    tx: KnotVector,
    ty: KnotVector,
    coefficients: Array2<f64>,
}

impl BivariateSpline {
    /// Fits the interpolating spline through `values[[i, j]]` at
    /// `(x[i], y[j])`. Both axes must be strictly increasing.
    pub fn fit(x: &[f64], y: &[f64], values: &Array2<f64>, kx: usize, ky: usize) -> Result<Self> {
        check_degree(GridAxis::Wavelength, kx, x.len())?;
        check_degree(GridAxis::Redshift, ky, y.len())?;
        if values.dim() != (x.len(), y.len()) {
            return Err(EblError::ShapeMismatch {
                expected: (x.len(), y.len()),
                found: values.dim(),
            });
        }

        let tx = KnotVector::interpolating(x, kx);
        let ty = KnotVector::interpolating(y, ky);
        let lu_x = LuDecomposition::factor(tx.collocation(x))?;
        let lu_y = LuDecomposition::factor(ty.collocation(y))?;

        // Bx C Byᵀ = Z, solved one axis at a time.
        let mut c = values.clone();
        for j in 0..c.ncols() {
            let col = lu_x.solve(&c.column(j).to_vec());
            c.column_mut(j).assign(&Array1::from(col));
        }
        for i in 0..c.nrows() {
            let row = lu_y.solve(&c.row(i).to_vec());
            c.row_mut(i).assign(&Array1::from(row));
        }

        log::debug!(
            "fitted {}x{} spline surface with degrees ({kx}, {ky})",
            x.len(),
            y.len()
        );
        Ok(BivariateSpline {
            tx,
            ty,
            coefficients: c,
        })
    }

    /// Knots along the first coordinate.
    pub fn knots_x(&self) -> &KnotVector {
        &self.tx
    }

    /// Knots along the second coordinate.
    pub fn knots_y(&self) -> &KnotVector {
        &self.ty
    }

    pub fn coefficients(&self) -> &Array2<f64> {
        &self.coefficients
    }

    /// Evaluates the surface on the grid `xs × ys`, returning an array of
    /// shape `(xs.len(), ys.len())`.
    ///
    /// Both coordinate sequences must be non-decreasing.
    pub fn evaluate_grid(&self, xs: &[f64], ys: &[f64]) -> Result<Array2<f64>> {
        if !is_non_decreasing(xs) {
            return Err(EblError::UnsortedQuery(GridAxis::Wavelength));
        }
        if !is_non_decreasing(ys) {
            return Err(EblError::UnsortedQuery(GridAxis::Redshift));
        }
        let bx: Vec<(usize, Vec<f64>)> = xs.iter().map(|&x| self.tx.basis(x)).collect();
        let by: Vec<(usize, Vec<f64>)> = ys.iter().map(|&y| self.ty.basis(y)).collect();

        let mut out = Array2::zeros((xs.len(), ys.len()));
        for (i, (fx, nx)) in bx.iter().enumerate() {
            for (j, (fy, ny)) in by.iter().enumerate() {
                out[[i, j]] = self.combine(*fx, nx, *fy, ny);
            }
        }
        Ok(out)
    }

    /// Evaluates the surface at a single point.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let (fx, nx) = self.tx.basis(x);
        let (fy, ny) = self.ty.basis(y);
        self.combine(fx, &nx, fy, &ny)
    }

    #[inline]
    fn combine(&self, fx: usize, nx: &[f64], fy: usize, ny: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (a, &wx) in nx.iter().enumerate() {
            let row = self.coefficients.row(fx + a);
            for (b, &wy) in ny.iter().enumerate() {
                sum += wx * wy * row[fy + b];
            }
        }
        sum
    }
}

fn check_degree(axis: GridAxis, degree: usize, points: usize) -> Result<()> {
    if degree == 0 || degree > MAX_DEGREE || points <= degree {
        return Err(EblError::InvalidDegree {
            axis,
            degree,
            points,
        });
    }
    Ok(())
}
