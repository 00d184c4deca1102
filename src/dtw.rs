//! Dynamic time warping over 2-D feature sequences.
//!
//! Feature matrices are `(n_features, n_frames)`: each column is one
//! observation and the warping path steps through frames. The classic
//! variant uses the unit step set {diagonal, up, left}; [`weighted_dtw`]
//! accepts arbitrary step directions with per-direction weights.

use ndarray::Array2;

use crate::metrics::Metric;
use crate::{Error, Result};

/// Result of a DTW run.
///
/// `cost` is the accumulated M×N cost matrix (M frames of `x`, N frames of
/// `y`); the total distance equals the value at its last cell.
#[derive(Debug, Clone)]
pub struct DtwResult {
    pub distance: f64,
    pub path: Vec<(usize, usize)>,
    pub cost: Array2<f64>,
}

/// Step directions and multiplicative weights for [`weighted_dtw`].
#[derive(Debug, Clone)]
pub struct StepPattern {
    /// `(row_step, col_step)` per direction.
    pub steps: Vec<(usize, usize)>,
    /// Multiplier applied to the local distance when entering via each step.
    pub weights: Vec<f64>,
}

impl Default for StepPattern {
    fn default() -> Self {
        StepPattern {
            steps: vec![(1, 0), (1, 1), (0, 1)],
            weights: vec![1.0, 1.0, 1.0],
        }
    }
}

fn frames(x: &Array2<f32>) -> Vec<Vec<f32>> {
    (0..x.ncols()).map(|j| x.column(j).to_vec()).collect()
}

fn pairwise_distances<M: Metric>(
    xs: &[Vec<f32>],
    ys: &[Vec<f32>],
    metric: &M,
) -> Result<Array2<f64>> {
    let mut dist = Array2::zeros((xs.len(), ys.len()));
    for (i, xv) in xs.iter().enumerate() {
        for (j, yv) in ys.iter().enumerate() {
            dist[(i, j)] = metric.distance(xv, yv)?;
        }
    }
    Ok(dist)
}

/// Classic DTW between two feature matrices.
///
/// Returns the accumulated cost, the forward warping path from `(0, 0)` to
/// `(M-1, N-1)`, and the trimmed cost matrix. Backtracking breaks ties in
/// the order diagonal, up, left.
///
/// # Errors
/// [`Error::EmptyInput`] when either input has zero frames;
/// [`Error::ShapeMismatch`] when the feature dimensions differ.
///
/// # Example
/// ```
/// use ndarray::Array2;
/// use segno::dtw::dtw;
/// use segno::metrics::Euclidean;
///
/// let x = Array2::from_shape_vec((1, 4), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
/// let y = Array2::from_shape_vec((1, 3), vec![0.0, 2.0, 3.0]).unwrap();
/// let result = dtw(&x, &y, &Euclidean).unwrap();
/// assert_eq!(result.path.first(), Some(&(0, 0)));
/// assert_eq!(result.path.last(), Some(&(3, 2)));
/// ```
pub fn dtw<M: Metric>(x: &Array2<f32>, y: &Array2<f32>, metric: &M) -> Result<DtwResult> {
    if x.ncols() == 0 || y.ncols() == 0 {
        return Err(Error::EmptyInput("dtw sequence"));
    }
    let xs = frames(x);
    let ys = frames(y);
    let dist = pairwise_distances(&xs, &ys, metric)?;
    let cost = accumulate_cost(&dist);
    let path = backtrack(&cost);
    let distance = cost[(cost.nrows() - 1, cost.ncols() - 1)];
    Ok(DtwResult { distance, path, cost })
}

/// Weighted-step DTW between two feature matrices.
///
/// The recurrence is `C[i][j] = min_d { C[i−Δr][j−Δc] + D[i][j] · w_d }`
/// with out-of-bounds predecessors treated as +∞; the chosen direction per
/// cell drives backtracking.
///
/// # Errors
/// [`Error::EmptyInput`] on zero-frame input; [`Error::ShapeMismatch`] when
/// the pattern's steps and weights differ in length or the feature
/// dimensions differ.
pub fn weighted_dtw<M: Metric>(
    x: &Array2<f32>,
    y: &Array2<f32>,
    pattern: &StepPattern,
    metric: &M,
) -> Result<DtwResult> {
    if x.ncols() == 0 || y.ncols() == 0 {
        return Err(Error::EmptyInput("dtw sequence"));
    }
    if pattern.steps.len() != pattern.weights.len() {
        return Err(Error::ShapeMismatch {
            expected: pattern.steps.len(),
            got: pattern.weights.len(),
        });
    }
    let xs = frames(x);
    let ys = frames(y);
    let dist = pairwise_distances(&xs, &ys, metric)?;
    let (m, n) = dist.dim();

    let mut padded = Array2::from_elem((m + 1, n + 1), f64::INFINITY);
    padded[(0, 0)] = 0.0;
    let mut chosen = Array2::from_elem((m, n), None::<usize>);

    for i in 1..=m {
        for j in 1..=n {
            let mut best = f64::INFINITY;
            let mut best_dir = None;
            for (d, &(dr, dc)) in pattern.steps.iter().enumerate() {
                if i >= dr && j >= dc {
                    let candidate =
                        padded[(i - dr, j - dc)] + dist[(i - 1, j - 1)] * pattern.weights[d];
                    if candidate < best {
                        best = candidate;
                        best_dir = Some(d);
                    }
                }
            }
            padded[(i, j)] = best;
            chosen[(i - 1, j - 1)] = best_dir;
        }
    }

    let mut cost = Array2::zeros((m, n));
    for i in 0..m {
        for j in 0..n {
            cost[(i, j)] = padded[(i + 1, j + 1)];
        }
    }

    let mut path = Vec::new();
    let (mut i, mut j) = (m - 1, n - 1);
    path.push((i, j));
    while (i, j) != (0, 0) {
        match chosen[(i, j)] {
            Some(d) => {
                let (dr, dc) = pattern.steps[d];
                i -= dr;
                j -= dc;
                path.push((i, j));
            }
            None => break,
        }
    }
    path.reverse();

    let distance = cost[(m - 1, n - 1)];
    Ok(DtwResult { distance, path, cost })
}

fn accumulate_cost(dist: &Array2<f64>) -> Array2<f64> {
    let (m, n) = dist.dim();
    let mut padded = Array2::from_elem((m + 1, n + 1), f64::INFINITY);
    padded[(0, 0)] = 0.0;

    for i in 1..=m {
        for j in 1..=n {
            let prev = padded[(i - 1, j - 1)]
                .min(padded[(i - 1, j)])
                .min(padded[(i, j - 1)]);
            padded[(i, j)] = dist[(i - 1, j - 1)] + prev;
        }
    }

    let mut cost = Array2::zeros((m, n));
    for i in 0..m {
        for j in 0..n {
            cost[(i, j)] = padded[(i + 1, j + 1)];
        }
    }
    cost
}

fn backtrack(cost: &Array2<f64>) -> Vec<(usize, usize)> {
    let (m, n) = cost.dim();
    let (mut i, mut j) = (m - 1, n - 1);
    let mut path = vec![(i, j)];

    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diag = cost[(i - 1, j - 1)];
            let up = cost[(i - 1, j)];
            let left = cost[(i, j - 1)];
            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        path.push((i, j));
    }

    path.reverse();
    path
}
