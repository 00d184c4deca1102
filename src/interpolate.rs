//! Piecewise-linear interpolation over sorted knots.

use crate::{Error, Result};

/// A piecewise-linear map built from `(x, y)` knots.
///
/// Knots are sorted by `x` at construction. Evaluation outside
/// `[x_min, x_max]` clamps to the boundary knot values; the windowing
/// stage relies on this to never map into unknown time.
///
/// # Example
/// ```
/// use segno::LinearInterpolator;
///
/// let interp = LinearInterpolator::new(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
/// assert_eq!(interp.at(1.0), 2.0);
/// assert_eq!(interp.at(-5.0), 0.0); // clamped
/// assert_eq!(interp.at(9.0), 4.0); // clamped
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl LinearInterpolator {
    /// Build an interpolator from parallel `x` and `y` arrays.
    ///
    /// # Errors
    /// [`Error::InvalidDomain`] when the arrays are empty or differ in
    /// length.
    pub fn new(x: &[f32], y: &[f32]) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::InvalidDomain {
                reason: "no interpolation knots",
            });
        }
        if x.len() != y.len() {
            return Err(Error::InvalidDomain {
                reason: "x and y lengths differ",
            });
        }

        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&i, &j| x[i].total_cmp(&x[j]));
        let xs = order.iter().map(|&i| x[i]).collect();
        let ys = order.iter().map(|&i| y[i]).collect();
        Ok(LinearInterpolator { xs, ys })
    }

    /// Evaluate the map at `x`.
    pub fn at(&self, x: f32) -> f32 {
        if self.xs.len() == 1 || x <= self.xs[0] {
            return self.ys[0];
        }
        let last = self.xs.len() - 1;
        if x >= self.xs[last] {
            return self.ys[last];
        }

        let hi = self.xs.partition_point(|&knot| knot < x);
        let lo = hi - 1;
        let (x0, x1) = (self.xs[lo], self.xs[hi]);
        let (y0, y1) = (self.ys[lo], self.ys[hi]);
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }

    /// Evaluate the map at every point of `x`.
    pub fn map(&self, x: &[f32]) -> Vec<f32> {
        x.iter().map(|&v| self.at(v)).collect()
    }
}
