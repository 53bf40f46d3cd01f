//! Numeric interface to gradient-colored curve rendering.
//!
//! A curve is split into straight segments, each carrying a color value
//! normalized onto `[0, 1]`; actual rendering is an external concern and
//! nothing here mutates its inputs.

use ndarray as nd;
use crate::error::{ Error, Result };

/// Clipping normalizer mapping color values onto `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    /// Create a normalizer with explicit bounds.
    pub fn new(vmin: f64, vmax: f64) -> Self { Self { vmin, vmax } }

    /// Create a normalizer spanning the range of the data.
    pub fn from_data(c: &nd::Array1<f64>) -> Self {
        let vmin = c.iter().copied().fold(f64::INFINITY, f64::min);
        let vmax = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { vmin, vmax }
    }

    /// Map a value onto `[0, 1]`, clipping out-of-range input. A degenerate
    /// range maps everything to zero.
    pub fn apply(&self, v: f64) -> f64 {
        if self.vmax <= self.vmin { return 0.0; }
        ((v - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
    }
}

/// One straight segment of a gradient-colored curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub x: [f64; 2],
    pub y: [f64; 2],
    /// Normalized color value in `[0, 1]`.
    pub color: f64,
}

/// Split a curve into segments carrying normalized color values.
///
/// `n_interpolate > 1` linearly refines the curve to
/// `len * n_interpolate` points before segmenting, giving smoother color
/// transitions; refinement is parameterized by point index, so the curve
/// need not be monotonic in either coordinate. With `norm` unset the color
/// bounds are taken from the range of `c`.
pub fn gradient_segments(
    x: &nd::Array1<f64>,
    y: &nd::Array1<f64>,
    c: &nd::Array1<f64>,
    norm: Option<Normalize>,
    n_interpolate: usize,
) -> Result<Vec<Segment>>
{
    let n = x.len();
    if y.len() != n {
        return Err(Error::DimensionMismatch { expected: n, got: y.len() });
    }
    if c.len() != n {
        return Err(Error::DimensionMismatch { expected: n, got: c.len() });
    }
    if n < 2 {
        return Err(Error::InvalidParams(
            "a curve needs at least two points".into()));
    }
    if n_interpolate == 0 {
        return Err(Error::InvalidParams(
            "interpolation factor must be at least 1".into()));
    }
    let norm = norm.unwrap_or_else(|| Normalize::from_data(c));

    let npts = n * n_interpolate;
    let resample = |arr: &nd::Array1<f64>, j: usize| -> f64 {
        let t = (j as f64) * ((n - 1) as f64) / ((npts - 1) as f64);
        let i = (t.floor() as usize).min(n - 2);
        let frac = t - (i as f64);
        arr[i] * (1.0 - frac) + arr[i + 1] * frac
    };

    let segments: Vec<Segment>
        = (0..npts - 1)
        .map(|j| Segment {
            x: [resample(x, j), resample(x, j + 1)],
            y: [resample(y, j), resample(y, j + 1)],
            color: norm.apply(resample(c, j)),
        })
        .collect();
    Ok(segments)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn segment_count_and_endpoints() {
        let x: nd::Array1<f64> = nd::array![0.0, 1.0, 2.0];
        let y: nd::Array1<f64> = nd::array![0.0, 1.0, 0.0];
        let c: nd::Array1<f64> = nd::array![0.0, 5.0, 10.0];
        let segs = gradient_segments(&x, &y, &c, None, 1).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].x, [0.0, 1.0]);
        assert_eq!(segs[1].y, [1.0, 0.0]);
        assert!((segs[1].color - 0.5).abs() < 1e-12);

        let fine = gradient_segments(&x, &y, &c, None, 4).unwrap();
        assert_eq!(fine.len(), 11);
        assert_eq!(fine[0].x[0], 0.0);
        assert!((fine[10].x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn normalizer_clips() {
        let norm = Normalize::new(0.0, 2.0);
        assert_eq!(norm.apply(-1.0), 0.0);
        assert_eq!(norm.apply(1.0), 0.5);
        assert_eq!(norm.apply(3.0), 1.0);
        let degenerate = Normalize::new(1.0, 1.0);
        assert_eq!(degenerate.apply(5.0), 0.0);
    }

    #[test]
    fn mismatched_inputs_rejected() {
        let x: nd::Array1<f64> = nd::array![0.0, 1.0];
        let y: nd::Array1<f64> = nd::array![0.0, 1.0, 2.0];
        let c: nd::Array1<f64> = nd::array![0.0, 1.0];
        assert!(gradient_segments(&x, &y, &c, None, 1).is_err());
    }
}
