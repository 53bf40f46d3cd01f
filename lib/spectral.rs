//! Frequency-domain analysis of real time series: one-sided DFT magnitude
//! spectra and threshold peak detection, for extracting oscillation periods
//! from occupation trajectories.

use ndarray as nd;
use num_complex::Complex64 as C64;
use rustfft::FftPlanner;
use crate::{
    error::{ Error, Result },
    evolve::uniform_dt,
};

/// Default peak-height threshold for [`fourier_spectrum`].
pub const DEF_PEAK_HEIGHT: f64 = 450.0;

/// Shortest series accepted by [`fourier_spectrum`].
const MIN_SAMPLES: usize = 4;

/// One-sided magnitude spectrum of a real, uniformly sampled time series.
#[derive(Clone, Debug)]
pub struct Spectrum {
    /// Frequency axis; bin 0 is DC.
    pub freq: nd::Array1<f64>,
    /// DFT magnitudes, one per frequency bin.
    pub magnitude: nd::Array1<f64>,
    /// Period axis `1 / freq`; the DC bin carries no finite period and is
    /// stored as infinity.
    pub period: nd::Array1<f64>,
    /// Indices of local maxima of the magnitude spectrum above the height
    /// threshold. May be empty.
    pub peaks: Vec<usize>,
}

impl Spectrum {
    /// Return (period, magnitude) pairs for each detected peak.
    pub fn peak_periods(&self) -> Vec<(f64, f64)> {
        self.peaks.iter()
            .map(|&i| (self.period[i], self.magnitude[i]))
            .collect()
    }
}

/// Compute the one-sided DFT magnitude spectrum of `curve` over the uniform
/// grid `time` and detect peaks with height at least `height` (defaulting to
/// [`DEF_PEAK_HEIGHT`]).
///
/// Series shorter than four samples are rejected; an empty peak set is a
/// valid result.
pub fn fourier_spectrum(
    curve: &nd::Array1<f64>,
    time: &nd::Array1<f64>,
    height: Option<f64>,
) -> Result<Spectrum>
{
    let n = curve.len();
    if n < MIN_SAMPLES {
        return Err(Error::ShortSeries { len: n });
    }
    if time.len() != n {
        return Err(Error::DimensionMismatch { expected: n, got: time.len() });
    }
    let d = uniform_dt(time)?;

    let mut buf: Vec<C64>
        = curve.iter().map(|&y| C64::new(y, 0.0)).collect();
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buf);

    let nbins = n / 2 + 1;
    let magnitude: nd::Array1<f64>
        = buf[..nbins].iter().map(|a| a.norm()).collect();
    let freq: nd::Array1<f64>
        = (0..nbins).map(|i| (i as f64) / ((n as f64) * d)).collect();
    let period: nd::Array1<f64>
        = freq.mapv(|f| if f > 0.0 { f.recip() } else { f64::INFINITY });
    let peaks = find_peaks(&magnitude, height.unwrap_or(DEF_PEAK_HEIGHT));
    Ok(Spectrum { freq, magnitude, period, peaks })
}

/// Indices of strict local maxima of `y` with height at least `height`.
///
/// Endpoints (in particular the DC bin) are never reported.
pub fn find_peaks(y: &nd::Array1<f64>, height: f64) -> Vec<usize> {
    let n = y.len();
    if n < 3 { return Vec::new(); }
    (1..n - 1)
        .filter(|&i| y[i] >= height && y[i] > y[i - 1] && y[i] > y[i + 1])
        .collect()
}
