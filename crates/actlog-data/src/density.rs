//! Gaussian kernel density estimation over time-of-day samples.

use actlog_core::error::{ActlogError, Result};

/// Number of evaluation points used for the 0–24 h grid.
pub const GRID_POINTS: usize = 241;

/// A density curve evaluated on an even grid.
#[derive(Debug, Clone)]
pub struct DensityEstimate {
    /// Evaluation points.
    pub grid: Vec<f64>,
    /// Density value at each grid point.
    pub density: Vec<f64>,
    /// Kernel bandwidth used.
    pub bandwidth: f64,
}

impl DensityEstimate {
    /// Largest density value on the grid.
    pub fn peak(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Estimate the density of `samples` on an even `points`-long grid over
/// `[lo, hi]`.
///
/// Gaussian kernel, bandwidth by Scott's rule (`σ · n^(-1/5)`). Requires at
/// least two samples with non-zero spread.
pub fn kernel_density(samples: &[f64], lo: f64, hi: f64, points: usize) -> Result<DensityEstimate> {
    if samples.len() < 2 || points < 2 {
        return Err(ActlogError::InsufficientData(format!(
            "need at least 2 samples, got {}",
            samples.len()
        )));
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Err(ActlogError::InsufficientData(
            "samples have zero spread".to_string(),
        ));
    }

    let bandwidth = std_dev * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let mut grid = Vec::with_capacity(points);
    let mut density = Vec::with_capacity(points);
    for i in 0..points {
        let x = lo + (hi - lo) * i as f64 / (points - 1) as f64;
        let sum: f64 = samples
            .iter()
            .map(|s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
            .sum();
        grid.push(x);
        density.push(norm * sum);
    }

    Ok(DensityEstimate {
        grid,
        density,
        bandwidth,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_peaks_at_mode_of_symmetric_samples() {
        let samples = [10.0, 11.0, 12.0, 13.0, 14.0];
        let estimate = kernel_density(&samples, 0.0, 24.0, GRID_POINTS).unwrap();

        let (peak_idx, _) = estimate
            .density
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        let peak_x = estimate.grid[peak_idx];
        assert!((peak_x - 12.0).abs() < 0.2, "peak at {}", peak_x);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let samples = [8.0, 9.0, 12.0, 21.0, 21.5, 22.0];
        let estimate = kernel_density(&samples, 0.0, 24.0, GRID_POINTS).unwrap();

        // Trapezoidal rule over the grid; mass beyond the edges is tiny.
        let step = estimate.grid[1] - estimate.grid[0];
        let mut integral = 0.0;
        for w in estimate.density.windows(2) {
            integral += 0.5 * (w[0] + w[1]) * step;
        }
        assert!((integral - 1.0).abs() < 0.05, "integral {}", integral);
    }

    #[test]
    fn test_density_bandwidth_scott() {
        let samples = [10.0, 11.0, 12.0, 13.0, 14.0];
        let estimate = kernel_density(&samples, 0.0, 24.0, GRID_POINTS).unwrap();

        // σ of the samples is √2.5; Scott's rule divides by 5^(1/5).
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);
        assert!((estimate.bandwidth - expected).abs() < 1e-9);
    }

    #[test]
    fn test_density_rejects_empty_and_single() {
        assert!(kernel_density(&[], 0.0, 24.0, GRID_POINTS).is_err());
        assert!(kernel_density(&[12.0], 0.0, 24.0, GRID_POINTS).is_err());
    }

    #[test]
    fn test_density_rejects_zero_spread() {
        let err = kernel_density(&[5.0, 5.0, 5.0], 0.0, 24.0, GRID_POINTS).unwrap_err();
        assert!(err.to_string().contains("zero spread"));
    }

    #[test]
    fn test_density_grid_covers_range() {
        let estimate = kernel_density(&[6.0, 18.0], 0.0, 24.0, GRID_POINTS).unwrap();
        assert_eq!(estimate.grid.len(), GRID_POINTS);
        assert_eq!(estimate.grid[0], 0.0);
        assert_eq!(estimate.grid[GRID_POINTS - 1], 24.0);
    }
}
