//! Dense per-bin accumulators: load (kW) and active charger counts.

use chrono::NaiveDateTime;

use super::grid::TimeGrid;

/// Average depot power per grid bin (kW).
///
/// Every bin of the grid is present; values start at zero and only grow
/// through [`LoadCurve::add_kw`] during a single simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCurve {
    grid: TimeGrid,
    kw: Vec<f64>,
}

impl LoadCurve {
    /// Creates an all-zero curve over `grid`.
    pub fn zeros(grid: &TimeGrid) -> Self {
        Self {
            grid: *grid,
            kw: vec![0.0; grid.len()],
        }
    }

    /// Grid the curve is defined on.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.kw.len()
    }

    /// Returns `true` when the curve has no bins.
    pub fn is_empty(&self) -> bool {
        self.kw.is_empty()
    }

    /// Load in bin `index` (kW).
    pub fn kw(&self, index: usize) -> f64 {
        self.kw[index]
    }

    /// All bin loads in chronological order.
    pub fn values(&self) -> &[f64] {
        &self.kw
    }

    /// Accumulates `kw` into bin `index`.
    pub fn add_kw(&mut self, index: usize, kw: f64) {
        self.kw[index] += kw;
    }

    /// Highest bin load, or 0 for an empty curve.
    pub fn peak_kw(&self) -> f64 {
        self.kw.iter().copied().fold(0.0, f64::max)
    }

    /// Iterates over `(bin_start, kw)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.kw
            .iter()
            .enumerate()
            .map(|(i, &kw)| (self.grid.bin_start(i), kw))
    }
}

/// Number of concurrently active sessions per grid bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargerCountCurve {
    grid: TimeGrid,
    counts: Vec<u32>,
}

impl ChargerCountCurve {
    /// Creates an all-zero count curve over `grid`.
    pub fn zeros(grid: &TimeGrid) -> Self {
        Self {
            grid: *grid,
            counts: vec![0; grid.len()],
        }
    }

    /// Active sessions in bin `index`.
    pub fn count(&self, index: usize) -> u32 {
        self.counts[index]
    }

    /// All counts in chronological order.
    pub fn values(&self) -> &[u32] {
        &self.counts
    }

    /// Registers one more active session in bin `index`.
    pub fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    /// Highest concurrent count over the grid.
    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Iterates over `(bin_start, count)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &n)| (self.grid.bin_start(i), n))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn grid() -> TimeGrid {
        let start = NaiveDate::from_ymd_opt(2026, 2, 17)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp");
        TimeGrid::new(start, 2, 30)
    }

    #[test]
    fn zeros_is_dense_over_grid() {
        let curve = LoadCurve::zeros(&grid());
        assert_eq!(curve.len(), 4);
        assert!(curve.values().iter().all(|&kw| kw == 0.0));
        assert_eq!(curve.peak_kw(), 0.0);
    }

    #[test]
    fn add_kw_accumulates() {
        let mut curve = LoadCurve::zeros(&grid());
        curve.add_kw(1, 7.4);
        curve.add_kw(1, 3.6);
        curve.add_kw(3, 2.0);
        assert!((curve.kw(1) - 11.0).abs() < 1e-9);
        assert!((curve.peak_kw() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn iter_pairs_bins_with_values() {
        let mut curve = LoadCurve::zeros(&grid());
        curve.add_kw(2, 5.0);
        let points: Vec<_> = curve.iter().collect();
        assert_eq!(points[2].0, grid().bin_start(2));
        assert_eq!(points[2].1, 5.0);
    }

    #[test]
    fn peak_of_empty_curve_is_zero() {
        let start = grid().start();
        let curve = LoadCurve::zeros(&TimeGrid::new(start, 0, 15));
        assert!(curve.is_empty());
        assert_eq!(curve.peak_kw(), 0.0);
    }

    #[test]
    fn charger_counts_increment() {
        let mut counts = ChargerCountCurve::zeros(&grid());
        counts.increment(0);
        counts.increment(0);
        counts.increment(2);
        assert_eq!(counts.count(0), 2);
        assert_eq!(counts.peak(), 2);
        assert_eq!(counts.values(), &[2, 0, 1, 0]);
    }
}
