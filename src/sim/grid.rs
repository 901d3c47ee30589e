//! Fixed-width time grid spanning the simulation horizon.

use std::ops::Range;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

/// An ordered sequence of left-closed, right-open bins `[start, start + width)`.
///
/// Bins are identified by their start timestamp and always iterate in
/// chronological order. A horizon that is not a whole multiple of the bin
/// width is truncated to whole bins.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use depot_sim::sim::grid::TimeGrid;
///
/// let start = NaiveDate::from_ymd_opt(2026, 2, 17)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .expect("valid timestamp");
/// let grid = TimeGrid::new(start, 24, 15);
/// assert_eq!(grid.len(), 96);
/// assert_eq!(grid.bin_hours(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeGrid {
    /// Start of the first bin.
    start: NaiveDateTime,
    /// Width of one bin in minutes.
    bin_minutes: u32,
    /// Number of whole bins in the horizon.
    len: usize,
}

impl TimeGrid {
    /// Creates a grid of whole bins covering `horizon_hours` from `start`.
    ///
    /// # Panics
    ///
    /// Panics if `bin_minutes` is zero.
    pub fn new(start: NaiveDateTime, horizon_hours: u32, bin_minutes: u32) -> Self {
        assert!(bin_minutes > 0, "bin_minutes must be > 0");
        let horizon_minutes = horizon_hours as usize * 60;
        Self {
            start,
            bin_minutes,
            len: horizon_minutes / bin_minutes as usize,
        }
    }

    /// Creates a grid starting at midnight of the day containing `earliest`.
    pub fn starting_at_day_of(earliest: NaiveDateTime, horizon_hours: u32, bin_minutes: u32) -> Self {
        let midnight = earliest.date().and_time(NaiveTime::MIN);
        Self::new(midnight, horizon_hours, bin_minutes)
    }

    /// Start of the first bin.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Exclusive end of the last bin.
    pub fn end(&self) -> NaiveDateTime {
        self.bin_start(self.len)
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the grid holds no bins.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bin width in minutes.
    pub fn bin_minutes(&self) -> u32 {
        self.bin_minutes
    }

    /// Bin width in hours.
    pub fn bin_hours(&self) -> f64 {
        f64::from(self.bin_minutes) / 60.0
    }

    fn bin_seconds(&self) -> i64 {
        i64::from(self.bin_minutes) * 60
    }

    /// Start timestamp of bin `index`.
    ///
    /// Indices past the end are extrapolated, so `bin_start(len())` is the
    /// grid end.
    pub fn bin_start(&self, index: usize) -> NaiveDateTime {
        self.start + TimeDelta::minutes(index as i64 * i64::from(self.bin_minutes))
    }

    /// Iterates over all bin starts in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).map(|i| self.bin_start(i))
    }

    /// Index of the bin starting exactly at `ts`, if it is part of the grid.
    pub fn index_of(&self, ts: NaiveDateTime) -> Option<usize> {
        let offset = (ts - self.start).num_seconds();
        if offset < 0 || offset % self.bin_seconds() != 0 {
            return None;
        }
        let index = usize::try_from(offset / self.bin_seconds()).ok()?;
        (index < self.len).then_some(index)
    }

    /// Index range of the bins whose start lies in `[from, until)`.
    ///
    /// The range is clipped to the grid, so bins of a window that extends
    /// beyond the horizon are simply absent.
    pub fn bins_within(&self, from: NaiveDateTime, until: NaiveDateTime) -> Range<usize> {
        let first = self.first_index_at_or_after(from);
        let last = self.first_index_at_or_after(until);
        first..last.max(first)
    }

    /// Index of the first bin starting at or after `ts`, clamped to `[0, len]`.
    fn first_index_at_or_after(&self, ts: NaiveDateTime) -> usize {
        let offset = (ts - self.start).num_seconds();
        if offset <= 0 {
            return 0;
        }
        let step = self.bin_seconds();
        let index = (offset + step - 1) / step;
        usize::try_from(index).map_or(self.len, |i| i.min(self.len))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn grid_covers_horizon_with_chronological_bins() {
        let grid = TimeGrid::new(ts(0, 0), 24, 15);
        let bins: Vec<_> = grid.iter().collect();
        assert_eq!(bins.len(), 96);
        assert_eq!(bins[0], ts(0, 0));
        assert_eq!(bins[1], ts(0, 15));
        assert_eq!(bins[95], ts(23, 45));
        assert!(bins.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(grid.end(), ts(0, 0) + TimeDelta::hours(24));
    }

    #[test]
    fn uneven_width_truncates_to_whole_bins() {
        // 24h = 1440 min, 1440 / 7 = 205 whole bins
        let grid = TimeGrid::new(ts(0, 0), 24, 7);
        assert_eq!(grid.len(), 205);
        assert!(grid.end() < ts(0, 0) + TimeDelta::hours(24));
    }

    #[test]
    fn starts_at_midnight_of_earliest_day() {
        let grid = TimeGrid::starting_at_day_of(ts(18, 35), 24, 15);
        assert_eq!(grid.start(), ts(0, 0));
    }

    #[test]
    fn index_of_matches_only_bin_starts() {
        let grid = TimeGrid::new(ts(0, 0), 24, 15);
        assert_eq!(grid.index_of(ts(18, 0)), Some(72));
        assert_eq!(grid.index_of(ts(18, 5)), None);
        assert_eq!(grid.index_of(ts(0, 0) + TimeDelta::hours(24)), None);
    }

    #[test]
    fn bins_within_snaps_misaligned_start_forward() {
        let grid = TimeGrid::new(ts(0, 0), 24, 15);
        // 18:05 -> first bin starting at or after is 18:15
        assert_eq!(grid.bins_within(ts(18, 5), ts(19, 0)), 73..76);
        assert_eq!(grid.bins_within(ts(18, 0), ts(19, 0)), 72..76);
    }

    #[test]
    fn bins_within_clips_to_horizon() {
        let grid = TimeGrid::new(ts(0, 0), 24, 60);
        let late_end = ts(22, 0) + TimeDelta::hours(6);
        assert_eq!(grid.bins_within(ts(22, 0), late_end), 22..24);

        let before = ts(0, 0) - TimeDelta::hours(3);
        assert_eq!(grid.bins_within(before, ts(2, 0)), 0..2);
        assert!(grid.bins_within(before, before + TimeDelta::hours(1)).is_empty());
    }
}
