//! Playback state for the depot dashboard.

use std::time::Instant;

use chrono::NaiveDateTime;

use crate::sim::compare::{DepotRun, ScenarioRun};

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// TUI application state.
///
/// The run is already complete; the dashboard reveals it one bin per tick so
/// the evening peak can be watched building up against the cap.
pub struct App {
    /// Finished run being displayed.
    run: DepotRun,
    /// Index of the scenario compared against the baseline.
    pub selected: usize,
    /// Number of bins revealed so far.
    pub cursor: usize,
    /// Whether playback is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last playback tick was executed.
    pub last_tick: Instant,
}

impl App {
    /// Creates a new app over a finished run.
    pub fn new(run: DepotRun) -> Self {
        Self {
            run,
            selected: 0,
            cursor: 0,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
        }
    }

    /// The displayed run.
    pub fn run(&self) -> &DepotRun {
        &self.run
    }

    /// Total number of bins in the grid.
    pub fn total_bins(&self) -> usize {
        self.run.grid.len()
    }

    /// Reveals one more bin if not finished.
    pub fn tick(&mut self) {
        if !self.is_finished() {
            self.cursor += 1;
        }
    }

    /// Toggles pause/resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases playback speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases playback speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Selects the scenario at `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.run.scenarios.len() {
            self.selected = index;
        }
    }

    /// Cycles to the next scenario.
    pub fn select_next(&mut self) {
        let n = self.run.scenarios.len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    /// Cycles to the previous scenario.
    pub fn select_prev(&mut self) {
        let n = self.run.scenarios.len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    /// Restarts playback from the first bin.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.paused = false;
    }

    /// Reveals every bin at once.
    pub fn skip_to_end(&mut self) {
        self.cursor = self.total_bins();
    }

    /// Returns `true` when all bins are revealed.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.total_bins()
    }

    /// The scenario currently compared against the baseline.
    pub fn scenario(&self) -> Option<&ScenarioRun> {
        self.run.scenarios.get(self.selected)
    }

    /// Start of the most recently revealed bin.
    pub fn current_time(&self) -> Option<NaiveDateTime> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.run.grid.bin_start(i))
    }

    /// Revealed baseline points as `(hours since grid start, kW)`.
    pub fn baseline_points(&self) -> Vec<(f64, f64)> {
        self.points(self.run.baseline.load.values())
    }

    /// Revealed points of the selected scenario.
    pub fn scenario_points(&self) -> Vec<(f64, f64)> {
        self.scenario()
            .map(|s| self.points(s.schedule.load.values()))
            .unwrap_or_default()
    }

    /// Share of the selected cap used in the latest revealed bin.
    pub fn cap_utilisation(&self) -> f64 {
        match (self.scenario(), self.cursor.checked_sub(1)) {
            (Some(s), Some(i)) if s.depot_power_cap_kw > 0.0 => {
                s.schedule.load.kw(i) / s.depot_power_cap_kw
            }
            _ => 0.0,
        }
    }

    fn points(&self, values: &[f64]) -> Vec<(f64, f64)> {
        let bin_hours = self.run.grid.bin_hours();
        values
            .iter()
            .take(self.cursor)
            .enumerate()
            .map(|(i, &kw)| (i as f64 * bin_hours, kw))
            .collect()
    }
}
