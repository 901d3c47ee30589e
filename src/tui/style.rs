//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Baseline load line color.
pub const BASELINE_COLOR: Color = Color::DarkGray;
/// Scenario load line color.
pub const SCENARIO_COLOR: Color = Color::Cyan;
/// Depot cap line color.
pub const CAP_COLOR: Color = Color::Red;
/// Utilisation gauge color when comfortably below the cap (< 70%).
pub const UTIL_LOW: Color = Color::Green;
/// Utilisation gauge color when close to the cap (< 95%).
pub const UTIL_MID: Color = Color::Yellow;
/// Utilisation gauge color at the cap.
pub const UTIL_HIGH: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Unserved-energy warning color.
pub const UNSERVED: Color = Color::Magenta;

/// Returns a color for the share of the cap in use.
pub fn utilisation_color(ratio: f64) -> Color {
    if ratio < 0.7 {
        UTIL_LOW
    } else if ratio < 0.95 {
        UTIL_MID
    } else {
        UTIL_HIGH
    }
}

/// Computes Y-axis bounds from chart series, anchored at zero, with 10% headroom.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let max = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return [0.0, 1.0];
    }
    [0.0, max * 1.1]
}
