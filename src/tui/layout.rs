//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph};

use super::runtime::App;
use super::style;
use crate::sim::types::total_shortfall_kwh;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // cap gauge
            Constraint::Length(5), // savings panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_cap_gauge(frame, app, chunks[2]);
    render_savings(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: scenario, playback time, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "PLAYING")
    };

    let scenario = app.scenario().map_or("-", |s| s.name.as_str());
    let time = app
        .current_time()
        .map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string());

    let header = Line::from(vec![
        Span::styled(
            " DEPOT-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(scenario, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " ({}/{}) │ {} │ bin {}/{} │ {}ms │ {} {} ",
            app.selected + 1,
            app.run().scenarios.len(),
            time,
            app.cursor,
            app.total_bins(),
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Baseline vs constrained load with the depot cap.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let baseline = app.baseline_points();
    let scenario = app.scenario_points();
    let horizon_h = app.total_bins() as f64 * app.run().grid.bin_hours();
    let x_hi = horizon_h.max(1.0);

    let cap_kw = app.scenario().map_or(0.0, |s| s.depot_power_cap_kw);
    let cap_line = [(0.0, cap_kw), (x_hi, cap_kw)];
    let y_bounds = style::auto_bounds_y(&[baseline.as_slice(), scenario.as_slice(), &cap_line]);

    let datasets = vec![
        Dataset::default()
            .name("Baseline")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::BASELINE_COLOR))
            .data(&baseline),
        Dataset::default()
            .name("Optimised")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::SCENARIO_COLOR))
            .data(&scenario),
        Dataset::default()
            .name("Cap")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(style::CAP_COLOR))
            .data(&cap_line),
    ];

    let start = app.run().grid.start().format("%m-%d %H:%M").to_string();
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Depot Load: Baseline vs Optimised ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("h")
                .bounds([0.0, x_hi])
                .labels(vec![start, format!("+{x_hi:.0}h")]),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.0}", y_bounds[0]),
                    format!("{:.0}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Cap utilisation gauge with an unserved-energy indicator.
fn render_cap_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let ratio = app.cap_utilisation();
    let unserved = app
        .scenario()
        .map_or(0.0, |s| total_shortfall_kwh(&s.schedule.outcomes));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().title(" Cap used ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::utilisation_color(ratio)))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, chunks[0]);

    let (text, color) = if unserved > 0.0 {
        (format!("unserved {unserved:.1} kWh"), style::UNSERVED)
    } else {
        ("all served".to_string(), style::FOOTER_FG)
    };
    let indicator = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(indicator, chunks[1]);
}

/// Baseline and scenario cost figures.
fn render_savings(frame: &mut Frame, app: &App, area: Rect) {
    let base = &app.run().baseline_costs;
    let mut lines = vec![Line::from(format!(
        "  baseline   peak={:>8.1} kW  energy={:>9.2}  demand={:>9.2}  total={:>9.2}",
        base.peak_kw, base.energy_cost, base.demand_charge_cost, base.total_cost,
    ))];
    if let Some(s) = app.scenario() {
        lines.push(Line::from(format!(
            "  optimised  peak={:>8.1} kW  energy={:>9.2}  demand={:>9.2}  total={:>9.2}",
            s.costs.peak_kw, s.costs.energy_cost, s.costs.demand_charge_cost, s.costs.total_cost,
        )));
        lines.push(Line::from(format!(
            "  savings    peak -{:.1}%  cost {:.2} ({:.1}%)",
            s.savings.peak_kw_reduction_pct,
            s.savings.total_cost_savings,
            s.savings.total_cost_savings_pct,
        )));
    }

    let block = Block::default().title(" Savings ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  Tab/1-9:Scenario  e:End  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
