//! Terminal dashboard replaying a finished depot run.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Playback state.
pub mod runtime;
mod style;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::sim::compare::DepotRun;
use runtime::App;

/// Raw-mode alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn open() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        // From here on Drop undoes both steps
        let session = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        };
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Launches the dashboard for `run` and blocks until the user quits.
///
/// # Errors
///
/// Returns an `io::Error` if the terminal cannot be set up or drawn.
pub fn run(run: DepotRun) -> io::Result<()> {
    let mut session = TerminalSession::open()?;
    let mut app = App::new(run);
    event_loop(&mut session.terminal, &mut app)
}

/// Draws, waits for input until the next tick is due, then advances playback.
fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    while !app.quit {
        terminal.draw(|frame| layout::render(frame, app))?;

        let interval = Duration::from_millis(app.tick_interval_ms());
        let wait = (app.last_tick + interval).saturating_duration_since(Instant::now());
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                controls::apply(app, controls::action_for(key));
            }
        }

        if app.last_tick.elapsed() >= interval {
            if !app.paused {
                app.tick();
            }
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
