//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
    Faster,
    Slower,
    NextScenario,
    PrevScenario,
    /// Zero-based scenario index.
    Scenario(usize),
    SkipToEnd,
    Restart,
    None,
}

/// Maps a key event to an action.
///
/// Only [`KeyEventKind::Press`] counts, so terminals reporting releases do
/// not double-fire.
pub fn action_for(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Char('+' | '=') => Action::Faster,
        KeyCode::Char('-') => Action::Slower,
        KeyCode::Tab | KeyCode::Right => Action::NextScenario,
        KeyCode::BackTab | KeyCode::Left => Action::PrevScenario,
        KeyCode::Char(c @ '1'..='9') => Action::Scenario(c as usize - '1' as usize),
        KeyCode::Char('e') => Action::SkipToEnd,
        KeyCode::Char('r') => Action::Restart,
        _ => Action::None,
    }
}

/// Applies `action` to the playback state.
pub fn apply(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.quit = true,
        Action::TogglePause => app.toggle_pause(),
        Action::Faster => app.speed_up(),
        Action::Slower => app.speed_down(),
        Action::NextScenario => app.select_next(),
        Action::PrevScenario => app.select_prev(),
        Action::Scenario(i) => app.select(i),
        Action::SkipToEnd => app.skip_to_end(),
        Action::Restart => app.restart(),
        Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(action_for(press(KeyCode::Char('3'))), Action::Scenario(2));
        assert_eq!(action_for(press(KeyCode::Tab)), Action::NextScenario);
        assert_eq!(action_for(press(KeyCode::Char('x'))), Action::None);
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(action_for(release), Action::None);
    }
}
