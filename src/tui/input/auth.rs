use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

/// Password modal: Enter submits, Esc cancels, everything else edits the input.
pub(super) fn handle_auth(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_password(),
        KeyCode::Esc => app.cancel_auth(),
        _ => match app.auth.as_mut() {
            Some(prompt) => {
                super::edit_line(&mut prompt.input, key);
            }
            None => app.mode = Mode::Navigate,
        },
    }
}
