use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, GatedAction, Mode};

/// Typing a new task. Enter adds, Tab cycles the priority, Esc cancels.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let Some(add) = app.add.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.add = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab => add.priority = add.priority.cycle(),
        KeyCode::Enter => {
            let text = add.input.take();
            let priority = add.priority;
            app.add = None;
            app.mode = Mode::Navigate;
            // Blank input closes the line without asking for the password
            if text.trim().is_empty() {
                return;
            }
            let date = app.calendar.selected_date();
            app.request(GatedAction::Add {
                text,
                priority,
                date,
            });
        }
        _ => {
            super::edit_line(&mut add.input, key);
        }
    }
}
