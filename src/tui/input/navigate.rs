use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::todo_ops::Filter;
use crate::tui::app::{AddState, App, ConfirmState, Focus, GatedAction, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
            return;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,
        (_, KeyCode::Tab) => {
            app.focus = match app.focus {
                Focus::Calendar => Focus::List,
                Focus::List => Focus::Calendar,
            };
        }
        (_, KeyCode::Char('[')) => app.shift_month(false),
        (_, KeyCode::Char(']')) => app.shift_month(true),
        (_, KeyCode::Char('t')) => {
            app.cursor_day = app.today;
            app.calendar.show_month_of(app.today);
        }
        (_, KeyCode::Char(c @ '1'..='5')) => choose_filter(app, c),
        (_, KeyCode::Char('a')) => {
            app.add = Some(AddState::default());
            app.mode = Mode::Edit;
        }
        (_, KeyCode::Char('L')) => app.toggle_login(),
        _ => match app.focus {
            Focus::Calendar => handle_calendar_key(app, key),
            Focus::List => handle_list_key(app, key),
        },
    }
}

fn choose_filter(app: &mut App, key: char) {
    let filter = match key {
        '1' => Filter::All,
        '2' => Filter::Today,
        // date filter on the day under the calendar cursor
        '3' => {
            app.select_cursor_day();
            return;
        }
        '4' => Filter::Active,
        _ => Filter::Completed,
    };
    app.set_filter(filter);
}

fn handle_calendar_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor_day(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor_day(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor_day(-7),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor_day(7),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.select_cursor_day();
            app.focus = Focus::List;
        }
        KeyCode::Esc => app.set_filter(Filter::All),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible().len();
            if app.list_cursor + 1 < len {
                app.list_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.list_cursor = app.list_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') => app.list_cursor = 0,
        KeyCode::Char('G') => {
            app.list_cursor = app.visible().len().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = cursor_id(app) {
                app.request(GatedAction::Toggle { id });
            }
        }
        KeyCode::Char('d') => {
            if let Some(item) = app.cursor_item() {
                app.confirm = Some(ConfirmState {
                    id: item.id.clone(),
                    text: item.text.clone(),
                });
                app.mode = Mode::Confirm;
            }
        }
        KeyCode::Char('K') => {
            if let Some(id) = cursor_id(app) {
                app.request(GatedAction::Reorder { id, up: true });
            }
        }
        KeyCode::Char('J') => {
            if let Some(id) = cursor_id(app) {
                app.request(GatedAction::Reorder { id, up: false });
            }
        }
        KeyCode::Esc => app.focus = Focus::Calendar,
        _ => {}
    }
}

fn cursor_id(app: &App) -> Option<String> {
    app.cursor_item().map(|t| t.id.clone())
}
