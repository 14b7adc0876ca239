pub mod auth_popup;
pub mod calendar_view;
pub mod help_overlay;
pub mod helpers;
pub mod status_row;
pub mod todo_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};
use helpers::spans_width;

/// Width of the calendar pane: seven 5-cell columns plus borders
pub const CALENDAR_WIDTH: u16 = 37;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | calendar + list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CALENDAR_WIDTH), Constraint::Min(10)])
        .split(chunks[1]);
    calendar_view::render_calendar(frame, app, panes[0]);
    todo_view::render_todo_list(frame, app, panes[1]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    if app.mode == Mode::Auth {
        auth_popup::render_auth_popup(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Site name on the left, session state on the right
fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(
            format!(" {}", app.site_name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{00B7} Dashboard", Style::default().fg(app.theme.dim).bg(bg)),
    ];

    let session = if app.gate.is_authenticated() {
        Span::styled(
            "\u{25CF} admin ",
            Style::default().fg(app.theme.green).bg(bg),
        )
    } else {
        Span::styled("locked ", Style::default().fg(app.theme.dim).bg(bg))
    };
    let used = spans_width(&spans) + spans_width(std::slice::from_ref(&session));
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(session);
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::test_helpers::render_app;
    use crate::tui::app::testing::*;

    #[test]
    fn dashboard_shows_both_panes() {
        let mut app = sample_app(true);
        let screen = render_app(&mut app);
        assert!(screen.contains("Test Site"));
        assert!(screen.contains("admin"));
        assert!(screen.contains("October 2026"));
        assert!(screen.contains("All tasks"));
        assert!(screen.contains("Buy milk"));
    }

    #[test]
    fn header_shows_locked_without_session() {
        let mut app = sample_app(false);
        let screen = render_app(&mut app);
        let header = screen.lines().next().unwrap();
        assert!(header.contains("locked"));
        assert!(!header.contains("admin"));
    }
}
