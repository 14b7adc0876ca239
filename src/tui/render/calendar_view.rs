use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::calendar::{CellKind, DayCell, weekday_labels};
use crate::tui::app::{App, Focus};
use crate::tui::theme::Theme;

/// Month grid: weekday header and six rows of seven 5-cell days
pub fn render_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Calendar;
    let border = if focused {
        app.theme.cursor_border
    } else {
        app.theme.dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            format!(" {} ", app.calendar.month.title()),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let grid = app
        .calendar
        .grid(app.today, |date| app.todos.has_tasks_on(date));

    let mut lines: Vec<Line> = Vec::with_capacity(8);
    let header: Vec<Span> = weekday_labels(app.calendar.week_start)
        .iter()
        .map(|label| {
            Span::styled(
                format!("{:>3}  ", label),
                Style::default().fg(app.theme.dim).bg(bg),
            )
        })
        .collect();
    lines.push(Line::from(header));

    for week in grid.chunks(7) {
        let spans: Vec<Span> = week
            .iter()
            .flat_map(|cell| {
                let cursor = focused && cell.date == app.cursor_day;
                day_spans(cell, cursor, &app.theme)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" filter: {}", app.calendar.filter.name()),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// `" 19• "`: day number, task marker, gap
fn day_spans(cell: &DayCell, cursor: bool, theme: &Theme) -> [Span<'static>; 3] {
    let bg = theme.background;
    let mut day_style = match cell.kind {
        CellKind::OtherMonth => Style::default().fg(theme.dim).bg(bg),
        CellKind::Today => Style::default()
            .fg(theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
        CellKind::Selected => Style::default()
            .fg(theme.text_bright)
            .bg(theme.selected_day_bg),
        CellKind::Normal => Style::default().fg(theme.text).bg(bg),
    };
    if cursor {
        day_style = day_style
            .bg(theme.cursor_bg)
            .add_modifier(Modifier::UNDERLINED);
    }
    let marker_color = if cell.kind == CellKind::OtherMonth {
        theme.dim
    } else {
        theme.cyan
    };
    let marker = if cell.has_tasks { "\u{2022}" } else { " " };
    [
        Span::styled(format!("{:>3}", cell.date.day()), day_style),
        Span::styled(marker, Style::default().fg(marker_color).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ]
}
