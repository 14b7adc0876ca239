use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::todo::TodoItem;
use crate::tui::app::{App, Focus};
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::helpers::spans_width;

/// The filtered task list with its counters in the title
pub fn render_todo_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::List;
    let border = if focused {
        app.theme.cursor_border
    } else {
        app.theme.dim
    };
    let stats = app.todos.stats(&app.calendar.filter, app.today);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            format!(
                " {}  {}/{} done ",
                app.calendar.list_title(),
                stats.completed,
                stats.total
            ),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let inner = block.inner(area);
    let visible = app.visible();

    let lines: Vec<Line> = if visible.is_empty() {
        vec![Line::from(Span::styled(
            " No tasks",
            Style::default().fg(app.theme.dim).bg(bg),
        ))]
    } else {
        let height = usize::from(inner.height.max(1));
        // Keep the cursor row on screen
        let offset = app.list_cursor.saturating_sub(height - 1);
        visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, item)| {
                let selected = focused && i == app.list_cursor;
                task_line(item, selected, usize::from(inner.width), &app.theme)
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// `" [x] text   !high  today"`, the text truncated to fit
fn task_line<'a>(item: &'a TodoItem, selected: bool, width: usize, theme: &Theme) -> Line<'a> {
    let row_bg = if selected {
        theme.cursor_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    let check = if item.completed { " [x] " } else { " [ ] " };
    let text_style = if item.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };

    let tail = vec![
        Span::styled(
            format!("  !{}", item.priority.as_str()),
            base.fg(theme.priority_color(item.priority)),
        ),
        Span::styled(format!("  {} ", item.display_date), base.fg(theme.dim)),
    ];
    let room = width
        .saturating_sub(unicode::display_width(check))
        .saturating_sub(spans_width(&tail));

    let mut spans = vec![
        Span::styled(check, base.fg(theme.dim)),
        Span::styled(unicode::pad_to_width(&item.text, room), text_style),
    ];
    spans.extend(tail);
    Line::from(spans)
}
