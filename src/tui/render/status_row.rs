use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::todo::Priority;
use crate::tui::app::{App, Mode};

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let fill = Style::default().bg(bg);
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(message) = &app.status_message {
                spans.push(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ));
            }
            push_right_hint(&mut spans, "a add  L login  ? help ", width, fill, hint_style);
            Line::from(spans)
        }
        Mode::Edit => {
            // New task prompt: + !medium text▌
            let (text, priority) = app
                .add
                .as_ref()
                .map_or(("", Priority::default()), |a| (a.input.text(), a.priority));
            let mut spans = vec![
                Span::styled(
                    format!(" + !{} ", priority.as_str()),
                    Style::default().fg(app.theme.priority_color(priority)).bg(bg),
                ),
                Span::styled(
                    text.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ];
            push_right_hint(
                &mut spans,
                "Tab priority  Enter add  Esc cancel ",
                width,
                fill,
                hint_style,
            );
            Line::from(spans)
        }
        Mode::Confirm => {
            let text = app.confirm.as_ref().map_or("", |c| c.text.as_str());
            let mut spans = vec![Span::styled(
                format!(" Delete \"{}\"?", text),
                Style::default().fg(app.theme.red).bg(bg),
            )];
            push_right_hint(&mut spans, "y delete  n cancel ", width, fill, hint_style);
            Line::from(spans)
        }
        Mode::Auth => {
            let mut spans = vec![Span::styled(
                " Password required",
                Style::default().fg(app.theme.yellow).bg(bg),
            )];
            push_right_hint(&mut spans, "Enter submit  Esc cancel ", width, fill, hint_style);
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(fill);
    frame.render_widget(paragraph, area);
}
