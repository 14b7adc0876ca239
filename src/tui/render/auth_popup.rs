use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_fixed;

const POPUP_W: u16 = 44;
const POPUP_H: u16 = 8;
/// Longest run of mask characters shown
const MAX_MASK: usize = 30;

/// Password modal. The input is masked; its length is all that shows.
pub fn render_auth_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.auth else {
        return;
    };
    let popup = centered_fixed(POPUP_W, POPUP_H, area);
    frame.render_widget(Clear, popup);

    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let reason = if prompt.pending.is_some() {
        " Log in to save this change."
    } else {
        " Log in to edit the dashboard."
    };
    let mask = "\u{2022}".repeat(prompt.input.text().chars().count().min(MAX_MASK));

    let mut lines = vec![
        Line::from(Span::styled(reason, text_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(mask, Style::default().fg(app.theme.text_bright).bg(bg)),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]),
        Line::from(""),
    ];
    match prompt.error {
        Some(error) => lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(app.theme.red).bg(bg),
        ))),
        None => lines.push(Line::from(Span::styled(" Enter submit  Esc cancel", dim))),
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.cursor_border).bg(bg))
        .title(Span::styled(
            " Password required ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
