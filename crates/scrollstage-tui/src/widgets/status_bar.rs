use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use scrollstage_core::ScrollMode;

use crate::app::DeckApp;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &DeckApp) {
        let theme = &app.theme;
        let mode_str = match app.mode() {
            ScrollMode::Paged => "PAGED",
            ScrollMode::Native => "NATIVE",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", mode_str, msg)
        } else {
            let moving = if app.orchestrator.is_transitioning() {
                " | moving"
            } else {
                ""
            };
            format!(
                " {} | {}/{}{}",
                mode_str,
                app.current_index + 1,
                app.section_count(),
                moving
            )
        };

        let help_hint = " q:quit j/k:section g/G:top/end h/l:carousel n:mode ";
        let padding_len = (area.width as usize).saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
