use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::DeckApp;

/// Column of dots, one per section, marking the active one
pub struct ProgressWidget;

impl ProgressWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &DeckApp) {
        let theme = &app.theme;
        let count = app.section_count();
        let top_pad = (area.height as usize).saturating_sub(count * 2) / 2;

        let mut lines: Vec<Line> = vec![Line::from(""); top_pad];
        for index in 0..count {
            let (dot, style) = if index == app.current_index {
                ("●", Style::default().fg(theme.accent))
            } else {
                ("○", Style::default().fg(theme.grey0))
            };
            lines.push(Line::from(Span::styled(format!(" {}", dot), style)));
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}
