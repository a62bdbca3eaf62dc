use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::DeckApp;

/// Top bar; follows the visual variant of the active section
pub struct HeaderWidget;

impl HeaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &DeckApp) {
        let theme = &app.theme;
        let brand = format!(" {} ", app.deck.title.as_deref().unwrap_or("scrollstage"));
        let section = app
            .deck
            .sections
            .get(app.current_index)
            .map(|s| format!(" {} ", s.title))
            .unwrap_or_default();

        let padding = (area.width as usize).saturating_sub(brand.width() + section.width());
        let line = Line::from(vec![
            Span::styled(
                brand,
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.bg1)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(padding), Style::default().bg(theme.bg1)),
            Span::styled(section, Style::default().fg(theme.fg0).bg(theme.bg1)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
