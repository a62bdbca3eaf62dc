use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::{DeckApp, Slice};
use crate::content::SectionContent;
use crate::theme::Theme;

pub struct SectionWidget;

impl SectionWidget {
    /// Draw every visible slice of the deck into the body
    pub fn render(frame: &mut Frame, area: Rect, app: &DeckApp, slices: &[Slice]) {
        for slice in slices {
            let Some(content) = app.contents.get(slice.index) else {
                continue;
            };
            let section = &app.deck.sections[slice.index];
            let theme = section.variant.map(Theme::for_variant).unwrap_or(app.theme);
            let selected = app.carousel.get(slice.index).copied().unwrap_or(0);

            let slice_area = Rect::new(area.x, area.y + slice.y, area.width, slice.height);
            let block = Block::default().style(Style::default().bg(theme.bg0).fg(theme.fg0));
            let inner = Rect::new(
                slice_area.x.saturating_add(2),
                slice_area.y,
                slice_area.width.saturating_sub(4),
                slice_area.height,
            );
            frame.render_widget(block, slice_area);

            let text = Self::build_text(content, &theme, section.disabled, selected);
            let paragraph = Paragraph::new(text).scroll((slice.scroll, 0));
            frame.render_widget(paragraph, inner);
        }
    }

    fn build_text<'a>(content: &'a SectionContent, theme: &Theme, disabled: bool, selected: usize) -> Text<'a> {
        let mut title = vec![Span::styled(
            content.title.as_str(),
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        )];
        if disabled {
            title.push(Span::styled("  [locked]", Style::default().fg(theme.disabled)));
        }

        let mut lines = vec![Line::from(title), Line::from("")];
        lines.extend(
            content
                .lines
                .iter()
                .map(|line| Line::from(Span::raw(line.as_str()))),
        );

        if content.has_carousel() {
            lines.push(Line::from(""));
            lines.extend(Self::carousel_lines(&content.carousel, theme, selected));
        }
        Text::from(lines)
    }

    /// Three-row strip: rule, items, position
    fn carousel_lines<'a>(items: &'a [String], theme: &Theme, selected: usize) -> Vec<Line<'a>> {
        let rule = Style::default().fg(theme.grey0);
        let mut spans = Vec::new();
        if selected > 0 {
            spans.push(Span::styled("‹ ", rule));
        }
        for (i, item) in items.iter().enumerate().skip(selected) {
            let style = if i == selected {
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg0).bg(theme.selection)
            };
            spans.push(Span::styled(format!(" {} ", item), style));
            spans.push(Span::raw(" "));
        }

        vec![
            Line::from(Span::styled("─".repeat(24), rule)),
            Line::from(spans),
            Line::from(Span::styled(
                format!("{}/{}  drag or scroll sideways", selected + 1, items.len()),
                Style::default().fg(theme.grey1),
            )),
        ]
    }
}
