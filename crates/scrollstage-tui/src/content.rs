//! Section content laid out for a given terminal width

use unicode_width::UnicodeWidthStr;

use scrollstage_core::DeckSection;

/// Rows taken by the carousel strip (border, items, border)
pub const CAROUSEL_HEIGHT: u16 = 3;

/// One section's text, wrapped to the current width
#[derive(Debug, Clone, Default)]
pub struct SectionContent {
    pub title: String,
    /// Wrapped body lines
    pub lines: Vec<String>,
    pub carousel: Vec<String>,
}

impl SectionContent {
    pub fn layout(section: &DeckSection, width: u16) -> Self {
        Self {
            title: section.title.clone(),
            lines: wrap_text(&section.body, width as usize),
            carousel: section.carousel.clone(),
        }
    }

    pub fn has_carousel(&self) -> bool {
        !self.carousel.is_empty()
    }

    /// Total height in rows: title, gap, body and the optional strip
    pub fn height(&self) -> u16 {
        let strip = if self.has_carousel() { CAROUSEL_HEIGHT + 1 } else { 0 };
        (self.lines.len() as u16).saturating_add(2).saturating_add(strip)
    }

    /// Row of the carousel strip inside the content, if any
    pub fn carousel_row(&self) -> Option<u16> {
        self.has_carousel()
            .then(|| (self.lines.len() as u16).saturating_add(3))
    }
}

/// Greedy word wrap measured in terminal cells
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.trim_end().lines() {
        if paragraph.trim().is_empty() {
            out.push(String::new());
            continue;
        }

        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let needed = if line.is_empty() { word_width } else { line_width + 1 + word_width };

            if needed > width && !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width > width {
                // Hard-break words wider than the line
                for ch in word.chars() {
                    let ch_width = ch.to_string().width();
                    if line_width + ch_width > width && !line.is_empty() {
                        out.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(ch);
                    line_width += ch_width;
                }
                continue;
            }
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        if !line.is_empty() {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_counts_wide_chars() {
        // Each CJK character is two cells
        assert_eq!(wrap_text("漢字 漢字", 4), vec!["漢字", "漢字"]);
    }

    #[test]
    fn test_height_includes_carousel() {
        let section = DeckSection {
            title: "Works".into(),
            body: "line one\nline two".into(),
            variant: None,
            disabled: false,
            overflow_auto: true,
            carousel: vec!["a".into(), "b".into()],
        };
        let content = SectionContent::layout(&section, 40);
        assert_eq!(content.lines.len(), 2);
        assert_eq!(content.height(), 2 + 2 + 4);
        assert_eq!(content.carousel_row(), Some(5));
    }
}
