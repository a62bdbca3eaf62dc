//! Deck files: the ordered sections a host renders
//!
//! ```toml
//! title = "Studio"
//!
//! [[section]]
//! title = "Intro"
//! variant = "dark"
//! body = """..."""
//! carousel = ["one", "two"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::section::{SectionSpec, VisualVariant};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "section")]
    pub sections: Vec<DeckSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSection {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variant: Option<VisualVariant>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub overflow_auto: bool,
    /// Items of a horizontally scrollable strip at the bottom of the section
    #[serde(default)]
    pub carousel: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl DeckSection {
    /// Registration spec before layout; extent and geometry come from the host
    pub fn spec(&self) -> SectionSpec {
        SectionSpec {
            disabled: self.disabled,
            overflow_auto: self.overflow_auto,
            variant: self.variant,
            ..SectionSpec::default()
        }
    }
}

impl Deck {
    pub fn parse(content: &str) -> Result<Self> {
        let deck: Deck = toml::from_str(content).map_err(|e| Error::Deck(e.to_string()))?;
        if deck.sections.is_empty() {
            return Err(Error::EmptyDeck);
        }
        Ok(deck)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let deck = Self::parse(&content)?;
        tracing::info!(path = %path.display(), sections = deck.sections.len(), "Deck loaded");
        Ok(deck)
    }

    /// Built-in studio deck
    pub fn demo() -> Self {
        // The embedded deck is covered by tests
        Self::parse(DEMO_DECK).unwrap_or_else(|_| Deck {
            title: None,
            sections: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

const DEMO_DECK: &str = r#"
title = "North Pier Studio"

[[section]]
title = "We build quiet, fast websites"
variant = "dark"
body = """
North Pier is a small design and engineering studio.

Scroll, swipe (drag with the mouse) or use the arrow keys
to move between sections.
"""

[[section]]
title = "Selected works"
variant = "light"
body = """
Harbour Museum - identity and collection site
Kelp & Co - e-commerce relaunch
Tidewater Records - catalogue and streaming pages
Lumen Festival - programme, tickets and live schedule

Drag sideways across the strip below to browse.
"""
carousel = ["Harbour Museum", "Kelp & Co", "Tidewater Records", "Lumen Festival", "Saltmarsh Books"]

[[section]]
title = "How we work"
variant = "light"
body = """
1. Listen
We start with a week of interviews, analytics and content audits.
Nothing gets drawn before we understand who the site is for.

2. Sketch
Low-fidelity layouts, tested with real content, never lorem ipsum.
We keep sketching until the structure survives a hostile read.

3. Build
Static-first, progressively enhanced, measured on slow phones.
Every page ships with a performance budget and an accessibility pass.

4. Tend
Sites are gardens. We stay on retainer for content, fixes and care.
Monthly reports cover speed, errors and what visitors actually read.

5. Hand over
Documentation, training and a clean repository.
You own everything we make, including the design files.

6. Keep in touch
We check in twice a year, even when nothing is broken.
Most of our work comes from clients we have had for a decade.

This section is taller than most terminals: it scrolls on its own
before the page moves on.
"""

[[section]]
title = "News"
variant = "dark"
body = """
2026-09 - Harbour Museum site wins a regional design award
2026-06 - We moved to the old ferry terminal, come say hello
2026-03 - Open-sourcing our section scroller
"""

[[section]]
title = "Contact"
variant = "light"
body = """
hello@northpier.example
+00 000 000 000

Pier 4, Old Ferry Terminal
"""
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_deck_parses() {
        let deck = Deck::parse(DEMO_DECK).unwrap();
        assert_eq!(deck.len(), 5);
        assert_eq!(deck.sections[0].variant, Some(VisualVariant::Dark));
        assert_eq!(deck.sections[1].carousel.len(), 5);
        assert!(deck.sections.iter().all(|s| s.overflow_auto && !s.disabled));
        assert_eq!(Deck::demo(), deck);
    }

    #[test]
    fn test_section_defaults() {
        let deck = Deck::parse(
            r#"
            [[section]]
            title = "Only"
            disabled = true
            overflow_auto = false
            "#,
        )
        .unwrap();
        let spec = deck.sections[0].spec();
        assert!(spec.disabled);
        assert!(!spec.overflow_auto);
        assert_eq!(spec.variant, None);
        assert_eq!(deck.title, None);
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(Deck::parse("title = \"x\""), Err(Error::EmptyDeck)));
        assert!(matches!(Deck::parse("[[section]]\nbody = 3"), Err(Error::Deck(_))));
    }
}
