//! Section registry
//!
//! Sections register themselves with their container in display order and
//! are addressed by a stable [`SectionId`]. The registry only stores what the
//! orchestrator needs to observe: live scroll extent, layout geometry and the
//! markers read from content.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Stable identity of a registered section: the owning container (arena) and
/// the registration slot inside it. Ordering follows registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId {
    pub arena: u32,
    pub slot: u32,
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.arena, self.slot)
    }
}

/// Header look requested while a section is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualVariant {
    Dark,
    Light,
}

/// Live scroll measurements of a section's own content
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollExtent {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl ScrollExtent {
    pub fn new(scroll_top: f32, scroll_height: f32, client_height: f32) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Content that exactly fills its slot
    pub fn fitting(client_height: f32) -> Self {
        Self::new(0.0, client_height, client_height)
    }

    #[inline]
    pub fn overflows(&self) -> bool {
        self.scroll_height > self.client_height
    }

    #[inline]
    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    #[inline]
    pub fn at_bottom(&self, tolerance: f32) -> bool {
        self.client_height + self.scroll_top >= self.scroll_height - tolerance
    }

    /// Largest meaningful `scroll_top`
    pub fn max_scroll_top(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Position of a section along the scroll axis, in container coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// What a section declares when it registers
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub extent: ScrollExtent,
    pub geometry: Geometry,
    pub disabled: bool,
    /// "overflow-auto" marker; without it measured overflow is not inner scroll
    pub overflow_auto: bool,
    pub variant: Option<VisualVariant>,
}

impl Default for SectionSpec {
    fn default() -> Self {
        Self {
            extent: ScrollExtent::default(),
            geometry: Geometry::default(),
            disabled: false,
            overflow_auto: true,
            variant: None,
        }
    }
}

impl SectionSpec {
    pub fn with_extent(mut self, extent: ScrollExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_variant(mut self, variant: VisualVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn overflow_auto(mut self, overflow_auto: bool) -> Self {
        self.overflow_auto = overflow_auto;
        self
    }
}

/// A registered section
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub extent: ScrollExtent,
    pub geometry: Geometry,
    pub disabled: bool,
    pub overflow_auto: bool,
    pub variant: Option<VisualVariant>,
}

impl Section {
    /// True when the section scrolls its own content before the page moves
    pub fn has_inner_overflow(&self) -> bool {
        self.overflow_auto && self.extent.overflows()
    }
}

/// Ordered sections of one container
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    arena: u32,
    next_slot: u32,
    sections: BTreeMap<SectionId, Section>,
}

impl SectionRegistry {
    pub fn new(arena: u32) -> Self {
        Self {
            arena,
            next_slot: 0,
            sections: BTreeMap::new(),
        }
    }

    pub fn arena(&self) -> u32 {
        self.arena
    }

    /// Register the next section in display order
    pub fn register(&mut self, spec: SectionSpec) -> SectionId {
        let id = SectionId {
            arena: self.arena,
            slot: self.next_slot,
        };
        self.next_slot += 1;
        self.sections.insert(
            id,
            Section {
                id,
                extent: spec.extent,
                geometry: spec.geometry,
                disabled: spec.disabled,
                overflow_auto: spec.overflow_auto,
                variant: spec.variant,
            },
        );
        id
    }

    pub fn deregister(&mut self, id: SectionId) -> Result<Section> {
        self.sections.remove(&id).ok_or(Error::UnknownSection(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(&id)
    }

    /// Section at a display index
    pub fn at(&self, index: usize) -> Option<&Section> {
        self.sections.values().nth(index)
    }

    /// Display index of a section
    pub fn index_of(&self, id: SectionId) -> Option<usize> {
        self.sections.keys().position(|k| *k == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }
}

/// Lay out full-viewport sections top to bottom
///
/// Each section gets a slot at least one viewport tall; content taller than
/// the viewport grows its slot in native mode and overflows it in paged mode.
pub fn stack_layout(content_heights: &[f32], viewport_height: f32) -> Vec<(ScrollExtent, Geometry)> {
    let mut top = 0.0;
    content_heights
        .iter()
        .map(|&content| {
            let content = content.max(0.0);
            let height = content.max(viewport_height);
            let geometry = Geometry::new(top, height);
            top += height;
            (ScrollExtent::new(0.0, content.max(viewport_height), viewport_height), geometry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_is_display_order() {
        let mut registry = SectionRegistry::new(7);
        let a = registry.register(SectionSpec::default());
        let b = registry.register(SectionSpec::default().with_variant(VisualVariant::Dark));
        let c = registry.register(SectionSpec::default());

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.index_of(a), Some(0));
        assert_eq!(registry.index_of(c), Some(2));
        assert_eq!(registry.at(1).map(|s| s.id), Some(b));
        assert_eq!(b.arena, 7);
    }

    #[test]
    fn test_deregister_keeps_remaining_order() {
        let mut registry = SectionRegistry::new(0);
        let a = registry.register(SectionSpec::default());
        let b = registry.register(SectionSpec::default());
        let c = registry.register(SectionSpec::default());

        registry.deregister(b).unwrap();
        assert_eq!(registry.index_of(a), Some(0));
        assert_eq!(registry.index_of(c), Some(1));
        assert!(matches!(registry.deregister(b), Err(Error::UnknownSection(_))));

        // Slots are never reused
        let d = registry.register(SectionSpec::default());
        assert_eq!(d.slot, 3);
    }

    #[test]
    fn test_inner_overflow_needs_marker() {
        let mut registry = SectionRegistry::new(0);
        let tall = ScrollExtent::new(0.0, 1000.0, 500.0);
        let marked = registry.register(SectionSpec::default().with_extent(tall));
        let unmarked = registry.register(SectionSpec::default().with_extent(tall).overflow_auto(false));

        assert!(registry.get(marked).unwrap().has_inner_overflow());
        assert!(!registry.get(unmarked).unwrap().has_inner_overflow());
    }

    #[test]
    fn test_stack_layout() {
        let layout = stack_layout(&[200.0, 1200.0, 500.0], 500.0);
        assert_eq!(layout[0].1, Geometry::new(0.0, 500.0));
        assert!(!layout[0].0.overflows());
        assert_eq!(layout[1].1, Geometry::new(500.0, 1200.0));
        assert_eq!(layout[1].0, ScrollExtent::new(0.0, 1200.0, 500.0));
        assert_eq!(layout[2].1.top, 1700.0);
    }

    #[test]
    fn test_extent_edges() {
        let extent = ScrollExtent::new(499.5, 1000.0, 500.0);
        assert!(extent.at_bottom(1.0));
        assert!(!extent.at_bottom(0.0));
        assert!(!extent.at_top());
        assert_eq!(extent.max_scroll_top(), 500.0);
        assert!(!ScrollExtent::fitting(500.0).overflows());
    }
}
