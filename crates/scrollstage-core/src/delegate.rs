//! Inner-scroll delegate
//!
//! Decides whether an intent belongs to the active section's own scrollable
//! content or may move the page to the next section.

use crate::gesture::Intent;
use crate::section::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// Let the section scroll its own content; no index change
    ConsumeLocally,
    AllowTransition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnerScrollDelegate {
    /// Pixels of slack when testing for the bottom edge
    tolerance: f32,
}

impl Default for InnerScrollDelegate {
    fn default() -> Self {
        Self { tolerance: 1.0 }
    }
}

impl InnerScrollDelegate {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn decide(&self, active: &Section, intent: Intent, is_transitioning: bool) -> Delegation {
        if !active.has_inner_overflow() {
            return Delegation::AllowTransition;
        }
        if is_transitioning {
            return Delegation::ConsumeLocally;
        }

        let extent = &active.extent;
        let at_edge = match intent {
            Intent::Advance => extent.at_bottom(self.tolerance),
            Intent::Retreat => extent.at_top(),
            Intent::Ignore => return Delegation::ConsumeLocally,
        };

        if at_edge {
            Delegation::AllowTransition
        } else {
            Delegation::ConsumeLocally
        }
    }

    /// Navigation flags for the section at `index` of `count`
    ///
    /// A section that fits its slot may move in any direction that has a
    /// neighbour; one with inner overflow only from the matching edge.
    pub fn flags(&self, active: &Section, index: usize, count: usize) -> (bool, bool) {
        let has_next = index + 1 < count;
        let has_previous = index > 0;

        if !active.has_inner_overflow() {
            return (has_next, has_previous);
        }

        (
            has_next && active.extent.at_bottom(self.tolerance),
            has_previous && active.extent.at_top(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Geometry, ScrollExtent, SectionId};

    fn section(extent: ScrollExtent) -> Section {
        Section {
            id: SectionId { arena: 0, slot: 0 },
            extent,
            geometry: Geometry::default(),
            disabled: false,
            overflow_auto: true,
            variant: None,
        }
    }

    #[test]
    fn test_fitting_section_always_allows() {
        let delegate = InnerScrollDelegate::default();
        let fits = section(ScrollExtent::fitting(500.0));
        assert_eq!(delegate.decide(&fits, Intent::Advance, false), Delegation::AllowTransition);
        assert_eq!(delegate.decide(&fits, Intent::Retreat, true), Delegation::AllowTransition);
    }

    #[test]
    fn test_overflow_consumes_until_bottom() {
        let delegate = InnerScrollDelegate::default();
        let top = section(ScrollExtent::new(0.0, 1000.0, 500.0));
        assert_eq!(delegate.decide(&top, Intent::Advance, false), Delegation::ConsumeLocally);
        assert_eq!(delegate.decide(&top, Intent::Retreat, false), Delegation::AllowTransition);

        let middle = section(ScrollExtent::new(250.0, 1000.0, 500.0));
        assert_eq!(delegate.decide(&middle, Intent::Advance, false), Delegation::ConsumeLocally);
        assert_eq!(delegate.decide(&middle, Intent::Retreat, false), Delegation::ConsumeLocally);

        let bottom = section(ScrollExtent::new(500.0, 1000.0, 500.0));
        assert_eq!(delegate.decide(&bottom, Intent::Advance, false), Delegation::AllowTransition);
        assert_eq!(delegate.decide(&bottom, Intent::Retreat, false), Delegation::ConsumeLocally);

        // Sub-pixel rounding from the host
        let almost = section(ScrollExtent::new(499.2, 1000.0, 500.0));
        assert_eq!(delegate.decide(&almost, Intent::Advance, false), Delegation::AllowTransition);
    }

    #[test]
    fn test_transitioning_overflow_consumes() {
        let delegate = InnerScrollDelegate::default();
        let bottom = section(ScrollExtent::new(500.0, 1000.0, 500.0));
        assert_eq!(delegate.decide(&bottom, Intent::Advance, true), Delegation::ConsumeLocally);
    }

    #[test]
    fn test_flags() {
        let delegate = InnerScrollDelegate::default();
        let fits = section(ScrollExtent::fitting(500.0));
        assert_eq!(delegate.flags(&fits, 0, 5), (true, false));
        assert_eq!(delegate.flags(&fits, 2, 5), (true, true));
        assert_eq!(delegate.flags(&fits, 4, 5), (false, true));
        assert_eq!(delegate.flags(&fits, 0, 1), (false, false));

        let tall_top = section(ScrollExtent::new(0.0, 1000.0, 500.0));
        assert_eq!(delegate.flags(&tall_top, 2, 5), (false, true));
        let tall_bottom = section(ScrollExtent::new(500.0, 1000.0, 500.0));
        assert_eq!(delegate.flags(&tall_bottom, 2, 5), (true, false));
    }
}
