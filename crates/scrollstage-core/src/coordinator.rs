//! Scroll coordination
//!
//! The global scroll position has exactly one driver at a time. A paged
//! section container claims it on mount, which marks the container as
//! self-contained; the smooth scroller checks the claim before every move
//! and stands down while someone else holds it.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDriver {
    /// A paged section container, by registry arena
    PageScroller { arena: u32 },
    /// Native-mode smooth scrolling
    SmoothScroll,
}

/// Shared claim over the global scroll position; clones share the claim
#[derive(Debug, Clone, Default)]
pub struct ScrollCoordinator {
    holder: Rc<Cell<Option<ScrollDriver>>>,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the scroll position. Succeeds when free or already held by `driver`.
    pub fn claim(&self, driver: ScrollDriver) -> bool {
        match self.holder.get() {
            None => {
                self.holder.set(Some(driver));
                tracing::trace!(?driver, "Scroll driver claimed");
                true
            }
            Some(current) => current == driver,
        }
    }

    /// Release a claim. Only the holder can release.
    pub fn release(&self, driver: ScrollDriver) -> bool {
        if self.holder.get() == Some(driver) {
            self.holder.set(None);
            tracing::trace!(?driver, "Scroll driver released");
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<ScrollDriver> {
        self.holder.get()
    }

    pub fn is_held_by(&self, driver: ScrollDriver) -> bool {
        self.holder.get() == Some(driver)
    }

    /// A page scroller owns scrolling inside its own container
    pub fn is_self_contained(&self) -> bool {
        matches!(self.holder.get(), Some(ScrollDriver::PageScroller { .. }))
    }
}
