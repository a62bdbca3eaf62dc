//! L3 Molecular Layer: Smooth scroller for native scroll mode
//!
//! Animates the container's line offset with easing and batches rapid
//! scroll input. It only moves the offset while it holds the scroll
//! coordinator's claim; a paged container owning the claim makes it stand
//! down.

use super::config::{SmoothScrollConfig, SmoothScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_u16, progress};
use crate::coordinator::{ScrollCoordinator, ScrollDriver};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Animation start time
    start_ms: u64,
    /// Starting scroll position
    from: u16,
    /// Target scroll position
    to: u16,
    /// Animation duration
    duration_ms: u64,
    /// Easing function
    easing: EasingType,
}

/// Smooth scroll controller
///
/// Call `scroll_by()` / `scroll_to()` on input, then `update()` each frame
/// to get the current interpolated offset.
#[derive(Debug, Clone)]
pub struct SmoothScroller {
    animation: Option<ActiveAnimation>,
    config: SmoothScrollConfig,
    coordinator: ScrollCoordinator,
    /// Current scroll position (always up-to-date)
    current_scroll: u16,
    /// Pending scroll delta for batching multiple scroll events
    pending_delta: i32,
}

impl SmoothScroller {
    pub fn new(config: SmoothScrollConfig, coordinator: ScrollCoordinator) -> Self {
        Self {
            animation: None,
            config,
            coordinator,
            current_scroll: 0,
            pending_delta: 0,
        }
    }

    /// Claim the scroll position, or report that another driver owns it
    fn acquire(&self) -> bool {
        let acquired = self.coordinator.claim(ScrollDriver::SmoothScroll);
        if !acquired {
            tracing::trace!(holder = ?self.coordinator.holder(), "Smooth scroll suppressed");
        }
        acquired
    }

    /// Give the scroll position back, dropping any motion in flight
    pub fn release(&mut self) {
        self.cancel();
        self.coordinator.release(ScrollDriver::SmoothScroll);
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Check if there's pending work (animation or pending delta)
    /// Use this to determine if we need high frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.is_animating() || self.pending_delta != 0
    }

    /// Get the target scroll position (final position after animation)
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Set scroll position immediately (no animation)
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    /// Start a scroll animation to a target position
    ///
    /// If smooth scrolling is disabled, jumps immediately to target.
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16, now_ms: u64) {
        if !self.acquire() {
            return;
        }
        let target = target.min(max_scroll);

        if !self.config.is_smooth() {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        let from = self.current_scroll;
        if from == target {
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start_ms: now_ms,
            from,
            to: target,
            duration_ms: self.config.animation_duration_ms,
            easing: self.config.easing,
        });
    }

    /// Scroll by a delta amount (positive = down, negative = up)
    ///
    /// Multiple scroll events within the same frame are batched together.
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.acquire() {
            return;
        }
        if !self.config.is_smooth() {
            let new_scroll =
                (self.current_scroll as i32 + delta).clamp(0, max_scroll as i32) as u16;
            self.current_scroll = new_scroll;
            self.animation = None;
            return;
        }

        self.pending_delta += delta;
    }

    /// Scroll down by the configured line count
    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll_by(self.config.scroll_lines as i32, max_scroll);
    }

    /// Scroll up by the configured line count
    pub fn scroll_up(&mut self, max_scroll: u16) {
        self.scroll_by(-(self.config.scroll_lines as i32), max_scroll);
    }

    /// Scroll by a full page
    pub fn scroll_page(&mut self, down: bool, viewport_height: u16, max_scroll: u16) {
        let page = viewport_height.max(1) as i32;
        self.scroll_by(if down { page } else { -page }, max_scroll);
    }

    /// Update animation state and return current scroll position
    ///
    /// Call this every frame to advance the animation.
    pub fn update(&mut self, max_scroll: u16, now_ms: u64) -> u16 {
        if self.pending_delta != 0 {
            let target = self.target_scroll();
            let new_target =
                (target as i32 + self.pending_delta).clamp(0, max_scroll as i32) as u16;
            self.pending_delta = 0;

            if new_target != self.current_scroll {
                self.animation = Some(ActiveAnimation {
                    start_ms: now_ms,
                    from: self.current_scroll,
                    to: new_target,
                    duration_ms: self.config.animation_duration_ms,
                    easing: self.config.easing,
                });
            }
        }

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start_ms, now_ms, anim.duration_ms) {
                self.current_scroll = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = progress(anim.start_ms, now_ms, anim.duration_ms);
                let eased_t = anim.easing.apply(t);
                self.current_scroll = lerp_u16(anim.from, anim.to, eased_t).min(max_scroll);
            }
        }

        self.current_scroll
    }

    /// Cancel any active animation and stop at current position
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }
}
