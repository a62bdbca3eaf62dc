//! L4 Atomic Layer: Duration helpers over the animation settings

use std::time::Duration;

pub use crate::config::{ScrollerConfig, SmoothScrollConfig};

/// Extension trait for SmoothScrollConfig with utility methods
pub trait SmoothScrollConfigExt {
    /// Get animation duration as Duration
    fn animation_duration(&self) -> Duration;

    /// Get tick duration for animation FPS
    fn animation_tick_duration(&self) -> Duration;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;
}

impl SmoothScrollConfigExt for SmoothScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

/// Section transition timing
pub trait ScrollerConfigExt {
    fn transition_duration(&self) -> Duration;
}

impl ScrollerConfigExt for ScrollerConfig {
    #[inline]
    fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}
