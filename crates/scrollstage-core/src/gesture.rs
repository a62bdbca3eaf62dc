//! Gesture normalizer
//!
//! Turns raw wheel, touch and keyboard input into a single discrete
//! [`Intent`]. Classification is pure: throttle timestamps and touch anchors
//! are owned by the caller and passed in, and any updated anchor is handed
//! back in the result.
//!
//! Sign convention: a positive wheel `delta_y` and a finger moving up the
//! screen (Y decreasing between consecutive moves) both mean [`Intent::Advance`].

use serde::{Deserialize, Serialize};

use crate::config::ScrollerConfig;

/// Discrete navigation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Advance,
    Retreat,
    Ignore,
}

impl Intent {
    fn from_sign(delta: f32) -> Self {
        if delta > 0.0 {
            Intent::Advance
        } else if delta < 0.0 {
            Intent::Retreat
        } else {
            Intent::Ignore
        }
    }

    /// Section index step for this intent
    pub fn step(&self) -> isize {
        match self {
            Intent::Advance => 1,
            Intent::Retreat => -1,
            Intent::Ignore => 0,
        }
    }
}

/// Keys the scroller reacts to, named after DOM `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    #[serde(other)]
    Other,
}

/// Input source of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Wheel,
    Touch,
    Key,
}

/// Raw input as reported by the host, with its timestamp in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Wheel {
        delta_y: f32,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        /// Fired inside a designated alternate scroll container
        #[serde(default)]
        in_alt_container: bool,
        at_ms: u64,
    },
    TouchStart {
        x: f32,
        y: f32,
        at_ms: u64,
    },
    TouchMove {
        x: f32,
        y: f32,
        /// Fired inside a nested horizontally scrollable widget
        #[serde(default)]
        in_horizontal_area: bool,
        at_ms: u64,
    },
    TouchEnd {
        at_ms: u64,
    },
    Key {
        key: NavKey,
        at_ms: u64,
    },
}

impl InputEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            InputEvent::Wheel { at_ms, .. }
            | InputEvent::TouchStart { at_ms, .. }
            | InputEvent::TouchMove { at_ms, .. }
            | InputEvent::TouchEnd { at_ms }
            | InputEvent::Key { at_ms, .. } => *at_ms,
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            InputEvent::Wheel { .. } => GestureKind::Wheel,
            InputEvent::TouchStart { .. }
            | InputEvent::TouchMove { .. }
            | InputEvent::TouchEnd { .. } => GestureKind::Touch,
            InputEvent::Key { .. } => GestureKind::Key,
        }
    }

    /// Shorthand for a plain wheel notch
    pub fn wheel(delta_y: f32, at_ms: u64) -> Self {
        InputEvent::Wheel {
            delta_y,
            ctrl: false,
            meta: false,
            in_alt_container: false,
            at_ms,
        }
    }

    pub fn key(key: NavKey, at_ms: u64) -> Self {
        InputEvent::Key { key, at_ms }
    }

    pub fn touch_start(x: f32, y: f32, at_ms: u64) -> Self {
        InputEvent::TouchStart { x, y, at_ms }
    }

    pub fn touch_move(x: f32, y: f32, at_ms: u64) -> Self {
        InputEvent::TouchMove {
            x,
            y,
            in_horizontal_area: false,
            at_ms,
        }
    }
}

/// Touch bookkeeping the caller keeps between events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchTrack {
    /// Touch-start point
    pub start: Option<(f32, f32)>,
    /// Y of the previous move
    pub anchor: Option<f32>,
}

/// Result of classifying a touch move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchOutcome {
    pub intent: Intent,
    /// New value for [`TouchTrack::anchor`]
    pub anchor: Option<f32>,
}

/// Flags keyboard classification depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub can_advance: bool,
    pub can_retreat: bool,
    pub is_transitioning: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureNormalizer {
    wheel_throttle_ms: u64,
    wheel_noise_threshold: f32,
    touch_noise_threshold: f32,
}

impl Default for GestureNormalizer {
    fn default() -> Self {
        Self::new(&ScrollerConfig::default())
    }
}

impl GestureNormalizer {
    pub fn new(config: &ScrollerConfig) -> Self {
        Self {
            wheel_throttle_ms: config.wheel_throttle_ms,
            wheel_noise_threshold: config.wheel_noise_threshold,
            touch_noise_threshold: config.touch_noise_threshold,
        }
    }

    /// Whether `at_ms` falls inside the throttle window opened at `last_transition_at`
    pub fn is_throttled(&self, at_ms: u64, last_transition_at: Option<u64>) -> bool {
        match last_transition_at {
            Some(last) => at_ms.saturating_sub(last) < self.wheel_throttle_ms,
            None => false,
        }
    }

    pub fn classify_wheel(
        &self,
        delta_y: f32,
        modifier_held: bool,
        in_alt_container: bool,
        at_ms: u64,
        last_transition_at: Option<u64>,
    ) -> Intent {
        // ctrl/meta + wheel is browser zoom
        if modifier_held || in_alt_container {
            return Intent::Ignore;
        }
        if delta_y.abs() <= self.wheel_noise_threshold {
            return Intent::Ignore;
        }
        if self.is_throttled(at_ms, last_transition_at) {
            return Intent::Ignore;
        }
        Intent::from_sign(delta_y)
    }

    /// Track for a fresh touch
    pub fn touch_start(&self, x: f32, y: f32) -> TouchTrack {
        TouchTrack {
            start: Some((x, y)),
            anchor: None,
        }
    }

    pub fn classify_touch_move(
        &self,
        track: &TouchTrack,
        x: f32,
        y: f32,
        in_horizontal_area: bool,
    ) -> TouchOutcome {
        if in_horizontal_area {
            if let Some((x0, y0)) = track.start {
                let (dx, dy) = (x - x0, y - y0);
                if dx.abs() > dy.abs() {
                    // Horizontal carousel drag, not ours
                    return TouchOutcome {
                        intent: Intent::Ignore,
                        anchor: track.anchor,
                    };
                }
            }
        }

        let Some(previous) = track.anchor else {
            return TouchOutcome {
                intent: Intent::Ignore,
                anchor: Some(y),
            };
        };

        let delta = previous - y;
        if delta.abs() <= self.touch_noise_threshold {
            return TouchOutcome {
                intent: Intent::Ignore,
                anchor: None,
            };
        }

        TouchOutcome {
            intent: Intent::from_sign(delta),
            anchor: Some(y),
        }
    }

    pub fn classify_key(&self, key: NavKey, context: KeyContext) -> Intent {
        if context.is_transitioning {
            return Intent::Ignore;
        }
        match key {
            NavKey::ArrowDown if context.can_advance => Intent::Advance,
            NavKey::ArrowUp if context.can_retreat => Intent::Retreat,
            _ => Intent::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> GestureNormalizer {
        GestureNormalizer::default()
    }

    #[test]
    fn test_wheel_direction_and_noise() {
        let n = normalizer();
        assert_eq!(n.classify_wheel(120.0, false, false, 0, None), Intent::Advance);
        assert_eq!(n.classify_wheel(-120.0, false, false, 0, None), Intent::Retreat);
        assert_eq!(n.classify_wheel(1.0, false, false, 0, None), Intent::Ignore);
        assert_eq!(n.classify_wheel(-0.5, false, false, 0, None), Intent::Ignore);
        assert_eq!(n.classify_wheel(1.5, false, false, 0, None), Intent::Advance);
    }

    #[test]
    fn test_wheel_zoom_and_alt_container_ignored() {
        let n = normalizer();
        assert_eq!(n.classify_wheel(120.0, true, false, 0, None), Intent::Ignore);
        assert_eq!(n.classify_wheel(120.0, false, true, 0, None), Intent::Ignore);
    }

    #[test]
    fn test_wheel_throttle_window() {
        let n = normalizer();
        assert_eq!(n.classify_wheel(120.0, false, false, 1_100, Some(1_000)), Intent::Ignore);
        assert_eq!(n.classify_wheel(120.0, false, false, 1_499, Some(1_000)), Intent::Ignore);
        assert_eq!(n.classify_wheel(120.0, false, false, 1_500, Some(1_000)), Intent::Advance);
        assert_eq!(n.classify_wheel(120.0, false, false, 1_600, Some(1_000)), Intent::Advance);
    }

    #[test]
    fn test_first_touch_move_seeds_anchor() {
        let n = normalizer();
        let track = n.touch_start(100.0, 500.0);
        let outcome = n.classify_touch_move(&track, 100.0, 480.0, false);
        assert_eq!(outcome.intent, Intent::Ignore);
        assert_eq!(outcome.anchor, Some(480.0));
    }

    #[test]
    fn test_touch_compares_previous_move_not_start() {
        let n = normalizer();
        let track = TouchTrack {
            start: Some((100.0, 500.0)),
            anchor: Some(480.0),
        };
        // Finger moves up: advance
        let up = n.classify_touch_move(&track, 100.0, 440.0, false);
        assert_eq!(up.intent, Intent::Advance);
        assert_eq!(up.anchor, Some(440.0));

        // Still above the start point, but below the previous move: retreat
        let down = n.classify_touch_move(&track, 100.0, 490.0, false);
        assert_eq!(down.intent, Intent::Retreat);
    }

    #[test]
    fn test_touch_without_movement_is_ambiguous() {
        let n = normalizer();
        let track = TouchTrack {
            start: Some((0.0, 300.0)),
            anchor: Some(300.0),
        };
        let outcome = n.classify_touch_move(&track, 0.0, 300.0, false);
        assert_eq!(outcome.intent, Intent::Ignore);
        assert_eq!(outcome.anchor, None);
    }

    #[test]
    fn test_horizontal_drag_in_carousel_ignored() {
        let n = normalizer();
        let track = TouchTrack {
            start: Some((200.0, 300.0)),
            anchor: Some(298.0),
        };
        let outcome = n.classify_touch_move(&track, 120.0, 290.0, true);
        assert_eq!(outcome.intent, Intent::Ignore);
        assert_eq!(outcome.anchor, Some(298.0));

        // Same motion outside the carousel is a vertical gesture
        let outside = n.classify_touch_move(&track, 120.0, 290.0, false);
        assert_eq!(outside.intent, Intent::Advance);

        // Mostly vertical motion inside the carousel still counts
        let vertical = n.classify_touch_move(&track, 205.0, 250.0, true);
        assert_eq!(vertical.intent, Intent::Advance);
    }

    #[test]
    fn test_keys_respect_flags() {
        let n = normalizer();
        let all = KeyContext {
            can_advance: true,
            can_retreat: true,
            is_transitioning: false,
        };
        assert_eq!(n.classify_key(NavKey::ArrowDown, all), Intent::Advance);
        assert_eq!(n.classify_key(NavKey::ArrowUp, all), Intent::Retreat);
        assert_eq!(n.classify_key(NavKey::Other, all), Intent::Ignore);

        let at_end = KeyContext {
            can_advance: false,
            ..all
        };
        assert_eq!(n.classify_key(NavKey::ArrowDown, at_end), Intent::Ignore);

        let busy = KeyContext {
            is_transitioning: true,
            ..all
        };
        assert_eq!(n.classify_key(NavKey::ArrowUp, busy), Intent::Ignore);
    }

    #[test]
    fn test_input_event_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"kind":"key","key":"PageDown","at_ms":10}"#).unwrap();
        assert_eq!(event, InputEvent::key(NavKey::Other, 10));
        assert_eq!(event.kind(), GestureKind::Key);

        let wheel: InputEvent =
            serde_json::from_str(r#"{"kind":"wheel","delta_y":120,"at_ms":5}"#).unwrap();
        assert_eq!(wheel, InputEvent::wheel(120.0, 5));
        assert_eq!(wheel.at_ms(), 5);
    }
}
