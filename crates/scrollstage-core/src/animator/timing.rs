//! L4 Atomic Layer: Time calculation utilities for animations
//!
//! Timestamps are host milliseconds, so animations are driven by the same
//! clock as the input events that started them.

/// Calculate animation progress (0.0 to 1.0)
///
/// # Arguments
/// * `start_ms` - Animation start time
/// * `now_ms` - Current time
/// * `duration_ms` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start_ms: u64, now_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now_ms.saturating_sub(start_ms);
    let ratio = elapsed as f64 / duration_ms as f64;
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start_ms: u64, now_ms: u64, duration_ms: u64) -> bool {
    now_ms.saturating_sub(start_ms) >= duration_ms
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for u16 values (line offsets)
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(2.0, 1.0, 1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_u16() {
        assert_eq!(lerp_u16(0, 100, 0.5), 50);
        assert_eq!(lerp_u16(100, 0, 0.25), 75);
    }

    #[test]
    fn test_progress() {
        assert!((progress(1_000, 1_250, 500) - 0.5).abs() < 0.001);
        assert!((progress(1_000, 900, 500) - 0.0).abs() < 0.001);
        assert!((progress(1_000, 2_000, 500) - 1.0).abs() < 0.001);
        assert!((progress(1_000, 1_000, 0) - 1.0).abs() < 0.001);
        assert!(!is_complete(1_000, 1_499, 500));
        assert!(is_complete(1_000, 1_500, 500));
    }
}
