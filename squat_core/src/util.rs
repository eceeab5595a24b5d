//! Small time helpers.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: f64 = 1_000.0;

/// Interval between frames in milliseconds. Non-positive or non-finite
/// rates are treated as 1 fps.
#[inline]
pub fn frame_interval_ms(fps: f64) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        MILLIS_PER_SEC / fps
    } else {
        MILLIS_PER_SEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_clamps_bad_rates() {
        assert_eq!(frame_interval_ms(25.0), 40.0);
        assert_eq!(frame_interval_ms(0.0), 1000.0);
        assert_eq!(frame_interval_ms(f64::NAN), 1000.0);
    }
}
