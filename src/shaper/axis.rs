//! # Axis Shaping
//!
//! Pure conversion from raw axis values to saturated PWM microseconds.

use crate::packet::protocol::{PWM_GAIN, PWM_MAX, PWM_MIN};

/// Saturate a raw PWM computation to the valid servo range.
///
/// Not an error path: out-of-range values are an expected consequence of
/// large attitude deflections and are silently clamped.
#[inline]
#[must_use]
pub fn pwm_sat(pwm: i32) -> u16 {
    pwm.clamp(PWM_MIN as i32, PWM_MAX as i32) as u16
}

/// Map a raw axis value in [-1, 1] to a PWM value.
///
/// Scales by the fixed half-range gain (800 us), offsets to center plus the
/// per-channel trim, and saturates to [1100, 1900]. Deterministic and pure;
/// inputs outside [-1, 1] simply saturate.
///
/// # Arguments
///
/// * `raw` - Axis deflection, conventionally in [-1, 1]
/// * `trim` - Fixed per-channel center offset in microseconds
///
/// # Examples
///
/// ```
/// use propo_link::shaper::shape_axis;
///
/// assert_eq!(shape_axis(0.0, 0), 1500);   // centered
/// assert_eq!(shape_axis(0.5, 0), 1900);   // half deflection saturates at max
/// assert_eq!(shape_axis(0.0, 60), 1560);  // trim offsets the center
/// ```
#[inline]
#[must_use]
pub fn shape_axis(raw: f32, trim: i16) -> u16 {
    pwm_sat((raw * PWM_GAIN) as i32 + 1500 + trim as i32)
}

/// Map a throttle fraction in [0, 1] to a PWM value.
///
/// Throttle is one-sided: 0.0 maps to [`PWM_MIN`], 1.0 to [`PWM_MIN`] plus
/// the full gain, saturated like every other channel.
#[inline]
#[must_use]
pub fn throttle_pwm(throttle: f32) -> u16 {
    pwm_sat((throttle * PWM_GAIN) as i32 + PWM_MIN as i32)
}
