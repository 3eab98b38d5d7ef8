//! # Input Shaper Module
//!
//! Converts raw pilot inputs into bounded servo PWM values.
//!
//! This module handles:
//! - Scaling attitude axes to PWM with per-channel trim
//! - Saturating every channel to the valid PWM range
//! - Throttle shaping for both input modes (button pair, analog lever)

pub mod axis;
pub mod throttle;

pub use axis::{shape_axis, throttle_pwm};
pub use throttle::{ButtonInput, ThrottleInput, ThrottleMode, ThrottleShaper};
