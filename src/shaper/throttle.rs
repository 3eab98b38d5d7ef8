//! # Throttle Shaping
//!
//! Stateful throttle computation for the two pilot-input modes.
//!
//! Throttle is the one channel with memory: a single fraction in [0, 1]
//! carried across ticks, initialized to 0 at startup and never reset. The
//! input mode is fixed at startup from configuration; the shaper exposes the
//! same `update(input) -> f32` capability for both modes.

use tracing::trace;

/// Throttle change per tick while a step button is held
pub const BUTTON_STEP: f32 = 0.001;

/// Throttle change per tick while the hover button is held
pub const HOVER_STEP: f32 = 0.01;

/// Analog deadband: readings below this clamp to the low extreme
pub const DEADBAND_LOW: f32 = 0.1;

/// Analog deadband: readings above this clamp to the high extreme
pub const DEADBAND_HIGH: f32 = 0.9;

/// Low-pass blend factor for analog readings (weight of the new reading)
pub const LOWPASS_BLEND: f32 = 0.1;

/// Discrete throttle buttons, sampled once per active tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonInput {
    /// Step throttle down by [`BUTTON_STEP`]
    pub decrease: bool,
    /// Nudge throttle toward the hover set-point by [`HOVER_STEP`]
    pub hover: bool,
    /// Step throttle up by [`BUTTON_STEP`]
    pub increase: bool,
}

/// One tick's worth of raw throttle input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleInput {
    /// Button-pair mode input
    Buttons(ButtonInput),
    /// Normalized analog lever reading in [0, 1], physical sense
    /// (0 = lever at the top = full throttle)
    Analog(f32),
}

/// Throttle input mode, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleMode {
    /// Three discrete buttons; `hover_point` is the set-point fraction the
    /// hover button converges to
    Buttons { hover_point: f32 },
    /// Analog lever with deadband and low-pass smoothing
    Analog,
}

/// Stateful throttle shaper.
///
/// # Examples
///
/// ```
/// use propo_link::shaper::{ButtonInput, ThrottleInput, ThrottleMode, ThrottleShaper};
///
/// let mut shaper = ThrottleShaper::new(ThrottleMode::Buttons { hover_point: 0.5 });
/// assert_eq!(shaper.value(), 0.0);
///
/// let up = ButtonInput { increase: true, ..Default::default() };
/// let value = shaper.update(ThrottleInput::Buttons(up));
/// assert!((value - 0.001).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ThrottleShaper {
    mode: ThrottleMode,
    value: f32,
}

impl ThrottleShaper {
    /// Create a shaper in the given mode with throttle at zero.
    #[must_use]
    pub fn new(mode: ThrottleMode) -> Self {
        Self { mode, value: 0.0 }
    }

    /// Current throttle fraction in [0, 1].
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Apply one tick of pilot input and return the new throttle fraction.
    ///
    /// The input variant must match the configured mode; a mismatched
    /// variant leaves the state unchanged (the input layer is wired to the
    /// same config the mode came from, so this only happens in misassembled
    /// tests).
    pub fn update(&mut self, input: ThrottleInput) -> f32 {
        match (self.mode, input) {
            (ThrottleMode::Buttons { hover_point }, ThrottleInput::Buttons(buttons)) => {
                self.update_buttons(buttons, hover_point)
            }
            (ThrottleMode::Analog, ThrottleInput::Analog(raw)) => self.update_analog(raw),
            (mode, input) => {
                trace!(?mode, ?input, "throttle input does not match configured mode");
            }
        }
        self.value
    }

    /// Button mode: fixed steps with clamp to [0, 1]; the hover button
    /// converges exactly onto the set-point without overshoot, from either
    /// side. No smoothing.
    fn update_buttons(&mut self, buttons: ButtonInput, hover_point: f32) {
        if buttons.decrease {
            self.value = (self.value - BUTTON_STEP).max(0.0);
        }
        if buttons.increase {
            self.value = (self.value + BUTTON_STEP).min(1.0);
        }
        if buttons.hover {
            if self.value < hover_point {
                self.value = (self.value + HOVER_STEP).min(hover_point);
            } else if self.value > hover_point {
                self.value = (self.value - HOVER_STEP).max(hover_point);
            }
        }
    }

    /// Analog mode: invert the physical lever sense, clamp into the
    /// deadband region, rescale to the full [0, 1] span, then low-pass into
    /// the persisted state to absorb ADC jitter.
    fn update_analog(&mut self, raw: f32) {
        let level = 1.0 - raw;
        let level = level.clamp(DEADBAND_LOW, DEADBAND_HIGH);
        let level = (level - DEADBAND_LOW) / (DEADBAND_HIGH - DEADBAND_LOW);
        self.value = (1.0 - LOWPASS_BLEND) * self.value + LOWPASS_BLEND * level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_shaper(hover_point: f32) -> ThrottleShaper {
        ThrottleShaper::new(ThrottleMode::Buttons { hover_point })
    }

    fn analog_shaper() -> ThrottleShaper {
        ThrottleShaper::new(ThrottleMode::Analog)
    }

    const UP: ThrottleInput = ThrottleInput::Buttons(ButtonInput {
        decrease: false,
        hover: false,
        increase: true,
    });
    const DOWN: ThrottleInput = ThrottleInput::Buttons(ButtonInput {
        decrease: true,
        hover: false,
        increase: false,
    });
    const HOVER: ThrottleInput = ThrottleInput::Buttons(ButtonInput {
        decrease: false,
        hover: true,
        increase: false,
    });

    // ==================== Button Mode ====================

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(button_shaper(0.5).value(), 0.0);
        assert_eq!(analog_shaper().value(), 0.0);
    }

    #[test]
    fn test_increase_steps_up() {
        let mut shaper = button_shaper(0.5);
        for _ in 0..10 {
            shaper.update(UP);
        }
        assert!((shaper.value() - 0.010).abs() < 1e-6);
    }

    #[test]
    fn test_decrease_clamps_at_zero() {
        let mut shaper = button_shaper(0.5);
        shaper.update(DOWN);
        assert_eq!(shaper.value(), 0.0);
    }

    #[test]
    fn test_increase_clamps_at_one() {
        let mut shaper = button_shaper(0.5);
        shaper.value = 0.9995;
        shaper.update(UP);
        assert_eq!(shaper.value(), 1.0);
        shaper.update(UP);
        assert_eq!(shaper.value(), 1.0);
    }

    #[test]
    fn test_hover_converges_from_below_without_overshoot() {
        let mut shaper = button_shaper(0.5);
        for _ in 0..200 {
            let value = shaper.update(HOVER);
            assert!(value <= 0.5 + 1e-6, "overshot set-point: {}", value);
        }
        assert_eq!(shaper.value(), 0.5);
    }

    #[test]
    fn test_hover_converges_from_above_without_overshoot() {
        let mut shaper = button_shaper(0.5);
        shaper.value = 1.0;
        for _ in 0..200 {
            let value = shaper.update(HOVER);
            assert!(value >= 0.5 - 1e-6, "undershot set-point: {}", value);
        }
        assert_eq!(shaper.value(), 0.5);
    }

    #[test]
    fn test_hover_lands_exactly_on_fractional_set_point() {
        // 0.437 is not a multiple of HOVER_STEP; the final step must clamp
        let mut shaper = button_shaper(0.437);
        for _ in 0..200 {
            shaper.update(HOVER);
        }
        assert_eq!(shaper.value(), 0.437);
    }

    #[test]
    fn test_hover_holds_at_set_point() {
        let mut shaper = button_shaper(0.5);
        shaper.value = 0.5;
        shaper.update(HOVER);
        assert_eq!(shaper.value(), 0.5);
    }

    // ==================== Analog Mode ====================

    #[test]
    fn test_analog_deadband_low_extreme() {
        // Lever near the bottom (raw near 1) maps to 0 regardless of the
        // exact reading below the threshold
        let mut a = analog_shaper();
        let mut b = analog_shaper();
        a.update(ThrottleInput::Analog(1.0)); // level 0.0
        b.update(ThrottleInput::Analog(0.95)); // level 0.05
        assert_eq!(a.value(), b.value());
        assert_eq!(a.value(), 0.0);
    }

    #[test]
    fn test_analog_deadband_high_extreme() {
        // Lever near the top (raw near 0) maps to 1 regardless of the exact
        // reading above the threshold
        let mut a = analog_shaper();
        let mut b = analog_shaper();
        a.update(ThrottleInput::Analog(0.0)); // level 1.0
        b.update(ThrottleInput::Analog(0.05)); // level 0.95
        assert!((a.value() - b.value()).abs() < 1e-6);
        assert!((a.value() - LOWPASS_BLEND).abs() < 1e-6); // 0.9*0 + 0.1*1
    }

    #[test]
    fn test_analog_lowpass_blend() {
        let mut shaper = analog_shaper();
        shaper.value = 0.5;
        // Mid-lever: raw 0.5 -> level 0.5 -> rescaled 0.5
        shaper.update(ThrottleInput::Analog(0.5));
        assert!((shaper.value() - 0.5).abs() < 1e-6);
        // Full throttle reading pulls 10% of the way per tick
        shaper.update(ThrottleInput::Analog(0.0));
        assert!((shaper.value() - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_analog_monotonicity() {
        // From identical starting state, more lever (lower raw) never yields
        // less throttle, across the non-deadband region
        let readings = [0.85, 0.7, 0.5, 0.3, 0.15];
        let mut previous = -1.0;
        for &raw in &readings {
            let mut shaper = analog_shaper();
            shaper.value = 0.4;
            let value = shaper.update(ThrottleInput::Analog(raw));
            assert!(
                value >= previous,
                "throttle {} at raw {} below previous {}",
                value,
                raw,
                previous
            );
            previous = value;
        }
    }

    #[test]
    fn test_analog_converges_to_steady_reading() {
        let mut shaper = analog_shaper();
        for _ in 0..400 {
            shaper.update(ThrottleInput::Analog(0.3)); // level 0.7 -> 0.75
        }
        assert!((shaper.value() - 0.75).abs() < 1e-3);
    }

    // ==================== Mode Mismatch ====================

    #[test]
    fn test_mismatched_input_is_ignored() {
        let mut shaper = button_shaper(0.5);
        shaper.value = 0.3;
        shaper.update(ThrottleInput::Analog(0.0));
        assert_eq!(shaper.value(), 0.3);

        let mut shaper = analog_shaper();
        shaper.value = 0.3;
        shaper.update(UP);
        assert_eq!(shaper.value(), 0.3);
    }
}
