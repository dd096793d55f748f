//! # Axis Curve Module
//!
//! Turns raw stick deflection into cursor and scroll deltas.
//!
//! ## Deadzone
//!
//! Deflection at or below the deadzone is treated as center. Outside it the
//! deadzone is subtracted symmetrically and the remainder is scaled against
//! `32767 - deadzone`, so the edge of the deadzone maps to 0.0 and full
//! deflection maps to 1.0.
//!
//! ## Quadratic Response
//!
//! The normalized value is squared with its sign kept:
//!
//! `delta = sign(norm) * norm² * factor`
//!
//! Small deflections move the cursor by fractions of a pixel per tick while
//! full deflection moves it by `factor` pixels per tick. The cursor factor is
//! `sensitivity / 5`; scrolling uses `scrollSpeed` directly.
//!
//! ## Usage
//!
//! ```
//! use padmouse::engine::axis::{speed_factor, AxisCurve};
//!
//! let curve = AxisCurve::new(5000);
//!
//! // Inside the deadzone
//! assert_eq!(curve.apply(4000, speed_factor(50)), 0.0);
//!
//! // Full deflection at sensitivity 50
//! assert!((curve.apply(32767, speed_factor(50)) - 10.0).abs() < 1e-9);
//! ```

use crate::controller::frame::{ControllerFrame, STICK_MAX};
use crate::settings::Settings;

/// Scroll deltas with a rounded magnitude at or below this are dropped.
pub const SCROLL_JITTER_LIMIT: u32 = 1;

/// Deadzone plus quadratic curve for one stick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCurve {
    deadzone: i32,
}

impl AxisCurve {
    /// Creates a curve with `deadzone` raw units of dead travel.
    ///
    /// Deadzones at or above 32767 would leave no live travel and are clamped
    /// to 32766.
    #[must_use]
    pub fn new(deadzone: u16) -> Self {
        Self {
            deadzone: i32::from(deadzone).min(i32::from(STICK_MAX) - 1),
        }
    }

    /// Deflection outside the deadzone as a signed fraction of the live range.
    ///
    /// Returns 0.0 when `|value| <= deadzone`.
    #[must_use]
    pub fn normalize(&self, value: i16) -> f64 {
        let value = i32::from(value);
        if value.abs() <= self.deadzone {
            return 0.0;
        }

        let raw = value - value.signum() * self.deadzone;
        let max = i32::from(STICK_MAX) - self.deadzone;
        f64::from(raw) / f64::from(max)
    }

    /// Applies the quadratic response, scaled by `factor`.
    #[must_use]
    pub fn apply(&self, value: i16, factor: f64) -> f64 {
        let norm = self.normalize(value);
        norm.signum() * norm * norm * factor
    }
}

/// Speed factor for a cursor sensitivity value.
#[must_use]
pub fn speed_factor(sensitivity: u32) -> f64 {
    f64::from(sensitivity) / 5.0
}

/// Rounded cursor movement for one tick, in screen pixels.
///
/// Stick up moves the cursor up, so the Y axis is negated.
#[must_use]
pub fn cursor_delta(frame: &ControllerFrame, settings: &Settings) -> (i32, i32) {
    let curve = AxisCurve::new(settings.deadzone);
    let dx = curve.apply(frame.left_stick_x, speed_factor(settings.sensitivity_x));
    let dy = -curve.apply(frame.left_stick_y, speed_factor(settings.sensitivity_y));
    (dx.round() as i32, dy.round() as i32)
}

/// Rounded wheel amount for one tick, or `None` when it would only be jitter.
///
/// Stick up scrolls up (positive).
#[must_use]
pub fn scroll_delta(frame: &ControllerFrame, settings: &Settings) -> Option<i32> {
    let curve = AxisCurve::new(settings.deadzone);
    let amount = curve
        .apply(frame.right_stick_y, f64::from(settings.scroll_speed))
        .round() as i32;
    (amount.unsigned_abs() > SCROLL_JITTER_LIMIT).then_some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(deadzone: u16, sensitivity: u32, scroll_speed: u32) -> Settings {
        Settings {
            deadzone,
            sensitivity_x: sensitivity,
            sensitivity_y: sensitivity,
            scroll_speed,
            ..Settings::default()
        }
    }

    #[test]
    fn test_within_deadzone_is_zero() {
        let curve = AxisCurve::new(5000);
        for value in [0, 1, -1, 4999, -4999, 5000, -5000] {
            assert_eq!(curve.apply(value, 10.0), 0.0, "value {}", value);
        }
    }

    #[test]
    fn test_just_outside_deadzone_is_nonzero() {
        let curve = AxisCurve::new(5000);
        assert!(curve.apply(5001, 10.0) > 0.0);
        assert!(curve.apply(-5001, 10.0) < 0.0);
    }

    #[test]
    fn test_full_deflection_scenario() {
        // deadzone 5000: live range 27767, full stick normalizes to exactly 1.0
        let curve = AxisCurve::new(5000);
        assert_eq!(curve.normalize(32767), 1.0);
        assert_eq!(curve.apply(32767, speed_factor(50)), 10.0);
    }

    #[test]
    fn test_sign_matches_input() {
        let curve = AxisCurve::new(3000);
        for value in [3001_i16, 8000, 20000, 32767] {
            assert!(curve.apply(value, 4.0) > 0.0);
            assert!(curve.apply(-value, 4.0) < 0.0);
            assert_eq!(curve.apply(value, 4.0), -curve.apply(-value, 4.0));
        }
    }

    #[test]
    fn test_strictly_increasing_outside_deadzone() {
        let curve = AxisCurve::new(2000);
        let mut previous = 0.0;
        for value in (2001..=32767).step_by(97) {
            let output = curve.apply(value as i16, 10.0);
            assert!(output > previous, "{} -> {} not above {}", value, output, previous);
            previous = output;
        }
    }

    #[test]
    fn test_curve_is_quadratic() {
        let curve = AxisCurve::new(0);
        let half = curve.apply(16384, 10.0);
        assert!((half - 2.5).abs() < 0.01, "half deflection gave {}", half);
    }

    #[test]
    fn test_zero_deadzone() {
        let curve = AxisCurve::new(0);
        assert_eq!(curve.apply(0, 10.0), 0.0);
        assert!(curve.apply(1, 10.0) > 0.0);
    }

    #[test]
    fn test_deadzone_is_clamped() {
        assert_eq!(AxisCurve::new(u16::MAX), AxisCurve::new(32766));
        assert_eq!(AxisCurve::new(u16::MAX).apply(32766, 1.0), 0.0);
        assert_eq!(AxisCurve::new(u16::MAX).apply(32767, 1.0), 1.0);
    }

    #[test]
    fn test_speed_factor() {
        assert_eq!(speed_factor(50), 10.0);
        assert_eq!(speed_factor(0), 0.0);
        assert_eq!(speed_factor(100), 20.0);
    }

    #[test]
    fn test_cursor_delta_inverts_y() {
        let frame = ControllerFrame {
            left_stick_x: 32767,
            left_stick_y: 32767,
            ..ControllerFrame::default()
        };
        assert_eq!(cursor_delta(&frame, &settings(5000, 50, 50)), (10, -10));

        let frame = ControllerFrame {
            left_stick_x: -32767,
            left_stick_y: -32767,
            ..ControllerFrame::default()
        };
        assert_eq!(cursor_delta(&frame, &settings(5000, 50, 50)), (-10, 10));
    }

    #[test]
    fn test_cursor_delta_per_axis_sensitivity() {
        let frame = ControllerFrame {
            left_stick_x: 32767,
            left_stick_y: 32767,
            ..ControllerFrame::default()
        };
        let settings = Settings {
            sensitivity_x: 100,
            sensitivity_y: 25,
            deadzone: 5000,
            ..Settings::default()
        };
        assert_eq!(cursor_delta(&frame, &settings), (20, -5));
    }

    #[test]
    fn test_cursor_delta_centered_is_zero() {
        assert_eq!(cursor_delta(&ControllerFrame::default(), &Settings::default()), (0, 0));
    }

    #[test]
    fn test_scroll_not_inverted() {
        let up = ControllerFrame {
            right_stick_y: 32767,
            ..ControllerFrame::default()
        };
        let down = ControllerFrame {
            right_stick_y: -32767,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&up, &settings(5000, 50, 50)), Some(50));
        assert_eq!(scroll_delta(&down, &settings(5000, 50, 50)), Some(-50));
    }

    #[test]
    fn test_scroll_jitter_suppressed() {
        let settings = settings(0, 50, 50);
        // norm 0.15 -> 0.0225 * 50 = 1.1 -> rounds to 1
        let small = ControllerFrame {
            right_stick_y: 4915,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&small, &settings), None);

        // norm 0.25 -> 0.0625 * 50 = 3.1 -> rounds to 3
        let larger = ControllerFrame {
            right_stick_y: 8192,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&larger, &settings), Some(3));
    }

    #[test]
    fn test_zero_scroll_speed_disables_scroll() {
        let frame = ControllerFrame {
            right_stick_y: 32767,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&frame, &settings(5000, 50, 0)), None);
    }

    #[test]
    fn test_huge_scroll_speed_saturates() {
        let frame = ControllerFrame {
            right_stick_y: i16::MIN,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&frame, &settings(5000, 50, 3_000_000_000)), Some(i32::MIN));

        let frame = ControllerFrame {
            right_stick_y: i16::MAX,
            ..ControllerFrame::default()
        };
        assert_eq!(scroll_delta(&frame, &settings(5000, 50, 3_000_000_000)), Some(i32::MAX));
    }

    #[test]
    fn test_huge_sensitivity_saturates() {
        let frame = ControllerFrame {
            left_stick_x: i16::MIN,
            left_stick_y: i16::MIN,
            ..ControllerFrame::default()
        };
        assert_eq!(cursor_delta(&frame, &settings(5000, u32::MAX, 50)), (i32::MIN, i32::MAX));
    }
}
