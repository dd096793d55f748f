//! Press and release detection between consecutive ticks.

use crate::controller::frame::{Control, ControlSource, ControllerFrame};

/// Boolean state of every control for one tick.
///
/// Triggers are reduced to pressed/released against
/// [`TRIGGER_THRESHOLD`](crate::controller::frame::TRIGGER_THRESHOLD) before
/// they are stored, so analog noise above the threshold never produces edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlStates {
    pub buttons: u16,
    pub left_trigger: bool,
    pub right_trigger: bool,
}

impl ControlStates {
    #[must_use]
    pub fn from_frame(frame: &ControllerFrame) -> Self {
        Self {
            buttons: frame.buttons,
            left_trigger: frame.left_trigger_pressed(),
            right_trigger: frame.right_trigger_pressed(),
        }
    }

    #[must_use]
    pub fn is_pressed(&self, control: Control) -> bool {
        match control.source() {
            ControlSource::Button(mask) => self.buttons & mask != 0,
            ControlSource::LeftTrigger => self.left_trigger,
            ControlSource::RightTrigger => self.right_trigger,
        }
    }
}

/// A control that changed state since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub control: Control,
    pub is_down: bool,
}

impl Edge {
    #[must_use]
    pub fn down(control: Control) -> Self {
        Self { control, is_down: true }
    }

    #[must_use]
    pub fn up(control: Control) -> Self {
        Self { control, is_down: false }
    }
}

/// Every control whose state differs between `previous` and `current`, in
/// [`Control::ALL`] order.
#[must_use]
pub fn detect_edges(previous: &ControlStates, current: &ControlStates) -> Vec<Edge> {
    Control::ALL
        .into_iter()
        .filter_map(|control| {
            let is_down = current.is_pressed(control);
            (is_down != previous.is_pressed(control)).then_some(Edge { control, is_down })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::frame::buttons;

    fn states(buttons: u16, left_trigger: bool, right_trigger: bool) -> ControlStates {
        ControlStates {
            buttons,
            left_trigger,
            right_trigger,
        }
    }

    #[test]
    fn test_identical_states_have_no_edges() {
        let held = states(buttons::A | buttons::DPAD_LEFT, true, false);
        assert!(detect_edges(&held, &held).is_empty());
        assert!(detect_edges(&ControlStates::default(), &ControlStates::default()).is_empty());
    }

    #[test]
    fn test_press_and_release() {
        let released = ControlStates::default();
        let pressed = states(buttons::A, false, false);

        assert_eq!(detect_edges(&released, &pressed), vec![Edge::down(Control::A)]);
        assert_eq!(detect_edges(&pressed, &released), vec![Edge::up(Control::A)]);
    }

    #[test]
    fn test_simultaneous_edges_in_control_order() {
        let previous = states(buttons::DPAD_DOWN, false, false);
        let current = states(buttons::Y | buttons::A | buttons::START, false, true);

        assert_eq!(
            detect_edges(&previous, &current),
            vec![
                Edge::down(Control::A),
                Edge::down(Control::Y),
                Edge::down(Control::RightTrigger),
                Edge::down(Control::Start),
                Edge::up(Control::DPadDown),
            ]
        );
    }

    #[test]
    fn test_every_control_reports_one_edge() {
        let all = states(u16::MAX, true, true);
        let edges = detect_edges(&ControlStates::default(), &all);

        assert_eq!(edges.len(), Control::COUNT);
        for (edge, control) in edges.iter().zip(Control::ALL) {
            assert_eq!(*edge, Edge::down(control));
        }
    }

    #[test]
    fn test_trigger_threshold() {
        let frame = |left_trigger, right_trigger| ControllerFrame {
            left_trigger,
            right_trigger,
            ..ControllerFrame::default()
        };

        assert_eq!(ControlStates::from_frame(&frame(40, 41)), states(0, false, true));
        assert_eq!(ControlStates::from_frame(&frame(255, 0)), states(0, true, false));
    }

    #[test]
    fn test_analog_noise_above_threshold_is_not_an_edge() {
        let previous = ControlStates::from_frame(&ControllerFrame {
            right_trigger: 120,
            ..ControllerFrame::default()
        });
        let current = ControlStates::from_frame(&ControllerFrame {
            right_trigger: 200,
            ..ControllerFrame::default()
        });
        assert!(detect_edges(&previous, &current).is_empty());
    }
}
