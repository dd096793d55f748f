//! Per-control action table.

use super::action::ActionSpec;
use crate::controller::frame::Control;

/// One [`ActionSpec`] per [`Control`]. Every entry starts as `None`.
///
/// # Examples
///
/// ```
/// use padmouse::controller::frame::Control;
/// use padmouse::input::injector::MouseButton;
/// use padmouse::mapping::action::ActionSpec;
/// use padmouse::mapping::table::MappingTable;
///
/// let mut table = MappingTable::default();
/// table.set(Control::A, ActionSpec::MouseClick(MouseButton::Left));
/// assert_eq!(table.get(Control::A), &ActionSpec::MouseClick(MouseButton::Left));
/// assert!(table.get(Control::B).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    entries: [ActionSpec; Control::COUNT],
}

impl Default for MappingTable {
    fn default() -> Self {
        Self {
            entries: std::array::from_fn(|_| ActionSpec::None),
        }
    }
}

impl MappingTable {
    #[must_use]
    pub fn get(&self, control: Control) -> &ActionSpec {
        &self.entries[control.index()]
    }

    pub fn set(&mut self, control: Control, action: ActionSpec) {
        self.entries[control.index()] = action;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, control: Control, action: ActionSpec) -> Self {
        self.set(control, action);
        self
    }

    /// Entries in [`Control::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Control, &ActionSpec)> {
        Control::ALL.into_iter().zip(self.entries.iter())
    }

    /// Number of controls bound to something other than `None`.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.entries.iter().filter(|action| !action.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keycodes::VirtualKeyCode;

    #[test]
    fn test_default_entries_are_none() {
        let table = MappingTable::default();
        for control in Control::ALL {
            assert!(table.get(control).is_none(), "{} should default to none", control);
        }
        assert_eq!(table.bound_count(), 0);
    }

    #[test]
    fn test_set_replaces_entry() {
        let mut table = MappingTable::default();
        table.set(Control::RightTrigger, ActionSpec::KeyTap(VirtualKeyCode(32)));
        table.set(Control::RightTrigger, ActionSpec::KeyTap(VirtualKeyCode(13)));

        assert_eq!(table.get(Control::RightTrigger), &ActionSpec::KeyTap(VirtualKeyCode(13)));
        assert_eq!(table.bound_count(), 1);
    }

    #[test]
    fn test_iter_follows_control_order() {
        let table = MappingTable::default().with(Control::DPadRight, ActionSpec::KeyTap(VirtualKeyCode(39)));
        let controls: Vec<Control> = table.iter().map(|(control, _)| control).collect();
        assert_eq!(controls, Control::ALL.to_vec());

        let (last, action) = table.iter().last().unwrap();
        assert_eq!(last, Control::DPadRight);
        assert_eq!(action, &ActionSpec::KeyTap(VirtualKeyCode(39)));
    }
}
